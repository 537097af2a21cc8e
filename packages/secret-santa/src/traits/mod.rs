//! Core trait abstractions.

pub mod store;
pub mod suggest;
