//! Command implementations

pub mod event;
pub mod me;
