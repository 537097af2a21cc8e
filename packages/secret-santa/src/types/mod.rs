//! Data types for gift-exchange events.

pub mod event;
pub mod participant;
pub mod suggestion;
