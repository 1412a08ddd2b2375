//! Python bindings

pub mod routines;
pub mod types;
