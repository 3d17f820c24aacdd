//! Handlers that do not belong to a feature module

pub mod health;

pub use health::*;
