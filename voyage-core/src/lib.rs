//! Voyage Core - shared error taxonomy and logging bootstrap
//!
//! Used by the web service crate; kept free of HTTP concerns.

pub mod error;
pub mod logging;

pub use error::*;
pub use logging::*;

// Re-export commonly used external types
pub use tracing;
