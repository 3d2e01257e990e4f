//! Utility functions module
//!
//! Signal handling and epoch-time conversions used across the crate.

pub mod signals;
pub mod time;

// Re-export main functions
pub use signals::shutdown_signal;
pub use time::{epoch_seconds, from_epoch_seconds};
