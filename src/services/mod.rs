//! Services module
//!
//! Signalling between the writer and whatever hosts the widget.

pub mod refresh;

// Re-export main types
pub use refresh::{LogNotifier, RefreshCenter, RefreshNotifier, RefreshScope};
