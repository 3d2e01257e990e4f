//! State module
//!
//! The shared timer snapshot and the bridge server's own state.

pub mod app_state;
pub mod snapshot;

// Re-export main types
pub use app_state::{AppState, AppStateOptions};
pub use snapshot::{TimerSnapshot, DEFAULT_MODE, DEFAULT_TOTAL_SECONDS};
