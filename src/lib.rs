//! Pomodoro widget - shared-state bridge and countdown widget host
//!
//! The writer mirrors the app's timer into a shared key-value store and
//! signals a refresh; the widget side derives a display entry from whatever
//! snapshot it finds, anchored on a target end instant so the countdown stays
//! accurate between refreshes.

pub mod api;
pub mod bridge;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod store;
pub mod tasks;
pub mod utils;
pub mod widget;

// Re-export commonly used types
pub use api::create_router;
pub use bridge::{StateWriter, TimerUpdate};
pub use config::Config;
pub use error::WidgetError;
pub use state::{AppState, TimerSnapshot};
pub use store::{FileStore, MemoryStore, SharedStateStore};
pub use utils::signals::shutdown_signal;
pub use widget::{derive_entry, DisplayEntry};
