//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod widget_host;

// Re-export main functions
pub use widget_host::widget_host_task;
