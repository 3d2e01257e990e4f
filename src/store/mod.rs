//! Shared key-value store module
//!
//! The store is the only link between the writer (inside the host app) and the
//! widget host. It is injected everywhere as a `SharedStateStore` so both sides
//! can run against an in-memory fake.

pub mod file;
pub mod memory;

use serde::{Deserialize, Serialize};

use crate::error::WidgetError;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Keys of the shared snapshot, all in one namespace
pub mod keys {
    pub const SECONDS_REMAINING: &str = "secondsRemaining";
    pub const TOTAL_SECONDS: &str = "totalSeconds";
    pub const MODE: &str = "mode";
    pub const IS_RUNNING: &str = "isRunning";
    pub const TARGET_TIMESTAMP: &str = "targetTimestamp";
}

/// A single value held by the shared store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoreValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl StoreValue {
    /// Integer view; floats are truncated
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Float(v) if v.is_finite() => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            Self::Int(v) => Some(*v != 0),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }
}

/// Process-external key-value store shared by writer and widget host
pub trait SharedStateStore: Send + Sync {
    /// Name of the shared namespace, used in error reports
    fn namespace(&self) -> &str;

    fn get(&self, key: &str) -> Result<Option<StoreValue>, WidgetError>;

    fn set(&self, key: &str, value: StoreValue) -> Result<(), WidgetError>;

    /// Flush pending writes so another process can observe them
    fn synchronize(&self) -> Result<(), WidgetError> {
        Ok(())
    }
}
