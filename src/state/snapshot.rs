//! The shared timer snapshot and its mapping onto the key-value store

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::WidgetError,
    store::{keys, SharedStateStore, StoreValue},
};

/// Mode shown when nothing has been written yet
pub const DEFAULT_MODE: &str = "Work";
/// Session length shown when nothing has been written yet (25 minutes)
pub const DEFAULT_TOTAL_SECONDS: u64 = 1500;

/// Timer state mirrored from the app into the shared store
///
/// Overwritten in place on every write; there is no history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub seconds_remaining: u64,
    pub total_seconds: u64,
    pub mode: String,
    pub is_running: bool,
    /// Epoch seconds at which the countdown reaches zero; `None` when unset
    pub target_timestamp: Option<f64>,
}

impl TimerSnapshot {
    /// Target instant, only when the snapshot claims to be running
    pub fn running_target(&self) -> Option<f64> {
        if self.is_running {
            self.target_timestamp
        } else {
            None
        }
    }

    /// Load the snapshot; `Ok(None)` if no field was ever written
    ///
    /// Fields missing from a partially written record fall back to defaults.
    pub fn load(store: &dyn SharedStateStore) -> Result<Option<Self>, WidgetError> {
        let seconds = store.get(keys::SECONDS_REMAINING)?;
        let total = store.get(keys::TOTAL_SECONDS)?;
        let mode = store.get(keys::MODE)?;
        let running = store.get(keys::IS_RUNNING)?;
        let target = store.get(keys::TARGET_TIMESTAMP)?;

        if seconds.is_none()
            && total.is_none()
            && mode.is_none()
            && running.is_none()
            && target.is_none()
        {
            debug!("No snapshot in {}", store.namespace());
            return Ok(None);
        }

        let defaults = Self::default();
        Ok(Some(Self {
            seconds_remaining: seconds
                .and_then(|v| v.as_i64())
                .map(|v| v.max(0) as u64)
                .unwrap_or(defaults.seconds_remaining),
            total_seconds: total
                .and_then(|v| v.as_i64())
                .map(|v| v.max(0) as u64)
                .unwrap_or(defaults.total_seconds),
            mode: mode
                .as_ref()
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or(defaults.mode),
            is_running: running
                .and_then(|v| v.as_bool())
                .unwrap_or(defaults.is_running),
            target_timestamp: target
                .and_then(|v| v.as_f64())
                .filter(|v| v.is_finite() && *v > 0.0),
        }))
    }

    /// Write every field, then synchronize the store
    ///
    /// An unset target is stored as `0.0`.
    pub fn persist(&self, store: &dyn SharedStateStore) -> Result<(), WidgetError> {
        let seconds = stored_int(keys::SECONDS_REMAINING, self.seconds_remaining)?;
        let total = stored_int(keys::TOTAL_SECONDS, self.total_seconds)?;

        store.set(keys::SECONDS_REMAINING, seconds)?;
        store.set(keys::TOTAL_SECONDS, total)?;
        store.set(keys::MODE, StoreValue::Text(self.mode.clone()))?;
        store.set(keys::IS_RUNNING, StoreValue::Bool(self.is_running))?;
        store.set(
            keys::TARGET_TIMESTAMP,
            StoreValue::Float(self.target_timestamp.unwrap_or(0.0)),
        )?;
        store.synchronize()
    }
}

/// Integer store value, rejecting counts that would wrap
fn stored_int(key: &str, value: u64) -> Result<StoreValue, WidgetError> {
    i64::try_from(value)
        .map(StoreValue::Int)
        .map_err(|_| WidgetError::malformed(format!("{} {} is out of range", key, value)))
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        Self {
            seconds_remaining: DEFAULT_TOTAL_SECONDS,
            total_seconds: DEFAULT_TOTAL_SECONDS,
            mode: DEFAULT_MODE.to_string(),
            is_running: false,
            target_timestamp: None,
        }
    }
}
