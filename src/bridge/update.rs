//! Timer updates arriving from the host application

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::WidgetError;

/// Largest second count the shared store can hold as an integer
pub const MAX_SECONDS: u64 = i64::MAX as u64;

/// One authoritative timer state from the app's clock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerUpdate {
    pub seconds_remaining: u64,
    pub total_seconds: u64,
    pub mode: String,
    pub is_running: bool,
}

impl TimerUpdate {
    /// Validate an untyped argument map as sent over the bridge
    ///
    /// Every field is required and must have the exact JSON type; nothing is
    /// written when validation fails.
    pub fn from_args(args: &Value) -> Result<Self, WidgetError> {
        let map = args
            .as_object()
            .ok_or_else(|| WidgetError::malformed("expected an object of timer fields"))?;

        let seconds_remaining = field(map, "secondsRemaining")?
            .as_u64()
            .ok_or_else(|| WidgetError::malformed("secondsRemaining must be a non-negative integer"))?;

        let total_seconds = field(map, "totalSeconds")?
            .as_u64()
            .filter(|v| *v > 0)
            .ok_or_else(|| WidgetError::malformed("totalSeconds must be a positive integer"))?;

        let mode = field(map, "mode")?
            .as_str()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| WidgetError::malformed("mode must be a non-empty string"))?
            .to_string();

        let is_running = field(map, "isRunning")?
            .as_bool()
            .ok_or_else(|| WidgetError::malformed("isRunning must be a boolean"))?;

        let update = Self {
            seconds_remaining,
            total_seconds,
            mode,
            is_running,
        };
        update.validate()?;
        Ok(update)
    }

    /// Field rules shared by every entry point
    ///
    /// `secondsRemaining <= totalSeconds` is the caller's obligation and is
    /// not checked here.
    pub fn validate(&self) -> Result<(), WidgetError> {
        if self.seconds_remaining > MAX_SECONDS {
            return Err(WidgetError::malformed(format!(
                "secondsRemaining must not exceed {}",
                MAX_SECONDS
            )));
        }
        if self.total_seconds == 0 || self.total_seconds > MAX_SECONDS {
            return Err(WidgetError::malformed(format!(
                "totalSeconds must be a positive integer not exceeding {}",
                MAX_SECONDS
            )));
        }
        if self.mode.trim().is_empty() {
            return Err(WidgetError::malformed("mode must be a non-empty string"));
        }
        Ok(())
    }
}

fn field<'a>(map: &'a Map<String, Value>, name: &str) -> Result<&'a Value, WidgetError> {
    map.get(name)
        .ok_or_else(|| WidgetError::malformed(format!("missing field {}", name)))
}
