//! API response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::WidgetError,
    state::TimerSnapshot,
    widget::{render, DisplayEntry},
};

/// Response for a successful widget update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub snapshot: TimerSnapshot,
}

impl UpdateResponse {
    pub fn ok(snapshot: TimerSnapshot) -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            snapshot,
        }
    }
}

/// Error body carrying the bridge error code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl IntoResponse for WidgetError {
    fn into_response(self) -> Response {
        let status = match self {
            WidgetError::Configuration { .. } => StatusCode::SERVICE_UNAVAILABLE,
            WidgetError::MalformedInput(_) => StatusCode::BAD_REQUEST,
        };
        let body = ErrorResponse {
            code: self.code().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Widget entry as seen at request time
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryResponse {
    pub entry: DisplayEntry,
    pub remaining_seconds: u64,
    pub progress: f64,
    pub clock: String,
    pub view: String,
    pub refresh_after: Option<DateTime<Utc>>,
}

impl EntryResponse {
    pub fn at(entry: DisplayEntry, refresh_after: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        Self {
            remaining_seconds: entry.remaining_at(now),
            progress: entry.progress_at(now),
            clock: entry.clock_text(now),
            view: render(&entry, now),
            entry,
            refresh_after,
        }
    }
}

/// Response for a refresh request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub status: String,
    pub kind: Option<String>,
}

/// Bridge status overview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub namespace: String,
    pub widget_kind: String,
    pub store_available: bool,
    pub snapshot: Option<TimerSnapshot>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
