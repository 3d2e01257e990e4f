//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    response::Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info};

use crate::{
    error::WidgetError,
    state::AppState,
    widget::EffectiveState,
};
use super::responses::{
    EntryResponse, HealthResponse, ReloadResponse, StatusResponse, UpdateResponse,
};

/// Handle POST /widget/update - Write a timer update into the shared store
pub async fn update_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<UpdateResponse>, WidgetError> {
    let Json(args) = payload.map_err(|e| WidgetError::malformed(e.body_text()))?;

    match state.writer.update_from_args(&args, Utc::now()) {
        Ok(snapshot) => {
            state.record_action("update");
            info!(
                "Widget updated: mode={}, running={}, remaining={}s",
                snapshot.mode, snapshot.is_running, snapshot.seconds_remaining
            );
            Ok(Json(UpdateResponse::ok(snapshot)))
        }
        Err(e) => {
            error!("Widget update rejected: {}", e);
            Err(e)
        }
    }
}

/// Handle GET /widget/state - Effective timer state, `null` if the store is unavailable
pub async fn state_handler(State(state): State<Arc<AppState>>) -> Json<Option<EffectiveState>> {
    Json(state.writer.query(Utc::now()))
}

/// Handle GET /widget/entry - What the widget currently shows
pub async fn entry_handler(State(state): State<Arc<AppState>>) -> Json<EntryResponse> {
    let now = Utc::now();
    let latest = state.latest_timeline().and_then(|timeline| {
        let refresh_after = timeline.refresh_after;
        timeline
            .current(now)
            .cloned()
            .map(|entry| (entry, refresh_after))
    });

    let response = match latest {
        Some((entry, refresh_after)) => EntryResponse::at(entry, Some(refresh_after), now),
        // Widget host has not rendered yet; derive on demand.
        None => EntryResponse::at(state.provider.snapshot(now), None, now),
    };
    Json(response)
}

#[derive(Debug, Deserialize)]
pub struct ReloadParams {
    pub kind: Option<String>,
}

/// Handle POST /widget/reload - Ask the widget host to re-render
pub async fn reload_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReloadParams>,
) -> Json<ReloadResponse> {
    match &params.kind {
        Some(kind) => state.refresh.reload_timelines(kind),
        None => state.refresh.reload_all_timelines(),
    }
    state.record_action("reload");

    Json(ReloadResponse {
        status: "requested".to_string(),
        kind: params.kind,
    })
}

/// Handle GET /status - Return current bridge status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (store_available, snapshot) = match state.writer.stored() {
        Ok(snapshot) => (true, snapshot),
        Err(e) => {
            error!("Shared store unavailable: {}", e);
            (false, None)
        }
    };
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        namespace: state.writer.namespace().to_string(),
        widget_kind: state.widget_kind.clone(),
        store_available,
        snapshot,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
