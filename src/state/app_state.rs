//! Shared state of the bridge server

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::warn;

use crate::{
    bridge::StateWriter,
    services::refresh::RefreshCenter,
    store::SharedStateStore,
    widget::{Timeline, TimelineProvider},
};

/// Everything the HTTP handlers and the widget host task share
pub struct AppState {
    /// Writer side of the shared store
    pub writer: StateWriter,
    /// Widget side of the same store
    pub provider: TimelineProvider,
    /// In-process refresh signal
    pub refresh: RefreshCenter,
    pub widget_kind: String,
    /// Latest timeline produced by the widget host
    pub timeline_tx: watch::Sender<Option<Timeline>>,
    /// Keep the receiver alive to prevent channel closure
    pub _timeline_rx: watch::Receiver<Option<Timeline>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
}

/// Settings needed to wire an `AppState`
pub struct AppStateOptions {
    pub port: u16,
    pub host: String,
    pub widget_kind: String,
    pub drift_tolerance: f64,
    pub fallback_refresh: std::time::Duration,
}

impl AppState {
    pub fn new(store: Arc<dyn SharedStateStore>, options: AppStateOptions) -> Self {
        let refresh = RefreshCenter::default();
        let writer = StateWriter::new(Arc::clone(&store), Arc::new(refresh.clone()))
            .with_drift_tolerance(options.drift_tolerance)
            .with_widget_kind(options.widget_kind.clone());
        let provider = TimelineProvider::new(store, options.fallback_refresh);
        let (timeline_tx, timeline_rx) = watch::channel(None);

        Self {
            writer,
            provider,
            refresh,
            widget_kind: options.widget_kind,
            timeline_tx,
            _timeline_rx: timeline_rx,
            start_time: Instant::now(),
            port: options.port,
            host: options.host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        }
    }

    /// Record the latest bridge action for `/status`
    pub fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Publish a freshly rendered timeline to watchers
    pub fn publish_timeline(&self, timeline: Timeline) {
        if let Err(e) = self.timeline_tx.send(Some(timeline)) {
            warn!("Failed to publish timeline: {}", e);
        }
    }

    /// Latest timeline from the widget host, if it has rendered yet
    pub fn latest_timeline(&self) -> Option<Timeline> {
        self.timeline_tx.borrow().clone()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
