//! State writer: mirrors app timer updates into the shared store

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::update::TimerUpdate;
use crate::{
    error::WidgetError,
    services::refresh::{RefreshNotifier, RefreshScope},
    state::snapshot::TimerSnapshot,
    store::SharedStateStore,
    utils::epoch_seconds,
    widget::{derive_entry, EffectiveState},
};

/// Largest target jitter absorbed without moving the stored end instant
pub const DEFAULT_DRIFT_TOLERANCE_SECS: f64 = 5.0;

/// Decide the target timestamp to persist for `update`
///
/// A stopped timer has no target. A running timer gets `now + remaining`
/// when it was not running before, or when that candidate moved more than
/// `tolerance` seconds away from the stored target. Otherwise the stored
/// target is kept so periodic re-writes do not shift the countdown endpoint.
pub fn reconcile_target(
    previous: Option<&TimerSnapshot>,
    update: &TimerUpdate,
    now: f64,
    tolerance: f64,
) -> Option<f64> {
    if !update.is_running {
        return None;
    }

    let candidate = now + update.seconds_remaining as f64;
    match previous.and_then(TimerSnapshot::running_target) {
        Some(existing) if (candidate - existing).abs() <= tolerance => Some(existing),
        _ => Some(candidate),
    }
}

pub struct StateWriter {
    store: Arc<dyn SharedStateStore>,
    refresh: Arc<dyn RefreshNotifier>,
    drift_tolerance: f64,
    /// Limit refresh signals to one widget kind; `None` reloads all widgets
    widget_kind: Option<String>,
}

impl StateWriter {
    pub fn new(store: Arc<dyn SharedStateStore>, refresh: Arc<dyn RefreshNotifier>) -> Self {
        Self {
            store,
            refresh,
            drift_tolerance: DEFAULT_DRIFT_TOLERANCE_SECS,
            widget_kind: None,
        }
    }

    pub fn with_drift_tolerance(mut self, seconds: f64) -> Self {
        self.drift_tolerance = seconds;
        self
    }

    pub fn with_widget_kind(mut self, kind: impl Into<String>) -> Self {
        self.widget_kind = Some(kind.into());
        self
    }

    pub fn namespace(&self) -> &str {
        self.store.namespace()
    }

    /// Validate raw bridge arguments, then apply them
    pub fn update_from_args(
        &self,
        args: &serde_json::Value,
        now: DateTime<Utc>,
    ) -> Result<TimerSnapshot, WidgetError> {
        let update = TimerUpdate::from_args(args)?;
        self.update(update, now)
    }

    /// Persist `update`, reconciling the target against the stored snapshot
    pub fn update(
        &self,
        update: TimerUpdate,
        now: DateTime<Utc>,
    ) -> Result<TimerSnapshot, WidgetError> {
        update.validate()?;
        let previous = TimerSnapshot::load(self.store.as_ref())?;
        let target_timestamp = reconcile_target(
            previous.as_ref(),
            &update,
            epoch_seconds(now),
            self.drift_tolerance,
        );

        if update.is_running {
            let kept = previous
                .as_ref()
                .and_then(TimerSnapshot::running_target)
                .is_some_and(|existing| Some(existing) == target_timestamp);
            if kept {
                debug!("Keeping target {:?} for running {} timer", target_timestamp, update.mode);
            } else {
                info!(
                    "New target {:?} for {} ({}s remaining)",
                    target_timestamp, update.mode, update.seconds_remaining
                );
            }
        }

        if update.seconds_remaining > update.total_seconds {
            warn!(
                "secondsRemaining {} exceeds totalSeconds {}",
                update.seconds_remaining, update.total_seconds
            );
        }

        let snapshot = TimerSnapshot {
            seconds_remaining: update.seconds_remaining,
            total_seconds: update.total_seconds,
            mode: update.mode,
            is_running: update.is_running,
            target_timestamp,
        };
        snapshot.persist(self.store.as_ref())?;

        let scope = match &self.widget_kind {
            Some(kind) => RefreshScope::Kind(kind.clone()),
            None => RefreshScope::All,
        };
        self.refresh.request_refresh(scope);

        Ok(snapshot)
    }

    /// Current running/expiry-corrected state; `None` if the store is unavailable
    pub fn query(&self, now: DateTime<Utc>) -> Option<EffectiveState> {
        match TimerSnapshot::load(self.store.as_ref()) {
            Ok(snapshot) => Some(derive_entry(snapshot.as_ref(), now).effective_state(now)),
            Err(e) => {
                warn!("Timer state query failed: {}", e);
                None
            }
        }
    }

    /// Raw stored snapshot, without expiry correction
    pub fn stored(&self) -> Result<Option<TimerSnapshot>, WidgetError> {
        TimerSnapshot::load(self.store.as_ref())
    }
}
