//! Timeline provider invoked by the widget host

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use super::entry::{derive_entry, DisplayEntry};
use crate::{state::snapshot::TimerSnapshot, store::SharedStateStore};

/// Fallback re-render interval when no refresh signal arrives (10 minutes)
pub const DEFAULT_FALLBACK_REFRESH_SECS: u64 = 600;

/// Entries to show plus when the host should ask again
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub entries: Vec<DisplayEntry>,
    pub refresh_after: DateTime<Utc>,
}

impl Timeline {
    /// Entry on screen at `now`: the last one whose date is not in the future
    pub fn current(&self, now: DateTime<Utc>) -> Option<&DisplayEntry> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.date <= now)
            .or_else(|| self.entries.first())
    }
}

/// Reads the shared store and turns it into widget entries
pub struct TimelineProvider {
    store: Arc<dyn SharedStateStore>,
    fallback_refresh: Duration,
}

impl TimelineProvider {
    pub fn new(store: Arc<dyn SharedStateStore>, fallback_refresh: Duration) -> Self {
        Self {
            store,
            fallback_refresh,
        }
    }

    pub fn fallback_refresh(&self) -> Duration {
        self.fallback_refresh
    }

    pub fn placeholder(&self, now: DateTime<Utc>) -> DisplayEntry {
        DisplayEntry::placeholder(now)
    }

    /// Single entry for the current instant
    ///
    /// Store problems are not the widget's to report: it shows defaults and
    /// the writer side surfaces the configuration error.
    pub fn snapshot(&self, now: DateTime<Utc>) -> DisplayEntry {
        match TimerSnapshot::load(self.store.as_ref()) {
            Ok(snapshot) => derive_entry(snapshot.as_ref(), now),
            Err(e) => {
                warn!("Widget falling back to defaults: {}", e);
                derive_entry(None, now)
            }
        }
    }

    /// One entry now, next refresh after the fallback interval
    pub fn timeline(&self, now: DateTime<Utc>) -> Timeline {
        let entry = self.snapshot(now);
        let refresh_after = TimeDelta::from_std(self.fallback_refresh)
            .ok()
            .and_then(|delta| now.checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        debug!(
            "Timeline for {}: running={}, refresh after {}",
            entry.mode, entry.is_running, refresh_after
        );

        Timeline {
            entries: vec![entry],
            refresh_after,
        }
    }
}
