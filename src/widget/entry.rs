//! Display entries derived from a (possibly stale) snapshot

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    state::snapshot::{TimerSnapshot, DEFAULT_TOTAL_SECONDS},
    utils::from_epoch_seconds,
};

/// Everything the widget needs to draw one frame
///
/// While `is_running` the countdown is anchored on `target_date` and the view
/// recomputes the remaining time itself, so the entry stays correct between
/// refreshes. Otherwise `seconds_remaining` is shown as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayEntry {
    /// When this entry was derived
    pub date: DateTime<Utc>,
    pub seconds_remaining: u64,
    pub total_seconds: u64,
    pub mode: String,
    /// Effective running flag: stored flag AND target still in the future
    pub is_running: bool,
    /// The snapshot said running but the target has already passed,
    /// so the writer has not yet persisted the stop
    pub finished: bool,
    pub target_date: DateTime<Utc>,
}

/// Running/expiry-corrected timer state, as answered to bridge queries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveState {
    pub seconds_remaining: u64,
    pub total_seconds: u64,
    pub mode: String,
    pub is_running: bool,
}

/// Derive the entry valid at `now`; a missing snapshot yields the defaults
pub fn derive_entry(snapshot: Option<&TimerSnapshot>, now: DateTime<Utc>) -> DisplayEntry {
    let fallback = TimerSnapshot::default();
    let snapshot = snapshot.unwrap_or(&fallback);

    let static_target = offset(now, snapshot.seconds_remaining);
    let stored_target = snapshot.running_target().and_then(from_epoch_seconds);
    let target_date = stored_target.unwrap_or(static_target);

    let is_running = snapshot.is_running && target_date > now;

    DisplayEntry {
        date: now,
        seconds_remaining: snapshot.seconds_remaining,
        total_seconds: snapshot.total_seconds,
        mode: snapshot.mode.clone(),
        is_running,
        finished: snapshot.is_running && !is_running,
        target_date,
    }
}

/// `MM:SS`, negative input clamped to zero
pub fn format_clock(seconds: i64) -> String {
    let s = seconds.max(0);
    format!("{:02}:{:02}", s / 60, s % 60)
}

fn offset(now: DateTime<Utc>, seconds: u64) -> DateTime<Utc> {
    i64::try_from(seconds)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

impl DisplayEntry {
    /// Fixed entry shown before any data is available
    pub fn placeholder(now: DateTime<Utc>) -> Self {
        derive_entry(None, now)
    }

    /// Whole seconds left at `now`, rounded up while counting down
    ///
    /// A stopped entry (including one whose target already passed) shows the
    /// last persisted value.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> u64 {
        if self.is_running {
            let millis = (self.target_date - now).num_milliseconds().max(0) as u64;
            millis.div_ceil(1000)
        } else {
            self.seconds_remaining
        }
    }

    /// Elapsed fraction of the session in `[0, 1]`
    pub fn progress_at(&self, now: DateTime<Utc>) -> f64 {
        let total = if self.total_seconds == 0 {
            DEFAULT_TOTAL_SECONDS
        } else {
            self.total_seconds
        } as f64;
        let remaining = self.remaining_at(now) as f64;
        ((total - remaining) / total).clamp(0.0, 1.0)
    }

    pub fn clock_text(&self, now: DateTime<Utc>) -> String {
        format_clock(i64::try_from(self.remaining_at(now)).unwrap_or(i64::MAX))
    }

    pub fn effective_state(&self, now: DateTime<Utc>) -> EffectiveState {
        EffectiveState {
            seconds_remaining: self.remaining_at(now),
            total_seconds: self.total_seconds,
            mode: self.mode.clone(),
            is_running: self.is_running,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{state::snapshot::DEFAULT_MODE, utils::epoch_seconds};

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn running(target: f64) -> TimerSnapshot {
        TimerSnapshot {
            seconds_remaining: 600,
            total_seconds: 1500,
            mode: "Work".to_string(),
            is_running: true,
            target_timestamp: Some(target),
        }
    }

    #[test]
    fn past_target_is_not_running() {
        let snapshot = running(epoch_seconds(now()) - 10.0);
        let entry = derive_entry(Some(&snapshot), now());
        assert!(!entry.is_running);
        assert!(entry.finished);
        // Not effectively running: the stored value is shown as-is.
        assert_eq!(entry.remaining_at(now()), 600);
        assert_eq!(entry.remaining_at(now() + TimeDelta::seconds(30)), 600);
        assert_eq!(entry.clock_text(now()), "10:00");
        assert_eq!(entry.progress_at(now()), 0.6);
    }

    #[test]
    fn future_target_counts_down_from_target() {
        let snapshot = running(epoch_seconds(now()) + 100.0);
        let entry = derive_entry(Some(&snapshot), now());
        assert!(entry.is_running);
        assert_eq!(entry.target_date, now() + TimeDelta::seconds(100));
        assert_eq!(entry.remaining_at(now()), 100);
        // The entry keeps counting without another derivation.
        assert_eq!(entry.remaining_at(now() + TimeDelta::seconds(40)), 60);
        assert_eq!(entry.clock_text(now() + TimeDelta::seconds(40)), "01:00");
    }

    #[test]
    fn stopped_snapshot_shows_static_seconds() {
        let snapshot = TimerSnapshot {
            seconds_remaining: 300,
            total_seconds: 1500,
            mode: "Short".to_string(),
            is_running: false,
            target_timestamp: Some(epoch_seconds(now()) + 900.0),
        };
        let entry = derive_entry(Some(&snapshot), now());
        assert!(!entry.is_running);
        assert_eq!(entry.remaining_at(now() + TimeDelta::seconds(60)), 300);
        assert_eq!(entry.progress_at(now()), 0.8);
        assert_eq!(entry.clock_text(now()), "05:00");
    }

    #[test]
    fn running_without_target_anchors_on_seconds_remaining() {
        let snapshot = TimerSnapshot {
            target_timestamp: None,
            ..running(0.0)
        };
        let entry = derive_entry(Some(&snapshot), now());
        assert!(entry.is_running);
        assert_eq!(entry.remaining_at(now()), 600);
    }

    #[test]
    fn missing_snapshot_yields_defaults() {
        let entry = derive_entry(None, now());
        assert_eq!(entry.mode, DEFAULT_MODE);
        assert_eq!(entry.seconds_remaining, DEFAULT_TOTAL_SECONDS);
        assert_eq!(entry.total_seconds, DEFAULT_TOTAL_SECONDS);
        assert!(!entry.is_running);
        assert_eq!(entry.progress_at(now()), 0.0);
        assert_eq!(entry, DisplayEntry::placeholder(now()));
    }

    #[test]
    fn zero_total_uses_default_duration() {
        let snapshot = TimerSnapshot {
            seconds_remaining: 750,
            total_seconds: 0,
            ..TimerSnapshot::default()
        };
        let entry = derive_entry(Some(&snapshot), now());
        assert_eq!(entry.progress_at(now()), 0.5);
    }

    #[test]
    fn progress_clamps_when_remaining_exceeds_total() {
        let snapshot = TimerSnapshot {
            seconds_remaining: 2000,
            total_seconds: 1500,
            ..TimerSnapshot::default()
        };
        let entry = derive_entry(Some(&snapshot), now());
        assert_eq!(entry.progress_at(now()), 0.0);
    }

    #[test]
    fn clock_formatting() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(-5), "00:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(1500), "25:00");
    }

    #[test]
    fn effective_state_applies_expiry() {
        let snapshot = running(epoch_seconds(now()) - 1.0);
        let state = derive_entry(Some(&snapshot), now()).effective_state(now());
        assert!(!state.is_running);
        assert_eq!(state.seconds_remaining, 600);
        assert_eq!(state.total_seconds, 1500);
    }
}
