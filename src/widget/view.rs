//! Plain-text rendering of a display entry

use chrono::{DateTime, Utc};

use super::entry::DisplayEntry;

const BAR_WIDTH: usize = 20;

/// Render the small widget: mode header, clock, progress bar
pub fn render(entry: &DisplayEntry, now: DateTime<Utc>) -> String {
    let label = entry.mode.to_uppercase();
    let header = if entry.is_running {
        format!("| {:<w$}ACTIVE", label, w = BAR_WIDTH - 4)
    } else {
        format!("| {}", label)
    };

    let progress = entry.progress_at(now);
    let filled = (progress * BAR_WIDTH as f64).round() as usize;
    let bar = format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled.min(BAR_WIDTH)),
        "-".repeat(BAR_WIDTH - filled.min(BAR_WIDTH)),
        (progress * 100.0).round() as u32
    );

    format!("{}\n  {}\n{}", header.trim_end(), entry.clock_text(now), bar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{state::snapshot::TimerSnapshot, utils::epoch_seconds, widget::derive_entry};

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn stopped_entry_has_no_badge() {
        let snapshot = TimerSnapshot {
            seconds_remaining: 300,
            total_seconds: 1500,
            mode: "Short".to_string(),
            is_running: false,
            target_timestamp: None,
        };
        let text = render(&derive_entry(Some(&snapshot), now()), now());
        assert_eq!(text, "| SHORT\n  05:00\n[################----]  80%");
    }

    #[test]
    fn running_entry_shows_active_badge() {
        let snapshot = TimerSnapshot {
            seconds_remaining: 1500,
            total_seconds: 1500,
            mode: "Eye Care".to_string(),
            is_running: true,
            target_timestamp: Some(epoch_seconds(now()) + 1500.0),
        };
        let text = render(&derive_entry(Some(&snapshot), now()), now());
        let header = text.lines().next().unwrap();
        assert!(header.starts_with("| EYE CARE"));
        assert!(header.ends_with("ACTIVE"));
        assert!(text.contains("25:00"));
        assert!(text.ends_with("[--------------------]   0%"));
    }
}
