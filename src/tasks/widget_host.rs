//! Widget host background task

use std::{sync::Arc, time::Duration};
use chrono::Utc;
use tokio::{sync::broadcast::error::RecvError, time::Instant};
use tracing::{debug, info, warn};

use crate::{state::AppState, widget::render};

/// Why the widget host woke up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wake {
    Signal,
    Fallback,
}

/// Re-render the widget on every matching refresh signal, or when the
/// timeline's refresh deadline passes without one
pub async fn widget_host_task(state: Arc<AppState>) {
    info!("Starting widget host for {}", state.widget_kind);

    let mut refresh_rx = state.refresh.subscribe();

    loop {
        let now = Utc::now();
        let timeline = state.provider.timeline(now);
        if let Some(entry) = timeline.current(now) {
            debug!("Rendered widget:\n{}", render(entry, now));
        }

        let wait = (timeline.refresh_after - now)
            .to_std()
            .unwrap_or(Duration::ZERO);
        state.publish_timeline(timeline);

        let deadline = Instant::now() + wait;
        let wake = loop {
            tokio::select! {
                signal = refresh_rx.recv() => match signal {
                    Ok(scope) if scope.applies_to(&state.widget_kind) => break Wake::Signal,
                    Ok(scope) => debug!("Ignoring refresh for {:?}", scope),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Widget host lagged behind {} refresh signals", skipped);
                        break Wake::Signal;
                    }
                    Err(RecvError::Closed) => {
                        info!("Refresh channel closed, stopping widget host");
                        return;
                    }
                },
                _ = tokio::time::sleep_until(deadline) => break Wake::Fallback,
            }
        };

        debug!("Widget host woke up: {:?}", wake);
    }
}
