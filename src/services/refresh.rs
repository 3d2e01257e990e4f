//! Refresh signalling from the writer to the widget host

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Which widgets a refresh request targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", content = "kind", rename_all = "lowercase")]
pub enum RefreshScope {
    /// Reload every widget timeline
    All,
    /// Reload only widgets registered under this kind
    Kind(String),
}

impl RefreshScope {
    pub fn applies_to(&self, kind: &str) -> bool {
        match self {
            Self::All => true,
            Self::Kind(target) => target == kind,
        }
    }
}

/// Best-effort "please re-render" notification
///
/// Delivery is not guaranteed; implementations must never fail the caller.
pub trait RefreshNotifier: Send + Sync {
    fn request_refresh(&self, scope: RefreshScope);
}

/// In-process refresh broadcaster for widget hosts running alongside the bridge
#[derive(Debug, Clone)]
pub struct RefreshCenter {
    tx: broadcast::Sender<RefreshScope>,
}

impl RefreshCenter {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RefreshScope> {
        self.tx.subscribe()
    }

    pub fn reload_all_timelines(&self) {
        self.request_refresh(RefreshScope::All);
    }

    pub fn reload_timelines(&self, kind: &str) {
        self.request_refresh(RefreshScope::Kind(kind.to_string()));
    }
}

impl Default for RefreshCenter {
    fn default() -> Self {
        Self::new(16)
    }
}

impl RefreshNotifier for RefreshCenter {
    fn request_refresh(&self, scope: RefreshScope) {
        match self.tx.send(scope) {
            Ok(listeners) => debug!("Refresh signal delivered to {} widget host(s)", listeners),
            // Dropped signals are fine: the host falls back to its refresh interval.
            Err(e) => debug!("No widget host listening, refresh {:?} dropped", e.0),
        }
    }
}

/// Notifier for one-shot invocations with no widget host attached
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl RefreshNotifier for LogNotifier {
    fn request_refresh(&self, scope: RefreshScope) {
        info!("Refresh requested ({:?}); widget picks it up on its next scheduled run", scope);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_matching() {
        assert!(RefreshScope::All.applies_to("PomodoroWidget"));
        assert!(RefreshScope::Kind("PomodoroWidget".into()).applies_to("PomodoroWidget"));
        assert!(!RefreshScope::Kind("Other".into()).applies_to("PomodoroWidget"));
    }

    #[test]
    fn send_without_listeners_does_not_panic() {
        let center = RefreshCenter::default();
        center.reload_all_timelines();
    }

    #[tokio::test]
    async fn subscribers_receive_scoped_reloads() {
        let center = RefreshCenter::default();
        let mut rx = center.subscribe();
        center.reload_timelines("PomodoroWidget");
        assert_eq!(
            rx.recv().await.unwrap(),
            RefreshScope::Kind("PomodoroWidget".into())
        );
    }
}
