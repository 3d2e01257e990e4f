//! Error types shared by the writer, the store and the HTTP bridge

/// The only two failure kinds the widget bridge reports.
///
/// Everything else (missing snapshot, expired countdown, zero duration) is a
/// normal case with a default or clamped result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WidgetError {
    /// The shared namespace linking writer and widget is not set up or cannot be used
    #[error("shared namespace '{namespace}' unavailable: {reason}")]
    Configuration { namespace: String, reason: String },

    /// The caller supplied incomplete or wrongly typed fields
    #[error("malformed arguments: {0}")]
    MalformedInput(String),
}

impl WidgetError {
    pub fn configuration(namespace: &str, reason: impl Into<String>) -> Self {
        Self::Configuration {
            namespace: namespace.to_string(),
            reason: reason.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedInput(reason.into())
    }

    /// Stable wire code reported to bridge callers
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "UNAVAILABLE",
            Self::MalformedInput(_) => "INVALID_ARGUMENTS",
        }
    }
}
