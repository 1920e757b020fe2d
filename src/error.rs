use serde::Serialize;
use thiserror::Error;

/// Failure observed for a single host during a poll cycle.
///
/// None of these are fatal to the poller: each one is stored as that host's
/// status until the next cycle re-polls it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "kebab-case")]
pub enum HostError {
    #[error("request timed out")]
    Timeout,
    #[error("host unreachable: {0}")]
    Unreachable(String),
    #[error("bad response: HTTP {0}")]
    BadResponse(u16),
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

impl HostError {
    /// Stable marker used by diagnostics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            HostError::Timeout => "timeout",
            HostError::Unreachable(_) => "unreachable",
            HostError::BadResponse(_) => "bad-response",
            HostError::MalformedPayload(_) => "malformed-payload",
        }
    }

    pub(crate) fn malformed(detail: impl Into<String>) -> Self {
        HostError::MalformedPayload(detail.into())
    }
}
