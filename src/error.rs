//! Curator error types

use std::time::Duration;

/// Curator error types
#[derive(Debug, thiserror::Error)]
pub enum CuratorError {
    // Upstream errors
    /// The product catalog could not be reached or answered with an error.
    ///
    /// Never recovered locally: serving stale or empty pools would hide a
    /// catalog outage from callers.
    #[error("product catalog unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("product catalog timed out after {0:?}")]
    UpstreamTimeout(Duration),

    /// The feature flag service failed to evaluate a flag.
    ///
    /// Flag gates recover from this by returning the caller's default; it
    /// only escapes through the lower-level evaluation APIs.
    #[error("flag service error: {0}")]
    FlagService(String),

    // Request errors
    #[error("malformed input: {0}")]
    MalformedInput(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl CuratorError {
    /// Whether this error originates from the upstream catalog.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            CuratorError::UpstreamUnavailable(_) | CuratorError::UpstreamTimeout(_)
        )
    }
}

/// Result type alias for Curator operations
pub type Result<T> = std::result::Result<T, CuratorError>;
