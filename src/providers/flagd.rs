//! Flag gate backed by flagd's OFREP HTTP endpoint.
//!
//! Each evaluation is a `POST {base_url}/ofrep/v1/evaluate/flags/{key}` with
//! an empty evaluation context. Any transport error, non-success status,
//! provider error code or non-boolean value is logged, counted and answered
//! with the caller's default.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::traits::FlagGate;
use crate::telemetry;
use crate::{CuratorError, Result};

/// Default flagd OFREP base URL.
pub const DEFAULT_OFREP_URL: &str = "http://flagd:8016";

/// Configuration for [`OfrepFlagGate`].
///
/// ```rust
/// # use curator::OfrepConfig;
/// # use std::time::Duration;
/// let config = OfrepConfig::new("http://localhost:8016")
///     .timeout(Duration::from_millis(250));
/// assert_eq!(config.base_url, "http://localhost:8016");
/// ```
#[derive(Debug, Clone)]
pub struct OfrepConfig {
    /// Base URL of the flagd OFREP listener.
    pub base_url: String,
    /// Per-evaluation timeout. Default: 500ms.
    pub timeout: Duration,
}

impl Default for OfrepConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OFREP_URL.to_string(),
            timeout: Duration::from_millis(500),
        }
    }
}

impl OfrepConfig {
    /// Create a config pointing at `base_url` with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the per-evaluation timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// OFREP single-flag evaluation payload (success and error shapes).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OfrepEvaluation {
    #[serde(default)]
    value: Option<serde_json::Value>,
    #[serde(default)]
    variant: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    error_details: Option<String>,
}

/// [`FlagGate`] that evaluates flags against flagd over OFREP.
pub struct OfrepFlagGate {
    client: reqwest::Client,
    base_url: String,
}

impl OfrepFlagGate {
    /// Build a gate from configuration.
    pub fn new(config: &OfrepConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CuratorError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Evaluate a boolean flag, reporting failures instead of defaulting.
    pub async fn evaluate_boolean(&self, flag: &str) -> Result<bool> {
        let url = format!("{}/ofrep/v1/evaluate/flags/{flag}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "context": {} }))
            .send()
            .await
            .map_err(|e| CuratorError::FlagService(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        let body: OfrepEvaluation = response.json().await.map_err(|e| {
            CuratorError::FlagService(format!("invalid evaluation payload (HTTP {status}): {e}"))
        })?;

        if let Some(code) = body.error_code {
            let details = body.error_details.unwrap_or_default();
            return Err(CuratorError::FlagService(format!("{code}: {details}")));
        }
        if !status.is_success() {
            return Err(CuratorError::FlagService(format!(
                "evaluation returned HTTP {status}"
            )));
        }

        match body.value {
            Some(serde_json::Value::Bool(enabled)) => {
                debug!(flag, enabled, variant = ?body.variant, "flag evaluated");
                Ok(enabled)
            }
            other => Err(CuratorError::FlagService(format!(
                "flag {flag} is not boolean: {other:?}"
            ))),
        }
    }
}

#[async_trait]
impl FlagGate for OfrepFlagGate {
    fn name(&self) -> &str {
        "flagd"
    }

    async fn get_boolean_flag(&self, flag: &str, default: bool) -> bool {
        match self.evaluate_boolean(flag).await {
            Ok(enabled) => enabled,
            Err(e) => {
                warn!(flag, default, error = %e, "flag evaluation failed, using default");
                metrics::counter!(telemetry::FLAG_FALLBACKS_TOTAL, "flag" => flag.to_owned())
                    .increment(1);
                default
            }
        }
    }
}
