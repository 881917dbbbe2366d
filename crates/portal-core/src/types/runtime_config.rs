//! Runtime configuration types for operational parameters
//!
//! These types define configuration that controls runtime behavior, currently
//! the backoff policies applied to outbound calls.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Complete runtime configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuntimeConfig {
    /// Backoff policy configurations
    #[serde(default)]
    pub retry_policies: RetryPoliciesConfig,
}

impl RuntimeConfig {
    /// Validate every configured policy
    pub fn validate(&self) -> Result<()> {
        self.retry_policies.validate()
    }
}

/// Backoff policies, a default plus per-operation overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RetryPoliciesConfig {
    /// Default backoff policy
    #[serde(default)]
    pub default: BackoffPolicy,

    /// Per-operation backoff policies
    #[serde(default)]
    pub operations: HashMap<String, BackoffPolicy>,
}

impl Default for RetryPoliciesConfig {
    fn default() -> Self {
        let mut operations = HashMap::new();

        // Session lookup in the root loader
        operations.insert("session".to_string(), BackoffPolicy::default());

        Self {
            default: BackoffPolicy::default(),
            operations,
        }
    }
}

impl RetryPoliciesConfig {
    /// Policy for a named operation, falling back to the default
    pub fn policy_for(&self, operation: &str) -> &BackoffPolicy {
        self.operations.get(operation).unwrap_or(&self.default)
    }

    fn validate(&self) -> Result<()> {
        self.default
            .validate()
            .map_err(|e| Error::invalid_config(format!("retry-policies.default: {}", e)))?;

        for (name, policy) in &self.operations {
            policy.validate().map_err(|e| {
                Error::invalid_config(format!("retry-policies.operations.{}: {}", name, e))
            })?;
        }

        Ok(())
    }
}

/// Exponential backoff policy for an operation
///
/// The delay before retry `a` (1-indexed) is
/// `base_delay_ms * factor^(a-1)` plus a uniform jitter in `[0, jitter_span_ms)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BackoffPolicy {
    /// Retries after the first attempt; 0 means a single attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay in milliseconds
    #[serde(default = "default_base_delay")]
    pub base_delay_ms: u64,

    /// Growth factor applied per retry
    #[serde(default = "default_factor")]
    pub factor: f64,

    /// Jitter width in milliseconds, defaults to the base delay
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jitter_ms: Option<u64>,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay(),
            factor: default_factor(),
            jitter_ms: None,
        }
    }
}

impl BackoffPolicy {
    /// Create a policy without explicit jitter width
    pub fn new(max_retries: u32, base_delay_ms: u64, factor: f64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
            factor,
            jitter_ms: None,
        }
    }

    /// Total number of attempts the policy allows
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Effective jitter width in milliseconds
    pub fn jitter_span_ms(&self) -> u64 {
        self.jitter_ms.unwrap_or(self.base_delay_ms)
    }

    /// Reject factors that would shrink or poison the delay
    pub fn validate(&self) -> Result<()> {
        if !self.factor.is_finite() {
            return Err(Error::invalid_config(format!(
                "factor must be finite, got {}",
                self.factor
            )));
        }
        if self.factor < 1.0 {
            return Err(Error::invalid_config(format!(
                "factor must be >= 1.0, got {}",
                self.factor
            )));
        }
        Ok(())
    }
}

fn default_max_retries() -> u32 {
    3
}
fn default_base_delay() -> u64 {
    100
}
fn default_factor() -> f64 {
    2.0
}
