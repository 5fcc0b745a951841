use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Backoff policy for transient upstream failures
///
/// Which failures are retried is fixed by `ErrorKind::is_retryable`; only the
/// budget and pacing live here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_delay_ms: u64,
    /// Upper bound for any single delay
    pub max_delay_ms: u64,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay_ms: 500,
            max_delay_ms: 5000,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// No retries at all
    pub fn disabled() -> Self {
        Self::new(0)
    }

    pub fn with_initial_delay(mut self, ms: u64) -> Self {
        self.initial_delay_ms = ms;
        self
    }

    pub fn with_max_delay(mut self, ms: u64) -> Self {
        self.max_delay_ms = ms;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Total attempts including the first one
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before retry number `retry` (0-indexed)
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let multiplier = self.backoff_multiplier.max(1.0).powi(exponent);
        let delay = self.initial_delay_ms as f64 * multiplier;
        let delay_ms = delay.min(self.max_delay_ms as f64) as u64;

        Duration::from_millis(delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budget_is_small() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.max_attempts(), 3);
    }

    #[test]
    fn test_delay_calculation() {
        let config = RetryConfig::new(5)
            .with_initial_delay(100)
            .with_backoff_multiplier(2.0)
            .with_max_delay(1000);

        assert_eq!(config.delay_for_retry(0), Duration::from_millis(100));
        assert_eq!(config.delay_for_retry(1), Duration::from_millis(200));
        assert_eq!(config.delay_for_retry(2), Duration::from_millis(400));
        assert_eq!(config.delay_for_retry(3), Duration::from_millis(800));
        assert_eq!(config.delay_for_retry(4), Duration::from_millis(1000)); // Capped
    }

    #[test]
    fn test_huge_retry_index_stays_capped() {
        let config = RetryConfig::new(2)
            .with_initial_delay(100)
            .with_backoff_multiplier(2.0)
            .with_max_delay(1000);

        assert_eq!(config.delay_for_retry(u32::MAX), Duration::from_millis(1000));
        assert_eq!(
            config.delay_for_retry(i32::MAX as u32 + 1),
            Duration::from_millis(1000)
        );
    }

    #[test]
    fn test_disabled_means_single_attempt() {
        assert_eq!(RetryConfig::disabled().max_attempts(), 1);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: RetryConfig = serde_json::from_str(r#"{"max_retries": 4}"#).unwrap();
        assert_eq!(config.max_retries, 4);
        assert_eq!(config.initial_delay_ms, 500);
        assert_eq!(config.backoff_multiplier, 2.0);
    }
}
