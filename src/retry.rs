//! Per-scenario retry budget.
//!
//! A [`RetryPolicy`] is a pure decision counter: it answers "may this
//! scenario run again" and tracks how many retries have been spent.
//! Re-executing the scenario is the runner's job, as is honoring
//! [`delay`](RetryPolicy::delay) between attempts. One policy instance
//! belongs to one scenario; budgets are never shared.
//!
//! # Example
//!
//! ```
//! use appdriver::RetryPolicy;
//!
//! let mut policy = RetryPolicy::new(2);
//! assert!(policy.should_retry());
//! assert!(policy.should_retry());
//! assert!(!policy.should_retry());
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use tracing::debug;

use crate::config::Settings;

// ============================================================================
// RetryPolicy
// ============================================================================

/// A consumable retry budget.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max: u32,
    attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy allowing up to `max` retries with a one second
    /// inter-attempt delay.
    #[must_use]
    pub fn new(max: u32) -> Self {
        Self { max, attempts: 0, delay: Duration::from_millis(1000) }
    }

    /// Creates a policy from the configured retry settings.
    ///
    /// The budget is read once here; later configuration changes never
    /// affect a policy already handed out.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            max: settings.retry_max(),
            attempts: 0,
            delay: settings.retry_delay(),
        }
    }

    /// Consumes one retry from the budget.
    ///
    /// Returns `true` while budget remains; each `true` answer spends one
    /// retry. Returns `false` forever once the budget is exhausted.
    pub fn should_retry(&mut self) -> bool {
        if self.attempts < self.max {
            self.attempts += 1;
            debug!(attempt = self.attempts, max = self.max, "granting retry");
            true
        } else {
            false
        }
    }

    /// Returns how many retries have been spent.
    #[inline]
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Returns the delay the runner should wait between attempts.
    #[inline]
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_budget_of_two_grants_exactly_two_retries() {
        let mut policy = RetryPolicy::new(2);
        assert!(policy.should_retry());
        assert!(policy.should_retry());
        assert!(!policy.should_retry());
        assert!(!policy.should_retry());
        assert_eq!(policy.attempts(), 2);
    }

    #[test]
    fn test_zero_budget_never_retries() {
        let mut policy = RetryPolicy::new(0);
        assert!(!policy.should_retry());
        assert_eq!(policy.attempts(), 0);
    }

    #[test]
    fn test_from_settings_reads_max_and_delay() {
        let config = Config::from_value(serde_json::json!({
            "retry": { "max": 5, "delayMs": 250 }
        }))
        .unwrap();
        let policy = RetryPolicy::from_settings(&Settings::new(config));
        assert_eq!(policy.delay(), Duration::from_millis(250));

        let mut policy = policy;
        for _ in 0..5 {
            assert!(policy.should_retry());
        }
        assert!(!policy.should_retry());
    }

    #[test]
    fn test_defaults_apply_without_config() {
        let mut policy = RetryPolicy::from_settings(&Settings::new(Config::empty()));
        assert_eq!(policy.delay(), Duration::from_millis(1000));
        assert!(policy.should_retry());
        assert!(policy.should_retry());
        assert!(!policy.should_retry());
    }

    #[test]
    fn test_override_takes_precedence_over_config() {
        let config = Config::from_value(serde_json::json!({
            "retry": { "max": 5 }
        }))
        .unwrap();
        let settings = Settings::new(config).with_override("retry.max", "1");
        let mut policy = RetryPolicy::from_settings(&settings);
        assert!(policy.should_retry());
        assert!(!policy.should_retry());
    }
}
