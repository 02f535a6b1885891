//! Timeout helpers for provider calls
//!
//! ```ignore
//! use crate::ai::timeout::with_timeout;
//!
//! let response = with_timeout(
//!     Duration::from_secs(120),
//!     provider.generate(&prompt),
//!     "describe UartDriver",
//! ).await?;
//! ```

use std::future::Future;
use std::time::Duration;

use crate::constants::enhance::{DEFAULT_TIMEOUT_SECS, RETRY_DELAY_MS};
use crate::types::{IfaceError, Result};

/// Time limits for one enhancement call
#[derive(Debug, Clone, Copy)]
pub struct TimeoutConfig {
    /// Upper bound on a single provider request
    pub request: Duration,
    /// Pause before the single retry of a recoverable failure
    pub retry_delay: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry_delay: Duration::from_millis(RETRY_DELAY_MS),
        }
    }
}

impl TimeoutConfig {
    pub fn from_secs(secs: u64) -> Self {
        Self {
            request: Duration::from_secs(secs),
            ..Self::default()
        }
    }
}

/// Execute an async operation with a timeout
///
/// Returns [`IfaceError::Timeout`] if the operation doesn't complete within
/// `timeout`.
pub async fn with_timeout<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(IfaceError::timeout(operation_name, timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_config_defaults() {
        let config = TimeoutConfig::default();
        assert_eq!(config.request.as_secs(), 120);
        assert_eq!(config.retry_delay.as_millis(), 500);
        assert_eq!(TimeoutConfig::from_secs(5).request.as_secs(), 5);
    }

    #[tokio::test]
    async fn test_with_timeout_success() {
        let result = with_timeout(
            Duration::from_secs(1),
            async { Ok::<_, IfaceError>(42) },
            "test operation",
        )
        .await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_with_timeout_expires() {
        let result = with_timeout(
            Duration::from_millis(10),
            async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok::<_, IfaceError>(42)
            },
            "slow operation",
        )
        .await;

        let err = result.unwrap_err();
        assert!(matches!(err, IfaceError::Timeout { .. }));
        assert!(err.is_recoverable());
    }
}
