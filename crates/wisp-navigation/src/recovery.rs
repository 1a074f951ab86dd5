//! Recovery from failed and crashed loads
//!
//! Error codes follow the engine's network error numbering (negative,
//! `ERR_ABORTED` = -3). An aborted load is usually a navigation racing the
//! previous one, so it is retried shortly after; other failures stay failed
//! until the user acts.

use std::time::Duration;

pub const ERR_ABORTED: i32 = -3;

/// Toast shown when a content view dies
pub const CRASH_MESSAGE: &str = "Page crashed. Reloading...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryPolicy {
    pub abort_retry_delay: Duration,
    pub crash_reload_delay: Duration,
}

impl RecoveryPolicy {
    pub fn new(abort_retry_delay: Duration, crash_reload_delay: Duration) -> Self {
        Self {
            abort_retry_delay,
            crash_reload_delay,
        }
    }

    /// Delay before reloading after a failed load, if it should be retried at all
    pub fn on_load_failure(&self, error_code: i32) -> Option<Duration> {
        (error_code == ERR_ABORTED).then_some(self.abort_retry_delay)
    }

    pub fn on_crash(&self) -> Duration {
        self.crash_reload_delay
    }
}

impl Default for RecoveryPolicy {
    fn default() -> Self {
        Self::new(Duration::from_millis(100), Duration::from_millis(1000))
    }
}

/// Symbolic name for the common network error codes, for logs
pub fn error_name(error_code: i32) -> &'static str {
    match error_code {
        -2 => "ERR_FAILED",
        ERR_ABORTED => "ERR_ABORTED",
        -6 => "ERR_FILE_NOT_FOUND",
        -7 => "ERR_TIMED_OUT",
        -21 => "ERR_NETWORK_CHANGED",
        -100 => "ERR_CONNECTION_CLOSED",
        -102 => "ERR_CONNECTION_REFUSED",
        -105 => "ERR_NAME_NOT_RESOLVED",
        -106 => "ERR_INTERNET_DISCONNECTED",
        -118 => "ERR_CONNECTION_TIMED_OUT",
        -200 => "ERR_CERT_COMMON_NAME_INVALID",
        -201 => "ERR_CERT_DATE_INVALID",
        -202 => "ERR_CERT_AUTHORITY_INVALID",
        _ => "ERR_UNKNOWN",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aborted_load_is_retried() {
        let policy = RecoveryPolicy::default();
        assert_eq!(
            policy.on_load_failure(ERR_ABORTED),
            Some(Duration::from_millis(100))
        );
    }

    #[test]
    fn test_other_failures_are_not_retried() {
        let policy = RecoveryPolicy::default();
        assert_eq!(policy.on_load_failure(-105), None);
        assert_eq!(policy.on_load_failure(-2), None);
    }

    #[test]
    fn test_crash_reload_delay() {
        let policy = RecoveryPolicy::new(Duration::from_millis(5), Duration::from_secs(2));
        assert_eq!(policy.on_crash(), Duration::from_secs(2));
    }

    #[test]
    fn test_error_names() {
        assert_eq!(error_name(-3), "ERR_ABORTED");
        assert_eq!(error_name(-105), "ERR_NAME_NOT_RESOLVED");
        assert_eq!(error_name(-9999), "ERR_UNKNOWN");
    }
}
