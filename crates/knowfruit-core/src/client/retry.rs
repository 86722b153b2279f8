//! Retry utilities for transient inference failures.
//!
//! The classifier client never retries by itself. Callers that want retries
//! use these helpers to classify errors and compute backoff.

use crate::error::PipelineError;
use std::time::Duration;

/// Determine whether a pipeline error is worth retrying.
///
/// Retryable errors: timeouts, rate limits (429), server errors (5xx),
/// transport failures. Non-retryable: bad uploads, auth failures, error
/// payloads on successful responses.
pub fn is_retryable(error: &PipelineError) -> bool {
    match error {
        PipelineError::Timeout { .. } => true,
        PipelineError::Inference { status_code, .. } => match status_code {
            Some(code) => *code == 429 || (500..=599).contains(code),
            // No status means the request never got an HTTP answer
            None => true,
        },
        _ => false,
    }
}

/// Calculate exponential backoff duration for a given attempt.
///
/// Uses `base_delay * 2^attempt` with a cap at 30 seconds.
pub fn backoff_duration(attempt: u32, base_delay_ms: u64) -> Duration {
    let delay = base_delay_ms.saturating_mul(2u64.saturating_pow(attempt));
    Duration::from_millis(delay.min(30_000))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inference(status_code: Option<u16>) -> PipelineError {
        PipelineError::Inference {
            message: "failed".to_string(),
            status_code,
        }
    }

    #[test]
    fn test_timeout_is_retryable() {
        let err = PipelineError::Timeout {
            stage: "classify".to_string(),
            timeout_ms: 30000,
        };
        assert!(is_retryable(&err));
    }

    #[test]
    fn test_rate_limit_is_retryable() {
        assert!(is_retryable(&inference(Some(429))));
    }

    #[test]
    fn test_server_error_is_retryable() {
        assert!(is_retryable(&inference(Some(503))));
    }

    #[test]
    fn test_transport_error_is_retryable() {
        assert!(is_retryable(&inference(None)));
    }

    #[test]
    fn test_auth_error_not_retryable() {
        assert!(!is_retryable(&inference(Some(401))));
    }

    #[test]
    fn test_error_payload_on_ok_not_retryable() {
        assert!(!is_retryable(&inference(Some(200))));
    }

    #[test]
    fn test_decode_error_not_retryable() {
        let err = PipelineError::Decode {
            message: "invalid header".to_string(),
        };
        assert!(!is_retryable(&err));
    }

    #[test]
    fn test_backoff_exponential() {
        assert_eq!(backoff_duration(0, 1000), Duration::from_millis(1000));
        assert_eq!(backoff_duration(1, 1000), Duration::from_millis(2000));
        assert_eq!(backoff_duration(2, 1000), Duration::from_millis(4000));
        assert_eq!(backoff_duration(3, 1000), Duration::from_millis(8000));
    }

    #[test]
    fn test_backoff_capped_at_30s() {
        assert_eq!(backoff_duration(10, 1000), Duration::from_millis(30_000));
    }
}
