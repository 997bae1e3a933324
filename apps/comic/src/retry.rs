//! Retry policy shared by the outbound HTTP clients.

use std::time::Duration;

use reqwest::StatusCode;

/// Total attempts per call, including the first.
pub const MAX_ATTEMPTS: u32 = 3;

const BASE_DELAY_MS: u64 = 1000;

/// Sleep before `attempt` (0-based): nothing for the first try, then 1s, 2s, ...
pub fn backoff(attempt: u32) -> Option<Duration> {
    attempt
        .checked_sub(1)
        .map(|n| Duration::from_millis(BASE_DELAY_MS << n.min(16)))
}

/// Rate limits and server faults are worth another attempt.
pub fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_after_first_attempt() {
        let delays: Vec<_> = (0..MAX_ATTEMPTS).map(backoff).collect();
        assert_eq!(
            delays,
            vec![None, Some(Duration::from_secs(1)), Some(Duration::from_secs(2))]
        );
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable(StatusCode::BAD_GATEWAY));
        assert!(!is_retryable(StatusCode::BAD_REQUEST));
        assert!(!is_retryable(StatusCode::UNAUTHORIZED));
    }
}
