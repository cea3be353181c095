//! Retry policy as a pure function.
//!
//! [`decide_next_action`] maps `(attempt, outcome)` to what the client
//! should do next. It never sleeps and never performs I/O; the random
//! jitter is passed in, so backoff math is testable without a clock.
//!
//! ```text
//! Idle ─▶ Attempting(1) ─┬─▶ Success
//!                        ├─▶ Attempting(2) ─▶ … ─▶ Attempting(max)
//!                        └─▶ Failed
//! ```

use crate::error::{AttemptError, SummarizeError};
use rand::Rng;

/// Bounded exponential backoff with uniform jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    pub backoff_base_ms: u64,
    pub max_jitter_ms: u64,
    /// Treat a success response without summary text as retryable.
    pub retry_malformed: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff_base_ms: 1000,
            max_jitter_ms: 1000,
            retry_malformed: false,
        }
    }
}

/// What the client does after an attempt.
#[derive(Debug)]
pub enum NextAction {
    /// Wait `delay_ms`, then try again.
    Retry { delay_ms: u64 },
    /// Done: the summary text.
    Succeed(String),
    /// Done: give up with this error.
    Fail(SummarizeError),
}

impl RetryPolicy {
    /// Wait after the failed attempt with 0-based index `attempt`:
    /// `2^attempt * backoff_base_ms + jitter_ms`.
    pub fn delay_ms(&self, attempt: u32, jitter_ms: u64) -> u64 {
        2u64.saturating_pow(attempt)
            .saturating_mul(self.backoff_base_ms)
            .saturating_add(jitter_ms)
    }

    /// Draw a jitter value uniformly from `0..=max_jitter_ms`.
    pub fn sample_jitter(&self) -> u64 {
        if self.max_jitter_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=self.max_jitter_ms)
        }
    }

    fn is_retryable(&self, error: &AttemptError) -> bool {
        match error {
            AttemptError::Malformed(_) => self.retry_malformed,
            _ => true,
        }
    }
}

/// Decide what follows the attempt with 0-based index `attempt`.
pub fn decide_next_action(
    policy: &RetryPolicy,
    attempt: u32,
    outcome: Result<String, AttemptError>,
    jitter_ms: u64,
) -> NextAction {
    let error = match outcome {
        Ok(text) => return NextAction::Succeed(text),
        Err(e) => e,
    };

    let attempts_used = attempt + 1;
    if !policy.is_retryable(&error) {
        return NextAction::Fail(match error {
            AttemptError::Malformed(detail) => SummarizeError::MalformedResponse { detail },
            other => SummarizeError::RetriesExhausted {
                attempts: attempts_used,
                last_error: other,
            },
        });
    }

    if attempts_used < policy.max_attempts {
        NextAction::Retry {
            delay_ms: policy.delay_ms(attempt, jitter_ms),
        }
    } else {
        NextAction::Fail(SummarizeError::RetriesExhausted {
            attempts: attempts_used,
            last_error: error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> RetryPolicy {
        RetryPolicy::default()
    }

    #[test]
    fn delay_doubles_per_attempt() {
        let p = policy();
        assert_eq!(p.delay_ms(0, 0), 1000);
        assert_eq!(p.delay_ms(1, 0), 2000);
        assert_eq!(p.delay_ms(2, 250), 4250);
        assert_eq!(p.delay_ms(3, 1000), 9000);
    }

    #[test]
    fn delay_saturates() {
        assert_eq!(policy().delay_ms(200, 5), u64::MAX);
    }

    #[test]
    fn jitter_stays_in_range() {
        let p = policy();
        for _ in 0..200 {
            assert!(p.sample_jitter() <= 1000);
        }
        let none = RetryPolicy {
            max_jitter_ms: 0,
            ..p
        };
        assert_eq!(none.sample_jitter(), 0);
    }

    #[test]
    fn success_is_terminal() {
        match decide_next_action(&policy(), 3, Ok("done".into()), 0) {
            NextAction::Succeed(t) => assert_eq!(t, "done"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn rate_limit_retries_until_budget() {
        let p = policy();
        for attempt in 0..4 {
            match decide_next_action(&p, attempt, Err(AttemptError::RateLimited), 7) {
                NextAction::Retry { delay_ms } => {
                    assert_eq!(delay_ms, (1000u64 << attempt) + 7)
                }
                other => panic!("attempt {attempt}: unexpected {other:?}"),
            }
        }
        match decide_next_action(&p, 4, Err(AttemptError::RateLimited), 7) {
            NextAction::Fail(e) => {
                let msg = e.to_string();
                assert!(msg.contains("after 5 attempts"), "got: {msg}");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn server_and_network_errors_retry_like_throttling() {
        let p = policy();
        for err in [
            AttemptError::http_status(503, "overloaded"),
            AttemptError::Transport("connection reset".into()),
            AttemptError::Decode("expected value".into()),
        ] {
            assert!(matches!(
                decide_next_action(&p, 0, Err(err), 0),
                NextAction::Retry { delay_ms: 1000 }
            ));
        }
    }

    #[test]
    fn malformed_is_terminal_by_default() {
        match decide_next_action(&policy(), 0, Err(AttemptError::Malformed("no candidates".into())), 0) {
            NextAction::Fail(SummarizeError::MalformedResponse { detail }) => {
                assert_eq!(detail, "no candidates")
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn malformed_retries_when_enabled() {
        let p = RetryPolicy {
            retry_malformed: true,
            ..policy()
        };
        assert!(matches!(
            decide_next_action(&p, 1, Err(AttemptError::Malformed("x".into())), 0),
            NextAction::Retry { delay_ms: 2000 }
        ));
        match decide_next_action(&p, 4, Err(AttemptError::Malformed("x".into())), 0) {
            NextAction::Fail(SummarizeError::RetriesExhausted { attempts, last_error }) => {
                assert_eq!(attempts, 5);
                assert_eq!(last_error, AttemptError::Malformed("x".into()));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn single_attempt_policy_never_retries() {
        let p = RetryPolicy {
            max_attempts: 1,
            ..policy()
        };
        assert!(matches!(
            decide_next_action(&p, 0, Err(AttemptError::RateLimited), 0),
            NextAction::Fail(SummarizeError::RetriesExhausted { attempts: 1, .. })
        ));
    }
}
