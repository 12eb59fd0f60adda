use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Outcome of running a request under the retry policy.
#[derive(Debug)]
pub enum RetryError<E> {
    /// Not worth retrying; returned as soon as it happened.
    Fatal(E),
    /// Still failing after the last allowed attempt.
    AttemptsExceeded(E),
}

/// Exponential backoff for filter store requests.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: if max_delay.is_zero() {
                base_delay
            } else {
                max_delay
            },
        }
    }

    /// Single attempt, no waiting.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO, Duration::ZERO)
    }

    /// Runs `op` until it succeeds, `is_transient` rejects the error, or the
    /// attempts run out.
    pub async fn run<F, Fut, T, E>(
        &self,
        mut op: F,
        is_transient: impl Fn(&E) -> bool,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempt = 0;

        loop {
            match op().await {
                Ok(result) => return Ok(result),
                Err(err) if !is_transient(&err) => return Err(RetryError::Fatal(err)),
                Err(err) => {
                    if attempt + 1 >= self.max_attempts {
                        return Err(RetryError::AttemptsExceeded(err));
                    }

                    let delay = self.backoff_delay(attempt);
                    warn!(
                        "Attempt {} failed: {}. Retrying in {} ms",
                        attempt + 1,
                        err,
                        delay.as_millis()
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    fn backoff_delay(&self, attempt: usize) -> Duration {
        if self.base_delay.is_zero() {
            return Duration::ZERO;
        }

        let factor = 1u128 << attempt.min(6);
        let delay_ms = self.base_delay.as_millis().saturating_mul(factor);
        let capped = delay_ms.min(self.max_delay.as_millis());
        Duration::from_millis(capped as u64)
    }
}
