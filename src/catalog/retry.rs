//! Retry policy shared by every catalog request.
//!
//! Rate-limit answers back off exponentially from one second (1s, 2s, ...),
//! network failures retry after a flat delay, and both draw from the same
//! attempt budget. Any other failure is returned on the spot.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use super::CatalogError;

const MAX_ATTEMPTS: u32 = 3;
const RATE_LIMIT_BASE_DELAY: Duration = Duration::from_secs(1);
const NETWORK_RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub rate_limit_base_delay: Duration,
    pub network_retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            rate_limit_base_delay: RATE_LIMIT_BASE_DELAY,
            network_retry_delay: NETWORK_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Delay before the next attempt after `attempt` (zero-based) was rate limited.
    pub fn rate_limit_delay(&self, attempt: u32) -> Duration {
        self.rate_limit_base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Outcome of one failed attempt, classified for the retry loop.
#[derive(Debug)]
pub(crate) enum AttemptFailure {
    RateLimited,
    Network(String),
    Fatal(CatalogError),
}

/// Drive `attempt` until it succeeds, fails fatally, or the budget runs out.
/// The closure receives the zero-based attempt number.
pub(crate) async fn run_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    endpoint: &str,
    mut attempt: F,
) -> Result<T, CatalogError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, AttemptFailure>>,
{
    let mut last = String::from("no attempt made");
    for n in 0..policy.max_attempts {
        let delay = match attempt(n).await {
            Ok(value) => return Ok(value),
            Err(AttemptFailure::Fatal(err)) => return Err(err),
            Err(AttemptFailure::RateLimited) => {
                last = "rate limited (HTTP 429)".to_string();
                policy.rate_limit_delay(n)
            }
            Err(AttemptFailure::Network(msg)) => {
                last = msg;
                policy.network_retry_delay
            }
        };
        if n + 1 < policy.max_attempts {
            warn!(
                endpoint,
                attempt = n + 1,
                wait_ms = delay.as_millis() as u64,
                reason = %last,
                "Catalog request failed, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }
    Err(CatalogError::RetryExhausted {
        attempts: policy.max_attempts,
        last,
    })
}
