//! Deadlines and retries around provider calls.
//!
//! Hard calls (geocoding, routing) surface failures as errors; soft calls
//! (water, rain) absorb them into a default and flag the outcome as unchecked.

use floodroute_core::error::{FloodRouteError, Result};
use floodroute_core::models::CheckOutcome;
use std::future::Future;
use std::time::Duration;

/// Deadline and retry budget for hard calls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallPolicy {
    pub timeout: Duration,
    /// Attempts after the first one, for provider errors only
    pub retries: u32,
    /// Linear backoff step: attempt n waits `backoff * n`
    pub backoff: Duration,
}

/// Run `call` under the policy's deadline, retrying provider errors.
///
/// `NotFound`, `NoRouteFound` and other domain answers are returned as-is on
/// the first attempt.
pub async fn hard_call<T, F, Fut>(provider: &str, policy: CallPolicy, mut call: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt: u32 = 0;

    loop {
        let outcome = match tokio::time::timeout(policy.timeout, call()).await {
            Ok(result) => result,
            Err(_) => Err(FloodRouteError::Timeout {
                provider: provider.to_string(),
                seconds: policy.timeout.as_secs(),
            }),
        };

        match outcome {
            Err(err) if err.is_provider_error() && attempt < policy.retries => {
                attempt += 1;
                tracing::warn!(
                    provider = provider,
                    attempt = attempt,
                    max_retries = policy.retries,
                    error = %err,
                    "Provider call failed, retrying"
                );
                tokio::time::sleep(policy.backoff * attempt).await;
            }
            other => return other,
        }
    }
}

/// Run `call` under a deadline, substituting `default` on any failure
pub async fn soft_call<T, Fut>(
    provider: &str,
    timeout: Duration,
    default: T,
    call: Fut,
) -> CheckOutcome<T>
where
    Fut: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(value)) => CheckOutcome::confirmed(value),
        Ok(Err(err)) => {
            tracing::warn!(provider = provider, error = %err, "Check failed, using default");
            CheckOutcome::defaulted(default)
        }
        Err(_) => {
            tracing::warn!(
                provider = provider,
                timeout_ms = timeout.as_millis() as u64,
                "Check timed out, using default"
            );
            CheckOutcome::defaulted(default)
        }
    }
}
