//! Bounded exponential backoff for read-only lookups.
//!
//! Writes are never retried; only idempotent reads such as the
//! fulfillment-order lookup after order creation go through here.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Backoff schedule: `max_attempts` tries, sleeping `initial_delay`,
/// `initial_delay * multiplier`, ... between them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt, in milliseconds on the wire.
    #[serde(
        rename = "initial_delay_ms",
        serialize_with = "serialize_millis",
        deserialize_with = "deserialize_millis"
    )]
    pub initial_delay: Duration,
    /// Growth factor applied to each subsequent delay.
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_secs(3),
            multiplier: 1.5,
        }
    }
}

impl RetryPolicy {
    /// A policy that tries once and never sleeps.
    #[must_use]
    pub const fn once() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
            multiplier: 1.0,
        }
    }

    /// Delay before attempt `attempt + 1` (zero-based `attempt` after the first try).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let factor = self.multiplier.max(1.0).powi(exponent);
        self.initial_delay.mul_f64(factor)
    }

    /// The sleeps between attempts; `max_attempts - 1` of them.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        (0..self.max_attempts.saturating_sub(1)).map(|attempt| self.delay_for(attempt))
    }

    /// Sum of all sleeps if every attempt is used.
    #[must_use]
    pub fn total_delay(&self) -> Duration {
        self.delays().sum()
    }
}

fn serialize_millis<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
}

fn deserialize_millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    u64::deserialize(deserializer).map(Duration::from_millis)
}

/// Run `operation` until `accept` approves its value or the policy is exhausted.
///
/// Returns the first accepted `Ok`. When every attempt is used up, returns the
/// last outcome as-is: an unaccepted value or the final error. Errors on
/// earlier attempts are logged and retried.
pub async fn retry_until<T, E, F, Fut, A>(
    policy: &RetryPolicy,
    mut operation: F,
    accept: A,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    A: Fn(&T) -> bool,
    E: std::fmt::Display,
{
    let mut delays = policy.delays();
    let mut attempt: u32 = 1;
    loop {
        let outcome = operation().await;
        let accepted = matches!(&outcome, Ok(value) if accept(value));
        if accepted {
            return outcome;
        }

        let Some(delay) = delays.next() else {
            return outcome;
        };

        match &outcome {
            Ok(_) => tracing::debug!(attempt, ?delay, "Result not ready, retrying"),
            Err(e) => tracing::warn!(attempt, ?delay, error = %e, "Attempt failed, retrying"),
        }
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
