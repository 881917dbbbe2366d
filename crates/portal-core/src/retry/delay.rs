//! Backoff delay computation
//!
//! The delay before retry `a` (1-indexed) is `base * factor^(a-1)` plus a
//! uniform jitter drawn from `[0, jitter_span)`.

use crate::types::BackoffPolicy;
use rand::Rng;
use std::time::Duration;

const NANOS_PER_MILLI: u64 = 1_000_000;

/// Calculate the delay before the next retry attempt
///
/// # Arguments
///
/// * `policy` - The backoff policy containing timing parameters
/// * `attempt` - The attempt that just failed (1-indexed)
/// * `jitter` - Whether to add random jitter to the delay
///
/// # Returns
///
/// The duration to wait before the next attempt. Delays too large to
/// represent saturate instead of panicking.
///
/// # Example
///
/// ```rust
/// use portal_core::retry::calculate_delay;
/// use portal_core::types::BackoffPolicy;
///
/// let policy = BackoffPolicy::new(3, 100, 2.0);
///
/// assert_eq!(calculate_delay(&policy, 1, false).as_millis(), 100);
/// assert_eq!(calculate_delay(&policy, 3, false).as_millis(), 400);
///
/// let jittered = calculate_delay(&policy, 2, true).as_millis();
/// assert!((200..300).contains(&jittered));
/// ```
pub fn calculate_delay(policy: &BackoffPolicy, attempt: u32, jitter: bool) -> Duration {
    let base_nanos = exponential_nanos(policy, attempt);

    let span_nanos = policy.jitter_span_ms().saturating_mul(NANOS_PER_MILLI);
    let jitter_nanos = if jitter && span_nanos > 0 {
        rand::rng().random_range(0..span_nanos)
    } else {
        0
    };

    Duration::from_nanos(base_nanos.saturating_add(jitter_nanos))
}

/// Deterministic part of the delay, `base * factor^(attempt-1)`, in nanoseconds
fn exponential_nanos(policy: &BackoffPolicy, attempt: u32) -> u64 {
    let exponent = attempt.saturating_sub(1);
    let multiplier = policy.factor.powf(f64::from(exponent));
    let nanos = policy.base_delay_ms as f64 * NANOS_PER_MILLI as f64 * multiplier;

    if nanos >= u64::MAX as f64 {
        u64::MAX
    } else {
        // NaN and negatives cast to 0
        nanos as u64
    }
}
