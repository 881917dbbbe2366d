//! Backoff execution engine
//!
//! This module provides the core retry loop: attempt, compute a jittered
//! exponential delay, sleep, try again. The last failure is handed back to
//! the caller exactly as the operation produced it.

use std::fmt::Display;
use std::future::Future;
use std::time::Instant;

use crate::types::BackoffPolicy;

use super::delay::calculate_delay;
use super::observer::{RetryObserver, TracingObserver};

/// Execute an async operation with the default backoff policy
///
/// Three retries, 100ms base delay, factor 2, with jitter. Each retry is
/// logged at WARN level.
///
/// # Example
///
/// ```rust,no_run
/// use portal_core::retry::retry_with_backoff;
///
/// async fn example() -> Result<String, std::io::Error> {
///     retry_with_backoff(|| async {
///         // Your fallible operation here
///         Ok("success".to_string())
///     })
///     .await
/// }
/// ```
pub async fn retry_with_backoff<F, Fut, T, E>(op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    retry_with_policy(&BackoffPolicy::default(), op).await
}

/// Execute an async operation with retry logic based on a policy
///
/// This is a convenience function for simple retry scenarios. For more
/// control, use `BackoffExecutorBuilder`.
///
/// # Arguments
///
/// * `policy` - The backoff policy to use
/// * `op` - A closure that returns a future representing the operation
///
/// # Returns
///
/// The first successful result, or the error from the final attempt.
pub async fn retry_with_policy<F, Fut, T, E>(policy: &BackoffPolicy, op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    BackoffExecutor::new(policy.clone()).execute(op).await
}

/// Builder for configuring a `BackoffExecutor`
///
/// # Example
///
/// ```rust
/// use portal_core::retry::{BackoffExecutorBuilder, TracingObserver};
/// use portal_core::types::BackoffPolicy;
///
/// let executor = BackoffExecutorBuilder::new()
///     .with_policy(BackoffPolicy::new(5, 250, 2.0))
///     .with_observer(TracingObserver::new("cms-request"))
///     .with_jitter(true)
///     .build();
///
/// assert_eq!(executor.policy().max_retries, 5);
/// ```
pub struct BackoffExecutorBuilder<O = TracingObserver> {
    policy: BackoffPolicy,
    observer: O,
    jitter: bool,
}

impl Default for BackoffExecutorBuilder<TracingObserver> {
    fn default() -> Self {
        Self::new()
    }
}

impl BackoffExecutorBuilder<TracingObserver> {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            policy: BackoffPolicy::default(),
            observer: TracingObserver::default(),
            jitter: true,
        }
    }
}

impl<O> BackoffExecutorBuilder<O> {
    /// Set the backoff policy
    pub fn with_policy(mut self, policy: BackoffPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the observer
    ///
    /// The observer receives callbacks during execution.
    pub fn with_observer<O2>(self, observer: O2) -> BackoffExecutorBuilder<O2> {
        BackoffExecutorBuilder {
            policy: self.policy,
            observer,
            jitter: self.jitter,
        }
    }

    /// Enable or disable jitter
    ///
    /// Enabled by default. Disabling it makes delays deterministic.
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Build the executor
    pub fn build(self) -> BackoffExecutor<O> {
        BackoffExecutor {
            policy: self.policy,
            observer: self.observer,
            jitter: self.jitter,
        }
    }
}

/// Retries a fallible async operation with exponential backoff
///
/// Holds no mutable state, so a single executor can drive any number of
/// concurrent operations. Use `BackoffExecutorBuilder` for custom observers.
#[derive(Debug, Clone)]
pub struct BackoffExecutor<O = TracingObserver> {
    policy: BackoffPolicy,
    observer: O,
    jitter: bool,
}

impl BackoffExecutor<TracingObserver> {
    /// Create an executor for `policy` that logs retries via `tracing`
    pub fn new(policy: BackoffPolicy) -> Self {
        BackoffExecutorBuilder::new().with_policy(policy).build()
    }
}

impl<O> BackoffExecutor<O> {
    /// The policy this executor applies
    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    /// The observer receiving execution events
    pub fn observer(&self) -> &O {
        &self.observer
    }
}

impl<O> BackoffExecutor<O>
where
    O: RetryObserver,
{
    /// Execute an operation with retry logic
    ///
    /// Every error is retried until `max_retries` retries have been spent;
    /// the error of the final attempt is returned unchanged.
    ///
    /// # Arguments
    ///
    /// * `op` - A closure that returns a future representing the operation
    pub async fn execute<F, Fut, T, E>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let start = Instant::now();
        let max_attempts = self.policy.max_attempts();
        let mut attempt: u32 = 1;

        loop {
            self.observer.on_attempt_start(attempt, max_attempts);

            match op().await {
                Ok(result) => {
                    self.observer.on_success(attempt, start.elapsed());
                    return Ok(result);
                }
                Err(err) => {
                    if attempt > self.policy.max_retries {
                        return Err(err);
                    }

                    let delay = calculate_delay(&self.policy, attempt, self.jitter);
                    self.observer.on_retry(attempt, &err, delay);

                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }

                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::observer::StatsObserver;
    use std::io;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn test_policy(max_retries: u32) -> BackoffPolicy {
        BackoffPolicy::new(max_retries, 1, 2.0)
    }

    #[tokio::test]
    async fn test_immediate_success() {
        let observer = Arc::new(StatsObserver::new());

        let result: Result<&str, io::Error> = BackoffExecutorBuilder::new()
            .with_policy(test_policy(3))
            .with_observer(observer.clone())
            .build()
            .execute(|| async { Ok("success") })
            .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(observer.attempt_starts(), 1);
        assert_eq!(observer.successes(), 1);
        assert_eq!(observer.retries(), 0);
    }

    #[tokio::test]
    async fn test_success_after_retry() {
        let observer = Arc::new(StatsObserver::new());
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();

        let result: Result<&str, io::Error> = BackoffExecutorBuilder::new()
            .with_policy(test_policy(3))
            .with_observer(observer.clone())
            .with_jitter(false)
            .build()
            .execute(|| {
                let attempts = attempts_clone.clone();
                async move {
                    let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                    if attempt < 2 {
                        Err(io::Error::new(io::ErrorKind::TimedOut, "timeout"))
                    } else {
                        Ok("success")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert_eq!(observer.retries(), 1);
        assert_eq!(observer.successes(), 1);
    }

    #[tokio::test]
    async fn test_exhaustion_returns_last_error() {
        let observer = Arc::new(StatsObserver::new());

        let result: Result<&str, io::Error> = BackoffExecutorBuilder::new()
            .with_policy(test_policy(2))
            .with_observer(observer.clone())
            .build()
            .execute(|| async { Err(io::Error::new(io::ErrorKind::TimedOut, "always fails")) })
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
        assert_eq!(err.to_string(), "always fails");
        assert_eq!(observer.attempt_starts(), 3);
        assert_eq!(observer.retries(), 2);
        assert_eq!(observer.successes(), 0);
    }

    #[tokio::test]
    async fn test_zero_retries_single_attempt() {
        let observer = Arc::new(StatsObserver::new());

        let result: Result<&str, io::Error> = BackoffExecutorBuilder::new()
            .with_policy(test_policy(0))
            .with_observer(observer.clone())
            .build()
            .execute(|| async { Err(io::Error::other("error")) })
            .await;

        assert!(result.is_err());
        assert_eq!(observer.attempt_starts(), 1);
        assert_eq!(observer.retries(), 0);
    }

    #[tokio::test]
    async fn test_retry_with_policy_convenience() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();

        let result = retry_with_policy(&test_policy(3), || {
            let attempts = attempts_clone.clone();
            async move {
                let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                if attempt < 3 {
                    Err(io::Error::new(io::ErrorKind::TimedOut, "timeout"))
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_builder_defaults() {
        let executor = BackoffExecutorBuilder::new().build();
        assert_eq!(executor.policy(), &BackoffPolicy::default());
        assert_eq!(executor.observer().operation(), "retry");
        assert!(executor.jitter);
    }
}
