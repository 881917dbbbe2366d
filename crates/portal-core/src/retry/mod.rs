//! Backoff execution engine for fallible async operations
//!
//! Wraps an operation with bounded retry and exponentially growing, jittered
//! delay. The wrapped operation decides what failure means; every failure is
//! retried until the policy's retry budget is spent, and the final failure
//! is returned as-is.
//!
//! # Features
//!
//! - Exponential backoff: `base * factor^(attempt-1)` plus jitter in `[0, base)`
//! - Observable retry attempts via the `RetryObserver` trait
//! - Built-in `TracingObserver` emitting one WARN record per retry
//! - Builder pattern for flexible executor configuration
//! - Stateless executors, safe to share across concurrent calls
//!
//! # Example
//!
//! ```rust,no_run
//! use portal_core::retry::retry_with_policy;
//! use portal_core::types::BackoffPolicy;
//!
//! async fn example() -> Result<String, std::io::Error> {
//!     let policy = BackoffPolicy::default();
//!
//!     retry_with_policy(&policy, || async {
//!         // Your fallible operation here
//!         Ok("success".to_string())
//!     })
//!     .await
//! }
//! ```

mod delay;
mod executor;
mod observer;

pub use delay::calculate_delay;
pub use executor::{retry_with_backoff, retry_with_policy, BackoffExecutor, BackoffExecutorBuilder};
pub use observer::{ChainObserver, NoOpObserver, RetryObserver, StatsObserver, TracingObserver};
