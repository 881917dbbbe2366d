//! # portal-core
//!
//! Core library for the portal providing:
//! - Backoff execution engine for fallible async operations
//! - Revalidation gates deciding whether loader data is stale after an action
//! - Action tag vocabulary shared by route handlers
//! - Layered runtime configuration (portal.yaml)

pub mod config;
pub mod error;
pub mod retry;
pub mod revalidate;
pub mod types;
pub mod utils;

pub use config::ConfigLoader;
pub use error::{Error, Result};
pub use revalidate::RevalidationGate;
pub use types::{ActionDomain, ActionOutcome, ActionType, BackoffPolicy, RuntimeConfig};
pub use utils::get_home_dir;
