//! CLI command implementations

pub mod backoff;
pub mod config;
pub mod intent;
pub mod revalidate;
pub mod version;
