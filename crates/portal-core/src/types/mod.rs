//! Type definitions for portal actions and runtime configuration

mod action_types;
mod runtime_config;

pub use action_types::*;
pub use runtime_config::*;
