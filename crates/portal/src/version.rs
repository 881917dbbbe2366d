//! Build stamp reported by `portal version`

use serde::Serialize;
use std::fmt;

/// Version and build metadata of the running binary
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    pub version: String,
    pub commit: Option<String>,
    pub build_date: Option<String>,
}

impl VersionInfo {
    /// Stamp baked in by build.rs; commit is absent outside a git checkout
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            commit: option_env!("PORTAL_GIT_SHA").map(String::from),
            build_date: option_env!("PORTAL_BUILD_DATE").map(String::from),
        }
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "portal {}", self.version)?;
        match (&self.commit, &self.build_date) {
            (Some(commit), Some(date)) => write!(f, " ({}, built {})", commit, date),
            (Some(commit), None) => write!(f, " ({})", commit),
            (None, Some(date)) => write!(f, " (built {})", date),
            (None, None) => Ok(()),
        }
    }
}
