//! Error types for portal-core

use thiserror::Error;

/// Result type alias using portal-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the portal
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration value or format
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tag is not part of the action vocabulary
    #[error("Unknown action type: {tag}")]
    UnknownActionType { tag: String },

    /// Tag is known but not handled by the route's domain
    #[error("Invalid action type '{tag}' for {domain} actions")]
    InvalidActionType { domain: String, tag: String },

    /// Route domain name is not recognized
    #[error("Unknown action domain: {domain}. Valid domains: asset, chat, content, content-chat, dataset, template, operator, user")]
    UnknownDomain { domain: String },

    /// No revalidation gate is registered under this view name
    #[error("Unknown view: {view}. Valid views: content-detail, content-list")]
    UnknownView { view: String },
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an unknown action type error
    pub fn unknown_action_type(tag: impl Into<String>) -> Self {
        Self::UnknownActionType { tag: tag.into() }
    }

    /// Create an invalid action type error
    pub fn invalid_action_type(domain: impl Into<String>, tag: impl Into<String>) -> Self {
        Self::InvalidActionType {
            domain: domain.into(),
            tag: tag.into(),
        }
    }

    /// Create an unknown domain error
    pub fn unknown_domain(domain: impl Into<String>) -> Self {
        Self::UnknownDomain {
            domain: domain.into(),
        }
    }

    /// Create an unknown view error
    pub fn unknown_view(view: impl Into<String>) -> Self {
        Self::UnknownView { view: view.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_action_type_message() {
        let err = Error::invalid_action_type("dataset", "publish");
        assert_eq!(
            err.to_string(),
            "Invalid action type 'publish' for dataset actions"
        );
    }

    #[test]
    fn test_unknown_domain_is_not_a_config_error() {
        let err = Error::unknown_domain("billing");
        assert!(matches!(err, Error::UnknownDomain { .. }));
        assert!(err.to_string().contains("Unknown action domain: billing"));
    }

    #[test]
    fn test_unknown_view_lists_valid_views() {
        let err = Error::unknown_view("dashboard");
        let msg = err.to_string();
        assert!(msg.contains("dashboard"));
        assert!(msg.contains("content-list"));
    }
}
