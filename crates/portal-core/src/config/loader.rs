//! Layered configuration loader
//!
//! Loads runtime configuration from multiple sources with the following
//! precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. User config (~/.portal/portal.yaml), or an explicit file
//! 3. Environment variables (PORTAL_RETRY_* prefix)
//! 4. CLI flags (handled by caller)

use crate::error::{Error, Result};
use crate::types::{RetryPoliciesConfig, RuntimeConfig};
use crate::utils::get_home_dir;
use camino::{Utf8Path, Utf8PathBuf};
use rust_embed::RustEmbed;
use serde::de::DeserializeOwned;
use std::env;
use std::fs;
use std::str::FromStr;

/// Embedded configuration files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../embedded/config/"]
#[prefix = ""]
struct EmbeddedConfigs;

/// Name of the embedded defaults file
const DEFAULTS_FILE: &str = "portal-defaults.yaml";

/// Name of the user config file inside the config directory
const USER_CONFIG_FILE: &str = "portal.yaml";

/// Runtime configuration loader
pub struct ConfigLoader {
    /// Directory holding the user config file
    config_dir: Utf8PathBuf,

    /// Explicit config file, replacing the user config file when set
    config_file: Option<Utf8PathBuf>,
}

impl ConfigLoader {
    /// Create a loader rooted at the standard config directory (~/.portal)
    pub fn new() -> Result<Self> {
        let home = get_home_dir()?;
        let home = Utf8PathBuf::from_path_buf(home)
            .map_err(|p| Error::invalid_config(format!("Non UTF-8 home directory: {}", p.display())))?;

        Ok(Self::with_dir(home.join(".portal")))
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: Utf8PathBuf) -> Self {
        Self {
            config_dir,
            config_file: None,
        }
    }

    /// Read the given file instead of the user config file
    ///
    /// Unlike the user config file, an explicit file must exist.
    pub fn with_file(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Load runtime configuration with layered precedence
    pub fn load(&self) -> Result<RuntimeConfig> {
        let mut config = Self::load_embedded_config::<RuntimeConfig>(DEFAULTS_FILE)?;

        match &self.config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::config_not_found(path.as_str()));
                }
                let file_config = Self::load_yaml_file::<RuntimeConfig>(path)?;
                config = Self::merge_runtime_config(config, file_config);
            }
            None => {
                let user_path = self.user_config_path();
                if user_path.exists() {
                    let file_config = Self::load_yaml_file::<RuntimeConfig>(&user_path)?;
                    config = Self::merge_runtime_config(config, file_config);
                }
            }
        }

        config = Self::apply_env_overrides(config)?;
        config.validate()?;

        tracing::debug!(
            operations = config.retry_policies.operations.len(),
            "loaded runtime config"
        );

        Ok(config)
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    /// Path of the file that overlays the embedded defaults
    pub fn user_config_path(&self) -> Utf8PathBuf {
        self.config_file
            .clone()
            .unwrap_or_else(|| self.config_dir.join(USER_CONFIG_FILE))
    }

    /// Load an embedded configuration file
    fn load_embedded_config<T: DeserializeOwned>(filename: &str) -> Result<T> {
        let embedded_file = EmbeddedConfigs::get(filename).ok_or_else(|| {
            Error::config_not_found(format!("Embedded config not found: {}", filename))
        })?;

        let content = std::str::from_utf8(&embedded_file.data).map_err(|_| {
            Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", filename))
        })?;

        serde_yaml_ng::from_str(content).map_err(|e| {
            Error::invalid_config(format!(
                "Failed to parse embedded config {}: {}",
                filename, e
            ))
        })
    }

    /// Load a YAML file and parse it
    fn load_yaml_file<T: DeserializeOwned>(path: &Utf8Path) -> Result<T> {
        let content = fs::read_to_string(path)?;
        serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))
    }

    /// Merge two runtime configs (base is overridden by overlay)
    fn merge_runtime_config(base: RuntimeConfig, overlay: RuntimeConfig) -> RuntimeConfig {
        RuntimeConfig {
            retry_policies: Self::merge_retry_policies(base.retry_policies, overlay.retry_policies),
        }
    }

    /// Merge retry policies; overlay operations are added to the base map
    fn merge_retry_policies(
        mut base: RetryPoliciesConfig,
        overlay: RetryPoliciesConfig,
    ) -> RetryPoliciesConfig {
        for (key, policy) in overlay.operations {
            base.operations.insert(key, policy);
        }
        base.default = overlay.default;
        base
    }

    /// Apply environment variable overrides to the default policy
    fn apply_env_overrides(mut config: RuntimeConfig) -> Result<RuntimeConfig> {
        let policy = &mut config.retry_policies.default;

        if let Some(val) = env_parse::<u32>("PORTAL_RETRY_MAX_RETRIES")? {
            policy.max_retries = val;
        }

        if let Some(val) = env_parse::<u64>("PORTAL_RETRY_BASE_DELAY_MS")? {
            policy.base_delay_ms = val;
        }

        if let Some(val) = env_parse::<f64>("PORTAL_RETRY_FACTOR")? {
            policy.factor = val;
        }

        if let Some(val) = env_parse::<u64>("PORTAL_RETRY_JITTER_MS")? {
            policy.jitter_ms = Some(val);
        }

        Ok(config)
    }
}

/// Read and parse an environment variable, `None` when unset
fn env_parse<T: FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(val) => val
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::invalid_config(format!("{} must be a valid number", name))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BackoffPolicy;
    use serial_test::serial;
    use tempfile::TempDir;

    fn create_temp_loader() -> (ConfigLoader, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_dir =
            Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).expect("Invalid UTF-8 path");
        let loader = ConfigLoader::with_dir(config_dir);
        (loader, temp_dir)
    }

    #[test]
    #[serial]
    fn test_load_defaults() {
        let (loader, _temp) = create_temp_loader();
        let config = loader.load().unwrap();

        assert_eq!(config.retry_policies.default, BackoffPolicy::default());
        assert!(config.retry_policies.operations.contains_key("session"));
    }

    #[test]
    #[serial]
    fn test_load_user_config_file() {
        let (loader, _temp) = create_temp_loader();

        let config_content = r#"
retry-policies:
  default:
    max-retries: 5
    base-delay-ms: 250
  operations:
    cms-request:
      max-retries: 2
      base-delay-ms: 500
      factor: 3.0
      jitter-ms: 100
"#;
        fs::write(loader.user_config_path(), config_content).unwrap();

        let config = loader.load().unwrap();
        assert_eq!(config.retry_policies.default.max_retries, 5);
        assert_eq!(config.retry_policies.default.base_delay_ms, 250);
        assert_eq!(config.retry_policies.default.factor, 2.0);

        let cms = config.retry_policies.policy_for("cms-request");
        assert_eq!(cms.factor, 3.0);
        assert_eq!(cms.jitter_ms, Some(100));

        // embedded operations survive the merge
        assert!(config.retry_policies.operations.contains_key("session"));
    }

    #[test]
    #[serial]
    fn test_explicit_file_must_exist() {
        let (loader, temp) = create_temp_loader();
        let missing = Utf8PathBuf::from_path_buf(temp.path().join("nope.yaml")).unwrap();

        let err = loader.with_file(missing).load().unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }

    #[test]
    #[serial]
    fn test_explicit_file_replaces_user_file() {
        let (loader, temp) = create_temp_loader();
        fs::write(
            loader.user_config_path(),
            "retry-policies:\n  default:\n    max-retries: 9\n",
        )
        .unwrap();

        let explicit = Utf8PathBuf::from_path_buf(temp.path().join("ci.yaml")).unwrap();
        fs::write(&explicit, "retry-policies:\n  default:\n    max-retries: 1\n").unwrap();

        let config = loader.with_file(explicit).load().unwrap();
        assert_eq!(config.retry_policies.default.max_retries, 1);
    }

    #[test]
    #[serial]
    fn test_invalid_yaml_is_reported_with_path() {
        let (loader, _temp) = create_temp_loader();
        fs::write(loader.user_config_path(), "retry-policies: [not, a, map]").unwrap();

        let err = loader.load().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
        assert!(err.to_string().contains("portal.yaml"));
    }

    #[test]
    #[serial]
    fn test_invalid_factor_rejected() {
        let (loader, _temp) = create_temp_loader();
        fs::write(
            loader.user_config_path(),
            "retry-policies:\n  default:\n    factor: 0.5\n",
        )
        .unwrap();

        let err = loader.load().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        let (loader, _temp) = create_temp_loader();

        env::set_var("PORTAL_RETRY_MAX_RETRIES", "7");
        env::set_var("PORTAL_RETRY_BASE_DELAY_MS", "20");
        env::set_var("PORTAL_RETRY_FACTOR", "1.5");
        env::set_var("PORTAL_RETRY_JITTER_MS", "5");

        let config = loader.load();

        env::remove_var("PORTAL_RETRY_MAX_RETRIES");
        env::remove_var("PORTAL_RETRY_BASE_DELAY_MS");
        env::remove_var("PORTAL_RETRY_FACTOR");
        env::remove_var("PORTAL_RETRY_JITTER_MS");

        let policy = config.unwrap().retry_policies.default;
        assert_eq!(policy.max_retries, 7);
        assert_eq!(policy.base_delay_ms, 20);
        assert_eq!(policy.factor, 1.5);
        assert_eq!(policy.jitter_ms, Some(5));
    }

    #[test]
    #[serial]
    fn test_env_override_not_a_number() {
        let (loader, _temp) = create_temp_loader();

        env::set_var("PORTAL_RETRY_MAX_RETRIES", "many");
        let result = loader.load();
        env::remove_var("PORTAL_RETRY_MAX_RETRIES");

        let err = result.unwrap_err();
        assert!(err.to_string().contains("PORTAL_RETRY_MAX_RETRIES"));
    }

    #[test]
    fn test_merge_keeps_base_operations() {
        let base = RuntimeConfig::default();
        let mut overlay = RuntimeConfig::default();
        overlay.retry_policies.operations.clear();
        overlay
            .retry_policies
            .operations
            .insert("upload".to_string(), BackoffPolicy::new(1, 10, 2.0));
        overlay.retry_policies.default.max_retries = 0;

        let merged = ConfigLoader::merge_runtime_config(base, overlay);
        assert_eq!(merged.retry_policies.default.max_retries, 0);
        assert!(merged.retry_policies.operations.contains_key("session"));
        assert!(merged.retry_policies.operations.contains_key("upload"));
    }
}
