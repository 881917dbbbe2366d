//! Configuration management commands

use anyhow::{Context, Result};
use camino::Utf8Path;
use portal_core::ConfigLoader;

use crate::cli::{ConfigCommands, ConfigShowArgs};
use crate::output;

pub fn run(cmd: ConfigCommands, config: Option<&Utf8Path>) -> Result<()> {
    let mut loader = ConfigLoader::new()?;
    if let Some(path) = config {
        loader = loader.with_file(path);
    }

    match cmd {
        ConfigCommands::Show(args) => show(&loader, args),
        ConfigCommands::Path => {
            println!("{}", loader.user_config_path());
            Ok(())
        }
    }
}

fn show(loader: &ConfigLoader, args: ConfigShowArgs) -> Result<()> {
    let config = loader.load().context("Failed to load runtime config")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let source = loader.user_config_path();
    if source.exists() {
        output::info(&format!("Overlay: {}", source));
    } else {
        output::info("Overlay: none (built-in defaults)");
    }
    print!("{}", serde_yaml_ng::to_string(&config)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use std::io::Write;

    #[test]
    fn test_show_with_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "retry-policies:\n  default:\n    max-retries: 1\n    base-delay-ms: 50\n    factor: 3.0"
        )
        .unwrap();
        let path = Utf8PathBuf::from_path_buf(file.path().to_path_buf()).unwrap();

        let result = run(ConfigCommands::Show(ConfigShowArgs { json: true }), Some(&path));
        assert!(result.is_ok());
    }

    #[test]
    fn test_show_with_missing_file() {
        let path = Utf8PathBuf::from("/nonexistent/portal.yaml");
        let result = run(ConfigCommands::Show(ConfigShowArgs { json: false }), Some(&path));
        assert!(result.is_err());
    }
}
