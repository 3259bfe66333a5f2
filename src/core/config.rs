//! Configuration module for cred-locker
//!
//! Manages user configuration for the interactive shell and logging.
//! Configuration is stored in `~/.config/.cred-locker/config.toml`, or in the
//! directory named by `CRED_LOCKER_CONFIG_DIR`.
//!
//! Credentials themselves are never written here: the store is memory only.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV_VAR: &str = "CRED_LOCKER_CONFIG_DIR";

const CONFIG_FILE: &str = "config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Interactive shell behaviour
    pub shell: ShellSettings,

    /// Log output settings
    pub logging: LoggingSettings,
}

/// Settings for the interactive shell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellSettings {
    /// Read passwords and code words without echo when stdin is a terminal
    pub hide_secret_input: bool,

    /// Ask before overwriting an existing entry (false = overwrite directly)
    pub confirm_update: bool,
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            hide_secret_input: true,
            confirm_update: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is unset (e.g. "warn", "cred_locker=debug")
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".into(),
        }
    }
}

impl Config {
    /// Load configuration from the given directory
    /// Creates default config if it doesn't exist
    pub fn load(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let config: Config = toml::from_str(&content).unwrap_or_else(|e| {
                eprintln!(
                    "Warning: Failed to parse config.toml: {}. Using defaults.",
                    e
                );
                Config::default()
            });
            Ok(config)
        } else {
            // Create default config file for user reference; the shell runs without it
            let config = Config::default();
            if let Err(e) = config.write_default(config_dir) {
                eprintln!(
                    "Warning: Could not write default config.toml: {:#}. Using defaults.",
                    e
                );
            }
            Ok(config)
        }
    }

    fn write_default(&self, config_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(config_dir)
            .with_context(|| format!("Failed to create {}", config_dir.display()))?;
        self.save(config_dir)
    }

    /// Save configuration to the given directory
    pub fn save(&self, config_dir: &Path) -> Result<()> {
        let config_path = config_dir.join(CONFIG_FILE);
        let content = self.generate_config_with_comments()?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    /// Generate TOML content with helpful comments
    fn generate_config_with_comments(&self) -> Result<String> {
        let toml_content = toml::to_string_pretty(self)?;

        let header = r#"# Cred-Locker Configuration
#
# This file controls the behavior of the cred-locker shell.
# Passwords are kept in memory only and are never written to disk.
#
# [shell]
#   hide_secret_input = false  echoes passwords while typing
#   confirm_update = false     overwrites existing entries without asking
#
# [logging]
#   level accepts any tracing filter directive; RUST_LOG takes precedence

"#;

        Ok(format!("{}{}", header, toml_content))
    }

    /// Get the configuration directory path
    pub fn get_config_dir() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV_VAR)
            && !dir.is_empty()
        {
            return Ok(PathBuf::from(dir));
        }

        let base_dirs = directories::BaseDirs::new()
            .ok_or_else(|| anyhow::anyhow!("Unable to determine user directories"))?;

        #[cfg(unix)]
        let sub_dir = ".cred-locker";
        #[cfg(not(unix))]
        let sub_dir = "cred-locker";

        Ok(base_dirs.config_dir().join(sub_dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.shell.hide_secret_input);
        assert!(config.shell.confirm_update);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_config_save_load() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.shell.confirm_update = false;
        config.logging.level = "debug".into();

        config.save(dir.path()).unwrap();
        let loaded = Config::load(dir.path()).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested");

        let config = Config::load(&nested).unwrap();

        assert_eq!(config, Config::default());
        let written = std::fs::read_to_string(nested.join("config.toml")).unwrap();
        assert!(written.starts_with("# Cred-Locker Configuration"));
        assert!(written.contains("[shell]"));
    }

    #[test]
    fn test_unwritable_config_dir_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, "").unwrap();

        // A regular file cannot hold config.toml
        let config = Config::load(&file.join("cred-locker")).unwrap();

        assert_eq!(config, Config::default());
        assert!(!file.join("cred-locker").exists());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "[shell]\nconfirm_update = false\n",
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();

        assert!(!config.shell.confirm_update);
        assert!(config.shell.hide_secret_input);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_malformed_config_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.toml"), "shell = [not toml").unwrap();

        let config = Config::load(dir.path()).unwrap();

        assert_eq!(config, Config::default());
    }
}
