//! Configuration file support for persistent settings.
//!
//! This module provides support for loading configuration from a TOML file
//! located at `~/.config/ilan-dev/config.toml` (or the platform-specific
//! equivalent). Configuration file values serve as defaults that can be
//! overridden by CLI arguments.
//!
//! # Layering
//!
//! The precedence order is: **CLI argument > config file > hardcoded default**.
//!
//! # Example config
//!
//! ```toml
//! [dirs]
//! mode = "both"
//! exclude = ["*.pyc", ".git/**"]
//! verbose = true
//!
//! [cleanup]
//! dry_run = false
//! use_trash = true    # default; set to false for permanent deletion
//! ```

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level configuration file structure.
///
/// All fields are `Option<T>` so we can detect which values are present in the
/// config file and apply layered configuration (CLI > config file > defaults).
#[derive(Deserialize, Default, Debug)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Options for the `dirs` and `cleanup` listings
    #[serde(default)]
    pub dirs: FileDirsConfig,

    /// Options for removing empty directories
    #[serde(default)]
    pub cleanup: FileCleanupConfig,
}

/// Listing and classification options from the configuration file.
#[derive(Deserialize, Default, Debug)]
#[serde(deny_unknown_fields)]
pub struct FileDirsConfig {
    /// Which sets to report (`"empty"`, `"missing"`, `"both"`)
    pub mode: Option<String>,

    /// Glob patterns of entries to leave out of every listing
    pub exclude: Option<Vec<String>>,

    /// Whether to report unreadable entries
    pub verbose: Option<bool>,
}

/// Cleanup options from the configuration file.
#[derive(Deserialize, Default, Debug)]
#[serde(deny_unknown_fields)]
pub struct FileCleanupConfig {
    /// Whether to only report what would be removed
    pub dry_run: Option<bool>,

    /// Whether to move directories to the system trash instead of permanently deleting them.
    /// Defaults to `true` when absent.
    pub use_trash: Option<bool>,
}

impl FileConfig {
    /// Returns the path where the configuration file is expected.
    ///
    /// The configuration file is located at `<config_dir>/ilan-dev/config.toml`,
    /// where `<config_dir>` is the platform-specific configuration directory
    /// (e.g., `~/.config` on Linux, `%APPDATA%` on Windows).
    ///
    /// Returns `None` if the config directory cannot be determined.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ilan-dev").join("config.toml"))
    }

    /// Load configuration from the default config file location.
    ///
    /// If the config file doesn't exist, returns a default (empty) configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file exists but cannot be read
    /// - The config file exists but contains invalid TOML or unexpected fields
    pub fn load() -> anyhow::Result<Self> {
        let Some(path) = Self::config_path() else {
            return Ok(Self::default());
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file at {}: {e}", path.display())
        })?;

        toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file at {}: {e}", path.display())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file_config() {
        let config = FileConfig::default();

        assert!(config.dirs.mode.is_none());
        assert!(config.dirs.exclude.is_none());
        assert!(config.dirs.verbose.is_none());
        assert!(config.cleanup.dry_run.is_none());
        assert!(config.cleanup.use_trash.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[dirs]
mode = "missing"
exclude = ["*.pyc", ".git/**"]
verbose = true

[cleanup]
dry_run = true
use_trash = false
"#;

        let config: FileConfig = toml::from_str(toml_content).unwrap();

        assert_eq!(config.dirs.mode, Some("missing".to_string()));
        assert_eq!(
            config.dirs.exclude,
            Some(vec!["*.pyc".to_string(), ".git/**".to_string()])
        );
        assert_eq!(config.dirs.verbose, Some(true));
        assert_eq!(config.cleanup.dry_run, Some(true));
        assert_eq!(config.cleanup.use_trash, Some(false));
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r"
[cleanup]
use_trash = false
";

        let config: FileConfig = toml::from_str(toml_content).unwrap();

        assert!(config.dirs.mode.is_none());
        assert!(config.cleanup.dry_run.is_none());
        assert_eq!(config.cleanup.use_trash, Some(false));
    }

    #[test]
    fn test_parse_empty_config() {
        let config: FileConfig = toml::from_str("").unwrap();

        assert!(config.dirs.mode.is_none());
        assert!(config.cleanup.use_trash.is_none());
    }

    #[test]
    fn test_malformed_config_errors() {
        let toml_content = r#"
[dirs]
verbose = "yes please"
"#;
        assert!(toml::from_str::<FileConfig>(toml_content).is_err());
    }

    #[test]
    fn test_unknown_field_errors() {
        let toml_content = r"
[cleanup]
shred = true
";
        assert!(toml::from_str::<FileConfig>(toml_content).is_err());
    }

    #[test]
    fn test_config_path_returns_expected_suffix() {
        if let Some(p) = FileConfig::config_path() {
            assert!(p.ends_with("ilan-dev/config.toml"));
        }
    }

    #[test]
    fn test_load_returns_defaults_when_no_file() {
        // Only meaningful on machines without a personal config file.
        if FileConfig::config_path().is_some_and(|p| p.exists()) {
            return;
        }

        let config = FileConfig::load().unwrap();
        assert!(config.dirs.mode.is_none());
        assert!(config.cleanup.use_trash.is_none());
    }
}
