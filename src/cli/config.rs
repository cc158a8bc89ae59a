//! TOML configuration file support for repository maintainers.
//!
//! Instead of passing many CLI flags, policy overrides can live in a config
//! file checked into the repository:
//!
//! ```toml
//! # presets.toml
//! [validation]
//! max_file_size = 3145728
//! max_depth = 4
//! root_dir_name = "devices"
//! concurrency = 2
//! strict = false
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use midi_presets::config::ValidationConfig;

/// Root configuration structure for presets.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Validation policy overrides.
    #[serde(default)]
    pub validation: ValidationSection,
}

/// Overrides for the validation policy defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ValidationSection {
    /// Maximum file size in bytes.
    pub max_file_size: Option<u64>,

    /// Maximum directory depth below the root directory.
    pub max_depth: Option<usize>,

    /// Name of the required root directory.
    pub root_dir_name: Option<String>,

    /// Number of parallel validation workers.
    pub concurrency: Option<usize>,

    /// Treat warnings as failures in the exit code.
    pub strict: Option<bool>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Apply the file's overrides on top of the built-in defaults.
    pub fn into_validation_config(self) -> ValidationConfig {
        let mut config = ValidationConfig::default();
        let section = self.validation;

        if let Some(max_file_size) = section.max_file_size {
            config.max_file_size = max_file_size;
        }
        if let Some(max_depth) = section.max_depth {
            config.max_depth = max_depth;
        }
        if let Some(root_dir_name) = section.root_dir_name {
            config.root_dir_name = root_dir_name;
        }
        if let Some(concurrency) = section.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(strict) = section.strict {
            config.strict = strict;
        }

        config
    }
}
