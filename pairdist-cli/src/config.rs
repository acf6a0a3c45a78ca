//! Configuration handling for the pairdist CLI
//!
//! Supports loading configuration from pairdist.toml files with CLI argument overrides.

use anyhow::{Context, Result};
use pairdist_core::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Number of leading records to load from the FASTA file
    #[serde(default = "default_limit")]
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Print a JSON report instead of the text grid
    #[serde(default)]
    pub json: bool,

    /// Print the midline and statistics for a selected cell
    #[serde(default = "default_true")]
    pub show_alignment: bool,
}

// Default value functions
fn default_limit() -> usize { 10 }
fn default_true() -> bool { true }

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json: false,
            show_alignment: true,
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                // Try to find pairdist.toml in current directory
                let default_path = PathBuf::from("pairdist.toml");
                if default_path.exists() {
                    log::info!("Loading configuration from: pairdist.toml");
                    Self::load_from_file(&default_path)?
                } else {
                    log::info!("Using default configuration");
                    Self::default()
                }
            }
        };

        config
            .engine
            .validate()
            .context("Invalid [engine] configuration")?;
        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }

    /// Generate example configuration file content
    pub fn example_toml() -> Result<String> {
        toml::to_string_pretty(&Self::default()).context("Failed to serialize default configuration")
    }

    /// Flags given on the command line win over the file.
    pub fn apply_overrides(&mut self, limit: Option<usize>, parallel: bool, json: bool) {
        if let Some(limit) = limit {
            self.input.limit = limit;
        }
        self.engine.parallel |= parallel;
        self.output.json |= json;
    }
}
