//! Configuration loading from kernelcheck.toml
//!
//! kernelcheck configuration can be specified in a `kernelcheck.toml` file in the
//! project root. The configuration is automatically discovered by walking up from
//! the current directory, or passed explicitly with `--config`.
//! Command-line flags always win over values from the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up by [`KernelcheckConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "kernelcheck.toml";

/// kernelcheck configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KernelcheckConfig {
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Module loader configuration
    #[serde(default)]
    pub loader: LoaderConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Runner configuration for the performance phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Timed iterations per callable
    #[serde(default = "default_iterations")]
    pub iterations: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
        }
    }
}

fn default_iterations() -> usize {
    kernelcheck_core::DEFAULT_TIMED_ITERATIONS
}

/// Module loader configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoaderConfig {
    /// Extra challenge roots, appended after the challenge's own root
    #[serde(default)]
    pub search_paths: Vec<PathBuf>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl KernelcheckConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let dir = std::env::current_dir().ok()?;
        Self::discover_from(&dir)
    }

    /// Walk up from `start` looking for `kernelcheck.toml`.
    ///
    /// A file that fails to parse is reported and ignored.
    pub fn discover_from(start: &Path) -> Option<Self> {
        let mut dir = start.to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => {
                        tracing::debug!(path = %config_path.display(), "loaded config");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %config_path.display(),
                            "ignoring invalid config: {}",
                            e
                        );
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# kernelcheck Configuration

[runner]
# Timed iterations per callable in the performance phase
iterations = 100

[loader]
# Extra challenge roots searched after the challenge's own root
search_paths = []

[output]
# Default output format: human, json
format = "human"
"#
        .to_string()
    }
}
