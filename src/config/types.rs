//! Configuration types.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Operator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Locations the global environment is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory of environment override files merged into the global environment.
    #[serde(default = "default_environment_dir")]
    pub environment_dir: PathBuf,

    /// Directories that enable external plugin modules.
    #[serde(default = "default_plugin_dirs")]
    pub plugin_dirs: Vec<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            environment_dir: default_environment_dir(),
            plugin_dirs: default_plugin_dirs(),
        }
    }
}

fn default_environment_dir() -> PathBuf {
    PathBuf::from("/etc/heat/environment.d")
}

fn default_plugin_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("/usr/lib64/heat"), PathBuf::from("/usr/lib/heat")]
}

impl Config {
    /// Load configuration from a single file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }
}
