//! Configuration loader with tier-based merging.
//!
//! Loads configuration from multiple tiers and merges them field-by-field.

use super::merge::deep_merge_all;
use super::types::Config;
use anyhow::Result;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Explicit configuration file; replaces the system and user tiers.
pub const CONFIG_PATH_VAR: &str = "RESOURCE_ENV_CONFIG_PATH";
pub const SYSTEM_DIR_VAR: &str = "RESOURCE_ENV_SYSTEM_DIR";
pub const USER_DIR_VAR: &str = "RESOURCE_ENV_USER_DIR";
pub const ENVIRONMENT_DIR_VAR: &str = "RESOURCE_ENV_ENVIRONMENT_DIR";
/// Plugin directories in the platform's path-list syntax (`:`-separated on Unix).
pub const PLUGIN_DIRS_VAR: &str = "RESOURCE_ENV_PLUGIN_DIRS";

const CONFIG_FILE: &str = "config.yaml";

/// Configuration tier priority (lowest to highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigTier {
    /// Built-in defaults (lowest priority)
    Defaults = 0,
    /// System-wide config (/etc/resource-env/)
    System = 1,
    /// User-level config (~/.resource-env/)
    User = 2,
    /// Environment variables (highest priority)
    Environment = 3,
}

impl std::fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigTier::Defaults => write!(f, "defaults"),
            ConfigTier::System => write!(f, "system"),
            ConfigTier::User => write!(f, "user"),
            ConfigTier::Environment => write!(f, "environment"),
        }
    }
}

/// Directories for each configuration tier.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// System-wide config directory
    pub system_dir: Option<PathBuf>,
    /// User-level config directory
    pub user_dir: Option<PathBuf>,
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self::discover()
    }
}

impl ConfigPaths {
    /// Discover configuration paths from environment and defaults.
    pub fn discover() -> Self {
        // System dir: RESOURCE_ENV_SYSTEM_DIR or /etc/resource-env
        let system_dir = std::env::var(SYSTEM_DIR_VAR)
            .ok()
            .map(PathBuf::from)
            .or_else(|| Some(PathBuf::from("/etc/resource-env")));

        // User dir: RESOURCE_ENV_USER_DIR or ~/.resource-env
        let user_dir = std::env::var(USER_DIR_VAR)
            .ok()
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".resource-env")));

        Self {
            system_dir,
            user_dir,
        }
    }

    /// Create paths with explicit directories.
    pub fn with_dirs(system_dir: Option<PathBuf>, user_dir: Option<PathBuf>) -> Self {
        Self {
            system_dir,
            user_dir,
        }
    }
}

/// Configuration loader that handles tier-based merging.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Paths for each tier
    pub paths: ConfigPaths,
    /// Loaded configuration
    config: Config,
    /// Highest-priority config file that contributed (if any)
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Load configuration from all tiers with proper merging.
    pub fn load() -> Result<Self> {
        Self::load_with_paths(ConfigPaths::discover())
    }

    /// Load configuration with explicit paths.
    pub fn load_with_paths(paths: ConfigPaths) -> Result<Self> {
        // Check for explicit config path override
        if let Ok(explicit_path) = std::env::var(CONFIG_PATH_VAR) {
            let path = PathBuf::from(&explicit_path);
            let mut config = Config::load(&path)?;
            Self::apply_env_overrides(&mut config);
            return Ok(Self {
                paths,
                config,
                config_path: Some(path),
            });
        }

        let mut configs: Vec<Value> = Vec::new();
        let mut config_path = None;

        // Tier 1: Defaults
        configs.push(serde_json::to_value(Config::default())?);

        // Tier 2: System config
        // Tier 3: User config
        for (tier, dir) in [
            (ConfigTier::System, &paths.system_dir),
            (ConfigTier::User, &paths.user_dir),
        ] {
            let Some(dir) = dir else { continue };
            let config_file = dir.join(CONFIG_FILE);
            if let Some(value) = read_tier_file(tier, &config_file) {
                configs.push(value);
                config_path = Some(config_file);
            }
        }

        // Merge all configs
        let merged = deep_merge_all(configs);
        let mut config: Config = serde_json::from_value(merged)?;

        // Tier 4: Environment variable overrides
        Self::apply_env_overrides(&mut config);

        Ok(Self {
            paths,
            config,
            config_path,
        })
    }

    /// Apply environment variable overrides to config.
    fn apply_env_overrides(config: &mut Config) {
        if let Ok(environment_dir) = std::env::var(ENVIRONMENT_DIR_VAR) {
            config.engine.environment_dir = PathBuf::from(environment_dir);
        }

        if let Some(plugin_dirs) = std::env::var_os(PLUGIN_DIRS_VAR) {
            config.engine.plugin_dirs = std::env::split_paths(&plugin_dirs).collect();
        }
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get mutable access to the configuration.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> Config {
        self.config
    }

    /// Get the config file path that was used.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

/// Read one tier's YAML file. Missing files are normal; unreadable or
/// malformed ones are skipped with a warning.
fn read_tier_file(tier: ConfigTier, path: &Path) -> Option<Value> {
    if !path.exists() {
        debug!(%tier, path = %path.display(), "No config file");
        return None;
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            warn!(%tier, path = %path.display(), error = %err, "Failed to read config file");
            return None;
        }
    };

    match serde_yaml::from_str::<Value>(&content) {
        Ok(Value::Null) => None,
        Ok(value) => Some(value),
        Err(err) => {
            warn!(%tier, path = %path.display(), error = %err, "Failed to parse config file");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_paths_discover() {
        let paths = ConfigPaths::discover();
        assert!(paths.system_dir.is_some());
        // user_dir may or may not exist depending on environment
    }

    #[test]
    fn test_load_defaults_only() {
        // Create empty temp dirs so no config files are found
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths::with_dirs(
            Some(temp.path().join("system")),
            Some(temp.path().join("user")),
        );

        let loader = ConfigLoader::load_with_paths(paths).unwrap();
        assert_eq!(loader.config(), &Config::default());
        assert!(loader.config_path().is_none());
    }

    #[test]
    fn test_system_config_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        let system_dir = temp.path().join("system");
        std::fs::create_dir_all(&system_dir).unwrap();

        let config_content = r#"
engine:
  environment_dir: /srv/environment.d
"#;
        std::fs::write(system_dir.join("config.yaml"), config_content).unwrap();

        let paths = ConfigPaths::with_dirs(Some(system_dir.clone()), Some(temp.path().join("user")));

        let loader = ConfigLoader::load_with_paths(paths).unwrap();
        let config = loader.config();

        assert_eq!(config.engine.environment_dir, PathBuf::from("/srv/environment.d"));
        // plugin_dirs should be default
        assert_eq!(config.engine.plugin_dirs, Config::default().engine.plugin_dirs);
        assert_eq!(loader.config_path(), Some(system_dir.join("config.yaml").as_path()));
    }

    #[test]
    fn test_user_config_overrides_system() {
        let temp = TempDir::new().unwrap();
        let system_dir = temp.path().join("system");
        let user_dir = temp.path().join("user");
        std::fs::create_dir_all(&system_dir).unwrap();
        std::fs::create_dir_all(&user_dir).unwrap();

        let system_config = r#"
engine:
  environment_dir: /srv/system.d
  plugin_dirs: [/opt/plugins]
"#;
        std::fs::write(system_dir.join("config.yaml"), system_config).unwrap();

        let user_config = r#"
engine:
  environment_dir: /home/op/env.d
"#;
        std::fs::write(user_dir.join("config.yaml"), user_config).unwrap();

        let paths = ConfigPaths::with_dirs(Some(system_dir), Some(user_dir));

        let loader = ConfigLoader::load_with_paths(paths).unwrap();
        let config = loader.config();

        assert_eq!(config.engine.environment_dir, PathBuf::from("/home/op/env.d"));
        assert_eq!(config.engine.plugin_dirs, vec![PathBuf::from("/opt/plugins")]);
    }

    #[test]
    fn test_malformed_tier_skipped() {
        let temp = TempDir::new().unwrap();
        let user_dir = temp.path().join("user");
        std::fs::create_dir_all(&user_dir).unwrap();
        std::fs::write(user_dir.join("config.yaml"), "engine: [unclosed").unwrap();

        let paths = ConfigPaths::with_dirs(None, Some(user_dir));

        let loader = ConfigLoader::load_with_paths(paths).unwrap();
        assert_eq!(loader.config(), &Config::default());
    }
}
