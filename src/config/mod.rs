//! Operator configuration.
//!
//! Consolidates configuration from tiers with field-by-field YAML merging:
//! 1. **Defaults** - `Config::default()`
//! 2. **System** - `/etc/resource-env/config.yaml`
//! 3. **User** - `~/.resource-env/config.yaml`
//! 4. **Environment variables**
//!
//! ## Environment Variables
//! - `RESOURCE_ENV_CONFIG_PATH` - Explicit config file (replaces the system and user tiers)
//! - `RESOURCE_ENV_SYSTEM_DIR` - System config dir (default: `/etc/resource-env`)
//! - `RESOURCE_ENV_USER_DIR` - User config dir (default: `~/.resource-env`)
//! - `RESOURCE_ENV_ENVIRONMENT_DIR` - Environment override file directory
//! - `RESOURCE_ENV_PLUGIN_DIRS` - Plugin directories, path-list separated

mod loader;
mod merge;
mod types;

pub use loader::{
    CONFIG_PATH_VAR, ConfigLoader, ConfigPaths, ConfigTier, ENVIRONMENT_DIR_VAR, PLUGIN_DIRS_VAR,
    SYSTEM_DIR_VAR, USER_DIR_VAR,
};
pub use merge::deep_merge;
pub use types::*;
