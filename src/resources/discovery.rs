//! Plugin module discovery.
//!
//! Modules are compiled in and registered by package (see
//! [`plugin_module!`](crate::plugin_module)). A [`ModuleSource`] decides which
//! of them are loaded:
//!
//! - [`BuiltinModules`] loads everything in [`BUILTIN_PACKAGE`].
//! - [`Subpackage`] loads the external plugins enabled in the operator's plugin
//!   directories. A plugin is enabled by a directory entry whose file stem is
//!   the plugin's module name, e.g. `docker.plugin` or `docker.yaml` enables
//!   module `docker`.

use super::{BUILTIN_PACKAGE, PluginModule, find_registration, registrations};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Sub-namespace external plugins are registered under, relative to the
/// parent package passed to [`create_subpackage`].
pub const PLUGINS_SUBPACKAGE: &str = "plugins";

/// Something that yields loaded plugin modules.
pub trait ModuleSource: Send + Sync {
    /// Short description for logs.
    fn describe(&self) -> String;

    /// Load the modules, in registration order.
    fn load_modules(&self) -> Vec<Box<dyn PluginModule>>;
}

/// The modules shipped with the engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinModules;

impl ModuleSource for BuiltinModules {
    fn describe(&self) -> String {
        BUILTIN_PACKAGE.to_string()
    }

    fn load_modules(&self) -> Vec<Box<dyn PluginModule>> {
        registrations(BUILTIN_PACKAGE)
            .into_iter()
            .map(|reg| (reg.load)())
            .collect()
    }
}

/// External plugin package: a namespace plus the directories that enable
/// modules in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subpackage {
    namespace: String,
    search_path: Vec<PathBuf>,
}

/// Package the plugin directories under `{parent}.plugins`.
pub fn create_subpackage<P: AsRef<Path>>(plugin_dirs: &[P], parent: &str) -> Subpackage {
    Subpackage {
        namespace: format!("{}.{}", parent, PLUGINS_SUBPACKAGE),
        search_path: plugin_dirs.iter().map(|p| p.as_ref().to_path_buf()).collect(),
    }
}

impl Subpackage {
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }

    /// Module names enabled by the plugin directories, in search path order
    /// and sorted within each directory, without duplicates.
    pub fn enabled_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for dir in &self.search_path {
            let entries = match std::fs::read_dir(dir) {
                Ok(entries) => entries,
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    debug!(dir = %dir.display(), "Plugin directory does not exist");
                    continue;
                }
                Err(err) => {
                    warn!(dir = %dir.display(), error = %err, "Failed to read plugin directory");
                    continue;
                }
            };

            let mut stems: Vec<String> = entries
                .flatten()
                .filter_map(|entry| {
                    let path = entry.path();
                    path.file_stem().and_then(|s| s.to_str()).map(str::to_string)
                })
                .collect();
            stems.sort();
            for stem in stems {
                if !names.contains(&stem) {
                    names.push(stem);
                }
            }
        }
        names
    }
}

impl ModuleSource for Subpackage {
    fn describe(&self) -> String {
        let dirs: Vec<String> = self
            .search_path
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        format!("{} [{}]", self.namespace, dirs.join(", "))
    }

    fn load_modules(&self) -> Vec<Box<dyn PluginModule>> {
        let mut modules = Vec::new();
        for name in self.enabled_names() {
            match find_registration(&self.namespace, &name) {
                Some(reg) => {
                    debug!(package = %self.namespace, module = %name, "Loading plugin module");
                    modules.push((reg.load)());
                }
                None => debug!(package = %self.namespace, entry = %name, "No plugin module registered for entry"),
            }
        }
        modules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_modules_load_in_name_order() {
        let names: Vec<String> = BuiltinModules
            .load_modules()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["engine.resources.none", "engine.resources.random_string"]
        );
    }

    #[test]
    fn test_create_subpackage_namespace() {
        let pkg = create_subpackage(&["/usr/lib/heat"], "engine");
        assert_eq!(pkg.namespace(), "engine.plugins");
        assert_eq!(pkg.search_path(), &[PathBuf::from("/usr/lib/heat")]);
        assert_eq!(pkg.describe(), "engine.plugins [/usr/lib/heat]");
    }

    #[test]
    fn test_enabled_names_across_dirs() {
        let temp = TempDir::new().unwrap();
        let first = temp.path().join("first");
        let second = temp.path().join("second");
        std::fs::create_dir_all(&first).unwrap();
        std::fs::create_dir_all(&second).unwrap();
        std::fs::write(first.join("docker.plugin"), "").unwrap();
        std::fs::write(second.join("docker.yaml"), "").unwrap();
        std::fs::write(second.join("marconi.plugin"), "").unwrap();

        let pkg = create_subpackage(&[first, second], "engine");
        assert_eq!(pkg.enabled_names(), vec!["docker", "marconi"]);
    }

    #[test]
    fn test_missing_plugin_dir_yields_nothing() {
        let temp = TempDir::new().unwrap();
        let pkg = create_subpackage(&[temp.path().join("missing")], "engine");
        assert!(pkg.enabled_names().is_empty());
        assert!(pkg.load_modules().is_empty());
    }

    #[test]
    fn test_unregistered_entries_skipped() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("not_a_plugin.txt"), "").unwrap();

        let pkg = create_subpackage(&[temp.path()], "engine");
        assert!(pkg.load_modules().is_empty());
    }
}
