//! The process-wide global environment.
//!
//! The global environment is built once, on first use: built-in plugin
//! modules are registered, then external plugin modules (which win on name
//! collisions), then the operator's environment files are merged on top.
//! After that it is shared by `&'static` reference for the rest of the
//! process and never rebuilt.

use crate::config::{Config, ConfigLoader};
use crate::environment::Environment;
use crate::loader::{LoadReport, load_directory};
use crate::resources::{BuiltinModules, CollectReport, ModuleSource, collect, create_subpackage};
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::{info, warn};

/// Parent package external plugin modules are packaged under.
pub const ENGINE_PACKAGE: &str = "engine";

/// Lazily built environment with a one-way uninitialised → initialised
/// transition.
///
/// Concurrent first calls to [`get_or_init_with`](Self::get_or_init_with)
/// run the builder exactly once; the other callers block until it finishes.
#[derive(Debug, Default)]
pub struct GlobalEnvironment {
    cell: OnceLock<Environment>,
}

impl GlobalEnvironment {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// The environment, if it has been built.
    pub fn get(&self) -> Option<&Environment> {
        self.cell.get()
    }

    pub fn is_initialised(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Return the environment, building it with `build` if this is the first call.
    pub fn get_or_init_with<F>(&self, build: F) -> &Environment
    where
        F: FnOnce() -> Environment,
    {
        self.cell.get_or_init(build)
    }
}

/// Outcome of building an environment.
#[derive(Debug, Default)]
pub struct BootstrapReport {
    pub builtin: CollectReport,
    pub plugins: CollectReport,
    pub files: LoadReport,
}

/// Builds an environment from two module sources and an override directory.
pub struct EnvironmentBuilder {
    builtin: Box<dyn ModuleSource>,
    plugins: Box<dyn ModuleSource>,
    environment_dir: PathBuf,
}

impl EnvironmentBuilder {
    pub fn new(
        builtin: Box<dyn ModuleSource>,
        plugins: Box<dyn ModuleSource>,
        environment_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            builtin,
            plugins,
            environment_dir: environment_dir.into(),
        }
    }

    /// Built-in modules, the configured plugin directories and environment directory.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Box::new(BuiltinModules),
            Box::new(create_subpackage(&config.engine.plugin_dirs, ENGINE_PACKAGE)),
            config.engine.environment_dir.clone(),
        )
    }

    /// Build the environment and report what went into it.
    pub fn build_with_report(self) -> (Environment, BootstrapReport) {
        let mut env = Environment::new(false);

        info!(source = %self.builtin.describe(), "Loading built-in resource modules");
        let builtin = collect(&mut env, self.builtin.load_modules());

        info!(source = %self.plugins.describe(), "Loading plugin resource modules");
        let plugins = collect(&mut env, self.plugins.load_modules());

        let files = load_directory(&self.environment_dir, &mut env);

        (
            env,
            BootstrapReport {
                builtin,
                plugins,
                files,
            },
        )
    }

    /// Build the environment, logging a summary.
    pub fn build(self) -> Environment {
        let environment_dir = self.environment_dir.clone();
        let (env, report) = self.build_with_report();
        info!(
            types = env.registry().len(),
            builtin_registered = report.builtin.registered,
            plugin_registered = report.plugins.registered,
            files_loaded = report.files.loaded.len(),
            failures = report.builtin.failures.len() + report.plugins.failures.len() + report.files.failures.len(),
            environment_dir = %environment_dir.display(),
            "Global environment initialised"
        );
        env
    }
}

static GLOBAL: GlobalEnvironment = GlobalEnvironment::new();

/// The global environment, built on first call.
pub fn global_env() -> &'static Environment {
    initialise()
}

/// Build the global environment from the discovered configuration if it
/// has not been built yet.
pub fn initialise() -> &'static Environment {
    GLOBAL.get_or_init_with(|| {
        let config = match ConfigLoader::load() {
            Ok(loader) => loader.into_config(),
            Err(err) => {
                warn!("Failed to load configuration, using defaults: {:#}", err);
                Config::default()
            }
        };
        EnvironmentBuilder::from_config(&config).build()
    })
}

/// Build the global environment from `config` if it has not been built yet.
///
/// Has no effect once the environment exists, whichever entry point built it.
pub fn initialise_with(config: &Config) -> &'static Environment {
    GLOBAL.get_or_init_with(|| EnvironmentBuilder::from_config(config).build())
}

/// Whether the global environment has been built.
pub fn is_initialised() -> bool {
    GLOBAL.is_initialised()
}
