//! Global resource environment.
//!
//! Builds, once per process, the registry the orchestration engine uses to
//! map resource type names to implementations: resource types contributed by
//! plugin modules, overlaid with the operator's environment override files.

pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod format;
pub mod global;
pub mod loader;
pub mod logging;
pub mod resources;

#[cfg(test)]
mod test_support;

pub use environment::Environment;
pub use global::{global_env, initialise, initialise_with};
pub use loader::load_directory;

#[doc(hidden)]
pub use inventory;
