//! Error types for environment loading, plugin collection and lookup.
//!
//! None of these escape bootstrap: the loader and the collector record them
//! in their reports and log them, and the global manager only ever publishes
//! whatever subset of registrations succeeded.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Malformed environment file content.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("{0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("environment must be a mapping, got {0}")]
    NotAMapping(&'static str),

    #[error("environment has wrong section \"{0}\"")]
    UnknownSection(String),
}

/// Failure to load one environment file, or to list the directory holding them.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", dir.display())]
    ListDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {}/{name}: {source}", dir.display())]
    Read {
        dir: PathBuf,
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}/{name}: {source}", dir.display())]
    Parse {
        dir: PathBuf,
        name: String,
        #[source]
        source: FormatError,
    },
}

impl LoadError {
    /// File name the error refers to, `None` for directory-level failures.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            LoadError::ListDir { .. } => None,
            LoadError::Read { name, .. } | LoadError::Parse { name, .. } => Some(name),
        }
    }
}

/// Why a plugin module contributed nothing.
#[derive(Debug)]
pub enum PluginFailure {
    /// The mapping function returned an error.
    Error(anyhow::Error),
    /// The mapping function panicked.
    Panic(String),
}

impl fmt::Display for PluginFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginFailure::Error(err) => write!(f, "{:#}", err),
            PluginFailure::Panic(msg) => write!(f, "panicked: {}", msg),
        }
    }
}

/// A plugin module whose resource mapping could not be obtained.
#[derive(Debug, Error)]
#[error("failed to load resources from {module}: {failure}")]
pub struct PluginError {
    pub module: String,
    pub failure: PluginFailure,
}

/// Resource type lookup failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("unknown resource type: {0}")]
    UnknownType(String),

    #[error("resource type {type_name} maps to template {template}, not a class")]
    NotAClass { type_name: String, template: String },

    #[error("resource type alias cycle: {}", .0.join(" -> "))]
    AliasCycle(Vec<String>),

    #[error("resource type alias chain too long: {}", .0.join(" -> "))]
    AliasDepth(Vec<String>),
}
