//! Loading of environment override files from a directory.
//!
//! Every file in the directory is an independent environment document. A
//! file that cannot be read or parsed is logged and skipped; nothing the
//! loader encounters stops the remaining files from loading.

use crate::environment::{Environment, format};
use crate::error::{FormatError, LoadError};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Outcome of loading a directory.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Files merged into the environment, in load order.
    pub loaded: Vec<PathBuf>,
    /// Directory or file failures, in the order they occurred.
    pub failures: Vec<LoadError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Merge every environment file in `dir` into `env`.
pub fn load_directory(dir: &Path, env: &mut Environment) -> LoadReport {
    let mut report = LoadReport::default();

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(source) => {
            let err = LoadError::ListDir {
                dir: dir.to_path_buf(),
                source,
            };
            error!(dir = %dir.display(), error = %err, "Failed to read environment directory");
            report.failures.push(err);
            return report;
        }
    };

    for entry in entries {
        let name = match entry {
            Ok(entry) => entry.file_name(),
            Err(source) => {
                let err = LoadError::ListDir {
                    dir: dir.to_path_buf(),
                    source,
                };
                error!(dir = %dir.display(), error = %err, "Failed to read environment directory entry");
                report.failures.push(err);
                continue;
            }
        };

        match load_file(dir, &name, env) {
            Ok(path) => report.loaded.push(path),
            Err(err) => {
                error!(
                    dir = %dir.display(),
                    file = %name.to_string_lossy(),
                    error = %err,
                    "Failed to load environment file"
                );
                report.failures.push(err);
            }
        }
    }

    report
}

/// Load `dir/name` into `env`, returning the full path on success.
pub fn load_file(dir: &Path, name: impl AsRef<OsStr>, env: &mut Environment) -> Result<PathBuf, LoadError> {
    let name = name.as_ref();
    let path = dir.join(name);

    let text = std::fs::read_to_string(&path).map_err(|source| LoadError::Read {
        dir: dir.to_path_buf(),
        name: name.to_string_lossy().into_owned(),
        source,
    })?;

    info!("Loading {}", path.display());
    let body = parse_environment(&text).map_err(|source| LoadError::Parse {
        dir: dir.to_path_buf(),
        name: name.to_string_lossy().into_owned(),
        source,
    })?;

    env.load(&body);
    Ok(path)
}

fn parse_environment(text: &str) -> Result<serde_json::Value, FormatError> {
    let mut body = format::parse(text)?;
    format::default_for_missing(&mut body);
    Ok(body)
}
