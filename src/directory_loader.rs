//! Fault-tolerant loading of definitions from several directories.
//!
//! This module is only available when the `directory-loading` feature is
//! enabled (which is the default).
//!
//! # Overview
//!
//! A [`DirectoryConfig`] lists directories to search for `*.json`
//! definition files; by default only `~/.enumerators/`. Unlike
//! [`DynamicLoader::load_from_directory`], loading from a configuration
//! skips missing directories and keeps going past files that fail, so a
//! single broken file does not hide the rest. Failures are collected in the
//! returned [`LoadReport`].
//!
//! Directories are processed in order, so under
//! [`DuplicateHandling::Override`](crate::DuplicateHandling::Override)
//! definitions from later directories replace those from earlier ones.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::dynamic_loader::json_files_in;
use crate::{DynamicLoader, LoadError};

/// Result of a [`DynamicLoader::load_from_config`] call.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Number of definitions registered.
    pub definitions_loaded: usize,
    /// Files that were loaded without error.
    pub files_processed: Vec<PathBuf>,
    /// Non-fatal errors encountered during loading.
    pub errors: Vec<(PathBuf, LoadError)>,
}

impl LoadReport {
    /// Returns true if any errors occurred during loading.
    pub fn has_errors(&self) -> bool { !self.errors.is_empty() }
}

/// Configuration for loading definitions from directories.
///
/// # Examples
///
/// ```rust
/// use std::path::PathBuf;
///
/// use enumerators::DirectoryConfig;
///
/// // Use only the default directory (~/.enumerators/)
/// let config = DirectoryConfig::default_only();
/// assert_eq!(config.paths().len(), 1);
///
/// // Use custom paths
/// let mut config = DirectoryConfig::with_paths(vec![
///     "/etc/enumerators".into(),
///     "/usr/share/enumerators".into(),
/// ]);
/// config.add_path(PathBuf::from("/opt/enumerators"));
/// assert_eq!(config.paths()[0], PathBuf::from("/etc/enumerators"));
/// assert_eq!(config.paths().len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DirectoryConfig {
    /// Search paths in processing order.
    paths: Vec<PathBuf>,
}

impl DirectoryConfig {
    /// Creates a new empty configuration with no search paths.
    pub fn new() -> Self { Self { paths: Vec::new() } }

    /// Creates configuration with only the default directory
    /// (`~/.enumerators/`).
    pub fn default_only() -> Self {
        Self { paths: vec![Self::default_directory()] }
    }

    /// Creates configuration with custom paths (processed in order).
    pub fn with_paths(paths: Vec<PathBuf>) -> Self { Self { paths } }

    /// Creates configuration with custom paths followed by the default
    /// directory.
    pub fn with_paths_and_default(mut paths: Vec<PathBuf>) -> Self {
        paths.push(Self::default_directory());
        Self { paths }
    }

    /// Returns the default directory: `~/.enumerators/`
    ///
    /// Falls back to `./.enumerators/` if the home directory cannot be
    /// determined.
    pub fn default_directory() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".enumerators")
    }

    pub fn paths(&self) -> &[PathBuf] { &self.paths }

    /// Adds a path after the existing ones.
    pub fn add_path(&mut self, path: PathBuf) { self.paths.push(path); }
}

impl DynamicLoader {
    /// Loads every `*.json` file from the configured directories.
    ///
    /// Missing directories are skipped. A file that fails to load is
    /// recorded in the report and loading continues with the next file;
    /// definitions merged from the failing file before the failure stay
    /// registered.
    pub fn load_from_config(&mut self, config: &DirectoryConfig) -> LoadReport {
        let mut report = LoadReport::default();
        for dir_path in config.paths() {
            self.load_directory_tolerant(dir_path, &mut report);
        }
        report
    }

    fn load_directory_tolerant(&mut self, path: &Path, report: &mut LoadReport) {
        if !path.is_dir() {
            debug!(path = %path.display(), "skipping missing enum directory");
            return;
        }
        let files = match json_files_in(path) {
            Ok(files) => files,
            Err(error) => {
                warn!(path = %path.display(), %error, "cannot read enum directory");
                report.errors.push((path.to_path_buf(), error.into()));
                return;
            }
        };
        for file in files {
            match self.load_from_file(&file) {
                Ok(count) => {
                    report.definitions_loaded += count;
                    report.files_processed.push(file);
                }
                Err(error) => {
                    warn!(%error, "failed to load enum definitions");
                    report.errors.push((file, error));
                }
            }
        }
    }
}
