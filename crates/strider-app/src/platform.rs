//! Directory resolution for config and log files.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors while resolving or creating application directories.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The OS did not provide a configuration directory.
    #[error("could not determine OS configuration directory")]
    NoConfigDir,
    /// Directory creation failed.
    #[error("platform I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Where Strider keeps `config.ron` and its log files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDirs {
    /// Holds `config.ron`.
    pub config_dir: PathBuf,
    /// Holds the rolling log file.
    pub log_dir: PathBuf,
}

const APP_NAME: &str = "strider";

impl PlatformDirs {
    /// Resolves the OS-conventional directories without touching the disk.
    ///
    /// Logs go under the local data directory when the OS has one, and next
    /// to the config otherwise.
    pub fn resolve() -> Result<Self, PlatformError> {
        let config_dir = dirs::config_dir()
            .ok_or(PlatformError::NoConfigDir)?
            .join(APP_NAME);
        let log_dir = dirs::data_local_dir()
            .map(|base| base.join(APP_NAME))
            .unwrap_or_else(|| config_dir.clone())
            .join("logs");
        Ok(Self { config_dir, log_dir })
    }

    /// Puts everything under `root`. Used for `--config` and in tests.
    pub fn with_root(root: &Path) -> Self {
        Self {
            config_dir: root.to_path_buf(),
            log_dir: root.join("logs"),
        }
    }

    /// Resolves from an optional override and creates the directories.
    pub fn resolve_and_create(root: Option<&Path>) -> Result<Self, PlatformError> {
        let dirs = match root {
            Some(root) => Self::with_root(root),
            None => Self::resolve()?,
        };
        dirs.create_dirs()?;
        Ok(dirs)
    }

    /// Creates both directories if they do not exist.
    pub fn create_dirs(&self) -> Result<(), PlatformError> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}
