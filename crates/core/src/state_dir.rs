//! Where the CLI keeps its config, session storage and logs

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Environment variable overriding the state directory
pub const STATE_DIR_ENV: &str = "SUBTUBER_STATE_DIR";

/// Root of the on-disk session state.
///
/// An override keeps everything under one directory (`config/`, `data/`);
/// otherwise the platform config and data dirs are used, falling back to
/// the working directory when the platform has none.
pub struct StateDir {
    project_dirs: Option<ProjectDirs>,
    /// `--state-dir` or `SUBTUBER_STATE_DIR`
    override_dir: Option<PathBuf>,
}

impl StateDir {
    /// Platform directories for `subtuber`
    pub fn new() -> Self {
        let project_dirs = ProjectDirs::from("tv", "Subtuber", "subtuber");
        if project_dirs.is_none() {
            warn!("No home directory for subtuber state, using ./config and ./data");
        }
        Self {
            project_dirs,
            override_dir: None,
        }
    }

    /// All state under `path`
    pub fn with_override(path: impl Into<PathBuf>) -> Self {
        Self {
            project_dirs: None,
            override_dir: Some(path.into()),
        }
    }

    /// Resolve from an explicit override, then `SUBTUBER_STATE_DIR`, then the platform
    pub fn resolve(override_dir: Option<PathBuf>) -> Self {
        match override_dir.or_else(|| std::env::var_os(STATE_DIR_ENV).map(PathBuf::from)) {
            Some(dir) => Self::with_override(dir),
            None => Self::new(),
        }
    }

    /// Holds `config.toml`
    pub fn config_dir(&self) -> PathBuf {
        if let Some(override_dir) = &self.override_dir {
            return override_dir.join("config");
        }

        if let Some(project_dirs) = &self.project_dirs {
            project_dirs.config_dir().to_path_buf()
        } else {
            PathBuf::from("./config")
        }
    }

    /// Holds the session storage file and `logs/`
    pub fn data_dir(&self) -> PathBuf {
        if let Some(override_dir) = &self.override_dir {
            return override_dir.join("data");
        }

        if let Some(project_dirs) = &self.project_dirs {
            project_dirs.data_dir().to_path_buf()
        } else {
            PathBuf::from("./data")
        }
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir().join("logs")
    }

    /// Durable key-value file backing the session
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir().join("storage.json")
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir().join("config.toml")
    }

    pub async fn create_directories(&self) -> Result<()> {
        for dir in [self.config_dir(), self.data_dir(), self.log_dir()] {
            tokio::fs::create_dir_all(&dir)
                .await
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
            debug!("Ensured directory exists: {}", dir.display());
        }

        debug!(
            config = %self.config_dir().display(),
            data = %self.data_dir().display(),
            "Using state directories"
        );

        Ok(())
    }
}

impl Default for StateDir {
    fn default() -> Self {
        Self::new()
    }
}
