//! CLI configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use subtuber_http::{BASE_URL_ENV, DEFAULT_BASE_PATH, DEFAULT_TIMEOUT};

/// Prefix of nested environment overrides, e.g. `SUBTUBER__API__ORIGIN`
const ENV_PREFIX: &str = "SUBTUBER";

/// Client settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub api: ApiSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Scheme, host and port of the backend
    pub origin: String,

    /// Path prefix of every endpoint, or an absolute base URL
    pub base_path: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Durable storage settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Directory holding `storage.json`; the state data dir when unset
    pub dir: Option<PathBuf>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            origin: "http://127.0.0.1:8080".to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Settings {
    /// Load settings from defaults, an optional file, then the environment.
    ///
    /// An explicit `file` must exist; the default config path is only read
    /// when present.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or parsed
    pub fn load(file: Option<&Path>, default_file: &Path) -> Result<Self> {
        Self::load_with(file, default_file, std::env::var(BASE_URL_ENV).ok())
    }

    /// [`Settings::load`] with the `SUBTUBER_API_BASE_URL` value passed in
    pub fn load_with(
        file: Option<&Path>,
        default_file: &Path,
        base_url_override: Option<String>,
    ) -> Result<Self> {
        let defaults = Self::default();

        let mut builder = config::Config::builder()
            .set_default("api.origin", defaults.api.origin)?
            .set_default("api.base_path", defaults.api.base_path)?
            .set_default("api.timeout_secs", defaults.api.timeout_secs)?;

        builder = match file {
            Some(path) => builder.add_source(config::File::from(path)),
            None => builder.add_source(config::File::from(default_file).required(false)),
        };

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        );

        if let Some(base) = base_url_override.filter(|value| !value.trim().is_empty()) {
            builder = builder.set_override("api.base_path", base)?;
        }

        let settings = builder.build().context("Failed to load configuration")?;
        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("config.toml");

        let settings = Settings::load_with(None, &missing, None).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.api.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_file_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[api]\norigin = \"https://subtuber.example\"\ntimeout_secs = 3\n\n[storage]\ndir = \"/tmp/subtuber\"\n",
        )
        .unwrap();

        let settings = Settings::load_with(Some(&path), &path, None).unwrap();
        assert_eq!(settings.api.origin, "https://subtuber.example");
        assert_eq!(settings.api.base_path, "/api");
        assert_eq!(settings.api.timeout_secs, 3);
        assert_eq!(settings.storage.dir, Some(PathBuf::from("/tmp/subtuber")));
    }

    #[test]
    fn test_base_url_override_wins() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[api]\nbase_path = \"/from-file\"\n").unwrap();

        let settings =
            Settings::load_with(Some(&path), &path, Some("/backend".to_string())).unwrap();
        assert_eq!(settings.api.base_path, "/backend");

        let settings = Settings::load_with(Some(&path), &path, Some("  ".to_string())).unwrap();
        assert_eq!(settings.api.base_path, "/from-file");
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.toml");

        assert!(Settings::load_with(Some(&missing), &missing, None).is_err());
    }
}
