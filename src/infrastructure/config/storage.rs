use super::app_config::{APP_NAME, APP_ORGANIZATION, APP_QUALIFIER, AppConfig};
use directories::ProjectDirs;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform has no config directory.
    #[error("no platform config directory for reviewfeed")]
    NoConfigDir,
    /// Reading or seeding the file failed.
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    /// Defaults could not be serialized.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Locates, reads and seeds `config.toml`.
pub struct ConfigStore {
    config_dir: PathBuf,
}

impl ConfigStore {
    /// Uses the platform config directory for reviewfeed.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoConfigDir` if the platform has no home directory.
    pub fn new() -> Result<Self, ConfigError> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| Self::at(dirs.config_dir().to_path_buf()))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Uses `config_dir` instead of the platform directory.
    #[must_use]
    pub const fn at(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Path read by [`ConfigStore::load`]: the override if given, else `config.toml`.
    #[must_use]
    pub fn config_path(&self, path_override: Option<&Path>) -> PathBuf {
        path_override.map_or_else(|| self.config_dir.join(CONFIG_FILE_NAME), Path::to_path_buf)
    }

    /// Reads the configuration.
    ///
    /// A missing file is seeded with defaults. A malformed file is left as it
    /// is and defaults are used. Zero or non-finite feed and image settings
    /// fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or seeded.
    pub fn load(&self, path_override: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let path = self.config_path(path_override);

        if !path.exists() {
            info!(path = %path.display(), "No config file, writing defaults");
            let config = AppConfig::default();
            write_atomically(&path, &toml::to_string_pretty(&config)?)?;
            return Ok(config);
        }

        let content = fs::read_to_string(&path)?;
        let mut config = toml::from_str::<AppConfig>(&content).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "Malformed config file, using defaults");
            AppConfig::default()
        });
        repair(&mut config);
        debug!(path = %path.display(), "Config loaded");
        Ok(config)
    }
}

fn repair(config: &mut AppConfig) {
    let defaults = AppConfig::default();
    if config.feed.page_size == 0 {
        warn!("feed.page_size must be positive, using default");
        config.feed.page_size = defaults.feed.page_size;
    }
    if config.feed.visible_rows == 0 {
        warn!("feed.visible_rows must be positive, using default");
        config.feed.visible_rows = defaults.feed.visible_rows;
    }
    if !config.feed.preload_screens.is_finite() || config.feed.preload_screens < 0.0 {
        warn!("feed.preload_screens must be a non-negative number, using default");
        config.feed.preload_screens = defaults.feed.preload_screens;
    }
    if config.images.timeout_secs == 0 {
        warn!("images.timeout_secs must be positive, using default");
        config.images.timeout_secs = defaults.images.timeout_secs;
    }
}

fn write_atomically(path: &Path, content: &str) -> Result<(), ConfigError> {
    let dir = path
        .parent()
        .ok_or_else(|| std::io::Error::other("config path has no parent directory"))?;
    fs::create_dir_all(dir)?;

    let mut staged = tempfile::NamedTempFile::new_in(dir)?;
    staged.write_all(content.as_bytes())?;
    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_seeded_with_defaults() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::at(dir.path().join("reviewfeed"));

        let config = store.load(None).unwrap();
        assert_eq!(config.feed.page_size, 20);
        assert!(store.config_path(None).exists());

        let reloaded = store.load(None).unwrap();
        assert_eq!(reloaded.images.cost_limit_mib, 50);
    }

    #[test]
    fn test_malformed_file_is_kept_and_defaults_used() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::at(dir.path().to_path_buf());
        let path = store.config_path(None);
        fs::write(&path, "images = [").unwrap();

        let config = store.load(None).unwrap();

        assert_eq!(config.feed.page_size, 20);
        assert_eq!(fs::read_to_string(&path).unwrap(), "images = [");
    }

    #[test]
    fn test_override_path_is_read() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::at(dir.path().join("unused"));
        let custom = dir.path().join("custom.toml");
        fs::write(&custom, "[feed]\nvisible_rows = 2\n").unwrap();

        let config = store.load(Some(&custom)).unwrap();

        assert_eq!(config.feed.visible_rows, 2);
        assert!(!dir.path().join("unused").exists());
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::at(dir.path().to_path_buf());
        fs::write(
            store.config_path(None),
            "[feed]\npage_size = 0\nvisible_rows = 0\npreload_screens = -1.0\n\n[images]\ntimeout_secs = 0\ncost_limit_mib = 8\n",
        )
        .unwrap();

        let config = store.load(None).unwrap();

        assert_eq!(config.feed.page_size, 20);
        assert_eq!(config.feed.visible_rows, 6);
        assert!((config.feed.preload_screens - 2.5).abs() < f64::EPSILON);
        assert_eq!(config.images.timeout_secs, 30);
        assert_eq!(config.images.cost_limit_mib, 8);
    }
}
