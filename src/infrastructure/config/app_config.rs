//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::infrastructure::image::{DEFAULT_COST_LIMIT, DEFAULT_TIMEOUT_SECS};

pub(super) const APP_NAME: &str = "reviewfeed";
pub(super) const APP_QUALIFIER: &str = "com";
pub(super) const APP_ORGANIZATION: &str = "reviewfeed";

const BYTES_PER_MIB: u64 = 1024 * 1024;

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Converts to tracing level.
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path. Logs go to stderr when unset.
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Reviews source: an http(s) endpoint or a JSON file path.
    #[serde(default)]
    pub source: Option<String>,

    /// Image cache configuration.
    #[serde(default)]
    pub images: ImageConfig,

    /// Feed configuration.
    #[serde(default)]
    pub feed: FeedConfig,
}

/// Image cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Memory budget in MiB.
    #[serde(default = "default_cost_limit_mib")]
    pub cost_limit_mib: u64,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ImageConfig {
    /// Memory budget in bytes.
    #[must_use]
    pub fn cost_limit_bytes(&self) -> usize {
        usize::try_from(self.cost_limit_mib.saturating_mul(BYTES_PER_MIB)).unwrap_or(usize::MAX)
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            cost_limit_mib: default_cost_limit_mib(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Feed configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Reviews requested per page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Stop after this many pages.
    #[serde(default)]
    pub max_pages: Option<usize>,

    /// Rows visible at once; also the size of the reusable row pool.
    #[serde(default = "default_visible_rows")]
    pub visible_rows: usize,

    /// Load the next page once fewer than this many screens remain below the viewport.
    #[serde(default = "default_preload_screens")]
    pub preload_screens: f64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_pages: None,
            visible_rows: default_visible_rows(),
            preload_screens: default_preload_screens(),
        }
    }
}

fn default_cost_limit_mib() -> u64 {
    DEFAULT_COST_LIMIT as u64 / BYTES_PER_MIB
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

const fn default_page_size() -> usize {
    20
}

const fn default_visible_rows() -> usize {
    6
}

const fn default_preload_screens() -> f64 {
    2.5
}

use super::args::CliArgs;

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: CliArgs) {
        if let Some(config_path) = args.config {
            self.config = Some(config_path);
        }
        if let Some(log_path) = args.log_path {
            self.log_path = Some(log_path);
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(source) = args.source {
            self.source = Some(source);
        }
        if let Some(cost_limit_mib) = args.cost_limit_mib {
            self.images.cost_limit_mib = cost_limit_mib;
        }
        if let Some(timeout_secs) = args.timeout_secs {
            self.images.timeout_secs = timeout_secs;
        }
        if let Some(page_size) = args.page_size {
            self.feed.page_size = page_size;
        }
        if let Some(max_pages) = args.max_pages {
            self.feed.max_pages = Some(max_pages);
        }
        if let Some(visible_rows) = args.visible_rows {
            self.feed.visible_rows = visible_rows;
        }
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default config file path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        Self::default_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Returns effective config path.
    #[must_use]
    pub fn effective_config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(Self::default_config_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            source: None,
            images: ImageConfig::default(),
            feed: FeedConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_config_sections() {
        let toml_content = r#"
            log_level = "debug"
            source = "reviews.json"

            [images]
            cost_limit_mib = 8

            [feed]
            page_size = 10
            max_pages = 3
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.source.as_deref(), Some("reviews.json"));
        assert_eq!(config.images.cost_limit_bytes(), 8 * 1024 * 1024);
        assert_eq!(config.images.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.feed.page_size, 10);
        assert_eq!(config.feed.max_pages, Some(3));
        assert_eq!(config.feed.visible_rows, 6);
    }

    #[test]
    fn test_defaults_match_cache_budget() {
        let config = AppConfig::default();

        assert_eq!(config.images.cost_limit_mib, 50);
        assert_eq!(config.images.cost_limit_bytes(), DEFAULT_COST_LIMIT);
        assert_eq!(config.feed.page_size, 20);
        assert!((config.feed.preload_screens - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_args_override_file() {
        let mut config = AppConfig::default();
        let args = CliArgs::parse_from([
            "reviewfeed",
            "https://example.com/reviews",
            "--cost-limit-mib",
            "16",
            "--page-size",
            "5",
            "--log-level",
            "warn",
        ]);

        config.merge_with_args(args);

        assert_eq!(config.source.as_deref(), Some("https://example.com/reviews"));
        assert_eq!(config.images.cost_limit_mib, 16);
        assert_eq!(config.feed.page_size, 5);
        assert_eq!(config.log_level, LogLevel::Warn);
    }
}
