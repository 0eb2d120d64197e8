//! Configuration structures and loading logic.

use crate::config::modes::GroupingStrategy;
use crate::config::validation::normalize_handle;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default number of concurrent media downloads.
pub const DEFAULT_MAX_PARALLEL_DOWNLOADS: usize = 10;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub targeted_creator: CreatorConfig,

    #[serde(default)]
    pub my_account: AccountConfig,

    #[serde(default)]
    pub options: OptionsConfig,
}

/// Creator targeting configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatorConfig {
    /// Creator handles to crawl, in order.
    #[serde(default)]
    pub handles: Vec<String>,
}

/// Credential source configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Raw `Cookie` header value copied from the browser.
    #[serde(default)]
    pub cookie: Option<String>,

    /// Path to a cookie export (Netscape cookies.txt or name=value lines).
    #[serde(default)]
    pub cookie_file: Option<PathBuf>,
}

/// Crawl and download options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Base directory for downloads.
    #[serde(default)]
    pub download_directory: Option<PathBuf>,

    /// Maximum number of posts to crawl per creator (0 = unlimited).
    #[serde(default)]
    pub max_posts: usize,

    /// Whether to keep posts the account cannot view (blurred previews).
    #[serde(default)]
    pub download_inaccessible: bool,

    /// Maximum number of downloads running at once.
    #[serde(default = "default_max_parallel_downloads")]
    pub max_parallel_downloads: usize,

    /// How post media is grouped into folders.
    #[serde(default)]
    pub grouping_strategy: GroupingStrategy,

    /// Whether to show download progress.
    #[serde(default = "default_true")]
    pub show_downloads: bool,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            download_directory: None,
            max_posts: 0,
            download_inaccessible: false,
            max_parallel_downloads: DEFAULT_MAX_PARALLEL_DOWNLOADS,
            grouping_strategy: GroupingStrategy::default(),
            show_downloads: true,
        }
    }
}

fn default_max_parallel_downloads() -> usize {
    DEFAULT_MAX_PARALLEL_DOWNLOADS
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}. Create one from config.example.toml",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let mut config: Config = toml::from_str(&content)?;
        config.normalize_handles();
        Ok(config)
    }

    /// Strip `@` prefixes and whitespace from the creator handles, dropping
    /// blank entries.
    pub fn normalize_handles(&mut self) {
        self.targeted_creator.handles = self
            .targeted_creator
            .handles
            .iter()
            .map(|handle| normalize_handle(handle))
            .filter(|handle| !handle.is_empty())
            .map(str::to_string)
            .collect();
    }

    /// Get the effective download directory.
    pub fn download_directory(&self) -> PathBuf {
        self.options
            .download_directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("./downloads"))
    }

    /// Post cap, `None` when unlimited.
    pub fn max_posts(&self) -> Option<usize> {
        match self.options.max_posts {
            0 => None,
            n => Some(n),
        }
    }
}
