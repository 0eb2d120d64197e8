//! Command-line argument definitions using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{split_handles, Config, GroupingStrategy};

/// Patreon media crawler CLI.
#[derive(Parser, Debug)]
#[command(
    name = "patreon-crawler",
    version,
    about = "Download media from Patreon creators",
    long_about = "Crawls the post feed of one or more Patreon creators and downloads the \
                  attached media.\n\n\
                  Authentication uses your browser session cookie, either passed directly \
                  or read from an exported cookie file."
)]
pub struct Args {
    /// Creator handle(s) to crawl, comma-separated.
    #[arg(long)]
    pub creator: Option<String>,

    /// Raw Cookie header value for patreon.com.
    #[arg(long, env = "PATREON_COOKIE", hide_env_values = true)]
    pub cookie: Option<String>,

    /// Path to an exported cookie file (Netscape cookies.txt or name=value lines).
    #[arg(long = "cookie-file")]
    pub cookie_file: Option<PathBuf>,

    /// Base directory for downloads.
    #[arg(short = 'd', long = "download-dir")]
    pub download_directory: Option<PathBuf>,

    /// Limit the maximum number of posts to download (0 = unlimited).
    #[arg(long)]
    pub max_posts: Option<usize>,

    /// Download inaccessible posts (blurred).
    #[arg(long)]
    pub download_inaccessible: bool,

    /// The maximum number of parallel downloads to run at once.
    #[arg(long)]
    pub max_parallel_downloads: Option<usize>,

    /// How to group post media into folders.
    #[arg(long, value_enum)]
    pub grouping: Option<GroupingArg>,

    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Hide download progress information.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// CLI grouping strategy argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GroupingArg {
    /// Put every file directly in the creator folder.
    None,
    /// Give every post its own folder.
    All,
    /// Give posts with more than one media item their own folder.
    Dynamic,
}

impl From<GroupingArg> for GroupingStrategy {
    fn from(arg: GroupingArg) -> Self {
        match arg {
            GroupingArg::None => GroupingStrategy::None,
            GroupingArg::All => GroupingStrategy::All,
            GroupingArg::Dynamic => GroupingStrategy::Dynamic,
        }
    }
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(self, config: &mut Config) {
        if let Some(creator) = self.creator {
            config.targeted_creator.handles = split_handles(&creator);
        }

        // A cookie given on the command line replaces any file-based source
        if let Some(cookie) = self.cookie {
            config.my_account.cookie = Some(cookie);
        }

        if let Some(cookie_file) = self.cookie_file {
            config.my_account.cookie_file = Some(cookie_file);
            if config.my_account.cookie.is_some() {
                tracing::debug!("Both cookie and cookie file set, the inline cookie wins");
            }
        }

        if let Some(dir) = self.download_directory {
            config.options.download_directory = Some(dir);
        }

        if let Some(max_posts) = self.max_posts {
            config.options.max_posts = max_posts;
        }

        if let Some(parallel) = self.max_parallel_downloads {
            config.options.max_parallel_downloads = parallel;
        }

        if let Some(grouping) = self.grouping {
            config.options.grouping_strategy = grouping.into();
        }

        // Boolean flags (only override if set to non-default)
        if self.download_inaccessible {
            config.options.download_inaccessible = true;
        }

        if self.quiet {
            config.options.show_downloads = false;
        }
    }
}
