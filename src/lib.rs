//! Patreon Crawler - crawl a creator's post feed and download its media.
//!
//! # Features
//!
//! - Cursor-based pagination over the posts feed
//! - Filtering of posts the account cannot view, and an optional post cap
//! - Per-post folder grouping (`none`, `all`, `dynamic`)
//! - Bounded-concurrency downloads with per-item failure isolation
//!
//! # Example
//!
//! ```no_run
//! use patreon_crawler::{
//!     CrawlOptions, Crawler, DownloadQueue, PatreonApi, QueueOptions,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = PatreonApi::new("session_id=...")?;
//!
//!     let mut crawler = Crawler::new(api.clone(), "somecreator", CrawlOptions::default());
//!     crawler.load_all().await?;
//!
//!     let queue = DownloadQueue::new(api, "downloads/somecreator", QueueOptions::default());
//!     queue.enqueue(crawler.posts());
//!     let stats = queue.wait_finish().await;
//!     println!("{} files downloaded", stats.completed);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod crawl;
pub mod download;
pub mod error;
pub mod fs;
pub mod media;
pub mod output;

// Re-exports for convenience
pub use api::PatreonApi;
pub use config::{Config, GroupingStrategy};
pub use crawl::{CrawlOptions, CrawlState, Crawler, FeedSource};
pub use download::{DownloadQueue, DownloadStats, QueueOptions};
pub use error::{Error, Result};
pub use fs::post_directory;
pub use media::{FeedPage, Media, Post};
