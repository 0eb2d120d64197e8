//! Download module for media downloading.
//!
//! This module provides:
//! - Download state tracking
//! - Single media file downloading
//! - The bounded-concurrency download queue

pub mod media;
pub mod queue;
pub mod state;

pub use media::download_media_item;
pub use queue::{DownloadQueue, QueueOptions};
pub use state::{CreatorStats, DownloadStats, DownloaderState, GlobalState, QueueItem};
