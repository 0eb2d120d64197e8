//! Download state tracking.

use std::collections::VecDeque;
use std::path::PathBuf;

use crate::crawl::CrawlState;
use crate::media::Media;

/// A single media file waiting to be downloaded into `directory`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueItem {
    pub media: Media,
    pub directory: PathBuf,
}

/// Queue state shared by all download workers.
///
/// Always accessed under the queue's lock; nothing here performs I/O.
#[derive(Debug, Default)]
pub struct DownloaderState {
    pub pending: VecDeque<QueueItem>,
    pub in_flight: usize,
    pub total_enqueued: u64,
    pub completed: u64,
    pub failed: u64,
    pub cancelled: u64,
}

impl DownloaderState {
    /// No download running and nothing waiting.
    pub fn is_idle(&self) -> bool {
        self.in_flight == 0 && self.pending.is_empty()
    }

    /// Claim free slots for pending items, in FIFO order.
    pub fn claim(&mut self, max_in_flight: usize) -> Vec<QueueItem> {
        let free = max_in_flight.saturating_sub(self.in_flight);
        let count = free.min(self.pending.len());

        self.in_flight += count;
        self.pending.drain(..count).collect()
    }

    /// Hand the next pending item to a worker that just finished, or release
    /// its slot when the queue is empty.
    pub fn next_for_slot(&mut self) -> Option<QueueItem> {
        let next = self.pending.pop_front();
        if next.is_none() {
            self.in_flight = self.in_flight.saturating_sub(1);
        }
        next
    }

    /// Drop every pending item as cancelled.
    pub fn drain_cancelled(&mut self) {
        self.cancelled += self.pending.len() as u64;
        self.pending.clear();
    }

    pub fn stats(&self) -> DownloadStats {
        DownloadStats {
            total_enqueued: self.total_enqueued,
            completed: self.completed,
            failed: self.failed,
            cancelled: self.cancelled,
            in_flight: self.in_flight,
            pending: self.pending.len(),
        }
    }
}

/// Point-in-time snapshot of a download queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadStats {
    pub total_enqueued: u64,
    pub completed: u64,
    pub failed: u64,
    pub cancelled: u64,
    pub in_flight: usize,
    pub pending: usize,
}

impl DownloadStats {
    /// Items that reached a final state.
    pub fn processed(&self) -> u64 {
        self.completed + self.failed + self.cancelled
    }

    /// Every enqueued item is accounted for.
    pub fn is_finished(&self) -> bool {
        self.in_flight == 0 && self.pending == 0 && self.processed() == self.total_enqueued
    }
}

/// Per-creator results.
#[derive(Debug, Default)]
pub struct CreatorStats {
    pub creator_name: String,
    pub base_path: Option<PathBuf>,
    pub posts_loaded: u64,
    pub inaccessible_posts: u64,
    pub capped_posts: u64,
    pub pages_fetched: u64,
    pub downloads: DownloadStats,
    /// Set when the crawl ended early and only partial posts were downloaded.
    pub crawl_error: Option<String>,
}

impl CreatorStats {
    pub fn new(creator_name: impl Into<String>) -> Self {
        Self {
            creator_name: creator_name.into(),
            ..Default::default()
        }
    }

    /// Copy the post counters out of a finished crawl.
    pub fn record_crawl(&mut self, crawl: &CrawlState) {
        self.posts_loaded = crawl.loaded() as u64;
        self.inaccessible_posts = crawl.inaccessible_count;
        self.capped_posts = crawl.capped_count;
        self.pages_fetched = crawl.pages_fetched;
    }
}

/// Global statistics across all creators.
#[derive(Debug, Default)]
pub struct GlobalState {
    pub posts_loaded: u64,
    pub downloaded: u64,
    pub failed: u64,
    pub creators_processed: u64,
    pub creators_failed: u64,
}

impl GlobalState {
    /// Add statistics from a creator's run.
    pub fn add_creator_stats(&mut self, stats: &CreatorStats) {
        self.posts_loaded += stats.posts_loaded;
        self.downloaded += stats.downloads.completed;
        self.failed += stats.downloads.failed;
        self.creators_processed += 1;
    }

    /// Mark a creator as failed.
    pub fn mark_creator_failed(&mut self) {
        self.creators_failed += 1;
    }
}
