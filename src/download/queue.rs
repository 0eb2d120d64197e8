//! Bounded-concurrency download queue.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indicatif::ProgressBar;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::api::PatreonApi;
use crate::config::{Config, GroupingStrategy, DEFAULT_MAX_PARALLEL_DOWNLOADS};
use crate::download::media::download_media_item;
use crate::download::state::{DownloadStats, DownloaderState, QueueItem};
use crate::fs::post_directory;
use crate::media::Post;

/// Queue behaviour options.
#[derive(Debug, Clone)]
pub struct QueueOptions {
    /// Maximum number of downloads running at once (0 is treated as 1).
    pub max_in_flight: usize,

    /// How post media is grouped into folders.
    pub grouping: GroupingStrategy,

    /// Progress bar advanced once per processed item.
    pub progress: Option<ProgressBar>,

    /// Stops dispatching pending items once cancelled.
    pub cancel: Option<CancellationToken>,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self {
            max_in_flight: DEFAULT_MAX_PARALLEL_DOWNLOADS,
            grouping: GroupingStrategy::default(),
            progress: None,
            cancel: None,
        }
    }
}

impl QueueOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_in_flight: config.options.max_parallel_downloads,
            grouping: config.options.grouping_strategy,
            ..Default::default()
        }
    }
}

/// Downloads post media with at most `max_in_flight` transfers at a time.
///
/// Items start in the order they were enqueued; completion order is
/// unspecified. A failed item is logged and dropped, it never stops the rest
/// of the batch. [`DownloadQueue::enqueue`] can be called again at any time,
/// including while earlier items are still downloading.
///
/// Workers are Tokio tasks, so `enqueue` must be called from within a
/// runtime.
#[derive(Clone)]
pub struct DownloadQueue {
    inner: Arc<QueueInner>,
}

struct QueueInner {
    api: PatreonApi,
    base_dir: PathBuf,
    grouping: GroupingStrategy,
    max_in_flight: usize,
    progress: Option<ProgressBar>,
    cancel: Option<CancellationToken>,
    state: Mutex<DownloaderState>,
    idle: Notify,
}

impl DownloadQueue {
    /// Create a queue that downloads beneath `base_dir`.
    pub fn new(api: PatreonApi, base_dir: impl Into<PathBuf>, options: QueueOptions) -> Self {
        Self {
            inner: Arc::new(QueueInner {
                api,
                base_dir: base_dir.into(),
                grouping: options.grouping,
                max_in_flight: options.max_in_flight.max(1),
                progress: options.progress,
                cancel: options.cancel,
                state: Mutex::new(DownloaderState::default()),
                idle: Notify::new(),
            }),
        }
    }

    /// Queue every media item of `posts` and start workers.
    ///
    /// Returns the number of items added.
    pub fn enqueue(&self, posts: &[Post]) -> usize {
        let items: Vec<QueueItem> = posts
            .iter()
            .flat_map(|post| {
                let directory = post_directory(post, &self.inner.base_dir, self.inner.grouping);
                post.media.iter().map(move |media| QueueItem {
                    media: media.clone(),
                    directory: directory.clone(),
                })
            })
            .collect();

        let count = items.len();
        {
            let mut state = self.inner.lock();
            state.pending.extend(items);
            state.total_enqueued += count as u64;

            if let Some(bar) = &self.inner.progress {
                bar.set_length(state.total_enqueued);
            }
        }

        tracing::info!("Enqueued {} downloads from {} posts", count, posts.len());

        self.process_queue();
        count
    }

    /// Wait until nothing is pending or running.
    ///
    /// Returns immediately when the queue is already idle, including when
    /// nothing was ever enqueued.
    pub async fn wait_finish(&self) -> DownloadStats {
        loop {
            let notified = self.inner.idle.notified();
            tokio::pin!(notified);
            // Register before checking so a wakeup between the check and the await is not lost
            notified.as_mut().enable();

            if let Some(stats) = self.inner.idle_stats() {
                tracing::info!(
                    "Download finished: {} downloaded, {} failed",
                    stats.completed,
                    stats.failed
                );
                return stats;
            }

            notified.await;
        }
    }

    /// Snapshot of the queue counters.
    pub fn stats(&self) -> DownloadStats {
        self.inner.lock().stats()
    }

    /// Fill free slots with pending items.
    fn process_queue(&self) {
        let (started, idle) = {
            let mut state = self.inner.lock();
            if self.inner.is_cancelled() {
                state.drain_cancelled();
            }
            let started = state.claim(self.inner.max_in_flight);
            (started, state.is_idle())
        };

        for item in started {
            let inner = Arc::clone(&self.inner);
            tokio::spawn(inner.run_worker(item));
        }

        if idle {
            self.inner.idle.notify_waiters();
        }
    }
}

impl QueueInner {
    fn lock(&self) -> MutexGuard<'_, DownloaderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|t| t.is_cancelled())
    }

    fn idle_stats(&self) -> Option<DownloadStats> {
        let state = self.lock();
        state.is_idle().then(|| state.stats())
    }

    /// Occupy one slot, downloading items until the queue runs dry.
    async fn run_worker(self: Arc<Self>, first: QueueItem) {
        let mut item = first;

        loop {
            let result = download_media_item(&self.api, &item.media, &item.directory).await;

            let (next, completed, total, idle) = {
                let mut state = self.lock();
                match result {
                    Ok(_) => state.completed += 1,
                    Err(_) => state.failed += 1,
                }
                if self.is_cancelled() {
                    state.drain_cancelled();
                }
                let next = state.next_for_slot();
                (next, state.completed, state.total_enqueued, state.is_idle())
            };

            match &result {
                Ok(path) => {
                    let name = path.file_name().unwrap_or_default().to_string_lossy();
                    if self.progress.is_some() {
                        tracing::debug!("({} / {}) Downloaded {}", completed, total, name);
                    } else {
                        tracing::info!("({} / {}) Downloaded {}", completed, total, name);
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to download {}: {}", item.media.id, e);
                }
            }

            if let Some(bar) = &self.progress {
                bar.inc(1);
            }

            if idle {
                self.idle.notify_waiters();
            }

            match next {
                Some(next) => item = next,
                None => break,
            }
        }
    }
}
