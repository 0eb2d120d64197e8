//! Crawl state tracking.

use std::fmt;

use crate::media::Post;

/// Phase of a crawl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrawlPhase {
    /// No request issued yet.
    #[default]
    Idle,
    /// Campaign resolved, pages are being fetched.
    FetchingPage,
    /// Feed exhausted, cap reached, or the crawl failed. No more requests.
    Complete,
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrawlPhase::Idle => write!(f, "idle"),
            CrawlPhase::FetchingPage => write!(f, "fetching"),
            CrawlPhase::Complete => write!(f, "complete"),
        }
    }
}

/// Per-creator crawl state.
#[derive(Debug, Default)]
pub struct CrawlState {
    pub phase: CrawlPhase,

    /// Campaign id, resolved on the first page request.
    pub campaign_id: Option<String>,

    /// Cursor for the next page.
    pub cursor: Option<String>,

    /// Posts kept so far, in feed order.
    pub loaded_posts: Vec<Post>,

    /// Total reported by the server (advisory).
    pub total_posts_reported: u64,

    /// Posts dropped because the account cannot view them.
    pub inaccessible_count: u64,

    /// Posts dropped because the post cap was reached.
    pub capped_count: u64,

    /// Number of feed pages fetched.
    pub pages_fetched: u64,
}

impl CrawlState {
    /// Number of posts loaded so far.
    pub fn loaded(&self) -> usize {
        self.loaded_posts.len()
    }

    /// Whether the crawl has finished.
    pub fn is_complete(&self) -> bool {
        self.phase == CrawlPhase::Complete
    }
}
