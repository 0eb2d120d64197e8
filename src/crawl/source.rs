//! Feed source abstraction used by the crawl engine.

use async_trait::async_trait;

use crate::error::Result;
use crate::media::FeedPage;

/// Something that can resolve a creator's campaign and serve its feed pages.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Resolve the stable campaign id for a creator handle.
    async fn campaign_id(&self, creator: &str) -> Result<String>;

    /// Fetch one page of the campaign feed, starting at `cursor` when given.
    async fn fetch_page(&self, campaign_id: &str, cursor: Option<&str>) -> Result<FeedPage>;
}
