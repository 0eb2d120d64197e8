//! Crawl module for feed pagination.
//!
//! This module provides:
//! - The `FeedSource` seam over the feed API
//! - Crawl state tracking
//! - The pagination engine with visibility filtering and post cap

pub mod engine;
pub mod source;
pub mod state;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::media::FeedPage;

pub use engine::{CrawlOptions, Crawler};
pub use source::FeedSource;
pub use state::{CrawlPhase, CrawlState};

#[async_trait]
impl<T: FeedSource + ?Sized> FeedSource for Arc<T> {
    async fn campaign_id(&self, creator: &str) -> Result<String> {
        (**self).campaign_id(creator).await
    }

    async fn fetch_page(&self, campaign_id: &str, cursor: Option<&str>) -> Result<FeedPage> {
        (**self).fetch_page(campaign_id, cursor).await
    }
}
