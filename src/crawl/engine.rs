//! Feed pagination engine.

use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::crawl::source::FeedSource;
use crate::crawl::state::{CrawlPhase, CrawlState};
use crate::error::{Error, Result};
use crate::media::{FeedPage, Post};

/// Filtering options applied while crawling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlOptions {
    /// Stop once this many posts are loaded.
    pub max_posts: Option<usize>,

    /// Keep posts the account cannot view.
    pub download_inaccessible: bool,
}

impl CrawlOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_posts: config.max_posts(),
            download_inaccessible: config.options.download_inaccessible,
        }
    }
}

/// Crawls one creator's feed page by page.
///
/// The crawler resolves the creator's campaign on the first request, then
/// follows the feed cursor until the server stops returning one or the post
/// cap is reached. Once complete it never issues another request.
///
/// If a request fails, the error is returned as [`Error::Crawl`] and the posts
/// loaded up to that point stay available through [`Crawler::posts`] and
/// [`Crawler::into_posts`].
pub struct Crawler<S> {
    source: S,
    creator: String,
    options: CrawlOptions,
    state: CrawlState,
    cancel: Option<CancellationToken>,
}

impl<S: FeedSource> Crawler<S> {
    /// Create a crawler for `creator` using `source` for all requests.
    pub fn new(source: S, creator: impl Into<String>, options: CrawlOptions) -> Self {
        Self {
            source,
            creator: creator.into(),
            options,
            state: CrawlState::default(),
            cancel: None,
        }
    }

    /// Stop before the next page request once `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    /// Posts loaded so far.
    pub fn posts(&self) -> &[Post] {
        &self.state.loaded_posts
    }

    /// Hand off the loaded posts, consuming the crawler.
    pub fn into_posts(self) -> Vec<Post> {
        self.state.loaded_posts
    }

    /// Whether no further pages will be requested.
    pub fn all_loaded(&self) -> bool {
        self.state.is_complete()
    }

    /// Number of posts the crawl is expected to end with.
    ///
    /// Only accounts for posts filtered as inaccessible; posts cut by the cap
    /// are tracked separately in [`CrawlState::capped_count`]. Informational.
    pub fn accessible_total(&self) -> u64 {
        let mut total = if self.options.download_inaccessible {
            self.state.total_posts_reported
        } else {
            self.state
                .total_posts_reported
                .saturating_sub(self.state.inaccessible_count)
        };

        if let Some(max) = self.options.max_posts {
            total = total.min(max as u64);
        }

        total
    }

    /// Load all remaining pages.
    pub async fn load_all(&mut self) -> Result<()> {
        tracing::info!("Crawling posts of {}...", self.creator);

        while self.load_next().await? {}

        tracing::info!(
            "Crawl of {} complete: {} posts loaded, {} inaccessible, {} over the limit",
            self.creator,
            self.state.loaded(),
            self.state.inaccessible_count,
            self.state.capped_count
        );

        Ok(())
    }

    /// Load the next page.
    ///
    /// Returns `Ok(true)` while more pages remain and `Ok(false)` once the
    /// crawl is complete.
    pub async fn load_next(&mut self) -> Result<bool> {
        if self.state.phase == CrawlPhase::Complete {
            return Ok(false);
        }

        if self.cancel.as_ref().is_some_and(|t| t.is_cancelled()) {
            tracing::debug!("Crawl of {} cancelled while {}", self.creator, self.state.phase);
            self.state.phase = CrawlPhase::Complete;
            return Err(Error::Cancelled);
        }

        if self.state.phase == CrawlPhase::Idle {
            self.resolve_campaign().await?;
        }

        let campaign_id = self
            .state
            .campaign_id
            .clone()
            .ok_or_else(|| Error::Api("campaign id not resolved".into()))?;

        let result = self
            .source
            .fetch_page(&campaign_id, self.state.cursor.as_deref())
            .await;

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                self.state.phase = CrawlPhase::Complete;
                return Err(Error::crawl(self.state.loaded(), e));
            }
        };

        self.apply_page(page);

        Ok(!self.state.is_complete())
    }

    async fn resolve_campaign(&mut self) -> Result<()> {
        match self.source.campaign_id(&self.creator).await {
            Ok(id) => {
                tracing::debug!("Campaign id for {}: {}", self.creator, id);
                self.state.campaign_id = Some(id);
                self.state.phase = CrawlPhase::FetchingPage;
                Ok(())
            }
            Err(e) => {
                self.state.phase = CrawlPhase::Complete;
                match e {
                    Error::CampaignNotFound(_) | Error::Authentication(_) => Err(e),
                    other => Err(Error::crawl(0, other)),
                }
            }
        }
    }

    fn apply_page(&mut self, page: FeedPage) {
        let FeedPage {
            posts,
            next_cursor,
            total,
        } = page;

        self.state.pages_fetched += 1;

        let mut surviving = if self.options.download_inaccessible {
            posts
        } else {
            let (viewable, hidden): (Vec<Post>, Vec<Post>) =
                posts.into_iter().partition(|post| post.viewable);

            for post in &hidden {
                tracing::debug!("Skipping post {} as it is not viewable", post.id);
            }
            self.state.inaccessible_count += hidden.len() as u64;

            viewable
        };

        if let Some(max) = self.options.max_posts {
            let room = max.saturating_sub(self.state.loaded());
            if surviving.len() > room {
                self.state.capped_count += (surviving.len() - room) as u64;
                surviving.truncate(room);
            }
        }

        self.state.loaded_posts.extend(surviving);
        self.state.total_posts_reported = total;
        self.state.cursor = next_cursor;

        let cap_reached = self
            .options
            .max_posts
            .is_some_and(|max| self.state.loaded() >= max);

        self.state.phase = if self.state.cursor.is_none() || cap_reached {
            CrawlPhase::Complete
        } else {
            CrawlPhase::FetchingPage
        };

        tracing::info!(
            "Loaded {} / {} posts",
            self.state.loaded(),
            self.accessible_total()
        );
    }
}
