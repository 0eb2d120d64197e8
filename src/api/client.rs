//! Patreon HTTP client.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::{header, Client, Response, StatusCode};
use url::Url;

use crate::crawl::FeedSource;
use crate::error::{Error, Result};
use crate::media::{parse_feed_text, FeedPage};

/// Patreon web base URL.
const WEB_BASE: &str = "https://www.patreon.com";

/// Path of the posts feed endpoint.
const FEED_PATH: &str = "/api/posts";

/// Browser user agent sent with every request.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/144.0.0.0 Safari/537.36";

/// Query parameters sent with every feed request.
const FEED_QUERY: &[(&str, &str)] = &[
    ("include", "attachments,images,media"),
    (
        "fields[post]",
        "change_visibility_at,comment_count,content,current_user_can_view,embed,image,\
         is_paid,like_count,meta_image_url,min_cents_pledged_to_view,post_file,post_metadata,\
         published_at,patreon_url,post_type,pledge_url,preview_asset_type,thumbnail,\
         thumbnail_url,teaser_text,title,upgrade_url,url,was_posted_by_campaign_owner",
    ),
    ("fields[user]", "full_name,image_url,thumb_url,url"),
    (
        "fields[media]",
        "id,image_urls,download_url,metadata,mimetype,name,size_bytes,thumbnail_url,upload_url,url",
    ),
    ("fields[access_rule]", "access_rule_type,amount_cents"),
    ("filter[contains_exclusive_posts]", "true"),
    ("filter[is_draft]", "false"),
    ("sort", "-published_at"),
    ("json-api-version", "1.0"),
];

// The landing page embeds campaign assets under this path.
static CAMPAIGN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"patreon-media/p/campaign/(\d+)/").expect("valid campaign regex")
});

/// Patreon client carrying the account's cookie header.
#[derive(Debug, Clone)]
pub struct PatreonApi {
    client: Client,
    cookie: header::HeaderValue,
    base_url: Url,
}

impl PatreonApi {
    /// Create a client for patreon.com.
    pub fn new(cookie: &str) -> Result<Self> {
        Self::with_base_url(cookie, WEB_BASE)
    }

    /// Create a client against a different host (used by tests).
    pub fn with_base_url(cookie: &str, base_url: &str) -> Result<Self> {
        if cookie.trim().is_empty() {
            return Err(Error::Authentication("cookie value is empty".to_string()));
        }

        let mut cookie = header::HeaderValue::from_str(cookie.trim())
            .map_err(|e| Error::Authentication(format!("invalid cookie value: {}", e)))?;
        cookie.set_sensitive(true);

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            cookie,
            base_url: Url::parse(base_url)?,
        })
    }

    /// Find the campaign id for a creator by scanning their landing page.
    pub async fn get_campaign_id(&self, creator: &str) -> Result<String> {
        let url = self.landing_url(creator)?;
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if status == StatusCode::NOT_FOUND {
            return Err(Error::CampaignNotFound(creator.to_string()));
        }
        if !status.is_success() {
            return Err(Error::Api(format!(
                "Failed to load creator page for {}: HTTP {}",
                creator, status
            )));
        }

        let text = response.text().await?;
        extract_campaign_id(&text).ok_or_else(|| Error::CampaignNotFound(creator.to_string()))
    }

    /// Fetch and parse one page of a campaign's posts feed.
    pub async fn get_posts(&self, campaign_id: &str, cursor: Option<&str>) -> Result<FeedPage> {
        let url = self.base_url.join(FEED_PATH)?;
        tracing::debug!("GET {} (campaign {}, cursor {:?})", url, campaign_id, cursor);

        let mut request = self
            .client
            .get(url)
            .header(header::COOKIE, self.cookie.clone())
            .query(FEED_QUERY)
            .query(&[("filter[campaign_id]", campaign_id)]);

        if let Some(cursor) = cursor {
            request = request.query(&[("page[cursor]", cursor)]);
        }

        let response = check_status(request.send().await?).await?;
        let text = response.text().await?;
        tracing::debug!("Feed response length: {} bytes", text.len());

        parse_feed_text(&text)
    }

    /// Start downloading a file from a URL.
    pub async fn download_file(&self, url: &str) -> Result<Response> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Download(format!(
                "Failed to download file: HTTP {}",
                response.status()
            )));
        }

        Ok(response)
    }

    fn landing_url(&self, creator: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Api(format!("Invalid base URL: {}", self.base_url)))?
            .pop_if_empty()
            .push(creator);
        Ok(url)
    }
}

#[async_trait]
impl FeedSource for PatreonApi {
    async fn campaign_id(&self, creator: &str) -> Result<String> {
        self.get_campaign_id(creator).await
    }

    async fn fetch_page(&self, campaign_id: &str, cursor: Option<&str>) -> Result<FeedPage> {
        self.get_posts(campaign_id, cursor).await
    }
}

/// Map error statuses of an API response.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    tracing::debug!("Response status: {}", status);

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let body = body.chars().take(300).collect::<String>();

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        tracing::error!("Auth error response: {}", body);
        return Err(Error::Authentication(format!("HTTP {}", status)));
    }

    Err(Error::Api(format!("HTTP {}: {}", status, body)))
}

/// Extract the numeric campaign id from landing page markup.
pub fn extract_campaign_id(html: &str) -> Option<String> {
    CAMPAIGN_PATTERN
        .captures(html)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().to_string())
}
