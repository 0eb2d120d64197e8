//! API response type definitions.
//!
//! The feed endpoint speaks JSON:API: `data` and `included` hold entities of
//! mixed types, so attributes are kept as raw JSON until the entity type is
//! known. Fields the crawler depends on are optional here and checked by the
//! parser, which reports exactly which one is missing.

use serde::Deserialize;

/// One page of the posts feed.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedResponse {
    pub data: Vec<Entity>,
    #[serde(default)]
    pub included: Vec<Entity>,
    #[serde(default)]
    pub meta: Option<FeedMeta>,
}

/// A JSON:API resource object.
#[derive(Debug, Clone, Deserialize)]
pub struct Entity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub attributes: serde_json::Value,
}

/// Attributes of a `post` entity.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostAttributes {
    pub title: Option<String>,
    pub current_user_can_view: Option<bool>,
    pub post_metadata: Option<PostMetadata>,
}

/// Post metadata block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostMetadata {
    #[serde(default)]
    pub image_order: Vec<EntityId>,
}

/// Media IDs appear both as strings and as bare numbers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Text(String),
    Number(u64),
}

impl EntityId {
    pub fn as_string(&self) -> String {
        match self {
            EntityId::Text(s) => s.clone(),
            EntityId::Number(n) => n.to_string(),
        }
    }
}

/// Attributes of a `media` entity.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaAttributes {
    pub mimetype: Option<String>,
    pub download_url: Option<String>,
    pub image_urls: Option<ImageUrls>,
    pub metadata: Option<MediaMetadata>,
}

/// Rendered image URLs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageUrls {
    pub original: Option<String>,
}

/// Media metadata block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaMetadata {
    pub dimensions: Option<Dimensions>,
}

/// Media dimensions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dimensions {
    pub w: Option<u32>,
    pub h: Option<u32>,
}

/// Top-level `meta` object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedMeta {
    pub pagination: Option<Pagination>,
}

/// Pagination details.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    pub cursors: Option<Cursors>,
    pub total: Option<u64>,
}

/// Pagination cursors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Cursors {
    pub next: Option<String>,
}
