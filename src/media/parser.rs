//! Feed page parsing.

use std::collections::{HashMap, HashSet};

use serde::de::DeserializeOwned;

use crate::api::types::{Entity, FeedResponse, MediaAttributes, PostAttributes};
use crate::error::{Error, Result};
use crate::media::item::{Media, Post};

/// Entity type tag for posts.
const POST_TYPE: &str = "post";

/// Entity type tag for media.
const MEDIA_TYPE: &str = "media";

/// Parsed content of one feed page.
#[derive(Debug, Clone, Default)]
pub struct FeedPage {
    /// Posts on this page, in feed order.
    pub posts: Vec<Post>,

    /// Cursor for the next page; `None` at the end of the feed.
    pub next_cursor: Option<String>,

    /// Total number of posts reported by the server.
    pub total: u64,
}

/// Parse a raw response body into a feed page.
pub fn parse_feed_text(body: &str) -> Result<FeedPage> {
    let response: FeedResponse = serde_json::from_str(body).map_err(|e| {
        Error::MalformedResponse(format!(
            "invalid feed document: {} - Response: {}",
            e,
            truncate(body, 500)
        ))
    })?;

    parse_feed_page(&response)
}

/// Turn a decoded feed response into typed posts.
pub fn parse_feed_page(response: &FeedResponse) -> Result<FeedPage> {
    let media = response
        .included
        .iter()
        .filter(|entity| entity.kind == MEDIA_TYPE)
        .map(|entity| parse_media(entity).map(|m| (m.id.clone(), m)))
        .collect::<Result<HashMap<_, _>>>()?;

    let posts = response
        .data
        .iter()
        .filter(|entity| entity.kind == POST_TYPE)
        .map(|entity| parse_post(entity, &media))
        .collect::<Result<Vec<_>>>()?;

    let pagination = response.meta.as_ref().and_then(|m| m.pagination.as_ref());

    let next_cursor = pagination
        .and_then(|p| p.cursors.as_ref())
        .and_then(|c| c.next.clone())
        .filter(|c| !c.is_empty());

    let total = pagination.and_then(|p| p.total).unwrap_or(0);

    Ok(FeedPage {
        posts,
        next_cursor,
        total,
    })
}

fn parse_media(entity: &Entity) -> Result<Media> {
    let attributes: MediaAttributes = attributes_of(entity)?;

    let mimetype = attributes
        .mimetype
        .ok_or_else(|| missing(entity, "mimetype"))?;

    let url = attributes
        .download_url
        .or_else(|| attributes.image_urls.and_then(|urls| urls.original))
        .ok_or_else(|| missing(entity, "download_url"))?;

    let dimensions = attributes
        .metadata
        .and_then(|m| m.dimensions)
        .ok_or_else(|| missing(entity, "metadata.dimensions"))?;

    let width = dimensions
        .w
        .ok_or_else(|| missing(entity, "metadata.dimensions.w"))?;
    let height = dimensions
        .h
        .ok_or_else(|| missing(entity, "metadata.dimensions.h"))?;

    Ok(Media {
        id: entity.id.clone(),
        url,
        mimetype,
        width,
        height,
    })
}

fn parse_post(entity: &Entity, media: &HashMap<String, Media>) -> Result<Post> {
    let attributes: PostAttributes = attributes_of(entity)?;

    let title = attributes.title.ok_or_else(|| missing(entity, "title"))?;
    let viewable = attributes
        .current_user_can_view
        .ok_or_else(|| missing(entity, "current_user_can_view"))?;

    let image_order = attributes
        .post_metadata
        .map(|m| m.image_order)
        .unwrap_or_default();

    // Keep the declared order, skip unknown ids and repeats
    let mut seen = HashSet::new();
    let post_media = image_order
        .iter()
        .map(|id| id.as_string())
        .filter(|id| seen.insert(id.clone()))
        .filter_map(|id| media.get(&id).cloned())
        .collect();

    Ok(Post {
        id: entity.id.clone(),
        title,
        media: post_media,
        viewable,
    })
}

fn attributes_of<T: DeserializeOwned + Default>(entity: &Entity) -> Result<T> {
    if entity.attributes.is_null() {
        return Ok(T::default());
    }

    serde_json::from_value(entity.attributes.clone()).map_err(|e| {
        Error::MalformedResponse(format!(
            "{} {}: invalid attributes: {}",
            entity.kind, entity.id, e
        ))
    })
}

fn missing(entity: &Entity, field: &str) -> Error {
    Error::MalformedResponse(format!(
        "{} {}: missing required field '{}'",
        entity.kind, entity.id, field
    ))
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn media_json(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "type": "media",
            "attributes": {
                "mimetype": "image/png",
                "download_url": format!("https://cdn.example.com/{}.png", id),
                "metadata": { "dimensions": { "w": 800, "h": 600 } }
            }
        })
    }

    fn parse(value: serde_json::Value) -> Result<FeedPage> {
        parse_feed_text(&value.to_string())
    }

    #[test]
    fn test_parse_posts_and_pagination() {
        let page = parse(json!({
            "data": [
                {
                    "id": "p1",
                    "type": "post",
                    "attributes": {
                        "title": "First",
                        "current_user_can_view": true,
                        "post_metadata": { "image_order": ["m2", "m1"] }
                    }
                },
                { "id": "x", "type": "poll", "attributes": { "title": 5 } }
            ],
            "included": [
                media_json("m1"),
                media_json("m2"),
                { "id": "u1", "type": "user", "attributes": { "full_name": "Someone" } }
            ],
            "meta": { "pagination": { "cursors": { "next": "abc" }, "total": 42 } }
        }))
        .unwrap();

        assert_eq!(page.posts.len(), 1);
        let post = &page.posts[0];
        assert_eq!(post.title, "First");
        assert!(post.viewable);
        let ids: Vec<_> = post.media.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m2", "m1"]);
        assert_eq!(post.media[0].width, 800);
        assert_eq!(page.next_cursor.as_deref(), Some("abc"));
        assert_eq!(page.total, 42);
    }

    #[test]
    fn test_end_of_feed() {
        let page = parse(json!({
            "data": [],
            "included": [],
            "meta": { "pagination": { "cursors": { "next": null }, "total": 3 } }
        }))
        .unwrap();

        assert!(page.posts.is_empty());
        assert_eq!(page.next_cursor, None);
        assert_eq!(page.total, 3);

        let page = parse(json!({ "data": [] })).unwrap();
        assert_eq!(page.next_cursor, None);
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_post_without_image_order_has_no_media() {
        let page = parse(json!({
            "data": [{
                "id": "p1",
                "type": "post",
                "attributes": {
                    "title": "Text only",
                    "current_user_can_view": false,
                    "post_metadata": null
                }
            }],
            "included": [media_json("m1")]
        }))
        .unwrap();

        assert!(page.posts[0].media.is_empty());
        assert!(!page.posts[0].viewable);
    }

    #[test]
    fn test_unknown_and_repeated_media_ids() {
        let page = parse(json!({
            "data": [{
                "id": "p1",
                "type": "post",
                "attributes": {
                    "title": "Mixed",
                    "current_user_can_view": true,
                    "post_metadata": { "image_order": ["m1", "gone", "m1", 7] }
                }
            }],
            "included": [media_json("m1"), media_json("7")]
        }))
        .unwrap();

        let ids: Vec<_> = page.posts[0].media.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "7"]);
    }

    #[test]
    fn test_image_urls_fallback() {
        let page = parse(json!({
            "data": [{
                "id": "p1",
                "type": "post",
                "attributes": {
                    "title": "T",
                    "current_user_can_view": true,
                    "post_metadata": { "image_order": ["m1"] }
                }
            }],
            "included": [{
                "id": "m1",
                "type": "media",
                "attributes": {
                    "mimetype": "image/jpeg",
                    "image_urls": { "original": "https://cdn.example.com/orig.jpg" },
                    "metadata": { "dimensions": { "w": 1, "h": 2 } }
                }
            }]
        }))
        .unwrap();

        assert_eq!(page.posts[0].media[0].url, "https://cdn.example.com/orig.jpg");
    }

    #[test]
    fn test_missing_post_title() {
        let err = parse(json!({
            "data": [{
                "id": "p1",
                "type": "post",
                "attributes": { "current_user_can_view": true }
            }]
        }))
        .unwrap_err();

        match err {
            Error::MalformedResponse(msg) => assert!(msg.contains("title")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_access_flag() {
        let err = parse(json!({
            "data": [{ "id": "p1", "type": "post", "attributes": { "title": "T" } }]
        }))
        .unwrap_err();

        assert!(matches!(err, Error::MalformedResponse(ref m) if m.contains("current_user_can_view")));
    }

    #[test]
    fn test_missing_media_fields() {
        let no_dimensions = json!({
            "data": [],
            "included": [{
                "id": "m1",
                "type": "media",
                "attributes": { "mimetype": "image/png", "download_url": "https://x/y" }
            }]
        });
        assert!(matches!(
            parse(no_dimensions),
            Err(Error::MalformedResponse(ref m)) if m.contains("dimensions")
        ));

        let no_mimetype = json!({
            "data": [],
            "included": [{
                "id": "m1",
                "type": "media",
                "attributes": {
                    "download_url": "https://x/y",
                    "metadata": { "dimensions": { "w": 1, "h": 1 } }
                }
            }]
        });
        assert!(matches!(
            parse(no_mimetype),
            Err(Error::MalformedResponse(ref m)) if m.contains("mimetype")
        ));
    }

    #[test]
    fn test_not_a_feed_document() {
        assert!(matches!(
            parse_feed_text("<html>login</html>"),
            Err(Error::MalformedResponse(_))
        ));
        assert!(matches!(
            parse(json!({ "errors": [] })),
            Err(Error::MalformedResponse(_))
        ));
    }
}
