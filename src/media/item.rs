//! Post and media representation.

use crate::error::{Error, Result};

/// A downloadable media file attached to a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Media {
    /// Unique media ID.
    pub id: String,

    /// Direct download URL.
    pub url: String,

    /// MIME type of the media, e.g. `image/png`.
    pub mimetype: String,

    /// Width in pixels.
    pub width: u32,

    /// Height in pixels.
    pub height: u32,
}

impl Media {
    /// File extension derived from the MIME subtype (`image/png` -> `png`).
    pub fn file_extension(&self) -> Result<&str> {
        let (_, subtype) = self
            .mimetype
            .split_once('/')
            .ok_or_else(|| Error::Download(format!("invalid mime type: {}", self.mimetype)))?;

        // Drop parameters such as "; charset=binary"
        let subtype = subtype.split(';').next().unwrap_or("").trim();

        if subtype.is_empty() {
            return Err(Error::Download(format!("invalid mime type: {}", self.mimetype)));
        }

        Ok(subtype)
    }

    /// Target file name, `{id}.{extension}`.
    pub fn file_name(&self) -> Result<String> {
        Ok(format!("{}.{}", self.id, self.file_extension()?))
    }
}

/// A post from a creator's feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Unique post ID.
    pub id: String,

    /// Post title, used for folder naming after sanitizing.
    pub title: String,

    /// Media referenced by the post, in the post's declared order.
    pub media: Vec<Media>,

    /// Whether the authenticated account may see the full content.
    pub viewable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media(mimetype: &str) -> Media {
        Media {
            id: "42".into(),
            url: "https://example.com/42".into(),
            mimetype: mimetype.into(),
            width: 1920,
            height: 1080,
        }
    }

    #[test]
    fn test_file_name_from_mimetype() {
        assert_eq!(media("image/png").file_name().unwrap(), "42.png");
        assert_eq!(media("image/jpeg").file_name().unwrap(), "42.jpeg");
        assert_eq!(media("video/mp4; codecs=avc1").file_name().unwrap(), "42.mp4");
    }

    #[test]
    fn test_invalid_mimetype() {
        assert!(media("png").file_extension().is_err());
        assert!(media("image/").file_extension().is_err());
    }
}
