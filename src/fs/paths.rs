//! Path and directory management.

use std::path::{Path, PathBuf};

use crate::config::{Config, GroupingStrategy};
use crate::error::Result;
use crate::fs::naming::{sanitize_path_component, sanitize_title};
use crate::media::Post;

/// Get the directory a post's media is downloaded to.
///
/// - `None`: always `base`.
/// - `All`: always `base/<title>`.
/// - `Dynamic`: `base/<title>` for posts with more than one media item,
///   otherwise `base`.
///
/// The title is sanitized; a title that sanitizes to nothing falls back to
/// the post id.
pub fn post_directory(post: &Post, base: &Path, strategy: GroupingStrategy) -> PathBuf {
    let grouped = match strategy {
        GroupingStrategy::None => false,
        GroupingStrategy::All => true,
        GroupingStrategy::Dynamic => post.media.len() > 1,
    };

    if grouped {
        base.join(post_folder_name(post))
    } else {
        base.to_path_buf()
    }
}

fn post_folder_name(post: &Post) -> String {
    let name = sanitize_title(&post.title);
    if name.is_empty() {
        sanitize_title(&post.id)
    } else {
        name
    }
}

/// Get the base creator folder path (with path traversal protection).
pub fn get_creator_folder(config: &Config, creator_name: &str) -> Result<PathBuf> {
    let base_dir = config.download_directory();
    let creator_folder = sanitize_path_component(creator_name)?;

    Ok(base_dir.join(creator_folder))
}
