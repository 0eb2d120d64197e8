//! Filesystem module.
//!
//! Provides:
//! - The per-post directory grouping policy
//! - Folder name sanitization

pub mod naming;
pub mod paths;

pub use naming::{sanitize_path_component, sanitize_title};
pub use paths::{get_creator_folder, post_directory};
