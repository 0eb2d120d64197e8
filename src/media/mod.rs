//! Media module for post/media representation and feed parsing.

pub mod item;
pub mod parser;

pub use item::{Media, Post};
pub use parser::{parse_feed_page, parse_feed_text, FeedPage};
