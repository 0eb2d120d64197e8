//! Patreon API module.
//!
//! This module provides:
//! - HTTP client for the landing page, posts feed and media files
//! - Cookie credential loading
//! - API response types

pub mod auth;
pub mod client;
pub mod types;

pub use auth::load_cookie_header;
pub use client::{extract_campaign_id, PatreonApi};
pub use types::*;
