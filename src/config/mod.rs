//! Configuration module for the patreon-crawler.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - The post grouping strategy
//! - Configuration validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{AccountConfig, Config, CreatorConfig, OptionsConfig, DEFAULT_MAX_PARALLEL_DOWNLOADS};
pub use modes::GroupingStrategy;
pub use validation::{normalize_handle, split_handles, validate_config};
