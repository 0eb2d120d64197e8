//! Configuration validation logic.

use std::sync::LazyLock;

use crate::config::loader::Config;
use crate::error::{Error, Result};
use regex::Regex;

/// Upper bound for parallel downloads.
const MAX_PARALLEL_DOWNLOADS: usize = 64;

// Patreon vanity handles: letters, digits, underscores and hyphens.
static HANDLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]{1,64}$").expect("valid handle regex"));

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_handles(&config.targeted_creator.handles)?;
    validate_credentials(config)?;
    validate_parallelism(config.options.max_parallel_downloads)?;

    Ok(())
}

/// Validate that some credential source is configured.
pub fn validate_credentials(config: &Config) -> Result<()> {
    let account = &config.my_account;
    let has_cookie = account
        .cookie
        .as_deref()
        .is_some_and(|c| !c.trim().is_empty());

    if !has_cookie && account.cookie_file.is_none() {
        return Err(Error::Authentication(
            "no cookie or cookie file configured".to_string(),
        ));
    }

    Ok(())
}

/// Validate the download parallelism.
pub fn validate_parallelism(max_parallel_downloads: usize) -> Result<()> {
    if max_parallel_downloads == 0 || max_parallel_downloads > MAX_PARALLEL_DOWNLOADS {
        return Err(Error::ConfigValidation {
            field: "max_parallel_downloads".to_string(),
            message: format!(
                "Must be between 1 and {} (got {})",
                MAX_PARALLEL_DOWNLOADS, max_parallel_downloads
            ),
        });
    }

    Ok(())
}

/// Validate creator handles.
///
/// Handles are checked exactly as they will be requested, so `@` prefixes
/// must already be stripped (see [`normalize_handle`]).
pub fn validate_handles<S: AsRef<str>, I: IntoIterator<Item = S>>(handles: I) -> Result<()> {
    let handles: Vec<_> = handles.into_iter().collect();

    if handles.is_empty() {
        return Err(Error::MissingConfig(
            "handles (at least one creator handle required)".to_string(),
        ));
    }

    for handle in handles {
        let handle = handle.as_ref();

        if !HANDLE_PATTERN.is_match(handle) {
            return Err(Error::ConfigValidation {
                field: "handles".to_string(),
                message: format!(
                    "Handle '{}' contains invalid characters. Only alphanumeric, hyphens, and underscores allowed.",
                    handle
                ),
            });
        }
    }

    Ok(())
}

/// Strip a leading `@` and surrounding whitespace from a handle.
pub fn normalize_handle(handle: &str) -> &str {
    handle.trim().trim_start_matches('@')
}

/// Split a comma-separated creator list, dropping empty entries.
pub fn split_handles(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(normalize_handle)
        .filter(|h| !h.is_empty())
        .map(str::to_string)
        .collect()
}
