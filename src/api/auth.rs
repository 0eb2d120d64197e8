//! Cookie credential loading.
//!
//! The crawler only needs a ready `Cookie` header value. It can come from a
//! raw header string or from a cookie export on disk; either way an empty
//! result is an authentication error rather than an anonymous crawl.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::config::AccountConfig;
use crate::error::{Error, Result};

/// Domain whose cookies are sent to the API.
pub const COOKIE_DOMAIN: &str = "patreon.com";

/// Resolve the `Cookie` header from the configured credential source.
///
/// A non-blank inline cookie takes precedence over a cookie file.
pub fn load_cookie_header(account: &AccountConfig) -> Result<String> {
    let inline = account
        .cookie
        .as_deref()
        .filter(|cookie| !cookie.trim().is_empty());

    if let Some(cookie) = inline {
        return cookie_header_from_str(cookie);
    }

    if let Some(path) = account.cookie_file.as_deref() {
        return cookie_header_from_file(path, COOKIE_DOMAIN);
    }

    Err(Error::Authentication(
        "no cookie or cookie file configured".to_string(),
    ))
}

/// Normalize a raw cookie header string.
pub fn cookie_header_from_str(raw: &str) -> Result<String> {
    let raw = raw.trim();
    let raw = raw.strip_prefix("Cookie:").unwrap_or(raw).trim();

    let pairs: Vec<&str> = raw
        .split(';')
        .map(str::trim)
        .filter(|pair| pair.contains('='))
        .collect();

    if pairs.is_empty() {
        return Err(Error::Authentication("cookie value is empty".to_string()));
    }

    Ok(pairs.join("; "))
}

/// Read cookies for `domain` from a file.
pub fn cookie_header_from_file(path: &Path, domain: &str) -> Result<String> {
    let content = fs::read_to_string(path).map_err(|e| {
        Error::Authentication(format!(
            "failed to read cookie file {}: {}",
            path.display(),
            e
        ))
    })?;

    let cookies = parse_cookie_file(&content, domain);
    format_cookie_header(&cookies).ok_or_else(|| {
        Error::Authentication(format!(
            "no cookies for {} found in {}",
            domain,
            path.display()
        ))
    })
}

/// Parse a cookie export into a name -> value map.
///
/// Netscape `cookies.txt` lines (seven tab-separated columns) are filtered by
/// domain. Other non-comment lines are read as `name=value` pairs, possibly
/// several per line separated by `;`.
pub fn parse_cookie_file(content: &str, domain: &str) -> BTreeMap<String, String> {
    let mut cookies = BTreeMap::new();

    for line in content.lines() {
        // curl marks HttpOnly cookies with this prefix
        let line = line.strip_prefix("#HttpOnly_").unwrap_or(line).trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let columns: Vec<&str> = line.split('\t').collect();
        if columns.len() == 7 {
            if domain_matches(columns[0], domain) {
                cookies.insert(columns[5].to_string(), columns[6].to_string());
            }
            continue;
        }

        for pair in line.split(';') {
            if let Some((name, value)) = pair.split_once('=') {
                let name = name.trim();
                if !name.is_empty() {
                    cookies.insert(name.to_string(), value.trim().to_string());
                }
            }
        }
    }

    cookies
}

/// Join a cookie map into a header value, `None` when empty.
pub fn format_cookie_header(cookies: &BTreeMap<String, String>) -> Option<String> {
    if cookies.is_empty() {
        return None;
    }

    Some(
        cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; "),
    )
}

fn domain_matches(cookie_domain: &str, domain: &str) -> bool {
    let cookie_domain = cookie_domain.trim_start_matches('.');
    cookie_domain == domain || cookie_domain.ends_with(&format!(".{}", domain))
}
