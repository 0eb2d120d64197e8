//! Filename sanitization.

use crate::error::{Error, Result};

/// Longest folder name produced from a post title, in UTF-8 bytes.
///
/// Filesystems limit a name to 255 bytes; the margin leaves room for the
/// reserved-name suffix.
const MAX_TITLE_BYTES: usize = 200;

/// Device names Windows refuses as file or folder names.
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Replace characters that are not allowed in a path component.
fn replace_illegal(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Cut `name` to at most `max_bytes` bytes on a character boundary.
fn truncate_bytes(name: &str, max_bytes: usize) -> &str {
    if name.len() <= max_bytes {
        return name;
    }

    let end = name
        .char_indices()
        .map(|(idx, _)| idx)
        .take_while(|&idx| idx <= max_bytes)
        .last()
        .unwrap_or(0);

    &name[..end]
}

/// Turn a post title into a folder name.
///
/// Never fails: illegal characters are replaced, surrounding whitespace and
/// trailing dots are trimmed and the result is length-capped. The same title
/// always maps to the same name. Returns an empty string when nothing usable
/// is left.
pub fn sanitize_title(title: &str) -> String {
    let replaced = replace_illegal(title);
    let capped = truncate_bytes(replaced.trim(), MAX_TITLE_BYTES);
    let trimmed = capped.trim_end_matches(['.', ' ']).trim();

    let stem = trimmed.split('.').next().unwrap_or("");
    if RESERVED_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(stem))
    {
        return format!("{}_", trimmed);
    }

    trimmed.to_string()
}

/// Sanitize a path component such as a creator handle.
///
/// Unlike [`sanitize_title`] this rejects traversal attempts and empty names.
pub fn sanitize_path_component(name: &str) -> Result<String> {
    // Reject path traversal attempts
    if name.contains("..") {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    // Reject null bytes
    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed: '{}'",
            name
        )));
    }

    let sanitized = replace_illegal(name);

    // Reject empty or whitespace-only names
    if sanitized.trim().is_empty() {
        return Err(Error::InvalidFilename(
            "Path component cannot be empty or whitespace-only".to_string(),
        ));
    }

    Ok(sanitized)
}
