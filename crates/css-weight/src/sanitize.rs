//! Text Sanitizer
//!
//! Normalizes case and whitespace in condition and selector text so the
//! tokenizers and scanners downstream see one canonical spelling.

use std::sync::LazyLock;

use regex::Regex;

use crate::{CssWeightError, Result};

static MULTI_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("Invalid whitespace regex"));

static COLON_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s?:\s?").expect("Invalid colon regex"));

/// Sanitize at-rule or condition text.
///
/// Lowercases, collapses whitespace runs to a single space, drops the first
/// space after `(` and the first space before `)`, strips whitespace around
/// every `:` and trims the result.
pub fn sanitize_at_rule(text: &str) -> String {
    let lowered = text.to_lowercase();
    let collapsed = MULTI_SPACE.replace_all(&lowered, " ");
    // Only the first occurrence of each paren pattern is rewritten.
    let opened = collapsed.replacen("( ", "(", 1);
    let closed = opened.replacen(" )", ")", 1);

    COLON_SPACE.replace_all(&closed, ":").trim().to_string()
}

/// Sanitize a selector: lowercase, collapse whitespace runs, trim.
pub fn sanitize_selector(text: &str) -> String {
    let lowered = text.to_lowercase();
    MULTI_SPACE.replace_all(&lowered, " ").trim().to_string()
}

/// Byte-level entry point for [`sanitize_at_rule`].
pub fn sanitize_at_rule_bytes(bytes: &[u8]) -> Result<String> {
    Ok(sanitize_at_rule(as_text(bytes, "condition")?))
}

/// Byte-level entry point for [`sanitize_selector`].
pub fn sanitize_selector_bytes(bytes: &[u8]) -> Result<String> {
    Ok(sanitize_selector(as_text(bytes, "selector")?))
}

fn as_text<'a>(bytes: &'a [u8], what: &str) -> Result<&'a str> {
    std::str::from_utf8(bytes)
        .map_err(|e| CssWeightError::InvalidInput(format!("{what} must be a string: {e}")))
}
