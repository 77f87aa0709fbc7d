//! Tag extraction from a single free-text field.
//!
//! Conventions are tried in a fixed order and the first applicable one wins:
//!
//! 1. empty or whitespace-only input -> no tags
//! 2. a JSON array literal (`["x","y"]`) -> its elements
//! 3. input containing `#` -> every `#word` run (`"#report #urgent"`)
//! 4. input containing `,` -> comma-separated parts (`"a, b ,c"`)
//! 5. anything else -> one tag, with one pair of wrapping quotes stripped
//!
//! A JSON literal that fails to parse falls through to the next convention.
//! Input mixing `#` and `,` always takes the hashtag branch.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static HASHTAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"#([\w\x{00C0}-\x{017F}]+)").expect("HASHTAG_REGEX should compile - this is a bug")
});

/// Parse free text into a normalized tag set. Never fails.
pub fn parse_tags(raw: &str) -> BTreeSet<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return BTreeSet::new();
    }

    if let Some(tags) = parse_json_array(trimmed) {
        return tags;
    }

    if trimmed.contains('#') {
        return HASHTAG_REGEX
            .captures_iter(trimmed)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect();
    }

    if trimmed.contains(',') {
        return normalize(trimmed.split(','));
    }

    normalize(std::iter::once(strip_wrapping_quotes(trimmed)))
}

/// Trim each candidate and drop the empty ones.
pub fn normalize<I, S>(candidates: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    candidates
        .into_iter()
        .map(|tag| tag.as_ref().trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

fn parse_json_array(text: &str) -> Option<BTreeSet<String>> {
    if !(text.starts_with('[') && text.ends_with(']')) {
        return None;
    }
    let items: Vec<Value> = serde_json::from_str(text).ok()?;
    Some(normalize(items.iter().map(|item| match item {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })))
}

fn strip_wrapping_quotes(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}
