//! Normalization used by both the URL-identity and textual-similarity
//! dedup checks (§4.7). Pure string transforms, no I/O.

use std::collections::BTreeSet;

/// Lowercase, strip a trailing slash and a `www.` host prefix so
/// trivially-equivalent URLs compare equal.
pub fn normalize_url(url: &str) -> String {
    let lower = url.trim().to_lowercase();
    let without_scheme = lower.strip_prefix("https://").or_else(|| lower.strip_prefix("http://")).unwrap_or(&lower);
    let without_www = without_scheme.strip_prefix("www.").unwrap_or(without_scheme);
    without_www.trim_end_matches('/').to_string()
}

/// Lowercase and collapse all non-alphanumeric runs to single spaces,
/// producing the canonical form compared for exact-text duplicates.
pub fn normalize_text(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    let mut last_was_space = true;
    for ch in text.to_lowercase().chars() {
        if ch.is_alphanumeric() {
            normalized.push(ch);
            last_was_space = false;
        } else if !last_was_space {
            normalized.push(' ');
            last_was_space = true;
        }
    }
    normalized.trim_end().to_string()
}

/// The normalized token set used by the Jaccard similarity check.
pub fn token_set(text: &str) -> BTreeSet<String> {
    normalize_text(text).split_whitespace().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_normalization_ignores_scheme_www_and_trailing_slash() {
        assert_eq!(normalize_url("https://www.example.com/news/a/"), normalize_url("http://example.com/news/a"));
    }

    #[test]
    fn text_normalization_collapses_punctuation() {
        assert_eq!(normalize_text("Fuel prices, up again!!"), "fuel prices up again");
    }

    #[test]
    fn token_set_is_order_independent() {
        assert_eq!(token_set("fuel prices rise"), token_set("prices rise fuel"));
    }
}
