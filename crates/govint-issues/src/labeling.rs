//! Issue label/title/slug generation (§4.5): keyword-based by default,
//! with an optional LLM pass for a more natural label.

use chrono::{DateTime, Utc};
use govint_providers::LlmProvider;
use tracing::warn;

use crate::tfidf::TfIdf;

const MAX_TITLE_LEN: usize = 100;
const MAX_LABEL_LEN: usize = 500;

/// Top-N keywords for a cluster's member texts, used for both `top_keywords`
/// metadata and label generation.
pub fn top_keywords(texts: &[&str], n: usize) -> Vec<String> {
    if texts.is_empty() {
        return Vec::new();
    }
    TfIdf::new(texts).top_terms(n).into_iter().map(|(term, _)| term).collect()
}

/// Pick the cluster member with the highest keyword overlap against
/// `keywords` — the "most representative mention text" of §4.5.
pub fn representative_text<'a>(members: &[(&'a str, &'a str)], keywords: &[String]) -> Option<&'a str> {
    members
        .iter()
        .map(|(_, text)| {
            let lower = text.to_lowercase();
            let overlap = keywords.iter().filter(|k| lower.contains(k.as_str())).count();
            (overlap, *text)
        })
        .max_by_key(|(overlap, _)| *overlap)
        .map(|(_, text)| text)
}

fn truncate_at_word_boundary(text: &str, max_len: usize) -> String {
    if text.len() <= max_len {
        return text.to_string();
    }
    match text[..max_len].rfind(' ') {
        Some(last_space) => text[..last_space].to_string(),
        None => text[..max_len].to_string(),
    }
}

/// A deterministic slug from the primary topic and the cluster's first
/// mention timestamp (§4.5): stable across recomputation.
pub fn generate_slug(topic_key: &str, first_mention_at: DateTime<Utc>) -> String {
    format!("{}-{}", topic_key, first_mention_at.format("%Y%m%d%H%M%S"))
}

/// Keyword-based title: the representative mention text, truncated to
/// 100 characters at a word boundary.
pub fn generate_title(representative_text: &str) -> String {
    truncate_at_word_boundary(representative_text, MAX_TITLE_LEN)
}

/// Keyword-based label: the top keywords joined, truncated to 500
/// characters.
pub fn generate_label(keywords: &[String]) -> String {
    if keywords.is_empty() {
        return "Unlabeled issue".to_string();
    }
    truncate_at_word_boundary(&keywords.join(" "), MAX_LABEL_LEN)
}

/// Ask the LLM Provider for a natural-language label, falling back to the
/// keyword-based label on any failure (transient or semantic) so issue
/// creation never blocks on an external call.
pub async fn generate_label_with_llm(
    llm: &dyn LlmProvider,
    representative_text: &str,
    keywords: &[String],
) -> String {
    let prompt = format!(
        "Summarize the following news mention as a short issue label (max 8 words), \
         informed by these keywords: {}.\n\nMention: {}",
        keywords.join(", "),
        representative_text
    );

    match llm.chat("You label governance-intelligence issue clusters concisely.", &prompt).await {
        Ok(text) => {
            let cleaned = text.trim().trim_matches('"').trim();
            if cleaned.is_empty() {
                generate_label(keywords)
            } else {
                truncate_at_word_boundary(cleaned, MAX_LABEL_LEN)
            }
        }
        Err(e) => {
            warn!(error = %e, "llm labeling failed, falling back to keyword label");
            generate_label(keywords)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_is_deterministic() {
        let t = Utc::now();
        assert_eq!(generate_slug("fuel_pricing", t), generate_slug("fuel_pricing", t));
    }

    #[test]
    fn title_truncates_at_word_boundary() {
        let text = "a ".repeat(60);
        let title = generate_title(&text);
        assert!(title.len() <= MAX_TITLE_LEN);
    }

    #[test]
    fn representative_text_picks_highest_overlap() {
        let members = vec![("m1", "totally unrelated content"), ("m2", "fuel prices government subsidy")];
        let keywords = vec!["fuel".to_string(), "subsidy".to_string()];
        assert_eq!(representative_text(&members, &keywords), Some("fuel prices government subsidy"));
    }

    #[test]
    fn label_falls_back_for_empty_keywords() {
        assert_eq!(generate_label(&[]), "Unlabeled issue");
    }
}
