//! Topic Classifier (C8): hybrid keyword + embedding scorer returning up
//! to `max_topics` ranked topic matches for a mention.

use govint_config::TopicConfig;
use govint_types::{non_governance_topic, Topic};
use tracing::instrument;

use crate::registry::TopicRegistry;

/// One scored topic match, ready to become a `MentionTopic` row.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicMatch {
    pub topic_key: String,
    pub topic_name: String,
    pub confidence: f32,
    pub keyword_score: f32,
    pub embedding_score: f32,
}

/// Cosine similarity between two equal-length vectors, clamped to
/// non-negative per §4.2's `e_t = max(0, cosine(...))`.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).max(0.0)
}

/// Whether `needle` occurs in `haystack` with non-alphanumeric characters
/// (or string boundaries) on both sides.
fn is_word_boundary_match(haystack: &str, needle: &str) -> bool {
    let bytes = haystack.as_bytes();
    let needle_bytes = needle.as_bytes();
    if needle_bytes.is_empty() {
        return false;
    }

    let mut start = 0;
    while let Some(rel) = haystack[start..].find(needle) {
        let pos = start + rel;
        let before_ok = pos == 0 || !bytes[pos - 1].is_ascii_alphanumeric();
        let end = pos + needle_bytes.len();
        let after_ok = end >= bytes.len() || !bytes[end].is_ascii_alphanumeric();
        if before_ok && after_ok {
            return true;
        }
        start = pos + 1;
        if start >= haystack.len() {
            break;
        }
    }
    false
}

/// Keyword sub-score `k_t` per §4.2.
fn keyword_score(lowercased_text: &str, keywords: &[String]) -> f32 {
    if keywords.is_empty() {
        return 0.0;
    }

    let mut m = 0.0f32;
    for keyword in keywords {
        let keyword_lower = keyword.to_lowercase();
        if lowercased_text.contains(&keyword_lower) {
            m += if is_word_boundary_match(lowercased_text, &keyword_lower) { 1.2 } else { 1.0 };
        }
    }

    let mut base = (m / keywords.len() as f32).min(1.0);
    if m > 1.0 {
        base = (base * (1.0 + (m + 1.0).ln() / 8.0)).min(1.0);
    }
    base
}

/// Score one topic against the cleaned text and optional mention
/// embedding, applying the §4.2 adjustments. Returns `None` if the topic
/// should be skipped.
fn score_topic(topic: &Topic, lowercased_text: &str, mention_embedding: Option<&[f32]>, config: &TopicConfig) -> Option<TopicMatch> {
    let k_t = keyword_score(lowercased_text, &topic.keywords);

    let e_t = match (mention_embedding, topic.embedding.as_deref()) {
        (Some(m), Some(t)) => cosine_similarity(m, t),
        _ => 0.0,
    };

    if k_t == 0.0 && e_t < 0.25 {
        return None;
    }

    let mut s_t = config.keyword_weight * k_t + config.embedding_weight * e_t;

    if k_t > 0.15 && e_t > 0.25 {
        s_t *= 1.15;
    } else if k_t > 0.3 || e_t > 0.5 {
        s_t *= 1.05;
    }
    s_t = s_t.min(1.0);

    if s_t < config.min_score_threshold {
        return None;
    }

    Some(TopicMatch {
        topic_key: topic.key.clone(),
        topic_name: topic.display_name.clone(),
        confidence: s_t,
        keyword_score: k_t,
        embedding_score: e_t,
    })
}

/// Classify a mention against every topic in `registry`, returning up to
/// `config.max_topics` matches sorted by confidence descending. Falls
/// back to keyword-only scoring when `mention_embedding` is `None`
/// (§4.2's embedding-unavailable fallback).
#[instrument(skip(registry, cleaned_text, mention_embedding))]
pub fn classify(registry: &TopicRegistry, cleaned_text: &str, mention_embedding: Option<&[f32]>, config: &TopicConfig) -> Vec<TopicMatch> {
    let lowercased = cleaned_text.to_lowercase();

    let mut matches: Vec<TopicMatch> = registry
        .active_topics()
        .filter_map(|topic| score_topic(topic, &lowercased, mention_embedding, config))
        .collect();

    matches.sort_by(|a, b| b.confidence.partial_cmp(&a.confidence).unwrap_or(std::cmp::Ordering::Equal));
    matches.truncate(config.max_topics);

    if matches.is_empty() {
        let pseudo = non_governance_topic();
        matches.push(TopicMatch {
            topic_key: pseudo.key,
            topic_name: pseudo.display_name,
            confidence: 0.0,
            keyword_score: 0.0,
            embedding_score: 0.0,
        });
    }

    matches
}
