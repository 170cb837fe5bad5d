//! Deduplication Service (C10, §4.7): rejects candidate raw records that
//! duplicate a record already accepted within the lookback window.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use govint_config::DeduplicationConfig;
use tracing::debug;

use crate::jaccard::jaccard_similarity;
use crate::normalize::{normalize_text, normalize_url, token_set};

const FUZZY_MATCH_WINDOW_HOURS: i64 = 24;

/// A candidate raw record being considered for ingestion.
#[derive(Debug, Clone)]
pub struct RawCandidate {
    pub url: Option<String>,
    pub text: String,
    pub published_at: DateTime<Utc>,
}

/// A previously-accepted record kept around for comparison within the
/// lookback window.
#[derive(Debug, Clone)]
pub struct SeenRecord {
    normalized_url: Option<String>,
    normalized_text: String,
    tokens: BTreeSet<String>,
    published_at: DateTime<Utc>,
}

impl SeenRecord {
    fn from_candidate(candidate: &RawCandidate) -> Self {
        Self {
            normalized_url: candidate.url.as_deref().map(normalize_url),
            normalized_text: normalize_text(&candidate.text),
            tokens: token_set(&candidate.text),
            published_at: candidate.published_at,
        }
    }
}

/// Why a candidate was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum DedupReason {
    DuplicateUrl,
    DuplicateText,
    NearDuplicate { similarity: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DedupDecision {
    Keep,
    Reject(DedupReason),
}

/// Stateful dedup checker seeded with whatever records already fall
/// within the lookback window; accepted candidates are folded into the
/// window for subsequent comparisons in the same batch.
pub struct Deduplicator {
    config: DeduplicationConfig,
    window: Vec<SeenRecord>,
}

impl Deduplicator {
    pub fn new(config: DeduplicationConfig, existing: Vec<RawCandidate>) -> Self {
        Self { window: existing.iter().map(SeenRecord::from_candidate).collect(), config }
    }

    fn within_window(&self, published_at: DateTime<Utc>, reference: DateTime<Utc>) -> bool {
        (reference - published_at).abs() <= Duration::days(self.config.window_days as i64)
    }

    /// Evaluate one candidate against the current window, inserting it
    /// into the window if kept.
    pub fn evaluate(&mut self, candidate: &RawCandidate) -> DedupDecision {
        let normalized_url = candidate.url.as_deref().map(normalize_url);
        let normalized_text = normalize_text(&candidate.text);
        let tokens = token_set(&candidate.text);

        for seen in &self.window {
            if !self.within_window(seen.published_at, candidate.published_at) {
                continue;
            }

            if let (Some(a), Some(b)) = (&normalized_url, &seen.normalized_url) {
                if a == b {
                    debug!("rejecting candidate: duplicate normalized url");
                    return DedupDecision::Reject(DedupReason::DuplicateUrl);
                }
            }

            if normalized_text == seen.normalized_text {
                debug!("rejecting candidate: exact normalized text match");
                return DedupDecision::Reject(DedupReason::DuplicateText);
            }

            let close_in_time = (candidate.published_at - seen.published_at).abs() <= Duration::hours(FUZZY_MATCH_WINDOW_HOURS);
            if close_in_time {
                let similarity = jaccard_similarity(&tokens, &seen.tokens);
                if similarity >= self.config.similarity_threshold {
                    debug!(similarity, "rejecting candidate: near-duplicate text within 24h");
                    return DedupDecision::Reject(DedupReason::NearDuplicate { similarity });
                }
            }
        }

        self.window.push(SeenRecord { normalized_url, normalized_text, tokens, published_at: candidate.published_at });
        DedupDecision::Keep
    }

    /// Evaluate a batch in order, each candidate compared against both
    /// pre-seeded records and earlier-kept candidates from this batch.
    pub fn evaluate_batch(&mut self, candidates: &[RawCandidate]) -> Vec<DedupDecision> {
        candidates.iter().map(|c| self.evaluate(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(url: Option<&str>, text: &str, published_at: DateTime<Utc>) -> RawCandidate {
        RawCandidate { url: url.map(|s| s.to_string()), text: text.to_string(), published_at }
    }

    #[test]
    fn identical_url_is_rejected() {
        let mut dedup = Deduplicator::new(DeduplicationConfig::default(), vec![]);
        let now = Utc::now();
        assert_eq!(dedup.evaluate(&candidate(Some("https://example.com/a"), "first", now)), DedupDecision::Keep);
        assert_eq!(
            dedup.evaluate(&candidate(Some("https://www.example.com/a/"), "different text entirely", now)),
            DedupDecision::Reject(DedupReason::DuplicateUrl)
        );
    }

    #[test]
    fn exact_text_match_is_rejected_even_without_url() {
        let mut dedup = Deduplicator::new(DeduplicationConfig::default(), vec![]);
        let now = Utc::now();
        assert_eq!(dedup.evaluate(&candidate(None, "Fuel prices rise again", now)), DedupDecision::Keep);
        assert_eq!(dedup.evaluate(&candidate(None, "fuel PRICES rise again!!", now)), DedupDecision::Reject(DedupReason::DuplicateText));
    }

    #[test]
    fn near_duplicate_within_24h_is_rejected() {
        let mut dedup = Deduplicator::new(DeduplicationConfig::default(), vec![]);
        let now = Utc::now();
        dedup.evaluate(&candidate(None, "fuel subsidy removed nationwide yesterday", now));
        let decision = dedup.evaluate(&candidate(None, "fuel subsidy removed nationwide today", now + Duration::hours(2)));
        assert!(matches!(decision, DedupDecision::Reject(DedupReason::NearDuplicate { .. })));
    }

    #[test]
    fn near_duplicate_outside_24h_is_kept() {
        let mut dedup = Deduplicator::new(DeduplicationConfig::default(), vec![]);
        let now = Utc::now();
        dedup.evaluate(&candidate(None, "fuel subsidy removed nationwide yesterday", now));
        let decision = dedup.evaluate(&candidate(None, "fuel subsidy removed nationwide today", now + Duration::hours(30)));
        assert_eq!(decision, DedupDecision::Keep);
    }

    #[test]
    fn unrelated_candidate_is_kept() {
        let mut dedup = Deduplicator::new(DeduplicationConfig::default(), vec![]);
        let now = Utc::now();
        dedup.evaluate(&candidate(None, "fuel subsidy removed nationwide", now));
        let decision = dedup.evaluate(&candidate(None, "school resumption date announced", now));
        assert_eq!(decision, DedupDecision::Keep);
    }
}
