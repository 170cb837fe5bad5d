//! # govint-dedup
//!
//! The Deduplication Service (C10, §4.7): filters candidate raw records
//! against a rolling lookback window by normalized URL identity, exact
//! normalized-text match, and fuzzy Jaccard similarity within 24 hours.

pub mod jaccard;
pub mod normalize;
pub mod service;

pub use jaccard::jaccard_similarity;
pub use normalize::{normalize_text, normalize_url, token_set};
pub use service::{DedupDecision, DedupReason, Deduplicator, RawCandidate};
