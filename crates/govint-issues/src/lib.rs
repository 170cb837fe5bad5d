//! # govint-issues
//!
//! Issue Clustering (C13), Issue Detection Engine (C14), and Issue
//! Metrics (C15).
//!
//! Mentions linked to a topic are clustered by embedding similarity
//! ([`clustering`]), matched against (or used to seed) an [`Issue`][govint_types::Issue]
//! ([`detection`]), and scored for volume, velocity, priority, and
//! lifecycle state ([`metrics`]). [`labeling`] derives an issue's slug,
//! title, and label, optionally with LLM assistance.

pub mod clustering;
pub mod detection;
pub mod error;
pub mod labeling;
pub mod metrics;
pub mod similarity;
pub mod tfidf;

pub use clustering::{cluster_mentions, Cluster, ClusterableMention};
pub use detection::{detect_issues_for_topic, DetectionOutcome};
pub use error::IssuesError;
pub use labeling::{generate_label, generate_label_with_llm, generate_slug, generate_title, representative_text};
pub use metrics::{lifecycle_state, priority_score, regions_impacted, top_sources, velocity_percent, velocity_score, volume_windows, MentionMetricInput};
pub use similarity::{calculate_centroid, cosine_similarity, normalize};
pub use tfidf::TfIdf;
