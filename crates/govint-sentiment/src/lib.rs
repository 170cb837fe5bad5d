//! # govint-sentiment
//!
//! The Sentiment Analyzer (C9): per mention, runs polarity
//! classification, emotion classification, and embedding generation
//! concurrently, then derives influence and confidence weights (§4.3).

pub mod analyzer;
pub mod error;
pub mod influence;
pub mod polarity;

pub use analyzer::{SentimentAnalysis, SentimentAnalyzer};
pub use error::SentimentError;
pub use influence::{confidence_weight, influence_weight};
pub use polarity::{classify_polarity, PolarityResult};
