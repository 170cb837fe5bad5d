//! # govint-emotion
//!
//! The Emotion Analyzer (C6): a local model producing a fixed-vocabulary
//! emotion distribution over mention text, with no external API calls.
//!
//! - Sentence encoder (`sentence-transformers/all-MiniLM-L6-v2`) plus a
//!   linear classification head over `{anger, fear, trust, sadness, joy,
//!   disgust, neutral}`.
//! - Automatic model file caching via HuggingFace Hub.
//! - Batch classification for the orchestrator's worker pool.

pub mod cache;
pub mod candle;
pub mod error;
pub mod model;

pub use crate::candle::CandleEmotionClassifier;
pub use cache::{get_or_download_model, ModelCache, ModelPaths, DEFAULT_HEAD_REPO, DEFAULT_MODEL_REPO};
pub use error::EmotionError;
pub use model::{distribution_from_scores, EmotionModel, ModelInfo, EMOTION_LABELS};
