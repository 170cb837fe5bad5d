//! Shared end-to-end test harness: scripted provider stubs and fixture
//! builders used by the invariant and scenario suites.
//!
//! Mirrors the stub pattern already used throughout the unit test
//! modules (`govint-orchestrator::pipeline`, `govint-sentiment::analyzer`)
//! rather than reaching for a real HTTP/model backend.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use govint_config::BootstrapSettings;
use govint_emotion::{EmotionError, EmotionModel, ModelInfo};
use govint_providers::{EmbeddingProvider, LlmProvider, ProviderError};
use govint_storage::Storage;
use govint_types::{EmotionDistribution, Mention, MentionTopic, SentimentLabel, SourceType, Topic};
use tempfile::TempDir;

/// LLM stub: the first matching `(trigger, response)` pair wins, tried
/// against the lowercased mention text; `fallback` covers everything
/// else. Lets a scenario script polarity by keyword without a real
/// model call.
pub struct ScriptedLlm {
    rules: Vec<(String, String)>,
    fallback: String,
}

impl ScriptedLlm {
    pub fn new(rules: Vec<(String, String)>, fallback: impl Into<String>) -> Self {
        Self { rules, fallback: fallback.into() }
    }

    pub fn always(response: impl Into<String>) -> Self {
        Self { rules: Vec::new(), fallback: response.into() }
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    async fn chat(&self, _system: &str, user: &str) -> Result<String, ProviderError> {
        let lower = user.to_lowercase();
        for (trigger, response) in &self.rules {
            if lower.contains(trigger.as_str()) {
                return Ok(response.clone());
            }
        }
        Ok(self.fallback.clone())
    }
}

pub fn negative_polarity_json(score: f32) -> String {
    format!(r#"{{"label": "NEGATIVE", "score": {score}, "justification": "citizen complaint", "topic_hints": []}}"#)
}

pub fn positive_polarity_json(score: f32) -> String {
    format!(r#"{{"label": "POSITIVE", "score": {score}, "justification": "citizen praise", "topic_hints": []}}"#)
}

pub fn neutral_polarity_json() -> String {
    r#"{"label": "NEUTRAL", "score": 0.0, "justification": "factual report", "topic_hints": []}"#.to_string()
}

/// Embedder stub returning a caller-assigned vector per exact text match,
/// falling back to a fixed low-magnitude vector for anything unscripted
/// so classification against topics with no keyword overlap still works
/// deterministically.
pub struct ScriptedEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    fallback: Vec<f32>,
}

impl ScriptedEmbedder {
    pub fn new(vectors: HashMap<String, Vec<f32>>, fallback: Vec<f32>) -> Self {
        Self { vectors, fallback }
    }
}

#[async_trait]
impl EmbeddingProvider for ScriptedEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        Ok(self.vectors.get(text).cloned().unwrap_or_else(|| self.fallback.clone()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }
}

/// Emotion stub returning a fixed distribution regardless of input text.
pub struct FixedEmotionModel {
    info: ModelInfo,
    distribution: EmotionDistribution,
}

impl FixedEmotionModel {
    pub fn new(distribution: EmotionDistribution) -> Self {
        Self { info: ModelInfo { name: "stub-emotion".to_string(), max_sequence_length: 512 }, distribution }
    }

    pub fn angry_and_sad() -> Self {
        Self::new(EmotionDistribution { anger: 0.5, sadness: 0.3, fear: 0.1, disgust: 0.1, ..Default::default() })
    }

    pub fn trusting_and_joyful() -> Self {
        Self::new(EmotionDistribution { joy: 0.6, trust: 0.4, ..Default::default() })
    }
}

impl EmotionModel for FixedEmotionModel {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    fn classify(&self, _text: &str) -> Result<EmotionDistribution, EmotionError> {
        Ok(self.distribution.clone())
    }
}

/// An open `Storage` plus the `TempDir` that backs it, kept alive for
/// the duration of a test.
pub struct TestDb {
    pub _dir: TempDir,
    pub storage: Storage,
}

pub fn open_test_db() -> TestDb {
    let dir = TempDir::new().expect("tempdir");
    let storage = Storage::open(dir.path()).expect("open storage");
    TestDb { _dir: dir, storage }
}

pub fn default_bootstrap() -> BootstrapSettings {
    BootstrapSettings::default()
}

/// Seed the fixed `fuel_pricing` governance topic used across the
/// scenario suite, with a deterministic embedding so cosine similarity
/// against scripted mention embeddings is exact.
pub fn seed_fuel_pricing_topic(storage: &Storage) -> Topic {
    let topic = Topic::new(
        "fuel_pricing",
        "Fuel Pricing",
        "Petrol and diesel prices, fuel subsidies, and pump shortages",
        vec!["fuel".to_string(), "petrol".to_string(), "subsidy".to_string(), "prices".to_string()],
    )
    .with_embedding(vec![1.0, 0.0, 0.0]);
    storage.put_topic(&topic).unwrap();
    topic
}

/// Build a `completed` mention directly (bypassing the analyzer), for
/// tests that only need the downstream issue/aggregation behavior.
#[allow(clippy::too_many_arguments)]
pub fn completed_mention(
    id: &str,
    text: &str,
    published_at: DateTime<Utc>,
    source_type: SourceType,
    label: SentimentLabel,
    score: f32,
    emotion: EmotionDistribution,
    influence_weight: f32,
    confidence_weight: f32,
) -> Mention {
    let mut mention = Mention::new(id, text, published_at, "citizen_post", source_type, "op1");
    mention.mark_processing();
    let (dominant_label, dominant_score) = emotion.dominant();
    mention
        .mark_completed(
            label,
            score,
            "scripted".to_string(),
            dominant_label.to_string(),
            dominant_score,
            emotion.to_hashmap(),
            influence_weight,
            confidence_weight,
        )
        .expect("score/label band consistent");
    mention
}

/// Store a mention, its embedding, and its `fuel_pricing` topic link in
/// one call, matching the seeding pattern used by
/// `govint-issues::detection`'s own tests.
pub fn seed_mention_with_topic_link(storage: &Storage, mention: &Mention, embedding: &[f32], topic_confidence: f32) {
    storage.put_mention(mention).unwrap();
    storage.put_embedding(&mention.id, embedding).unwrap();
    let link = MentionTopic::new(format!("mt-{}", mention.id), &mention.id, "fuel_pricing", topic_confidence, topic_confidence, topic_confidence);
    storage.put_mention_topic(&link).unwrap();
}
