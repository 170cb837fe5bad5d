//! Sentiment Analyzer (C9): the three parallel sub-tasks of §4.3 run
//! concurrently per mention, then influence and confidence weights are
//! derived deterministically from the results and the mention's
//! metadata.

use std::sync::Arc;

use govint_config::EngagementConfig;
use govint_emotion::EmotionModel;
use govint_providers::{EmbeddingProvider, LlmProvider};
use govint_types::{Engagement, EmotionDistribution, SourceType};
use tracing::instrument;

use crate::error::SentimentError;
use crate::influence::{confidence_weight, influence_weight};
use crate::polarity::{classify_polarity, PolarityResult};

const EMBEDDING_TEXT_MAX_CHARS: usize = 8000;

/// Everything §4.3 derives for one mention, ready to be written back in
/// a single transaction alongside topic links.
#[derive(Debug, Clone)]
pub struct SentimentAnalysis {
    pub polarity: PolarityResult,
    pub emotion: EmotionDistribution,
    pub embedding: Vec<f32>,
    pub influence_weight: f32,
    pub confidence_weight: f32,
}

pub struct SentimentAnalyzer {
    llm: Arc<dyn LlmProvider>,
    emotion_model: Arc<dyn EmotionModel>,
    embedder: Arc<dyn EmbeddingProvider>,
    engagement_config: EngagementConfig,
    system_prompt: Option<String>,
}

impl SentimentAnalyzer {
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        emotion_model: Arc<dyn EmotionModel>,
        embedder: Arc<dyn EmbeddingProvider>,
        engagement_config: EngagementConfig,
    ) -> Self {
        Self { llm, emotion_model, embedder, engagement_config, system_prompt: None }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Run polarity, emotion, and embedding concurrently, then derive the
    /// influence and confidence weights (§4.3).
    #[instrument(skip(self, text, engagement))]
    pub async fn analyze(&self, text: &str, source_type: SourceType, engagement: Option<&Engagement>) -> Result<SentimentAnalysis, SentimentError> {
        let truncated: String = text.chars().take(EMBEDDING_TEXT_MAX_CHARS).collect();

        let llm = self.llm.clone();
        let system_prompt = self.system_prompt.clone();
        let polarity_text = text.to_string();
        let polarity_fut = async move { classify_polarity(llm.as_ref(), system_prompt.as_deref(), &polarity_text).await };

        let emotion_model = self.emotion_model.clone();
        let emotion_text = text.to_string();
        let emotion_fut = tokio::task::spawn_blocking(move || emotion_model.classify(&emotion_text));

        let embedder = self.embedder.clone();
        let embed_fut = async move { embedder.embed(&truncated).await };

        let (polarity, embedding, emotion): (PolarityResult, Vec<f32>, govint_types::EmotionDistribution) = tokio::try_join!(
            polarity_fut,
            async { Ok::<_, SentimentError>(embed_fut.await?) },
            async {
                let classified = emotion_fut
                    .await
                    .map_err(|e| SentimentError::MalformedOutput(format!("emotion task panicked: {e}")))?;
                Ok::<_, SentimentError>(classified?)
            }
        )?;

        let w_inf = influence_weight(source_type, engagement, &self.engagement_config);
        let w_conf = confidence_weight(polarity.score, &emotion);

        Ok(SentimentAnalysis { polarity, emotion, embedding, influence_weight: w_inf, confidence_weight: w_conf })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use govint_emotion::{EmotionError, ModelInfo};
    use govint_providers::ProviderError;

    use super::*;

    struct StubLlm(&'static str);

    #[async_trait]
    impl LlmProvider for StubLlm {
        async fn chat(&self, _system: &str, _user: &str) -> Result<String, ProviderError> {
            Ok(self.0.to_string())
        }
    }

    struct StubEmbedder;

    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, ProviderError> {
            Ok(vec![0.1, 0.2, 0.3])
        }
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
            Ok(texts.iter().map(|_| vec![0.1, 0.2, 0.3]).collect())
        }
    }

    struct StubEmotionModel(ModelInfo);

    impl EmotionModel for StubEmotionModel {
        fn info(&self) -> &ModelInfo {
            &self.0
        }
        fn classify(&self, _text: &str) -> Result<EmotionDistribution, EmotionError> {
            Ok(EmotionDistribution { joy: 0.8, trust: 0.2, ..Default::default() })
        }
    }

    #[tokio::test]
    async fn analyze_combines_three_sub_tasks() {
        let analyzer = SentimentAnalyzer::new(
            Arc::new(StubLlm(r#"{"label": "POSITIVE", "score": 0.7, "justification": "great", "topic_hints": []}"#)),
            Arc::new(StubEmotionModel(ModelInfo { name: "stub".into(), max_sequence_length: 256 })),
            Arc::new(StubEmbedder),
            EngagementConfig::default(),
        );

        let result = analyzer.analyze("the harvest was good this year", SourceType::Citizen, None).await.unwrap();
        assert_eq!(result.polarity.label, govint_types::SentimentLabel::Positive);
        assert_eq!(result.embedding, vec![0.1, 0.2, 0.3]);
        assert_eq!(result.influence_weight, 1.0);
        assert!((result.confidence_weight - 0.7 * 0.8).abs() < 1e-6);
    }

    #[tokio::test]
    async fn analyze_propagates_terminal_parse_failure() {
        let analyzer = SentimentAnalyzer::new(
            Arc::new(StubLlm("not json at all")),
            Arc::new(StubEmotionModel(ModelInfo { name: "stub".into(), max_sequence_length: 256 })),
            Arc::new(StubEmbedder),
            EngagementConfig::default(),
        );

        let err = analyzer.analyze("text", SourceType::Citizen, None).await.unwrap_err();
        assert!(!err.is_retryable());
    }
}
