//! Per-mention work unit for phases 4-5: topic classification + sentiment
//! analysis, with the orchestrator-level retry policy for transient
//! provider failures (§4.4, §7).

use backoff::{backoff::Backoff, ExponentialBackoff};
use govint_config::TopicConfig;
use govint_sentiment::{SentimentAnalysis, SentimentAnalyzer, SentimentError};
use govint_topics::{classify, TopicRegistry};
use govint_types::{Mention, MentionTopic};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::location::resolve_location;

/// The result of running one mention through classification + analysis,
/// ready for `Storage::commit_mention_result`.
pub struct MentionOutcome {
    pub mention: Mention,
    pub topic_links: Vec<MentionTopic>,
    pub embedding: Option<Vec<f32>>,
}

/// Retry `analyzer.analyze(...)` up to `max_attempts` times, backing off
/// exponentially between attempts, but only while the failure is in the
/// transient class (§7); a semantic failure returns immediately.
async fn analyze_with_retry(analyzer: &SentimentAnalyzer, mention: &Mention, max_attempts: u32) -> Result<SentimentAnalysis, SentimentError> {
    let mut backoff = ExponentialBackoff::default();
    let mut attempt = 0;

    loop {
        attempt += 1;
        match analyzer.analyze(&mention.text, mention.source_type, mention.engagement.as_ref()).await {
            Ok(analysis) => return Ok(analysis),
            Err(e) if !e.is_retryable() || attempt >= max_attempts => return Err(e),
            Err(e) => {
                let wait = backoff.next_backoff().unwrap_or_default();
                warn!(mention_id = %mention.id, attempt, error = %e, retry_in_ms = wait.as_millis(), "sentiment analysis failed, retrying");
                tokio::time::sleep(wait).await;
            }
        }
    }
}

/// Process one claimed (`processing`) mention through location resolution,
/// topic classification, and sentiment analysis, returning either a
/// `completed` mention with its topic links and embedding, or a `failed`
/// mention with neither.
#[instrument(skip(mention, registry, topic_config, analyzer), fields(mention_id = %mention.id))]
pub async fn process_mention(mut mention: Mention, registry: &TopicRegistry, topic_config: &TopicConfig, analyzer: &SentimentAnalyzer, max_attempts: u32) -> MentionOutcome {
    resolve_location(&mut mention);

    let analysis = match analyze_with_retry(analyzer, &mention, max_attempts).await {
        Ok(analysis) => analysis,
        Err(e) => {
            mention.mark_failed(e.to_string());
            return MentionOutcome { mention, topic_links: Vec::new(), embedding: None };
        }
    };

    let matches = classify(registry, &mention.text, Some(&analysis.embedding), topic_config);
    let topic_links: Vec<MentionTopic> = matches
        .into_iter()
        .map(|m| MentionTopic::new(Uuid::new_v4().to_string(), mention.id.clone(), m.topic_key, m.confidence, m.keyword_score, m.embedding_score))
        .collect();

    let (dominant_label, dominant_score) = analysis.emotion.dominant();
    let completion = mention.mark_completed(
        analysis.polarity.label,
        analysis.polarity.score,
        analysis.polarity.justification,
        dominant_label.to_string(),
        dominant_score,
        analysis.emotion.to_hashmap(),
        analysis.influence_weight,
        analysis.confidence_weight,
    );

    match completion {
        Ok(()) => MentionOutcome { mention, topic_links, embedding: Some(analysis.embedding) },
        Err(e) => {
            mention.mark_failed(format!("post-analysis validation failed: {e}"));
            MentionOutcome { mention, topic_links: Vec::new(), embedding: None }
        }
    }
}
