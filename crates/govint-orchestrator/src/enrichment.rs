//! Phase 4 under `use_existing_data=true` (§6): no external LLM or
//! embedding calls are made. Every already-`completed` mention (one with
//! both a stored embedding and a sentiment label) is re-run through
//! location resolution and topic classification using its existing
//! embedding, filling in whichever of those two derived fields is still
//! missing rather than recomputing sentiment from scratch.

use govint_config::TopicConfig;
use govint_storage::Storage;
use govint_topics::{classify, TopicRegistry};
use govint_types::{Mention, MentionTopic};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::OrchestratorError;
use crate::location::resolve_location;

#[derive(Debug, Default, Clone, Copy)]
pub struct EnrichmentResult {
    pub mentions_scanned: usize,
    pub mentions_enriched: usize,
}

fn needs_enrichment(mention: &Mention, existing_links: &[MentionTopic]) -> bool {
    let needs_location = mention.declared_location.is_some() && mention.location_label.is_none();
    let needs_topics = existing_links.is_empty();
    needs_location || needs_topics
}

/// Re-derive location and topic links for completed mentions whose
/// embedding makes them eligible, without touching sentiment fields or
/// calling any provider.
#[instrument(skip(storage, registry, topic_config))]
pub fn run_enrichment_pass(storage: &Storage, registry: &TopicRegistry, topic_config: &TopicConfig) -> Result<EnrichmentResult, OrchestratorError> {
    let mut result = EnrichmentResult::default();

    for mut mention in storage.list_mentions()? {
        if !mention.is_completed() {
            continue;
        }
        let Some(embedding) = storage.get_embedding(&mention.id)? else {
            continue;
        };
        result.mentions_scanned += 1;

        let existing_links = storage.get_mention_topics_for_mention(&mention.id)?;
        if !needs_enrichment(&mention, &existing_links) {
            continue;
        }

        resolve_location(&mut mention);

        let topic_links = if existing_links.is_empty() {
            classify(registry, &mention.text, Some(&embedding), topic_config)
                .into_iter()
                .map(|m| MentionTopic::new(Uuid::new_v4().to_string(), mention.id.clone(), m.topic_key, m.confidence, m.keyword_score, m.embedding_score))
                .collect()
        } else {
            existing_links
        };

        storage.commit_mention_result(&mention, &topic_links, None)?;
        result.mentions_enriched += 1;
    }

    if result.mentions_enriched > 0 {
        info!(mentions_scanned = result.mentions_scanned, mentions_enriched = result.mentions_enriched, "enrichment pass complete");
    }

    Ok(result)
}
