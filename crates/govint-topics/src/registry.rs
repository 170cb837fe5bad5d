//! Topic Registry (C7): an in-memory catalogue of the active topic
//! taxonomy, loaded once per process and refreshed on demand.

use std::collections::HashMap;
use std::sync::Arc;

use govint_providers::EmbeddingProvider;
use govint_storage::Storage;
use govint_types::Topic;
use tracing::{info, instrument, warn};

use crate::error::TopicsError;

/// Holds every active [`Topic`] keyed by `key`, with embeddings populated
/// on load if storage did not already have one cached.
pub struct TopicRegistry {
    topics: HashMap<String, Topic>,
}

impl TopicRegistry {
    /// Load the active topic catalogue from storage. Any topic missing an
    /// embedding has one generated via `provider` and persisted back so
    /// subsequent loads skip the embedding call (§4.2).
    #[instrument(skip(storage, provider))]
    pub async fn load(storage: &Storage, provider: &dyn EmbeddingProvider) -> Result<Self, TopicsError> {
        let mut topics = storage.list_active_topics()?;
        let mut by_key = HashMap::with_capacity(topics.len());

        for topic in topics.iter_mut() {
            if topic.embedding.is_none() {
                let source_text = topic.embedding_source_text();
                match provider.embed(&source_text).await {
                    Ok(embedding) => {
                        topic.embedding = Some(embedding);
                        storage.put_topic(topic)?;
                    }
                    Err(e) => {
                        warn!(topic = %topic.key, error = %e, "failed to embed topic, keyword-only scoring will apply");
                    }
                }
            }
        }

        info!(count = topics.len(), "topic registry loaded");

        for topic in topics {
            by_key.insert(topic.key.clone(), topic);
        }

        Ok(Self { topics: by_key })
    }

    pub fn get(&self, key: &str) -> Option<&Topic> {
        self.topics.get(key)
    }

    pub fn active_topics(&self) -> impl Iterator<Item = &Topic> {
        self.topics.values()
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

pub type SharedTopicRegistry = Arc<TopicRegistry>;

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use govint_providers::ProviderError;
    use tempfile::TempDir;

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

    fn open_storage() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        (dir, storage)
    }

    #[tokio::test]
    async fn load_embeds_topics_missing_a_vector() {
        let (_dir, storage) = open_storage();
        let topic = Topic::new("fuel_pricing", "Fuel Pricing", "Fuel subsidies and prices", vec!["fuel".into()]);
        storage.put_topic(&topic).unwrap();

        let registry = TopicRegistry::load(&storage, &StubEmbedder).await.unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.get("fuel_pricing").unwrap().embedding.is_some());

        let persisted = storage.get_topic("fuel_pricing").unwrap().unwrap();
        assert!(persisted.embedding.is_some());
    }

    #[tokio::test]
    async fn load_skips_inactive_topics() {
        let (_dir, storage) = open_storage();
        let mut inactive = Topic::new("legacy", "Legacy", "", Vec::new());
        inactive.active = false;
        storage.put_topic(&inactive).unwrap();

        let registry = TopicRegistry::load(&storage, &StubEmbedder).await.unwrap();
        assert!(registry.is_empty());
    }
}
