//! Construction of the concrete providers, storage, and config every
//! command needs, kept separate from argument parsing and command
//! dispatch so each piece can be grounded and tested independently.

use std::sync::Arc;

use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};

use govint_config::{BootstrapSettings, ConfigStore, PathResolver};
use govint_emotion::{CandleEmotionClassifier, ModelCache, DEFAULT_HEAD_REPO, DEFAULT_MODEL_REPO};
use govint_providers::{HttpProvider, HttpProviderConfig};
use govint_rate_limiter::RateLimiter;
use govint_sentiment::SentimentAnalyzer;
use govint_storage::Storage;
use govint_topics::TopicRegistry;

/// Every long-lived handle a command needs for one process lifetime.
pub struct Runtime {
    pub storage: Arc<Storage>,
    pub config_store: ConfigStore,
    pub path_resolver: PathResolver,
    pub bootstrap: BootstrapSettings,
    pub topic_registry: TopicRegistry,
    pub analyzer: SentimentAnalyzer,
}

pub fn load_bootstrap(config_path: Option<&str>, log_level_override: Option<&str>) -> Result<BootstrapSettings> {
    let mut bootstrap = BootstrapSettings::load(config_path).context("failed to load bootstrap configuration")?;
    if let Some(level) = log_level_override {
        bootstrap.log_level = level.to_string();
    }
    Ok(bootstrap)
}

pub fn build_path_resolver(bootstrap: &BootstrapSettings) -> PathResolver {
    PathResolver::from_bootstrap(bootstrap)
}

pub fn open_storage(path_resolver: &PathResolver) -> Result<Arc<Storage>> {
    Storage::open_arc(path_resolver.db_path()).with_context(|| format!("failed to open storage at {:?}", path_resolver.db_path()))
}

fn llm_api_key() -> Result<SecretString> {
    let raw = std::env::var("GOVINT_LLM_API_KEY").context(
        "GOVINT_LLM_API_KEY must be set to a valid API key for the configured LLM/embedding endpoint",
    )?;
    Ok(SecretString::from(raw))
}

/// Build every handle a cycle needs: opens storage, loads the runtime
/// config store, seeds the topic registry, and wires the LLM/embedding
/// HTTP provider plus the local emotion classifier into a
/// `SentimentAnalyzer`.
pub async fn build_runtime(bootstrap: BootstrapSettings) -> Result<Runtime> {
    let path_resolver = build_path_resolver(&bootstrap);
    let storage = open_storage(&path_resolver)?;
    let config_store = ConfigStore::load(storage.clone()).context("failed to load runtime config store")?;
    let processing_config = config_store.processing_config().context("failed to materialize processing config")?;

    let api_key = llm_api_key()?;
    let embedding_model = config_store.get_string("models.embedding_model").unwrap_or_else(|_| "text-embedding-3-small".to_string());
    let chat_model = config_store
        .get_list("models.llm_models.available")
        .ok()
        .and_then(|list| list.first().and_then(|v| v.as_str().map(str::to_string)))
        .unwrap_or_else(|| "gpt-4o-mini".to_string());

    let tpm_capacities = config_store
        .get_object("models.llm_models.tpm_capacities")
        .ok()
        .map(|obj| {
            obj.into_iter()
                .filter_map(|(model, budget)| budget.as_u64().map(|b| (model, b)))
                .collect()
        })
        .unwrap_or_default();
    let rate_limiter = Arc::new(RateLimiter::new(tpm_capacities));
    let provider_config = HttpProviderConfig::openai(api_key.expose_secret(), embedding_model, chat_model);
    let http_provider = Arc::new(HttpProvider::new(provider_config, rate_limiter).context("failed to construct LLM/embedding HTTP client")?);

    let model_cache = ModelCache::new(path_resolver.model_cache_path().clone(), DEFAULT_MODEL_REPO, DEFAULT_HEAD_REPO);
    let emotion_model = Arc::new(
        tokio::task::spawn_blocking(move || CandleEmotionClassifier::load(&model_cache))
            .await
            .context("emotion model load task panicked")?
            .context("failed to load local emotion classifier")?,
    );

    let topic_registry = TopicRegistry::load(&storage, http_provider.as_ref())
        .await
        .context("failed to load topic registry")?;

    let analyzer = SentimentAnalyzer::new(http_provider.clone(), emotion_model, http_provider, processing_config.engagement.clone());

    Ok(Runtime {
        storage,
        config_store,
        path_resolver,
        bootstrap,
        topic_registry,
        analyzer,
    })
}
