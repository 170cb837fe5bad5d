//! Model file caching.
//!
//! Downloads and caches the backbone + classification head files from
//! HuggingFace Hub.

use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::EmotionError;

/// Backbone used for the emotion classifier's sentence encoder.
pub const DEFAULT_MODEL_REPO: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Repo hosting the fine-tuned classification head weights, keyed to the
/// fixed emotion vocabulary.
pub const DEFAULT_HEAD_REPO: &str = "governance-intelligence/emotion-head-minilm";

pub const MODEL_FILES: &[&str] = &["config.json", "tokenizer.json", "model.safetensors"];
pub const HEAD_FILES: &[&str] = &["emotion_head.safetensors"];

#[derive(Debug, Clone)]
pub struct ModelCache {
    pub cache_dir: PathBuf,
    pub backbone_repo: String,
    pub head_repo: String,
}

impl Default for ModelCache {
    fn default() -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("governance-intelligence")
            .join("models");

        Self {
            cache_dir,
            backbone_repo: DEFAULT_MODEL_REPO.to_string(),
            head_repo: DEFAULT_HEAD_REPO.to_string(),
        }
    }
}

impl ModelCache {
    pub fn new(cache_dir: impl Into<PathBuf>, backbone_repo: impl Into<String>, head_repo: impl Into<String>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            backbone_repo: backbone_repo.into(),
            head_repo: head_repo.into(),
        }
    }

    fn repo_dir(&self, repo_id: &str) -> PathBuf {
        self.cache_dir.join(repo_id.replace('/', "_"))
    }

    pub fn backbone_dir(&self) -> PathBuf {
        self.repo_dir(&self.backbone_repo)
    }

    pub fn head_dir(&self) -> PathBuf {
        self.repo_dir(&self.head_repo)
    }

    pub fn is_cached(&self) -> bool {
        let backbone_dir = self.backbone_dir();
        let head_dir = self.head_dir();
        MODEL_FILES.iter().all(|f| backbone_dir.join(f).exists())
            && HEAD_FILES.iter().all(|f| head_dir.join(f).exists())
    }
}

#[derive(Debug, Clone)]
pub struct ModelPaths {
    pub config: PathBuf,
    pub tokenizer: PathBuf,
    pub backbone_weights: PathBuf,
    pub head_weights: PathBuf,
}

/// Get or download model files, returning paths to the backbone config,
/// tokenizer, encoder weights, and classification head weights.
pub fn get_or_download_model(cache: &ModelCache) -> Result<ModelPaths, EmotionError> {
    if cache.is_cached() {
        debug!(backbone = ?cache.backbone_dir(), head = ?cache.head_dir(), "using cached emotion model");
    } else {
        info!(backbone_repo = %cache.backbone_repo, head_repo = %cache.head_repo, "downloading emotion model files");
        download_repo_files(&cache.backbone_repo, &cache.backbone_dir(), MODEL_FILES)?;
        download_repo_files(&cache.head_repo, &cache.head_dir(), HEAD_FILES)?;
    }

    Ok(ModelPaths {
        config: cache.backbone_dir().join("config.json"),
        tokenizer: cache.backbone_dir().join("tokenizer.json"),
        backbone_weights: cache.backbone_dir().join("model.safetensors"),
        head_weights: cache.head_dir().join("emotion_head.safetensors"),
    })
}

fn download_repo_files(repo_id: &str, dest_dir: &std::path::Path, files: &[&str]) -> Result<(), EmotionError> {
    use hf_hub::api::sync::Api;

    let api = Api::new().map_err(|e| EmotionError::Download(e.to_string()))?;
    let repo = api.model(repo_id.to_string());

    std::fs::create_dir_all(dest_dir)?;

    for filename in files {
        info!(repo = repo_id, file = filename, "downloading");
        let source_path = repo
            .get(filename)
            .map_err(|e| EmotionError::Download(format!("{repo_id}/{filename}: {e}")))?;

        let dest_path = dest_dir.join(filename);
        std::fs::copy(&source_path, &dest_path)?;
        debug!(file = filename, "downloaded to {:?}", dest_path);
    }

    Ok(())
}
