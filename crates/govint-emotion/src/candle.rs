//! Candle-based emotion classifier.
//!
//! Encodes text with all-MiniLM-L6-v2, mean-pools the token embeddings,
//! and runs a linear classification head over the fixed emotion
//! vocabulary, softmax-normalized into an `EmotionDistribution`.

use candle_core::{DType, Device, Tensor};
use candle_nn::{ops::softmax, Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use govint_types::EmotionDistribution;
use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::cache::{get_or_download_model, ModelCache};
use crate::error::EmotionError;
use crate::model::{distribution_from_scores, EmotionModel, ModelInfo, EMOTION_LABELS};

pub const ENCODER_DIM: usize = 384;
pub const MAX_SEQ_LENGTH: usize = 256;

pub struct CandleEmotionClassifier {
    backbone: BertModel,
    head: Linear,
    tokenizer: Tokenizer,
    device: Device,
    info: ModelInfo,
}

impl CandleEmotionClassifier {
    pub fn load(cache: &ModelCache) -> Result<Self, EmotionError> {
        let paths = get_or_download_model(cache)?;
        Self::load_from_paths(&paths.config, &paths.tokenizer, &paths.backbone_weights, &paths.head_weights)
    }

    pub fn load_default() -> Result<Self, EmotionError> {
        Self::load(&ModelCache::default())
    }

    pub fn load_from_paths(
        config_path: &std::path::Path,
        tokenizer_path: &std::path::Path,
        backbone_weights_path: &std::path::Path,
        head_weights_path: &std::path::Path,
    ) -> Result<Self, EmotionError> {
        info!("loading emotion classifier...");

        let device = Device::Cpu;

        let config_str = std::fs::read_to_string(config_path)?;
        let config: BertConfig = serde_json::from_str(&config_str)
            .map_err(|e| EmotionError::ModelNotFound(format!("invalid config: {e}")))?;

        let tokenizer = Tokenizer::from_file(tokenizer_path).map_err(|e| EmotionError::Tokenizer(e.to_string()))?;

        let backbone_vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[backbone_weights_path.to_path_buf()], DType::F32, &device)?
        };
        let backbone = BertModel::load(backbone_vb, &config)?;

        let head_vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[head_weights_path.to_path_buf()], DType::F32, &device)?
        };
        let head = candle_nn::linear(ENCODER_DIM, EMOTION_LABELS.len(), head_vb.pp("classifier"))?;

        info!(labels = ?EMOTION_LABELS, "emotion classifier loaded");

        Ok(Self {
            backbone,
            head,
            tokenizer,
            device,
            info: ModelInfo {
                name: "all-MiniLM-L6-v2+emotion-head".to_string(),
                max_sequence_length: MAX_SEQ_LENGTH,
            },
        })
    }

    fn mean_pooling(&self, embeddings: &Tensor, attention_mask: &Tensor) -> Result<Tensor, EmotionError> {
        let mask = attention_mask.unsqueeze(2)?.broadcast_as(embeddings.shape())?;
        let mask_f32 = mask.to_dtype(DType::F32)?;

        let masked = embeddings.broadcast_mul(&mask_f32)?;
        let sum = masked.sum(1)?;

        let mask_sum = mask_f32.sum(1)?;
        let mask_sum = mask_sum.clamp(1e-9, f64::MAX)?;

        Ok(sum.broadcast_div(&mask_sum)?)
    }

    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<EmotionDistribution>, EmotionError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        debug!(count = texts.len(), "classifying batch");

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| EmotionError::Tokenizer(e.to_string()))?;

        let max_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0)
            .min(MAX_SEQ_LENGTH);

        let mut input_ids: Vec<Vec<u32>> = Vec::new();
        let mut attention_masks: Vec<Vec<u32>> = Vec::new();

        for encoding in &encodings {
            let ids = encoding.get_ids();
            let mask = encoding.get_attention_mask();

            let truncated_len = ids.len().min(max_len);
            let mut padded_ids = ids[..truncated_len].to_vec();
            let mut padded_mask = mask[..truncated_len].to_vec();

            padded_ids.resize(max_len, 0);
            padded_mask.resize(max_len, 0);

            input_ids.push(padded_ids);
            attention_masks.push(padded_mask);
        }

        let batch_size = texts.len();
        let input_ids_flat: Vec<u32> = input_ids.into_iter().flatten().collect();
        let mask_flat: Vec<u32> = attention_masks.into_iter().flatten().collect();

        let input_ids = Tensor::from_vec(input_ids_flat, (batch_size, max_len), &self.device)?;
        let attention_mask = Tensor::from_vec(mask_flat, (batch_size, max_len), &self.device)?;
        let token_type_ids = Tensor::zeros_like(&input_ids)?;

        let output = self.backbone.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = self.mean_pooling(&output, &attention_mask)?;

        let logits = self.head.forward(&pooled)?;
        let probs = softmax(&logits, 1)?;
        let probs_vec: Vec<Vec<f32>> = probs.to_vec2()?;

        probs_vec
            .into_iter()
            .map(|scores| distribution_from_scores(&scores))
            .collect()
    }
}

impl EmotionModel for CandleEmotionClassifier {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    fn classify(&self, text: &str) -> Result<EmotionDistribution, EmotionError> {
        let mut out = self.encode_batch(&[text])?;
        out.pop().ok_or_else(|| EmotionError::InvalidInput("empty batch result".to_string()))
    }

    fn classify_batch(&self, texts: &[&str]) -> Result<Vec<EmotionDistribution>, EmotionError> {
        self.encode_batch(texts)
    }
}
