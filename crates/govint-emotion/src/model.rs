//! Emotion classifier trait and fixed vocabulary.

use govint_types::EmotionDistribution;

use crate::error::EmotionError;

/// Emotion labels in the fixed order the classification head's logits are
/// indexed by. `EmotionDistribution`'s fields follow the same order.
pub const EMOTION_LABELS: [&str; 7] = ["anger", "fear", "trust", "sadness", "joy", "disgust", "neutral"];

#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub name: String,
    pub max_sequence_length: usize,
}

/// Produces a softmax distribution over [`EMOTION_LABELS`] for a piece of
/// text. Implementations must be thread-safe for concurrent batch use.
pub trait EmotionModel: Send + Sync {
    fn info(&self) -> &ModelInfo;

    fn classify(&self, text: &str) -> Result<EmotionDistribution, EmotionError>;

    /// Classify multiple texts. Default implementation calls `classify`
    /// for each; backends with true batch inference should override.
    fn classify_batch(&self, texts: &[&str]) -> Result<Vec<EmotionDistribution>, EmotionError> {
        texts.iter().map(|text| self.classify(text)).collect()
    }
}

/// Build an [`EmotionDistribution`] from softmax scores ordered as
/// [`EMOTION_LABELS`], renormalizing away any floating-point drift so the
/// closure invariant (sum ≈ 1) holds exactly at the boundary.
pub fn distribution_from_scores(scores: &[f32]) -> Result<EmotionDistribution, EmotionError> {
    if scores.len() != EMOTION_LABELS.len() {
        return Err(EmotionError::InvalidInput(format!(
            "expected {} emotion scores, got {}",
            EMOTION_LABELS.len(),
            scores.len()
        )));
    }

    let sum: f32 = scores.iter().sum();
    let norm = if sum > 0.0 { sum } else { 1.0 };

    Ok(EmotionDistribution {
        anger: scores[0] / norm,
        fear: scores[1] / norm,
        trust: scores[2] / norm,
        sadness: scores[3] / norm,
        joy: scores[4] / norm,
        disgust: scores[5] / norm,
        neutral: scores[6] / norm,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distribution_from_scores_normalizes() {
        let scores = vec![0.2, 0.2, 0.2, 0.2, 0.2, 0.2, 0.2];
        let dist = distribution_from_scores(&scores).unwrap();
        assert!((dist.sum() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn distribution_from_scores_rejects_wrong_length() {
        let err = distribution_from_scores(&[0.5, 0.5]);
        assert!(err.is_err());
    }
}
