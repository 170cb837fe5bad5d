//! Influence weight and confidence weight (§4.3): deterministic,
//! post-hoc functions of mention metadata — no I/O.

use govint_config::EngagementConfig;
use govint_types::{Engagement, EmotionDistribution, SourceType};

const GLOBAL_MIN: f32 = 1.0;
const GLOBAL_MAX: f32 = 5.0;

/// The next-higher source class's base weight, used as this class's
/// engagement-boost ceiling so a boosted score never implicitly crosses
/// into the next band (§4.3 Open Question resolution).
fn band_ceiling(source_type: SourceType) -> f32 {
    match source_type {
        SourceType::Citizen => SourceType::Broadcast.default_base_weight(),
        SourceType::Broadcast => SourceType::Verified.default_base_weight(),
        SourceType::Verified => SourceType::NationalMedia.default_base_weight(),
        SourceType::NationalMedia => SourceType::PresidencyStatement.default_base_weight(),
        SourceType::PresidencyStatement => GLOBAL_MAX,
    }
}

fn saturating_boost(metric: u64, scale: f64, cap: f32) -> f32 {
    if metric == 0 {
        return 0.0;
    }
    (cap as f64 * (1.0 - (-(metric as f64) / scale).exp())) as f32
}

/// `w_inf ∈ [1, 5]`: source-class base weight plus a capped,
/// diminishing-returns boost from engagement counters.
pub fn influence_weight(source_type: SourceType, engagement: Option<&Engagement>, config: &EngagementConfig) -> f32 {
    let base = source_type.default_base_weight();
    let boost = match engagement {
        Some(e) => {
            saturating_boost(e.likes, config.likes_scale, config.boost_cap)
                + saturating_boost(e.shares, config.shares_scale, config.boost_cap)
                + saturating_boost(e.comments, config.comments_scale, config.boost_cap)
                + saturating_boost(e.reach, config.reach_scale, config.boost_cap)
        }
        None => 0.0,
    };

    (base + boost).clamp(GLOBAL_MIN, band_ceiling(source_type)).clamp(GLOBAL_MIN, GLOBAL_MAX)
}

/// `w_conf = sentiment_confidence × emotion_confidence ∈ [0, 1]`.
pub fn confidence_weight(sentiment_score: f32, emotion: &EmotionDistribution) -> f32 {
    let sentiment_confidence = sentiment_score.abs().clamp(0.0, 1.0);
    let emotion_confidence = [emotion.anger, emotion.fear, emotion.trust, emotion.sadness, emotion.joy, emotion.disgust, emotion.neutral]
        .into_iter()
        .fold(0.0f32, f32::max);
    (sentiment_confidence * emotion_confidence).clamp(0.0, 1.0)
}
