//! Baseline (C17, §4.6): per-topic historical mean of daily sentiment
//! indices, refreshed on a cron cycle, used to normalize the current
//! index against the topic's usual tone.

use chrono::Utc;
use govint_types::TopicBaseline;

/// Mean of `daily_indices` (one `sentiment_index` per day bucket over
/// the lookback window) — the baseline sentiment index for a topic.
pub fn compute_baseline(topic_key: &str, daily_indices: &[f32], lookback_days: u32) -> TopicBaseline {
    let baseline_sentiment_index = if daily_indices.is_empty() {
        50.0
    } else {
        daily_indices.iter().sum::<f32>() / daily_indices.len() as f32
    };

    TopicBaseline {
        topic_key: topic_key.to_string(),
        baseline_sentiment_index,
        lookback_days,
        sample_size: daily_indices.len() as u64,
        calculated_at: Utc::now(),
    }
}

/// Normalize `current_index` against `baseline`, per §4.6: `clamp(50 +
/// (current - baseline), 0, 100)`.
pub fn normalize_against_baseline(current_index: f32, baseline: &TopicBaseline) -> f32 {
    (50.0 + (current_index - baseline.baseline_sentiment_index)).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_defaults_to_neutral_when_no_history() {
        let baseline = compute_baseline("fuel_pricing", &[], 30);
        assert_eq!(baseline.baseline_sentiment_index, 50.0);
        assert_eq!(baseline.sample_size, 0);
    }

    #[test]
    fn baseline_is_mean_of_daily_indices() {
        let baseline = compute_baseline("fuel_pricing", &[40.0, 50.0, 60.0], 30);
        assert_eq!(baseline.baseline_sentiment_index, 50.0);
    }

    #[test]
    fn normalization_matches_formula() {
        let baseline = compute_baseline("fuel_pricing", &[40.0], 30);
        assert_eq!(normalize_against_baseline(50.0, &baseline), 60.0);
        assert_eq!(normalize_against_baseline(0.0, &baseline), 10.0);
    }
}
