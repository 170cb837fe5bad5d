//! Precomputed aggregation snapshots: `SentimentAggregation`,
//! `TopicBaseline`, and `SentimentTrend`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::issue::{EmotionDistribution, SentimentDistribution};

/// What an aggregation key identifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationType {
    Topic,
    Issue,
    Entity,
}

/// Time window an aggregation is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    FifteenMinutes,
    OneHour,
    TwentyFourHours,
    SevenDays,
    ThirtyDays,
}

impl TimeWindow {
    pub fn duration(self) -> chrono::Duration {
        match self {
            TimeWindow::FifteenMinutes => chrono::Duration::minutes(15),
            TimeWindow::OneHour => chrono::Duration::hours(1),
            TimeWindow::TwentyFourHours => chrono::Duration::hours(24),
            TimeWindow::SevenDays => chrono::Duration::days(7),
            TimeWindow::ThirtyDays => chrono::Duration::days(30),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeWindow::FifteenMinutes => "15m",
            TimeWindow::OneHour => "1h",
            TimeWindow::TwentyFourHours => "24h",
            TimeWindow::SevenDays => "7d",
            TimeWindow::ThirtyDays => "30d",
        }
    }
}

/// Precomputed snapshot, one row per `(type, key, window)`, rewritten in
/// place on every recomputation (idempotent replacement, §5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentAggregation {
    pub aggregation_type: AggregationType,
    pub aggregation_key: String,
    pub window: TimeWindow,
    pub weighted_sentiment_score: f32,
    pub sentiment_index: f32,
    pub sentiment_distribution: SentimentDistribution,
    pub emotion_distribution: EmotionDistribution,
    pub emotion_adjusted_severity: f32,
    pub mention_count: u64,
    pub total_influence_weight: f32,
    pub calculated_at: DateTime<Utc>,
}

/// Per-topic historical mean, used to normalize a current index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicBaseline {
    pub topic_key: String,
    pub baseline_sentiment_index: f32,
    pub lookback_days: u32,
    pub sample_size: u64,
    pub calculated_at: DateTime<Utc>,
}

/// Direction of a period-over-period sentiment move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Deteriorating,
    Stable,
}

/// Period-over-period delta per aggregation key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentTrend {
    pub aggregation_type: AggregationType,
    pub aggregation_key: String,
    pub window: TimeWindow,
    pub current_index: f32,
    pub previous_index: f32,
    pub direction: TrendDirection,
    pub magnitude: f32,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub previous_period_start: DateTime<Utc>,
    pub previous_period_end: DateTime<Utc>,
    pub calculated_at: DateTime<Utc>,
}

impl SentimentTrend {
    /// Classify `current - previous` against `trend_eps` (§4.6, default 2).
    pub fn classify(current_index: f32, previous_index: f32, trend_eps: f32) -> (TrendDirection, f32) {
        let delta = current_index - previous_index;
        let direction = if delta > trend_eps {
            TrendDirection::Improving
        } else if delta < -trend_eps {
            TrendDirection::Deteriorating
        } else {
            TrendDirection::Stable
        };
        (direction, delta.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trend_classification_thresholds() {
        assert_eq!(
            SentimentTrend::classify(60.0, 50.0, 2.0).0,
            TrendDirection::Improving
        );
        assert_eq!(
            SentimentTrend::classify(40.0, 50.0, 2.0).0,
            TrendDirection::Deteriorating
        );
        assert_eq!(
            SentimentTrend::classify(51.0, 50.0, 2.0).0,
            TrendDirection::Stable
        );
    }

    #[test]
    fn window_strings_match_spec_vocabulary() {
        assert_eq!(TimeWindow::FifteenMinutes.as_str(), "15m");
        assert_eq!(TimeWindow::ThirtyDays.as_str(), "30d");
    }
}
