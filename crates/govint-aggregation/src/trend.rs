//! Trend (C17, §4.6): period-over-period delta between two aggregations
//! over consecutive windows of equal length.

use chrono::{DateTime, Utc};
use govint_types::{AggregationType, SentimentAggregation, SentimentTrend, TimeWindow};

/// Build a `SentimentTrend` from two consecutive-period aggregations of
/// the same key and window length.
pub fn compute_trend(
    aggregation_type: AggregationType,
    aggregation_key: &str,
    window: TimeWindow,
    current: &SentimentAggregation,
    previous: &SentimentAggregation,
    trend_eps: f32,
    period_start: DateTime<Utc>,
    period_end: DateTime<Utc>,
    previous_period_start: DateTime<Utc>,
    previous_period_end: DateTime<Utc>,
) -> SentimentTrend {
    let (direction, magnitude) = SentimentTrend::classify(current.sentiment_index, previous.sentiment_index, trend_eps);

    SentimentTrend {
        aggregation_type,
        aggregation_key: aggregation_key.to_string(),
        window,
        current_index: current.sentiment_index,
        previous_index: previous.sentiment_index,
        direction,
        magnitude,
        period_start,
        period_end,
        previous_period_start,
        previous_period_end,
        calculated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use govint_types::{EmotionDistribution, SentimentDistribution};

    fn agg(index: f32) -> SentimentAggregation {
        SentimentAggregation {
            aggregation_type: AggregationType::Topic,
            aggregation_key: "fuel_pricing".into(),
            window: TimeWindow::TwentyFourHours,
            weighted_sentiment_score: 0.0,
            sentiment_index: index,
            sentiment_distribution: SentimentDistribution::default(),
            emotion_distribution: EmotionDistribution::default(),
            emotion_adjusted_severity: 0.0,
            mention_count: 10,
            total_influence_weight: 10.0,
            calculated_at: Utc::now(),
        }
    }

    #[test]
    fn improving_trend_has_positive_magnitude() {
        let now = Utc::now();
        let trend = compute_trend(AggregationType::Topic, "fuel_pricing", TimeWindow::TwentyFourHours, &agg(60.0), &agg(50.0), 2.0, now, now, now, now);
        assert_eq!(trend.direction, govint_types::TrendDirection::Improving);
        assert_eq!(trend.magnitude, 10.0);
    }
}
