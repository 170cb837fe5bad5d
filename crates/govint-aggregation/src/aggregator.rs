//! Sentiment Aggregator (C16, §4.6): weighted sentiment aggregate over a
//! member set for one `(type, key, window)` snapshot.

use chrono::Utc;
use govint_types::{
    AggregationType, EmotionDistribution, SentimentAggregation, SentimentDistribution,
    SentimentLabel, TimeWindow,
};

/// Minimal per-mention view needed to fold into an aggregate, decoupled
/// from `govint_types::Mention` so this crate only depends on derived
/// analyzer output.
#[derive(Debug, Clone)]
pub struct AggregationMember {
    pub sentiment_label: SentimentLabel,
    pub sentiment_score: f32,
    pub emotion: EmotionDistribution,
    pub influence_weight: f32,
    pub confidence_weight: f32,
}

fn mean_emotion_distribution(members: &[AggregationMember]) -> EmotionDistribution {
    if members.is_empty() {
        return EmotionDistribution::default();
    }
    let n = members.len() as f32;
    let mut mean = EmotionDistribution::default();
    for m in members {
        mean.anger += m.emotion.anger;
        mean.fear += m.emotion.fear;
        mean.trust += m.emotion.trust;
        mean.sadness += m.emotion.sadness;
        mean.joy += m.emotion.joy;
        mean.disgust += m.emotion.disgust;
        mean.neutral += m.emotion.neutral;
    }
    mean.anger /= n;
    mean.fear /= n;
    mean.trust /= n;
    mean.sadness /= n;
    mean.joy /= n;
    mean.disgust /= n;
    mean.neutral /= n;

    let sum = mean.sum();
    if sum > 0.0 {
        mean.anger /= sum;
        mean.fear /= sum;
        mean.trust /= sum;
        mean.sadness /= sum;
        mean.joy /= sum;
        mean.disgust /= sum;
        mean.neutral /= sum;
    }
    mean
}

fn sentiment_distribution(members: &[AggregationMember]) -> SentimentDistribution {
    if members.is_empty() {
        return SentimentDistribution::default();
    }
    let n = members.len() as f32;
    let mut dist = SentimentDistribution::default();
    for m in members {
        match m.sentiment_label {
            SentimentLabel::Positive => dist.positive += 1.0,
            SentimentLabel::Negative => dist.negative += 1.0,
            SentimentLabel::Neutral => dist.neutral += 1.0,
        }
    }
    dist.positive /= n;
    dist.negative /= n;
    dist.neutral /= n;
    dist
}

/// Build one `SentimentAggregation` snapshot from its member mentions
/// (§4.6). Returns a zeroed, `mention_count = 0` snapshot when `members`
/// is empty.
pub fn aggregate(aggregation_type: AggregationType, aggregation_key: &str, window: TimeWindow, members: &[AggregationMember]) -> SentimentAggregation {
    let weight_sum: f32 = members.iter().map(|m| m.influence_weight * m.confidence_weight).sum();
    let weighted_sentiment_score = if weight_sum > 0.0 {
        members.iter().map(|m| m.sentiment_score * m.influence_weight * m.confidence_weight).sum::<f32>() / weight_sum
    } else {
        0.0
    };

    let sentiment_index = ((weighted_sentiment_score + 1.0) * 50.0).clamp(0.0, 100.0);
    let emotion_distribution = mean_emotion_distribution(members);

    let emotion_adjusted_severity = (100.0 - sentiment_index + emotion_distribution.negative_affect_share() * 20.0 - emotion_distribution.positive_affect_share() * 10.0).clamp(0.0, 100.0);

    SentimentAggregation {
        aggregation_type,
        aggregation_key: aggregation_key.to_string(),
        window,
        weighted_sentiment_score,
        sentiment_index,
        sentiment_distribution: sentiment_distribution(members),
        emotion_distribution,
        emotion_adjusted_severity,
        mention_count: members.len() as u64,
        total_influence_weight: members.iter().map(|m| m.influence_weight).sum(),
        calculated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(label: SentimentLabel, score: f32, w_inf: f32, w_conf: f32) -> AggregationMember {
        AggregationMember { sentiment_label: label, sentiment_score: score, emotion: EmotionDistribution { joy: 0.5, anger: 0.5, ..Default::default() }, influence_weight: w_inf, confidence_weight: w_conf }
    }

    #[test]
    fn empty_members_yields_zero_aggregate() {
        let agg = aggregate(AggregationType::Topic, "fuel_pricing", TimeWindow::TwentyFourHours, &[]);
        assert_eq!(agg.mention_count, 0);
        assert_eq!(agg.weighted_sentiment_score, 0.0);
        assert_eq!(agg.sentiment_index, 50.0);
    }

    #[test]
    fn weighted_score_favors_higher_weight_members() {
        let members = vec![member(SentimentLabel::Positive, 0.8, 5.0, 1.0), member(SentimentLabel::Negative, -0.8, 1.0, 1.0)];
        let agg = aggregate(AggregationType::Topic, "fuel_pricing", TimeWindow::TwentyFourHours, &members);
        assert!(agg.weighted_sentiment_score > 0.0);
    }

    #[test]
    fn sentiment_distribution_sums_to_one() {
        let members = vec![
            member(SentimentLabel::Positive, 0.5, 1.0, 1.0),
            member(SentimentLabel::Negative, -0.5, 1.0, 1.0),
            member(SentimentLabel::Neutral, 0.0, 1.0, 1.0),
        ];
        let agg = aggregate(AggregationType::Topic, "fuel_pricing", TimeWindow::TwentyFourHours, &members);
        let total = agg.sentiment_distribution.positive + agg.sentiment_distribution.negative + agg.sentiment_distribution.neutral;
        assert!((total - 1.0).abs() < 1e-6);
    }
}
