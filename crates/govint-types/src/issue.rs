//! The `Issue` entity: a cluster of related mentions within a single
//! primary topic, and its link table `IssueMention`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypesError;
use crate::topic::Embedding;

/// Lifecycle state, evaluated in priority order per §4.5. `Archived` is
/// never set automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueState {
    Emerging,
    Active,
    Escalated,
    Stabilizing,
    Resolved,
    Archived,
}

/// Bucketing of `priority_score` into bands (Glossary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityBand {
    Critical,
    High,
    Medium,
    Low,
}

impl PriorityBand {
    pub fn from_score(score: f32) -> Self {
        if score >= 80.0 {
            PriorityBand::Critical
        } else if score >= 60.0 {
            PriorityBand::High
        } else if score >= 40.0 {
            PriorityBand::Medium
        } else {
            PriorityBand::Low
        }
    }
}

/// Normalized distribution of sentiment labels among an issue's (or
/// aggregation's) member mentions. Shares sum to 1.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub positive: f32,
    pub negative: f32,
    pub neutral: f32,
}

/// Mean emotion distribution over an issue's (or aggregation's) member
/// mentions, re-normalized to sum to 1.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmotionDistribution {
    pub anger: f32,
    pub fear: f32,
    pub trust: f32,
    pub sadness: f32,
    pub joy: f32,
    pub disgust: f32,
    pub neutral: f32,
}

impl EmotionDistribution {
    pub fn sum(&self) -> f32 {
        self.anger + self.fear + self.trust + self.sadness + self.joy + self.disgust + self.neutral
    }

    /// Negative-affect share used by `emotion_adjusted_severity` (§4.6).
    pub fn negative_affect_share(&self) -> f32 {
        self.anger + self.fear + self.disgust + self.sadness
    }

    /// Positive-affect share used by `emotion_adjusted_severity` (§4.6).
    pub fn positive_affect_share(&self) -> f32 {
        self.joy + self.trust
    }

    /// The highest-scoring emotion and its value, for `Mention`'s primary
    /// `emotion_label`/`emotion_score` fields.
    pub fn dominant(&self) -> (&'static str, f32) {
        let pairs: [(&'static str, f32); 7] = [
            ("anger", self.anger),
            ("fear", self.fear),
            ("trust", self.trust),
            ("sadness", self.sadness),
            ("joy", self.joy),
            ("disgust", self.disgust),
            ("neutral", self.neutral),
        ];
        pairs.into_iter().fold(("neutral", 0.0), |best, candidate| if candidate.1 > best.1 { candidate } else { best })
    }

    /// Flatten into the `HashMap<String, f32>` shape `Mention::mark_completed`
    /// stores, keyed by emotion label.
    pub fn to_hashmap(&self) -> std::collections::HashMap<String, f32> {
        let mut map = std::collections::HashMap::with_capacity(7);
        map.insert("anger".to_string(), self.anger);
        map.insert("fear".to_string(), self.fear);
        map.insert("trust".to_string(), self.trust);
        map.insert("sadness".to_string(), self.sadness);
        map.insert("joy".to_string(), self.joy);
        map.insert("disgust".to_string(), self.disgust);
        map.insert("neutral".to_string(), self.neutral);
        map
    }

    /// Inverse of [`to_hashmap`](Self::to_hashmap); missing keys default to 0.
    pub fn from_hashmap(map: &std::collections::HashMap<String, f32>) -> Self {
        Self {
            anger: map.get("anger").copied().unwrap_or(0.0),
            fear: map.get("fear").copied().unwrap_or(0.0),
            trust: map.get("trust").copied().unwrap_or(0.0),
            sadness: map.get("sadness").copied().unwrap_or(0.0),
            joy: map.get("joy").copied().unwrap_or(0.0),
            disgust: map.get("disgust").copied().unwrap_or(0.0),
            neutral: map.get("neutral").copied().unwrap_or(0.0),
        }
    }
}


/// A cluster of related mentions, evolving over time, attached to one
/// primary topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub slug: String,
    pub label: String,
    pub title: String,
    pub primary_topic_key: String,
    pub state: IssueState,
    pub start_time: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,

    pub mention_count: u64,
    pub volume_current_window: u64,
    pub volume_previous_window: u64,
    pub velocity_percent: f64,
    pub velocity_score: f64,

    pub weighted_sentiment_score: f32,
    pub sentiment_index: f32,
    pub sentiment_distribution: SentimentDistribution,
    pub emotion_distribution: EmotionDistribution,
    pub emotion_adjusted_severity: f32,

    pub priority_score: f32,
    pub priority_band: PriorityBand,

    pub cluster_centroid_embedding: Embedding,
    pub similarity_threshold: f32,

    pub top_keywords: Vec<String>,
    pub top_sources: Vec<String>,
    pub regions_impacted: Vec<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Issue {
    /// Create a new issue seeded from a cluster's first representative
    /// mention (§4.5 match-or-create).
    pub fn new(
        id: impl Into<String>,
        slug: impl Into<String>,
        primary_topic_key: impl Into<String>,
        start_time: DateTime<Utc>,
        centroid: Embedding,
        similarity_threshold: f32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            slug: slug.into(),
            label: String::new(),
            title: String::new(),
            primary_topic_key: primary_topic_key.into(),
            state: IssueState::Emerging,
            start_time,
            last_activity: start_time,
            resolved_at: None,
            mention_count: 0,
            volume_current_window: 0,
            volume_previous_window: 0,
            velocity_percent: 0.0,
            velocity_score: 0.0,
            weighted_sentiment_score: 0.0,
            sentiment_index: 50.0,
            sentiment_distribution: SentimentDistribution::default(),
            emotion_distribution: EmotionDistribution::default(),
            emotion_adjusted_severity: 0.0,
            priority_score: 0.0,
            priority_band: PriorityBand::Low,
            cluster_centroid_embedding: centroid,
            similarity_threshold,
            top_keywords: Vec::new(),
            top_sources: Vec::new(),
            regions_impacted: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_label_and_title(mut self, label: impl Into<String>, title: impl Into<String>) -> Self {
        self.label = label.into();
        self.title = title.into();
        self
    }

    /// Transition to `resolved`; idempotent per §8's scenario 5 —
    /// `resolved_at` is set once and never mutated by later no-op cycles.
    pub fn resolve(&mut self, now: DateTime<Utc>) {
        if self.state != IssueState::Resolved {
            self.state = IssueState::Resolved;
            self.resolved_at = Some(now);
        }
    }

    pub fn archive(&mut self) {
        self.state = IssueState::Archived;
    }

    pub fn set_priority(&mut self, score: f32) {
        self.priority_score = score.clamp(0.0, 100.0);
        self.priority_band = PriorityBand::from_score(self.priority_score);
    }

    pub fn touch(&mut self, at: DateTime<Utc>) {
        if at > self.last_activity {
            self.last_activity = at;
        }
        self.updated_at = Utc::now();
    }
}

/// Many-to-many link between an `Issue` and a `Mention`, unique per
/// `(issue_id, mention_id)`. A mention may be linked to at most one issue
/// per topic (§3 invariant).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueMention {
    pub id: String,
    pub issue_id: String,
    pub mention_id: String,
    pub similarity_score: f32,
    pub topic_key: String,
    pub added_at: DateTime<Utc>,
}

impl IssueMention {
    pub fn new(
        id: impl Into<String>,
        issue_id: impl Into<String>,
        mention_id: impl Into<String>,
        similarity_score: f32,
        topic_key: impl Into<String>,
    ) -> Result<Self, TypesError> {
        if !(0.0..=1.0).contains(&similarity_score) {
            return Err(TypesError::InvalidInput(format!(
                "similarity_score {similarity_score} out of [0,1]"
            )));
        }
        Ok(Self {
            id: id.into(),
            issue_id: issue_id.into(),
            mention_id: mention_id.into(),
            similarity_score,
            topic_key: topic_key.into(),
            added_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_band_thresholds() {
        assert_eq!(PriorityBand::from_score(85.0), PriorityBand::Critical);
        assert_eq!(PriorityBand::from_score(60.0), PriorityBand::High);
        assert_eq!(PriorityBand::from_score(40.0), PriorityBand::Medium);
        assert_eq!(PriorityBand::from_score(10.0), PriorityBand::Low);
    }

    #[test]
    fn resolve_is_idempotent_on_resolved_at() {
        let mut issue = Issue::new(
            "i1",
            "slug",
            "fuel_pricing",
            Utc::now(),
            vec![0.0; 4],
            0.75,
        );
        let t1 = Utc::now();
        issue.resolve(t1);
        let first = issue.resolved_at;
        // A later no-op cycle calling resolve again must not move resolved_at.
        let t2 = t1 + chrono::Duration::hours(1);
        issue.resolve(t2);
        assert_eq!(issue.resolved_at, first);
    }

    #[test]
    fn issue_mention_rejects_out_of_range_similarity() {
        assert!(IssueMention::new("im1", "i1", "m1", 1.5, "fuel_pricing").is_err());
        assert!(IssueMention::new("im1", "i1", "m1", 0.9, "fuel_pricing").is_ok());
    }
}
