//! The `Mention` entity: a single captured piece of content moving through
//! the pipeline, plus its processing-state and analyzer-derived fields.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypesError;

/// Where a mention's text originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    NationalMedia,
    Verified,
    Citizen,
    Broadcast,
    PresidencyStatement,
}

impl SourceType {
    /// Default influence-weight base per source class (§4.3 table).
    pub fn default_base_weight(self) -> f32 {
        match self {
            SourceType::PresidencyStatement => 5.0,
            SourceType::NationalMedia => 4.0,
            SourceType::Verified => 3.0,
            SourceType::Broadcast => 2.0,
            SourceType::Citizen => 1.0,
        }
    }
}

/// Engagement counters attached to a mention, when the source platform
/// exposes them.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Engagement {
    pub likes: u64,
    pub shares: u64,
    pub comments: u64,
    pub reach: u64,
}

/// State machine driven exclusively by the Batch Orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

/// Sentiment polarity band, consistent with `sentiment_score` per §4.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

/// Validate the score/label consistency invariant from §8:
/// `(score >= 0.2 <-> positive) and (score <= -0.2 <-> negative) and
/// (-0.2 < score < 0.2 <-> neutral)`.
pub fn validate_sentiment_band(label: SentimentLabel, score: f32) -> Result<(), TypesError> {
    let consistent = match label {
        SentimentLabel::Positive => (0.2..=1.0).contains(&score),
        SentimentLabel::Negative => (-1.0..=-0.2).contains(&score),
        SentimentLabel::Neutral => score > -0.2 && score < 0.2,
    };
    if consistent {
        Ok(())
    } else {
        Err(TypesError::InvalidInput(format!(
            "sentiment score {score} inconsistent with label {label:?}"
        )))
    }
}

/// A single captured piece of content and everything the pipeline has
/// derived about it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mention {
    pub id: String,
    pub text: String,
    pub url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub source_platform: String,
    pub source_type: SourceType,
    pub engagement: Option<Engagement>,
    pub user_handle: Option<String>,
    pub declared_location: Option<String>,
    pub operator_id: String,

    pub processing_status: ProcessingStatus,
    pub processing_started_at: Option<DateTime<Utc>>,
    pub processing_completed_at: Option<DateTime<Utc>>,
    pub processing_error: Option<String>,

    pub sentiment_label: Option<SentimentLabel>,
    pub sentiment_score: Option<f32>,
    pub sentiment_justification: Option<String>,
    pub emotion_label: Option<String>,
    pub emotion_score: Option<f32>,
    pub emotion_distribution: Option<HashMap<String, f32>>,
    pub influence_weight: Option<f32>,
    pub confidence_weight: Option<f32>,
    pub location_label: Option<String>,
    pub location_confidence: Option<f32>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Mention {
    /// Construct a freshly-loaded mention, `status = pending`.
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        published_at: DateTime<Utc>,
        source_platform: impl Into<String>,
        source_type: SourceType,
        operator_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            text: text.into(),
            url: None,
            published_at,
            source_platform: source_platform.into(),
            source_type,
            engagement: None,
            user_handle: None,
            declared_location: None,
            operator_id: operator_id.into(),
            processing_status: ProcessingStatus::Pending,
            processing_started_at: None,
            processing_completed_at: None,
            processing_error: None,
            sentiment_label: None,
            sentiment_score: None,
            sentiment_justification: None,
            emotion_label: None,
            emotion_score: None,
            emotion_distribution: None,
            influence_weight: None,
            confidence_weight: None,
            location_label: None,
            location_confidence: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_engagement(mut self, engagement: Engagement) -> Self {
        self.engagement = Some(engagement);
        self
    }

    pub fn with_user_handle(mut self, handle: impl Into<String>) -> Self {
        self.user_handle = Some(handle.into());
        self
    }

    pub fn with_declared_location(mut self, location: impl Into<String>) -> Self {
        self.declared_location = Some(location.into());
        self
    }

    /// Claim the mention for a worker: `pending -> processing`.
    pub fn mark_processing(&mut self) {
        self.processing_status = ProcessingStatus::Processing;
        self.processing_started_at = Some(Utc::now());
    }

    /// Write back every derived field in one shot and mark `completed`.
    /// Enforces the score/label consistency invariant (§8) before
    /// accepting the transition.
    #[allow(clippy::too_many_arguments)]
    pub fn mark_completed(
        &mut self,
        sentiment_label: SentimentLabel,
        sentiment_score: f32,
        sentiment_justification: String,
        emotion_label: String,
        emotion_score: f32,
        emotion_distribution: HashMap<String, f32>,
        influence_weight: f32,
        confidence_weight: f32,
    ) -> Result<(), TypesError> {
        validate_sentiment_band(sentiment_label, sentiment_score)?;
        self.sentiment_label = Some(sentiment_label);
        self.sentiment_score = Some(sentiment_score);
        self.sentiment_justification = Some(sentiment_justification);
        self.emotion_label = Some(emotion_label);
        self.emotion_score = Some(emotion_score);
        self.emotion_distribution = Some(emotion_distribution);
        self.influence_weight = Some(influence_weight.clamp(1.0, 5.0));
        self.confidence_weight = Some(confidence_weight.clamp(0.0, 1.0));
        self.processing_status = ProcessingStatus::Completed;
        self.processing_completed_at = Some(Utc::now());
        self.processing_error = None;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Terminal failure: `status = failed`, error text retained for the
    /// cycle summary (§7).
    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.processing_status = ProcessingStatus::Failed;
        self.processing_error = Some(error.into());
        self.updated_at = Utc::now();
    }

    pub fn is_completed(&self) -> bool {
        self.processing_status == ProcessingStatus::Completed
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, TypesError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TypesError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Many-to-many link between a `Mention` and a `Topic`, unique per
/// `(mention_id, topic_key)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentionTopic {
    pub id: String,
    pub mention_id: String,
    pub topic_key: String,
    pub topic_confidence: f32,
    pub keyword_score: f32,
    pub embedding_score: f32,
    pub issue_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MentionTopic {
    pub fn new(
        id: impl Into<String>,
        mention_id: impl Into<String>,
        topic_key: impl Into<String>,
        topic_confidence: f32,
        keyword_score: f32,
        embedding_score: f32,
    ) -> Self {
        Self {
            id: id.into(),
            mention_id: mention_id.into(),
            topic_key: topic_key.into(),
            topic_confidence: topic_confidence.clamp(0.0, 1.0),
            keyword_score: keyword_score.clamp(0.0, 1.0),
            embedding_score: embedding_score.clamp(0.0, 1.0),
            issue_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn attach_to_issue(&mut self, issue_id: impl Into<String>) {
        self.issue_id = Some(issue_id.into());
    }
}
