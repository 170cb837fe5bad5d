//! The raw CSV row shape and its mapping onto a fresh `Mention`.

use chrono::{DateTime, Utc};
use govint_types::{Engagement, Mention, SourceType};
use serde::Deserialize;
use uuid::Uuid;

/// One row of a collector-produced CSV file. Optional columns absent from
/// a given collector's output default to `None` rather than failing the
/// row, per the Raw Loader's producer-insensitivity requirement.
#[derive(Debug, Deserialize)]
pub struct RawCsvRecord {
    pub text: String,
    #[serde(default)]
    pub url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub source: String,
    pub platform: String,
    #[serde(default)]
    pub user_handle: Option<String>,
    #[serde(default)]
    pub likes: Option<u64>,
    #[serde(default)]
    pub shares: Option<u64>,
    #[serde(default)]
    pub comments: Option<u64>,
    #[serde(default)]
    pub reach: Option<u64>,
    #[serde(default)]
    pub user_location: Option<String>,
}

/// Parse the CSV `source` column into the fixed source-type taxonomy.
/// Accepts the canonical snake_case spelling plus spaces/hyphens, since
/// collectors are external and not guaranteed to agree on separators.
pub fn parse_source_type(raw: &str) -> Result<SourceType, String> {
    let normalized = raw.trim().to_lowercase().replace([' ', '-'], "_");
    match normalized.as_str() {
        "national_media" => Ok(SourceType::NationalMedia),
        "verified" => Ok(SourceType::Verified),
        "citizen" => Ok(SourceType::Citizen),
        "broadcast" => Ok(SourceType::Broadcast),
        "presidency_statement" => Ok(SourceType::PresidencyStatement),
        other => Err(format!("unrecognized source type: {other}")),
    }
}

/// Build a fresh, `pending` mention from one CSV row. Returns `Err` with a
/// human-readable reason when the row is unusable (bad source type); the
/// caller counts and skips rather than aborting the file.
pub fn record_to_mention(record: &RawCsvRecord, operator_id: &str) -> Result<Mention, String> {
    let source_type = parse_source_type(&record.source)?;

    let mut mention = Mention::new(
        Uuid::new_v4().to_string(),
        record.text.clone(),
        record.published_at,
        record.platform.clone(),
        source_type,
        operator_id,
    );

    if let Some(url) = &record.url {
        mention = mention.with_url(url.clone());
    }
    if let Some(handle) = &record.user_handle {
        mention = mention.with_user_handle(handle.clone());
    }
    if let Some(location) = &record.user_location {
        mention = mention.with_declared_location(location.clone());
    }
    if record.likes.is_some() || record.shares.is_some() || record.comments.is_some() || record.reach.is_some() {
        mention = mention.with_engagement(Engagement {
            likes: record.likes.unwrap_or(0),
            shares: record.shares.unwrap_or(0),
            comments: record.comments.unwrap_or(0),
            reach: record.reach.unwrap_or(0),
        });
    }

    Ok(mention)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(source: &str) -> RawCsvRecord {
        RawCsvRecord {
            text: "fuel prices rising".into(),
            url: Some("https://example.com/a".into()),
            published_at: Utc::now(),
            source: source.into(),
            platform: "twitter".into(),
            user_handle: None,
            likes: Some(10),
            shares: None,
            comments: None,
            reach: None,
            user_location: None,
        }
    }

    #[test]
    fn parses_canonical_source_types() {
        assert_eq!(parse_source_type("national_media").unwrap(), SourceType::NationalMedia);
        assert_eq!(parse_source_type("Presidency-Statement").unwrap(), SourceType::PresidencyStatement);
        assert_eq!(parse_source_type("CITIZEN").unwrap(), SourceType::Citizen);
    }

    #[test]
    fn rejects_unknown_source_type() {
        assert!(parse_source_type("press_release").is_err());
    }

    #[test]
    fn maps_record_to_pending_mention_with_engagement() {
        let mention = record_to_mention(&record("verified"), "operator-1").unwrap();
        assert_eq!(mention.source_type, SourceType::Verified);
        assert_eq!(mention.operator_id, "operator-1");
        assert_eq!(mention.engagement.unwrap().likes, 10);
        assert_eq!(mention.processing_status, govint_types::ProcessingStatus::Pending);
    }

    #[test]
    fn rejects_record_with_bad_source() {
        assert!(record_to_mention(&record("unknown"), "operator-1").is_err());
    }
}
