//! Polarity + justification via the LLM Provider (§4.3.1): a structured
//! response parsed from JSON, with one retry on parse failure or band
//! violation.

use govint_providers::LlmProvider;
use govint_types::{validate_sentiment_band, SentimentLabel};
use serde::Deserialize;
use tracing::warn;

use crate::error::SentimentError;

const DEFAULT_SYSTEM_PROMPT: &str = "You are a governance-intelligence analyst. Read the mention and \
respond ONLY with a JSON object of the form \
{\"label\": \"POSITIVE\"|\"NEGATIVE\"|\"NEUTRAL\", \"score\": <float -1..1>, \
\"justification\": \"<one sentence>\", \"topic_hints\": [\"<keyword>\", ...]}. \
The label and score must agree: POSITIVE requires score in [0.2, 1], \
NEGATIVE requires score in [-1, -0.2], NEUTRAL requires score in (-0.2, 0.2).";

#[derive(Debug, Deserialize)]
struct RawPolarityResponse {
    label: String,
    score: f32,
    justification: String,
    #[serde(default)]
    topic_hints: Vec<String>,
}

/// Parsed, band-validated polarity result. `topic_hints` is advisory
/// only — the Topic Classifier remains the source of truth for topic
/// attachment.
#[derive(Debug, Clone)]
pub struct PolarityResult {
    pub label: SentimentLabel,
    pub score: f32,
    pub justification: String,
    pub topic_hints: Vec<String>,
}

fn parse_label(raw: &str) -> Result<SentimentLabel, SentimentError> {
    match raw.trim().to_uppercase().as_str() {
        "POSITIVE" => Ok(SentimentLabel::Positive),
        "NEGATIVE" => Ok(SentimentLabel::Negative),
        "NEUTRAL" => Ok(SentimentLabel::Neutral),
        other => Err(SentimentError::MalformedOutput(format!("unknown label {other:?}"))),
    }
}

fn parse_response(text: &str) -> Result<PolarityResult, SentimentError> {
    let json_slice = extract_json_object(text).ok_or_else(|| SentimentError::MalformedOutput("no JSON object found in response".into()))?;

    let raw: RawPolarityResponse = serde_json::from_str(json_slice).map_err(|e| SentimentError::MalformedOutput(e.to_string()))?;
    let label = parse_label(&raw.label)?;

    validate_sentiment_band(label, raw.score).map_err(|_| SentimentError::BandViolation { label: format!("{label:?}"), score: raw.score })?;

    Ok(PolarityResult {
        label,
        score: raw.score,
        justification: raw.justification,
        topic_hints: raw.topic_hints,
    })
}

/// Some providers wrap JSON in prose or code fences; take the first
/// balanced `{...}` span.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Ask the LLM Provider for polarity + justification, retrying once on
/// parse failure or band violation (§4.3.1). A second failure is
/// terminal.
pub async fn classify_polarity(llm: &dyn LlmProvider, system_prompt: Option<&str>, text: &str) -> Result<PolarityResult, SentimentError> {
    let system = system_prompt.unwrap_or(DEFAULT_SYSTEM_PROMPT);

    let first = llm.chat(system, text).await?;
    match parse_response(&first) {
        Ok(result) => Ok(result),
        Err(first_err) => {
            warn!(error = %first_err, "polarity response failed to parse, retrying once");
            let second = llm.chat(system, text).await?;
            parse_response(&second)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_response() {
        let text = r#"{"label": "POSITIVE", "score": 0.6, "justification": "good news", "topic_hints": ["fuel"]}"#;
        let parsed = parse_response(text).unwrap();
        assert_eq!(parsed.label, SentimentLabel::Positive);
        assert_eq!(parsed.score, 0.6);
    }

    #[test]
    fn parses_response_wrapped_in_prose() {
        let text = "Sure, here you go:\n```json\n{\"label\": \"NEUTRAL\", \"score\": 0.0, \"justification\": \"meh\"}\n```";
        let parsed = parse_response(text).unwrap();
        assert_eq!(parsed.label, SentimentLabel::Neutral);
    }

    #[test]
    fn rejects_band_violation() {
        let text = r#"{"label": "POSITIVE", "score": -0.5, "justification": "bad", "topic_hints": []}"#;
        let err = parse_response(text).unwrap_err();
        assert!(matches!(err, SentimentError::BandViolation { .. }));
    }

    #[test]
    fn rejects_unknown_label() {
        let text = r#"{"label": "MIXED", "score": 0.1, "justification": "?"}"#;
        assert!(parse_response(text).is_err());
    }
}
