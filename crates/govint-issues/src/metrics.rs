//! Issue Metrics (C15): volume, velocity, priority scoring, lifecycle
//! state machine, and metadata extraction (§4.5).

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use govint_config::{IssueLifecycleConfig, PriorityConfig};
use govint_types::IssueState;

use crate::tfidf::TfIdf;

const DEFAULT_VELOCITY_SATURATION: f64 = 1000.0;

/// Minimal view of a mention needed for metric recomputation, decoupled
/// from `govint_types::Mention` so this crate doesn't need every field.
#[derive(Debug, Clone)]
pub struct MentionMetricInput {
    pub published_at: DateTime<Utc>,
    pub source_label: String,
    pub location_label: Option<String>,
}

/// `volume_current_window` / `volume_previous_window` over two
/// consecutive `window_hours`-long buckets ending at `now` (§4.5).
pub fn volume_windows(mentions: &[MentionMetricInput], window_hours: u32, now: DateTime<Utc>) -> (u64, u64) {
    let window = Duration::hours(window_hours as i64);
    let current_start = now - window;
    let previous_start = current_start - window;

    let mut current = 0u64;
    let mut previous = 0u64;
    for m in mentions {
        if m.published_at > current_start && m.published_at <= now {
            current += 1;
        } else if m.published_at > previous_start && m.published_at <= current_start {
            previous += 1;
        }
    }
    (current, previous)
}

/// `velocity_percent` per §4.5: percentage change current vs previous,
/// with a saturation value when the previous window was empty.
pub fn velocity_percent(current: u64, previous: u64) -> f64 {
    if previous > 0 {
        100.0 * (current as f64 - previous as f64) / previous as f64
    } else if current > 0 {
        DEFAULT_VELOCITY_SATURATION
    } else {
        0.0
    }
}

/// `velocity_score` (0-100) per §4.5's piecewise mapping of
/// `velocity_percent`.
pub fn velocity_score(velocity_percent: f64) -> f64 {
    if velocity_percent >= 100.0 {
        100.0
    } else if velocity_percent >= 0.0 {
        50.0 + velocity_percent / 2.0
    } else {
        (50.0 + velocity_percent / 2.0).max(0.0)
    }
}

/// Recency decay curve for the priority score's time component: linear
/// interpolation between the named checkpoints in §4.5.
fn recency_decay(hours_since: f64) -> f64 {
    const POINTS: [(f64, f64); 5] = [(0.0, 100.0), (24.0, 70.0), (24.0 * 7.0, 30.0), (24.0 * 30.0, 10.0), (24.0 * 90.0, 0.0)];

    if hours_since <= 0.0 {
        return 100.0;
    }
    if hours_since >= POINTS[4].0 {
        return 0.0;
    }

    for window in POINTS.windows(2) {
        let (h0, v0) = window[0];
        let (h1, v1) = window[1];
        if hours_since >= h0 && hours_since <= h1 {
            let t = (hours_since - h0) / (h1 - h0);
            return v0 + t * (v1 - v0);
        }
    }
    0.0
}

/// Weighted priority score (0-100) per §4.5.
#[allow(clippy::too_many_arguments)]
pub fn priority_score(sentiment_index: f32, mention_count: u64, hours_since_last_activity: f64, velocity_score: f64, config: &PriorityConfig) -> f32 {
    let sentiment_component = (100.0 - sentiment_index) * config.sentiment_weight;
    let volume_raw: f64 = 100.0 * (1.0 - (-(mention_count as f64) / 20.0).exp());
    let volume_component = volume_raw as f32 * config.volume_weight;
    let time_component = recency_decay(hours_since_last_activity) as f32 * config.time_weight;
    let velocity_component = velocity_score as f32 * config.velocity_weight;

    (sentiment_component + volume_component + time_component + velocity_component).clamp(0.0, 100.0)
}

/// Lifecycle state machine, evaluated in priority order (§4.5). `Archived`
/// is never returned — it is only ever set by an operator action.
pub fn lifecycle_state(
    now: DateTime<Utc>,
    start_time: DateTime<Utc>,
    last_activity: DateTime<Utc>,
    mention_count: u64,
    sentiment_index: f32,
    velocity_percent: f64,
    config: &IssueLifecycleConfig,
) -> IssueState {
    let days_since_activity = (now - last_activity).num_seconds() as f64 / 86400.0;
    if days_since_activity >= config.resolved_threshold_days as f64 {
        return IssueState::Resolved;
    }

    let hours_since_start = (now - start_time).num_seconds() as f64 / 3600.0;
    if hours_since_start < 24.0 || mention_count < 3 {
        return IssueState::Emerging;
    }

    if sentiment_index < 30.0 && mention_count >= 10 && velocity_percent > 0.0 {
        return IssueState::Escalated;
    }

    if velocity_percent < -20.0 && mention_count >= 5 {
        return IssueState::Stabilizing;
    }

    IssueState::Active
}

/// Top `n` word frequencies across `texts`, stop-words and short tokens
/// removed (§4.5 `top_keywords`).
pub fn top_keywords(texts: &[&str], n: usize) -> Vec<String> {
    if texts.is_empty() {
        return Vec::new();
    }
    TfIdf::new(texts).top_terms(n).into_iter().map(|(term, _)| term).collect()
}

/// Top `n` sources by frequency (§4.5 `top_sources`).
pub fn top_sources(mentions: &[MentionMetricInput], n: usize) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for m in mentions {
        *counts.entry(m.source_label.as_str()).or_insert(0) += 1;
    }
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().take(n).map(|(s, _)| s.to_string()).collect()
}

/// Up to `n` distinct non-null location labels (§4.5 `regions_impacted`).
pub fn regions_impacted(mentions: &[MentionMetricInput], n: usize) -> Vec<String> {
    let mut seen = Vec::new();
    for m in mentions {
        if let Some(location) = &m.location_label {
            if !seen.contains(location) {
                seen.push(location.clone());
                if seen.len() >= n {
                    break;
                }
            }
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocity_percent_saturates_when_previous_empty() {
        assert_eq!(velocity_percent(5, 0), 1000.0);
        assert_eq!(velocity_percent(0, 0), 0.0);
        assert_eq!(velocity_percent(15, 10), 50.0);
    }

    #[test]
    fn velocity_score_matches_piecewise_mapping() {
        assert_eq!(velocity_score(150.0), 100.0);
        assert_eq!(velocity_score(50.0), 75.0);
        assert_eq!(velocity_score(-200.0), 0.0);
    }

    #[test]
    fn recency_decay_matches_checkpoints() {
        assert_eq!(recency_decay(0.0), 100.0);
        assert!((recency_decay(24.0) - 70.0).abs() < 1e-6);
        assert!((recency_decay(24.0 * 90.0) - 0.0).abs() < 1e-6);
        assert_eq!(recency_decay(24.0 * 365.0), 0.0);
    }

    #[test]
    fn lifecycle_resolved_beats_everything() {
        let config = IssueLifecycleConfig::default();
        let now = Utc::now();
        let state = lifecycle_state(now, now - Duration::days(30), now - Duration::days(10), 50, 10.0, 50.0, &config);
        assert_eq!(state, IssueState::Resolved);
    }

    #[test]
    fn lifecycle_emerging_for_new_issue() {
        let config = IssueLifecycleConfig::default();
        let now = Utc::now();
        let state = lifecycle_state(now, now - Duration::hours(1), now, 1, 50.0, 0.0, &config);
        assert_eq!(state, IssueState::Emerging);
    }

    #[test]
    fn lifecycle_escalated_on_negative_sentiment_and_growth() {
        let config = IssueLifecycleConfig::default();
        let now = Utc::now();
        let state = lifecycle_state(now, now - Duration::days(3), now, 15, 20.0, 10.0, &config);
        assert_eq!(state, IssueState::Escalated);
    }

    #[test]
    fn regions_impacted_deduplicates_and_caps() {
        let mentions = vec![
            MentionMetricInput { published_at: Utc::now(), source_label: "a".into(), location_label: Some("Lagos".into()) },
            MentionMetricInput { published_at: Utc::now(), source_label: "a".into(), location_label: Some("Lagos".into()) },
            MentionMetricInput { published_at: Utc::now(), source_label: "a".into(), location_label: Some("Abuja".into()) },
        ];
        assert_eq!(regions_impacted(&mentions, 10), vec!["Lagos".to_string(), "Abuja".to_string()]);
    }
}
