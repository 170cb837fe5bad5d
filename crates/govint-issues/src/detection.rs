//! Issue Detection Engine (C14): match-or-create against existing issues
//! for a topic's newly-clustered mentions (§4.5).

use chrono::{DateTime, Duration, Utc};
use govint_aggregation::{aggregate, AggregationMember};
use govint_config::IssueConfig;
use govint_storage::Storage;
use govint_types::{AggregationType, Issue, IssueMention, IssueState, Mention, MentionTopic, TimeWindow};
use tracing::{info, instrument};
use ulid::Ulid;

use crate::clustering::{cluster_mentions, Cluster, ClusterableMention};
use crate::error::IssuesError;
use crate::labeling::{generate_label, generate_slug, generate_title, representative_text, top_keywords};
use crate::metrics::{lifecycle_state, priority_score, regions_impacted, top_sources, velocity_percent, velocity_score, volume_windows, MentionMetricInput};
use crate::similarity::cosine_similarity;

/// Outcome of running detection for one topic's unclaimed mentions.
#[derive(Debug, Default)]
pub struct DetectionOutcome {
    pub issues_created: usize,
    pub issues_updated: usize,
    pub mentions_below_cluster_threshold: usize,
}

/// Run the Issue Detection Engine for a single topic: fetch its
/// unclaimed `MentionTopic` links, cluster the underlying mentions,
/// match each cluster against existing candidate issues, and persist the
/// result (new issue, updated issue, or no-op for sub-threshold
/// clusters).
#[instrument(skip(storage, config))]
pub fn detect_issues_for_topic(storage: &Storage, topic_key: &str, config: &IssueConfig, now: DateTime<Utc>) -> Result<DetectionOutcome, IssuesError> {
    let links = storage
        .get_mention_topics_for_topic(topic_key)?
        .into_iter()
        .filter(|link| link.issue_id.is_none())
        .collect::<Vec<_>>();

    let mut clusterable = Vec::with_capacity(links.len());
    let mut mentions_by_id = std::collections::HashMap::new();
    for link in &links {
        let Some(mention) = storage.get_mention(&link.mention_id)? else { continue };
        let Some(embedding) = storage.get_embedding(&link.mention_id)? else { continue };
        clusterable.push(ClusterableMention {
            mention_id: mention.id.clone(),
            embedding,
            published_at: mention.published_at,
        });
        mentions_by_id.insert(mention.id.clone(), mention);
    }

    let clusters = cluster_mentions(clusterable, config.cluster_similarity_threshold);
    let candidates = storage.list_candidate_issues_for_topic(topic_key)?;

    let mut outcome = DetectionOutcome::default();

    for cluster in clusters {
        if cluster.member_ids.len() < config.min_cluster_size {
            outcome.mentions_below_cluster_threshold += cluster.member_ids.len();
            continue;
        }

        let member_links: Vec<&MentionTopic> = links.iter().filter(|l| cluster.member_ids.contains(&l.mention_id)).collect();

        match find_matching_issue(&cluster, &candidates, config, now) {
            Some((issue, sim)) => {
                attach_cluster_to_issue(storage, topic_key, &cluster, &member_links, issue, sim, config, now)?;
                outcome.issues_updated += 1;
            }
            None => {
                create_issue_from_cluster(storage, topic_key, &cluster, &member_links, &mentions_by_id, config, now)?;
                outcome.issues_created += 1;
            }
        }
    }

    info!(topic = topic_key, created = outcome.issues_created, updated = outcome.issues_updated, "issue detection pass complete");
    Ok(outcome)
}

/// §4.5's match step: highest-similarity candidate at or above
/// `issue_similarity_threshold` whose `last_activity` is within
/// `match_time_window_hours` of the cluster's latest member.
fn find_matching_issue<'a>(cluster: &Cluster, candidates: &'a [Issue], config: &IssueConfig, _now: DateTime<Utc>) -> Option<(&'a Issue, f32)> {
    let window = Duration::hours(config.match_time_window_hours as i64);

    candidates
        .iter()
        .map(|issue| (issue, cosine_similarity(&cluster.centroid, &issue.cluster_centroid_embedding)))
        .filter(|(issue, sim)| {
            *sim >= config.issue_similarity_threshold && (cluster.latest_published_at - issue.last_activity).abs() <= window
        })
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
}

fn attach_cluster_to_issue(
    storage: &Storage,
    topic_key: &str,
    cluster: &Cluster,
    member_links: &[&MentionTopic],
    issue: &Issue,
    similarity: f32,
    config: &IssueConfig,
    now: DateTime<Utc>,
) -> Result<(), IssuesError> {
    let mut issue = issue.clone();
    let existing_count = issue.mention_count as f32;
    let new_count = cluster.member_ids.len() as f32;
    issue.cluster_centroid_embedding = weighted_centroid(&issue.cluster_centroid_embedding, existing_count, &cluster.centroid, new_count);

    for link in member_links {
        let mut updated = (*link).clone();
        updated.issue_id = Some(issue.id.clone());
        storage.put_mention_topic(&updated)?;

        let issue_mention = IssueMention::new(Ulid::new().to_string(), issue.id.clone(), link.mention_id.clone(), similarity.clamp(0.0, 1.0), topic_key)?;
        storage.put_issue_mention(&issue_mention)?;
    }

    issue.touch(cluster.latest_published_at);
    recompute_metrics(storage, &mut issue, config, now)?;
    storage.put_issue(&issue)?;
    Ok(())
}

fn create_issue_from_cluster(
    storage: &Storage,
    topic_key: &str,
    cluster: &Cluster,
    member_links: &[&MentionTopic],
    mentions_by_id: &std::collections::HashMap<String, Mention>,
    config: &IssueConfig,
    now: DateTime<Utc>,
) -> Result<(), IssuesError> {
    let member_texts: Vec<(&str, &str)> = member_links
        .iter()
        .filter_map(|l| mentions_by_id.get(&l.mention_id))
        .map(|m| (m.id.as_str(), m.text.as_str()))
        .collect();

    let texts: Vec<&str> = member_texts.iter().map(|(_, t)| *t).collect();
    let keywords = top_keywords(&texts, 10);
    let representative = representative_text(&member_texts, &keywords).unwrap_or("");

    let first_published_at = member_links
        .iter()
        .filter_map(|l| mentions_by_id.get(&l.mention_id))
        .map(|m| m.published_at)
        .min()
        .unwrap_or(now);

    let slug = generate_slug(topic_key, first_published_at);
    let title = generate_title(representative);
    let label = generate_label(&keywords);

    let mut issue = Issue::new(Ulid::new().to_string(), slug, topic_key, first_published_at, cluster.centroid.clone(), config.cluster_similarity_threshold)
        .with_label_and_title(label, title);

    for link in member_links {
        let mut updated = (*link).clone();
        updated.issue_id = Some(issue.id.clone());
        storage.put_mention_topic(&updated)?;

        let issue_mention = IssueMention::new(Ulid::new().to_string(), issue.id.clone(), link.mention_id.clone(), 1.0, topic_key)?;
        storage.put_issue_mention(&issue_mention)?;
    }

    issue.touch(cluster.latest_published_at);
    recompute_metrics(storage, &mut issue, config, now)?;
    storage.put_issue(&issue)?;
    Ok(())
}

fn weighted_centroid(existing: &[f32], existing_weight: f32, new: &[f32], new_weight: f32) -> Vec<f32> {
    if existing.is_empty() {
        return new.to_vec();
    }
    let total = existing_weight + new_weight;
    let mut combined: Vec<f32> = existing
        .iter()
        .zip(new.iter())
        .map(|(e, n)| (e * existing_weight + n * new_weight) / total)
        .collect();
    crate::similarity::normalize(&mut combined);
    combined
}

/// Recompute volume, velocity, sentiment-derived priority, metadata, and
/// lifecycle state for `issue` from its current member mentions (§4.5
/// "Recomputation").
fn recompute_metrics(storage: &Storage, issue: &mut Issue, config: &IssueConfig, now: DateTime<Utc>) -> Result<(), IssuesError> {
    let issue_mentions = storage.get_issue_mentions(&issue.id)?;
    let mut metric_inputs = Vec::with_capacity(issue_mentions.len());
    let mut texts: Vec<String> = Vec::new();
    let mut aggregation_members: Vec<AggregationMember> = Vec::with_capacity(issue_mentions.len());

    for link in &issue_mentions {
        if let Some(mention) = storage.get_mention(&link.mention_id)? {
            metric_inputs.push(MentionMetricInput {
                published_at: mention.published_at,
                source_label: mention.source_platform.clone(),
                location_label: mention.location_label.clone(),
            });
            texts.push(mention.text.clone());

            if let (Some(label), Some(score), Some(influence), Some(confidence)) =
                (mention.sentiment_label, mention.sentiment_score, mention.influence_weight, mention.confidence_weight)
            {
                let emotion = mention
                    .emotion_distribution
                    .as_ref()
                    .map(govint_types::EmotionDistribution::from_hashmap)
                    .unwrap_or_default();
                aggregation_members.push(AggregationMember { sentiment_label: label, sentiment_score: score, emotion, influence_weight: influence, confidence_weight: confidence });
            }
        }
    }

    issue.mention_count = metric_inputs.len() as u64;

    // Window/key are irrelevant here: only the scalar sentiment fields are read back.
    let sentiment = aggregate(AggregationType::Issue, &issue.id, TimeWindow::ThirtyDays, &aggregation_members);
    issue.weighted_sentiment_score = sentiment.weighted_sentiment_score;
    issue.sentiment_index = sentiment.sentiment_index;
    issue.sentiment_distribution = sentiment.sentiment_distribution;
    issue.emotion_distribution = sentiment.emotion_distribution;
    issue.emotion_adjusted_severity = sentiment.emotion_adjusted_severity;

    let (current, previous) = volume_windows(&metric_inputs, config.volume.time_window_hours, now);
    issue.volume_current_window = current;
    issue.volume_previous_window = previous;
    issue.velocity_percent = velocity_percent(current, previous);
    issue.velocity_score = velocity_score(issue.velocity_percent);

    let text_refs: Vec<&str> = texts.iter().map(|t| t.as_str()).collect();
    issue.top_keywords = top_keywords(&text_refs, 10);
    issue.top_sources = top_sources(&metric_inputs, 5);
    issue.regions_impacted = regions_impacted(&metric_inputs, 10);

    let hours_since_last_activity = (now - issue.last_activity).num_seconds() as f64 / 3600.0;
    let score = priority_score(issue.sentiment_index, issue.mention_count, hours_since_last_activity, issue.velocity_score, &config.priority);
    issue.set_priority(score);

    issue.state = lifecycle_state(now, issue.start_time, issue.last_activity, issue.mention_count, issue.sentiment_index, issue.velocity_percent, &config.lifecycle);
    if issue.state == IssueState::Resolved {
        issue.resolve(now);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use govint_types::{MentionTopic, SourceType, Topic};
    use tempfile::TempDir;

    fn open_storage() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        (dir, Storage::open(dir.path()).unwrap())
    }

    fn seed_mention(storage: &Storage, id: &str, published_at: DateTime<Utc>, embedding: Vec<f32>) {
        let mention = Mention::new(id, format!("mention {id} fuel prices"), published_at, "citizen_post", SourceType::Citizen, "op1");
        storage.put_mention(&mention).unwrap();
        storage.put_embedding(id, &embedding).unwrap();
        let link = MentionTopic::new(format!("mt-{id}"), id, "fuel_pricing", 0.8, 0.5, 0.7);
        storage.put_mention_topic(&link).unwrap();
    }

    #[test]
    fn cluster_below_min_size_creates_no_issue() {
        let (_dir, storage) = open_storage();
        storage.put_topic(&Topic::new("fuel_pricing", "Fuel Pricing", "", vec!["fuel".into()])).unwrap();
        seed_mention(&storage, "m1", Utc::now(), vec![1.0, 0.0, 0.0]);

        let config = IssueConfig::default();
        let outcome = detect_issues_for_topic(&storage, "fuel_pricing", &config, Utc::now()).unwrap();
        assert_eq!(outcome.issues_created, 0);
        assert_eq!(outcome.mentions_below_cluster_threshold, 1);
    }

    #[test]
    fn cluster_at_min_size_creates_an_issue() {
        let (_dir, storage) = open_storage();
        storage.put_topic(&Topic::new("fuel_pricing", "Fuel Pricing", "", vec!["fuel".into()])).unwrap();
        let now = Utc::now();
        seed_mention(&storage, "m1", now, vec![1.0, 0.0, 0.0]);
        seed_mention(&storage, "m2", now, vec![0.99, 0.01, 0.0]);
        seed_mention(&storage, "m3", now, vec![0.98, 0.02, 0.0]);

        let config = IssueConfig::default();
        let outcome = detect_issues_for_topic(&storage, "fuel_pricing", &config, now).unwrap();
        assert_eq!(outcome.issues_created, 1);

        let issues = storage.list_candidate_issues_for_topic("fuel_pricing").unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].mention_count, 3);
    }
}
