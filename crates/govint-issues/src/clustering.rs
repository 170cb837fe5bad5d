//! Issue Clustering (C13): single-pass greedy clustering of mention
//! embeddings within one topic's unclaimed mentions (§4.5).

use chrono::{DateTime, Utc};

use crate::similarity::{cosine_similarity, normalize};

/// One input to the clustering pass: a mention awaiting cluster
/// assignment within a single topic.
#[derive(Debug, Clone)]
pub struct ClusterableMention {
    pub mention_id: String,
    pub embedding: Vec<f32>,
    pub published_at: DateTime<Utc>,
}

/// A cluster formed during one clustering pass: its running centroid and
/// the ids of its members in assignment order.
#[derive(Debug, Clone)]
pub struct Cluster {
    pub centroid: Vec<f32>,
    pub member_ids: Vec<String>,
    pub latest_published_at: DateTime<Utc>,
}

impl Cluster {
    fn seed(mention: &ClusterableMention) -> Self {
        let mut centroid = mention.embedding.clone();
        normalize(&mut centroid);
        Self {
            centroid,
            member_ids: vec![mention.mention_id.clone()],
            latest_published_at: mention.published_at,
        }
    }

    /// Fold a new member into the cluster, updating the centroid as the
    /// running mean of all members (§4.5).
    fn add(&mut self, mention: &ClusterableMention) {
        let n = self.member_ids.len() as f32;
        let mut updated: Vec<f32> = self
            .centroid
            .iter()
            .zip(mention.embedding.iter())
            .map(|(c, e)| (c * n + e) / (n + 1.0))
            .collect();
        normalize(&mut updated);
        self.centroid = updated;
        self.member_ids.push(mention.mention_id.clone());
        if mention.published_at > self.latest_published_at {
            self.latest_published_at = mention.published_at;
        }
    }
}

/// Greedily cluster `mentions` within a topic: sort by publish time
/// descending, then assign each mention to the first existing cluster
/// whose centroid similarity meets `similarity_threshold`, seeding a new
/// cluster otherwise (§4.5).
pub fn cluster_mentions(mut mentions: Vec<ClusterableMention>, similarity_threshold: f32) -> Vec<Cluster> {
    mentions.sort_by(|a, b| b.published_at.cmp(&a.published_at));

    let mut clusters: Vec<Cluster> = Vec::new();

    for mention in &mentions {
        let first_match = clusters
            .iter_mut()
            .find(|c| cosine_similarity(&c.centroid, &mention.embedding) >= similarity_threshold);

        match first_match {
            Some(cluster) => cluster.add(mention),
            None => clusters.push(Cluster::seed(mention)),
        }
    }

    clusters
}
