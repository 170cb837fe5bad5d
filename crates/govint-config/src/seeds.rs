//! Loads the fixed governance topic catalogue from a directory of
//! frontmatter-annotated seed files, one per topic. Used to (re-)seed
//! `govint-topics`'s Topic Registry on first run or when an operator adds
//! a new topic to the catalogue.
//!
//! Each file looks like:
//!
//! ```text
//! ---
//! key: fuel_pricing
//! display_name: Fuel Pricing
//! keywords: [fuel, petrol, diesel, pump price]
//! category: economy
//! ---
//! Mentions about changes to fuel prices, subsidy removal, and pump
//! shortages.
//! ```

use std::path::Path;

use chrono::Utc;
use gray_matter::engine::YAML;
use gray_matter::Matter;
use govint_types::Topic;
use serde::Deserialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::ConfigError;

#[derive(Debug, Deserialize)]
struct SeedFrontmatter {
    key: String,
    display_name: String,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default = "default_active")]
    active: bool,
}

fn default_active() -> bool {
    true
}

/// Walk `dir` for topic seed files (any extension) and parse each one's
/// YAML frontmatter plus body into a `Topic`. Files that fail to parse
/// are skipped with a warning rather than aborting the whole load —
/// one malformed seed file shouldn't block every other topic.
pub fn load_topic_seeds(dir: &Path) -> Result<Vec<Topic>, ConfigError> {
    if !dir.is_dir() {
        debug!(path = %dir.display(), "topic seed directory does not exist, skipping");
        return Ok(Vec::new());
    }

    let matter = Matter::<YAML>::new();
    let mut topics = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "failed to walk topic seed directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let raw = match std::fs::read_to_string(entry.path()) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "failed to read seed file");
                continue;
            }
        };

        let parsed = matter.parse(&raw);
        let Some(pod) = parsed.data else {
            warn!(path = %entry.path().display(), "seed file has no frontmatter, skipping");
            continue;
        };

        let frontmatter: SeedFrontmatter = match pod.deserialize() {
            Ok(f) => f,
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "failed to parse seed frontmatter");
                continue;
            }
        };

        let mut topic = Topic::new(
            frontmatter.key,
            frontmatter.display_name,
            parsed.content.trim().to_string(),
            frontmatter.keywords,
        );
        topic.active = frontmatter.active;
        topic.category = frontmatter.category;
        topic.created_at = Utc::now();
        topics.push(topic);
    }

    Ok(topics)
}
