//! The `Topic` entity: a governance category from a fixed active catalogue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type Embedding = Vec<f32>;

/// A boolean grouping of keywords, evaluated as `AND`/`OR` against the
/// mention text. Plain `keywords` on `Topic` are implicitly `OR`ed;
/// `keyword_groups` lets a topic require co-occurrence of terms.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordGroup {
    All(Vec<String>),
    Any(Vec<String>),
}

/// A governance category. Read-mostly; shared by many mentions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub key: String,
    pub display_name: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub keyword_groups: Vec<KeywordGroup>,
    pub embedding: Option<Embedding>,
    pub active: bool,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Topic {
    pub fn new(
        key: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
        keywords: Vec<String>,
    ) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            description: description.into(),
            keywords,
            keyword_groups: Vec::new(),
            embedding: None,
            active: true,
            category: None,
            created_at: Utc::now(),
        }
    }

    /// The text the Topic Registry embeds to produce `embedding`, per
    /// §4.2: `display_name + " " + description + " " + keywords.join(" ")`,
    /// truncated to 8000 characters.
    pub fn embedding_source_text(&self) -> String {
        let mut text = format!(
            "{} {} {}",
            self.display_name,
            self.description,
            self.keywords.join(" ")
        );
        text.truncate(8000);
        text
    }

    pub fn with_embedding(mut self, embedding: Embedding) -> Self {
        self.embedding = Some(embedding);
        self
    }

    pub fn is_non_governance(&self) -> bool {
        self.key == "non_governance"
    }
}

/// Synthetic catch-all topic attached to mentions that matched no
/// configured topic (§4.2). Excluded from issue clustering (§9 Open
/// Question 3).
pub fn non_governance_topic() -> Topic {
    let mut t = Topic::new("non_governance", "Non-governance", "", Vec::new());
    t.active = false;
    t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedding_source_text_truncates() {
        let t = Topic::new("k", "d", "x".repeat(9000), Vec::new());
        assert_eq!(t.embedding_source_text().len(), 8000);
    }

    #[test]
    fn non_governance_is_recognized() {
        assert!(non_governance_topic().is_non_governance());
        assert!(!Topic::new("fuel_pricing", "Fuel Pricing", "", Vec::new()).is_non_governance());
    }
}
