//! `ConfigEntry` and its audit trail — the persisted half of the Config
//! Store (C1). The in-memory merge/typed-getter logic lives in
//! `govint-config`; this crate only carries the row shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declared type of a configuration value, used to coerce typed getters
/// and fail fast on mismatch (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigValueType {
    Int,
    Float,
    Bool,
    String,
    Array,
    Json,
}

/// One row of `config_entries`, unique by `(category, key)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub category: String,
    pub key: String,
    pub value: Value,
    pub value_type: ConfigValueType,
    pub description: String,
    pub default_value: Value,
    pub active: bool,
    pub updated_by: String,
    pub updated_at: DateTime<Utc>,
}

impl ConfigEntry {
    pub fn dotted_key(&self) -> String {
        format!("{}.{}", self.category, self.key)
    }
}

/// One row of `config_audit`. Every mutating `Config Store::set` call
/// produces exactly one of these, even when the value is unchanged
/// (§4.1: `reason = "noop"` is allowed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigAudit {
    pub category: String,
    pub key: String,
    pub old_value: Value,
    pub new_value: Value,
    pub changed_by: String,
    pub changed_at: DateTime<Utc>,
    pub reason: String,
}
