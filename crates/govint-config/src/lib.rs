//! # govint-config
//!
//! The Config Store (C1) and Path Resolver (C2).
//!
//! - [`bootstrap::BootstrapSettings`] resolves process-bootstrap concerns
//!   (database location, log level) the same layered way the teacher's
//!   `Settings::load` does.
//! - [`store::ConfigStore`] is the database-backed, dotted-key runtime
//!   configuration surface every other component reads from during a
//!   cycle (§4.1).
//! - [`path_resolver::PathResolver`] hands out canonical filesystem
//!   locations derived from bootstrap settings.
//! - [`seeds::load_topic_seeds`] loads the governance topic catalogue
//!   from frontmatter-annotated seed files.

pub mod bootstrap;
pub mod error;
pub mod path_resolver;
pub mod seeds;
pub mod sections;
pub mod store;

pub use bootstrap::BootstrapSettings;
pub use error::ConfigError;
pub use path_resolver::PathResolver;
pub use seeds::load_topic_seeds;
pub use sections::{
    AggregationConfig, DeduplicationConfig, EngagementConfig, IssueConfig, IssueLifecycleConfig,
    LlmModelsConfig, ModelsConfig, ParallelConfig, PriorityConfig, ProcessingConfig, RetryConfig,
    RuntimeDefaults, SentimentConfig, TimeoutsConfig, TopicConfig, VolumeConfig,
};
pub use store::ConfigStore;
