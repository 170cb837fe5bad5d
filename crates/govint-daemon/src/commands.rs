//! Command implementations: a one-shot cycle, a cron-scheduled serve
//! loop, a status readout, and the config get/set surface.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use govint_scheduler::{run_cycle, SchedulerConfig, SchedulerService};
use govint_types::ConfigValueType;
use tracing::{error, info};

use crate::cli::ConfigCommands;
use crate::wiring::Runtime;

/// Run one full collection cycle and log the resulting `CycleSummary`.
pub async fn run_once(runtime: &Runtime, operator_id: &str, use_existing_data: bool) -> Result<()> {
    let processing_config = runtime.config_store.processing_config().context("failed to materialize processing config")?;
    let dedup_config = runtime.config_store.deduplication_config().context("failed to materialize deduplication config")?;
    let stop = AtomicBool::new(false);

    let summary = run_cycle(
        &runtime.storage,
        &runtime.topic_registry,
        &runtime.analyzer,
        &runtime.path_resolver,
        operator_id,
        use_existing_data,
        &processing_config,
        &dedup_config,
        &stop,
    )
    .await
    .context("cycle failed")?;

    info!(
        counts = ?summary.counts_per_phase,
        durations_ms = ?summary.durations_per_phase,
        failed = summary.failed_mention_ids.len(),
        "cycle complete"
    );
    Ok(())
}

/// Run cycles on a cron schedule until the process receives SIGINT.
pub async fn serve(runtime: Runtime, operator_id: String, cron: String, timezone: Option<String>) -> Result<()> {
    let scheduler_config = SchedulerConfig {
        default_timezone: timezone.clone().unwrap_or_else(|| "UTC".to_string()),
        ..SchedulerConfig::default()
    };
    let scheduler = SchedulerService::new(scheduler_config).await.context("failed to construct scheduler")?;

    let storage = runtime.storage;
    let topic_registry = Arc::new(runtime.topic_registry);
    let analyzer = Arc::new(runtime.analyzer);
    let path_resolver = Arc::new(runtime.path_resolver);
    let config_store = Arc::new(runtime.config_store);

    scheduler
        .add_cron_job("collection_cycle", &cron, timezone.as_deref(), move |token| {
            let storage = storage.clone();
            let topic_registry = topic_registry.clone();
            let analyzer = analyzer.clone();
            let path_resolver = path_resolver.clone();
            let config_store = config_store.clone();
            let operator_id = operator_id.clone();

            async move {
                let stop = Arc::new(AtomicBool::new(false));
                let watcher_stop = stop.clone();
                let watcher = tokio::spawn(async move {
                    token.cancelled().await;
                    watcher_stop.store(true, Ordering::SeqCst);
                });

                let run: Result<govint_scheduler::CycleSummary> = async {
                    let processing_config = config_store.processing_config()?;
                    let dedup_config = config_store.deduplication_config()?;
                    let summary = run_cycle(&storage, &topic_registry, &analyzer, &path_resolver, &operator_id, false, &processing_config, &dedup_config, &stop).await?;
                    Ok(summary)
                }
                .await;

                match run {
                    Ok(summary) => info!(counts = ?summary.counts_per_phase, "scheduled cycle complete"),
                    Err(e) => error!(error = %e, "scheduled cycle failed"),
                }

                watcher.abort();
            }
        })
        .await
        .context("failed to register cycle cron job")?;

    scheduler.start().await.context("failed to start scheduler")?;
    info!(cron = %cron, "scheduler running, press ctrl-c to stop");

    tokio::signal::ctrl_c().await.context("failed to listen for ctrl-c")?;
    info!("shutdown signal received");

    Ok(())
}

/// Print pending/failed mention counts and the active topic catalogue size.
pub async fn show_status(runtime: &Runtime) -> Result<()> {
    let pending = runtime.storage.list_pending_mentions().context("failed to list pending mentions")?;
    let active_topics = runtime.storage.list_active_topics().context("failed to list active topics")?;

    println!("database:       {:?}", runtime.path_resolver.db_path());
    println!("pending mentions: {}", pending.len());
    println!("active topics:    {}", active_topics.len());
    println!("default operator: {}", runtime.bootstrap.default_operator_id.as_deref().unwrap_or("(none configured)"));

    Ok(())
}

fn value_type_for(value: &serde_json::Value) -> ConfigValueType {
    match value {
        serde_json::Value::Bool(_) => ConfigValueType::Bool,
        serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => ConfigValueType::Int,
        serde_json::Value::Number(_) => ConfigValueType::Float,
        serde_json::Value::String(_) => ConfigValueType::String,
        serde_json::Value::Array(_) => ConfigValueType::Array,
        _ => ConfigValueType::Json,
    }
}

pub async fn handle_config(runtime: &Runtime, command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Get { key } => {
            let value = runtime.config_store.get(&key).with_context(|| format!("no such config key: {key}"))?;
            println!("{key} = {value}");
        }
        ConfigCommands::Set { key, value, updated_by, reason } => {
            let (category, field) = key.rsplit_once('.').with_context(|| format!("config key must be dotted: {key}"))?;
            let parsed: serde_json::Value = serde_json::from_str(&value).unwrap_or_else(|_| serde_json::Value::String(value.clone()));
            let value_type = value_type_for(&parsed);
            let description = runtime
                .storage
                .get_config_entry(category, field)
                .context("failed to look up existing config entry")?
                .map(|e| e.description)
                .unwrap_or_default();

            runtime
                .config_store
                .set(category, field, parsed, value_type, &description, &updated_by, &reason)
                .with_context(|| format!("failed to set {key}"))?;
            println!("{key} updated");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_type_for_classifies_json_scalars() {
        assert_eq!(value_type_for(&serde_json::json!(true)), ConfigValueType::Bool);
        assert_eq!(value_type_for(&serde_json::json!(3)), ConfigValueType::Int);
        assert_eq!(value_type_for(&serde_json::json!(3.5)), ConfigValueType::Float);
        assert_eq!(value_type_for(&serde_json::json!("hello")), ConfigValueType::String);
        assert_eq!(value_type_for(&serde_json::json!([1, 2])), ConfigValueType::Array);
        assert_eq!(value_type_for(&serde_json::json!({"a": 1})), ConfigValueType::Json);
    }
}
