//! Backoff commands

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use camino::Utf8Path;
use portal_core::retry::{calculate_delay, BackoffExecutorBuilder, ChainObserver, StatsObserver, TracingObserver};
use portal_core::{BackoffPolicy, ConfigLoader};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::cli::{BackoffCommands, BackoffRunArgs, BackoffScheduleArgs};
use crate::output;

const DEFAULT_OPERATION: &str = "default";

/// Rows printed by `backoff schedule`; later retries are summarized
const MAX_SCHEDULE_ROWS: u32 = 64;

pub async fn run(cmd: BackoffCommands, config: Option<&Utf8Path>) -> Result<()> {
    match cmd {
        BackoffCommands::Schedule(args) => schedule(args, config),
        BackoffCommands::Run(args) => run_command(args, config).await,
    }
}

/// Load the runtime config and pick the policy for `operation`
fn resolve_policy(
    config: Option<&Utf8Path>,
    operation: Option<&str>,
    retries: Option<u32>,
    base_delay_ms: Option<u64>,
) -> Result<BackoffPolicy> {
    let mut loader = ConfigLoader::new()?;
    if let Some(path) = config {
        loader = loader.with_file(path);
    }
    let runtime = loader.load().context("Failed to load runtime config")?;

    let mut policy = match operation {
        Some(name) => runtime.retry_policies.policy_for(name).clone(),
        None => runtime.retry_policies.default.clone(),
    };
    if let Some(retries) = retries {
        policy.max_retries = retries;
    }
    if let Some(base) = base_delay_ms {
        policy.base_delay_ms = base;
    }
    policy.validate()?;

    Ok(policy)
}

#[derive(Tabled, Serialize)]
struct ScheduleRow {
    #[tabled(rename = "retry")]
    retry: u32,
    #[tabled(rename = "min delay (ms)")]
    min_ms: u128,
    #[tabled(rename = "max delay (ms)")]
    max_ms: u128,
    #[tabled(rename = "sample (ms)")]
    sample_ms: u128,
}

fn schedule_rows(policy: &BackoffPolicy, jitter: bool) -> Vec<ScheduleRow> {
    let span = if jitter {
        Duration::from_millis(policy.jitter_span_ms())
    } else {
        Duration::ZERO
    };

    (1..=policy.max_retries.min(MAX_SCHEDULE_ROWS))
        .map(|retry| {
            let min = calculate_delay(policy, retry, false);
            // Upper bound is exclusive; report the last whole millisecond reachable
            let max = min.saturating_add(span.saturating_sub(Duration::from_nanos(1)));
            ScheduleRow {
                retry,
                min_ms: min.as_millis(),
                max_ms: max.as_millis(),
                sample_ms: calculate_delay(policy, retry, jitter).as_millis(),
            }
        })
        .collect()
}

fn schedule(args: BackoffScheduleArgs, config: Option<&Utf8Path>) -> Result<()> {
    let policy = resolve_policy(config, args.operation.as_deref(), args.retries, None)?;
    let rows = schedule_rows(&policy, !args.no_jitter);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    output::header(&format!(
        "Backoff schedule: {}",
        args.operation.as_deref().unwrap_or(DEFAULT_OPERATION)
    ));
    output::kv("Attempts", policy.max_attempts());
    output::kv("Base delay", format!("{}ms", policy.base_delay_ms));
    output::kv("Jitter", format!("0-{}ms", policy.jitter_span_ms()));
    output::kv("Factor", policy.factor);
    println!();

    if rows.is_empty() {
        output::info("No retries: the first failure is final");
    } else {
        let mut table = Table::new(rows);
        table.with(Style::sharp());
        println!("{}", table);
    }

    if policy.max_retries > MAX_SCHEDULE_ROWS {
        output::info(&format!(
            "{} more retries not shown",
            policy.max_retries - MAX_SCHEDULE_ROWS
        ));
    }

    Ok(())
}

async fn run_command(args: BackoffRunArgs, config: Option<&Utf8Path>) -> Result<()> {
    let policy = resolve_policy(
        config,
        args.operation.as_deref(),
        args.retries,
        args.base_delay_ms,
    )?;
    let operation = args.operation.as_deref().unwrap_or(DEFAULT_OPERATION);

    let (program, program_args) = args
        .command
        .split_first()
        .ok_or_else(|| anyhow!("No command given"))?;

    let stats = Arc::new(StatsObserver::new());
    let executor = BackoffExecutorBuilder::new()
        .with_policy(policy)
        .with_observer(ChainObserver::new(
            TracingObserver::new(operation),
            stats.clone(),
        ))
        .build();

    let result = executor
        .execute(|| run_once(program, program_args))
        .await;

    match result {
        Ok(()) => {
            output::success(&format!(
                "{} succeeded after {} attempt(s)",
                program,
                stats.attempt_starts()
            ));
            Ok(())
        }
        Err(e) => {
            output::error(&format!(
                "{} failed after {} attempt(s)",
                program,
                stats.attempt_starts()
            ));
            Err(e)
        }
    }
}

/// Run the command once; a non-zero exit is a failure
async fn run_once(program: &str, args: &[String]) -> Result<()> {
    let status = tokio::process::Command::new(program)
        .args(args)
        .status()
        .await
        .with_context(|| format!("Failed to spawn {}", program))?;

    if status.success() {
        Ok(())
    } else {
        match status.code() {
            Some(code) => Err(anyhow!("{} exited with status {}", program, code)),
            None => Err(anyhow!("{} was terminated by a signal", program)),
        }
    }
}
