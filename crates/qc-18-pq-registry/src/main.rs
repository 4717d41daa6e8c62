//! PQ-Registry: replay command batches against a file-backed registry.
//!
//! Reads a JSON array of `BatchEntry` values, applies it at one block and
//! prints the per-entry outcomes, the emitted events and the final stats
//! as JSON on stdout. Logs go to stderr.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use qc_18_pq_registry::prelude::*;

/// PQ-Registry: post-quantum key registry batch runner
#[derive(Parser, Debug)]
#[command(name = "pq-registry")]
#[command(about = "Apply a JSON command batch to a file-backed post-quantum registry")]
struct Args {
    /// Registry data file (overrides QC_REGISTRY_DATA)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Administrator principal, 64 hex chars (overrides QC_REGISTRY_ADMIN)
    #[arg(short, long)]
    admin: Option<String>,

    /// JSON batch file; without it only the stats are printed
    #[arg(short, long)]
    batch: Option<PathBuf>,

    /// Block height the batch is applied at
    #[arg(long, default_value = "1")]
    height: u64,

    /// Block timestamp in unix seconds (defaults to now)
    #[arg(long)]
    timestamp: Option<u64>,

    /// Block id, 64 hex chars (defaults to sha256 of the height)
    #[arg(long)]
    block_id: Option<String>,

    /// Do not publish registry events
    #[arg(long)]
    no_events: bool,
}

/// Runtime configuration after defaults, environment and arguments.
#[derive(Debug)]
struct NodeConfig {
    data_path: PathBuf,
    registry: RegistryConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("./data/pq-registry.db"),
            registry: RegistryConfig::default(),
        }
    }
}

#[derive(Serialize)]
struct EntryReport {
    index: usize,
    op: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<CommandOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct RunReport {
    height: u64,
    results: Vec<EntryReport>,
    events: Vec<RegistryEvent>,
    stats: RegistryStats,
}

fn parse_hash(label: &str, value: &str) -> Result<Hash> {
    let mut out = [0u8; 32];
    hex::decode_to_slice(value.trim(), &mut out)
        .with_context(|| format!("{label} must be 32 bytes (64 hex chars)"))?;
    Ok(out)
}

fn load_config(args: &Args) -> Result<NodeConfig> {
    load_config_from(args, |name| std::env::var(name).ok())
}

/// Defaults, then environment, then command line. Later layers win.
fn load_config_from(args: &Args, env: impl Fn(&str) -> Option<String>) -> Result<NodeConfig> {
    let mut config = NodeConfig::default();

    // Environment overrides
    if let Some(path) = env("QC_REGISTRY_DATA") {
        config.data_path = PathBuf::from(path);
    }
    if let Some(admin_hex) = env("QC_REGISTRY_ADMIN") {
        config.registry.administrator = parse_hash("QC_REGISTRY_ADMIN", &admin_hex)?;
        info!("Loaded administrator from environment");
    }

    // Command line overrides
    if let Some(path) = &args.data {
        config.data_path = path.clone();
    }
    if let Some(admin_hex) = &args.admin {
        config.registry.administrator = parse_hash("--admin", admin_hex)?;
    }
    config.registry.emit_events = !args.no_events;

    if !config.registry.has_administrator() {
        warn!("No administrator configured; only an existing registry can be opened");
    }

    Ok(config)
}

fn block_context(args: &Args) -> Result<BlockContext> {
    let timestamp = match args.timestamp {
        Some(ts) => ts,
        None => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .context("system clock before unix epoch")?
            .as_secs(),
    };
    let block_id = match &args.block_id {
        Some(id) => parse_hash("--block-id", id)?,
        None => qc_18_pq_registry::domain::hashing::sha256(&args.height.to_be_bytes()),
    };
    Ok(BlockContext::new(args.height, timestamp, block_id))
}

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_env("QC_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let config = load_config(&args)?;

    let store = FileBackedKVStore::open(&config.data_path)
        .with_context(|| format!("failed to open {}", config.data_path.display()))?;
    let deps = RegistryDependencies {
        kv_store: store,
        serializer: BincodeRecordSerializer,
        crypto: SimulatedPqCrypto,
        events: InMemoryEventSink::new(),
    };
    let mut registry =
        PqRegistryService::new(deps, config.registry).context("failed to open registry")?;

    let block = block_context(&args)?;
    let mut results = Vec::new();

    if let Some(batch_path) = &args.batch {
        let raw = std::fs::read_to_string(batch_path)
            .with_context(|| format!("failed to read {}", batch_path.display()))?;
        let entries: Vec<BatchEntry> = serde_json::from_str(&raw)
            .with_context(|| format!("invalid batch file {}", batch_path.display()))?;
        let ops: Vec<&'static str> = entries.iter().map(|e| e.command.name()).collect();

        let outcomes = registry.apply_batch(&block, entries);
        for (index, (op, outcome)) in ops.into_iter().zip(outcomes).enumerate() {
            let (outcome, error) = match outcome {
                Ok(outcome) => (Some(outcome), None),
                Err(e) if e.is_domain_error() => (None, Some(e.to_string())),
                Err(e) => bail!("entry {index} ({op}) hit a storage failure: {e}"),
            };
            results.push(EntryReport {
                index,
                op,
                outcome,
                error,
            });
        }
    }

    let events = registry.event_sink().drain();
    for event in &events {
        TracingEventSink.publish(event.clone());
    }

    let report = RunReport {
        height: block.height,
        results,
        events,
        stats: registry.get_contract_stats(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
