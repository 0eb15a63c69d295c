// Copyright © Exchange Proxy Indexer Contributors
// SPDX-License-Identifier: Apache-2.0

//! # Exchange-Proxy Swap Attribution Indexer
//!
//! Replays a normalized event stream (one JSON record per line, in
//! blockchain order) through the swap attribution pipeline and reports the
//! resulting record counts.

use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use exchange_proxy_indexer::config::IndexerConfig;
use exchange_proxy_indexer::processors::swap_processor::{BatchStats, SwapProcessor};
use exchange_proxy_indexer::processors::events::normalized::ExchangeEvent;
use exchange_proxy_indexer::store::InMemoryStore;
use exchange_proxy_indexer::utils::processor_trait::{EventBatchProcessor, ProcessorName};

/// Configure jemalloc as the global allocator for better memory management
#[cfg(unix)]
#[global_allocator]
static ALLOC: jemallocator::Jemalloc = jemallocator::Jemalloc;

#[derive(Debug, Parser)]
#[command(name = "exchange-proxy-indexer", about = "Swap attribution indexer for aggregator fills")]
struct Args {
    /// Path to the YAML configuration file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Path to the normalized event stream (JSON lines, blockchain order)
    #[arg(long)]
    events: PathBuf,
}

/// Main application entry point
///
/// Initializes the async runtime and drives the event stream through the
/// processor pipeline.
fn main() -> Result<()> {
    // Keep a few threads around for file I/O alongside processing
    let num_cpus = num_cpus::get();
    let worker_threads = num_cpus.max(4);

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder
        .disable_lifo_slot()  // Improves fairness in task scheduling
        .enable_all()         // Enable all I/O and timer drivers
        .worker_threads(worker_threads)
        .build()
        .expect("Failed to build async runtime")
        .block_on(async {
            let args = Args::parse();
            run(args).await
        })
}

async fn run(args: Args) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = IndexerConfig::from_yaml_file(&args.config)?;
    let network = config.network_config()?;
    info!("🚀 Starting swap attribution indexer on {}", network.network);
    info!("📊 Exchange proxy: {}", network.exchange_proxy);

    let (notification_sender, notification_receiver) = mpsc::channel();
    let mut processor = SwapProcessor::new(network, InMemoryStore::new(), Some(notification_sender));
    info!("🔗 {} pipeline ready", processor.name());

    let file = tokio::fs::File::open(&args.events)
        .await
        .with_context(|| format!("failed to open event stream {}", args.events.display()))?;
    let mut lines = BufReader::new(file).lines();

    let mut totals = BatchStats::default();
    let mut batch: Vec<ExchangeEvent> = Vec::with_capacity(config.batch_size);
    let mut line_number = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<ExchangeEvent>(&line) {
            Ok(event) => batch.push(event),
            Err(e) => {
                // A malformed record costs itself, not the stream
                warn!("⚠️ skipping malformed event on line {}: {}", line_number, e);
            }
        }
        if batch.len() >= config.batch_size {
            let stats = processor.process_batch(std::mem::take(&mut batch)).await?;
            totals.processed += stats.processed;
            totals.failed += stats.failed;
            while let Ok(notification) = notification_receiver.try_recv() {
                info!("📨 {}", notification);
            }
        }
    }
    if !batch.is_empty() {
        let stats = processor.process_batch(batch).await?;
        totals.processed += stats.processed;
        totals.failed += stats.failed;
    }
    while let Ok(notification) = notification_receiver.try_recv() {
        info!("📨 {}", notification);
    }

    info!(
        "✅ Finished: {} events processed, {} failed",
        totals.processed, totals.failed
    );
    info!("📦 Store: {}", processor.store().stats());
    Ok(())
}
