//! # AI News Digest
//!
//! A batch pipeline that collects AI/LLM-related discussion threads from
//! Hacker News and Reddit, enriches each one through an OpenAI-compatible
//! LLM API (translated title, short summary, tags, category, 1-5 score),
//! and publishes a ranked daily Markdown digest.
//!
//! ## Usage
//!
//! ```sh
//! OPENAI_API_KEY=... ai_news_digest -o ./news
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Collection**: fetch and keyword-filter threads from each source
//! 2. **Enrichment**: send each item to the LLM (parallel, bounded)
//! 3. **Aggregation**: dedup, rank by score/recency, group by category
//! 4. **Output**: write one Markdown digest per run, plus optional JSON
//!
//! Per-item and per-source failures are logged and recovered; only setup
//! errors (missing API key, unwritable output directory) and the final
//! Markdown write abort the run with a nonzero exit.

use chrono::Local;
use clap::Parser;
use futures::stream::{self, StreamExt};
use std::error::Error;
use std::time::Duration;
use tracing::{debug, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod api;
mod cli;
mod config;
mod digest;
mod enrich;
mod models;
mod outputs;
mod sources;
mod utils;

use cli::Cli;
use models::EnrichedItem;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("ai_news_digest starting up");

    dotenvy::dotenv().ok();

    // Parse CLI and load configuration; a missing API key is fatal here,
    // before any network traffic.
    let args = Cli::parse();
    debug!(?args.output_dir, ?args.json_output_dir, ?args.config, "Parsed CLI arguments");

    let cfg = config::load(args.config.as_deref())?;
    let llm = config::LlmConfig::from_env()?;
    let reddit_creds = config::RedditCredentials::from_env();
    info!(
        model = %llm.model,
        keywords = cfg.keywords.len(),
        subreddits = cfg.subreddits.len(),
        reddit_configured = reddit_creds.is_some(),
        "Configuration loaded"
    );

    // Early check: ensure output dirs are writable
    ensure_writable_dir(&args.output_dir).await?;
    if let Some(dir) = &args.json_output_dir {
        ensure_writable_dir(dir).await?;
    }

    // ---- Collect raw items from all sources ----
    let http = reqwest::Client::builder()
        .user_agent(concat!("ai_news_digest/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(15))
        .build()?;

    let raw_items = sources::collect_all(&http, &cfg, reddit_creds.as_ref()).await;
    info!(count = raw_items.len(), "Total raw items collected");

    if raw_items.is_empty() {
        info!("No items collected; nothing to publish");
        return Ok(());
    }

    // ---- Enrich items in parallel ----
    let chat = api::ChatClient::new(&llm)?;
    let total_items = raw_items.len();
    info!(
        parallelism = cfg.enrich_parallelism,
        total = total_items,
        "Starting parallel enrichment"
    );

    let results: Vec<Option<EnrichedItem>> = stream::iter(raw_items)
        .map(|item| enrich::enrich_item(&chat, item, &cfg))
        .buffer_unordered(cfg.enrich_parallelism.max(1))
        .collect()
        .await;
    let enriched: Vec<EnrichedItem> = results.into_iter().flatten().collect();

    let dropped = total_items - enriched.len();
    info!(
        total = total_items,
        enriched = enriched.len(),
        dropped,
        "Completed enrichment"
    );

    // ---- Aggregate and render ----
    let now = Local::now();
    let doc = digest::build_digest(
        now.date_naive().to_string(),
        now.format("%H:%M:%S").to_string(),
        enriched,
        &cfg.categories,
    );
    info!(
        date = %doc.date,
        total = doc.total,
        groups = doc.groups.len(),
        "Digest assembled"
    );

    let md_path = outputs::markdown::write_digest(&doc, &args.output_dir).await?;
    info!(path = %md_path, "Digest published");

    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = outputs::json::write_document(&doc, dir).await {
            tracing::error!(error = %e, "Failed to write JSON digest");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
