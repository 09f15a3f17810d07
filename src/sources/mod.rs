//! Source fetchers for the two discussion sites.
//!
//! Each fetcher follows a consistent pattern: query the source's listing
//! endpoint, filter by the configured keyword set, cap the result count, and
//! map into [`RawItem`].
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | Hacker News | [`hackernews`] | Firebase REST API | Top stories scan, no credentials |
//! | Reddit | [`reddit`] | OAuth listing API | Skipped when credentials are absent |
//!
//! # Error Policy
//!
//! A failing source is logged and contributes zero items; the run continues
//! with whatever the remaining sources produced.

pub mod hackernews;
pub mod reddit;

use crate::config::{DigestConfig, RedditCredentials};
use crate::models::RawItem;
use tracing::{info, warn};

/// Case-insensitive substring match of any configured keyword against the
/// item title or body. Items matching no keyword are excluded.
pub fn matches_keywords(keywords: &[String], title: &str, body: Option<&str>) -> bool {
    let title = title.to_lowercase();
    let body = body.map(|b| b.to_lowercase());
    keywords.iter().any(|k| {
        let k = k.to_lowercase();
        title.contains(&k) || body.as_deref().is_some_and(|b| b.contains(&k))
    })
}

/// Collect raw items from every configured source.
///
/// Per-source failures are recovered: the source yields nothing and the run
/// continues. Reddit is skipped entirely when no credentials are configured.
pub async fn collect_all(
    http: &reqwest::Client,
    cfg: &DigestConfig,
    reddit_creds: Option<&RedditCredentials>,
) -> Vec<RawItem> {
    let mut items = Vec::new();

    match hackernews::fetch_items(http, cfg).await {
        Ok(hn) => {
            info!(count = hn.len(), "Collected Hacker News items");
            items.extend(hn);
        }
        Err(e) => {
            warn!(source = "hn", error = %e, "Hacker News fetch failed; continuing without it")
        }
    }

    match reddit_creds {
        Some(creds) => match reddit::fetch_items(http, cfg, creds).await {
            Ok(rd) => {
                info!(count = rd.len(), "Collected Reddit items");
                items.extend(rd);
            }
            Err(e) => {
                warn!(source = "reddit", error = %e, "Reddit fetch failed; continuing without it")
            }
        },
        None => info!("Skipping Reddit (credentials not configured)"),
    }

    items
}
