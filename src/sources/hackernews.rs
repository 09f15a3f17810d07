//! Hacker News fetcher.
//!
//! Uses the public [Firebase API](https://github.com/HackerNews/API): one
//! request for the top-story id list, then one request per story, issued
//! concurrently. Self posts carry an HTML `text` body that is flattened to a
//! plain-text snippet before keyword matching.

use crate::config::DigestConfig;
use crate::models::{RawItem, Source};
use crate::sources::matches_keywords;
use chrono::DateTime;
use futures::stream::{self, StreamExt};
use scraper::Html;
use serde::Deserialize;
use std::error::Error;
use tracing::{debug, info, instrument, warn};

const API_BASE: &str = "https://hacker-news.firebaseio.com/v0";
const FETCH_CONCURRENCY: usize = 10;
const SNIPPET_CHARS: usize = 500;

/// A story as returned by `item/{id}.json`. Fields the API omits on dead or
/// job items are optional.
#[derive(Debug, Deserialize)]
struct HnStory {
    id: u64,
    title: Option<String>,
    url: Option<String>,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    descendants: i64,
    #[serde(default)]
    time: i64,
    text: Option<String>,
}

/// Fetch the top-story id list, capped at the configured scan depth.
#[instrument(level = "info", skip_all)]
pub async fn index_stories(
    http: &reqwest::Client,
    scan_depth: usize,
) -> Result<Vec<u64>, Box<dyn Error>> {
    let ids: Vec<u64> = http
        .get(format!("{API_BASE}/topstories.json"))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let ids: Vec<u64> = ids.into_iter().take(scan_depth).collect();
    info!(count = ids.len(), "Indexed HN top story ids");
    Ok(ids)
}

/// Fetch, filter, and normalize Hacker News items.
///
/// Stories are downloaded concurrently but kept in front-page order, so the
/// per-source cap favors higher-ranked stories the way a sequential scan
/// would.
#[instrument(level = "info", skip_all)]
pub async fn fetch_items(
    http: &reqwest::Client,
    cfg: &DigestConfig,
) -> Result<Vec<RawItem>, Box<dyn Error>> {
    let ids = index_stories(http, cfg.hn_scan_depth).await?;

    let stories: Vec<HnStory> = stream::iter(ids)
        .map(|id| fetch_story(http, id))
        .buffered(FETCH_CONCURRENCY)
        .filter_map(|opt| std::future::ready(opt))
        .collect()
        .await;
    debug!(count = stories.len(), "Fetched HN stories");

    Ok(select_items(stories, cfg))
}

/// Fetch a single story. Failures and `null` payloads (dead ids) are logged
/// and skipped so one bad item never sinks the batch.
async fn fetch_story(http: &reqwest::Client, id: u64) -> Option<HnStory> {
    let url = format!("{API_BASE}/item/{id}.json");
    let resp = match http.get(&url).send().await {
        Ok(r) => r,
        Err(e) => {
            warn!(id, error = %e, "HN item fetch failed");
            return None;
        }
    };
    match resp.json::<Option<HnStory>>().await {
        Ok(story) => story,
        Err(e) => {
            warn!(id, error = %e, "HN item decode failed");
            None
        }
    }
}

/// Keyword-filter and cap fetched stories, mapping them to [`RawItem`].
fn select_items(stories: Vec<HnStory>, cfg: &DigestConfig) -> Vec<RawItem> {
    stories
        .into_iter()
        .filter_map(story_to_item)
        .filter(|item| matches_keywords(&cfg.keywords, &item.title, item.body.as_deref()))
        .take(cfg.hn_max_items)
        .collect()
}

/// Map one story to a [`RawItem`]; stories without a title are dropped.
fn story_to_item(story: HnStory) -> Option<RawItem> {
    let title = story.title?;
    let url = match story.url {
        Some(u) if !u.is_empty() => u,
        _ => format!("https://news.ycombinator.com/item?id={}", story.id),
    };
    let body = story
        .text
        .as_deref()
        .map(flatten_html)
        .filter(|t| !t.is_empty())
        .map(|t| t.chars().take(SNIPPET_CHARS).collect());

    Some(RawItem {
        source: Source::Hn,
        external_id: story.id.to_string(),
        title,
        url,
        raw_score: story.score,
        comments: story.descendants,
        created_at: DateTime::from_timestamp(story.time, 0).unwrap_or_default(),
        body,
    })
}

/// Flatten an HTML fragment (the `text` field of self posts) to plain text.
fn flatten_html(html: &str) -> String {
    Html::parse_fragment(html)
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(id: u64, title: Option<&str>, url: Option<&str>) -> HnStory {
        HnStory {
            id,
            title: title.map(|t| t.to_string()),
            url: url.map(|u| u.to_string()),
            score: 42,
            descendants: 7,
            time: 1_700_000_000,
            text: None,
        }
    }

    #[test]
    fn test_story_json_decodes() {
        let json = r#"{
            "by": "someone",
            "descendants": 71,
            "id": 8863,
            "kids": [8952, 9224],
            "score": 111,
            "time": 1175714200,
            "title": "My YC app: Dropbox - Throw away your USB drive",
            "type": "story",
            "url": "http://www.getdropbox.com/u/2/screencast.html"
        }"#;
        let story: HnStory = serde_json::from_str(json).unwrap();
        assert_eq!(story.id, 8863);
        assert_eq!(story.score, 111);
        assert_eq!(story.descendants, 71);
    }

    #[test]
    fn test_null_item_decodes_to_none() {
        let story: Option<HnStory> = serde_json::from_str("null").unwrap();
        assert!(story.is_none());
    }

    #[test]
    fn test_story_without_title_is_dropped() {
        assert!(story_to_item(story(1, None, Some("https://example.com"))).is_none());
    }

    #[test]
    fn test_story_without_url_uses_discussion_permalink() {
        let item = story_to_item(story(8863, Some("Ask HN: LLM evals?"), None)).unwrap();
        assert_eq!(item.url, "https://news.ycombinator.com/item?id=8863");
        assert_eq!(item.source, Source::Hn);
        assert_eq!(item.external_id, "8863");
    }

    #[test]
    fn test_flatten_html_strips_tags_and_entities() {
        let text = flatten_html("<p>Fine-tuning a 7B model</p><p>costs &lt; $100 now</p>");
        assert!(text.contains("Fine-tuning a 7B model"));
        assert!(text.contains("costs < $100 now"));
        assert!(!text.contains('<') || text.contains("< $100"));
    }

    #[test]
    fn test_select_items_filters_keywords_and_caps() {
        let mut cfg = DigestConfig {
            keywords: vec!["LLM".to_string()],
            hn_max_items: 2,
            ..DigestConfig::default()
        };

        let stories = vec![
            story(1, Some("New LLM released"), Some("https://a.example")),
            story(2, Some("Cooking tips"), Some("https://b.example")),
            story(3, Some("LLM benchmarks"), Some("https://c.example")),
            story(4, Some("Another LLM thing"), Some("https://d.example")),
        ];
        let items = select_items(stories, &cfg);
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.title.contains("LLM")));

        // keyword match via the body snippet
        cfg.hn_max_items = 30;
        let mut self_post = story(5, Some("Show HN: my side project"), None);
        self_post.text = Some("<p>An agent built on an LLM</p>".to_string());
        let items = select_items(vec![self_post], &cfg);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].body.as_deref(), Some("An agent built on an LLM"));
    }
}
