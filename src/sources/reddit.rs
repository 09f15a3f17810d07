//! Reddit fetcher.
//!
//! Authenticates with an OAuth2 `client_credentials` grant, then pulls the
//! daily top listing of each configured subreddit. Stickied posts are
//! skipped; the remainder is keyword-filtered and capped. Reddit requires a
//! descriptive User-Agent on every request, so the configured UA is attached
//! explicitly rather than relying on the shared client default.

use crate::config::{DigestConfig, RedditCredentials};
use crate::models::{RawItem, Source};
use crate::sources::matches_keywords;
use chrono::DateTime;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use std::error::Error;
use tracing::{debug, info, instrument, warn};

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const API_BASE: &str = "https://oauth.reddit.com";
const SNIPPET_CHARS: usize = 500;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: RedditPost,
}

/// The subset of a Reddit submission this pipeline reads.
#[derive(Debug, Deserialize)]
struct RedditPost {
    id: String,
    title: String,
    #[serde(default)]
    url: Option<String>,
    permalink: String,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    num_comments: i64,
    #[serde(default)]
    created_utc: f64,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    stickied: bool,
}

/// Exchange app credentials for a bearer token.
async fn access_token(
    http: &reqwest::Client,
    creds: &RedditCredentials,
) -> Result<String, Box<dyn Error>> {
    let resp = http
        .post(TOKEN_URL)
        .basic_auth(&creds.client_id, Some(&creds.client_secret))
        .header(USER_AGENT, &creds.user_agent)
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await?
        .error_for_status()?;
    let token: TokenResponse = resp.json().await?;
    Ok(token.access_token)
}

/// Fetch, filter, and normalize Reddit items.
///
/// A token failure aborts the source (the caller recovers by continuing
/// without Reddit); a failing subreddit listing is logged and skipped.
#[instrument(level = "info", skip_all)]
pub async fn fetch_items(
    http: &reqwest::Client,
    cfg: &DigestConfig,
    creds: &RedditCredentials,
) -> Result<Vec<RawItem>, Box<dyn Error>> {
    let token = access_token(http, creds).await?;
    let limit = cfg.reddit_per_subreddit.to_string();

    let mut posts: Vec<RedditPost> = Vec::new();
    for sub in &cfg.subreddits {
        let url = format!("{API_BASE}/r/{sub}/top");
        let resp = http
            .get(&url)
            .query(&[("t", "day"), ("limit", limit.as_str())])
            .bearer_auth(&token)
            .header(USER_AGENT, &creds.user_agent)
            .send()
            .await;

        let listing = match resp {
            Ok(r) => match r.error_for_status() {
                Ok(r) => r.json::<Listing>().await,
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };

        match listing {
            Ok(listing) => {
                debug!(
                    subreddit = %sub,
                    count = listing.data.children.len(),
                    "Fetched subreddit listing"
                );
                posts.extend(listing.data.children.into_iter().map(|c| c.data));
            }
            Err(e) => warn!(subreddit = %sub, error = %e, "Subreddit listing failed; skipping"),
        }
    }

    let items = select_items(posts, cfg);
    info!(count = items.len(), "Filtered Reddit posts");
    Ok(items)
}

/// Drop stickied posts, keyword-filter, cap, and map to [`RawItem`].
fn select_items(posts: Vec<RedditPost>, cfg: &DigestConfig) -> Vec<RawItem> {
    posts
        .into_iter()
        .filter(|p| !p.stickied)
        .map(post_to_item)
        .filter(|item| matches_keywords(&cfg.keywords, &item.title, item.body.as_deref()))
        .take(cfg.reddit_max_items)
        .collect()
}

fn post_to_item(post: RedditPost) -> RawItem {
    let url = match post.url {
        Some(u) if !u.is_empty() => u,
        _ => format!("https://www.reddit.com{}", post.permalink),
    };
    let body = {
        let trimmed = post.selftext.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.chars().take(SNIPPET_CHARS).collect())
        }
    };

    RawItem {
        source: Source::Reddit,
        external_id: post.id,
        title: post.title,
        url,
        raw_score: post.score,
        comments: post.num_comments,
        created_at: DateTime::from_timestamp(post.created_utc as i64, 0).unwrap_or_default(),
        body,
    }
}
