//! Run configuration.
//!
//! Tuning knobs (keywords, subreddits, caps, model name, category list) come
//! from an optional YAML file and carry complete defaults, so the binary runs
//! with no config file at all. Secrets are environment-only:
//!
//! | Variable | Required | Purpose |
//! |----------|----------|---------|
//! | `OPENAI_API_KEY` | yes | LLM API authentication |
//! | `OPENAI_BASE_URL` | no | OpenAI-compatible endpoint override |
//! | `OPENAI_MODEL` | no | Model name override |
//! | `REDDIT_CLIENT_ID` | no | Reddit OAuth app id; source is skipped without it |
//! | `REDDIT_CLIENT_SECRET` | no | Reddit OAuth app secret |
//! | `REDDIT_USER_AGENT` | no | Descriptive UA required by the Reddit API |

use serde::Deserialize;
use std::env;
use std::error::Error;
use tracing::info;

/// Tunable pipeline settings, deserialized from a YAML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DigestConfig {
    /// Case-insensitive substrings an item's title or body must contain.
    pub keywords: Vec<String>,
    /// Subreddits polled for their daily top posts.
    pub subreddits: Vec<String>,
    /// How far down the HN top-stories list to scan.
    pub hn_scan_depth: usize,
    /// Cap on HN items kept after filtering.
    pub hn_max_items: usize,
    /// Posts requested per subreddit listing.
    pub reddit_per_subreddit: usize,
    /// Cap on Reddit items kept after filtering.
    pub reddit_max_items: usize,
    /// Concurrent in-flight enrichment requests.
    pub enrich_parallelism: usize,
    /// Language the title and summary are produced in.
    pub target_language: String,
    /// Categories the model picks from; also the digest section order.
    pub categories: Vec<String>,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            keywords: [
                "AI",
                "LLM",
                "GPT",
                "Transformer",
                "Diffusion",
                "Generative",
                "Machine Learning",
                "Neural",
                "DeepMind",
                "OpenAI",
                "Anthropic",
                "Llama",
                "Mistral",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            subreddits: ["MachineLearning", "LocalLLaMA", "singularity", "artificial"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            hn_scan_depth: 200,
            hn_max_items: 30,
            reddit_per_subreddit: 5,
            reddit_max_items: 20,
            enrich_parallelism: 5,
            target_language: "Simplified Chinese".to_string(),
            categories: [
                "🚀 Model Releases",
                "🛠️ Tools & Apps",
                "🔬 Research",
                "💼 Industry",
                "📱 Social Media",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Load the pipeline config from `path`, or defaults when no path is given.
///
/// A config file that exists but does not parse is a setup error and aborts
/// the run.
pub fn load(path: Option<&str>) -> Result<DigestConfig, Box<dyn Error>> {
    match path {
        Some(p) => {
            let text = std::fs::read_to_string(p)
                .map_err(|e| format!("cannot read config file {p}: {e}"))?;
            let cfg: DigestConfig =
                serde_yaml::from_str(&text).map_err(|e| format!("invalid config file {p}: {e}"))?;
            info!(path = p, "Loaded configuration");
            Ok(cfg)
        }
        None => {
            info!("No config file given; using built-in defaults");
            Ok(DigestConfig::default())
        }
    }
}

/// LLM endpoint settings, environment-only.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl LlmConfig {
    /// Read LLM settings from the environment. A missing `OPENAI_API_KEY`
    /// is fatal; everything else has a default.
    pub fn from_env() -> Result<Self, Box<dyn Error>> {
        let api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| "OPENAI_API_KEY is not set; cannot enrich items")?;
        let base_url = env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let model = env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());
        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }
}

/// Reddit OAuth application credentials.
#[derive(Debug, Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

impl RedditCredentials {
    /// Read Reddit credentials from the environment. Returns `None` when the
    /// app id or secret is absent, in which case the Reddit source is skipped.
    pub fn from_env() -> Option<Self> {
        let client_id = env::var("REDDIT_CLIENT_ID").ok()?;
        let client_secret = env::var("REDDIT_CLIENT_SECRET").ok()?;
        let user_agent = env::var("REDDIT_USER_AGENT")
            .unwrap_or_else(|_| "rust:ai_news_digest:v0.1 (batch digest job)".to_string());
        Some(Self {
            client_id,
            client_secret,
            user_agent,
        })
    }
}
