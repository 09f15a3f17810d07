//! Data models for collected threads and their enriched representations.
//!
//! This module defines the core data structures used throughout the pipeline:
//! - [`RawItem`]: a normalized thread from a single external source
//! - [`EnrichedItem`]: a `RawItem` augmented with LLM-generated fields
//! - [`DigestDocument`]: the final per-day grouped/ranked document

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The external source a thread was collected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Hacker News (Firebase API).
    Hn,
    /// Reddit (OAuth listing API).
    Reddit,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Hn => write!(f, "hn"),
            Source::Reddit => write!(f, "reddit"),
        }
    }
}

/// A normalized thread as collected from a source, before enrichment.
///
/// Immutable once fetched; its lifetime is a single run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawItem {
    /// Which source produced this item.
    pub source: Source,
    /// The source-assigned identifier (HN item id, Reddit post id).
    pub external_id: String,
    /// The thread title as published.
    pub title: String,
    /// The outbound link, or the discussion permalink for self posts.
    pub url: String,
    /// The source's own vote score at fetch time.
    pub raw_score: i64,
    /// Comment count at fetch time.
    pub comments: i64,
    /// Publication time reported by the source.
    pub created_at: DateTime<Utc>,
    /// A plain-text snippet of the post body, when the source provides one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// A thread after LLM enrichment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnrichedItem {
    #[serde(flatten)]
    pub raw: RawItem,
    /// The title translated into the configured target language.
    pub title_translated: String,
    /// A short summary in the target language.
    pub summary: String,
    /// 2-3 short English topic tags.
    pub tags: Vec<String>,
    /// The assigned category, or `"uncategorized"` on degraded items.
    pub category: String,
    /// Importance score, always within 1..=5.
    pub ai_score: u8,
}

impl EnrichedItem {
    /// Extract the domain name (before the TLD) from the item URL, used as a
    /// compact origin marker in the rendered digest.
    /// For example: `"https://blog.example.com/post"` -> `"example"`.
    pub fn host_tag(&self) -> Option<String> {
        let parsed = url::Url::parse(&self.raw.url).ok()?;
        let host = parsed.host_str()?;
        let parts: Vec<&str> = host.split('.').collect();
        if parts.len() >= 2 {
            Some(parts[parts.len() - 2].to_string())
        } else {
            None
        }
    }
}

/// One category bucket of the digest, in final rank order.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CategoryGroup {
    pub category: String,
    pub items: Vec<EnrichedItem>,
}

/// The final per-day document: ranked items grouped by category.
///
/// Each run produces exactly one `DigestDocument`, serialized to Markdown
/// (and optionally JSON). Written once, never mutated after.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DigestDocument {
    /// The run date in `YYYY-MM-DD` format; also the output filename stem.
    pub date: String,
    /// Local wall-clock time of generation in `HH:MM:SS` format.
    pub generated_at: String,
    /// Total number of items across all groups.
    pub total: usize,
    /// Ordered category buckets.
    pub groups: Vec<CategoryGroup>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_enriched(url: &str) -> EnrichedItem {
        EnrichedItem {
            raw: RawItem {
                source: Source::Hn,
                external_id: "1".to_string(),
                title: "Test".to_string(),
                url: url.to_string(),
                raw_score: 10,
                comments: 2,
                created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
                body: None,
            },
            title_translated: "Test".to_string(),
            summary: "Summary".to_string(),
            tags: vec!["LLM".to_string()],
            category: "Research".to_string(),
            ai_score: 4,
        }
    }

    #[test]
    fn test_source_serialization_names() {
        assert_eq!(serde_json::to_string(&Source::Hn).unwrap(), "\"hn\"");
        assert_eq!(serde_json::to_string(&Source::Reddit).unwrap(), "\"reddit\"");
        assert_eq!(Source::Reddit.to_string(), "reddit");
    }

    #[test]
    fn test_enriched_item_flattens_raw_fields() {
        let json = serde_json::to_string(&sample_enriched("https://example.com/post")).unwrap();
        assert!(json.contains("\"external_id\":\"1\""));
        assert!(json.contains("\"ai_score\":4"));
        // body is None and must be omitted entirely
        assert!(!json.contains("\"body\""));
    }

    #[test]
    fn test_host_tag_subdomain() {
        let item = sample_enriched("https://blog.example.com/post");
        assert_eq!(item.host_tag(), Some("example".to_string()));
    }

    #[test]
    fn test_host_tag_plain_domain() {
        let item = sample_enriched("https://arxiv.org/abs/2501.00001");
        assert_eq!(item.host_tag(), Some("arxiv".to_string()));
    }

    #[test]
    fn test_host_tag_invalid_url() {
        let item = sample_enriched("not a url");
        assert_eq!(item.host_tag(), None);
    }

    #[test]
    fn test_digest_document_round_trip() {
        let doc = DigestDocument {
            date: "2026-08-08".to_string(),
            generated_at: "07:30:00".to_string(),
            total: 1,
            groups: vec![CategoryGroup {
                category: "Research".to_string(),
                items: vec![sample_enriched("https://example.com")],
            }],
        };

        let json = serde_json::to_string(&doc).unwrap();
        let back: DigestDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back.date, "2026-08-08");
        assert_eq!(back.groups.len(), 1);
        assert_eq!(back.groups[0].items[0].raw.external_id, "1");
    }
}
