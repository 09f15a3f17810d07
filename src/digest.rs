//! Aggregation and ranking: dedup, sort, and group enriched items.
//!
//! Everything in this module is a pure function of its input list; the only
//! state is the run-scoped category order from the config.
//!
//! Ranked order is ai_score descending, ties broken by recency. Duplicates
//! are removed by `(source, external_id)` and then by normalized title, so a
//! thread cross-posted to both sources appears once; because dedup runs
//! after sorting, the highest-ranked copy survives.

use crate::enrich::FALLBACK_CATEGORY;
use crate::models::{CategoryGroup, DigestDocument, EnrichedItem};
use crate::utils::normalize_title;
use itertools::Itertools;

/// Sort by score desc then recency desc, then drop duplicates.
pub fn rank(items: Vec<EnrichedItem>) -> Vec<EnrichedItem> {
    let mut items = items;
    items.sort_by(|a, b| {
        b.ai_score
            .cmp(&a.ai_score)
            .then_with(|| b.raw.created_at.cmp(&a.raw.created_at))
    });
    items
        .into_iter()
        .unique_by(|i| (i.raw.source, i.raw.external_id.clone()))
        .unique_by(|i| normalize_title(&i.raw.title))
        .collect()
}

/// Group ranked items into ordered category buckets.
///
/// Bucket order: configured categories first (in config order), then
/// model-invented categories in first-seen rank order, `uncategorized`
/// always last. Empty buckets are omitted. Item order inside a bucket
/// preserves the global rank.
pub fn group_by_category(ranked: Vec<EnrichedItem>, category_order: &[String]) -> Vec<CategoryGroup> {
    let mut configured: Vec<CategoryGroup> = category_order
        .iter()
        .map(|c| CategoryGroup {
            category: c.clone(),
            items: Vec::new(),
        })
        .collect();
    let mut extra: Vec<CategoryGroup> = Vec::new();
    let mut uncategorized: Vec<EnrichedItem> = Vec::new();

    for item in ranked {
        if let Some(bucket) = configured.iter_mut().find(|g| g.category == item.category) {
            bucket.items.push(item);
        } else if item.category == FALLBACK_CATEGORY {
            uncategorized.push(item);
        } else if let Some(bucket) = extra.iter_mut().find(|g| g.category == item.category) {
            bucket.items.push(item);
        } else {
            extra.push(CategoryGroup {
                category: item.category.clone(),
                items: vec![item],
            });
        }
    }

    let mut groups: Vec<CategoryGroup> = configured
        .into_iter()
        .chain(extra)
        .filter(|g| !g.items.is_empty())
        .collect();
    if !uncategorized.is_empty() {
        groups.push(CategoryGroup {
            category: FALLBACK_CATEGORY.to_string(),
            items: uncategorized,
        });
    }
    groups
}

/// Assemble the final per-day document from all enriched items.
pub fn build_digest(
    date: String,
    generated_at: String,
    items: Vec<EnrichedItem>,
    category_order: &[String],
) -> DigestDocument {
    let ranked = rank(items);
    let total = ranked.len();
    let groups = group_by_category(ranked, category_order);
    DigestDocument {
        date,
        generated_at,
        total,
        groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RawItem, Source};
    use chrono::DateTime;

    fn item(
        source: Source,
        id: &str,
        title: &str,
        category: &str,
        score: u8,
        created: i64,
    ) -> EnrichedItem {
        EnrichedItem {
            raw: RawItem {
                source,
                external_id: id.to_string(),
                title: title.to_string(),
                url: format!("https://example.com/{id}"),
                raw_score: 1,
                comments: 0,
                created_at: DateTime::from_timestamp(created, 0).unwrap(),
                body: None,
            },
            title_translated: title.to_string(),
            summary: String::new(),
            tags: Vec::new(),
            category: category.to_string(),
            ai_score: score,
        }
    }

    #[test]
    fn test_dedup_by_source_and_external_id() {
        let items = vec![
            item(Source::Hn, "1", "First take", "A", 4, 100),
            item(Source::Hn, "1", "Second take", "A", 2, 200),
        ];
        let ranked = rank(items);
        assert_eq!(ranked.len(), 1);
        // the higher-scored copy survives
        assert_eq!(ranked[0].ai_score, 4);
    }

    #[test]
    fn test_same_external_id_across_sources_is_not_a_duplicate() {
        let items = vec![
            item(Source::Hn, "1", "HN thread", "A", 4, 100),
            item(Source::Reddit, "1", "Reddit thread", "A", 4, 100),
        ];
        assert_eq!(rank(items).len(), 2);
    }

    #[test]
    fn test_dedup_by_near_identical_title() {
        let items = vec![
            item(Source::Hn, "1", "New LLM Released!", "A", 5, 100),
            item(Source::Reddit, "2", "new LLM released", "A", 3, 200),
        ];
        let ranked = rank(items);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].raw.source, Source::Hn);
    }

    #[test]
    fn test_sort_order_score_then_recency() {
        let items = vec![
            item(Source::Hn, "1", "a", "A", 3, 300),
            item(Source::Hn, "2", "b", "A", 5, 100),
            item(Source::Hn, "3", "c", "A", 3, 500),
            item(Source::Hn, "4", "d", "A", 1, 900),
        ];
        let ranked = rank(items);
        for pair in ranked.windows(2) {
            assert!(pair[0].ai_score >= pair[1].ai_score);
            if pair[0].ai_score == pair[1].ai_score {
                assert!(pair[0].raw.created_at >= pair[1].raw.created_at);
            }
        }
        assert_eq!(ranked[0].raw.external_id, "2");
        assert_eq!(ranked[1].raw.external_id, "3");
        assert_eq!(ranked[2].raw.external_id, "1");
    }

    #[test]
    fn test_group_order_configured_then_extra_then_uncategorized() {
        let order = vec!["A".to_string(), "B".to_string()];
        let items = vec![
            item(Source::Hn, "1", "one", "uncategorized", 5, 100),
            item(Source::Hn, "2", "two", "Surprise", 4, 100),
            item(Source::Hn, "3", "three", "B", 3, 100),
            item(Source::Hn, "4", "four", "A", 2, 100),
        ];
        let groups = group_by_category(rank(items), &order);
        let names: Vec<&str> = groups.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "Surprise", "uncategorized"]);
    }

    #[test]
    fn test_empty_configured_buckets_are_omitted() {
        let order = vec!["A".to_string(), "B".to_string()];
        let items = vec![item(Source::Hn, "1", "one", "B", 5, 100)];
        let groups = group_by_category(rank(items), &order);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].category, "B");
    }

    #[test]
    fn test_build_digest_counts_after_dedup() {
        let order = vec!["A".to_string()];
        let items = vec![
            item(Source::Hn, "1", "same story", "A", 5, 100),
            item(Source::Hn, "1", "same story", "A", 5, 100),
            item(Source::Reddit, "9", "other story", "A", 2, 100),
        ];
        let doc = build_digest("2026-08-08".to_string(), "07:00:00".to_string(), items, &order);
        assert_eq!(doc.total, 2);
        assert_eq!(doc.groups.len(), 1);
        assert_eq!(doc.groups[0].items.len(), 2);
    }

    #[test]
    fn test_group_items_preserve_rank_order() {
        let order = vec!["A".to_string()];
        let items = vec![
            item(Source::Hn, "1", "low", "A", 1, 100),
            item(Source::Hn, "2", "high", "A", 5, 100),
            item(Source::Hn, "3", "mid", "A", 3, 100),
        ];
        let doc = build_digest("d".to_string(), "t".to_string(), items, &order);
        let scores: Vec<u8> = doc.groups[0].items.iter().map(|i| i.ai_score).collect();
        assert_eq!(scores, vec![5, 3, 1]);
    }
}
