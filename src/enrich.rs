//! The enrichment contract: prompt construction and response parsing.
//!
//! Each [`RawItem`] is sent to the LLM with a fixed instruction asking for a
//! single JSON object. The contract and its failure policy:
//!
//! - API failure after retries: the item is dropped from the digest.
//! - Malformed response: the item is kept with fallback fields (original
//!   title, empty summary, `"uncategorized"`, score 3), so a bad model
//!   answer degrades one item but never aborts the run.
//! - A response that parses but carries an out-of-range score is clamped
//!   into 1..=5.

use crate::api::{ask_with_backoff, ChatClient};
use crate::config::DigestConfig;
use crate::models::{EnrichedItem, RawItem};
use crate::utils::{looks_truncated, truncate_for_log};
use itertools::Itertools;
use serde::Deserialize;
use tracing::{error, instrument, warn};

/// Category assigned when the model response cannot be parsed.
pub const FALLBACK_CATEGORY: &str = "uncategorized";
/// Score assigned when the model response cannot be parsed.
pub const FALLBACK_SCORE: u8 = 3;

/// The JSON object the model is instructed to return.
#[derive(Debug, Deserialize)]
pub struct EnrichmentFields {
    pub title_translated: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub category: String,
    pub score: i64,
}

/// Build the fixed enrichment prompt for one item.
pub fn build_prompt(item: &RawItem, cfg: &DigestConfig) -> String {
    let categories = cfg
        .categories
        .iter()
        .map(|c| format!("\"{c}\""))
        .join(", ");
    let snippet = item.body.as_deref().unwrap_or("(no body)");

    format!(
        "You are an editor for a daily AI technology digest. Analyze the \
         following discussion thread and reply with a single JSON object.\n\
         \n\
         Title: {title}\n\
         Source: {source}\n\
         Snippet: {snippet}\n\
         \n\
         Required keys:\n\
         1. \"title_translated\": the title translated into {language}.\n\
         2. \"summary\": a 50-80 character summary in {language} covering the core point.\n\
         3. \"category\": exactly one of [{categories}].\n\
         4. \"tags\": 2-3 short English tags (e.g. LLM, RAG, Agent).\n\
         5. \"score\": an integer from 1 to 5 rating how important this item is to the AI field.\n\
         \n\
         Reply with the JSON object only, without Markdown fences.",
        title = item.title,
        source = item.source,
        snippet = snippet,
        language = cfg.target_language,
        categories = categories,
    )
}

/// Strip a leading/trailing Markdown code fence, which some models emit
/// despite the instructions.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop the fence line ("```json" or bare "```"), then the closing fence
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    rest.trim().strip_suffix("```").unwrap_or(rest).trim()
}

/// Parse the model response into [`EnrichmentFields`].
pub fn parse_fields(raw: &str) -> Result<EnrichmentFields, serde_json::Error> {
    serde_json::from_str(strip_code_fences(raw))
}

/// Combine a raw item with parsed enrichment fields.
///
/// Scores outside 1..=5 are clamped; tags are deduplicated preserving order.
pub fn apply_fields(item: RawItem, fields: EnrichmentFields) -> EnrichedItem {
    let ai_score = fields.score.clamp(1, 5) as u8;
    let tags = fields.tags.into_iter().unique().collect();
    EnrichedItem {
        raw: item,
        title_translated: fields.title_translated.trim().to_string(),
        summary: fields.summary.trim().to_string(),
        tags,
        category: fields.category.trim().to_string(),
        ai_score,
    }
}

/// Fallback enrichment when the model response cannot be parsed: the item
/// survives with its original title, no summary, and a neutral score.
pub fn degrade(item: RawItem) -> EnrichedItem {
    let title_translated = item.title.clone();
    EnrichedItem {
        raw: item,
        title_translated,
        summary: String::new(),
        tags: Vec::new(),
        category: FALLBACK_CATEGORY.to_string(),
        ai_score: FALLBACK_SCORE,
    }
}

/// Enrich one item through the LLM.
///
/// Returns `None` only when the API call itself fails after retries; a
/// malformed response degrades the item instead. A response that fails to
/// parse due to truncation (EOF) usually means the model hit its token
/// limit, so that case is re-asked once before falling back.
#[instrument(level = "debug", skip_all, fields(source = %item.source, id = %item.external_id))]
pub async fn enrich_item(
    client: &ChatClient,
    item: RawItem,
    cfg: &DigestConfig,
) -> Option<EnrichedItem> {
    let prompt = build_prompt(&item, cfg);

    let response = match ask_with_backoff(client, &prompt).await {
        Ok(r) => r,
        Err(e) => {
            error!(
                source = %item.source,
                id = %item.external_id,
                error = %e,
                "API call failed; dropping item"
            );
            return None;
        }
    };

    let mut parsed = parse_fields(&response);

    // If the parse failed due to EOF (truncation), re-ask ONCE
    if let Err(ref e) = parsed {
        if looks_truncated(e) {
            warn!(
                source = %item.source,
                id = %item.external_id,
                error = %e,
                "EOF while parsing; re-asking once"
            );
            match ask_with_backoff(client, &prompt).await {
                Ok(r2) => {
                    parsed = parse_fields(&r2);
                }
                Err(e2) => {
                    warn!(
                        source = %item.source,
                        id = %item.external_id,
                        error = %e2,
                        "Re-ask failed; will fall back"
                    );
                }
            }
        }
    }

    match parsed {
        Ok(fields) => Some(apply_fields(item, fields)),
        Err(e) => {
            warn!(
                source = %item.source,
                id = %item.external_id,
                error = %e,
                response_preview = %truncate_for_log(&response, 300),
                "Model returned non-conforming JSON; keeping item with fallback fields"
            );
            Some(degrade(item))
        }
    }
}
