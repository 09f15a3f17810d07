//! Markdown rendering for the daily digest.
//!
//! The document frame is a fixed template with `{{date}}`, `{{generated_at}}`,
//! `{{total}}`, and `{{body}}` placeholders; the body is built per category
//! group in rank order. Rendering is a pure function of the
//! [`DigestDocument`], so the same document always produces byte-identical
//! output and a same-day re-run simply overwrites the file.

use crate::models::DigestDocument;
use itertools::Itertools;
use std::error::Error;
use std::fmt::Write as _;
use tokio::fs;
use tracing::{info, instrument};

const DIGEST_TEMPLATE: &str = "\
# 🤖 AI Daily Digest — {{date}}

> {{total}} item(s) · generated at {{generated_at}} from Hacker News and Reddit

{{body}}
---

*Generated automatically by ai_news_digest.*
";

fn stars(score: u8) -> String {
    "⭐".repeat(score as usize)
}

fn render_body(doc: &DigestDocument) -> String {
    let mut md = String::new();
    for group in &doc.groups {
        writeln!(md, "## {} ({})", group.category, group.items.len()).unwrap();
        writeln!(md).unwrap();
        for item in &group.items {
            writeln!(md, "### [{}]({})", item.title_translated, item.raw.url).unwrap();
            writeln!(md).unwrap();
            if !item.summary.is_empty() {
                writeln!(md, "{}", item.summary).unwrap();
                writeln!(md).unwrap();
            }

            let host = item
                .host_tag()
                .map(|h| format!(" · `{h}`"))
                .unwrap_or_default();
            writeln!(
                md,
                "{} · {}{} · 🔼 {} · 💬 {}",
                stars(item.ai_score),
                item.raw.source,
                host,
                item.raw.raw_score,
                item.raw.comments
            )
            .unwrap();

            if !item.tags.is_empty() {
                let tags = item.tags.iter().map(|t| format!("`{t}`")).join(" ");
                writeln!(md, "Tags: {tags}").unwrap();
            }
            if item.title_translated != item.raw.title {
                writeln!(md, "> {}", item.raw.title).unwrap();
            }
            writeln!(md).unwrap();
        }
    }
    md
}

/// Render the full Markdown document from the digest.
pub fn render_digest(doc: &DigestDocument) -> String {
    DIGEST_TEMPLATE
        .replace("{{date}}", &doc.date)
        .replace("{{generated_at}}", &doc.generated_at)
        .replace("{{total}}", &doc.total.to_string())
        .replace("{{body}}", &render_body(doc))
}

/// Render and write the digest to `{output_dir}/{date}.md`, overwriting any
/// existing file for that date. Returns the written path.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir, date = %doc.date))]
pub async fn write_digest(
    doc: &DigestDocument,
    output_dir: &str,
) -> Result<String, Box<dyn Error>> {
    let md = render_digest(doc);
    fs::create_dir_all(output_dir).await?;
    let path = format!("{}/{}.md", output_dir.trim_end_matches('/'), doc.date);
    fs::write(&path, md).await?;
    info!(path = %path, "Wrote Markdown digest");
    Ok(path)
}
