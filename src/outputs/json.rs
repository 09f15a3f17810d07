//! JSON output generation.
//!
//! Serializes the digest document to `{json_output_dir}/{date}.json` for
//! consumption by external clients, mirroring the Markdown naming so the two
//! artifacts of a run sit side by side by date. Overwrites on same-day
//! re-runs, like the Markdown output.

use crate::models::DigestDocument;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

/// Write a [`DigestDocument`] to a date-named JSON file. Returns the written
/// path.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir, date = %doc.date))]
pub async fn write_document(
    doc: &DigestDocument,
    json_output_dir: &str,
) -> Result<String, Box<dyn Error>> {
    let json = serde_json::to_string(doc)?;

    fs::create_dir_all(json_output_dir).await?;
    let path = format!("{}/{}.json", json_output_dir.trim_end_matches('/'), doc.date);
    fs::write(&path, json).await?;
    info!(path = %path, "Wrote JSON digest");
    Ok(path)
}
