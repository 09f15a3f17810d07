//! Utility functions for string handling, dedup normalization, and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - String truncation for logging
//! - JSON error detection for handling LLM response truncation
//! - Title normalization for near-duplicate detection
//! - File system validation for output directories

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` characters with an ellipsis and
/// byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}…(+{} bytes)", &s[..max], s.len() - max)
    }
}

/// Detect if a serde_json error indicates truncated/incomplete JSON.
///
/// When the LLM response is cut off (e.g., due to token limits), the
/// resulting JSON will fail to parse with an EOF error. This function
/// helps identify such cases for the single re-ask.
pub fn looks_truncated(e: &serde_json::Error) -> bool {
    use serde_json::error::Category;
    matches!(e.classify(), Category::Eof)
}

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Reduce a title to a canonical form for near-duplicate detection.
///
/// Lowercases, strips everything that is not an ASCII letter or digit, and
/// collapses the gaps to single spaces, so that `"New LLM Released!"` and
/// `"new LLM released"` compare equal.
pub fn normalize_title(title: &str) -> String {
    NON_ALNUM
        .replace_all(&title.to_lowercase(), " ")
        .trim()
        .to_string()
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_normalize_title_case_and_punctuation() {
        assert_eq!(normalize_title("New LLM Released!"), "new llm released");
        assert_eq!(normalize_title("new LLM released"), "new llm released");
        assert_eq!(
            normalize_title("GPT-5: what   changed?"),
            "gpt 5 what changed"
        );
    }

    #[test]
    fn test_normalize_title_empty_and_symbols() {
        assert_eq!(normalize_title(""), "");
        assert_eq!(normalize_title("!!!"), "");
    }

    #[test]
    fn test_looks_truncated() {
        // Missing closing brace parses as EOF
        let json_eof = r#"{"field": "value"#;
        let result: Result<serde_json::Value, _> = serde_json::from_str(json_eof);
        if let Err(e) = result {
            assert!(looks_truncated(&e));
        }

        // Syntactically wrong but complete input is not "truncated"
        let json_bad = r#"{"field": nope}"#;
        let result: Result<serde_json::Value, _> = serde_json::from_str(json_bad);
        if let Err(e) = result {
            assert!(!looks_truncated(&e));
        }
    }
}
