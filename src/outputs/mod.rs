//! Output generation modules for the digest document.
//!
//! # Submodules
//!
//! - [`markdown`]: renders the [`crate::models::DigestDocument`] through the
//!   digest template into one Markdown file per run
//! - [`json`]: serializes the same document to a JSON file for API-style
//!   consumption
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! └── 2026-08-08.md
//!
//! json_output_dir/          (optional)
//! └── 2026-08-08.json
//! ```
//!
//! Filenames derive from the run date; re-running on the same day overwrites
//! that day's files.

pub mod json;
pub mod markdown;
