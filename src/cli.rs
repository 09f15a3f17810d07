//! Command-line interface definitions for the AI news digest job.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! The job is meant to run from a scheduler, so everything has a default or
//! an environment fallback; API credentials are environment-only (see
//! [`crate::config`]).

use clap::Parser;

/// Command-line arguments for the digest job.
///
/// # Examples
///
/// ```sh
/// # Defaults: markdown into ./news, built-in config
/// ai_news_digest
///
/// # Explicit output directories and a config file
/// ai_news_digest -o ./news -j ./api -c ./digest.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for the Markdown digest
    #[arg(short, long, env = "DIGEST_OUTPUT_DIR", default_value = "./news")]
    pub output_dir: String,

    /// Optional output directory for the JSON digest document
    #[arg(short, long, env = "DIGEST_JSON_OUTPUT_DIR")]
    pub json_output_dir: Option<String>,

    /// Optional path to a digest.yaml configuration file
    #[arg(short, long, env = "DIGEST_CONFIG")]
    pub config: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["ai_news_digest"]);
        assert_eq!(cli.output_dir, "./news");
        assert!(cli.json_output_dir.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_long_flags() {
        let cli = Cli::parse_from([
            "ai_news_digest",
            "--output-dir",
            "./out",
            "--json-output-dir",
            "./api",
            "--config",
            "./digest.yaml",
        ]);

        assert_eq!(cli.output_dir, "./out");
        assert_eq!(cli.json_output_dir.as_deref(), Some("./api"));
        assert_eq!(cli.config.as_deref(), Some("./digest.yaml"));
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["ai_news_digest", "-o", "/tmp/news", "-j", "/tmp/api"]);
        assert_eq!(cli.output_dir, "/tmp/news");
        assert_eq!(cli.json_output_dir.as_deref(), Some("/tmp/api"));
    }
}
