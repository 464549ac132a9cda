//! Command-line interface definitions.
//!
//! Uses `clap` derive macros for declarative argument parsing, plus target
//! collection from arguments, list files, and stdin.

use crate::error::{CliError, CliResult};
use crate::probe::HashAlg;
use clap::Parser;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

/// A fast, concurrent HTTP/HTTPS probing tool.
///
/// Sounder takes hostnames or URLs from arguments, a list file, or stdin,
/// determines which are live, and reports the selected signals for each.
#[derive(Parser, Debug)]
#[command(name = "sounder")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A fast HTTP/HTTPS probing tool", long_about = None)]
pub struct Args {
    /// Target hostnames or URLs to probe
    #[arg(short = 'u', long = "target", value_name = "TARGET", num_args = 1..)]
    pub target: Vec<String>,

    /// File containing newline-delimited targets
    #[arg(short = 'l', long, value_name = "FILE")]
    pub list: Option<PathBuf>,

    /// Ports to expand schemeless targets over
    #[arg(short = 'p', long, value_name = "PORT", num_args = 1.., default_values = ["80", "443"])]
    pub ports: Vec<String>,

    /// Display status code
    #[arg(long)]
    pub status_code: bool,

    /// Display content length
    #[arg(long)]
    pub content_length: bool,

    /// Display content type
    #[arg(long)]
    pub content_type: bool,

    /// Display page title
    #[arg(long)]
    pub title: bool,

    /// Display server header
    #[arg(long)]
    pub server: bool,

    /// Display response time
    #[arg(long)]
    pub response_time: bool,

    /// Resolve and display the host IP
    #[arg(long)]
    pub ip: bool,

    /// Hash the response body with the given algorithm(s)
    #[arg(long = "hash", value_enum, value_name = "ALG", num_args = 1..)]
    pub hash: Vec<HashAlg>,

    /// Fetch /favicon.ico and display its MurmurHash3 fingerprint
    #[arg(long)]
    pub favicon: bool,

    /// Display the line count of the response body
    #[arg(long)]
    pub line_count: bool,

    /// Display the word count of the response body
    #[arg(long)]
    pub word_count: bool,

    /// Display the redirect location
    #[arg(long)]
    pub location: bool,

    /// Custom header as "Name: Value" (repeatable)
    #[arg(short = 'H', long = "header", value_name = "HEADER")]
    pub header: Vec<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    pub timeout: u64,

    /// Proxy URL for both HTTP and HTTPS traffic
    #[arg(long, value_name = "URL")]
    pub proxy: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long)]
    pub insecure: bool,

    /// Follow HTTP redirects
    #[arg(long)]
    pub follow_redirects: bool,

    /// Maximum redirects to follow
    #[arg(long, value_name = "N", default_value_t = 10)]
    pub max_redirects: usize,

    /// Custom User-Agent string
    #[arg(long, value_name = "UA")]
    pub user_agent: Option<String>,

    /// Maximum number of concurrent probes
    #[arg(short = 'c', long, value_name = "N", default_value_t = 50)]
    pub concurrency: usize,

    /// Rate limit in completed probes per second
    #[arg(short = 'r', long, value_name = "RPS")]
    pub rate_limit: Option<u32>,

    /// Fixed delay between probes in seconds
    #[arg(long, value_name = "SECS", default_value_t = 0.0)]
    pub delay: f64,

    /// Write results to a file instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Emit one JSON object per result
    #[arg(short = 'j', long, conflicts_with = "csv")]
    pub json: bool,

    /// Emit CSV
    #[arg(long)]
    pub csv: bool,

    /// Include failed probes in the output
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Silent mode (no banner or progress)
    #[arg(short = 's', long)]
    pub silent: bool,
}

/// Collect raw targets in priority order: explicit arguments and the list
/// file first, stdin as a fallback only when neither produced anything and
/// stdin is piped.
pub fn gather_targets(args: &Args) -> CliResult<Vec<String>> {
    let mut targets: Vec<String> = args
        .target
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    if let Some(path) = &args.list {
        let content = std::fs::read_to_string(path).map_err(|e| CliError::TargetList {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        targets.extend(parse_target_lines(&content));
    }

    if targets.is_empty() && !io::stdin().is_terminal() {
        let mut buf = String::new();
        if io::stdin().read_to_string(&mut buf).is_ok() {
            targets.extend(parse_target_lines(&buf));
        }
    }

    Ok(targets)
}

/// Parse newline-delimited targets, skipping blanks and comments.
fn parse_target_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
