//! # Sounder - A Fast HTTP/HTTPS Probing Tool
//!
//! Sounder takes a list of hostnames or URLs and determines which are live,
//! collecting a configurable set of signals for each responding target.
//!
//! ## Features
//!
//! - **Concurrent Probing**: Bounded worker pool with per-task timeouts
//! - **Rate Limiting**: Completion-rate ceiling plus optional fixed delay
//! - **Rich Signals**: Status code, title, content metadata, body hashes,
//!   favicon fingerprint, resolved IP, line/word counts
//! - **Flexible Input**: Arguments, target list files, or stdin
//! - **Multiple Output Formats**: Colored text, JSON lines, and CSV
//! - **Graceful Degradation**: Per-probe failures never abort the batch;
//!   pool failures fall back to sequential probing
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use sounder::probe::{ClientConfig, HttpTransport, ProbeFlags, Prober};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let transport = HttpTransport::new(&ClientConfig::default()).unwrap();
//!     let prober = Prober::new(Arc::new(transport), ProbeFlags::default());
//!
//!     let result = prober.probe_url("https://example.com").await;
//!     println!("{} live={}", result.url, result.probe_status);
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`types`] - Target expansion from raw host strings to concrete URLs
//! - [`probe`] - The probing engine: transport, per-URL prober, enrichments,
//!   and the bounded-concurrency scheduler
//! - [`output`] - Output formatting utilities
//! - [`cli`] - Command-line argument definitions and target collection
//! - [`error`] - Error types

pub mod banner;
pub mod cli;
pub mod error;
pub mod output;
pub mod probe;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, EngineError};
pub use probe::{
    run_probes, ClientConfig, HashAlg, HttpTransport, ProbeFlags, ProbeJobConfig, ProbeResult,
    Prober, Transport,
};
pub use types::target::expand_targets;
