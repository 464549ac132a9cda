//! Per-URL probe execution.
//!
//! A [`Prober`] issues one GET through the shared transport and layers the
//! requested enrichments on top of a successful response. It never returns
//! an error: every failure mode is captured in the result record.

use crate::probe::enrich;
use crate::probe::result::ProbeResult;
use crate::probe::transport::Transport;
use clap::ValueEnum;
use std::sync::Arc;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

/// Body hash algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HashAlg {
    Md5,
    Sha256,
}

/// Which signals to collect for each probed URL.
///
/// Title extraction is not listed here: it runs for every HTML response,
/// and the display layer decides whether to show it.
#[derive(Debug, Clone, Default)]
pub struct ProbeFlags {
    /// Body hash algorithms, in request order; empty disables hashing.
    pub body_hash: Vec<HashAlg>,
    /// Fetch and fingerprint `/favicon.ico`.
    pub favicon: bool,
    /// Resolve the target hostname.
    pub ip: bool,
    /// Count body lines.
    pub line_count: bool,
    /// Count body words.
    pub word_count: bool,
}

/// Probes a single URL and produces its result record.
pub struct Prober {
    transport: Arc<dyn Transport>,
    resolver: TokioAsyncResolver,
    flags: ProbeFlags,
}

impl Prober {
    /// Create a prober over a shared transport.
    pub fn new(transport: Arc<dyn Transport>, flags: ProbeFlags) -> Self {
        let resolver =
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());
        Self {
            transport,
            resolver,
            flags,
        }
    }

    /// Probe a single URL.
    ///
    /// Never fails: a transport error is classified into the result's
    /// `error` field, and enrichment failures silently leave their fields
    /// unset. Each enrichment is independent, so one failing cannot block
    /// the others or clobber already-collected fields.
    pub async fn probe_url(&self, url: &str) -> ProbeResult {
        let mut result = ProbeResult::new(url);

        let raw = match self.transport.fetch(url).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::debug!(url, error = %err, "probe transport failure");
                result.response_time = Some(err.elapsed().as_secs_f64());
                result.error = Some(err.to_string());
                return result;
            }
        };

        result.probe_status = true;
        result.status_code = Some(raw.status);
        result.content_length = Some(raw.body.len() as u64);
        result.content_type = raw.header("content-type");
        result.server = raw.header("server");
        result.location = raw.header("location");
        result.response_time = Some(raw.elapsed.as_secs_f64());

        let is_html = result
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("text/html"));
        if is_html {
            result.title = enrich::extract_title(&raw.body);
        }

        if !self.flags.body_hash.is_empty() {
            result.body_hash = enrich::body_hash(&self.flags.body_hash, &raw.body);
        }

        if self.flags.favicon {
            result.favicon_hash = enrich::favicon_hash(self.transport.as_ref(), url).await;
        }

        if self.flags.ip {
            result.ip = enrich::resolve_ip(&self.resolver, url).await;
        }

        if self.flags.line_count || self.flags.word_count {
            let (lines, words) = enrich::text_counts(&raw.body);
            if self.flags.line_count {
                result.line_count = Some(lines);
            }
            if self.flags.word_count {
                result.word_count = Some(words);
            }
        }

        tracing::debug!(url, status = raw.status, "probe complete");
        result
    }
}
