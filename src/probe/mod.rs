//! Probe engine - fans URL probes out over a bounded worker pool.
//!
//! This module coordinates the per-URL probers under a concurrency limit,
//! applies the completion-rate policy (rate limiter plus fixed delay), and
//! guarantees exactly one result per submitted URL even when tasks time
//! out, panic, or the pool itself cannot be established.

pub mod enrich;
pub mod prober;
pub mod rate_limiter;
pub mod result;
pub mod transport;

pub use prober::{HashAlg, ProbeFlags, Prober};
pub use rate_limiter::RateLimiter;
pub use result::ProbeResult;
pub use transport::{ClientConfig, HttpTransport, RawResponse, Transport, TransportError};

use crate::error::{EngineError, EngineResult};
use crate::output;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::timeout;

/// Default ceiling on a single probe task, enrichments included. A hung
/// worker yields a synthetic timeout result instead of stalling the batch.
/// This is an outer safety net, distinct from the per-request timeout
/// inside the transport.
pub const TASK_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a probing run.
#[derive(Debug, Clone)]
pub struct ProbeJobConfig {
    /// Maximum number of probes in flight.
    pub concurrency: usize,
    /// Completed-probes-per-second ceiling; `None` disables rate limiting.
    pub rate_limit: Option<u32>,
    /// Fixed delay applied before consuming each completion.
    pub delay: Duration,
    /// Ceiling on a single probe task.
    pub task_timeout: Duration,
    /// Draw a progress bar on stderr while probing.
    pub show_progress: bool,
}

impl Default for ProbeJobConfig {
    fn default() -> Self {
        Self {
            concurrency: 50,
            rate_limit: None,
            delay: Duration::ZERO,
            task_timeout: TASK_TIMEOUT,
            show_progress: false,
        }
    }
}

/// Probe every URL and return one result per URL, in completion order.
///
/// Per-probe failures are recorded in their results; if the concurrent
/// pool cannot be established at all, the run degrades to sequential
/// probing under the same pacing policy, so a full result set always comes
/// back.
pub async fn run_probes(
    prober: Arc<Prober>,
    urls: &[String],
    config: &ProbeJobConfig,
) -> Vec<ProbeResult> {
    let limiter = config.rate_limit.filter(|r| *r > 0).map(RateLimiter::new);

    let progress = if config.show_progress {
        let pb = ProgressBar::new(urls.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let results = match run_concurrent(
        Arc::clone(&prober),
        urls,
        limiter.as_ref(),
        config,
        progress.as_ref(),
    )
    .await
    {
        Ok(results) => results,
        Err(err) => {
            output::print_warning(&format!(
                "concurrent probing unavailable ({}), falling back to sequential",
                err
            ));
            tracing::warn!(error = %err, "falling back to sequential probing");
            run_sequential(prober, urls, limiter.as_ref(), config, progress.as_ref()).await
        }
    };

    if let Some(pb) = progress {
        pb.finish_with_message("Probe complete");
    }

    results
}

/// Fan probes out over a `JoinSet` bounded by a semaphore.
async fn run_concurrent(
    prober: Arc<Prober>,
    urls: &[String],
    limiter: Option<&RateLimiter>,
    config: &ProbeJobConfig,
    progress: Option<&ProgressBar>,
) -> EngineResult<Vec<ProbeResult>> {
    if config.concurrency == 0 || config.concurrency > Semaphore::MAX_PERMITS {
        return Err(EngineError::PoolUnavailable(format!(
            "invalid worker count {}",
            config.concurrency
        )));
    }

    let semaphore = Arc::new(Semaphore::new(config.concurrency));
    let mut tasks: JoinSet<ProbeResult> = JoinSet::new();
    let mut url_of_task = HashMap::with_capacity(urls.len());
    let task_timeout = config.task_timeout;

    for url in urls {
        let prober = Arc::clone(&prober);
        let semaphore = Arc::clone(&semaphore);
        let task_url = url.clone();

        let handle = tasks.spawn(async move {
            let _permit = match semaphore.acquire().await {
                Ok(permit) => permit,
                Err(_) => {
                    return ProbeResult::failed(task_url, "probe failed: worker pool closed")
                }
            };

            match timeout(task_timeout, prober.probe_url(&task_url)).await {
                Ok(result) => result,
                Err(_) => ProbeResult::failed(task_url, "probe timeout"),
            }
        });
        url_of_task.insert(handle.id(), url.clone());
    }

    // Single consumption path: pacing and limiter state live here, never
    // on the workers.
    let mut results = Vec::with_capacity(urls.len());
    while let Some(joined) = tasks.join_next().await {
        pace(limiter, config.delay).await;

        let result = match joined {
            Ok(result) => result,
            Err(err) => {
                let url = url_of_task.get(&err.id()).cloned().unwrap_or_default();
                tracing::warn!(url = %url, error = %err, "probe task died");
                ProbeResult::failed(url, format!("probe failed: {}", err))
            }
        };

        if let Some(pb) = progress {
            pb.inc(1);
            if result.probe_status {
                pb.set_message(format!("live: {}", result.url));
            }
        }
        results.push(result);
    }

    Ok(results)
}

/// Probe every URL one at a time under the same pacing policy.
async fn run_sequential(
    prober: Arc<Prober>,
    urls: &[String],
    limiter: Option<&RateLimiter>,
    config: &ProbeJobConfig,
    progress: Option<&ProgressBar>,
) -> Vec<ProbeResult> {
    let mut results = Vec::with_capacity(urls.len());

    for url in urls {
        pace(limiter, config.delay).await;

        let result = match timeout(config.task_timeout, prober.probe_url(url)).await {
            Ok(result) => result,
            Err(_) => ProbeResult::failed(url.clone(), "probe timeout"),
        };

        if let Some(pb) = progress {
            pb.inc(1);
        }
        results.push(result);
    }

    results
}

/// Apply the completion-rate policy: rate limiter first, then the optional
/// fixed delay.
async fn pace(limiter: Option<&RateLimiter>, delay: Duration) {
    if let Some(limiter) = limiter {
        limiter.wait().await;
    }
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::transport::{RawResponse, TransportError};
    use async_trait::async_trait;
    use reqwest::header::HeaderMap;
    use std::collections::HashSet;
    use std::time::Instant;

    /// Test transport with configurable latency and failure markers.
    struct MockTransport {
        delay: Duration,
        fail_marker: Option<&'static str>,
        panic_marker: Option<&'static str>,
    }

    impl MockTransport {
        fn ok() -> Self {
            Self {
                delay: Duration::ZERO,
                fail_marker: None,
                panic_marker: None,
            }
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn fetch(&self, url: &str) -> Result<RawResponse, TransportError> {
            if self.panic_marker.is_some_and(|m| url.contains(m)) {
                panic!("transport blew up");
            }
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail_marker.is_some_and(|m| url.contains(m)) {
                return Err(TransportError::Connect {
                    elapsed: self.delay,
                });
            }
            Ok(RawResponse {
                status: 200,
                headers: HeaderMap::new(),
                body: b"ok".to_vec(),
                elapsed: self.delay,
            })
        }

        async fn fetch_with_timeout(
            &self,
            url: &str,
            _ceiling: Duration,
        ) -> Result<RawResponse, TransportError> {
            self.fetch(url).await
        }
    }

    fn urls(n: usize, prefix: &str) -> Vec<String> {
        (0..n).map(|i| format!("http://{}{}.test", prefix, i)).collect()
    }

    fn prober(transport: MockTransport) -> Arc<Prober> {
        Arc::new(Prober::new(Arc::new(transport), ProbeFlags::default()))
    }

    #[tokio::test]
    async fn test_one_result_per_url_when_all_fail() {
        let targets = urls(10, "down");
        let config = ProbeJobConfig::default();
        let results = run_probes(
            prober(MockTransport {
                fail_marker: Some("down"),
                ..MockTransport::ok()
            }),
            &targets,
            &config,
        )
        .await;

        assert_eq!(results.len(), targets.len());
        assert!(results.iter().all(|r| !r.probe_status));
        assert!(results.iter().all(|r| r.error.is_some()));
    }

    #[tokio::test]
    async fn test_results_match_submitted_urls() {
        let targets = urls(20, "host");
        let config = ProbeJobConfig {
            concurrency: 4,
            ..ProbeJobConfig::default()
        };
        let results = run_probes(prober(MockTransport::ok()), &targets, &config).await;

        let submitted: HashSet<&str> = targets.iter().map(String::as_str).collect();
        let returned: HashSet<&str> = results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(results.len(), targets.len());
        assert_eq!(submitted, returned);
    }

    #[tokio::test]
    async fn test_task_timeout_yields_synthetic_result() {
        let targets = urls(3, "slow");
        let config = ProbeJobConfig {
            task_timeout: Duration::from_millis(50),
            ..ProbeJobConfig::default()
        };

        let started = Instant::now();
        let results = run_probes(
            prober(MockTransport {
                delay: Duration::from_secs(5),
                ..MockTransport::ok()
            }),
            &targets,
            &config,
        )
        .await;

        assert_eq!(results.len(), 3);
        assert!(results
            .iter()
            .all(|r| r.error.as_deref() == Some("probe timeout")));
        assert!(results.iter().all(|r| !r.probe_status));
        // The batch finishes shortly after the timeout window, not after
        // the mock's 5s latency.
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_panicking_task_still_yields_result() {
        let targets = urls(5, "boom");
        let config = ProbeJobConfig::default();
        let results = run_probes(
            prober(MockTransport {
                panic_marker: Some("boom"),
                ..MockTransport::ok()
            }),
            &targets,
            &config,
        )
        .await;

        assert_eq!(results.len(), targets.len());
        for result in &results {
            assert!(result.error.as_deref().unwrap().starts_with("probe failed:"));
        }
    }

    #[tokio::test]
    async fn test_sequential_fallback_on_unusable_pool() {
        let targets = urls(4, "host");
        let config = ProbeJobConfig {
            concurrency: 0,
            ..ProbeJobConfig::default()
        };
        let results = run_probes(prober(MockTransport::ok()), &targets, &config).await;

        assert_eq!(results.len(), targets.len());
        assert!(results.iter().all(|r| r.probe_status));
    }

    #[tokio::test]
    async fn test_rate_limit_bounds_completion_rate() {
        let targets = urls(5, "host");
        let config = ProbeJobConfig {
            rate_limit: Some(10),
            ..ProbeJobConfig::default()
        };

        let started = Instant::now();
        let results = run_probes(prober(MockTransport::ok()), &targets, &config).await;

        assert_eq!(results.len(), 5);
        // 5 completions at 10/s: the last four wait ~100ms each.
        assert!(started.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test]
    async fn test_fixed_delay_paces_consumption() {
        let targets = urls(3, "host");
        let config = ProbeJobConfig {
            delay: Duration::from_millis(50),
            ..ProbeJobConfig::default()
        };

        let started = Instant::now();
        let results = run_probes(prober(MockTransport::ok()), &targets, &config).await;

        assert_eq!(results.len(), 3);
        assert!(started.elapsed() >= Duration::from_millis(120));
    }

    #[test]
    fn test_empty_url_list() {
        let config = ProbeJobConfig::default();
        let results = tokio_test::block_on(async {
            run_probes(prober(MockTransport::ok()), &[], &config).await
        });
        assert!(results.is_empty());
    }
}
