//! Rate limiting for probe runs.
//!
//! Provides token bucket rate limiting to cap the pace of completed probes
//! and avoid hammering target infrastructure.

use governor::{Quota, RateLimiter as GovLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

/// A rate limiter for controlling probe throughput.
///
/// Uses a token bucket enforcing a maximum completions-per-second. The
/// scheduler awaits it on the consumption side (the single task draining
/// completions), so probe workers never contend on shared limiter state.
pub struct RateLimiter {
    limiter: Arc<
        GovLimiter<
            governor::state::NotKeyed,
            governor::state::InMemoryState,
            governor::clock::DefaultClock,
        >,
    >,
}

impl RateLimiter {
    /// Create a new rate limiter with the specified per-second limit.
    ///
    /// # Panics
    /// Panics if rate is 0. Use `Option<RateLimiter>` for optional rate
    /// limiting.
    pub fn new(rate: u32) -> Self {
        let rate = NonZeroU32::new(rate).expect("rate must be > 0");
        // Burst of one enforces a strict 1/rate interval between
        // consecutive completions.
        let quota = Quota::per_second(rate).allow_burst(NonZeroU32::MIN);
        let limiter = GovLimiter::direct(quota);

        Self {
            limiter: Arc::new(limiter),
        }
    }

    /// Wait until a token is available.
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Try to acquire a token without waiting.
    ///
    /// Returns `true` if a token was available, `false` otherwise.
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl Clone for RateLimiter {
    fn clone(&self) -> Self {
        Self {
            limiter: Arc::clone(&self.limiter),
        }
    }
}
