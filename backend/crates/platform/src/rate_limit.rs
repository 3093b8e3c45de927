//! Rate Limiting Infrastructure
//!
//! Sliding-window limiter keyed by `"{client_ip}::{bucket}"`. State is
//! process-local and best-effort: it resets on restart and is not shared
//! between instances.

use kernel::error::app_error::AppError;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Sweep idle buckets once the map holds this many keys.
const SWEEP_THRESHOLD: usize = 10_000;

/// Rate limit configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 5,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    pub const fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }
}

/// Rate limit check result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitResult {
    pub allowed: bool,
    /// Calls left in the current window after this one
    pub remaining: u32,
    /// Whole seconds until a call would pass again if the client stopped now; 0 when allowed
    pub retry_after_secs: u64,
}

impl RateLimitResult {
    /// `Err(429)` with a retry hint when the call was rejected.
    pub fn ensure_allowed(self) -> Result<Self, AppError> {
        if self.allowed {
            Ok(self)
        } else {
            Err(AppError::too_many_requests("Too Many Requests")
                .with_retry_after(self.retry_after_secs))
        }
    }
}

/// Trait for rate limit storage backends
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Record one call for `key` and decide whether it is admitted.
    async fn check_and_increment(&self, key: &str, config: &RateLimitConfig) -> RateLimitResult;
}

#[derive(Debug)]
struct Bucket {
    window: Duration,
    /// Call times inside the window, oldest first; never longer than `max_requests + 1`
    hits: VecDeque<Instant>,
}

impl Bucket {
    fn prune(&mut self, now: Instant) {
        while let Some(&oldest) = self.hits.front() {
            if now.saturating_duration_since(oldest) >= self.window {
                self.hits.pop_front();
            } else {
                break;
            }
        }
    }
}

/// In-memory sliding-window store.
///
/// Every call is recorded, rejected ones included, so a client that keeps
/// calling while limited stays limited. Only the newest `max + 1` times are
/// kept, which is all the decision needs.
#[derive(Debug, Default)]
pub struct SlidingWindowStore {
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl SlidingWindowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// [`LocalRateLimitStore::check_and_increment`] with an explicit clock.
    pub fn check_at(&self, key: &str, config: &RateLimitConfig, now: Instant) -> RateLimitResult {
        let mut buckets = self
            .buckets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if buckets.len() >= SWEEP_THRESHOLD {
            buckets.retain(|_, bucket| {
                bucket.prune(now);
                !bucket.hits.is_empty()
            });
        }

        let bucket = buckets.entry(key.to_string()).or_insert_with(|| Bucket {
            window: config.window,
            hits: VecDeque::with_capacity(config.max_requests as usize + 1),
        });
        bucket.window = config.window;
        bucket.prune(now);

        let max = config.max_requests as usize;
        bucket.hits.push_back(now);
        while bucket.hits.len() > max + 1 {
            bucket.hits.pop_front();
        }

        if bucket.hits.len() <= max {
            return RateLimitResult {
                allowed: true,
                remaining: (max - bucket.hits.len()) as u32,
                retry_after_secs: 0,
            };
        }

        // The next call passes once all but the newest `max - 1` times have left
        let wait = match max.checked_sub(1).and_then(|_| bucket.hits.get(1)) {
            Some(&blocking) => config
                .window
                .saturating_sub(now.saturating_duration_since(blocking)),
            None => config.window,
        };
        RateLimitResult {
            allowed: false,
            remaining: 0,
            retry_after_secs: ceil_secs(wait).max(1),
        }
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.buckets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

impl RateLimitStore for SlidingWindowStore {
    async fn check_and_increment(&self, key: &str, config: &RateLimitConfig) -> RateLimitResult {
        let result = self.check_at(key, config, Instant::now());
        if !result.allowed {
            tracing::warn!(
                key = %key,
                retry_after = result.retry_after_secs,
                "Rate limit exceeded"
            );
        }
        result
    }
}

fn ceil_secs(d: Duration) -> u64 {
    let secs = d.as_secs();
    if d.subsec_nanos() > 0 { secs + 1 } else { secs }
}
