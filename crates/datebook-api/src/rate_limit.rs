//! Per-address rate limiting using a fixed-window counter.
//!
//! Each client address gets a counter tied to the instant its window
//! opened. Requests past the budget are rejected until the window
//! expires, at which point the counter resets. State is process-local
//! and in memory only, which is acceptable for a single-process
//! deployment.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

/// Default request budget per window.
pub const DEFAULT_MAX_REQUESTS: u32 = 100;

/// Default window length: 15 minutes.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(900);

/// Result of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitResult {
    /// The request is allowed to proceed.
    Allowed,

    /// The request is over budget. `retry_after_secs` is the time until
    /// the current window expires, suitable for a `Retry-After` header.
    Limited { retry_after_secs: u64 },
}

impl RateLimitResult {
    #[inline]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    #[inline]
    pub fn is_limited(&self) -> bool {
        matches!(self, Self::Limited { .. })
    }
}

#[derive(Debug)]
struct Window {
    count: u32,
    started: Instant,
}

#[derive(Debug)]
struct RateLimiterInner {
    windows: HashMap<IpAddr, Window>,
    max_requests: u32,
    window: Duration,
}

/// Thread-safe fixed-window limiter keyed by client address.
///
/// Cloning is cheap and shares the underlying counters, so one limiter
/// can be handed to every request via shared state.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    inner: Arc<RwLock<RateLimiterInner>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(RateLimiterInner {
                windows: HashMap::new(),
                max_requests,
                window,
            })),
        }
    }

    /// 100 requests per 15 minutes.
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW)
    }

    /// Counts one request against `addr`'s current window and reports
    /// whether it fits the budget. An expired window resets before
    /// counting.
    pub async fn check(&self, addr: IpAddr) -> RateLimitResult {
        let mut inner = self.inner.write().await;
        let max_requests = inner.max_requests;
        let window = inner.window;

        let now = Instant::now();
        let entry = inner.windows.entry(addr).or_insert(Window {
            count: 0,
            started: now,
        });

        if now.duration_since(entry.started) >= window {
            entry.count = 0;
            entry.started = now;
        }

        entry.count += 1;
        if entry.count <= max_requests {
            RateLimitResult::Allowed
        } else {
            let remaining = window.saturating_sub(now.duration_since(entry.started));
            RateLimitResult::Limited {
                retry_after_secs: remaining.as_secs().max(1),
            }
        }
    }

    /// Drops windows that have already expired, bounding memory growth
    /// from one-off addresses. Returns the number of entries removed.
    pub async fn evict_expired(&self) -> usize {
        let mut inner = self.inner.write().await;
        let window = inner.window;
        let before = inner.windows.len();

        let now = Instant::now();
        inner
            .windows
            .retain(|_, w| now.duration_since(w.started) < window);

        before - inner.windows.len()
    }

    /// Number of addresses currently tracked. Useful for monitoring.
    pub async fn tracked_addresses(&self) -> usize {
        self.inner.read().await.windows.len()
    }

    /// Spawns a background task that periodically evicts expired
    /// windows. The task runs until dropped.
    pub fn spawn_eviction_task(&self, interval: Duration) -> tokio::task::JoinHandle<()> {
        let limiter = self.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(interval);

            loop {
                interval.tick().await;
                let removed = limiter.evict_expired().await;
                if removed > 0 {
                    tracing::debug!(removed_count = removed, "Evicted expired rate limit windows");
                }
            }
        })
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::with_defaults()
    }
}
