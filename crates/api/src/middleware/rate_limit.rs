//! Per-client rate limiting over two fixed windows.
//!
//! Each client key carries an independent minute counter and day
//! counter. A request is admitted only while both counters stay at or
//! under their thresholds; the request that trips a limit is itself
//! counted, so the budget drains even while a client hammers a closed
//! window.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use canopy_core::limits::{DAY_LIMIT, DAY_WINDOW, MINUTE_LIMIT, MINUTE_WINDOW};

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub limited: bool,
    /// Seconds until the nearer window reopens; 0 when admitted.
    pub retry_after_secs: u64,
}

/// One fixed counting window.
#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    reset_at: Instant,
}

impl Window {
    fn new(now: Instant, duration: Duration) -> Self {
        Self {
            count: 0,
            reset_at: now + duration,
        }
    }

    /// Reset if lapsed, then count this request.
    fn tick(&mut self, now: Instant, duration: Duration) {
        if now > self.reset_at {
            // Lapsed windows are replaced, not incremented.
            *self = Self::new(now, duration);
        }
        self.count += 1;
    }

    fn remaining(&self, now: Instant) -> Duration {
        self.reset_at.saturating_duration_since(now)
    }
}

#[derive(Debug, Clone, Copy)]
struct ClientWindows {
    minute: Window,
    day: Window,
}

/// Dual-window rate limiter keyed by client identifier.
///
/// An explicit service object owned by `AppState`; entries are created
/// lazily and survive until the cleanup task drops fully-lapsed ones.
pub struct RateLimiter {
    clients: Mutex<HashMap<String, ClientWindows>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Check and count a request for the given client key.
    pub fn check(&self, key: &str) -> RateLimitDecision {
        self.check_at(key, Instant::now())
    }

    /// Time-injected variant of [`check`](Self::check); tests drive
    /// this directly instead of mocking the wall clock.
    pub fn check_at(&self, key: &str, now: Instant) -> RateLimitDecision {
        let mut clients = self.clients.lock();

        let entry = clients.entry(key.to_string()).or_insert(ClientWindows {
            minute: Window::new(now, MINUTE_WINDOW),
            day: Window::new(now, DAY_WINDOW),
        });

        entry.minute.tick(now, MINUTE_WINDOW);
        entry.day.tick(now, DAY_WINDOW);

        let limited = entry.minute.count > MINUTE_LIMIT || entry.day.count > DAY_LIMIT;
        if !limited {
            return RateLimitDecision {
                limited: false,
                retry_after_secs: 0,
            };
        }

        let remaining = entry
            .minute
            .remaining(now)
            .min(entry.day.remaining(now));

        RateLimitDecision {
            limited: true,
            retry_after_secs: ceil_secs(remaining),
        }
    }

    /// Drop entries whose windows have all lapsed.
    ///
    /// Semantics-neutral: a lapsed window would be reset to zero on the
    /// next check anyway. This only bounds memory for one-off clients.
    pub fn cleanup(&self) {
        self.cleanup_at(Instant::now());
    }

    fn cleanup_at(&self, now: Instant) {
        let mut clients = self.clients.lock();
        clients.retain(|_, entry| now <= entry.minute.reset_at || now <= entry.day.reset_at);
    }

    #[cfg(test)]
    fn client_count(&self) -> usize {
        self.clients.lock().len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

fn ceil_secs(d: Duration) -> u64 {
    (d.as_millis() as u64).div_ceil(1000)
}

/// Shared rate limiter state.
pub type SharedRateLimiter = Arc<RateLimiter>;
