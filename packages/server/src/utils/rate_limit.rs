use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::error::AppError;

/// Counter for one key inside the current window.
#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    reset_at: Instant,
}

/// Fixed-window request counter keyed by `client-ip:route-key`.
///
/// Shared through [`crate::state::AppState`]. Expired windows are dropped by
/// [`RateLimiter::sweep`], which [`spawn_sweep_task`] runs on an interval.
/// At most `max_keys` windows are tracked; a new key arriving while the map is
/// full and nothing has expired is refused for one window.
#[derive(Debug)]
pub struct RateLimiter {
    windows: DashMap<String, Window>,
    window: Duration,
    max_keys: usize,
}

impl RateLimiter {
    pub fn new(window: Duration, max_keys: usize) -> Self {
        Self {
            windows: DashMap::new(),
            window,
            max_keys,
        }
    }

    /// Count one request for `key`, rejecting it once `limit` is exceeded.
    pub fn check(&self, key: &str, limit: u32) -> Result<(), AppError> {
        self.check_at(key, limit, Instant::now())
    }

    fn check_at(&self, key: &str, limit: u32, now: Instant) -> Result<(), AppError> {
        // Checked before `entry` so the sweep never runs under a shard lock.
        if !self.windows.contains_key(key) && self.windows.len() >= self.max_keys {
            self.sweep_at(now);
            if self.windows.len() >= self.max_keys {
                tracing::warn!(key, max_keys = self.max_keys, "Rate limiter full");
                return Err(AppError::RateLimited {
                    retry_after: self.window.as_secs().max(1),
                });
            }
        }

        let mut entry = self.windows.entry(key.to_string()).or_insert(Window {
            count: 0,
            reset_at: now + self.window,
        });

        if now >= entry.reset_at {
            *entry = Window {
                count: 0,
                reset_at: now + self.window,
            };
        }

        if entry.count >= limit {
            let remaining = entry.reset_at.saturating_duration_since(now);
            // Round up so clients never retry a moment too early.
            let retry_after = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
            tracing::debug!(key, retry_after, "Rate limit exceeded");
            return Err(AppError::RateLimited {
                retry_after: retry_after.max(1),
            });
        }

        entry.count += 1;
        Ok(())
    }

    /// Drop every window whose reset time has passed. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    fn sweep_at(&self, now: Instant) -> usize {
        let before = self.windows.len();
        self.windows.retain(|_, w| now < w.reset_at);
        before.saturating_sub(self.windows.len())
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

/// Periodically sweep expired windows so idle clients do not accumulate.
pub fn spawn_sweep_task(
    limiter: Arc<RateLimiter>,
    sweep_interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_interval);

        loop {
            interval.tick().await;
            let removed = limiter.sweep();
            if removed > 0 {
                tracing::debug!(removed, remaining = limiter.len(), "Swept rate limit windows");
            }
        }
    })
}
