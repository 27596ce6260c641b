// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Token bucket attempt limiter for the local login endpoint.
//!
//! Buckets are keyed by account identity, so repeated guesses against one
//! account are throttled no matter where they come from. A burst of attempts
//! inside a 10 second window puts the account into cooldown.

use crate::config::RateLimitConfig;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub enum RateLimitResult {
    /// Attempt is allowed
    Allowed {
        /// Remaining attempts in current window
        remaining: u32,
        /// Time until window resets
        reset_in: Duration,
    },
    /// Attempt is rate limited
    Limited {
        reason: RateLimitReason,
        /// Time until rate limit expires
        retry_after: Duration,
    },
}

/// Reason for rate limiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitReason {
    /// Account exceeded its attempt budget
    AccountRateExceeded,
    /// Account is in cooldown after burst detection
    BurstCooldown,
}

impl std::fmt::Display for RateLimitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AccountRateExceeded => write!(f, "Too many login attempts"),
            Self::BurstCooldown => write!(f, "Burst detected, in cooldown"),
        }
    }
}

#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    max_tokens: f64,
    /// Tokens per second
    refill_rate: f64,
    last_refill: Instant,
    /// Attempt timestamps for burst detection
    attempt_times: Vec<Instant>,
}

impl TokenBucket {
    fn new(max_per_minute: u32) -> Self {
        let max_tokens = max_per_minute as f64;

        Self {
            tokens: max_tokens,
            max_tokens,
            refill_rate: max_tokens / 60.0,
            last_refill: Instant::now(),
            attempt_times: Vec::new(),
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_rate).min(self.max_tokens);
        self.last_refill = now;
    }

    /// Try to consume a token. Every call counts toward burst detection.
    fn try_consume(&mut self) -> bool {
        self.refill();
        self.attempt_times.push(Instant::now());
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    fn remaining(&self) -> u32 {
        self.tokens.floor() as u32
    }

    fn time_until_available(&self) -> Duration {
        if self.tokens >= 1.0 || self.refill_rate <= 0.0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64((1.0 - self.tokens) / self.refill_rate)
        }
    }

    /// More than `threshold_multiplier` times the expected attempts in the
    /// last 10 seconds.
    fn detect_burst(&mut self, threshold_multiplier: f32) -> bool {
        let now = Instant::now();
        let window = Duration::from_secs(10);

        self.attempt_times
            .retain(|t| now.duration_since(*t) < window);

        let expected_in_window = (self.max_tokens / 6.0).max(1.0);
        let threshold = (expected_in_window * threshold_multiplier as f64).max(3.0) as usize;

        self.attempt_times.len() > threshold
    }
}

/// Thread-safe per-account limiter.
pub struct RateLimiter {
    config: RateLimitConfig,
    buckets: Arc<RwLock<HashMap<String, TokenBucket>>>,
    /// Accounts in cooldown, with the instant cooldown ends
    cooldowns: Arc<RwLock<HashMap<String, Instant>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            buckets: Arc::new(RwLock::new(HashMap::new())),
            cooldowns: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Check and consume one attempt for `account`.
    pub async fn check(&self, account: &str) -> RateLimitResult {
        let key = normalize_account(account);

        {
            let cooldowns = self.cooldowns.read().await;
            if let Some(until) = cooldowns.get(&key) {
                let now = Instant::now();
                if now < *until {
                    let retry_after = until.duration_since(now);
                    debug!(account = %key, ?retry_after, "Account in cooldown");
                    return RateLimitResult::Limited {
                        reason: RateLimitReason::BurstCooldown,
                        retry_after,
                    };
                }
            }
        }

        let mut buckets = self.buckets.write().await;
        let bucket = buckets
            .entry(key.clone())
            .or_insert_with(|| TokenBucket::new(self.config.max_attempts_per_minute));

        let allowed = bucket.try_consume();

        if bucket.detect_burst(self.config.burst_threshold_multiplier) {
            warn!(account = %key, "Burst of login attempts, applying cooldown");
            let cooldown = self.config.cooldown_duration();
            self.cooldowns
                .write()
                .await
                .insert(key, Instant::now() + cooldown);

            return RateLimitResult::Limited {
                reason: RateLimitReason::BurstCooldown,
                retry_after: cooldown,
            };
        }

        if allowed {
            RateLimitResult::Allowed {
                remaining: bucket.remaining(),
                reset_in: self.config.window_duration(),
            }
        } else {
            let retry_after = bucket.time_until_available();
            debug!(account = %key, ?retry_after, "Account attempt budget exhausted");
            RateLimitResult::Limited {
                reason: RateLimitReason::AccountRateExceeded,
                retry_after,
            }
        }
    }

    /// Drop idle buckets and expired cooldowns.
    pub async fn cleanup(&self) {
        let now = Instant::now();
        let stale_threshold = Duration::from_secs(300);

        self.buckets
            .write()
            .await
            .retain(|_, bucket| now.duration_since(bucket.last_refill) < stale_threshold);

        self.cooldowns.write().await.retain(|_, until| now < *until);
    }

    /// Number of tracked accounts.
    pub async fn tracked(&self) -> usize {
        self.buckets.read().await.len()
    }
}

fn normalize_account(account: &str) -> String {
    account.trim().to_lowercase()
}
