// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the login probe and the local login endpoint.

use crate::error::{ProbeError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Probe configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Account identifier sent with every attempt (default: user@example.com)
    #[serde(default = "default_target")]
    pub target: String,

    /// Login endpoint URL (default: http://localhost:3000/api/auth/login)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per-request timeout in milliseconds (default: 5000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Pause between attempts in milliseconds (default: 100)
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

/// Configuration for the local login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address (default: 127.0.0.1:3000)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Accounts the endpoint accepts
    #[serde(default = "default_accounts")]
    pub accounts: Vec<Account>,

    /// Per-account attempt limiting; absent means unlimited
    #[serde(default)]
    pub rate_limit: Option<RateLimitConfig>,
}

/// A known account on the local endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub password: String,
}

/// Attempt limiting applied per account identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum login attempts per minute per account (default: 5)
    #[serde(default = "default_max_attempts_per_minute")]
    pub max_attempts_per_minute: u32,

    /// Cooldown period after burst detection in milliseconds (default: 30000)
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_on_burst_ms: u64,

    /// Burst threshold multiplier (default: 3x normal rate in 10s window)
    #[serde(default = "default_burst_threshold")]
    pub burst_threshold_multiplier: f32,

    /// Time window for rate calculation in seconds (default: 60)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

// Default value functions
fn default_target() -> String {
    "user@example.com".to_string()
}

fn default_endpoint() -> String {
    "http://localhost:3000/api/auth/login".to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_delay_ms() -> u64 {
    100
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_accounts() -> Vec<Account> {
    vec![
        Account {
            id: "1".to_string(),
            email: "user@example.com".to_string(),
            password: "password123".to_string(),
        },
        Account {
            id: "2".to_string(),
            email: "admin@example.com".to_string(),
            password: "admin123".to_string(),
        },
    ]
}

fn default_max_attempts_per_minute() -> u32 {
    5
}

fn default_cooldown_ms() -> u64 {
    30000
}

fn default_burst_threshold() -> f32 {
    3.0
}

fn default_window_secs() -> u64 {
    60
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            target: default_target(),
            endpoint: default_endpoint(),
            timeout_ms: default_timeout_ms(),
            delay_ms: default_delay_ms(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            accounts: default_accounts(),
            rate_limit: None,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts_per_minute: default_max_attempts_per_minute(),
            cooldown_on_burst_ms: default_cooldown_ms(),
            burst_threshold_multiplier: default_burst_threshold(),
            window_secs: default_window_secs(),
        }
    }
}

impl RateLimitConfig {
    /// Get the cooldown duration
    pub fn cooldown_duration(&self) -> Duration {
        Duration::from_millis(self.cooldown_on_burst_ms)
    }

    /// Get the rate window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

impl ProbeConfig {
    /// Get the per-request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get the pause between attempts
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Check the config and return the parsed endpoint.
    pub fn validate(&self) -> Result<Url> {
        if self.target.trim().is_empty() {
            return Err(ProbeError::EmptyTarget);
        }

        let url = Url::parse(&self.endpoint).map_err(|e| ProbeError::InvalidEndpoint {
            url: self.endpoint.clone(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ProbeError::InvalidEndpoint {
                    url: self.endpoint.clone(),
                    reason: format!("unsupported scheme {other:?}"),
                })
            }
        }

        if url.host_str().map_or(true, str::is_empty) {
            return Err(ProbeError::InvalidEndpoint {
                url: self.endpoint.clone(),
                reason: "missing host".to_string(),
            });
        }

        Ok(url)
    }
}
