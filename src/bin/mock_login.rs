// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Local login endpoint for demonstrating the probe.
//!
//! Without `--rate-limit-rpm` every attempt is answered, which is the
//! behaviour the probe is meant to expose. With it, each account gets a
//! token bucket and repeated guesses receive 429 with `Retry-After`.

use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use login_rate_probe::{
    config::{RateLimitConfig, ServerConfig},
    server::{self, AppState},
};

#[derive(Parser)]
#[command(name = "mock-login", version, about = "Local login endpoint for the rate probe")]
struct Args {
    /// Server bind address
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:3000")]
    bind: String,

    /// Max login attempts per minute per account (unlimited when unset)
    #[arg(long, env = "RATE_LIMIT_RPM")]
    rate_limit_rpm: Option<u32>,

    /// Burst cooldown in milliseconds
    #[arg(long, env = "COOLDOWN_MS", default_value_t = 30000)]
    cooldown_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let args = Args::parse();
    let config = ServerConfig {
        bind_addr: args.bind,
        rate_limit: args.rate_limit_rpm.map(|rpm| RateLimitConfig {
            max_attempts_per_minute: rpm,
            cooldown_on_burst_ms: args.cooldown_ms,
            ..Default::default()
        }),
        ..Default::default()
    };

    info!(
        bind_addr = %config.bind_addr,
        accounts = config.accounts.len(),
        rate_limited = config.rate_limit.is_some(),
        "Starting mock login endpoint"
    );

    let state = Arc::new(AppState::from_config(&config));
    server::spawn_cleanup(state.clone());

    let app = server::router(state);

    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, path = server::LOGIN_PATH, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
