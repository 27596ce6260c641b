// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Local endpoints for integration tests.

use login_rate_probe::{
    config::{ProbeConfig, RateLimitConfig, ServerConfig},
    server::{self, AppState},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Serve the login router on an ephemeral port.
pub async fn spawn_server(config: ServerConfig) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = server::router(Arc::new(AppState::from_config(&config)));

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

/// An address nothing is listening on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Accept connections and hold them open without ever replying.
pub async fn spawn_silent_listener() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });

    addr
}

/// Server that throttles each account after `max_attempts_per_minute`.
pub fn limited_server(max_attempts_per_minute: u32) -> ServerConfig {
    ServerConfig {
        rate_limit: Some(RateLimitConfig {
            max_attempts_per_minute,
            // Keep burst cooldown out of the way; the bucket alone limits
            burst_threshold_multiplier: 100.0,
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Probe config aimed at `addr` with a short pause.
pub fn probe_config(addr: SocketAddr, target: &str) -> ProbeConfig {
    ProbeConfig {
        target: target.to_string(),
        endpoint: format!("http://{addr}{}", server::LOGIN_PATH),
        timeout_ms: 2000,
        delay_ms: 1,
    }
}
