// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Local login endpoint.
//!
//! Reproduces the application's `POST /api/auth/login` route closely enough
//! to be a probe target: 400 on missing fields, 401 on bad credentials,
//! 200 on a match. Attempt limiting is optional so both the vulnerable and
//! the fixed behaviour can be demonstrated.

use crate::config::{Account, ServerConfig};
use crate::limiter::{RateLimitResult, RateLimiter};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

/// Path the login route is mounted on.
pub const LOGIN_PATH: &str = "/api/auth/login";

/// Shared application state.
pub struct AppState {
    pub accounts: Vec<Account>,
    pub limiter: Option<RateLimiter>,
}

impl AppState {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            accounts: config.accounts.clone(),
            limiter: config.rate_limit.clone().map(RateLimiter::new),
        }
    }

    fn authenticate(&self, email: &str, password: &str) -> Option<&Account> {
        self.accounts
            .iter()
            .find(|a| a.email == email && a.password == password)
    }
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: None,
            retry_after_secs: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LoginSuccess {
    pub message: &'static str,
    pub user: UserInfo,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Build the router for the local endpoint.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(LOGIN_PATH, post(login))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Evict idle limiter state once a minute. No-op when limiting is off.
pub fn spawn_cleanup(state: Arc<AppState>) {
    if state.limiter.is_none() {
        return;
    }
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            if let Some(limiter) = &state.limiter {
                limiter.cleanup().await;
            }
        }
    });
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "mock-login",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Login endpoint.
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection, "Unreadable login body");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Internal server error")),
            )
                .into_response();
        }
    };

    let (email, password) = match (req.email.as_deref(), req.password.as_deref()) {
        (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Email and password are required")),
            )
                .into_response();
        }
    };

    if let Some(limiter) = &state.limiter {
        if let RateLimitResult::Limited {
            reason,
            retry_after,
        } = limiter.check(email).await
        {
            let retry_secs = retry_after.as_secs_f64().ceil().max(1.0) as u64;
            info!(
                account = %email,
                reason = %reason,
                retry_after_secs = retry_secs,
                "Login attempt rate limited"
            );
            return (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_secs.to_string())],
                Json(ErrorResponse {
                    error: reason.to_string(),
                    code: Some("RATE_LIMITED"),
                    retry_after_secs: Some(retry_secs),
                }),
            )
                .into_response();
        }
    }

    match state.authenticate(email, password) {
        Some(account) => {
            info!(account = %account.email, "Login successful");
            Json(LoginSuccess {
                message: "Login successful",
                user: UserInfo {
                    id: account.id.clone(),
                    email: account.email.clone(),
                },
            })
            .into_response()
        }
        None => {
            debug!(account = %email, "Invalid credentials");
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::new("Invalid credentials")),
            )
                .into_response()
        }
    }
}
