// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Login transport.
//!
//! [`LoginTransport`] is the seam between the attempt loop and the network.
//! [`HttpTransport`] is the reqwest-backed implementation used by the binary;
//! tests substitute scripted transports.

use crate::error::{ProbeError, Result};
use reqwest::header::RETRY_AFTER;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// A completed HTTP exchange, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub status: u16,
    /// Raw `Retry-After` header value, if the endpoint sent one
    pub retry_after: Option<String>,
    pub body: String,
}

impl LoginResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            retry_after: None,
            body: body.into(),
        }
    }

    pub fn with_retry_after(mut self, value: impl Into<String>) -> Self {
        self.retry_after = Some(value.into());
        self
    }
}

/// An attempt that produced no HTTP response at all.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("timed out: {0}")]
    Timeout(String),

    #[error("request failed: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let detail = error_chain(&err);
        if err.is_timeout() {
            TransportError::Timeout(detail)
        } else if err.is_connect() {
            TransportError::Connect(detail)
        } else {
            TransportError::Other(detail)
        }
    }
}

/// Flatten an error and its sources into one line.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut detail = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    detail
}

/// Submits one (identity, secret) pair to a login endpoint.
pub trait LoginTransport {
    fn attempt(
        &self,
        identity: &str,
        secret: &str,
    ) -> impl Future<Output = std::result::Result<LoginResponse, TransportError>> + Send;
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// JSON-over-HTTP login transport.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Create a transport posting to `endpoint` with a per-request timeout.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ProbeError::Client)?;

        Ok(Self { client, endpoint })
    }
}

impl LoginTransport for HttpTransport {
    async fn attempt(
        &self,
        identity: &str,
        secret: &str,
    ) -> std::result::Result<LoginResponse, TransportError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&Credentials {
                email: identity,
                password: secret,
            })
            .send()
            .await?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        Ok(LoginResponse {
            status,
            retry_after,
            body,
        })
    }
}
