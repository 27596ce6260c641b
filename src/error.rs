// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Startup and reporting errors.
//!
//! Per-attempt failures never surface here; they are folded into
//! [`crate::outcome::AttemptOutcome::Error`] at the call site.

use thiserror::Error;

/// Errors that stop the probe before (or after) the attempt loop.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Invalid endpoint URL {url:?}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("Target identity must not be empty")]
    EmptyTarget,

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("Failed to write report: {0}")]
    Report(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ProbeError>;
