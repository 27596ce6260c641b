// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Login Rate Probe
//!
//! Checks whether a login endpoint throttles repeated failed attempts
//! against a single account:
//!
//! - Sends a short, fixed list of common passwords, one request at a time
//! - Classifies each response as success, rejected or error
//! - Stops at the first accepted credential
//! - Reports whether any throttling (429 / `Retry-After`) was seen
//!
//! A local reproduction of the login route lives in [`server`], so the
//! probe can be demonstrated and tested without touching a real deployment.

pub mod candidates;
pub mod config;
pub mod error;
pub mod limiter;
pub mod outcome;
pub mod probe;
pub mod report;
pub mod server;
pub mod transport;

pub use config::ProbeConfig;
pub use error::ProbeError;
pub use outcome::{AttemptOutcome, OutcomeKind};
pub use probe::Prober;
pub use report::ProbeReport;
pub use transport::{HttpTransport, LoginResponse, LoginTransport, TransportError};
