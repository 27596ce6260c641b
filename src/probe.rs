// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! The attempt loop.
//!
//! Tries each candidate once, in order, against a single account:
//!
//! 1. Submit (target, candidate) through the transport
//! 2. Classify the response and write one line
//! 3. Stop on the first accepted credential, otherwise pause and continue
//!
//! Attempts are strictly sequential. Transport failures are classified as
//! errors and never end the run early.

use crate::config::ProbeConfig;
use crate::error::Result;
use crate::outcome::AttemptOutcome;
use crate::report::ProbeReport;
use crate::transport::{HttpTransport, LoginTransport};
use std::io::Write;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Runs the candidate list against one account on one endpoint.
pub struct Prober<T> {
    transport: T,
    target: String,
    endpoint: String,
    delay: Duration,
}

impl Prober<HttpTransport> {
    /// Build an HTTP prober from a validated config.
    pub fn from_config(config: &ProbeConfig) -> Result<Self> {
        let endpoint = config.validate()?;
        let transport = HttpTransport::new(endpoint.clone(), config.timeout())?;
        Ok(Self::new(
            transport,
            config.target.clone(),
            config.endpoint.clone(),
            config.delay(),
        ))
    }
}

impl<T: LoginTransport> Prober<T> {
    pub fn new(
        transport: T,
        target: impl Into<String>,
        endpoint: impl Into<String>,
        delay: Duration,
    ) -> Self {
        Self {
            transport,
            target: target.into(),
            endpoint: endpoint.into(),
            delay,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Try every candidate in order, writing the banner and one line per
    /// attempt to `out`.
    pub async fn run<S, W>(&self, candidates: &[S], out: &mut W) -> Result<ProbeReport>
    where
        S: AsRef<str>,
        W: Write,
    {
        info!(
            account = %self.target,
            endpoint = %self.endpoint,
            candidates = candidates.len(),
            delay_ms = self.delay.as_millis() as u64,
            "Starting login probe"
        );

        writeln!(out, "Starting brute force attack on {}", self.target)?;
        writeln!(out, "Target URL: {}", self.endpoint)?;

        let mut report = ProbeReport::new(&self.target, &self.endpoint);
        let run_start = Instant::now();

        for (idx, candidate) in candidates.iter().enumerate() {
            let candidate = candidate.as_ref();
            let attempt = idx + 1;

            let start = Instant::now();
            let result = self.transport.attempt(&self.target, candidate).await;
            let latency = start.elapsed();

            let outcome = AttemptOutcome::classify(result);
            debug!(
                attempt,
                status = ?outcome.status(),
                outcome = ?outcome.kind(),
                latency_ms = latency.as_millis() as u64,
                "Attempt finished"
            );
            if outcome.is_throttled() {
                warn!(attempt, status = ?outcome.status(), "Endpoint is throttling attempts");
            }

            writeln!(
                out,
                "Attempt {attempt}: {} / {candidate} - {}",
                self.target,
                outcome.describe(&self.target, candidate)
            )?;
            report.record(candidate, &outcome, latency);

            if outcome.is_success() {
                break;
            }

            if attempt < candidates.len() {
                tokio::time::sleep(self.delay).await;
                report.pauses += 1;
            }
        }

        report.duration_ms = run_start.elapsed().as_millis() as u64;

        info!(
            attempts = report.total_attempts(),
            found = report.found.is_some(),
            throttled = report.throttled(),
            rate_limiting_observed = report.rate_limiting_observed(),
            duration_ms = report.duration_ms,
            "Login probe finished"
        );

        Ok(report)
    }
}
