// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! End-of-run summary.

use crate::error::{ProbeError, Result};
use crate::outcome::{AttemptOutcome, OutcomeKind};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

/// One attempt as recorded in the report.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptRecord {
    /// 1-based position in the candidate list
    pub attempt: usize,
    pub candidate: String,
    pub outcome: OutcomeKind,
    pub status: Option<u16>,
    pub throttled: bool,
    pub latency_ms: u64,
}

/// Summary of a probe run.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub started_at: DateTime<Utc>,
    pub target: String,
    pub endpoint: String,
    pub attempts: Vec<AttemptRecord>,
    /// Candidate the endpoint accepted, if any
    pub found: Option<String>,
    /// Number of inter-attempt pauses taken
    pub pauses: usize,
    pub duration_ms: u64,
}

impl ProbeReport {
    pub fn new(target: &str, endpoint: &str) -> Self {
        Self {
            started_at: Utc::now(),
            target: target.to_string(),
            endpoint: endpoint.to_string(),
            attempts: Vec::new(),
            found: None,
            pauses: 0,
            duration_ms: 0,
        }
    }

    /// Record an attempt outcome.
    pub fn record(&mut self, candidate: &str, outcome: &AttemptOutcome, latency: Duration) {
        self.attempts.push(AttemptRecord {
            attempt: self.attempts.len() + 1,
            candidate: candidate.to_string(),
            outcome: outcome.kind(),
            status: outcome.status(),
            throttled: outcome.is_throttled(),
            latency_ms: latency.as_millis() as u64,
        });
        if outcome.is_success() {
            self.found = Some(candidate.to_string());
        }
    }

    pub fn total_attempts(&self) -> usize {
        self.attempts.len()
    }

    /// Get count for a specific outcome.
    pub fn count(&self, kind: OutcomeKind) -> usize {
        self.attempts.iter().filter(|a| a.outcome == kind).count()
    }

    pub fn throttled(&self) -> usize {
        self.attempts.iter().filter(|a| a.throttled).count()
    }

    /// Attempt number of the first throttled response.
    pub fn first_throttled_attempt(&self) -> Option<usize> {
        self.attempts.iter().find(|a| a.throttled).map(|a| a.attempt)
    }

    pub fn rate_limiting_observed(&self) -> bool {
        self.first_throttled_attempt().is_some()
    }

    /// Get attempts per second over the whole run.
    pub fn attempts_per_second(&self) -> f64 {
        if self.duration_ms == 0 {
            0.0
        } else {
            self.total_attempts() as f64 / (self.duration_ms as f64 / 1000.0)
        }
    }

    /// Write the report as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).map_err(|e| ProbeError::Report(e.to_string()))?;
        std::fs::write(path, json)
            .map_err(|e| ProbeError::Report(format!("{}: {e}", path.display())))
    }
}

impl std::fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Login Probe Report ===")?;
        writeln!(f, "Target:            {}", self.target)?;
        writeln!(f, "Endpoint:          {}", self.endpoint)?;
        writeln!(f, "Started:           {}", self.started_at.to_rfc3339())?;
        writeln!(f, "Duration:          {} ms", self.duration_ms)?;
        writeln!(f, "Attempts:          {}", self.total_attempts())?;
        writeln!(f, "Attempts/sec:      {:.2}", self.attempts_per_second())?;
        writeln!(f)?;
        writeln!(f, "--- Outcomes ---")?;
        writeln!(f, "Success:           {}", self.count(OutcomeKind::Success))?;
        writeln!(f, "Rejected:          {}", self.count(OutcomeKind::Rejected))?;
        writeln!(f, "Error:             {}", self.count(OutcomeKind::Error))?;
        writeln!(f, "Throttled:         {}", self.throttled())?;
        writeln!(f)?;
        match self.first_throttled_attempt() {
            Some(n) => writeln!(f, "Rate limiting observed after attempt {n}")?,
            None => writeln!(f, "No rate limiting observed")?,
        }
        match &self.found {
            Some(candidate) => writeln!(f, "Valid credentials: {} / {}", self.target, candidate)?,
            None => writeln!(f, "Valid credentials: none found")?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{LoginResponse, TransportError};

    fn outcome(status: u16) -> AttemptOutcome {
        AttemptOutcome::classify(Ok(LoginResponse::new(status, "")))
    }

    #[test]
    fn test_record_counts() {
        let mut report = ProbeReport::new("user@example.com", "http://localhost/login");
        report.record("a", &outcome(401), Duration::from_millis(3));
        report.record(
            "b",
            &AttemptOutcome::classify(Err(TransportError::Timeout("5s".to_string()))),
            Duration::from_millis(5000),
        );
        report.record("c", &outcome(200), Duration::from_millis(4));

        assert_eq!(report.total_attempts(), 3);
        assert_eq!(report.count(OutcomeKind::Rejected), 1);
        assert_eq!(report.count(OutcomeKind::Error), 1);
        assert_eq!(report.count(OutcomeKind::Success), 1);
        assert_eq!(report.found.as_deref(), Some("c"));
        assert_eq!(report.attempts[2].attempt, 3);
        assert!(!report.rate_limiting_observed());
    }

    #[test]
    fn test_first_throttled_attempt() {
        let mut report = ProbeReport::new("u", "http://localhost/login");
        report.record("a", &outcome(401), Duration::ZERO);
        report.record("b", &outcome(401), Duration::ZERO);
        report.record("c", &outcome(429), Duration::ZERO);
        report.record("d", &outcome(429), Duration::ZERO);

        assert_eq!(report.throttled(), 2);
        assert_eq!(report.first_throttled_attempt(), Some(3));
        assert!(report.to_string().contains("Rate limiting observed after attempt 3"));
    }

    #[test]
    fn test_rejections_with_retry_after_count_as_throttled() {
        let mut report = ProbeReport::new("u", "http://localhost/login");
        report.record("a", &outcome(401), Duration::ZERO);
        report.record(
            "b",
            &AttemptOutcome::classify(Ok(LoginResponse::new(401, "").with_retry_after("60"))),
            Duration::ZERO,
        );

        assert_eq!(report.count(OutcomeKind::Rejected), 2);
        assert_eq!(report.first_throttled_attempt(), Some(2));
        assert!(report.rate_limiting_observed());
    }

    #[test]
    fn test_json_shape() {
        let mut report = ProbeReport::new("u", "http://localhost/login");
        report.record("a", &outcome(401), Duration::ZERO);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["attempts"][0]["outcome"], "rejected");
        assert_eq!(value["attempts"][0]["status"], 401);
        assert!(value["found"].is_null());
    }
}
