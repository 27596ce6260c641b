// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Per-attempt outcome classification.

use crate::transport::{LoginResponse, TransportError};
use serde::Serialize;

/// HTTP status the endpoint uses to accept credentials.
pub const STATUS_ACCEPTED: u16 = 200;
/// HTTP status the endpoint uses to reject credentials.
pub const STATUS_REJECTED: u16 = 401;
/// HTTP status signalling the client is being throttled.
pub const STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// Classification of one login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Endpoint accepted the credentials
    Success { body: String, throttled: bool },
    /// Endpoint rejected the credentials
    Rejected { body: String, throttled: bool },
    /// Any other status, or no response at all
    Error {
        /// HTTP status, absent when the request never completed
        status: Option<u16>,
        detail: String,
        /// 429 or a `Retry-After` header was seen
        throttled: bool,
    },
}

/// Outcome without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Success,
    Rejected,
    Error,
}

impl AttemptOutcome {
    /// Classify the result of one transport call.
    pub fn classify(result: Result<LoginResponse, TransportError>) -> Self {
        match result {
            Ok(response) => {
                let throttled = response.status == STATUS_TOO_MANY_REQUESTS
                    || response.retry_after.is_some();
                match response.status {
                    STATUS_ACCEPTED => AttemptOutcome::Success {
                        body: response.body,
                        throttled,
                    },
                    STATUS_REJECTED => AttemptOutcome::Rejected {
                        body: response.body,
                        throttled,
                    },
                    status => AttemptOutcome::Error {
                        status: Some(status),
                        detail: response.body,
                        throttled,
                    },
                }
            }
            Err(err) => AttemptOutcome::Error {
                status: None,
                detail: err.to_string(),
                throttled: false,
            },
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            AttemptOutcome::Success { .. } => OutcomeKind::Success,
            AttemptOutcome::Rejected { .. } => OutcomeKind::Rejected,
            AttemptOutcome::Error { .. } => OutcomeKind::Error,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Success { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            AttemptOutcome::Success { .. } => Some(STATUS_ACCEPTED),
            AttemptOutcome::Rejected { .. } => Some(STATUS_REJECTED),
            AttemptOutcome::Error { status, .. } => *status,
        }
    }

    /// 429, or a `Retry-After` header on any status.
    pub fn is_throttled(&self) -> bool {
        match self {
            AttemptOutcome::Success { throttled, .. }
            | AttemptOutcome::Rejected { throttled, .. }
            | AttemptOutcome::Error { throttled, .. } => *throttled,
        }
    }

    /// One-line description written after the attempt prefix.
    pub fn describe(&self, target: &str, candidate: &str) -> String {
        match self {
            AttemptOutcome::Success { .. } => {
                format!("SUCCESS! Valid credentials found: {target} / {candidate}")
            }
            AttemptOutcome::Rejected { .. } => "Failed: Invalid credentials".to_string(),
            AttemptOutcome::Error {
                status: Some(status),
                detail,
                ..
            } => format!("Error: {status} - {}", single_line(detail)),
            AttemptOutcome::Error {
                status: None,
                detail,
                ..
            } => format!("Error: no response - {}", single_line(detail)),
        }
    }
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_statuses() {
        assert_eq!(
            AttemptOutcome::classify(Ok(LoginResponse::new(200, "{}"))).kind(),
            OutcomeKind::Success
        );
        assert_eq!(
            AttemptOutcome::classify(Ok(LoginResponse::new(401, "{}"))).kind(),
            OutcomeKind::Rejected
        );
        for status in [400, 403, 404, 429, 500, 502] {
            let outcome = AttemptOutcome::classify(Ok(LoginResponse::new(status, "")));
            assert_eq!(outcome.kind(), OutcomeKind::Error, "status {status}");
            assert_eq!(outcome.status(), Some(status));
        }
    }

    #[test]
    fn test_transport_failure_is_error() {
        let outcome = AttemptOutcome::classify(Err(TransportError::Connect(
            "Connection refused".to_string(),
        )));
        assert_eq!(outcome.kind(), OutcomeKind::Error);
        assert_eq!(outcome.status(), None);
        assert!(!outcome.is_throttled());
        assert_eq!(
            outcome.describe("user@example.com", "admin"),
            "Error: no response - connection failed: Connection refused"
        );
    }

    #[test]
    fn test_throttle_detection() {
        let too_many = AttemptOutcome::classify(Ok(LoginResponse::new(429, "")));
        assert!(too_many.is_throttled());

        let retry_after =
            AttemptOutcome::classify(Ok(LoginResponse::new(503, "").with_retry_after("5")));
        assert!(retry_after.is_throttled());

        let plain = AttemptOutcome::classify(Ok(LoginResponse::new(500, "")));
        assert!(!plain.is_throttled());
    }

    #[test]
    fn test_retry_after_on_rejection_is_throttling() {
        let rejected =
            AttemptOutcome::classify(Ok(LoginResponse::new(401, "").with_retry_after("30")));
        assert_eq!(rejected.kind(), OutcomeKind::Rejected);
        assert!(rejected.is_throttled());

        let accepted =
            AttemptOutcome::classify(Ok(LoginResponse::new(200, "").with_retry_after("5")));
        assert_eq!(accepted.kind(), OutcomeKind::Success);
        assert!(accepted.is_throttled());

        let plain = AttemptOutcome::classify(Ok(LoginResponse::new(401, "")));
        assert!(!plain.is_throttled());
    }

    #[test]
    fn test_describe_lines() {
        let success = AttemptOutcome::classify(Ok(LoginResponse::new(200, "")));
        assert_eq!(
            success.describe("user@example.com", "letmein"),
            "SUCCESS! Valid credentials found: user@example.com / letmein"
        );

        let rejected = AttemptOutcome::classify(Ok(LoginResponse::new(401, "")));
        assert_eq!(rejected.describe("u", "p"), "Failed: Invalid credentials");

        let error = AttemptOutcome::classify(Ok(LoginResponse::new(
            500,
            "{\"error\":\n  \"Internal server error\"}",
        )));
        assert_eq!(
            error.describe("u", "p"),
            "Error: 500 - {\"error\": \"Internal server error\"}"
        );
    }
}
