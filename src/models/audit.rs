//! Audit logging data structures and types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Types of authentication events for audit logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthEventType {
    TokenAccepted,
    TokenMissing,
    TokenRejected,
}

/// Outcomes of authentication events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthEventOutcome {
    Success,
    Failure,
}

/// Structured audit log entry for bearer authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthAuditEvent {
    pub event_type: AuthEventType,
    pub outcome: AuthEventOutcome,
    pub timestamp: DateTime<Utc>,
    pub ip_address: String,
    pub user_agent: Option<String>,
    pub subject: Option<String>,
    pub method: String,
    pub endpoint: String,
    pub request_id: Option<String>,
    pub reason: Option<String>,
}

impl AuthAuditEvent {
    /// Create a new audit event with basic information
    pub fn new(
        event_type: AuthEventType,
        outcome: AuthEventOutcome,
        ip_address: String,
        method: String,
        endpoint: String,
    ) -> Self {
        Self {
            event_type,
            outcome,
            timestamp: Utc::now(),
            ip_address,
            user_agent: None,
            subject: None,
            method,
            endpoint,
            request_id: None,
            reason: None,
        }
    }

    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn with_subject(mut self, subject: Option<String>) -> Self {
        self.subject = subject;
        self
    }

    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    pub fn with_reason(mut self, reason: Option<String>) -> Self {
        self.reason = reason;
        self
    }

    /// Log the audit event using structured logging
    ///
    /// Failures are emitted at `warn`, successes at `info`.
    pub fn log(&self) {
        match self.outcome {
            AuthEventOutcome::Success => info!(
                target: "auth_audit",
                event_type = ?self.event_type,
                outcome = ?self.outcome,
                timestamp = %self.timestamp,
                ip_address = %self.ip_address,
                user_agent = ?self.user_agent,
                subject = ?self.subject,
                method = %self.method,
                endpoint = %self.endpoint,
                request_id = ?self.request_id,
                "Bearer authentication succeeded"
            ),
            AuthEventOutcome::Failure => warn!(
                target: "auth_audit",
                event_type = ?self.event_type,
                outcome = ?self.outcome,
                timestamp = %self.timestamp,
                ip_address = %self.ip_address,
                user_agent = ?self.user_agent,
                method = %self.method,
                endpoint = %self.endpoint,
                request_id = ?self.request_id,
                reason = ?self.reason,
                "Bearer authentication failed"
            ),
        }
    }
}
