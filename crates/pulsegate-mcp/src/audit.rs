// crates/pulsegate-mcp/src/audit.rs
// ============================================================================
// Module: MCP Audit Logging
// Description: Structured audit events for MCP request handling.
// Purpose: Emit redacted audit logs without hard dependencies.
// Dependencies: pulsegate-config, serde
// ============================================================================

//! ## Overview
//! This module defines audit event payloads and sinks for MCP request
//! logging. It is intentionally lightweight so deployments can route events
//! to their preferred logging pipeline without redesign. API keys never
//! appear unmasked in any event.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::io::Write;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::config::ServerTransport;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Outcome of a tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolOutcome {
    /// Handler produced a regular result.
    Ok,
    /// Handler produced an error-flagged result.
    Error,
}

/// Audit event emitted for every tool invocation.
#[derive(Debug, Clone, Serialize)]
pub struct ToolAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Request identifier when provided.
    pub request_id: Option<String>,
    /// Transport used for the request.
    pub transport: ServerTransport,
    /// Peer IP address when available.
    pub peer_ip: Option<String>,
    /// Tool name when the call named a known tool.
    pub tool: Option<String>,
    /// Invocation outcome.
    pub outcome: ToolOutcome,
    /// Handler wall-clock duration in milliseconds.
    pub duration_ms: u128,
    /// Rendered response size in bytes.
    pub response_bytes: usize,
}

/// Audit event emitted for HTTP authentication failures.
#[derive(Debug, Clone, Serialize)]
pub struct AuthAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Peer IP address when available.
    pub peer_ip: Option<String>,
    /// Masked API key when one was presented.
    pub masked_key: Option<String>,
    /// Failure description.
    pub detail: String,
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Destination for audit events.
pub trait AuditSink: Send + Sync {
    /// Records a tool invocation.
    fn tool_call(&self, event: &ToolAuditEvent);

    /// Records an authentication failure.
    fn auth_failure(&self, event: &AuthAuditEvent);
}

/// Audit sink writing JSON lines to stderr.
pub struct StderrAuditSink;

impl StderrAuditSink {
    /// Writes one serialized event line to stderr, ignoring write failures.
    fn write_line(payload: &impl Serialize) {
        if let Ok(line) = serde_json::to_string(payload) {
            let stderr = io::stderr();
            let mut handle = stderr.lock();
            let _ = writeln!(handle, "{line}");
        }
    }
}

impl AuditSink for StderrAuditSink {
    fn tool_call(&self, event: &ToolAuditEvent) {
        Self::write_line(event);
    }

    fn auth_failure(&self, event: &AuthAuditEvent) {
        Self::write_line(event);
    }
}

/// Audit sink discarding every event.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn tool_call(&self, _event: &ToolAuditEvent) {}

    fn auth_failure(&self, _event: &AuthAuditEvent) {}
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Masks an API key for audit output: first eight and last four characters.
/// Keys too short to mask meaningfully are fully redacted.
#[must_use]
pub fn mask_key(key: &str) -> String {
    if key.len() <= 12 {
        return "***".to_string();
    }
    let head: String = key.chars().take(8).collect();
    let tail: String = key.chars().skip(key.chars().count().saturating_sub(4)).collect();
    format!("{head}...{tail}")
}

/// Returns milliseconds since the Unix epoch for an event timestamp.
#[must_use]
pub fn timestamp_ms(now: SystemTime) -> u128 {
    now.duration_since(UNIX_EPOCH).map_or(0, |elapsed| elapsed.as_millis())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only panic-based assertions are permitted."
    )]

    use super::*;

    #[test]
    fn long_keys_keep_head_and_tail_only() {
        let masked = mask_key("pg_live_0123456789abcdef");
        assert_eq!(masked, "pg_live_...cdef");
        assert!(!masked.contains("0123456789"));
    }

    #[test]
    fn short_keys_are_fully_redacted() {
        assert_eq!(mask_key("short"), "***");
        assert_eq!(mask_key(""), "***");
    }

    #[test]
    fn tool_events_serialize_with_lowercase_outcome() {
        let event = ToolAuditEvent {
            event: "tool_call",
            timestamp_ms: 1,
            request_id: Some("7".to_string()),
            transport: ServerTransport::Http,
            peer_ip: None,
            tool: Some("is_safe_to_deploy".to_string()),
            outcome: ToolOutcome::Error,
            duration_ms: 12,
            response_bytes: 64,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["outcome"], "error");
        assert_eq!(value["transport"], "http");
    }
}
