// crates/contract-validation-core/src/audit.rs
// ============================================================================
// Module: Validation Audit Logging
// Description: Structured audit events for route resolution and upcasting.
// Purpose: Emit JSON-lines audit records without a logging backend dependency.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Facades report each route resolution and upcast outcome to a
//! [`ValidationAuditSink`]. Events carry the request method and path, the
//! selected contract and template, and error counts. Payload bodies are never
//! recorded. The default sink is [`NoopAuditSink`], so validation has no side
//! effects unless a deployment opts in.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Event name for route resolution records.
pub const ROUTE_EVENT: &str = "route_resolution";
/// Event name for payload upcast records.
pub const UPCAST_EVENT: &str = "payload_upcast";

/// Outcome recorded for an audited operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    /// The request matched and any payload validated.
    Ok,
    /// The request did not match a declared operation.
    Rejected,
    /// The payload failed field validation.
    Invalid,
}

/// Validation audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Requested method label, when the event concerns a request.
    pub method: Option<String>,
    /// Requested path, when the event concerns a request.
    pub path: Option<String>,
    /// Name of the contract that handled the request.
    pub contract: Option<String>,
    /// Matched path template.
    pub template: Option<String>,
    /// Type reference used for upcasting.
    pub type_ref: Option<String>,
    /// Operation outcome.
    pub outcome: AuditOutcome,
    /// Stable error label when the outcome is not `ok`.
    pub error_kind: Option<&'static str>,
    /// Number of field errors reported.
    pub error_count: usize,
}

/// Inputs for constructing a [`ValidationAuditEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationAuditEventParams {
    /// Event identifier.
    pub event: &'static str,
    /// Requested method label.
    pub method: Option<String>,
    /// Requested path.
    pub path: Option<String>,
    /// Name of the contract that handled the request.
    pub contract: Option<String>,
    /// Matched path template.
    pub template: Option<String>,
    /// Type reference used for upcasting.
    pub type_ref: Option<String>,
    /// Operation outcome.
    pub outcome: AuditOutcome,
    /// Stable error label.
    pub error_kind: Option<&'static str>,
    /// Number of field errors reported.
    pub error_count: usize,
}

impl ValidationAuditEventParams {
    /// Starts parameters for a successful event with no request context.
    #[must_use]
    pub const fn new(event: &'static str) -> Self {
        Self {
            event,
            method: None,
            path: None,
            contract: None,
            template: None,
            type_ref: None,
            outcome: AuditOutcome::Ok,
            error_kind: None,
            error_count: 0,
        }
    }

    /// Starts parameters for a request-scoped event.
    #[must_use]
    pub fn request(event: &'static str, method: &str, path: &str) -> Self {
        Self {
            method: Some(method.to_string()),
            path: Some(path.to_string()),
            ..Self::new(event)
        }
    }
}

impl ValidationAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: ValidationAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: params.event,
            timestamp_ms,
            method: params.method,
            path: params.path,
            contract: params.contract,
            template: params.template,
            type_ref: params.type_ref,
            outcome: params.outcome,
            error_kind: params.error_kind,
            error_count: params.error_count,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for validation events.
pub trait ValidationAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &ValidationAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl ValidationAuditSink for StderrAuditSink {
    fn record(&self, event: &ValidationAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl ValidationAuditSink for FileAuditSink {
    fn record(&self, event: &ValidationAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl ValidationAuditSink for NoopAuditSink {
    fn record(&self, _event: &ValidationAuditEvent) {}
}

// ============================================================================
// SECTION: Tests
// ============================================================================
