//! Error types for the capture crate.

use rowtrail_audit::AuditError;
use rowtrail_core::{AuditAction, Granularity};
use thiserror::Error;

/// Errors raised by hook registration and change interception.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// A hook descriptor failed validation at attach time. Configuration
    /// defect; setup must abort.
    #[error("invalid hook configuration: {0}")]
    InvalidHook(String),

    /// The builder was handed an action/granularity combination outside
    /// the supported set. Programming defect, not a data condition.
    #[error("unsupported event: {action} at {granularity} granularity")]
    UnsupportedEvent {
        action: AuditAction,
        granularity: Granularity,
    },

    /// A row-level event arrived without the row image its action
    /// requires. Host contract violation.
    #[error("missing {side} row image for row-level {action}")]
    MissingRowImage {
        action: AuditAction,
        side: &'static str,
    },

    /// Appending the record failed; propagates so the enclosing
    /// transaction aborts.
    #[error("audit store error: {0}")]
    Store(#[from] AuditError),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
