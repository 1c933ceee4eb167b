//! Typed hook registration and the host store contract.
//!
//! The registrar never builds hook definitions out of generated text; it
//! submits validated [`HookDescriptor`]s to the host's native registration
//! API ([`HookHost`]). Validation happens at attach time: a descriptor
//! that would fire at the wrong lifecycle phase, or that puts Truncate at
//! row granularity, is a fatal configuration error before anything is
//! installed.

use std::collections::BTreeSet;

use rowtrail_core::{AuditAction, Granularity, RowImage, SessionContext, TableRef, TrackingConfig};
use serde::{Deserialize, Serialize};

use crate::error::CaptureError;

/// When in the store's invocation lifecycle a hook fires.
///
/// Capture must observe the write's outcome, so only [`AfterWrite`]
/// descriptors pass validation.
///
/// [`AfterWrite`]: HookTiming::AfterWrite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookTiming {
    /// Before the modifying operation runs. Rejected at attach time.
    BeforeWrite,
    /// After the operation completes, before the transaction finalizes.
    AfterWrite,
}

/// A validated, typed hook registration submitted to the host store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookDescriptor {
    /// The relation the hook attaches to.
    pub table: TableRef,
    /// Lifecycle phase the hook fires at. Must be after-write.
    pub timing: HookTiming,
    /// Row or statement granularity.
    pub granularity: Granularity,
    /// Operations the hook fires for.
    pub operations: BTreeSet<AuditAction>,
    /// Tracking configuration bound into the hook at registration.
    pub config: TrackingConfig,
    /// Fixed service identity the hook body runs under. Never the
    /// caller's session role.
    pub execution_identity: String,
}

impl HookDescriptor {
    /// Validate the descriptor. Called by the registrar before
    /// submission; hosts may call it again on their side.
    pub fn validate(&self) -> Result<(), CaptureError> {
        if self.timing != HookTiming::AfterWrite {
            return Err(CaptureError::InvalidHook(format!(
                "hook on {} must fire after the write, not before it",
                self.table
            )));
        }
        if self.operations.is_empty() {
            return Err(CaptureError::InvalidHook(format!(
                "hook on {} covers no operations",
                self.table
            )));
        }
        if self.granularity == Granularity::Row && self.operations.contains(&AuditAction::Truncate)
        {
            return Err(CaptureError::InvalidHook(format!(
                "truncate on {} cannot be captured at row granularity",
                self.table
            )));
        }
        if self.execution_identity.is_empty() {
            return Err(CaptureError::InvalidHook(
                "execution identity must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// The host store's native hook registration API (consumed, not
/// implemented here).
///
/// `remove` detaches every hook previously installed for `table` and must
/// be a no-op when none are installed.
pub trait HookHost: Send + Sync {
    /// Install one hook. The host must only invoke it at the descriptor's
    /// timing and granularity, for the descriptor's operations.
    fn install(&self, descriptor: HookDescriptor) -> Result<(), CaptureError>;

    /// Detach all hooks for `table`. Historic audit records are
    /// untouched.
    fn remove(&self, table: &TableRef) -> Result<(), CaptureError>;
}

/// One hook invocation: a modifying operation that just completed inside
/// a still-open transaction.
#[derive(Debug, Clone)]
pub struct WriteEvent {
    /// The relation that was modified.
    pub table: TableRef,
    /// The operation that ran.
    pub action: AuditAction,
    /// Granularity of the firing hook.
    pub granularity: Granularity,
    /// Old row image, for row-level Update and Delete.
    pub old_row: Option<RowImage>,
    /// New row image, for row-level Insert and Update.
    pub new_row: Option<RowImage>,
    /// Transactional context of the writing session.
    pub session: SessionContext,
}
