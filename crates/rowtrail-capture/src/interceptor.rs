//! The synchronous change interceptor.
//!
//! Invoked by the host store on each modifying operation, after the write
//! completes and before the transaction finalizes. Runs on the writer's
//! own transaction context: no background thread, no queue. The appended
//! record shares the write's commit/abort outcome, so a rolled-back
//! transaction leaves no audit record behind.

use std::sync::Arc;

use rowtrail_audit::AuditStore;
use rowtrail_core::CaptureConfig;

use crate::builder;
use crate::error::CaptureError;
use crate::hook::WriteEvent;
use crate::registrar::TrackingRegistry;

/// Entry point the host store invokes for each captured write.
pub struct ChangeInterceptor {
    registry: Arc<TrackingRegistry>,
    store: Arc<dyn AuditStore>,
    execution_identity: String,
}

impl ChangeInterceptor {
    /// Create an interceptor reading the given registry and appending to
    /// the given store. The execution identity is fixed here, at
    /// registration time, independent of whatever role is active when a
    /// hook later fires.
    pub fn new(
        registry: Arc<TrackingRegistry>,
        store: Arc<dyn AuditStore>,
        capture: &CaptureConfig,
    ) -> Self {
        Self {
            registry,
            store,
            execution_identity: capture.execution_identity.clone(),
        }
    }

    /// The fixed service identity this interceptor runs under.
    pub fn execution_identity(&self) -> &str {
        &self.execution_identity
    }

    /// Handle one hook invocation.
    ///
    /// Returns the appended record's `event_id`, or `None` for the two
    /// non-events: a table whose tracking was disabled while the write
    /// was in flight, and a row-level Update whose only changes are
    /// excluded columns. Every other failure propagates so the enclosing
    /// transaction aborts; audit loss is never silent.
    pub fn intercept(&self, event: &WriteEvent) -> Result<Option<u64>, CaptureError> {
        let Some(config) = self.registry.get(&event.table)? else {
            // Disable racing an in-flight write; the hook is on its way
            // out. Tolerated, but worth noticing.
            tracing::warn!(
                table = %event.table,
                action = %event.action,
                "hook fired for untracked table, skipping"
            );
            return Ok(None);
        };

        let Some(record) = builder::build_record(event, &config)? else {
            tracing::debug!(
                table = %event.table,
                actor = %event.session.actor,
                "update touched only excluded columns, skipping"
            );
            return Ok(None);
        };

        let event_id = self.store.append(record)?;
        tracing::debug!(
            event_id,
            table = %event.table,
            action = %event.action,
            granularity = %event.granularity,
            actor = %event.session.actor,
            execution_identity = %self.execution_identity,
            "audit record captured"
        );
        Ok(Some(event_id))
    }
}
