//! Per-table tracking registration.
//!
//! The registrar owns the table-to-config registry and drives the host
//! store's hook registration. Enabling tracking is idempotent: any hooks
//! already installed for the table are replaced by a fresh set matching
//! the new configuration.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use rowtrail_core::{AuditAction, CaptureConfig, Granularity, TableRef, TrackingConfig};

use crate::error::CaptureError;
use crate::hook::{HookDescriptor, HookHost, HookTiming};

/// Shared table-to-config registry.
///
/// Explicit shared state, not an ambient global: the registrar writes it,
/// the interceptor reads it, and changes are observable immediately by
/// subsequent writes from any thread. Keyed by the relation identifier so
/// renamed tables stay tracked.
#[derive(Debug, Default)]
pub struct TrackingRegistry {
    tables: RwLock<HashMap<u32, TrackingConfig>>,
}

impl TrackingRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Config for a table, if it is tracked.
    ///
    /// A poisoned lock is an internal error, not "untracked": swallowing
    /// it would let a tracked write commit without its audit record.
    pub fn get(&self, table: &TableRef) -> Result<Option<TrackingConfig>, CaptureError> {
        let tables = self
            .tables
            .read()
            .map_err(|e| CaptureError::Internal(anyhow::anyhow!("registry lock poisoned: {e}")))?;
        Ok(tables.get(&table.identifier).cloned())
    }

    /// Whether the table is currently tracked.
    pub fn is_tracked(&self, table: &TableRef) -> Result<bool, CaptureError> {
        Ok(self.get(table)?.is_some())
    }

    fn insert(&self, table: &TableRef, config: TrackingConfig) -> Result<(), CaptureError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| CaptureError::Internal(anyhow::anyhow!("registry lock poisoned: {e}")))?;
        tables.insert(table.identifier, config);
        Ok(())
    }

    fn remove(&self, table: &TableRef) -> Result<(), CaptureError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| CaptureError::Internal(anyhow::anyhow!("registry lock poisoned: {e}")))?;
        tables.remove(&table.identifier);
        Ok(())
    }
}

/// Manages per-table tracking configuration and hook installation.
pub struct TrackingRegistrar {
    registry: Arc<TrackingRegistry>,
    host: Arc<dyn HookHost>,
    capture: CaptureConfig,
}

impl TrackingRegistrar {
    /// Create a registrar over the given host store. The capture config's
    /// execution identity is fixed here and bound into every descriptor
    /// this registrar installs.
    pub fn new(registry: Arc<TrackingRegistry>, host: Arc<dyn HookHost>, capture: CaptureConfig) -> Self {
        Self {
            registry,
            host,
            capture,
        }
    }

    /// The shared registry this registrar writes to.
    pub fn registry(&self) -> Arc<TrackingRegistry> {
        Arc::clone(&self.registry)
    }

    /// Enable tracking with defaults: row level, query text captured, no
    /// excluded columns.
    pub fn enable_tracking(&self, table: &TableRef) -> Result<(), CaptureError> {
        self.enable_tracking_with(table, TrackingConfig::default())
    }

    /// Enable tracking with an explicit configuration, replacing any
    /// existing tracking for the table.
    ///
    /// Row-level config installs a row-granularity hook for
    /// Insert/Update/Delete plus a statement-granularity hook for
    /// Truncate only. Statement-level config installs a single statement
    /// hook covering all four operations.
    pub fn enable_tracking_with(
        &self,
        table: &TableRef,
        config: TrackingConfig,
    ) -> Result<(), CaptureError> {
        let descriptors = self.descriptors_for(table, &config);
        for descriptor in &descriptors {
            descriptor.validate()?;
        }

        // Config first, hooks second: a write racing the enable hits an
        // installed hook only after the config is already visible.
        self.registry.insert(table, config.clone())?;

        self.host.remove(table)?;
        for descriptor in descriptors {
            if let Err(e) = self.host.install(descriptor) {
                self.registry.remove(table)?;
                // The install error is what the caller needs; a failed
                // rollback removal must still be visible somewhere.
                if let Err(remove_err) = self.host.remove(table) {
                    tracing::warn!(
                        table = %table,
                        error = %remove_err,
                        "hook rollback failed, host may retain partial hooks"
                    );
                }
                return Err(e);
            }
        }

        tracing::debug!(
            table = %table,
            row_level = config.row_level,
            capture_query_text = config.capture_query_text,
            excluded = config.excluded_columns.len(),
            "tracking enabled"
        );
        Ok(())
    }

    /// Disable tracking for the table. Historic audit records are
    /// untouched; disabling an untracked table is a no-op.
    pub fn disable_tracking(&self, table: &TableRef) -> Result<(), CaptureError> {
        self.registry.remove(table)?;
        self.host.remove(table)?;
        tracing::debug!(table = %table, "tracking disabled");
        Ok(())
    }

    fn descriptors_for(&self, table: &TableRef, config: &TrackingConfig) -> Vec<HookDescriptor> {
        let identity = self.capture.execution_identity.clone();
        if config.row_level {
            vec![
                HookDescriptor {
                    table: table.clone(),
                    timing: HookTiming::AfterWrite,
                    granularity: Granularity::Row,
                    operations: [AuditAction::Insert, AuditAction::Update, AuditAction::Delete]
                        .into_iter()
                        .collect(),
                    config: config.clone(),
                    execution_identity: identity.clone(),
                },
                // Truncate has no per-row image, so even row-level
                // tracking captures it at statement granularity.
                HookDescriptor {
                    table: table.clone(),
                    timing: HookTiming::AfterWrite,
                    granularity: Granularity::Statement,
                    operations: [AuditAction::Truncate].into_iter().collect(),
                    config: config.clone(),
                    execution_identity: identity,
                },
            ]
        } else {
            vec![HookDescriptor {
                table: table.clone(),
                timing: HookTiming::AfterWrite,
                granularity: Granularity::Statement,
                operations: [
                    AuditAction::Insert,
                    AuditAction::Update,
                    AuditAction::Delete,
                    AuditAction::Truncate,
                ]
                .into_iter()
                .collect(),
                config: config.clone(),
                execution_identity: identity,
            }]
        }
    }
}
