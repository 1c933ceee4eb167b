//! The persisted audit record.
//!
//! Field declaration order matches the persisted layout exactly; downstream
//! consumers depend on both order and presence, so do not reorder fields or
//! change the `skip_serializing_if` attributes without versioning the layout.

use chrono::{DateTime, Utc};
use rowtrail_core::{AuditAction, RowImage, SessionContext, TableRef};
use serde::{Deserialize, Serialize};

/// One immutable audit record, produced per captured event.
///
/// Invariants:
/// - `row_data` is absent exactly when `statement_only` is true
/// - `changed_fields` is present only for row-level `Update` records
/// - `event_id` is unique and strictly increasing across all writers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Globally unique, strictly increasing id. Assigned by the store at
    /// append time; the value carried into `append` is ignored.
    pub event_id: u64,

    /// Schema of the tracked relation.
    pub schema_name: String,

    /// Name of the tracked relation.
    pub table_name: String,

    /// Store-internal relation identifier. Survives renames, unlike the
    /// name pair; does not survive drop-and-recreate.
    pub table_identifier: u32,

    /// Login identity of the session that caused the event. Never the
    /// engine's fixed execution identity.
    pub actor: String,

    /// Transaction-start timestamp.
    pub action_ts_tx: DateTime<Utc>,

    /// Statement-start timestamp.
    pub action_ts_stmt: DateTime<Utc>,

    /// Wall-clock time at capture.
    pub action_ts_clock: DateTime<Utc>,

    /// Identifier of the enclosing transaction. May wrap; unique in
    /// combination with `action_ts_tx`.
    pub transaction_id: u64,

    /// Client-reported application name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_name: Option<String>,

    /// Client network address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_address: Option<String>,

    /// Client port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_port: Option<u16>,

    /// Top-level query text, absent when query-text capture is disabled
    /// for the table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_text: Option<String>,

    /// The captured operation, persisted as `I`/`D`/`U`/`T`.
    pub action: AuditAction,

    /// Snapshot of the affected row, minus excluded columns. Absent for
    /// statement-level events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_data: Option<RowImage>,

    /// New values of the columns that changed. Present only for
    /// row-level `Update` records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed_fields: Option<RowImage>,

    /// True iff this record was produced by statement-level capture.
    pub statement_only: bool,
}

impl AuditRecord {
    /// Assemble a record with no row detail yet. The capture pipeline
    /// fills `row_data` and `changed_fields` according to the action and
    /// granularity; `event_id` stays zero until the store assigns it.
    pub fn new(
        table: &TableRef,
        session: &SessionContext,
        action: AuditAction,
        query_text: Option<String>,
    ) -> Self {
        Self {
            event_id: 0,
            schema_name: table.schema.clone(),
            table_name: table.name.clone(),
            table_identifier: table.identifier,
            actor: session.actor.clone(),
            action_ts_tx: session.tstamp_tx,
            action_ts_stmt: session.tstamp_stm,
            action_ts_clock: Utc::now(),
            transaction_id: session.transaction_id,
            application_name: session.application_name.clone(),
            client_address: session.client_address.clone(),
            client_port: session.client_port,
            query_text,
            action,
            row_data: None,
            changed_fields: None,
            statement_only: false,
        }
    }
}
