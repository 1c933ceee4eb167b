//! # rowtrail-core
//!
//! Shared types and configuration for the Rowtrail change-capture engine.
//!
//! This crate defines the vocabulary every other Rowtrail crate speaks:
//! tracked relations ([`TableRef`]), modifying operations ([`AuditAction`]),
//! capture granularity ([`Granularity`]), row images ([`RowImage`]), the
//! per-session context captured with each event ([`SessionContext`]), and
//! the configuration types under [`config`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Configuration types shared across all Rowtrail crates
pub mod config;

// Re-export commonly used config types for convenience
pub use config::{CaptureConfig, TrackingConfig};

/// A row image: column name to value, in stable key order.
///
/// Ordered so that serialized records and computed diffs are
/// deterministic regardless of how the host store enumerates columns.
pub type RowImage = BTreeMap<String, serde_json::Value>;

/// A tracked relation.
///
/// The name pair identifies the relation for human consumers; `identifier`
/// is the store's internal relation id, which survives renames (a renamed
/// table keeps its identifier, a dropped-and-recreated one does not).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableRef {
    /// Schema (namespace) the relation lives in.
    pub schema: String,
    /// Relation name within the schema.
    pub name: String,
    /// Store-internal relation identifier.
    pub identifier: u32,
}

impl TableRef {
    /// Create a table reference.
    pub fn new(schema: impl Into<String>, name: impl Into<String>, identifier: u32) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            identifier,
        }
    }

    /// Schema-qualified name, e.g. `public.accounts`.
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

impl std::fmt::Display for TableRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

/// A data-modifying operation captured by the engine.
///
/// Persisted as single-letter codes (`I`/`D`/`U`/`T`); downstream
/// consumers depend on those codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AuditAction {
    /// Row(s) inserted.
    #[serde(rename = "I")]
    Insert,
    /// Row(s) deleted.
    #[serde(rename = "D")]
    Delete,
    /// Row(s) updated.
    #[serde(rename = "U")]
    Update,
    /// Table truncated. Has no per-row image, so it is only ever
    /// captured at statement granularity.
    #[serde(rename = "T")]
    Truncate,
}

impl AuditAction {
    /// The single-letter code used in the persisted record layout.
    pub fn code(&self) -> char {
        match self {
            Self::Insert => 'I',
            Self::Delete => 'D',
            Self::Update => 'U',
            Self::Truncate => 'T',
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Insert => write!(f, "INSERT"),
            Self::Delete => write!(f, "DELETE"),
            Self::Update => write!(f, "UPDATE"),
            Self::Truncate => write!(f, "TRUNCATE"),
        }
    }
}

/// Capture granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One record per affected row, with row detail.
    Row,
    /// One record per operation, no row detail.
    Statement,
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Row => write!(f, "row"),
            Self::Statement => write!(f, "statement"),
        }
    }
}

/// Transactional context supplied by the host store with each hook
/// invocation.
///
/// `actor` is the session's real login identity. It is never the fixed
/// execution identity the capture logic runs under; those two concepts
/// stay separate end to end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    /// Login identity of the session causing the event.
    pub actor: String,
    /// Transaction-start timestamp.
    pub tstamp_tx: DateTime<Utc>,
    /// Statement-start timestamp. One transaction may contain several
    /// statements, so this differs from `tstamp_tx`.
    pub tstamp_stm: DateTime<Utc>,
    /// Identifier of the enclosing transaction. May wrap over long
    /// timescales; unique in combination with `tstamp_tx`.
    pub transaction_id: u64,
    /// Client-reported application name, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_name: Option<String>,
    /// Client network address, if the session is remote.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_address: Option<String>,
    /// Client port, if the session is remote.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_port: Option<u16>,
    /// Current top-level query text, if the host exposes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_codes_match_persisted_layout() {
        assert_eq!(AuditAction::Insert.code(), 'I');
        assert_eq!(AuditAction::Delete.code(), 'D');
        assert_eq!(AuditAction::Update.code(), 'U');
        assert_eq!(AuditAction::Truncate.code(), 'T');

        let json = serde_json::to_string(&AuditAction::Update).unwrap();
        assert_eq!(json, "\"U\"");
        let back: AuditAction = serde_json::from_str("\"T\"").unwrap();
        assert_eq!(back, AuditAction::Truncate);
    }

    #[test]
    fn table_ref_qualified_name() {
        let table = TableRef::new("public", "accounts", 16384);
        assert_eq!(table.qualified(), "public.accounts");
        assert_eq!(table.to_string(), "public.accounts");
    }
}
