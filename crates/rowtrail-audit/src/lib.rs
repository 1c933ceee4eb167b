//! # rowtrail-audit
//!
//! Audit records and append-only stores for the Rowtrail change-capture
//! engine.
//!
//! This crate provides:
//! - [`AuditRecord`]: the immutable persisted record, one per captured
//!   event, with a fixed field layout downstream consumers rely on
//! - [`AuditStore`]: the append-only store contract with monotonic
//!   `event_id` allocation
//! - [`MemoryAuditStore`] and [`FileAuditStore`]: reference backends
//!   (in-memory for embedding hosts and tests, JSON Lines on disk)
//!
//! The capture pipeline that produces records lives in `rowtrail-capture`;
//! this crate only defines what a record is and where it goes.

pub mod error;
pub mod record;
pub mod store;

pub use error::AuditError;
pub use record::AuditRecord;
pub use store::{AuditStore, FileAuditStore, MemoryAuditStore};
