//! # rowtrail-capture
//!
//! The interception-and-diff pipeline of the Rowtrail change-capture
//! engine: intercept every data-modifying operation on a tracked table
//! and append one immutable audit record describing what changed, who
//! caused it, and when, with no knowledge of application schemas.
//!
//! ## Architecture
//!
//! ```text
//! Host store write (INSERT/UPDATE/DELETE/TRUNCATE)
//!       │
//!       │ after-write hook, inside the open transaction
//!       ▼
//! ┌──────────────────────┐
//! │  ChangeInterceptor   │
//! │  1. registry lookup  │  ← TrackingRegistry
//! │  2. diff / snapshot  │  ← diff
//! │  3. build record     │  ← builder
//! │  4. append           │  ← rowtrail_audit::AuditStore
//! └──────────────────────┘
//! ```
//!
//! Hooks are installed per table by [`TrackingRegistrar`] as validated,
//! typed [`HookDescriptor`]s submitted to the host's native registration
//! API; no generated text anywhere. Row-level tracking captures one
//! record per affected row; statement-level tracking captures one record
//! per operation with no row detail. Truncate is always statement-level.
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use rowtrail_audit::{AuditStore, MemoryAuditStore};
//! use rowtrail_capture::{ChangeInterceptor, HookHost, TrackingRegistrar, TrackingRegistry};
//! use rowtrail_core::{CaptureConfig, TableRef, TrackingConfig};
//!
//! fn register(host: Arc<dyn HookHost>) -> anyhow::Result<()> {
//!     let registry = Arc::new(TrackingRegistry::new());
//!     let store: Arc<dyn AuditStore> = Arc::new(MemoryAuditStore::new());
//!     let capture = CaptureConfig::default();
//!
//!     let registrar = TrackingRegistrar::new(Arc::clone(&registry), host, capture.clone());
//!     let _interceptor = ChangeInterceptor::new(registry, store, &capture);
//!
//!     let accounts = TableRef::new("public", "accounts", 16384);
//!     registrar.enable_tracking_with(
//!         &accounts,
//!         TrackingConfig::default().with_excluded_columns(["updated_at"]),
//!     )?;
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod diff;
pub mod error;
pub mod hook;
pub mod interceptor;
pub mod registrar;

pub use error::CaptureError;
pub use hook::{HookDescriptor, HookHost, HookTiming, WriteEvent};
pub use interceptor::ChangeInterceptor;
pub use registrar::{TrackingRegistrar, TrackingRegistry};
