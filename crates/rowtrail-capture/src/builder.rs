//! Audit record assembly.
//!
//! One record per invocation, or no record at all: a row-level Update
//! whose diff is empty (every changed column excluded) is a deliberate
//! skip, signalled as `Ok(None)`. Anything outside the supported
//! action/granularity combinations is a fatal internal error, never a
//! silent skip.

use rowtrail_audit::AuditRecord;
use rowtrail_core::{AuditAction, Granularity, RowImage, TrackingConfig};

use crate::diff;
use crate::error::CaptureError;
use crate::hook::WriteEvent;

/// Assemble the audit record for one hook invocation.
///
/// Supported combinations are {Insert, Delete, Update} at either
/// granularity and Truncate at statement granularity only. Query text is
/// forced absent when the table's config disables its capture, regardless
/// of what the session context carries.
pub fn build_record(
    event: &WriteEvent,
    config: &TrackingConfig,
) -> Result<Option<AuditRecord>, CaptureError> {
    let query_text = if config.capture_query_text {
        event.session.query_text.clone()
    } else {
        None
    };

    let mut record = AuditRecord::new(&event.table, &event.session, event.action, query_text);

    match (event.action, event.granularity) {
        (AuditAction::Insert, Granularity::Row) => {
            let new_row = require_image(event.new_row.as_ref(), event.action, "new")?;
            record.row_data = Some(diff::snapshot(new_row, &config.excluded_columns));
        }
        (AuditAction::Delete, Granularity::Row) => {
            let old_row = require_image(event.old_row.as_ref(), event.action, "old")?;
            record.row_data = Some(diff::snapshot(old_row, &config.excluded_columns));
        }
        (AuditAction::Update, Granularity::Row) => {
            let old_row = require_image(event.old_row.as_ref(), event.action, "old")?;
            let new_row = require_image(event.new_row.as_ref(), event.action, "new")?;
            let changed = diff::diff(old_row, new_row, &config.excluded_columns);
            if changed.is_empty() {
                // Every changed column is excluded: deliberate skip, the
                // caller must persist nothing.
                return Ok(None);
            }
            record.row_data = Some(diff::snapshot(old_row, &config.excluded_columns));
            record.changed_fields = Some(changed);
        }
        (
            AuditAction::Insert | AuditAction::Delete | AuditAction::Update | AuditAction::Truncate,
            Granularity::Statement,
        ) => {
            record.statement_only = true;
        }
        (AuditAction::Truncate, Granularity::Row) => {
            return Err(CaptureError::UnsupportedEvent {
                action: event.action,
                granularity: event.granularity,
            });
        }
    }

    Ok(Some(record))
}

fn require_image<'a>(
    image: Option<&'a RowImage>,
    action: AuditAction,
    side: &'static str,
) -> Result<&'a RowImage, CaptureError> {
    image.ok_or(CaptureError::MissingRowImage { action, side })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rowtrail_core::{SessionContext, TableRef};
    use serde_json::json;

    fn session() -> SessionContext {
        SessionContext {
            actor: "alice".to_string(),
            tstamp_tx: Utc::now(),
            tstamp_stm: Utc::now(),
            transaction_id: 11,
            application_name: Some("billing".to_string()),
            client_address: Some("10.0.0.8".to_string()),
            client_port: Some(50412),
            query_text: Some("UPDATE accounts SET balance = 150 WHERE id = 1".to_string()),
        }
    }

    fn row(pairs: &[(&str, serde_json::Value)]) -> RowImage {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn event(
        action: AuditAction,
        granularity: Granularity,
        old_row: Option<RowImage>,
        new_row: Option<RowImage>,
    ) -> WriteEvent {
        WriteEvent {
            table: TableRef::new("public", "accounts", 16384),
            action,
            granularity,
            old_row,
            new_row,
            session: session(),
        }
    }

    #[test]
    fn row_level_insert_snapshots_new_row() {
        let new_row = row(&[("id", json!(1)), ("balance", json!(100)), ("updated_at", json!("t0"))]);
        let config = TrackingConfig::default().with_excluded_columns(["updated_at"]);

        let record = build_record(
            &event(AuditAction::Insert, Granularity::Row, None, Some(new_row)),
            &config,
        )
        .unwrap()
        .expect("insert must produce a record");

        let data = record.row_data.expect("row data present");
        assert_eq!(data, row(&[("id", json!(1)), ("balance", json!(100))]));
        assert!(record.changed_fields.is_none());
        assert!(!record.statement_only);
    }

    #[test]
    fn row_level_delete_snapshots_old_row() {
        let old_row = row(&[("id", json!(9)), ("balance", json!(0))]);
        let record = build_record(
            &event(AuditAction::Delete, Granularity::Row, Some(old_row.clone()), None),
            &TrackingConfig::default(),
        )
        .unwrap()
        .expect("delete must produce a record");

        assert_eq!(record.row_data, Some(old_row));
        assert!(record.changed_fields.is_none());
    }

    #[test]
    fn update_record_carries_old_snapshot_and_new_values() {
        let old_row = row(&[("id", json!(1)), ("balance", json!(100)), ("updated_at", json!("t0"))]);
        let new_row = row(&[("id", json!(1)), ("balance", json!(150)), ("updated_at", json!("t1"))]);
        let config = TrackingConfig::default().with_excluded_columns(["updated_at"]);

        let record = build_record(
            &event(AuditAction::Update, Granularity::Row, Some(old_row), Some(new_row)),
            &config,
        )
        .unwrap()
        .expect("update with a real change must produce a record");

        assert_eq!(
            record.row_data,
            Some(row(&[("id", json!(1)), ("balance", json!(100))]))
        );
        assert_eq!(record.changed_fields, Some(row(&[("balance", json!(150))])));
    }

    #[test]
    fn update_touching_only_excluded_columns_is_skipped() {
        let old_row = row(&[("id", json!(1)), ("updated_at", json!("t0"))]);
        let new_row = row(&[("id", json!(1)), ("updated_at", json!("t1"))]);
        let config = TrackingConfig::default().with_excluded_columns(["updated_at"]);

        let result = build_record(
            &event(AuditAction::Update, Granularity::Row, Some(old_row), Some(new_row)),
            &config,
        )
        .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn statement_level_events_carry_no_row_detail() {
        for action in [
            AuditAction::Insert,
            AuditAction::Delete,
            AuditAction::Update,
            AuditAction::Truncate,
        ] {
            let record = build_record(
                &event(action, Granularity::Statement, None, None),
                &TrackingConfig::new(false, true),
            )
            .unwrap()
            .expect("statement-level events always produce a record");

            assert!(record.statement_only);
            assert!(record.row_data.is_none());
            assert!(record.changed_fields.is_none());
            assert_eq!(record.action, action);
        }
    }

    #[test]
    fn truncate_at_row_granularity_is_a_fatal_error() {
        let err = build_record(
            &event(AuditAction::Truncate, Granularity::Row, None, None),
            &TrackingConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CaptureError::UnsupportedEvent { .. }));
    }

    #[test]
    fn missing_row_image_is_an_error_not_a_skip() {
        let err = build_record(
            &event(AuditAction::Update, Granularity::Row, None, None),
            &TrackingConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CaptureError::MissingRowImage { .. }));
    }

    #[test]
    fn query_text_is_forced_absent_when_capture_disabled() {
        let new_row = row(&[("id", json!(1))]);
        let config = TrackingConfig::new(true, false);

        let record = build_record(
            &event(AuditAction::Insert, Granularity::Row, None, Some(new_row)),
            &config,
        )
        .unwrap()
        .expect("insert must produce a record");

        assert!(record.query_text.is_none());
    }

    #[test]
    fn query_text_is_recorded_when_capture_enabled() {
        let record = build_record(
            &event(AuditAction::Truncate, Granularity::Statement, None, None),
            &TrackingConfig::default(),
        )
        .unwrap()
        .expect("truncate must produce a record");

        assert_eq!(
            record.query_text.as_deref(),
            Some("UPDATE accounts SET balance = 150 WHERE id = 1")
        );
    }
}
