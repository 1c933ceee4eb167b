//! Per-table tracking configuration.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Per-table tracking settings.
///
/// Owned by the registrar; the absence of a config for a table means the
/// table is untracked. Replaced wholesale on re-enable, removed on
/// disable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Capture one record per affected row (`true`) or one record per
    /// statement (`false`). Truncate is always captured at statement
    /// granularity regardless of this setting.
    #[serde(default = "default_true")]
    pub row_level: bool,

    /// Whether to record the top-level query text with each event.
    #[serde(default = "default_true")]
    pub capture_query_text: bool,

    /// Column names omitted from snapshots and diffs. Names that do not
    /// exist on a given table are ignored, so one list can be shared
    /// across heterogeneous tables.
    #[serde(default)]
    pub excluded_columns: BTreeSet<String>,
}

impl TrackingConfig {
    /// Config with explicit granularity and query-text capture and no
    /// excluded columns.
    pub fn new(row_level: bool, capture_query_text: bool) -> Self {
        Self {
            row_level,
            capture_query_text,
            excluded_columns: BTreeSet::new(),
        }
    }

    /// Replace the excluded-column set.
    pub fn with_excluded_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_columns = columns.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            row_level: true,
            capture_query_text: true,
            excluded_columns: BTreeSet::new(),
        }
    }
}

fn default_true() -> bool {
    true
}
