//! Engine-wide capture configuration.

use serde::{Deserialize, Serialize};

/// Engine-wide capture settings, fixed at registration time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// The fixed service identity the interceptor body runs under.
    ///
    /// Chosen once at registration so the capture logic cannot be
    /// bypassed by a caller switching its own session role. Distinct
    /// from the `actor` recorded in each audit record, which is the
    /// caller's real login identity.
    #[serde(default = "default_execution_identity")]
    pub execution_identity: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            execution_identity: default_execution_identity(),
        }
    }
}

fn default_execution_identity() -> String {
    "rowtrail".to_string()
}
