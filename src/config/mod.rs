use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ledger::DEFAULT_NOTIFICATION_WINDOW_DAYS;

/// Engine-level settings supplied by the embedding application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Root directory for the JSON storage backend. When absent, the
    /// per-user data directory is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Days before a due date during which obligations surface as due soon.
    #[serde(default = "EngineConfig::default_notification_window")]
    pub notification_window_days: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            notification_window_days: DEFAULT_NOTIFICATION_WINDOW_DAYS,
        }
    }
}

impl EngineConfig {
    fn default_notification_window() -> i64 {
        DEFAULT_NOTIFICATION_WINDOW_DAYS
    }
}
