use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a directory initialization run.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryState {
    Initialized,
    PermissionNeeded,
    StorageUnavailable,
}

impl DirectoryState {
    pub fn is_ready(&self) -> bool {
        matches!(self, DirectoryState::Initialized)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DirectoryState::Initialized => "initialized",
            DirectoryState::PermissionNeeded => "permission_needed",
            DirectoryState::StorageUnavailable => "storage_unavailable",
        }
    }
}

impl fmt::Display for DirectoryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
