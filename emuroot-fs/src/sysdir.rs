//! Copies bundled asset folders into the user root and tracks which bundle
//! version was last copied, so a newer build refreshes stale files.

use crate::util::write_atomic;
use chrono::{DateTime, Utc};
use emuroot_core::{copy_asset_folder, AssetSource, CopyReport, CopyStatus, CoreError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

pub const STAMP_FILE_NAME: &str = "sys_dir_version.json";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionStamp {
    pub version: String,
    pub written_at: DateTime<Utc>,
}

pub fn stamp_path(root: &Path) -> PathBuf {
    root.join(STAMP_FILE_NAME)
}

/// A missing or unreadable stamp reads as `None`.
pub fn read_stamp(root: &Path) -> Option<VersionStamp> {
    let data = fs::read(stamp_path(root)).ok()?;
    match serde_json::from_slice(&data) {
        Ok(s) => Some(s),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable version stamp");
            None
        }
    }
}

pub fn write_stamp(root: &Path, version: &str) -> Result<VersionStamp, std::io::Error> {
    let stamp = VersionStamp {
        version: version.to_string(),
        written_at: Utc::now(),
    };
    let json = serde_json::to_vec_pretty(&stamp)?;
    write_atomic(&stamp_path(root), &json)?;
    Ok(stamp)
}

/// Folder names must stay below the user root.
pub fn check_folder(folder: &str) -> Result<(), CoreError> {
    let path = Path::new(folder);
    if folder.is_empty() || path.has_root() {
        return Err(CoreError::Invalid("asset folder must be a relative name"));
    }
    if path.components().any(|c| !matches!(c, Component::Normal(_))) {
        return Err(CoreError::Invalid("asset folder must not contain `.` or `..`"));
    }
    Ok(())
}

/// Copies each folder of `source` to the same name under `root`, creating
/// missing parents. Rejected or uncreatable destinations are reported as
/// failures.
pub fn copy_folders<S: AssetSource + ?Sized>(
    source: &S,
    root: &Path,
    folders: &[String],
    overwrite: bool,
) -> CopyReport {
    let mut report = CopyReport::new();
    for folder in folders {
        let dest = root.join(folder);
        if let Err(e) = check_folder(folder) {
            tracing::error!(folder = %folder, error = %e, "rejecting asset folder");
            report.record(folder, &dest, CopyStatus::Failed { reason: e.to_string() });
            continue;
        }
        if let Some(parent) = dest.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::error!(folder = %folder, error = %e, "cannot create asset destination");
                report.record(folder, &dest, CopyStatus::Failed { reason: e.to_string() });
                continue;
            }
        }
        copy_asset_folder(source, folder, &dest, overwrite, &mut report);
    }
    report
}

/// Copies `folders` into `root`, keeping existing files unless the stored
/// stamp differs from `version`. The stamp is only rewritten after a copy
/// without failures, so a partial refresh is retried with overwrite.
pub fn materialize<S: AssetSource + ?Sized>(
    source: &S,
    root: &Path,
    folders: &[String],
    version: &str,
) -> CopyReport {
    let stale = read_stamp(root).map(|s| s.version != version).unwrap_or(true);
    if stale {
        tracing::info!(version, "asset bundle changed, refreshing user directory");
    }

    let report = copy_folders(source, root, folders, stale);

    if stale {
        let failed = report.failures().count();
        if failed > 0 {
            tracing::warn!(failed, "asset refresh incomplete, keeping previous stamp");
        } else if let Err(e) = write_stamp(root, version) {
            tracing::error!(error = %e, "failed to write version stamp");
        }
    }
    report
}
