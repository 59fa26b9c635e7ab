use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Writes `bytes` to `path` through a temp file in the same directory, so
/// readers never observe a half-written file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), std::io::Error> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path)?;
    Ok(())
}

/// Removes `path` and everything below it. Failures are logged and skipped
/// so one locked file does not stop the rest from being removed.
pub fn delete_dir_recursively(path: &Path) {
    let Ok(meta) = fs::symlink_metadata(path) else {
        return;
    };
    if meta.is_dir() {
        match fs::read_dir(path) {
            Ok(entries) => {
                for e in entries.filter_map(|e| e.ok()) {
                    delete_dir_recursively(&e.path());
                }
            }
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "cannot list directory"),
        }
        if let Err(e) = fs::remove_dir(path) {
            tracing::warn!(path = %path.display(), error = %e, "cannot remove directory");
        }
    } else if let Err(e) = fs::remove_file(path) {
        tracing::warn!(path = %path.display(), error = %e, "cannot remove file");
    }
}
