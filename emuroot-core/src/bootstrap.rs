use std::path::{Path, PathBuf};

/// Storage permission and root lookup.
pub trait Permissions: Send + Sync {
    fn has_write_access(&self) -> bool;

    /// Writable root for user data, `None` when no volume is available.
    fn resolve_directory(&self) -> Option<PathBuf>;
}

/// Receives the user directory once it has been resolved.
///
/// Sinks are fire-and-forget: they own their own failure handling and
/// cannot veto initialization.
pub trait BootstrapSink: Send + Sync {
    fn on_directory_resolved(&self, root: &Path);
}

impl<F> BootstrapSink for F
where
    F: Fn(&Path) + Send + Sync,
{
    fn on_directory_resolved(&self, root: &Path) {
        self(root)
    }
}
