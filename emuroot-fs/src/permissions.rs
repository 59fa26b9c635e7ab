use emuroot_core::Permissions;
use std::fs;
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Grants access when the configured root can be created and written to.
#[derive(Clone, Debug, Default)]
pub struct FsPermissions {
    root: Option<PathBuf>,
}

impl FsPermissions {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    pub fn root(&self) -> Option<&PathBuf> {
        self.root.as_ref()
    }
}

impl Permissions for FsPermissions {
    fn has_write_access(&self) -> bool {
        let Some(root) = &self.root else {
            return false;
        };
        if let Err(e) = fs::create_dir_all(root) {
            tracing::warn!(root = %root.display(), error = %e, "cannot create user directory");
            return false;
        }
        match NamedTempFile::new_in(root) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(
                    root = %root.display(),
                    error = %e,
                    "user directory is not writable"
                );
                false
            }
        }
    }

    fn resolve_directory(&self) -> Option<PathBuf> {
        self.root
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| fs::canonicalize(p).unwrap_or_else(|_| p.clone()))
    }
}
