use directories::ProjectDirs;
use emuroot_core::CoreError;
use std::path::PathBuf;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("io.github", "emuroot", "Emuroot")
}

/// Shared user root: saves, configs, and shader caches live here.
pub fn data_root() -> PathBuf {
    if let Some(pd) = project_dirs() {
        pd.data_dir().to_path_buf()
    } else {
        // Fallback: current dir
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }
}

/// App-private storage that is never offered to other programs.
pub fn internal_user_path() -> Result<PathBuf, CoreError> {
    project_dirs()
        .map(|pd| pd.data_local_dir().to_path_buf())
        .ok_or(CoreError::Storage("internal files directory is not available"))
}

pub fn log_dir(root: &std::path::Path) -> PathBuf {
    root.join("log")
}

pub fn config_dir(root: &std::path::Path) -> PathBuf {
    root.join("config")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn subdirs_live_under_root() {
        assert_eq!(log_dir(Path::new("/u")), PathBuf::from("/u/log"));
        assert_eq!(config_dir(Path::new("/u")), PathBuf::from("/u/config"));
    }
}
