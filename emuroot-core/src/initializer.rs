use crate::{BootstrapSink, CoreError, DirectoryState, Permissions};
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Resolves the user directory once and announces it to the registered sinks.
///
/// A run is claimed through an atomic flag; a caller that loses the claim
/// gets `None` back immediately instead of waiting. Reads of the state and
/// path are not ordered against a run in progress.
pub struct DirectoryInitializer {
    permissions: Arc<dyn Permissions>,
    sinks: Vec<Arc<dyn BootstrapSink>>,
    state: RwLock<Option<DirectoryState>>,
    user_path: RwLock<Option<PathBuf>>,
    running: AtomicBool,
}

impl DirectoryInitializer {
    pub fn new(permissions: Arc<dyn Permissions>) -> Self {
        Self {
            permissions,
            sinks: Vec::new(),
            state: RwLock::new(None),
            user_path: RwLock::new(None),
            running: AtomicBool::new(false),
        }
    }

    /// Sinks are notified in the order they were added.
    pub fn with_sink(mut self, sink: Arc<dyn BootstrapSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn start(&self) -> Option<DirectoryState> {
        let _claim = RunClaim::acquire(&self.running)?;

        let current = *self.state.read();
        if current == Some(DirectoryState::Initialized) {
            return current;
        }

        let next = self.evaluate();
        tracing::info!(state = %next, "directory initialization finished");
        *self.state.write() = Some(next);
        Some(next)
    }

    fn evaluate(&self) -> DirectoryState {
        if !self.permissions.has_write_access() {
            return DirectoryState::PermissionNeeded;
        }
        let Some(root) = self
            .permissions
            .resolve_directory()
            .filter(|p| !p.as_os_str().is_empty())
        else {
            return DirectoryState::StorageUnavailable;
        };

        tracing::debug!(user_dir = %root.display(), "resolved user directory");
        *self.user_path.write() = Some(root.clone());
        for sink in &self.sinks {
            sink.on_directory_resolved(&root);
        }
        DirectoryState::Initialized
    }

    pub fn are_directories_ready(&self) -> bool {
        self.state.read().map_or(false, |s| s.is_ready())
    }

    /// Forgets the last outcome so the next `start` evaluates again.
    /// The recorded path is kept.
    pub fn reset_state(&self) {
        *self.state.write() = None;
        let _ = self
            .running
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire);
    }

    pub fn state(&self) -> Option<DirectoryState> {
        *self.state.read()
    }

    pub fn user_directory(&self) -> Result<Option<PathBuf>, CoreError> {
        if self.state.read().is_none() {
            return Err(CoreError::NotInitialized);
        }
        if self.running.load(Ordering::Acquire) {
            return Err(CoreError::StillRunning);
        }
        Ok(self.user_path.read().clone())
    }
}

/// Holds the running flag for the duration of a run and releases it on drop,
/// including when a collaborator panics.
struct RunClaim<'a> {
    flag: &'a AtomicBool,
}

impl<'a> RunClaim<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for RunClaim<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    struct Fixed(bool, Option<&'static str>);

    impl Permissions for Fixed {
        fn has_write_access(&self) -> bool {
            self.0
        }
        fn resolve_directory(&self) -> Option<PathBuf> {
            self.1.map(PathBuf::from)
        }
    }

    #[test]
    fn empty_path_is_storage_unavailable() {
        let init = DirectoryInitializer::new(Arc::new(Fixed(true, Some(""))));
        assert_eq!(init.start(), Some(DirectoryState::StorageUnavailable));
        assert_eq!(init.user_directory(), Ok(None));
    }

    #[test]
    fn claim_released_after_sink_panics() {
        let sink: Arc<dyn BootstrapSink> = Arc::new(|_: &Path| panic!("sink failed"));
        let init =
            DirectoryInitializer::new(Arc::new(Fixed(true, Some("/data/emu")))).with_sink(sink);
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| init.start()));
        assert!(res.is_err());
        assert!(!init.running.load(Ordering::Acquire));
    }

    #[test]
    fn reset_clears_a_stuck_flag() {
        let init = DirectoryInitializer::new(Arc::new(Fixed(false, None)));
        init.running.store(true, Ordering::Release);
        assert_eq!(init.start(), None);
        init.reset_state();
        assert_eq!(init.start(), Some(DirectoryState::PermissionNeeded));
    }
}
