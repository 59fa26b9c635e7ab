use emuroot_core::{BootstrapSink, CoreError, DirectoryInitializer, DirectoryState, Permissions};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

struct Toggle {
    granted: AtomicBool,
    root: Mutex<Option<PathBuf>>,
    resolves: AtomicUsize,
}

impl Toggle {
    fn new(granted: bool, root: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            granted: AtomicBool::new(granted),
            root: Mutex::new(root.map(PathBuf::from)),
            resolves: AtomicUsize::new(0),
        })
    }
}

impl Permissions for Toggle {
    fn has_write_access(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }
    fn resolve_directory(&self) -> Option<PathBuf> {
        self.resolves.fetch_add(1, Ordering::SeqCst);
        self.root.lock().clone()
    }
}

#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<(&'static str, PathBuf)>>,
}

struct Named(&'static str, Arc<Recorder>);

impl BootstrapSink for Named {
    fn on_directory_resolved(&self, root: &Path) {
        self.1.seen.lock().push((self.0, root.to_path_buf()));
    }
}

#[test]
fn user_directory_before_any_run_fails() {
    let init = DirectoryInitializer::new(Toggle::new(true, Some("/sdcard/emu")));
    assert_eq!(init.user_directory(), Err(CoreError::NotInitialized));
    assert!(!init.are_directories_ready());
    assert_eq!(init.state(), None);
}

#[test]
fn success_records_path_and_notifies_sinks_in_order() {
    let rec = Arc::new(Recorder::default());
    let init = DirectoryInitializer::new(Toggle::new(true, Some("/sdcard/emu")))
        .with_sink(Arc::new(Named("documents", rec.clone())))
        .with_sink(Arc::new(Named("native", rec.clone())))
        .with_sink(Arc::new(Named("driver", rec.clone())));

    assert_eq!(init.start(), Some(DirectoryState::Initialized));
    assert!(init.are_directories_ready());
    assert_eq!(init.user_directory(), Ok(Some(PathBuf::from("/sdcard/emu"))));

    let seen = rec.seen.lock();
    let order: Vec<_> = seen.iter().map(|(n, _)| *n).collect();
    assert_eq!(order, vec!["documents", "native", "driver"]);
    assert!(seen.iter().all(|(_, p)| p == Path::new("/sdcard/emu")));
}

#[test]
fn initialized_is_sticky() {
    let perms = Toggle::new(true, Some("/sdcard/emu"));
    let init = DirectoryInitializer::new(perms.clone());
    assert_eq!(init.start(), Some(DirectoryState::Initialized));

    perms.granted.store(false, Ordering::SeqCst);
    assert_eq!(init.start(), Some(DirectoryState::Initialized));
    assert_eq!(perms.resolves.load(Ordering::SeqCst), 1);
}

#[test]
fn denied_permission_leaves_path_untouched() {
    let perms = Toggle::new(true, Some("/sdcard/first"));
    let init = DirectoryInitializer::new(perms.clone());
    assert_eq!(init.start(), Some(DirectoryState::Initialized));

    perms.granted.store(false, Ordering::SeqCst);
    *perms.root.lock() = Some(PathBuf::from("/sdcard/second"));
    init.reset_state();
    assert_eq!(init.start(), Some(DirectoryState::PermissionNeeded));
    assert!(!init.are_directories_ready());
    assert_eq!(init.user_directory(), Ok(Some(PathBuf::from("/sdcard/first"))));
}

#[test]
fn reset_then_grant_reaches_initialized() {
    let perms = Toggle::new(false, None);
    let init = DirectoryInitializer::new(perms.clone());
    assert_eq!(init.start(), Some(DirectoryState::PermissionNeeded));
    assert_eq!(init.user_directory(), Ok(None));

    perms.granted.store(true, Ordering::SeqCst);
    assert_eq!(init.start(), Some(DirectoryState::StorageUnavailable));

    *perms.root.lock() = Some(PathBuf::from("/sdcard/emu"));
    init.reset_state();
    assert_eq!(init.start(), Some(DirectoryState::Initialized));
    assert_eq!(init.user_directory(), Ok(Some(PathBuf::from("/sdcard/emu"))));
}

/// Denies the first `deny_first` checks, then blocks inside the permission
/// check until released and grants access.
struct Gate {
    deny_first: usize,
    calls: AtomicUsize,
    entered: Mutex<Option<mpsc::Sender<()>>>,
    release: Mutex<mpsc::Receiver<()>>,
    resolves: AtomicUsize,
}

impl Gate {
    fn new(deny_first: usize) -> (Arc<Self>, mpsc::Receiver<()>, mpsc::Sender<()>) {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let gate = Arc::new(Self {
            deny_first,
            calls: AtomicUsize::new(0),
            entered: Mutex::new(Some(entered_tx)),
            release: Mutex::new(release_rx),
            resolves: AtomicUsize::new(0),
        });
        (gate, entered_rx, release_tx)
    }
}

impl Permissions for Gate {
    fn has_write_access(&self) -> bool {
        if self.calls.fetch_add(1, Ordering::SeqCst) < self.deny_first {
            return false;
        }
        if let Some(tx) = self.entered.lock().take() {
            let _ = tx.send(());
        }
        let _ = self.release.lock().recv();
        true
    }
    fn resolve_directory(&self) -> Option<PathBuf> {
        self.resolves.fetch_add(1, Ordering::SeqCst);
        Some(PathBuf::from("/sdcard/emu"))
    }
}

#[test]
fn concurrent_start_runs_once() {
    let (gate, entered, release) = Gate::new(0);
    let init = Arc::new(DirectoryInitializer::new(gate.clone()));

    let worker = {
        let init = init.clone();
        thread::spawn(move || init.start())
    };
    entered.recv().unwrap();

    assert_eq!(init.start(), None);
    assert_eq!(init.state(), None);
    assert_eq!(init.user_directory(), Err(CoreError::NotInitialized));

    release.send(()).unwrap();
    assert_eq!(worker.join().unwrap(), Some(DirectoryState::Initialized));
    assert_eq!(gate.resolves.load(Ordering::SeqCst), 1);
    assert_eq!(init.user_directory(), Ok(Some(PathBuf::from("/sdcard/emu"))));
}

#[test]
fn user_directory_rejected_while_run_in_progress() {
    let (gate, entered, release) = Gate::new(1);
    let init = Arc::new(DirectoryInitializer::new(gate));
    assert_eq!(init.start(), Some(DirectoryState::PermissionNeeded));

    let worker = {
        let init = init.clone();
        thread::spawn(move || init.start())
    };
    entered.recv().unwrap();

    assert_eq!(init.user_directory(), Err(CoreError::StillRunning));
    assert_eq!(init.state(), Some(DirectoryState::PermissionNeeded));
    assert_eq!(init.start(), None);

    release.send(()).unwrap();
    assert_eq!(worker.join().unwrap(), Some(DirectoryState::Initialized));
    assert!(init.are_directories_ready());
}
