use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::io::lock::FileLock;
use crate::io::recovery::{atomic_write, log_write_failure};
use crate::model::todo::Todo;
use crate::parse::splice_blocks;

/// How often the loops wake to check the stop flag.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Error type for synchronizer startup
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("could not watch {path}: {source}")]
    WatchError {
        path: PathBuf,
        source: notify::Error,
    },
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Owns the on-disk todo file between `start()` and `stop()`.
///
/// Two background loops: a watch loop that coalesces filesystem change
/// notifications into a single-slot "reload requested" signal, and a save
/// loop that serializes whole-tree snapshots into managed-block rewrites.
/// The loops share nothing but the path and the advisory write lock; a save
/// may trigger a watch event for its own write, and the resulting spurious
/// reload is tolerated by design.
pub struct FileSynchronizer {
    path: PathBuf,
    save_tx: SyncSender<Vec<Todo>>,
    reload_rx: Receiver<()>,
    stop: Arc<AtomicBool>,
    _threads: Vec<JoinHandle<()>>,
}

impl FileSynchronizer {
    /// Start watching `path` and accepting save snapshots.
    /// Failure to register the watch is fatal.
    pub fn start(path: &Path) -> Result<FileSynchronizer, SyncError> {
        let path = path.canonicalize()?;
        let (save_tx, save_rx) = mpsc::sync_channel::<Vec<Todo>>(1);
        let (reload_tx, reload_rx) = mpsc::sync_channel::<()>(1);
        let stop = Arc::new(AtomicBool::new(false));

        // Raw notify events funnel through an internal channel so the watch
        // loop can poll them alongside the stop flag. The parent directory
        // is watched (non-recursively) rather than the file itself, so the
        // watch survives atomic replace-by-rename writes.
        let (event_tx, event_rx) = mpsc::channel::<Event>();
        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                if let Ok(event) = result {
                    let _ = event_tx.send(event);
                }
            },
            Config::default(),
        )
        .map_err(|e| SyncError::WatchError {
            path: path.clone(),
            source: e,
        })?;
        let watch_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        watcher
            .watch(&watch_dir, RecursiveMode::NonRecursive)
            .map_err(|e| SyncError::WatchError {
                path: path.clone(),
                source: e,
            })?;

        let watch_stop = Arc::clone(&stop);
        let watch_path = path.clone();
        let watch_handle = thread::spawn(move || {
            // The watcher must stay alive for the lifetime of the loop.
            let _watcher = watcher;
            loop {
                match event_rx.recv_timeout(POLL_INTERVAL) {
                    Ok(event) => {
                        if relevant(&event, &watch_path) {
                            // Coalesce: a pending signal already covers this
                            // event, so a full slot drops it.
                            match reload_tx.try_send(()) {
                                Ok(()) | Err(TrySendError::Full(())) => {}
                                Err(TrySendError::Disconnected(())) => break,
                            }
                        }
                    }
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => break,
                }
                if watch_stop.load(Ordering::Relaxed) {
                    break;
                }
            }
        });

        let save_stop = Arc::clone(&stop);
        let save_path = path.clone();
        let save_handle = thread::spawn(move || {
            loop {
                match save_rx.recv_timeout(POLL_INTERVAL) {
                    // A snapshot already dequeued is written even if stop()
                    // lands meanwhile; snapshots still buffered at stop are
                    // dropped with the channel.
                    Ok(snapshot) => write_snapshot(&save_path, &snapshot),
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => break,
                }
                if save_stop.load(Ordering::Relaxed) {
                    break;
                }
            }
        });

        Ok(FileSynchronizer {
            path,
            save_tx,
            reload_rx,
            stop,
            _threads: vec![watch_handle, save_handle],
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Queue a whole-tree snapshot for the save loop. The buffer holds one
    /// snapshot; this blocks only if it is full and the save loop is stalled.
    pub fn request_save(&self, snapshot: Vec<Todo>) {
        let _ = self.save_tx.send(snapshot);
    }

    /// True if an external change was signalled since the last call.
    pub fn take_reload(&self) -> bool {
        self.reload_rx.try_recv().is_ok()
    }

    /// Signal both loops to exit. Does not wait for an in-flight write, so
    /// durability must not be assumed immediately after this returns.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

impl Drop for FileSynchronizer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn relevant(event: &Event, path: &Path) -> bool {
    matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
        && event.paths.iter().any(|p| p.as_path() == path)
}

/// Rewrite the managed blocks under the advisory lock. A failure lands in
/// the recovery log and the save loop keeps serving later cycles.
fn write_snapshot(path: &Path, snapshot: &[Todo]) {
    let result = (|| -> std::io::Result<()> {
        let _lock = FileLock::acquire_default(path).map_err(std::io::Error::other)?;
        let content = fs::read_to_string(path)?;
        let updated = splice_blocks(&content, snapshot);
        atomic_write(path, updated.as_bytes())
    })();
    if let Err(e) = result {
        log_write_failure(path, &e, snapshot);
    }
}
