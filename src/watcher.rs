//! Polling watcher that detects directory changes and notifies consumers.

use std::path::Path;

use tokio::sync::oneshot::error::TryRecvError;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::WatchConfig;
use crate::error::{GalleryError, Result};
use crate::event::ChangeEvent;
use crate::snapshot::{DirStat, Snapshot};

/// Last-known directory state. Owned by the poll loop and mutated only
/// there; other tasks learn about it through notifications.
struct WatcherState {
    stat: DirStat,
    snapshot: Snapshot,
}

/// Outcome of one detection cycle that could not complete.
enum CycleError {
    /// The directory itself is gone or unreadable; the loop halts.
    Fatal(GalleryError),

    /// A listing failed mid-cycle; the cycle is skipped and the stored
    /// state left untouched.
    Transient(GalleryError),
}

/// Poll-based directory watcher.
///
/// Each cycle first re-stats the directory and treats a size or mtime
/// mismatch as a change (cheap path). When the stat is inconclusive it
/// falls back to diffing a full name-sorted listing against the previous
/// one, so detection does not depend on the filesystem updating
/// directory metadata for every relevant change.
pub struct DirWatcher {
    config: WatchConfig,
}

/// Handle to a running poll loop.
///
/// Dropping the handle without calling [`WatcherHandle::stop`] also
/// tears the loop down: the loop treats a closed stop channel as a stop
/// request.
pub struct WatcherHandle {
    /// Change notifications, one per cycle that confirmed a change.
    pub changes: mpsc::Receiver<ChangeEvent>,

    /// Fatal and transient poll errors.
    pub errors: mpsc::Receiver<GalleryError>,

    stop_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl DirWatcher {
    /// Create a watcher for the given config. Nothing runs until
    /// [`DirWatcher::start`].
    pub fn new(config: WatchConfig) -> Self {
        Self { config }
    }

    /// Spawn the poll loop and wait for its initial read of the
    /// directory.
    ///
    /// Returns once the loop holds a baseline stat and snapshot, so the
    /// caller never observes pre-initialization state. A failed initial
    /// read surfaces here and no handle is returned.
    pub async fn start(self) -> Result<WatcherHandle> {
        let (change_tx, changes) = mpsc::channel(16);
        let (error_tx, errors) = mpsc::channel(16);
        let (ready_tx, ready_rx) = oneshot::channel();
        let (stop_tx, stop_rx) = oneshot::channel();

        let task = tokio::spawn(poll_loop(self.config, change_tx, error_tx, ready_tx, stop_rx));

        match ready_rx.await {
            Ok(Ok(())) => Ok(WatcherHandle {
                changes,
                errors,
                stop_tx,
                task,
            }),
            Ok(Err(e)) => {
                let _ = task.await;
                Err(e)
            }
            Err(_) => Err(GalleryError::ChannelClosed),
        }
    }
}

impl WatcherHandle {
    /// Request a stop and wait for the poll loop to exit.
    ///
    /// No notification is delivered after this returns.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(());
        if let Err(e) = self.task.await {
            error!("poll loop task failed: {e}");
        }
    }
}

async fn poll_loop(
    config: WatchConfig,
    change_tx: mpsc::Sender<ChangeEvent>,
    error_tx: mpsc::Sender<GalleryError>,
    ready_tx: oneshot::Sender<Result<()>>,
    mut stop_rx: oneshot::Receiver<()>,
) {
    let mut state = match initial_read(&config.root) {
        Ok(state) => {
            let _ = ready_tx.send(Ok(()));
            state
        }
        Err(e) => {
            let _ = ready_tx.send(Err(e));
            return;
        }
    };

    info!("watching {}", config.root.display());

    loop {
        // A pending stop request wins over further work.
        match stop_rx.try_recv() {
            Ok(()) | Err(TryRecvError::Closed) => {
                debug!("stop requested, poll loop exiting");
                return;
            }
            Err(TryRecvError::Empty) => {}
        }

        match poll_once(&config.root, &mut state) {
            Ok(true) => {
                if change_tx.send(ChangeEvent::new(&config.root)).await.is_err() {
                    // Nobody left to notify.
                    return;
                }
            }
            Ok(false) => {}
            Err(CycleError::Fatal(e)) => {
                warn!("fatal poll error on {}: {e}", config.root.display());
                let _ = error_tx.send(e).await;
                return;
            }
            Err(CycleError::Transient(e)) => {
                debug!("transient listing error on {}: {e}", config.root.display());
                let _ = error_tx.send(e).await;
            }
        }

        tokio::select! {
            _ = &mut stop_rx => {
                debug!("stop requested during sleep, poll loop exiting");
                return;
            }
            _ = tokio::time::sleep(config.poll_interval) => {}
        }
    }
}

fn initial_read(root: &Path) -> Result<WatcherState> {
    let stat = DirStat::read(root)?;
    let snapshot = Snapshot::capture(root)?;
    Ok(WatcherState { stat, snapshot })
}

/// Run one detection cycle. Returns whether a change was confirmed;
/// at most one notification is emitted per cycle regardless of how many
/// entries actually differ.
fn poll_once(root: &Path, state: &mut WatcherState) -> std::result::Result<bool, CycleError> {
    // A failed stat means the directory itself is gone or unreadable.
    let stat = DirStat::read(root).map_err(CycleError::Fatal)?;

    if stat != state.stat {
        // Cheap path: the directory entry itself says something moved.
        let snapshot = Snapshot::capture(root).map_err(CycleError::Transient)?;
        state.stat = stat;
        state.snapshot = snapshot;
        return Ok(true);
    }

    // The stat is inconclusive; diff a full listing before declaring the
    // cycle quiet.
    let snapshot = Snapshot::capture(root).map_err(CycleError::Transient)?;
    if snapshot.differs_from(&state.snapshot) {
        state.snapshot = snapshot;
        return Ok(true);
    }

    Ok(false)
}
