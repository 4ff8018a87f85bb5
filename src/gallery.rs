//! Count aggregation over a watched gallery directory.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::{RwLock, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::WatchConfig;
use crate::error::{GalleryError, Result};
use crate::snapshot::Snapshot;
use crate::watcher::{DirWatcher, WatcherHandle};

/// Derived counts over the watched directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    /// Plain files whose name ends with the configured suffix.
    pub matching_files: usize,

    /// Immediate subdirectories.
    pub subdirectories: usize,
}

/// Entry names of one snapshot, classified.
#[derive(Debug, Default)]
struct Tally {
    /// Matching image files, in name order.
    matching: Vec<String>,

    /// Immediate subdirectories, in name order.
    directories: Vec<String>,
}

impl Tally {
    fn counts(&self) -> Counts {
        Counts {
            matching_files: self.matching.len(),
            subdirectories: self.directories.len(),
        }
    }
}

/// Watches one directory and keeps live counts of matching images and
/// subdirectories.
///
/// Counts are recomputed wholesale from a fresh snapshot, never adjusted
/// incrementally, so any number of filesystem changes between two
/// recomputes is tolerated. Every query forces a recompute before
/// answering; callers never reason about whether a background update has
/// landed yet. Instances are independent and any number can coexist in
/// one process.
pub struct Gallery {
    config: WatchConfig,
    counts: Arc<RwLock<Counts>>,
    stop_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl Gallery {
    /// Create a gallery rooted at `config.root`, creating the directory
    /// if it does not exist yet.
    ///
    /// Fails if the path is occupied by a non-directory or cannot be
    /// created; no partially constructed gallery is returned.
    pub fn new(config: WatchConfig) -> Result<Self> {
        if config.root.exists() {
            if !config.root.is_dir() {
                return Err(GalleryError::NotADirectory(config.root.clone()));
            }
        } else {
            fs::create_dir_all(&config.root).map_err(|source| GalleryError::RootUnavailable {
                path: config.root.clone(),
                source,
            })?;
        }

        Ok(Self {
            config,
            counts: Arc::new(RwLock::new(Counts::default())),
            stop_tx: None,
            task: None,
        })
    }

    /// Root directory being watched.
    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// Start the poll loop and the coordinating task.
    ///
    /// Blocks until the watcher has completed its initial read, so the
    /// query operations are meaningful as soon as this returns.
    pub async fn start(&mut self) -> Result<()> {
        if self.task.is_some() {
            return Err(GalleryError::AlreadyStarted);
        }

        let watcher = DirWatcher::new(self.config.clone()).start().await?;

        // Seed the counts so they are valid before any notification.
        match recompute(&self.config) {
            Ok(tally) => *self.counts.write().await = tally.counts(),
            Err(e) => {
                watcher.stop().await;
                return Err(e);
            }
        }

        let (stop_tx, stop_rx) = oneshot::channel();
        let config = self.config.clone();
        let counts = Arc::clone(&self.counts);
        self.task = Some(tokio::spawn(coordinate(config, counts, watcher, stop_rx)));
        self.stop_tx = Some(stop_tx);

        info!("gallery started at {}", self.config.root.display());
        Ok(())
    }

    /// Number of matching image files, recomputed on the spot.
    pub async fn png_count(&self) -> Result<usize> {
        self.refresh().await?;
        Ok(self.counts.read().await.matching_files)
    }

    /// Number of immediate subdirectories, recomputed on the spot.
    pub async fn dir_count(&self) -> Result<usize> {
        self.refresh().await?;
        Ok(self.counts.read().await.subdirectories)
    }

    /// Names of matching image files, in name order.
    pub async fn file_names(&self) -> Result<Vec<String>> {
        Ok(self.refresh().await?.matching)
    }

    /// Names of immediate subdirectories, in name order.
    pub async fn dir_list(&self) -> Result<Vec<String>> {
        Ok(self.refresh().await?.directories)
    }

    /// Stop the coordinating task and the underlying watcher.
    ///
    /// Returns only after both tasks have exited; no update is applied
    /// after this resolves. Does nothing if the gallery never started.
    pub async fn stop(&mut self) {
        let (Some(stop_tx), Some(task)) = (self.stop_tx.take(), self.task.take()) else {
            return;
        };

        let _ = stop_tx.send(());
        if let Err(e) = task.await {
            warn!("coordinating task failed: {e}");
        }

        info!("gallery stopped at {}", self.config.root.display());
    }

    /// Recompute from a fresh snapshot and store the resulting counts.
    async fn refresh(&self) -> Result<Tally> {
        let tally = recompute(&self.config)?;
        *self.counts.write().await = tally.counts();
        Ok(tally)
    }
}

/// Take a fresh snapshot of the root and classify every entry.
///
/// Wholesale replacement: the previous counts never feed into the
/// result.
fn recompute(config: &WatchConfig) -> Result<Tally> {
    let snapshot = Snapshot::capture(&config.root)?;
    let mut tally = Tally::default();

    for entry in snapshot.iter() {
        if entry.is_dir {
            tally.directories.push(entry.name.clone());
        } else if entry.name.ends_with(&config.match_suffix) {
            tally.matching.push(entry.name.clone());
        }
    }

    Ok(tally)
}

/// Bridge watcher notifications to count updates until a stop arrives.
async fn coordinate(
    config: WatchConfig,
    counts: Arc<RwLock<Counts>>,
    mut watcher: WatcherHandle,
    mut stop_rx: oneshot::Receiver<()>,
) {
    loop {
        tokio::select! {
            Some(event) = watcher.changes.recv() => {
                debug!("change observed in {}", event.path.display());
                match recompute(&config) {
                    Ok(tally) => *counts.write().await = tally.counts(),
                    // Keep the last good counts until the next cycle.
                    Err(e) => warn!("recompute failed for {}: {e}", config.root.display()),
                }
            }
            Some(e) = watcher.errors.recv() => {
                warn!("watcher error on {}: {e}", config.root.display());
            }
            _ = &mut stop_rx => break,
        }
    }

    watcher.stop().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use tempfile::TempDir;

    fn fast_config(root: &Path) -> WatchConfig {
        WatchConfig::new(root).with_poll_interval(Duration::from_millis(25))
    }

    #[test]
    fn test_new_creates_missing_root() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("gallery");

        let gallery = Gallery::new(WatchConfig::new(&root)).unwrap();

        assert!(root.is_dir());
        assert_eq!(gallery.root(), root);
    }

    #[test]
    fn test_new_rejects_plain_file_root() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("occupied");
        fs::write(&root, b"not a directory").unwrap();

        let result = Gallery::new(WatchConfig::new(&root));
        assert!(matches!(result, Err(GalleryError::NotADirectory(_))));
    }

    #[tokio::test]
    async fn test_counts_start_at_zero() {
        let dir = TempDir::new().unwrap();
        let mut gallery = Gallery::new(fast_config(dir.path())).unwrap();
        gallery.start().await.unwrap();

        assert_eq!(gallery.png_count().await.unwrap(), 0);
        assert_eq!(gallery.dir_count().await.unwrap(), 0);

        gallery.stop().await;
    }

    #[tokio::test]
    async fn test_queries_force_recompute() {
        let dir = TempDir::new().unwrap();
        let mut gallery = Gallery::new(fast_config(dir.path())).unwrap();
        gallery.start().await.unwrap();

        // No sleep: the query itself must take a fresh snapshot.
        fixture::create_png(&dir.path().join("fresh.png")).unwrap();

        assert_eq!(gallery.png_count().await.unwrap(), 1);
        gallery.stop().await;
    }

    #[tokio::test]
    async fn test_suffix_match_is_case_sensitive() {
        let dir = TempDir::new().unwrap();
        fixture::create_png(&dir.path().join("a.png")).unwrap();
        fixture::create_png(&dir.path().join("B.PNG")).unwrap();
        fixture::create_subdir(&dir.path().join("thumbs")).unwrap();

        let mut gallery = Gallery::new(fast_config(dir.path())).unwrap();
        gallery.start().await.unwrap();

        assert_eq!(gallery.file_names().await.unwrap(), vec!["a.png"]);
        assert_eq!(gallery.dir_list().await.unwrap(), vec!["thumbs"]);

        gallery.stop().await;
    }

    #[tokio::test]
    async fn test_second_start_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut gallery = Gallery::new(fast_config(dir.path())).unwrap();
        gallery.start().await.unwrap();

        let again = gallery.start().await;
        assert!(matches!(again, Err(GalleryError::AlreadyStarted)));

        gallery.stop().await;
    }

    #[tokio::test]
    async fn test_queries_are_idempotent() {
        let dir = TempDir::new().unwrap();
        fixture::create_png(&dir.path().join("a.png")).unwrap();

        let mut gallery = Gallery::new(fast_config(dir.path())).unwrap();
        gallery.start().await.unwrap();

        let first = gallery.file_names().await.unwrap();
        let second = gallery.file_names().await.unwrap();
        assert_eq!(first, second);

        gallery.stop().await;
    }
}
