//! # Gallery Watch
//!
//! Polling directory watcher that keeps a live count of PNG images and
//! subdirectories under a single root.
//!
//! Change detection is two-tier: each poll cycle first compares the
//! directory's own size and modification time against the previous
//! cycle (cheap), and when that is inconclusive it diffs a full,
//! name-sorted listing against the previous one (authoritative).
//! Confirmed changes flow over a channel to the [`Gallery`] aggregator,
//! which recomputes its counts from a fresh snapshot.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  DirWatcher ──► ChangeEvent ──► Gallery ──► Counts      │
//! │      │                             ▲                    │
//! │      └────────── errors ───────────┘                    │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Watching is non-recursive: only the immediate entries of the root
//! are observed.

pub mod config;
pub mod error;
pub mod event;
pub mod fixture;
pub mod gallery;
pub mod snapshot;
pub mod watcher;

pub use config::WatchConfig;
pub use error::{GalleryError, Result};
pub use event::ChangeEvent;
pub use gallery::{Counts, Gallery};
pub use snapshot::{DirStat, EntryRecord, Snapshot};
pub use watcher::{DirWatcher, WatcherHandle};
