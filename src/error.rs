//! Error types for the gallery watcher.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for gallery operations.
pub type Result<T> = std::result::Result<T, GalleryError>;

/// Errors that can occur while watching a gallery directory.
#[derive(Error, Debug)]
pub enum GalleryError {
    /// Root path missing and could not be created.
    #[error("root path '{}' could not be created: {source}", .path.display())]
    RootUnavailable {
        /// The path that was requested.
        path: PathBuf,
        /// The underlying failure.
        source: std::io::Error,
    },

    /// Root path exists but is not a directory.
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The poll loop ended before reporting its initial read.
    #[error("watcher channel closed")]
    ChannelClosed,

    /// Start was called on an already running gallery.
    #[error("gallery already started")]
    AlreadyStarted,
}
