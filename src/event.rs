//! Change notifications emitted by the poll loop.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A confirmed change in the watched directory.
///
/// At most one event is emitted per poll cycle, however many entries
/// actually changed within the interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// The watched directory that changed.
    pub path: PathBuf,

    /// When the poll loop confirmed the change.
    pub observed_at: DateTime<Utc>,
}

impl ChangeEvent {
    /// Create an event for the given directory, stamped now.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            observed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_event_creation() {
        let event = ChangeEvent::new("/srv/gallery");
        assert_eq!(event.path, Path::new("/srv/gallery"));
    }

    #[test]
    fn test_event_serialization() {
        let event = ChangeEvent::new("/srv/gallery");
        let json = serde_json::to_string(&event).unwrap();

        let back: ChangeEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back.path, event.path);
        assert_eq!(back.observed_at, event.observed_at);
    }
}
