//! Configuration for the gallery watcher.

use std::path::PathBuf;
use std::time::Duration;

/// Poll interval used when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Suffix counted as a matching image when none is configured.
pub const DEFAULT_MATCH_SUFFIX: &str = ".png";

/// Configuration for a watched gallery directory.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Root directory to watch. Created at construction if absent.
    pub root: PathBuf,

    /// How long the poll loop sleeps between cycles.
    pub poll_interval: Duration,

    /// Suffix a plain file must carry to count as a matching image.
    /// Compared case-sensitively against the full entry name.
    pub match_suffix: String,
}

impl WatchConfig {
    /// Create a config for the given root with default interval and suffix.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            match_suffix: DEFAULT_MATCH_SUFFIX.to_string(),
        }
    }

    /// Set the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the matching suffix.
    pub fn with_match_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.match_suffix = suffix.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    #[test]
    fn test_defaults() {
        let config = WatchConfig::new("/srv/gallery");

        assert_eq!(config.root, Path::new("/srv/gallery"));
        assert_eq!(config.poll_interval, DEFAULT_POLL_INTERVAL);
        assert_eq!(config.match_suffix, ".png");
    }

    #[test]
    fn test_builder_overrides() {
        let config = WatchConfig::new("/srv/gallery")
            .with_poll_interval(Duration::from_millis(50))
            .with_match_suffix(".jpeg");

        assert_eq!(config.poll_interval, Duration::from_millis(50));
        assert_eq!(config.match_suffix, ".jpeg");
    }
}
