//! Directory snapshots and the metadata used to diff them.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use crate::error::Result;

/// Size and modification time of the directory entry itself.
///
/// This is the cheap change signal: a mismatch against the previous
/// cycle means something moved. Directory metadata update semantics vary
/// by platform and filesystem, so a matching stat is never taken as
/// proof that nothing changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirStat {
    /// Reported size of the directory entry.
    pub size: u64,

    /// Modification time of the directory entry.
    pub modified: SystemTime,
}

impl DirStat {
    /// Stat the directory at `path`.
    pub fn read(path: &Path) -> Result<Self> {
        let meta = fs::metadata(path)?;
        Ok(Self {
            size: meta.len(),
            modified: meta.modified()?,
        })
    }
}

/// One directory entry as seen by a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRecord {
    /// Entry name, unique within a snapshot.
    pub name: String,

    /// Whether the entry is a directory.
    pub is_dir: bool,

    /// Entry size in bytes.
    pub size: u64,

    /// Modification time of the entry.
    pub modified: SystemTime,
}

/// An ordered capture of a directory's entries at one instant.
///
/// Entries are sorted by name so two snapshots of the same directory
/// can be compared positionally. The capture is best-effort: it is not
/// transactional against concurrent writers.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    entries: Vec<EntryRecord>,
}

impl Snapshot {
    /// List `path` and capture every entry's metadata, sorted by name.
    pub fn capture(path: &Path) -> Result<Self> {
        let mut entries = Vec::new();

        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let meta = entry.metadata()?;

            entries.push(EntryRecord {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: meta.is_dir(),
                size: meta.len(),
                modified: meta.modified()?,
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Self { entries })
    }

    /// Number of entries in the snapshot.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot captured no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the captured entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = &EntryRecord> {
        self.entries.iter()
    }

    /// Compare against an earlier snapshot of the same directory.
    ///
    /// A count mismatch decides immediately; otherwise the first
    /// positional mismatch of name, modification time or size decides.
    /// Later entries are not examined.
    pub fn differs_from(&self, other: &Snapshot) -> bool {
        if self.entries.len() != other.entries.len() {
            return true;
        }

        self.entries
            .iter()
            .zip(&other.entries)
            .any(|(a, b)| a.name != b.name || a.modified != b.modified || a.size != b.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_capture_sorts_by_name() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.png"), b"b").unwrap();
        fs::write(dir.path().join("a.png"), b"a").unwrap();
        fs::create_dir(dir.path().join("c")).unwrap();

        let snapshot = Snapshot::capture(dir.path()).unwrap();
        let names: Vec<_> = snapshot.iter().map(|e| e.name.as_str()).collect();

        assert_eq!(names, vec!["a.png", "b.png", "c"]);
        assert_eq!(snapshot.len(), 3);
    }

    #[test]
    fn test_capture_fails_on_missing_path() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone");

        assert!(Snapshot::capture(&missing).is_err());
    }

    #[test]
    fn test_identical_snapshots_do_not_differ() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.png"), b"a").unwrap();

        let first = Snapshot::capture(dir.path()).unwrap();
        let second = Snapshot::capture(dir.path()).unwrap();

        assert!(!second.differs_from(&first));
    }

    #[test]
    fn test_added_entry_differs() {
        let dir = TempDir::new().unwrap();
        let before = Snapshot::capture(dir.path()).unwrap();
        assert!(before.is_empty());

        fs::write(dir.path().join("a.png"), b"a").unwrap();
        let after = Snapshot::capture(dir.path()).unwrap();

        assert!(after.differs_from(&before));
    }

    #[test]
    fn test_size_change_differs() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.png"), b"a").unwrap();
        let before = Snapshot::capture(dir.path()).unwrap();

        fs::write(dir.path().join("a.png"), b"grown").unwrap();
        let after = Snapshot::capture(dir.path()).unwrap();

        assert!(after.differs_from(&before));
    }
}
