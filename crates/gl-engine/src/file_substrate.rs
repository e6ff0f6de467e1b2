// file_substrate.rs — JSON snapshot persistence for the substrate.
//
// The whole mapping is one JSON object on disk, keyed by the stable key
// encoding, with each value stored as the record's own JSON. That keeps
// the ledger inspectable with standard tools and small enough to rewrite
// per commit.
//
// A commit serializes the next snapshot to a sibling temp file and renames
// it over the old one. Rename is the atomicity point: a reader (or a crash)
// sees the previous snapshot or the new one, never a half-written batch.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::substrate::{StateKey, StorageFault, Substrate, WriteBatch};

/// A file-backed substrate holding the full mapping in memory and
/// snapshotting it to disk on every commit.
pub struct FileSubstrate {
    path: PathBuf,
    map: BTreeMap<String, serde_json::Value>,
}

impl FileSubstrate {
    /// Open (or create) a snapshot at the given path.
    ///
    /// A missing file is an empty ledger, not an error. Parent directories
    /// are created as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageFault> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageFault::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let map = if path.exists() {
            let json = fs::read_to_string(&path).map_err(|source| StorageFault::Io {
                path: path.display().to_string(),
                source,
            })?;
            serde_json::from_str(&json).map_err(|source| StorageFault::Corrupt {
                key: path.display().to_string(),
                source,
            })?
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, map })
    }

    /// The snapshot location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, map: &BTreeMap<String, serde_json::Value>) -> Result<(), StorageFault> {
        let json =
            serde_json::to_string_pretty(map).map_err(|source| StorageFault::Encode {
                key: self.path.display().to_string(),
                source,
            })?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json).map_err(|source| StorageFault::Io {
            path: tmp.display().to_string(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StorageFault::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        Ok(())
    }
}

impl Substrate for FileSubstrate {
    fn get(&self, key: &StateKey) -> Result<Option<Vec<u8>>, StorageFault> {
        match self.map.get(&key.encode()) {
            None => Ok(None),
            Some(value) => {
                let bytes = serde_json::to_vec(value).map_err(|source| StorageFault::Encode {
                    key: key.encode(),
                    source,
                })?;
                Ok(Some(bytes))
            }
        }
    }

    fn commit(&mut self, batch: WriteBatch) -> Result<(), StorageFault> {
        // Apply to a scratch copy first: if persisting fails, the
        // in-memory view still matches what's on disk.
        let mut next = self.map.clone();
        for (key, bytes) in batch.into_writes() {
            let value: serde_json::Value =
                serde_json::from_slice(&bytes).map_err(|source| StorageFault::Corrupt {
                    key: key.encode(),
                    source,
                })?;
            next.insert(key.encode(), value);
        }
        self.persist(&next)?;
        self.map = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn open_missing_file_starts_empty() {
        let dir = tempdir().unwrap();
        let sub = FileSubstrate::open(dir.path().join("ledger.json")).unwrap();
        assert!(sub.get(&StateKey::GoalCounter).unwrap().is_none());
    }

    #[test]
    fn open_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/state/ledger.json");
        let mut sub = FileSubstrate::open(&path).unwrap();

        let mut batch = WriteBatch::new();
        batch.put(StateKey::GoalCounter, &1u64).unwrap();
        sub.commit(batch).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn committed_state_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.json");

        {
            let mut sub = FileSubstrate::open(&path).unwrap();
            let mut batch = WriteBatch::new();
            batch.put(StateKey::GoalCounter, &3u64).unwrap();
            batch.put(StateKey::Goal(3), &"a goal record").unwrap();
            sub.commit(batch).unwrap();
        }

        {
            let sub = FileSubstrate::open(&path).unwrap();
            let counter: Option<u64> = sub.get_record(&StateKey::GoalCounter).unwrap();
            assert_eq!(counter, Some(3));
            let record: Option<String> = sub.get_record(&StateKey::Goal(3)).unwrap();
            assert_eq!(record.as_deref(), Some("a goal record"));
        }
    }

    #[test]
    fn commits_accumulate() {
        let dir = tempdir().unwrap();
        let mut sub = FileSubstrate::open(dir.path().join("ledger.json")).unwrap();

        let mut batch = WriteBatch::new();
        batch.put(StateKey::Goal(1), &"first").unwrap();
        sub.commit(batch).unwrap();

        let mut batch = WriteBatch::new();
        batch.put(StateKey::Goal(2), &"second").unwrap();
        sub.commit(batch).unwrap();

        let first: Option<String> = sub.get_record(&StateKey::Goal(1)).unwrap();
        let second: Option<String> = sub.get_record(&StateKey::Goal(2)).unwrap();
        assert_eq!(first.as_deref(), Some("first"));
        assert_eq!(second.as_deref(), Some("second"));
    }

    #[test]
    fn no_temp_file_is_left_behind() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let mut sub = FileSubstrate::open(&path).unwrap();

        let mut batch = WriteBatch::new();
        batch.put(StateKey::GoalCounter, &1u64).unwrap();
        sub.commit(batch).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn corrupt_snapshot_is_reported_not_swallowed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        fs::write(&path, "{ this is not json").unwrap();

        match FileSubstrate::open(&path) {
            Err(StorageFault::Corrupt { .. }) => {}
            other => panic!("expected corrupt-snapshot fault, got {:?}", other.map(|_| ())),
        }
    }
}
