// journal.rs — Append-only JSONL journal with hash chaining.
//
// One JSON object per line, append-only, each entry linked to its
// predecessor through `previous_hash`. Opening an existing journal
// recovers the chain state from the last line so new entries keep linking
// correctly across process restarts.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::entry::JournalEntry;
use crate::error::JournalError;
use crate::hasher;

/// An append-only operation journal backed by a JSONL file.
pub struct OperationJournal {
    writer: BufWriter<File>,
    path: PathBuf,
    /// Hash of the last line written — becomes the next entry's link.
    last_hash: Option<String>,
}

impl OperationJournal {
    /// Open (or create) a journal at the given path, recovering the hash
    /// chain from existing content. Parent directories are created as
    /// needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, JournalError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| JournalError::Open {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let last_hash = if path.exists() {
            Self::read_last_hash(&path)?
        } else {
            None
        };

        // Append mode only — existing lines are never rewritten.
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| JournalError::Open {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            writer: BufWriter::new(file),
            path,
            last_hash,
        })
    }

    /// The journal location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the hash of the last entry in an existing journal file, so a
    /// reopened journal keeps linking new entries to the existing chain.
    fn read_last_hash(path: &Path) -> Result<Option<String>, JournalError> {
        let file = File::open(path).map_err(|source| JournalError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);
        let mut last_line: Option<String> = None;

        for line in reader.lines() {
            let line = line?;
            if !line.trim().is_empty() {
                last_line = Some(line);
            }
        }

        Ok(last_line.map(|line| hasher::hash_line(&line)))
    }

    /// Append an entry, linking it to the previous one. Flushes before
    /// returning so the entry is handed to the OS even if the process
    /// dies right after.
    pub fn append(&mut self, mut entry: JournalEntry) -> Result<(), JournalError> {
        entry.previous_hash = self.last_hash.clone();

        let line = serde_json::to_string(&entry)?;
        self.last_hash = Some(hasher::hash_line(&line));

        writeln!(self.writer, "{}", line)?;
        self.writer.flush()?;
        tracing::trace!(operation = entry.operation.as_str(), "journal entry appended");
        Ok(())
    }

    /// Read all entries from a journal file, oldest first. Blank lines are
    /// skipped; a malformed line is an error.
    pub fn read_all(path: impl AsRef<Path>) -> Result<Vec<JournalEntry>, JournalError> {
        let file = File::open(path.as_ref()).map_err(|source| JournalError::Open {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            entries.push(serde_json::from_str(&line)?);
        }
        Ok(entries)
    }

    /// Verify the hash chain of a journal file. Returns the number of
    /// entries when the chain holds; fails with [`JournalError::BrokenChain`]
    /// at the first line whose link does not match.
    pub fn verify_chain(path: impl AsRef<Path>) -> Result<usize, JournalError> {
        let file = File::open(path.as_ref()).map_err(|source| JournalError::Open {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);

        let mut expected: Option<String> = None;
        let mut count = 0usize;

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let entry: JournalEntry = serde_json::from_str(&line)?;

            if entry.previous_hash != expected {
                return Err(JournalError::BrokenChain {
                    line: index + 1,
                    expected: expected.unwrap_or_else(|| "none".to_string()),
                    actual: entry
                        .previous_hash
                        .unwrap_or_else(|| "none".to_string()),
                });
            }

            expected = Some(hasher::hash_line(&line));
            count += 1;
        }

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::OperationKind;
    use std::fs;
    use tempfile::tempdir;

    fn entry(caller: &str) -> JournalEntry {
        JournalEntry::new(caller, OperationKind::CreateGoal, 5).with_goal(1)
    }

    #[test]
    fn append_and_read_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.jsonl");

        let mut journal = OperationJournal::open(&path).unwrap();
        journal.append(entry("alice")).unwrap();
        journal.append(entry("bob")).unwrap();

        let entries = OperationJournal::read_all(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].caller, "alice");
        assert_eq!(entries[1].caller, "bob");
    }

    #[test]
    fn entries_are_chained() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.jsonl");

        let mut journal = OperationJournal::open(&path).unwrap();
        journal.append(entry("alice")).unwrap();
        journal.append(entry("bob")).unwrap();

        let entries = OperationJournal::read_all(&path).unwrap();
        assert!(entries[0].previous_hash.is_none());
        assert!(entries[1].previous_hash.is_some());

        assert_eq!(OperationJournal::verify_chain(&path).unwrap(), 2);
    }

    #[test]
    fn chain_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.jsonl");

        {
            let mut journal = OperationJournal::open(&path).unwrap();
            journal.append(entry("alice")).unwrap();
        }
        {
            let mut journal = OperationJournal::open(&path).unwrap();
            journal.append(entry("bob")).unwrap();
        }

        assert_eq!(OperationJournal::verify_chain(&path).unwrap(), 2);
    }

    #[test]
    fn edited_line_breaks_the_chain() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.jsonl");

        let mut journal = OperationJournal::open(&path).unwrap();
        journal.append(entry("alice")).unwrap();
        journal.append(entry("bob")).unwrap();
        journal.append(entry("carol")).unwrap();
        drop(journal);

        // Tamper with the middle line.
        let content = fs::read_to_string(&path).unwrap();
        let tampered: Vec<String> = content
            .lines()
            .map(|l| l.replace("bob", "eve"))
            .collect();
        fs::write(&path, tampered.join("\n") + "\n").unwrap();

        let result = OperationJournal::verify_chain(&path);
        assert!(matches!(result, Err(JournalError::BrokenChain { line: 3, .. })));
    }

    #[test]
    fn deleted_line_breaks_the_chain() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.jsonl");

        let mut journal = OperationJournal::open(&path).unwrap();
        journal.append(entry("alice")).unwrap();
        journal.append(entry("bob")).unwrap();
        journal.append(entry("carol")).unwrap();
        drop(journal);

        let content = fs::read_to_string(&path).unwrap();
        let truncated: Vec<&str> = content.lines().filter(|l| !l.contains("bob")).collect();
        fs::write(&path, truncated.join("\n") + "\n").unwrap();

        assert!(matches!(
            OperationJournal::verify_chain(&path),
            Err(JournalError::BrokenChain { .. })
        ));
    }

    #[test]
    fn empty_journal_verifies_as_zero_entries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("journal.jsonl");
        let _ = OperationJournal::open(&path).unwrap();
        assert_eq!(OperationJournal::verify_chain(&path).unwrap(), 0);
    }

    #[test]
    fn open_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/logs/journal.jsonl");
        let mut journal = OperationJournal::open(&path).unwrap();
        journal.append(entry("alice")).unwrap();
        assert!(path.exists());
    }
}
