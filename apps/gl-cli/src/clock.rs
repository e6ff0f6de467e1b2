// clock.rs — The tick clock: the CLI's block height supplier.
//
// The engine needs a monotonic height but never reads a clock itself; in
// a chain deployment the height comes from the chain, and here it comes
// from a counter file that ticks once per mutating command. `--height`
// bypasses the clock entirely for scripted or replayed runs.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

/// A persisted monotonic counter standing in for block height.
pub struct TickClock {
    path: PathBuf,
    height: u64,
}

impl TickClock {
    /// Open the clock, reading the last persisted height (0 if the file
    /// does not exist yet).
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let height = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            raw.trim()
                .parse::<u64>()
                .with_context(|| format!("corrupt height file {}", path.display()))?
        } else {
            0
        };
        Ok(Self { path, height })
    }

    /// The current height without advancing.
    pub fn current(&self) -> u64 {
        self.height
    }

    /// Advance one tick, persist, and return the new height.
    pub fn advance(&mut self) -> anyhow::Result<u64> {
        self.height += 1;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&self.path, self.height.to_string())
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn starts_at_zero_and_ticks_upward() {
        let dir = tempdir().unwrap();
        let mut clock = TickClock::open(dir.path().join("height")).unwrap();
        assert_eq!(clock.current(), 0);
        assert_eq!(clock.advance().unwrap(), 1);
        assert_eq!(clock.advance().unwrap(), 2);
        assert_eq!(clock.current(), 2);
    }

    #[test]
    fn height_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("height");

        {
            let mut clock = TickClock::open(&path).unwrap();
            clock.advance().unwrap();
            clock.advance().unwrap();
        }

        let clock = TickClock::open(&path).unwrap();
        assert_eq!(clock.current(), 2);
    }

    #[test]
    fn corrupt_height_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("height");
        fs::write(&path, "not a number").unwrap();
        assert!(TickClock::open(&path).is_err());
    }
}
