// error.rs — Error types for the operation journal.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while writing or verifying a journal.
#[derive(Debug, Error)]
pub enum JournalError {
    /// The journal file could not be opened or created.
    #[error("failed to open journal at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A read or write on an open journal failed.
    #[error("journal I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line in the journal is not a valid entry.
    #[error("malformed journal entry: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The hash chain does not hold at the given line (1-based). The
    /// journal has been edited, truncated in the middle, or had lines
    /// inserted.
    #[error("hash chain broken at line {line}: expected previous hash {expected}, found {actual}")]
    BrokenChain {
        line: usize,
        expected: String,
        actual: String,
    },
}
