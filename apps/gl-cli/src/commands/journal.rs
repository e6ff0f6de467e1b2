// journal.rs — Journal subcommands: verify, tail.

use clap::Subcommand;
use gl_journal::{JournalError, OperationJournal, Outcome};

use crate::config::LedgerConfig;

#[derive(Subcommand)]
pub enum JournalCommands {
    /// Verify the journal's hash chain integrity.
    Verify {
        /// Path to the journal (defaults to .goalledger/journal.jsonl).
        #[arg(long)]
        journal: Option<String>,
    },
    /// Show recent journal entries.
    Tail {
        /// Path to the journal (defaults to .goalledger/journal.jsonl).
        #[arg(long)]
        journal: Option<String>,
        /// Number of entries to show.
        #[arg(short, default_value = "10")]
        n: usize,
    },
}

pub fn execute(cmd: &JournalCommands, config: &LedgerConfig) -> anyhow::Result<()> {
    match cmd {
        JournalCommands::Verify { journal } => {
            let path = journal
                .as_ref()
                .map(std::path::PathBuf::from)
                .unwrap_or_else(|| config.journal_file.clone());

            if !path.exists() {
                println!("No journal found at {}", path.display());
                return Ok(());
            }

            match OperationJournal::verify_chain(&path) {
                Ok(count) => {
                    println!("Journal verified: {} entr(ies), hash chain intact.", count);
                }
                Err(JournalError::BrokenChain {
                    line,
                    expected,
                    actual,
                }) => {
                    println!("CHAIN BROKEN at line {}:", line);
                    println!("  Expected previous hash: {}", expected);
                    println!("  Actual previous hash:   {}", actual);
                    println!();
                    println!("The journal may have been tampered with.");
                    anyhow::bail!("journal integrity check failed");
                }
                Err(e) => return Err(e.into()),
            }
            Ok(())
        }

        JournalCommands::Tail { journal, n } => {
            let path = journal
                .as_ref()
                .map(std::path::PathBuf::from)
                .unwrap_or_else(|| config.journal_file.clone());

            if !path.exists() {
                println!("No journal found at {}", path.display());
                return Ok(());
            }

            let entries = OperationJournal::read_all(&path)?;
            let start = entries.len().saturating_sub(*n);
            let recent = &entries[start..];

            if recent.is_empty() {
                println!("No journal entries.");
                return Ok(());
            }

            println!(
                "{:<26} {:<12} {:<20} {:<8} TARGET",
                "RECORDED", "CALLER", "OPERATION", "HEIGHT"
            );
            println!("{}", "-".repeat(90));
            for entry in recent {
                let target = match (entry.goal_id, entry.milestone_id) {
                    (Some(g), Some(m)) => format!("goal {} / milestone {}", g, m),
                    (Some(g), None) => format!("goal {}", g),
                    _ => "-".to_string(),
                };
                let operation = match &entry.outcome {
                    Outcome::Accepted => entry.operation.as_str().to_string(),
                    Outcome::Rejected { .. } => format!("{} (rejected)", entry.operation.as_str()),
                };
                println!(
                    "{:<26} {:<12} {:<20} {:<8} {}",
                    entry.recorded_at.format("%Y-%m-%d %H:%M:%S"),
                    entry.caller,
                    operation,
                    entry.block_height,
                    target,
                );
            }
            Ok(())
        }
    }
}
