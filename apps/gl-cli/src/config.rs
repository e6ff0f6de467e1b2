// config.rs — Ledger configuration and project layout.
//
// LedgerConfig determines where the CLI keeps its state: the snapshot the
// substrate persists to, the operation journal, the event log, and the
// tick-clock height file. The `for_project()` constructor lays everything
// out under a `.goalledger/` directory in the project root.
//
// An optional `goalledger.toml` at the project root sets the default
// caller so not every invocation needs `--caller`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Fallback principal when neither `--caller` nor `goalledger.toml`
/// supplies one.
pub const DEFAULT_CALLER: &str = "deployer";

/// Where the CLI keeps ledger state for one project.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Root directory of the project.
    pub workspace_root: PathBuf,

    /// The substrate snapshot (the ledger state itself).
    pub ledger_file: PathBuf,

    /// The append-only operation journal.
    pub journal_file: PathBuf,

    /// The event notification log.
    pub events_log: PathBuf,

    /// The persisted tick-clock height.
    pub height_file: PathBuf,

    /// Optional project config (`goalledger.toml`).
    pub config_file: PathBuf,
}

impl LedgerConfig {
    /// Create a config with the standard `.goalledger/` layout.
    pub fn for_project(project_root: impl AsRef<Path>) -> Self {
        let root = project_root.as_ref().to_path_buf();
        let data_dir = root.join(".goalledger");
        Self {
            ledger_file: data_dir.join("ledger.json"),
            journal_file: data_dir.join("journal.jsonl"),
            events_log: data_dir.join("events.jsonl"),
            height_file: data_dir.join("height"),
            config_file: root.join("goalledger.toml"),
            workspace_root: root,
        }
    }

    /// Resolve the caller identity: explicit flag, then project config,
    /// then the default.
    pub fn resolve_caller(&self, flag: Option<&str>) -> anyhow::Result<String> {
        if let Some(caller) = flag {
            return Ok(caller.to_string());
        }
        if self.config_file.exists() {
            let raw = fs::read_to_string(&self.config_file).with_context(|| {
                format!("failed to read {}", self.config_file.display())
            })?;
            let parsed: ProjectConfig = toml::from_str(&raw).with_context(|| {
                format!("failed to parse {}", self.config_file.display())
            })?;
            if let Some(caller) = parsed.caller {
                return Ok(caller);
            }
        }
        Ok(DEFAULT_CALLER.to_string())
    }
}

/// The recognized keys of `goalledger.toml`.
#[derive(Debug, Default, Deserialize)]
struct ProjectConfig {
    /// Default principal for operations run from this project.
    caller: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn layout_lands_under_the_data_directory() {
        let config = LedgerConfig::for_project("/work/project");
        assert_eq!(
            config.ledger_file,
            PathBuf::from("/work/project/.goalledger/ledger.json")
        );
        assert_eq!(
            config.journal_file,
            PathBuf::from("/work/project/.goalledger/journal.jsonl")
        );
        assert_eq!(
            config.config_file,
            PathBuf::from("/work/project/goalledger.toml")
        );
    }

    #[test]
    fn flag_wins_over_config_and_default() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("goalledger.toml"), "caller = \"alice\"\n").unwrap();
        let config = LedgerConfig::for_project(dir.path());

        assert_eq!(config.resolve_caller(Some("bob")).unwrap(), "bob");
        assert_eq!(config.resolve_caller(None).unwrap(), "alice");
    }

    #[test]
    fn missing_config_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let config = LedgerConfig::for_project(dir.path());
        assert_eq!(config.resolve_caller(None).unwrap(), DEFAULT_CALLER);
    }

    #[test]
    fn config_without_caller_key_falls_back_to_default() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("goalledger.toml"), "# no caller here\n").unwrap();
        let config = LedgerConfig::for_project(dir.path());
        assert_eq!(config.resolve_caller(None).unwrap(), DEFAULT_CALLER);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("goalledger.toml"), "caller = [not toml").unwrap();
        let config = LedgerConfig::for_project(dir.path());
        assert!(config.resolve_caller(None).is_err());
    }
}
