//! # gl-cli
//!
//! Command-line interface for Goal Ledger.
//!
//! Drives a project-local ledger stored under `.goalledger/`:
//! - `gl goal create/update/abandon/complete/show/list` — manage goals
//! - `gl milestone add/complete/show/list` — manage a goal's milestones
//! - `gl journal verify/tail` — inspect the tamper-evident operation journal
//!
//! The CLI supplies everything the engine treats as external: the caller
//! identity (`--caller` or `goalledger.toml`), the block height (a
//! persisted tick counter, or `--height`), and the persistence substrate
//! (the JSON snapshot under `.goalledger/`).

mod clock;
mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use config::LedgerConfig;

/// Goal Ledger CLI — track goals and milestones on a local ledger.
#[derive(Parser)]
#[command(name = "gl", version, about)]
struct Cli {
    /// Project root directory (defaults to current directory).
    #[arg(long, default_value = ".")]
    project_root: PathBuf,

    /// Principal to run operations as (overrides goalledger.toml).
    #[arg(long)]
    caller: Option<String>,

    /// Block height to run at (overrides the local tick clock).
    #[arg(long)]
    height: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage goals.
    Goal {
        #[command(subcommand)]
        command: commands::goal::GoalCommands,
    },
    /// Manage milestones on a goal.
    Milestone {
        #[command(subcommand)]
        command: commands::milestone::MilestoneCommands,
    },
    /// Inspect the operation journal.
    Journal {
        #[command(subcommand)]
        command: commands::journal::JournalCommands,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("gl_engine=warn".parse()?)
                .add_directive("gl_cli=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let project_root = cli.project_root.canonicalize().unwrap_or(cli.project_root);
    let config = LedgerConfig::for_project(&project_root);

    match &cli.command {
        Commands::Goal { command } => {
            commands::goal::execute(command, &config, cli.caller.as_deref(), cli.height)
        }
        Commands::Milestone { command } => {
            commands::milestone::execute(command, &config, cli.caller.as_deref(), cli.height)
        }
        Commands::Journal { command } => commands::journal::execute(command, &config),
    }
}
