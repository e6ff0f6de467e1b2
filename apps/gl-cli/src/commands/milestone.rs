// milestone.rs — Milestone subcommands: add, complete, show, list.

use clap::Subcommand;
use gl_journal::OperationKind;

use crate::commands::{read_only_engine, Session};
use crate::config::LedgerConfig;

#[derive(Subcommand)]
pub enum MilestoneCommands {
    /// Add a milestone to a goal (owner only).
    Add {
        /// Goal id.
        goal_id: u64,
        /// Short milestone title (ASCII, at most 64 characters).
        title: String,
        /// What completing the milestone means (at most 256 characters).
        #[arg(long)]
        description: String,
    },
    /// Complete a milestone (owner only, once).
    Complete {
        /// Goal id.
        goal_id: u64,
        /// Milestone id within the goal.
        milestone_id: u64,
    },
    /// Show one milestone in detail.
    Show {
        /// Goal id.
        goal_id: u64,
        /// Milestone id within the goal.
        milestone_id: u64,
    },
    /// List a goal's milestones.
    List {
        /// Goal id.
        goal_id: u64,
    },
}

pub fn execute(
    cmd: &MilestoneCommands,
    config: &LedgerConfig,
    caller: Option<&str>,
    height: Option<u64>,
) -> anyhow::Result<()> {
    match cmd {
        MilestoneCommands::Add {
            goal_id,
            title,
            description,
        } => {
            let mut session = Session::open(config, caller, height)?;
            let result = session
                .engine
                .add_milestone(&session.ctx, *goal_id, title.as_str(), description.as_str());
            let entry = session.entry(OperationKind::AddMilestone).with_goal(*goal_id);
            let entry = match &result {
                Ok(id) => entry.with_milestone(*id),
                Err(_) => entry,
            };
            let milestone_id = session.record(entry, result)?;
            println!("Milestone added: {} (goal {})", milestone_id, goal_id);
            Ok(())
        }

        MilestoneCommands::Complete {
            goal_id,
            milestone_id,
        } => {
            let mut session = Session::open(config, caller, height)?;
            let result = session
                .engine
                .complete_milestone(&session.ctx, *goal_id, *milestone_id);
            let entry = session
                .entry(OperationKind::CompleteMilestone)
                .with_goal(*goal_id)
                .with_milestone(*milestone_id);
            session.record(entry, result)?;
            println!("Milestone {} on goal {} completed.", milestone_id, goal_id);

            // Completing the last milestone closes the goal; worth saying.
            if let Some(goal) = session.engine.get_goal(*goal_id)? {
                if goal.status.is_terminal() {
                    println!("Goal {} is now {}.", goal_id, goal.status);
                }
            }
            Ok(())
        }

        MilestoneCommands::Show {
            goal_id,
            milestone_id,
        } => {
            let engine = read_only_engine(config)?;
            match engine.get_milestone(*goal_id, *milestone_id)? {
                None => println!("No milestone {} on goal {}.", milestone_id, goal_id),
                Some(m) => {
                    println!("Milestone {} (goal {}): {}", m.milestone_id, m.goal_id, m.title);
                    println!(
                        "  Status:      {}",
                        if m.completed { "completed" } else { "open" }
                    );
                    println!("  Added at:    height {}", m.added_at_height);
                    match m.completed_at_height {
                        Some(h) => println!("  Completed:   height {}", h),
                        None => println!("  Completed:   -"),
                    }
                    println!("  Description: {}", m.description);
                }
            }
            Ok(())
        }

        MilestoneCommands::List { goal_id } => {
            let engine = read_only_engine(config)?;
            let milestones = engine.list_milestones(*goal_id)?;
            if milestones.is_empty() {
                println!("No milestones on goal {}.", goal_id);
                return Ok(());
            }

            println!("{:<5} {:<10} TITLE", "ID", "STATUS");
            println!("{}", "-".repeat(60));
            for m in &milestones {
                println!(
                    "{:<5} {:<10} {}",
                    m.milestone_id,
                    if m.completed { "completed" } else { "open" },
                    m.title,
                );
            }

            if let Some(goal) = engine.get_goal(*goal_id)? {
                println!();
                println!(
                    "{}/{} complete ({}%)",
                    goal.completed_milestone_count,
                    goal.milestone_count,
                    goal.progress_percent()
                );
            }
            Ok(())
        }
    }
}
