// goal.rs — Goal subcommands: create, update, abandon, complete, show, list.

use clap::{Args, Subcommand};
use gl_engine::{Goal, GoalDraft};
use gl_journal::OperationKind;

use crate::commands::{read_only_engine, Session};
use crate::config::LedgerConfig;

/// The caller-editable goal fields, shared by create and update.
#[derive(Args)]
pub struct GoalFields {
    /// Short goal title (ASCII, at most 64 characters).
    pub title: String,

    /// What achieving the goal means (at most 256 characters).
    #[arg(long)]
    pub description: String,

    /// Optional deadline as an absolute block height (must be in the future).
    #[arg(long)]
    pub deadline: Option<u64>,

    /// Urgency from 1 (highest) to 5.
    #[arg(long, default_value_t = 3)]
    pub priority: u8,

    /// Optional classification reference.
    #[arg(long)]
    pub category: Option<u64>,

    /// Progress weight; must be positive.
    #[arg(long, default_value_t = 100)]
    pub weight: u64,
}

impl From<&GoalFields> for GoalDraft {
    fn from(fields: &GoalFields) -> Self {
        GoalDraft {
            title: fields.title.clone(),
            description: fields.description.clone(),
            deadline: fields.deadline,
            priority: fields.priority,
            category: fields.category,
            weight: fields.weight,
        }
    }
}

#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a new goal owned by the caller.
    Create {
        #[command(flatten)]
        fields: GoalFields,
    },
    /// Replace a goal's mutable fields (owner only).
    Update {
        /// Goal id.
        id: u64,
        #[command(flatten)]
        fields: GoalFields,
    },
    /// Abandon a goal (owner only, terminal).
    Abandon {
        /// Goal id.
        id: u64,
    },
    /// Mark a goal completed regardless of milestone progress (owner only).
    Complete {
        /// Goal id.
        id: u64,
    },
    /// Show one goal in detail.
    Show {
        /// Goal id.
        id: u64,
    },
    /// List all goals.
    List,
}

pub fn execute(
    cmd: &GoalCommands,
    config: &LedgerConfig,
    caller: Option<&str>,
    height: Option<u64>,
) -> anyhow::Result<()> {
    match cmd {
        GoalCommands::Create { fields } => {
            let mut session = Session::open(config, caller, height)?;
            let result = session.engine.create_goal(&session.ctx, fields.into());
            let entry = session.entry(OperationKind::CreateGoal);
            let entry = match &result {
                Ok(id) => entry.with_goal(*id),
                Err(_) => entry,
            };
            let goal_id = session.record(entry, result)?;
            println!("Goal created: {}", goal_id);
            println!("  Owner:  {}", session.ctx.caller);
            println!("  Height: {}", session.ctx.block_height);
            Ok(())
        }

        GoalCommands::Update { id, fields } => {
            let mut session = Session::open(config, caller, height)?;
            let result = session.engine.update_goal(&session.ctx, *id, fields.into());
            let entry = session.entry(OperationKind::UpdateGoal).with_goal(*id);
            session.record(entry, result)?;
            println!("Goal {} updated.", id);
            Ok(())
        }

        GoalCommands::Abandon { id } => {
            let mut session = Session::open(config, caller, height)?;
            let result = session.engine.abandon_goal(&session.ctx, *id);
            let entry = session.entry(OperationKind::AbandonGoal).with_goal(*id);
            session.record(entry, result)?;
            println!("Goal {} abandoned.", id);
            Ok(())
        }

        GoalCommands::Complete { id } => {
            let mut session = Session::open(config, caller, height)?;
            let result = session.engine.mark_goal_completed(&session.ctx, *id);
            let entry = session
                .entry(OperationKind::MarkGoalCompleted)
                .with_goal(*id);
            session.record(entry, result)?;
            println!("Goal {} completed.", id);
            Ok(())
        }

        GoalCommands::Show { id } => {
            let engine = read_only_engine(config)?;
            match engine.get_goal(*id)? {
                None => println!("No goal with id {}.", id),
                Some(goal) => print_goal(&goal),
            }
            Ok(())
        }

        GoalCommands::List => {
            let engine = read_only_engine(config)?;
            let goals = engine.list_goals()?;
            if goals.is_empty() {
                println!("No goals yet.");
                return Ok(());
            }

            println!(
                "{:<5} {:<10} {:<5} {:<10} TITLE",
                "ID", "STATUS", "PRIO", "PROGRESS"
            );
            println!("{}", "-".repeat(72));
            for goal in goals {
                println!(
                    "{:<5} {:<10} {:<5} {:<10} {}",
                    goal.id,
                    goal.status.to_string(),
                    goal.priority,
                    format!("{}%", goal.progress_percent()),
                    goal.title,
                );
            }
            Ok(())
        }
    }
}

fn print_goal(goal: &Goal) {
    println!("Goal {}: {}", goal.id, goal.title);
    println!("  Owner:       {}", goal.owner);
    println!("  Status:      {}", goal.status);
    println!("  Priority:    {}", goal.priority);
    println!("  Weight:      {}", goal.weight);
    match goal.deadline {
        Some(height) => println!("  Deadline:    height {}", height),
        None => println!("  Deadline:    -"),
    }
    match goal.category {
        Some(category) => println!("  Category:    {}", category),
        None => println!("  Category:    -"),
    }
    println!(
        "  Milestones:  {}/{} complete ({}%, weighted {})",
        goal.completed_milestone_count,
        goal.milestone_count,
        goal.progress_percent(),
        goal.weighted_progress(),
    );
    println!(
        "  Heights:     created {}, updated {}",
        goal.created_at_height, goal.updated_at_height
    );
    println!("  Description: {}", goal.description);
}
