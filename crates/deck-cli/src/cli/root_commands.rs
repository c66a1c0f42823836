use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    BugCommands, ProjectCommands, ReportCommands, SprintCommands, TaskCommands, UserCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Projects.
    Project {
        #[command(subcommand)]
        action: ProjectCommands,
    },
    /// Sprints.
    Sprint {
        #[command(subcommand)]
        action: SprintCommands,
    },
    /// Tasks.
    Task {
        #[command(subcommand)]
        action: TaskCommands,
    },
    /// Bug reports.
    Bug {
        #[command(subcommand)]
        action: BugCommands,
    },
    /// Project reports.
    Report {
        #[command(subcommand)]
        action: ReportCommands,
    },
    /// Users.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// View the audit trail.
    Audit(AuditArgs),
    /// Run one pass of the report worker over pending reports.
    Worker(WorkerArgs),
}

/// Arguments for `spd audit`.
#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    #[arg(long)]
    pub limit: Option<u32>,
}

/// Arguments for `spd worker`.
#[derive(Clone, Debug, Args)]
pub struct WorkerArgs {}
