use clap::Subcommand;

/// Sprint entity commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SprintCommands {
    /// Create a sprint.
    Create {
        #[arg(long)]
        project: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        goal: Option<String>,
        /// Start date (YYYY-MM-DD).
        #[arg(long)]
        start: String,
        /// End date (YYYY-MM-DD), inclusive.
        #[arg(long)]
        end: String,
        /// Mark the sprint active immediately.
        #[arg(long)]
        active: bool,
    },
    /// Update a sprint.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        goal: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    /// Delete a sprint (its tasks fall back to the backlog).
    Delete { id: String },
    /// Get a sprint by ID.
    Get { id: String },
    /// List visible sprints.
    List {
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        active: Option<bool>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Complete a sprint: unfinished tasks move to the backlog.
    Complete { id: String },
    /// Day-by-day sprint activity: tasks and bugs grouped by creation day.
    Timeline { id: String },
}
