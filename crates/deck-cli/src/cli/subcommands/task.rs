use clap::Subcommand;

/// Task entity commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TaskCommands {
    /// Create a task.
    Create {
        #[arg(long)]
        project: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// Priority: low, medium, high, critical.
        #[arg(long, default_value = "medium")]
        priority: String,
        /// Story points on the Fibonacci scale (1, 2, 3, 5, 8, 13, 21).
        #[arg(long)]
        points: u32,
        #[arg(long)]
        sprint: Option<String>,
        #[arg(long)]
        assignee: Option<String>,
    },
    /// Update a task.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Status: new, in-progress, review, testing, done, closed.
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        points: Option<u32>,
        #[arg(long)]
        sprint: Option<String>,
        /// Move the task back to the backlog.
        #[arg(long, conflicts_with = "sprint")]
        no_sprint: bool,
        #[arg(long)]
        assignee: Option<String>,
        /// Remove the assignee.
        #[arg(long, conflicts_with = "assignee")]
        unassign: bool,
    },
    /// Delete a task.
    Delete { id: String },
    /// Get a task by ID.
    Get { id: String },
    /// List visible tasks.
    List {
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        sprint: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        assignee: Option<String>,
        /// Substring match over title and description.
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
}
