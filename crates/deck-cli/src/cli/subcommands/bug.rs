use clap::Subcommand;

/// Bug report commands.
#[derive(Clone, Debug, Subcommand)]
pub enum BugCommands {
    /// File a bug report.
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
        /// Link to a task in the same project.
        #[arg(long)]
        task: Option<String>,
    },
    /// Update a bug report.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Status: new, confirmed, in-progress, fixed, closed.
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        task: Option<String>,
        /// Unlink from its task.
        #[arg(long, conflicts_with = "task")]
        no_task: bool,
        #[arg(long)]
        resolved: Option<bool>,
    },
    /// Delete a bug report.
    Delete { id: String },
    /// Get a bug report by ID.
    Get { id: String },
    /// List visible bug reports.
    List {
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        resolved: Option<bool>,
        /// Filter by the user who filed the bug.
        #[arg(long)]
        reporter: Option<String>,
        /// Substring match over title and description.
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
}
