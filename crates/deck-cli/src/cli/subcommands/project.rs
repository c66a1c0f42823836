use clap::Subcommand;

/// Project entity commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ProjectCommands {
    /// Create a project.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Start date (YYYY-MM-DD).
        #[arg(long)]
        start: String,
        /// Manager user id (defaults to the acting user).
        #[arg(long)]
        manager: Option<String>,
    },
    /// Update a project.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Status: active, on-hold, archived.
        #[arg(long)]
        status: Option<String>,
        /// End date (YYYY-MM-DD).
        #[arg(long)]
        end: Option<String>,
        /// Clear the end date.
        #[arg(long, conflicts_with = "end")]
        no_end: bool,
        #[arg(long)]
        manager: Option<String>,
    },
    /// Delete a project and its records.
    Delete { id: String },
    /// Get a project by ID.
    Get { id: String },
    /// List visible projects.
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Add a member to a project.
    AddMember {
        id: String,
        #[arg(long)]
        user: String,
    },
    /// Remove a member from a project.
    RemoveMember {
        id: String,
        #[arg(long)]
        user: String,
    },
}
