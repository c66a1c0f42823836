use clap::Subcommand;

/// User commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    /// Create a user.
    Create {
        #[arg(long)]
        username: String,
        /// Role: admin, pm, dev, qa.
        #[arg(long, default_value = "dev")]
        role: String,
        #[arg(long)]
        superuser: bool,
    },
    /// Get a user by ID.
    Get { id: String },
    /// List users.
    List {
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
}
