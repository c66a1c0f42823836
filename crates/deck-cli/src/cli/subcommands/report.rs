use clap::Subcommand;

/// Project report commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ReportCommands {
    /// Request a new report. Computation happens asynchronously.
    Request {
        #[arg(long)]
        project: String,
        /// Report type: sprint, project, bugs.
        #[arg(long = "type", default_value = "project")]
        report_type: String,
    },
    /// Get a report by ID.
    Get { id: String },
    /// List visible reports, newest first.
    List {
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
}
