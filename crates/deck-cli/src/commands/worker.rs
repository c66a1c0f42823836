use deck_db::jobs::run_pending_reports;

use crate::cli::root_commands::WorkerArgs;
use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// One-shot pass over pending reports. Each CLI invocation is its own
/// process, so report requests made in earlier invocations wait here
/// rather than on an in-process queue.
pub async fn handle(
    _args: &WorkerArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let processed = run_pending_reports(&ctx.service).await?;
    output(&serde_json::json!({ "processed": processed }), flags.format)
}
