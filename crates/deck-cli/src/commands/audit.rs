use crate::cli::root_commands::AuditArgs;
use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

pub async fn handle(
    args: &AuditArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let limit = effective_limit(args.limit, flags.limit, &ctx.config.api);
    let entries = ctx.service.recent_audit(limit).await?;
    output(&entries, flags.format)
}
