use deck_core::enums::ReportType;

use crate::cli::subcommands::ReportCommands;
use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

pub async fn handle(
    action: &ReportCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let actor = ctx.resolve_actor(flags).await?;

    match action {
        ReportCommands::Request {
            project,
            report_type,
        } => {
            let report_type = parse_enum::<ReportType>(report_type, "type")?;
            let report = ctx
                .service
                .create_report_request(&actor, project, report_type)
                .await?;
            output(&report, flags.format)
        }
        ReportCommands::Get { id } => {
            let report = ctx.service.get_report(&actor, id).await?;
            output(&report, flags.format)
        }
        ReportCommands::List {
            project,
            limit,
            offset,
        } => {
            let limit = effective_limit(*limit, flags.limit, &ctx.config.api);
            let reports = ctx
                .service
                .list_reports(&actor, project.as_deref(), limit, *offset)
                .await?;
            output(&reports, flags.format)
        }
    }
}
