use deck_core::enums::{BugStatus, Priority};
use deck_db::repos::BugFilter;
use deck_db::updates::BugUpdate;

use crate::cli::subcommands::BugCommands;
use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

pub async fn handle(
    action: &BugCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let actor = ctx.resolve_actor(flags).await?;

    match action {
        BugCommands::Create {
            project,
            title,
            description,
            priority,
            task,
        } => {
            let priority = parse_enum::<Priority>(priority, "priority")?;
            let bug = ctx
                .service
                .create_bug(
                    &actor,
                    project,
                    title,
                    description.as_deref(),
                    priority,
                    task.as_deref(),
                )
                .await?;
            output(&bug, flags.format)
        }
        BugCommands::Update {
            id,
            title,
            description,
            status,
            priority,
            task,
            no_task,
            resolved,
        } => {
            let task_id = if *no_task {
                Some(None)
            } else {
                task.clone().map(Some)
            };
            let update = BugUpdate {
                title: title.clone(),
                description: description.clone().map(Some),
                status: status
                    .as_deref()
                    .map(|value| parse_enum::<BugStatus>(value, "status"))
                    .transpose()?,
                priority: priority
                    .as_deref()
                    .map(|value| parse_enum::<Priority>(value, "priority"))
                    .transpose()?,
                task_id,
                is_resolved: *resolved,
            };
            let bug = ctx.service.update_bug(&actor, id, update).await?;
            output(&bug, flags.format)
        }
        BugCommands::Delete { id } => {
            ctx.service.delete_bug(&actor, id).await?;
            output(&serde_json::json!({ "deleted": id }), flags.format)
        }
        BugCommands::Get { id } => {
            let bug = ctx.service.get_bug(&actor, id).await?;
            output(&bug, flags.format)
        }
        BugCommands::List {
            project,
            status,
            priority,
            resolved,
            reporter,
            search,
            limit,
            offset,
        } => {
            let filter = BugFilter {
                project_id: project.clone(),
                status: status
                    .as_deref()
                    .map(|value| parse_enum::<BugStatus>(value, "status"))
                    .transpose()?,
                priority: priority
                    .as_deref()
                    .map(|value| parse_enum::<Priority>(value, "priority"))
                    .transpose()?,
                is_resolved: *resolved,
                reporter_id: reporter.clone(),
                search: search.clone(),
            };
            let limit = effective_limit(*limit, flags.limit, &ctx.config.api);
            let bugs = ctx.service.list_bugs(&actor, &filter, limit, *offset).await?;
            output(&bugs, flags.format)
        }
    }
}
