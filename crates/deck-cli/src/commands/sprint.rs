use deck_db::updates::SprintUpdate;

use crate::cli::subcommands::SprintCommands;
use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_date;
use crate::context::AppContext;
use crate::output::output;

pub async fn handle(
    action: &SprintCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let actor = ctx.resolve_actor(flags).await?;

    match action {
        SprintCommands::Create {
            project,
            name,
            goal,
            start,
            end,
            active,
        } => {
            let start = parse_date(start, "start")?;
            let end = parse_date(end, "end")?;
            let sprint = ctx
                .service
                .create_sprint(&actor, project, name, goal.as_deref(), start, end, *active)
                .await?;
            output(&sprint, flags.format)
        }
        SprintCommands::Update {
            id,
            name,
            goal,
            start,
            end,
            active,
        } => {
            let update = SprintUpdate {
                name: name.clone(),
                goal: goal.clone().map(Some),
                start_date: start
                    .as_deref()
                    .map(|value| parse_date(value, "start"))
                    .transpose()?,
                end_date: end
                    .as_deref()
                    .map(|value| parse_date(value, "end"))
                    .transpose()?,
                is_active: *active,
            };
            let sprint = ctx.service.update_sprint(&actor, id, update).await?;
            output(&sprint, flags.format)
        }
        SprintCommands::Delete { id } => {
            ctx.service.delete_sprint(&actor, id).await?;
            output(&serde_json::json!({ "deleted": id }), flags.format)
        }
        SprintCommands::Get { id } => {
            let sprint = ctx.service.get_sprint(&actor, id).await?;
            output(&sprint, flags.format)
        }
        SprintCommands::List {
            project,
            active,
            limit,
            offset,
        } => {
            let limit = effective_limit(*limit, flags.limit, &ctx.config.api);
            let sprints = ctx
                .service
                .list_sprints(&actor, project.as_deref(), *active, limit, *offset)
                .await?;
            output(&sprints, flags.format)
        }
        SprintCommands::Complete { id } => {
            let (sprint, moved) = ctx.service.complete_sprint(&actor, id).await?;
            output(
                &serde_json::json!({ "sprint": sprint, "moved_tasks_count": moved }),
                flags.format,
            )
        }
        SprintCommands::Timeline { id } => {
            let timeline = ctx.service.sprint_timeline(&actor, id).await?;
            output(&timeline, flags.format)
        }
    }
}
