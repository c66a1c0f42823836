use deck_core::enums::{Priority, TaskStatus};
use deck_db::repos::TaskFilter;
use deck_db::updates::TaskUpdate;

use crate::cli::subcommands::TaskCommands;
use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

pub async fn handle(
    action: &TaskCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let actor = ctx.resolve_actor(flags).await?;

    match action {
        TaskCommands::Create {
            project,
            title,
            description,
            priority,
            points,
            sprint,
            assignee,
        } => {
            let priority = parse_enum::<Priority>(priority, "priority")?;
            let task = ctx
                .service
                .create_task(
                    &actor,
                    project,
                    title,
                    description.as_deref(),
                    priority,
                    *points,
                    sprint.as_deref(),
                    assignee.as_deref(),
                )
                .await?;
            output(&task, flags.format)
        }
        TaskCommands::Update {
            id,
            title,
            description,
            status,
            priority,
            points,
            sprint,
            no_sprint,
            assignee,
            unassign,
        } => {
            let update = TaskUpdate {
                title: title.clone(),
                description: description.clone().map(Some),
                status: status
                    .as_deref()
                    .map(|value| parse_enum::<TaskStatus>(value, "status"))
                    .transpose()?,
                priority: priority
                    .as_deref()
                    .map(|value| parse_enum::<Priority>(value, "priority"))
                    .transpose()?,
                story_points: *points,
                sprint_id: optional_link(sprint, *no_sprint),
                assignee_id: optional_link(assignee, *unassign),
            };
            let task = ctx.service.update_task(&actor, id, update).await?;
            output(&task, flags.format)
        }
        TaskCommands::Delete { id } => {
            ctx.service.delete_task(&actor, id).await?;
            output(&serde_json::json!({ "deleted": id }), flags.format)
        }
        TaskCommands::Get { id } => {
            let task = ctx.service.get_task(&actor, id).await?;
            output(&task, flags.format)
        }
        TaskCommands::List {
            project,
            sprint,
            status,
            priority,
            assignee,
            search,
            limit,
            offset,
        } => {
            let filter = TaskFilter {
                project_id: project.clone(),
                sprint_id: sprint.clone(),
                status: status
                    .as_deref()
                    .map(|value| parse_enum::<TaskStatus>(value, "status"))
                    .transpose()?,
                priority: priority
                    .as_deref()
                    .map(|value| parse_enum::<Priority>(value, "priority"))
                    .transpose()?,
                assignee_id: assignee.clone(),
                search: search.clone(),
            };
            let limit = effective_limit(*limit, flags.limit, &ctx.config.api);
            let tasks = ctx.service.list_tasks(&actor, &filter, limit, *offset).await?;
            output(&tasks, flags.format)
        }
    }
}

/// Map a set-flag/clear-flag pair onto the partial-update encoding:
/// `Some(Some(id))` sets, `Some(None)` clears, `None` leaves untouched.
fn optional_link(value: &Option<String>, clear: bool) -> Option<Option<String>> {
    if clear {
        Some(None)
    } else {
        value.clone().map(Some)
    }
}
