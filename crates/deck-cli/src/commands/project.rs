use deck_core::enums::ProjectStatus;
use deck_db::updates::ProjectUpdate;

use crate::cli::subcommands::ProjectCommands;
use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{parse_date, parse_enum};
use crate::context::AppContext;
use crate::output::output;

pub async fn handle(
    action: &ProjectCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let actor = ctx.resolve_actor(flags).await?;

    match action {
        ProjectCommands::Create {
            name,
            description,
            start,
            manager,
        } => {
            let start = parse_date(start, "start")?;
            let project = ctx
                .service
                .create_project(&actor, name, description.as_deref(), start, manager.as_deref())
                .await?;
            output(&project, flags.format)
        }
        ProjectCommands::Update {
            id,
            name,
            description,
            status,
            end,
            no_end,
            manager,
        } => {
            let status = status
                .as_deref()
                .map(|value| parse_enum::<ProjectStatus>(value, "status"))
                .transpose()?;
            let end_date = if *no_end {
                Some(None)
            } else {
                end.as_deref()
                    .map(|value| parse_date(value, "end"))
                    .transpose()?
                    .map(Some)
            };
            let update = ProjectUpdate {
                name: name.clone(),
                description: description.clone().map(Some),
                status,
                end_date,
                manager_id: manager.clone(),
            };
            let project = ctx.service.update_project(&actor, id, update).await?;
            output(&project, flags.format)
        }
        ProjectCommands::Delete { id } => {
            ctx.service.delete_project(&actor, id).await?;
            output(&serde_json::json!({ "deleted": id }), flags.format)
        }
        ProjectCommands::Get { id } => {
            let project = ctx.service.get_project(&actor, id).await?;
            output(&project, flags.format)
        }
        ProjectCommands::List {
            status,
            limit,
            offset,
        } => {
            let status = status
                .as_deref()
                .map(|value| parse_enum::<ProjectStatus>(value, "status"))
                .transpose()?;
            let limit = effective_limit(*limit, flags.limit, &ctx.config.api);
            let projects = ctx
                .service
                .list_projects(&actor, status, limit, *offset)
                .await?;
            output(&projects, flags.format)
        }
        ProjectCommands::AddMember { id, user } => {
            let project = ctx.service.add_member(&actor, id, user).await?;
            output(&project, flags.format)
        }
        ProjectCommands::RemoveMember { id, user } => {
            let project = ctx.service.remove_member(&actor, id, user).await?;
            output(&project, flags.format)
        }
    }
}
