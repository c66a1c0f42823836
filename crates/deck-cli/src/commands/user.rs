use deck_core::enums::Role;

use crate::cli::subcommands::UserCommands;
use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

pub async fn handle(
    action: &UserCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        UserCommands::Create {
            username,
            role,
            superuser,
        } => {
            let role = parse_enum::<Role>(role, "role")?;
            let user = ctx.service.create_user(username, role, *superuser).await?;
            output(&user, flags.format)
        }
        UserCommands::Get { id } => {
            let user = ctx.service.get_user(id).await?;
            output(&user, flags.format)
        }
        UserCommands::List { limit, offset } => {
            let limit = effective_limit(*limit, flags.limit, &ctx.config.api);
            let users = ctx.service.list_users(limit, *offset).await?;
            output(&users, flags.format)
        }
    }
}
