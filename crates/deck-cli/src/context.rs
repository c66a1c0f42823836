use std::path::Path;

use anyhow::Context;

use deck_config::DeckConfig;
use deck_core::access::Actor;
use deck_db::service::DeckService;

use crate::cli::GlobalFlags;

/// Shared state for command handlers: configuration and the opened service.
pub struct AppContext {
    pub config: DeckConfig,
    pub service: DeckService,
}

impl AppContext {
    /// Open the database at the configured (or overridden) path.
    pub async fn init(config: DeckConfig, db_override: Option<&str>) -> anyhow::Result<Self> {
        let path = db_override.unwrap_or(&config.database.path).to_string();

        if let Some(parent) = Path::new(&path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }

        let service = DeckService::new_local(&path)
            .await
            .with_context(|| format!("failed to open database at {path}"))?;
        Ok(Self { config, service })
    }

    /// Resolve `--actor` (user id or username) to an [`Actor`].
    pub async fn resolve_actor(&self, flags: &GlobalFlags) -> anyhow::Result<Actor> {
        let raw = flags
            .actor
            .as_deref()
            .context("this command needs an acting user: pass --actor <ID|USERNAME>")?;

        let user = match self.service.find_user(raw).await? {
            Some(user) => user,
            None => self
                .service
                .find_user_by_username(raw)
                .await?
                .with_context(|| format!("unknown user '{raw}'"))?,
        };
        Ok(Actor::from_user(&user))
    }
}
