//! User repository — bootstrap creation and lookups.
//!
//! Users are unaffiliated records: any authenticated viewer may list them.
//! Creation is an administrative bootstrap operation (token issuance and
//! registration live outside this system).

use chrono::Utc;

use deck_core::entities::User;
use deck_core::enums::{AuditAction, EntityType, Role};
use deck_core::ids::PREFIX_USER;

use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, parse_enum};
use crate::service::DeckService;

const SELECT_COLS: &str = "id, username, role, is_superuser, created_at";

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        role: parse_enum(&row.get::<String>(2)?)?,
        is_superuser: row.get::<i64>(3)? != 0,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

impl DeckService {
    pub async fn create_user(
        &self,
        username: &str,
        role: Role,
        is_superuser: bool,
    ) -> Result<User, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_USER).await?;

        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO users ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
                libsql::params![
                    id.as_str(),
                    username,
                    role.as_str(),
                    i64::from(is_superuser),
                    now.to_rfc3339()
                ],
            )
            .await?;

        self.record_audit(
            None,
            EntityType::User,
            &id,
            AuditAction::Created,
            Some(serde_json::json!({ "username": username, "role": role })),
        )
        .await?;

        Ok(User {
            id,
            username: username.to_string(),
            role,
            is_superuser,
            created_at: now,
        })
    }

    pub async fn get_user(&self, id: &str) -> Result<User, DatabaseError> {
        self.find_user(id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("user", id))
    }

    pub async fn find_user(&self, id: &str) -> Result<Option<User>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM users WHERE id = ?1"),
                [id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM users WHERE username = ?1"),
                [username],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_users(&self, limit: u32, offset: u32) -> Result<Vec<User>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM users ORDER BY username LIMIT ?1 OFFSET ?2"
                ),
                libsql::params![i64::from(limit), i64::from(offset)],
            )
            .await?;
        let mut users = Vec::new();
        while let Some(row) = rows.next().await? {
            users.push(row_to_user(&row)?);
        }
        Ok(users)
    }
}
