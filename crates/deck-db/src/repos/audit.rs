//! Audit trail reads. Writes happen through `DeckService::record_audit`.

use deck_core::entities::AuditEntry;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_optional_json};
use crate::service::DeckService;

fn row_to_audit(row: &libsql::Row) -> Result<AuditEntry, DatabaseError> {
    let detail = get_opt_string(row, 5)?;
    Ok(AuditEntry {
        id: row.get(0)?,
        actor_id: get_opt_string(row, 1)?,
        entity_type: parse_enum(&row.get::<String>(2)?)?,
        entity_id: row.get(3)?,
        action: parse_enum(&row.get::<String>(4)?)?,
        detail: parse_optional_json(detail.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

impl DeckService {
    /// Most recent audit entries, newest first.
    pub async fn recent_audit(&self, limit: u32) -> Result<Vec<AuditEntry>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, actor_id, entity_type, entity_id, action, detail, created_at
                 FROM audit_trail ORDER BY created_at DESC, id DESC LIMIT ?1",
                libsql::params![i64::from(limit)],
            )
            .await?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_audit(&row)?);
        }
        Ok(entries)
    }
}
