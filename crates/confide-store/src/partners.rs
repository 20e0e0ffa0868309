//! CRUD operations for [`ChatPartner`] records.

use chrono::{DateTime, Utc};
use rusqlite::params;
use uuid::Uuid;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::ChatPartner;

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a new chat partner.
    pub fn create_partner(&self, partner: &ChatPartner) -> Result<()> {
        self.conn().execute(
            "INSERT INTO partners (id, nickname, avatar, persist_history, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                partner.id.to_string(),
                partner.nickname,
                partner.avatar,
                partner.persist_history as i32,
                partner.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch a single partner by UUID.
    pub fn get_partner(&self, id: Uuid) -> Result<ChatPartner> {
        self.conn()
            .query_row(
                "SELECT id, nickname, avatar, persist_history, created_at
                 FROM partners
                 WHERE id = ?1",
                params![id.to_string()],
                row_to_partner,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// List all partners, ordered by nickname ascending.
    pub fn list_partners(&self) -> Result<Vec<ChatPartner>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, nickname, avatar, persist_history, created_at
             FROM partners
             ORDER BY nickname ASC",
        )?;

        let rows = stmt.query_map([], row_to_partner)?;

        let mut partners = Vec::new();
        for row in rows {
            partners.push(row?);
        }
        Ok(partners)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Overwrite a partner's editable fields (nickname, avatar,
    /// persistence flag). Returns `true` if a row was updated.
    ///
    /// Messages are immutable, partners are not: the edit sheet saves
    /// all three fields at once.
    pub fn update_partner(&self, partner: &ChatPartner) -> Result<bool> {
        let affected = self.conn().execute(
            "UPDATE partners
             SET nickname = ?2, avatar = ?3, persist_history = ?4
             WHERE id = ?1",
            params![
                partner.id.to_string(),
                partner.nickname,
                partner.avatar,
                partner.persist_history as i32,
            ],
        )?;
        Ok(affected > 0)
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    // ON DELETE CASCADE: the partner's message rows go with it
    pub fn delete_partner(&self, id: Uuid) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM partners WHERE id = ?1", params![id.to_string()])?;
        Ok(affected > 0)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a [`ChatPartner`].
fn row_to_partner(row: &rusqlite::Row<'_>) -> rusqlite::Result<ChatPartner> {
    let id_str: String = row.get(0)?;
    let nickname: String = row.get(1)?;
    let avatar: Option<Vec<u8>> = row.get(2)?;
    let persist_int: i32 = row.get(3)?;
    let created_str: String = row.get(4)?;

    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(ChatPartner {
        id,
        nickname,
        avatar,
        persist_history: persist_int != 0,
        created_at,
    })
}
