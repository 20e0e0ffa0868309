use chrono::{DateTime, Utc};
use rusqlite::params;
use uuid::Uuid;

use confide_shared::MessageKind;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::Message;

impl Database {
    /// Insert and commit a new message. On error the caller must not
    /// assume the message persisted.
    pub fn insert_message(&self, message: &Message) -> Result<()> {
        self.conn().execute(
            "INSERT INTO messages (id, partner_id, content, is_user, timestamp, kind)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                message.id.to_string(),
                message.partner_id.to_string(),
                message.content,
                message.is_user as i32,
                message.timestamp.to_rfc3339(),
                message.kind.as_str(),
            ],
        )?;
        Ok(())
    }

    /// All messages for a partner, oldest first (conversation order).
    pub fn messages_for_partner(&self, partner_id: Uuid) -> Result<Vec<Message>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, partner_id, content, is_user, timestamp, kind
             FROM messages
             WHERE partner_id = ?1
             ORDER BY timestamp ASC",
        )?;

        let rows = stmt.query_map(params![partner_id.to_string()], row_to_message)?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        Ok(messages)
    }

    pub fn get_message_by_id(&self, id: Uuid) -> Result<Message> {
        self.conn()
            .query_row(
                "SELECT id, partner_id, content, is_user, timestamp, kind
                 FROM messages WHERE id = ?1",
                params![id.to_string()],
                row_to_message,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    // only removes the record; any referenced media file is the caller's
    // responsibility
    pub fn delete_message(&self, id: Uuid) -> Result<bool> {
        let affected = self.conn().execute(
            "DELETE FROM messages WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(affected > 0)
    }

    /// Delete every message for a partner with a single statement,
    /// committing once. Returns the number of rows removed.
    pub fn delete_messages_for_partner(&self, partner_id: Uuid) -> Result<usize> {
        let affected = self.conn().execute(
            "DELETE FROM messages WHERE partner_id = ?1",
            params![partner_id.to_string()],
        )?;
        Ok(affected)
    }
}

fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    let id_str: String = row.get(0)?;
    let partner_id_str: String = row.get(1)?;
    let content: String = row.get(2)?;
    let is_user_int: i32 = row.get(3)?;
    let ts_str: String = row.get(4)?;
    let kind_str: String = row.get(5)?;

    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let partner_id = Uuid::parse_str(&partner_id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let timestamp: DateTime<Utc> = DateTime::parse_from_rfc3339(&ts_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;

    // Unknown kinds decode as text rather than failing the row.
    let kind = MessageKind::parse(&kind_str).unwrap_or_default();

    Ok(Message {
        id,
        partner_id,
        content,
        is_user: is_user_int != 0,
        timestamp,
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChatPartner;
    use chrono::Duration;

    fn test_db_with_partner() -> (Database, ChatPartner, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_at(&dir.path().join("test.db")).unwrap();
        let partner = ChatPartner::new("Alice", None, true);
        db.create_partner(&partner).unwrap();
        (db, partner, dir)
    }

    #[test]
    fn insert_and_query_in_timestamp_order() {
        let (db, partner, _dir) = test_db_with_partner();

        let mut second = Message::new(partner.id, "second", true, MessageKind::Text);
        second.timestamp = second.timestamp + Duration::seconds(10);
        let first = Message::new(partner.id, "first", false, MessageKind::Text);

        // Insert newest first; the query must still return oldest first.
        db.insert_message(&second).unwrap();
        db.insert_message(&first).unwrap();

        let messages = db.messages_for_partner(partner.id).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "first");
        assert_eq!(messages[1].content, "second");
    }

    #[test]
    fn query_is_scoped_to_partner() {
        let (db, partner, _dir) = test_db_with_partner();
        let other = ChatPartner::new("Bob", None, true);
        db.create_partner(&other).unwrap();

        db.insert_message(&Message::new(partner.id, "for alice", true, MessageKind::Text))
            .unwrap();
        db.insert_message(&Message::new(other.id, "for bob", true, MessageKind::Text))
            .unwrap();

        let messages = db.messages_for_partner(partner.id).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "for alice");
    }

    #[test]
    fn insert_without_partner_is_rejected() {
        let (db, _partner, _dir) = test_db_with_partner();
        let orphan = Message::new(Uuid::new_v4(), "orphan", true, MessageKind::Text);
        assert!(db.insert_message(&orphan).is_err());
    }

    #[test]
    fn delete_message_removes_only_that_row() {
        let (db, partner, _dir) = test_db_with_partner();
        let keep = Message::new(partner.id, "keep", true, MessageKind::Text);
        let gone = Message::new(partner.id, "gone", true, MessageKind::Text);
        db.insert_message(&keep).unwrap();
        db.insert_message(&gone).unwrap();

        assert!(db.delete_message(gone.id).unwrap());
        assert!(!db.delete_message(gone.id).unwrap());

        let messages = db.messages_for_partner(partner.id).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "keep");
    }

    #[test]
    fn delete_all_for_partner() {
        let (db, partner, _dir) = test_db_with_partner();
        for i in 0..3 {
            db.insert_message(&Message::new(partner.id, format!("m{i}"), true, MessageKind::Text))
                .unwrap();
        }

        assert_eq!(db.delete_messages_for_partner(partner.id).unwrap(), 3);
        assert!(db.messages_for_partner(partner.id).unwrap().is_empty());
    }

    #[test]
    fn partner_delete_cascades_to_messages() {
        let (db, partner, _dir) = test_db_with_partner();
        let message = Message::new(partner.id, "hello", true, MessageKind::Voice);
        db.insert_message(&message).unwrap();

        db.delete_partner(partner.id).unwrap();
        assert!(matches!(
            db.get_message_by_id(message.id),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn unknown_kind_decodes_as_text() {
        let (db, partner, _dir) = test_db_with_partner();
        db.conn()
            .execute(
                "INSERT INTO messages (id, partner_id, content, is_user, timestamp, kind)
                 VALUES (?1, ?2, 'hi', 1, ?3, 'sticker')",
                params![
                    Uuid::new_v4().to_string(),
                    partner.id.to_string(),
                    Utc::now().to_rfc3339(),
                ],
            )
            .unwrap();

        let messages = db.messages_for_partner(partner.id).unwrap();
        assert_eq!(messages[0].kind, MessageKind::Text);
    }
}
