//! v001 -- Initial schema creation.
//!
//! Creates the two core tables: `partners` and `messages`.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Chat partners
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS partners (
    id              TEXT PRIMARY KEY NOT NULL,  -- UUID v4
    nickname        TEXT NOT NULL,              -- non-unique, listing sort key
    avatar          BLOB,                       -- raw image bytes, nullable
    persist_history INTEGER NOT NULL DEFAULT 0, -- boolean 0/1
    created_at      TEXT NOT NULL               -- ISO-8601 / RFC-3339
);

-- ----------------------------------------------------------------
-- Messages
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS messages (
    id         TEXT PRIMARY KEY NOT NULL,       -- UUID v4
    partner_id TEXT NOT NULL,                   -- FK -> partners(id)
    content    TEXT NOT NULL,                   -- text, or a media file name
    is_user    INTEGER NOT NULL,                -- boolean 0/1, sender flag
    timestamp  TEXT NOT NULL,                   -- ISO-8601
    kind       TEXT NOT NULL,                   -- text | image | voice

    FOREIGN KEY (partner_id) REFERENCES partners(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_messages_partner_ts
    ON messages(partner_id, timestamp ASC);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
