//! Domain model structs persisted in the local SQLite database.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be
//! handed directly to a UI layer over IPC.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use confide_shared::MessageKind;

// ---------------------------------------------------------------------------
// ChatPartner
// ---------------------------------------------------------------------------

/// A configured conversation target with its own persistence policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatPartner {
    /// Unique partner identifier.
    pub id: Uuid,
    /// Human-readable display name. Non-unique; partner listings sort
    /// by it.
    pub nickname: String,
    /// Optional raw avatar image bytes, stored inline as a BLOB.
    pub avatar: Option<Vec<u8>>,
    /// Whether this partner's messages go to the durable store
    /// (`true`) or the transient store (`false`).
    pub persist_history: bool,
    /// When the partner was created locally.
    pub created_at: DateTime<Utc>,
}

impl ChatPartner {
    /// Build a new partner with a fresh id, stamped now.
    pub fn new(nickname: impl Into<String>, avatar: Option<Vec<u8>>, persist_history: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            nickname: nickname.into(),
            avatar,
            persist_history,
            created_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A single chat message. Immutable once created; it is only ever
/// deleted.
///
/// For `image` and `voice` kinds, `content` holds the media file name,
/// not the bytes themselves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Unique message identifier.
    pub id: Uuid,
    /// The partner this message belongs to. A non-owning
    /// back-reference: the partner owns its messages, this field is
    /// for filtering only.
    pub partner_id: Uuid,
    /// Literal text, or a media file name depending on `kind`.
    pub content: String,
    /// `true` if the local user sent the message.
    pub is_user: bool,
    /// Creation instant; the sort and display key within a
    /// conversation.
    pub timestamp: DateTime<Utc>,
    /// What `content` holds.
    pub kind: MessageKind,
}

impl Message {
    /// Build a new message with a fresh id, stamped now.
    pub fn new(partner_id: Uuid, content: impl Into<String>, is_user: bool, kind: MessageKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            partner_id,
            content: content.into(),
            is_user,
            timestamp: Utc::now(),
            kind,
        }
    }
}
