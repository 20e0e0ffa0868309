//! The unified message facade.
//!
//! [`ChatService`] is the single entry point for reading, writing and
//! deleting messages. Every call resolves the owning store from the
//! partner's *current* `persist_history` flag (the flag can change at
//! runtime, so nothing is cached) and coordinates the media-file
//! lifecycle with every path that removes a message.

use std::path::Path;

use tracing::{info, warn};
use uuid::Uuid;

use confide_media::MediaStore;
use confide_shared::{MediaKind, MessageKind};
use confide_store::database::default_data_dir;
use confide_store::{ChatPartner, Database, Message, TransientStore};

use crate::error::{ChatError, Result};

/// The store that owns a partner's messages.
enum StoreBackend<'a> {
    Durable(&'a Database),
    Transient(&'a TransientStore),
}

impl StoreBackend<'_> {
    fn messages(&self, partner_id: Uuid) -> Result<Vec<Message>> {
        match self {
            StoreBackend::Durable(db) => Ok(db.messages_for_partner(partner_id)?),
            StoreBackend::Transient(store) => Ok(store.messages_for_partner(partner_id)),
        }
    }

    fn insert(
        &self,
        partner_id: Uuid,
        content: &str,
        is_user: bool,
        kind: MessageKind,
    ) -> Result<Message> {
        match self {
            StoreBackend::Durable(db) => {
                let message = Message::new(partner_id, content, is_user, kind);
                db.insert_message(&message)?;
                Ok(message)
            }
            StoreBackend::Transient(store) => Ok(store.append(partner_id, content, is_user, kind)),
        }
    }

    fn remove(&self, partner_id: Uuid, message: &Message) -> Result<()> {
        match self {
            StoreBackend::Durable(db) => {
                db.delete_message(message.id)?;
            }
            StoreBackend::Transient(store) => store.remove(partner_id, message),
        }
        Ok(())
    }

    fn clear(&self, partner_id: Uuid) -> Result<()> {
        match self {
            StoreBackend::Durable(db) => {
                db.delete_messages_for_partner(partner_id)?;
            }
            StoreBackend::Transient(store) => store.clear(partner_id),
        }
        Ok(())
    }
}

/// Facade over the durable store, the transient store and the media
/// store.
///
/// All operations run on the caller's (single writer) context; a send
/// either completes synchronously or commits-or-fails.
pub struct ChatService {
    db: Database,
    transient: TransientStore,
    media: MediaStore,
}

impl ChatService {
    /// Open the service over an explicit document root: the database
    /// lives at `{root}/confide.db`, media directories beside it.
    pub fn open(data_dir: &Path) -> Result<Self> {
        let db = Database::open_at(&data_dir.join("confide.db"))?;
        let media = MediaStore::new(data_dir.to_path_buf());

        Ok(Self {
            db,
            transient: TransientStore::new(),
            media,
        })
    }

    /// Open the service over the platform-default data directory.
    pub fn open_default() -> Result<Self> {
        Self::open(&default_data_dir()?)
    }

    /// The media store, for rendering image/voice content.
    pub fn media(&self) -> &MediaStore {
        &self.media
    }

    /// The transient store, for subscribing to mutation notifications.
    pub fn transient(&self) -> &TransientStore {
        &self.transient
    }

    fn backend(&self, partner: &ChatPartner) -> StoreBackend<'_> {
        if partner.persist_history {
            StoreBackend::Durable(&self.db)
        } else {
            StoreBackend::Transient(&self.transient)
        }
    }

    // ------------------------------------------------------------------
    // Partners
    // ------------------------------------------------------------------

    pub fn create_partner(
        &self,
        nickname: &str,
        avatar: Option<Vec<u8>>,
        persist_history: bool,
    ) -> Result<ChatPartner> {
        let partner = ChatPartner::new(nickname, avatar, persist_history);
        self.db.create_partner(&partner)?;
        info!(partner = %partner.id, nickname = %partner.nickname, "Partner created");
        Ok(partner)
    }

    pub fn get_partner(&self, id: Uuid) -> Result<ChatPartner> {
        Ok(self.db.get_partner(id)?)
    }

    /// All partners, sorted by nickname.
    pub fn list_partners(&self) -> Result<Vec<ChatPartner>> {
        Ok(self.db.list_partners()?)
    }

    /// Save a partner's editable fields.
    ///
    /// Turning the persistence flag off discards the partner's durable
    /// history (messages and media) rather than migrating it. The
    /// purge runs before the flag is stored, against the store that
    /// owned the messages so far.
    pub fn update_partner(&self, partner: &ChatPartner) -> Result<()> {
        let stored = self.db.get_partner(partner.id)?;
        if stored.persist_history && !partner.persist_history {
            self.delete_all_messages(&stored)?;
            info!(partner = %partner.id, "History discarded on persistence opt-out");
        }
        self.db.update_partner(partner)?;
        Ok(())
    }

    /// Convenience toggle for the persistence flag alone.
    pub fn set_persist_history(&self, id: Uuid, enabled: bool) -> Result<ChatPartner> {
        let mut partner = self.db.get_partner(id)?;
        partner.persist_history = enabled;
        self.update_partner(&partner)?;
        Ok(partner)
    }

    /// Delete a partner along with every message and media file it
    /// owns, in both stores.
    pub fn delete_partner(&self, id: Uuid) -> Result<()> {
        // Sweep media referenced from either store before the rows go.
        for message in self.db.messages_for_partner(id)? {
            self.delete_media_for(&message);
        }
        for message in self.transient.messages_for_partner(id) {
            self.delete_media_for(&message);
        }
        self.transient.clear(id);

        // ON DELETE CASCADE takes the message rows with the partner.
        self.db.delete_partner(id)?;
        info!(partner = %id, "Partner deleted");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Messages
    // ------------------------------------------------------------------

    /// The partner's conversation, oldest first.
    pub fn messages(&self, partner: &ChatPartner) -> Result<Vec<Message>> {
        self.backend(partner).messages(partner.id)
    }

    /// Send a text message. Whitespace is trimmed; an empty result is
    /// rejected without touching either store.
    pub fn send_text(&self, partner: &ChatPartner, text: &str) -> Result<Message> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let message = self
            .backend(partner)
            .insert(partner.id, trimmed, true, MessageKind::Text)?;
        info!(msg_id = %message.id, partner = %partner.id, "Message sent");
        Ok(message)
    }

    /// Send a media message from already-decoded bytes.
    ///
    /// The file is written first; if that fails nothing is recorded.
    /// If the durable record then fails to commit, the just-saved file
    /// is deleted again so no orphan survives the failed send.
    pub fn send_media(&self, partner: &ChatPartner, kind: MediaKind, data: &[u8]) -> Result<Message> {
        let Some(file_name) = self.media.save(kind, data) else {
            return Err(ChatError::MediaSave);
        };

        match self
            .backend(partner)
            .insert(partner.id, &file_name, true, kind.message_kind())
        {
            Ok(message) => {
                info!(msg_id = %message.id, partner = %partner.id, file = %file_name, "Media message sent");
                Ok(message)
            }
            Err(e) => {
                warn!(partner = %partner.id, file = %file_name, error = %e, "Record failed, removing saved media");
                self.media.delete(kind, &file_name);
                Err(e)
            }
        }
    }

    /// Record a voice message for a clip the recorder already wrote
    /// into the audio directory.
    pub fn send_recording(&self, partner: &ChatPartner, file_name: &str) -> Result<Message> {
        if !self.media.contains(MediaKind::Audio, file_name) {
            return Err(ChatError::RecordingMissing(file_name.to_string()));
        }

        match self
            .backend(partner)
            .insert(partner.id, file_name, true, MessageKind::Voice)
        {
            Ok(message) => {
                info!(msg_id = %message.id, partner = %partner.id, file = %file_name, "Voice message sent");
                Ok(message)
            }
            Err(e) => {
                warn!(partner = %partner.id, file = %file_name, error = %e, "Record failed, removing recording");
                self.media.delete(MediaKind::Audio, file_name);
                Err(e)
            }
        }
    }

    /// Delete one message: its media file first (for image/voice),
    /// then the record in whichever store owns it.
    ///
    /// A failed record delete is logged and surfaced; it is not
    /// retried, so the UI may transiently disagree with the store.
    pub fn delete_message(&self, partner: &ChatPartner, message: &Message) -> Result<()> {
        self.delete_media_for(message);
        if let Err(e) = self.backend(partner).remove(partner.id, message) {
            warn!(msg_id = %message.id, partner = %partner.id, error = %e, "Failed to delete message record");
            return Err(e);
        }
        Ok(())
    }

    /// Delete every message for a partner: a best-effort media sweep
    /// that continues past individual file failures, then one clear of
    /// the owning store.
    pub fn delete_all_messages(&self, partner: &ChatPartner) -> Result<()> {
        let backend = self.backend(partner);
        let messages = backend.messages(partner.id)?;
        for message in &messages {
            self.delete_media_for(message);
        }
        if let Err(e) = backend.clear(partner.id) {
            warn!(partner = %partner.id, error = %e, "Failed to clear message records");
            return Err(e);
        }
        info!(partner = %partner.id, count = messages.len(), "Conversation cleared");
        Ok(())
    }

    /// The app left the foreground: ephemeral-mode conversations do
    /// not survive backgrounding, so wipe every non-persistent
    /// partner's messages and media.
    pub fn app_backgrounded(&self) -> Result<()> {
        for partner in self.db.list_partners()? {
            if !partner.persist_history {
                self.delete_all_messages(&partner)?;
            }
        }
        Ok(())
    }

    fn delete_media_for(&self, message: &Message) {
        if let Some(kind) = message.kind.media_kind() {
            self.media.delete(kind, &message.content);
        }
    }
}
