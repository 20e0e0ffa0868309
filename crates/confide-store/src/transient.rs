//! Process-lifetime message storage for partners whose history is not
//! persisted.
//!
//! The store starts empty, is never written to disk, and is simply
//! dropped with the process. Mutations notify registered observers
//! synchronously, before the mutating call returns, so a UI layer can
//! re-read the list immediately.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;
use uuid::Uuid;

use confide_shared::MessageKind;

use crate::models::Message;

/// Notification delivered to subscribers after every mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransientEvent {
    /// One partner's message list changed (append, remove or clear).
    MessagesChanged { partner_id: Uuid },
    /// The whole store was emptied.
    Cleared,
}

type Listener = Box<dyn Fn(&TransientEvent) + Send>;

/// In-memory map from chat partner to its ordered message list.
///
/// Inserts are append-only, so insertion order equals chronological
/// order. All access goes through an internal mutex; the snapshots
/// handed to readers and observers never alias live state.
#[derive(Default)]
pub struct TransientStore {
    messages: Mutex<HashMap<Uuid, Vec<Message>>>,
    listeners: Mutex<Vec<Listener>>,
}

impl TransientStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback invoked synchronously after each mutation.
    pub fn subscribe(&self, listener: impl Fn(&TransientEvent) + Send + 'static) {
        self.listeners
            .lock()
            .expect("listener list poisoned")
            .push(Box::new(listener));
    }

    /// Snapshot of a partner's messages in insertion order; empty for
    /// an unseen partner.
    pub fn messages_for_partner(&self, partner_id: Uuid) -> Vec<Message> {
        self.messages
            .lock()
            .expect("message map poisoned")
            .get(&partner_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Append a freshly stamped message to a partner's list and return
    /// it.
    pub fn append(
        &self,
        partner_id: Uuid,
        content: impl Into<String>,
        is_user: bool,
        kind: MessageKind,
    ) -> Message {
        let message = Message::new(partner_id, content, is_user, kind);
        {
            let mut map = self.messages.lock().expect("message map poisoned");
            map.entry(partner_id).or_default().push(message.clone());
        }
        debug!(partner = %partner_id, kind = %kind, "Appended transient message");
        self.notify(TransientEvent::MessagesChanged { partner_id });
        message
    }

    /// Remove every message matching `message` by value: timestamp,
    /// content and kind. Two distinct messages sharing all three are
    /// indistinguishable here and both go.
    pub fn remove(&self, partner_id: Uuid, message: &Message) {
        {
            let mut map = self.messages.lock().expect("message map poisoned");
            if let Some(list) = map.get_mut(&partner_id) {
                list.retain(|m| {
                    !(m.timestamp == message.timestamp
                        && m.content == message.content
                        && m.kind == message.kind)
                });
            }
        }
        self.notify(TransientEvent::MessagesChanged { partner_id });
    }

    /// Empty one partner's list.
    pub fn clear(&self, partner_id: Uuid) {
        self.messages
            .lock()
            .expect("message map poisoned")
            .remove(&partner_id);
        self.notify(TransientEvent::MessagesChanged { partner_id });
    }

    /// Empty the whole store.
    pub fn clear_all(&self) {
        self.messages.lock().expect("message map poisoned").clear();
        self.notify(TransientEvent::Cleared);
    }

    // Listeners run outside the data lock so they can read the store,
    // but before the mutating call returns.
    fn notify(&self, event: TransientEvent) {
        let listeners = self.listeners.lock().expect("listener list poisoned");
        for listener in listeners.iter() {
            listener(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn unseen_partner_is_empty() {
        let store = TransientStore::new();
        assert!(store.messages_for_partner(Uuid::new_v4()).is_empty());
    }

    #[test]
    fn append_preserves_insertion_order() {
        let store = TransientStore::new();
        let partner = Uuid::new_v4();

        store.append(partner, "one", true, MessageKind::Text);
        store.append(partner, "two", false, MessageKind::Text);
        store.append(partner, "three", true, MessageKind::Text);

        let contents: Vec<String> = store
            .messages_for_partner(partner)
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(contents, ["one", "two", "three"]);
    }

    #[test]
    fn lists_are_per_partner() {
        let store = TransientStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        store.append(alice, "hi bob", true, MessageKind::Text);
        store.append(bob, "hi alice", true, MessageKind::Text);

        assert_eq!(store.messages_for_partner(alice).len(), 1);
        assert_eq!(store.messages_for_partner(bob).len(), 1);
    }

    #[test]
    fn remove_matches_by_value() {
        let store = TransientStore::new();
        let partner = Uuid::new_v4();

        let keep = store.append(partner, "keep", true, MessageKind::Text);
        let gone = store.append(partner, "gone", true, MessageKind::Text);
        store.remove(partner, &gone);

        let remaining = store.messages_for_partner(partner);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].content, keep.content);
    }

    #[test]
    fn remove_takes_all_value_identical_messages() {
        let store = TransientStore::new();
        let partner = Uuid::new_v4();

        let first = store.append(partner, "dup", true, MessageKind::Text);
        // Force a value collision: same timestamp, content and kind,
        // different identity.
        let mut twin = Message::new(partner, "dup", true, MessageKind::Text);
        twin.timestamp = first.timestamp;
        {
            let mut map = store.messages.lock().unwrap();
            map.get_mut(&partner).unwrap().push(twin);
        }

        store.remove(partner, &first);
        assert!(store.messages_for_partner(partner).is_empty());
    }

    #[test]
    fn clear_and_clear_all() {
        let store = TransientStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        store.append(alice, "a", true, MessageKind::Text);
        store.append(bob, "b", true, MessageKind::Text);

        store.clear(alice);
        assert!(store.messages_for_partner(alice).is_empty());
        assert_eq!(store.messages_for_partner(bob).len(), 1);

        store.clear_all();
        assert!(store.messages_for_partner(bob).is_empty());
    }

    #[test]
    fn listeners_fire_synchronously_on_each_mutation() {
        let store = TransientStore::new();
        let partner = Uuid::new_v4();
        let seen = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&seen);
        store.subscribe(move |event| {
            assert_ne!(event, &TransientEvent::Cleared);
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let message = store.append(partner, "hello", true, MessageKind::Text);
        assert_eq!(seen.load(Ordering::SeqCst), 1);

        store.remove(partner, &message);
        assert_eq!(seen.load(Ordering::SeqCst), 2);

        store.clear(partner);
        assert_eq!(seen.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn listener_can_read_the_store() {
        let store = Arc::new(TransientStore::new());
        let partner = Uuid::new_v4();
        let observed = Arc::new(AtomicUsize::new(0));

        let store_ref = Arc::clone(&store);
        let observed_ref = Arc::clone(&observed);
        store.subscribe(move |event| {
            if let TransientEvent::MessagesChanged { partner_id } = event {
                let len = store_ref.messages_for_partner(*partner_id).len();
                observed_ref.store(len, Ordering::SeqCst);
            }
        });

        store.append(partner, "hello", true, MessageKind::Text);
        // The listener saw the post-mutation state.
        assert_eq!(observed.load(Ordering::SeqCst), 1);
    }
}
