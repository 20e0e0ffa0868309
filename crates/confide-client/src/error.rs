use thiserror::Error;

use confide_store::StoreError;

/// Errors surfaced by [`ChatService`] operations.
///
/// [`ChatService`]: crate::chat::ChatService
#[derive(Error, Debug)]
pub enum ChatError {
    /// The persistence layer failed; nothing was recorded.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The media file could not be written; no message was recorded.
    #[error("Failed to save media file")]
    MediaSave,

    /// A recording was referenced that is not in the audio directory.
    #[error("Recording '{0}' not found")]
    RecordingMissing(String),

    /// The message text was empty after trimming.
    #[error("Message text is empty")]
    EmptyMessage,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ChatError>;
