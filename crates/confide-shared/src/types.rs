use serde::{Deserialize, Serialize};

use crate::constants;

/// What a message content field holds: literal text, or the file name
/// of a stored image / voice clip.
///
/// Stored as lowercase text in SQLite. The store decodes unknown
/// values as [`MessageKind::Text`] so a single bad row never poisons a
/// whole conversation query.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    Image,
    Voice,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Image => "image",
            MessageKind::Voice => "voice",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(MessageKind::Text),
            "image" => Some(MessageKind::Image),
            "voice" => Some(MessageKind::Voice),
            _ => None,
        }
    }

    /// The media namespace backing this kind, if any.
    pub fn media_kind(&self) -> Option<MediaKind> {
        match self {
            MessageKind::Text => None,
            MessageKind::Image => Some(MediaKind::Image),
            MessageKind::Voice => Some(MediaKind::Audio),
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One of the two media namespaces on disk.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Audio,
}

impl MediaKind {
    /// Directory name under the document root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            MediaKind::Image => constants::IMAGES_DIR,
            MediaKind::Audio => constants::AUDIOS_DIR,
        }
    }

    /// File extension for files in this namespace.
    pub fn extension(&self) -> &'static str {
        match self {
            MediaKind::Image => constants::IMAGE_EXT,
            MediaKind::Audio => constants::AUDIO_EXT,
        }
    }

    /// The message kind a file in this namespace is referenced by.
    pub fn message_kind(&self) -> MessageKind {
        match self {
            MediaKind::Image => MessageKind::Image,
            MediaKind::Audio => MessageKind::Voice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_string_round_trip() {
        for kind in [MessageKind::Text, MessageKind::Image, MessageKind::Voice] {
            assert_eq!(MessageKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(MessageKind::parse("video"), None);
    }

    #[test]
    fn media_kind_mapping() {
        assert_eq!(MessageKind::Text.media_kind(), None);
        assert_eq!(MessageKind::Image.media_kind(), Some(MediaKind::Image));
        assert_eq!(MessageKind::Voice.media_kind(), Some(MediaKind::Audio));

        assert_eq!(MediaKind::Image.message_kind(), MessageKind::Image);
        assert_eq!(MediaKind::Audio.message_kind(), MessageKind::Voice);
    }

    #[test]
    fn media_kind_layout() {
        assert_eq!(MediaKind::Image.dir_name(), "MessageImages");
        assert_eq!(MediaKind::Image.extension(), "jpg");
        assert_eq!(MediaKind::Audio.dir_name(), "MessageAudios");
        assert_eq!(MediaKind::Audio.extension(), "m4a");
    }
}
