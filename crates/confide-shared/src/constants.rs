/// Application name
pub const APP_NAME: &str = "Confide";

/// Directory holding image message files, under the document root
pub const IMAGES_DIR: &str = "MessageImages";

/// Directory holding voice message files, under the document root
pub const AUDIOS_DIR: &str = "MessageAudios";

/// File extension for stored images
pub const IMAGE_EXT: &str = "jpg";

/// File extension for stored voice clips
pub const AUDIO_EXT: &str = "m4a";

/// Maximum media file size in bytes (50 MiB)
pub const MAX_MEDIA_SIZE: usize = 50 * 1024 * 1024;
