//! # confide-shared
//!
//! Domain vocabulary shared by every Confide crate: message and media
//! kind enums plus the filesystem constants of the media layout.

pub mod constants;
pub mod types;

pub use types::{MediaKind, MessageKind};
