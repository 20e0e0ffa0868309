//! # confide-media
//!
//! Filesystem storage for message media: images and voice clips live
//! as flat files named `{uuid}.{ext}` under two sibling directories of
//! the document root (`MessageImages/`, `MessageAudios/`).
//!
//! Every operation here is forgiving: a chat that cannot read an
//! image renders a placeholder instead of failing, so `load` and
//! `delete` degrade to `None` / no-op with a logged warning. The
//! one hard signal is [`MediaStore::save`] returning `None`: callers
//! must not record a message referencing a file that was never
//! written.

mod store;

pub use store::MediaStore;
