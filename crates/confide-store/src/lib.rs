//! # confide-store
//!
//! The message persistence layer: a durable SQLite store for chat
//! partners and their messages, and a transient in-memory store for
//! partners whose history is not persisted.
//!
//! The durable side exposes a synchronous [`Database`] handle wrapping
//! a `rusqlite::Connection` with typed CRUD helpers per domain model.
//! The transient side is a process-lifetime map from partner to
//! message list that notifies subscribers on every mutation and is
//! discarded at process exit.

pub mod database;
pub mod messages;
pub mod migrations;
pub mod models;
pub mod partners;
pub mod transient;

mod error;

pub use database::Database;
pub use error::StoreError;
pub use models::*;
pub use transient::{TransientEvent, TransientStore};
