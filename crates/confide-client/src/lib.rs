//! # confide-client
//!
//! The service layer a UI talks to: one [`ChatService`] facade hiding
//! the durable/transient storage split behind a single read/write
//! contract, plus chat-partner lifecycle management and process-level
//! concerns (logging, default data directory).

pub mod chat;

mod error;

pub use chat::ChatService;
pub use error::{ChatError, Result};

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber. Call once at startup;
/// `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("confide_client=debug,confide_store=info,confide_media=info,warn")
    });

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
