//! Cofound - console client for the co-founder agent
//!
//! This library provides the client-side core for the co-founder console:
//! session synchronization against a polled remote store, optimistic
//! mutations, the active thread controller, and the interactive console.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `api`: Remote store trait, wire types, and the HTTP client
//! - `session`: Session model, optimistic mutation overlay, shared store,
//!   and the polling synchronizer
//! - `thread`: Active thread state machine and transcript handling
//! - `menu`: Contextual menu state for the session list
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//! - `commands`: Command handlers for the CLI entrypoint
//!
//! # Example
//!
//! ```no_run
//! use cofound::{AgentClient, Config, SessionListStore};
//! use cofound::api::RemoteStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let client = AgentClient::new(&config.server)?;
//!     let store = SessionListStore::new(config.session.reconcile_poll_budget);
//!     let sessions = client.list_sessions().await?;
//!     store.reconcile(1, sessions);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod menu;
pub mod session;
pub mod thread;

// Re-export commonly used types
pub use api::{AgentClient, BoardDetail, ChatMessage, RemoteStore, Role};
pub use config::Config;
pub use error::{CofoundError, Result};
pub use menu::MenuState;
pub use session::{Poller, Session, SessionListStore, SessionSnapshot};
pub use thread::{ThreadController, ThreadState};

#[cfg(test)]
pub mod test_utils;
