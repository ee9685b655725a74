//! Remote store boundary
//!
//! The trait and types live in `base`; the HTTP implementation lives in
//! `http`. Everything else in the crate depends on the trait, so tests can
//! substitute mock stores.

pub mod base;
pub mod http;

pub use base::{BoardDetail, BoardTask, ChatMessage, RemoteStore, Role, TaskStatus};
pub use http::AgentClient;

#[cfg(test)]
pub use base::MockRemoteStore;
