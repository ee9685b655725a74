//! Session list synchronization
//!
//! This module owns the client-side replica of the remote session list:
//! the session/snapshot data model, the optimistic mutation overlay, the
//! shared observer store, and the polling loop that feeds it.

pub mod model;
pub mod mutation;
pub mod poller;
pub mod store;

pub use model::{sort_sessions, Session, SessionSnapshot, UNTITLED_SESSION_LABEL};
pub use mutation::{MutationKind, PendingMutation};
pub use poller::{Poller, POLL_INTERVAL};
pub use store::SessionListStore;
