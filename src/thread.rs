//! Active thread controller
//!
//! Tracks which conversation thread is current, drives history loading when
//! the selection changes, and appends sent/received messages to that
//! thread's in-memory transcript.
//!
//! The controller is a three-state machine: `Uninitialized` (nothing
//! chosen), `Loading` (history fetch in flight), `Ready` (transcript
//! available, input enabled). A history fetch is never truly cancelled;
//! its result is compared against the id that is current at resolution time
//! and discarded when the selection has moved on.

use crate::api::{ChatMessage, RemoteStore};
use crate::error::Result;

/// Current selection state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadState {
    /// No thread chosen
    Uninitialized,
    /// History fetch in flight for the chosen id
    Loading {
        /// Target thread id
        id: String,
    },
    /// Transcript available; message input enabled unless a send is in flight
    Ready {
        /// Active thread id
        id: String,
        /// True while exactly one send awaits its reply
        sending: bool,
    },
}

/// State machine for the active conversation thread
#[derive(Debug)]
pub struct ThreadController {
    state: ThreadState,
    transcript: Vec<ChatMessage>,
}

impl Default for ThreadController {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadController {
    /// Create a controller with no thread selected
    pub fn new() -> Self {
        Self {
            state: ThreadState::Uninitialized,
            transcript: Vec::new(),
        }
    }

    /// Current state
    pub fn state(&self) -> &ThreadState {
        &self.state
    }

    /// Id of the selected thread, if any
    pub fn active_id(&self) -> Option<&str> {
        match &self.state {
            ThreadState::Uninitialized => None,
            ThreadState::Loading { id } | ThreadState::Ready { id, .. } => Some(id),
        }
    }

    /// True when the transcript is loaded and no send is outstanding
    pub fn can_send(&self) -> bool {
        matches!(&self.state, ThreadState::Ready { sending: false, .. })
    }

    /// The active thread's transcript
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Synthesize a fresh thread id: `<prefix>-<millisecond-epoch>`
    ///
    /// Unique enough for single-user usage; same-millisecond collisions are
    /// an accepted risk.
    pub fn synthesize_id(prefix: &str) -> String {
        format!("{}-{}", prefix, chrono::Utc::now().timestamp_millis())
    }

    /// Resolve the id to activate on first entry
    ///
    /// The navigation collaborator may request an id (URL, CLI flag); when
    /// it does not, a fresh id is synthesized and handed back outward.
    pub fn resolve_initial_id(requested: Option<String>, prefix: &str) -> String {
        requested.unwrap_or_else(|| Self::synthesize_id(prefix))
    }

    /// Begin loading a thread's history
    ///
    /// Supersedes any selection already in flight; a late result for the
    /// previous id will be discarded by [`Self::complete_load`].
    pub fn begin_load(&mut self, id: impl Into<String>) {
        let id = id.into();
        tracing::debug!(thread_id = %id, "Selecting thread");
        self.transcript.clear();
        self.state = ThreadState::Loading { id };
    }

    /// Apply the outcome of a history fetch
    ///
    /// The result is applied only when `id` is still the id being loaded;
    /// anything else (selection moved on, thread deleted meanwhile) is
    /// discarded. An empty history is a valid Ready state. A failed fetch
    /// still transitions to Ready, with one synthetic assistant entry in
    /// place of the transcript, so the console never blocks on it.
    ///
    /// # Returns
    ///
    /// `true` when the result was applied, `false` when discarded
    pub fn complete_load(&mut self, id: &str, result: Result<Vec<ChatMessage>>) -> bool {
        match &self.state {
            ThreadState::Loading { id: current } if current == id => {}
            _ => {
                tracing::debug!(thread_id = %id, "Discarding stale history result");
                return false;
            }
        }

        match result {
            Ok(messages) => {
                self.transcript = messages;
            }
            Err(e) => {
                tracing::warn!(thread_id = %id, "History fetch failed: {}", e);
                self.transcript = vec![ChatMessage::assistant(format!("Error: {}", e))];
            }
        }
        self.state = ThreadState::Ready {
            id: id.to_string(),
            sending: false,
        };
        true
    }

    /// Select a thread and load its history from the remote store
    ///
    /// # Returns
    ///
    /// `true` when the loaded history was applied (the selection did not
    /// change while the fetch was in flight)
    pub async fn activate(&mut self, store: &dyn RemoteStore, id: &str) -> bool {
        self.begin_load(id);
        let result = store.fetch_history(id).await;
        self.complete_load(id, result)
    }

    /// Optimistically append the user's message and lock the input
    ///
    /// # Returns
    ///
    /// The active thread id when the send may proceed, `None` when the
    /// controller is not in a sendable state (no thread, still loading, or
    /// a send already outstanding)
    pub fn begin_send(&mut self, content: impl Into<String>) -> Option<String> {
        let id = match &mut self.state {
            ThreadState::Ready { id, sending } if !*sending => {
                *sending = true;
                id.clone()
            }
            _ => return None,
        };
        self.transcript.push(ChatMessage::user(content));
        Some(id)
    }

    /// Apply the outcome of a send
    ///
    /// On success the agent's reply is appended; on failure a single
    /// synthetic assistant entry is appended instead and no retry is
    /// attempted. Either way the input is re-enabled. The result is
    /// discarded when the thread is no longer active (deleted or switched
    /// while the reply was in flight).
    pub fn complete_send(&mut self, id: &str, result: Result<ChatMessage>) -> bool {
        match &mut self.state {
            ThreadState::Ready {
                id: current,
                sending,
            } if current == id && *sending => {
                *sending = false;
            }
            _ => {
                tracing::debug!(thread_id = %id, "Discarding stale send result");
                return false;
            }
        }

        match result {
            Ok(reply) => self.transcript.push(reply),
            Err(e) => {
                tracing::error!(thread_id = %id, "Send failed: {}", e);
                self.transcript
                    .push(ChatMessage::assistant(format!("Error: {}", e)));
            }
        }
        true
    }

    /// Send a message through the remote store
    ///
    /// # Returns
    ///
    /// `false` when the controller was not in a sendable state
    pub async fn send(&mut self, store: &dyn RemoteStore, content: &str) -> bool {
        let Some(id) = self.begin_send(content) else {
            return false;
        };
        let result = store.send_message(&id, content).await;
        self.complete_send(&id, result)
    }

    /// Upload a voice message through the remote store
    ///
    /// The transcript carries an `[audio message]` placeholder for the user
    /// turn, mirroring what the backend transcribes server-side.
    ///
    /// # Returns
    ///
    /// `false` when the controller was not in a sendable state
    pub async fn send_voice(
        &mut self,
        store: &dyn RemoteStore,
        file_name: &str,
        audio: Vec<u8>,
    ) -> bool {
        let Some(id) = self.begin_send("[audio message]") else {
            return false;
        };
        let result = store.send_voice(&id, file_name, audio).await;
        self.complete_send(&id, result)
    }

    /// Drop the selection entirely
    ///
    /// Used when the active session is deleted: the controller falls back
    /// to `Uninitialized` and any in-flight fetch or send for the old id
    /// will be discarded on arrival.
    pub fn clear_active(&mut self) {
        tracing::debug!("Clearing active thread");
        self.state = ThreadState::Uninitialized;
        self.transcript.clear();
    }
}
