//! Remote store trait and common chat/board types for Cofound
//!
//! This module defines the `RemoteStore` trait that the HTTP client (and
//! test doubles) implement, along with the chat message and knowledge board
//! types shared across the session layer and the console.

use crate::error::Result;
use crate::session::Session;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message written by the user
    User,
    /// Message produced by the agent (or synthesized locally on failure)
    Assistant,
}

/// A single transcript entry
///
/// Transcripts are append-only per thread and are fetched independently of
/// the session list; list entries never carry them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who produced the message
    pub role: Role,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Creates a new user message
    ///
    /// # Examples
    ///
    /// ```
    /// use cofound::api::{ChatMessage, Role};
    ///
    /// let msg = ChatMessage::user("Hello!");
    /// assert_eq!(msg.role, Role::User);
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates a new assistant message
    ///
    /// # Examples
    ///
    /// ```
    /// use cofound::api::{ChatMessage, Role};
    ///
    /// let msg = ChatMessage::assistant("Hi there");
    /// assert_eq!(msg.role, Role::Assistant);
    /// ```
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Status of a knowledge board task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started
    #[default]
    Todo,
    /// Currently being worked on
    InProgress,
    /// Finished
    Done,
}

/// One roadmap entry on the knowledge board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardTask {
    /// Short task title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Longer task description, used as the label when no title is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Current status
    #[serde(default)]
    pub status: TaskStatus,
}

impl BoardTask {
    /// Label to render for this task: title, falling back to description
    pub fn label(&self) -> &str {
        self.title
            .as_deref()
            .or(self.description.as_deref())
            .unwrap_or("")
    }
}

/// Per-thread knowledge board: vision text plus a roadmap
///
/// Polled alongside (but independently of) the session list. An empty
/// board response never replaces a previously held board; the board panel
/// retains the last good state across glitches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardDetail {
    /// Vision and strategy prose
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vision: Option<String>,

    /// Roadmap tasks
    #[serde(default)]
    pub tasks: Vec<BoardTask>,
}

impl BoardDetail {
    /// True when the response carried neither vision nor tasks
    pub fn is_empty(&self) -> bool {
        self.vision.is_none() && self.tasks.is_empty()
    }

    /// Number of tasks marked done
    pub fn done_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Done)
            .count()
    }

    /// Progress summary in `done / total` form
    ///
    /// # Examples
    ///
    /// ```
    /// use cofound::api::BoardDetail;
    ///
    /// let board = BoardDetail::default();
    /// assert_eq!(board.progress_summary(), "0 / 0");
    /// ```
    pub fn progress_summary(&self) -> String {
        format!("{} / {}", self.done_count(), self.tasks.len())
    }
}

/// Remote session store operations
///
/// The authoritative source of session metadata, transcripts, and board
/// state. There are no push notifications at this boundary; callers
/// discover changes by polling. All implementations must be cheap to share
/// behind an `Arc` across the synchronizer, the thread controller, and the
/// console.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch the full session list
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response cannot be parsed
    async fn list_sessions(&self) -> Result<Vec<Session>>;

    /// Fetch the knowledge board for one thread
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response cannot be parsed
    async fn fetch_board(&self, thread_id: &str) -> Result<BoardDetail>;

    /// Fetch the transcript for one thread
    ///
    /// An empty transcript is a valid result, not an error.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response cannot be parsed
    async fn fetch_history(&self, thread_id: &str) -> Result<Vec<ChatMessage>>;

    /// Send a user message and return the agent's reply
    ///
    /// # Errors
    ///
    /// Returns error if the request fails; callers surface this as a
    /// synthetic assistant transcript entry rather than propagating it
    async fn send_message(&self, thread_id: &str, content: &str) -> Result<ChatMessage>;

    /// Upload a recorded voice message and return the agent's reply
    ///
    /// # Errors
    ///
    /// Returns error if the upload fails or the response cannot be parsed
    async fn send_voice(
        &self,
        thread_id: &str,
        file_name: &str,
        audio: Vec<u8>,
    ) -> Result<ChatMessage>;

    /// Toggle the pin state of a thread
    ///
    /// # Errors
    ///
    /// Returns error if the request fails; the local overlay is not rolled
    /// back — the next poll is the sole reconciliation mechanism
    async fn toggle_pin(&self, thread_id: &str) -> Result<()>;

    /// Rename a thread
    ///
    /// # Errors
    ///
    /// Returns error if the request fails (same recovery as `toggle_pin`)
    async fn rename(&self, thread_id: &str, name: &str) -> Result<()>;

    /// Delete a thread
    ///
    /// Destructive and irreversible; callers must obtain explicit user
    /// confirmation before invoking this.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails; the thread resurrects via the
    /// next poll once the optimistic removal expires
    async fn delete(&self, thread_id: &str) -> Result<()>;

    /// Fetch the identity profile text
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response cannot be parsed
    async fn get_profile(&self) -> Result<String>;

    /// Replace the identity profile text
    ///
    /// # Errors
    ///
    /// Returns error if the request fails
    async fn set_profile(&self, content: &str) -> Result<()>;
}
