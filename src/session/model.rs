//! Session metadata and snapshot ordering
//!
//! This module defines the `Session` record mirrored from the remote store,
//! the immutable `SessionSnapshot` the rest of the client renders from, and
//! the invariant ordering applied to every snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display label used for sessions that have never been renamed
///
/// Display only: the underlying `display_name` stays absent until the
/// first rename.
pub const UNTITLED_SESSION_LABEL: &str = "Untitled Session";

/// One conversation thread as known to the remote store
///
/// The `id` is immutable for the life of the session and is generated by
/// the client as `<prefix>-<millisecond-epoch>` so creation can be
/// optimistic, without a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Stable opaque identifier (wire: `thread_id`)
    #[serde(rename = "thread_id")]
    pub id: String,

    /// User-assigned label; absent until the first rename (wire: `name`)
    #[serde(rename = "name", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Short free-text state description, owned by the remote store
    /// (wire: `status`)
    #[serde(rename = "status", default)]
    pub status_summary: String,

    /// Whether the session sorts into the pinned group (wire: `pinned`)
    #[serde(rename = "pinned", default)]
    pub is_pinned: bool,

    /// Advanced by the remote store whenever thread content changes;
    /// absent for threads that were never touched (wire: `updated_at`)
    #[serde(rename = "updated_at", default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Session {
    /// Create a fresh, optimistically inserted session
    ///
    /// Used for select-new: the thread does not exist server-side yet and
    /// materializes there on the first message.
    ///
    /// # Examples
    ///
    /// ```
    /// use cofound::session::Session;
    ///
    /// let session = Session::draft("founder-1700000000000");
    /// assert!(session.display_name.is_none());
    /// assert!(!session.is_pinned);
    /// ```
    pub fn draft(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            status_summary: "New mission".to_string(),
            is_pinned: false,
            last_updated: Some(Utc::now()),
        }
    }

    /// Label to render for this session
    ///
    /// Returns the display name when one has been assigned, otherwise the
    /// untitled placeholder.
    ///
    /// # Examples
    ///
    /// ```
    /// use cofound::session::Session;
    ///
    /// let session = Session::draft("founder-1");
    /// assert_eq!(session.display_title(), "Untitled Session");
    /// ```
    pub fn display_title(&self) -> &str {
        self.display_name
            .as_deref()
            .unwrap_or(UNTITLED_SESSION_LABEL)
    }

    /// Short id suffix for compact display (last six characters)
    pub fn short_id(&self) -> &str {
        let len = self.id.len();
        &self.id[len.saturating_sub(6)..]
    }
}

/// An immutable, fully ordered view of all sessions at one point in time
///
/// Produced fresh on every accepted poll and every optimistic mutation;
/// never mutated in place. The `revision` makes staleness detection by
/// version trivial for subscribers.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    /// Sessions ordered by `(is_pinned desc, last_updated desc)`
    pub sessions: Vec<Session>,
    /// Monotonically increasing snapshot version
    pub revision: u64,
}

impl SessionSnapshot {
    /// Build a snapshot, applying the invariant ordering
    pub fn new(mut sessions: Vec<Session>, revision: u64) -> Self {
        sort_sessions(&mut sessions);
        Self { sessions, revision }
    }

    /// Look up a session by id
    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// True when a session with this id is present
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Number of sessions in the snapshot
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// True when the snapshot holds no sessions
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Sort sessions by `(is_pinned desc, last_updated desc)`
///
/// The sort is stable: sessions with equal pin state and timestamp keep
/// their relative input order, so equal entries do not jitter between poll
/// cycles. Sessions without a timestamp sort below any timestamped one
/// within their pin group.
pub fn sort_sessions(sessions: &mut [Session]) {
    sessions.sort_by(|a, b| {
        b.is_pinned
            .cmp(&a.is_pinned)
            .then_with(|| b.last_updated.cmp(&a.last_updated))
    });
}
