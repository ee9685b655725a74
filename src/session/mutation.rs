//! Optimistic mutation records
//!
//! A `PendingMutation` captures a client-initiated write that the remote
//! store has not yet confirmed. Mutations carry absolute values (never
//! toggle-relative deltas) so reapplying a duplicated event is idempotent,
//! and they exist only in memory: an accepted poll that agrees with the
//! mutation clears it, and a bounded number of disagreeing polls expires it.

use crate::session::Session;
use chrono::{DateTime, Utc};

/// The write a pending mutation represents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    /// Set the pin state to an absolute value computed from the state the
    /// user was looking at when the event fired
    SetPinned(bool),

    /// Assign a display name
    Rename(String),

    /// Remove the session
    Delete,

    /// Insert a session that does not exist server-side yet (select-new);
    /// the first message materializes it remotely
    Create(Session),
}

impl MutationKind {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetPinned(_) => "pin",
            Self::Rename(_) => "rename",
            Self::Delete => "delete",
            Self::Create(_) => "create",
        }
    }
}

/// A client-initiated write awaiting confirmation by poll
#[derive(Debug, Clone)]
pub struct PendingMutation {
    /// Target session id
    pub session_id: String,
    /// What the mutation changes
    pub kind: MutationKind,
    /// When the mutation was applied locally
    pub issued_at: DateTime<Utc>,
    /// Accepted-but-inconsistent polls left before this record expires
    pub polls_remaining: u8,
}

impl PendingMutation {
    /// Create a pending mutation with a fresh poll budget
    pub fn new(session_id: impl Into<String>, kind: MutationKind, poll_budget: u8) -> Self {
        Self {
            session_id: session_id.into(),
            kind,
            issued_at: Utc::now(),
            polls_remaining: poll_budget,
        }
    }

    /// True when `other` occupies the same overlay slot
    ///
    /// A new mutation replaces (never stacks on) an older one for the same
    /// session and kind, which is what keeps rapid duplicate events from
    /// accumulating.
    pub fn same_slot(&self, other: &Self) -> bool {
        self.session_id == other.session_id
            && std::mem::discriminant(&self.kind) == std::mem::discriminant(&other.kind)
    }

    /// Apply this mutation on top of an authoritative session list
    ///
    /// Missing targets are a no-op: a session the store no longer knows
    /// cannot be pinned or renamed, and overlaying nothing is harmless.
    pub fn apply_to(&self, sessions: &mut Vec<Session>) {
        match &self.kind {
            MutationKind::SetPinned(pinned) => {
                if let Some(session) = sessions.iter_mut().find(|s| s.id == self.session_id) {
                    session.is_pinned = *pinned;
                }
            }
            MutationKind::Rename(name) => {
                if let Some(session) = sessions.iter_mut().find(|s| s.id == self.session_id) {
                    session.display_name = Some(name.clone());
                }
            }
            MutationKind::Delete => {
                sessions.retain(|s| s.id != self.session_id);
            }
            MutationKind::Create(draft) => {
                if !sessions.iter().any(|s| s.id == self.session_id) {
                    sessions.push(draft.clone());
                }
            }
        }
    }

    /// True when an authoritative list already reflects this mutation
    ///
    /// A vanished target counts as consistent for pin/rename (there is
    /// nothing left to overlay), as does presence for create and absence
    /// for delete.
    pub fn is_consistent_with(&self, authoritative: &[Session]) -> bool {
        let target = authoritative.iter().find(|s| s.id == self.session_id);
        match &self.kind {
            MutationKind::SetPinned(pinned) => {
                target.map_or(true, |s| s.is_pinned == *pinned)
            }
            MutationKind::Rename(name) => {
                target.map_or(true, |s| s.display_name.as_deref() == Some(name.as_str()))
            }
            MutationKind::Delete => target.is_none(),
            MutationKind::Create(_) => target.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: &str, pinned: bool) -> Session {
        Session {
            id: id.to_string(),
            display_name: None,
            status_summary: String::new(),
            is_pinned: pinned,
            last_updated: None,
        }
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(MutationKind::SetPinned(true).name(), "pin");
        assert_eq!(MutationKind::Rename("x".to_string()).name(), "rename");
        assert_eq!(MutationKind::Delete.name(), "delete");
        assert_eq!(MutationKind::Create(session("a", false)).name(), "create");
    }

    #[test]
    fn test_same_slot_matches_kind_and_session() {
        let pin_a = PendingMutation::new("a", MutationKind::SetPinned(true), 3);
        let unpin_a = PendingMutation::new("a", MutationKind::SetPinned(false), 3);
        let pin_b = PendingMutation::new("b", MutationKind::SetPinned(true), 3);
        let rename_a = PendingMutation::new("a", MutationKind::Rename("x".to_string()), 3);

        assert!(pin_a.same_slot(&unpin_a));
        assert!(!pin_a.same_slot(&pin_b));
        assert!(!pin_a.same_slot(&rename_a));
    }

    #[test]
    fn test_apply_set_pinned() {
        let mut sessions = vec![session("a", false), session("b", false)];
        let mutation = PendingMutation::new("a", MutationKind::SetPinned(true), 3);
        mutation.apply_to(&mut sessions);
        assert!(sessions[0].is_pinned);
        assert!(!sessions[1].is_pinned);
    }

    #[test]
    fn test_apply_rename() {
        let mut sessions = vec![session("a", false)];
        let mutation = PendingMutation::new("a", MutationKind::Rename("Launch".to_string()), 3);
        mutation.apply_to(&mut sessions);
        assert_eq!(sessions[0].display_name.as_deref(), Some("Launch"));
    }

    #[test]
    fn test_apply_delete() {
        let mut sessions = vec![session("a", false), session("b", false)];
        let mutation = PendingMutation::new("a", MutationKind::Delete, 3);
        mutation.apply_to(&mut sessions);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, "b");
    }

    #[test]
    fn test_apply_create_inserts_once() {
        let mut sessions = vec![session("a", false)];
        let draft = session("new", false);
        let mutation = PendingMutation::new("new", MutationKind::Create(draft), 3);

        mutation.apply_to(&mut sessions);
        assert_eq!(sessions.len(), 2);

        // Reapplying after the poll already brought the session is a no-op
        mutation.apply_to(&mut sessions);
        assert_eq!(sessions.len(), 2);
    }

    #[test]
    fn test_apply_on_missing_target_is_noop() {
        let mut sessions = vec![session("a", false)];
        let mutation = PendingMutation::new("ghost", MutationKind::SetPinned(true), 3);
        mutation.apply_to(&mut sessions);
        assert_eq!(sessions.len(), 1);
        assert!(!sessions[0].is_pinned);
    }

    #[test]
    fn test_consistency_set_pinned() {
        let authoritative = vec![session("a", true)];
        let agreed = PendingMutation::new("a", MutationKind::SetPinned(true), 3);
        let disagreed = PendingMutation::new("a", MutationKind::SetPinned(false), 3);
        assert!(agreed.is_consistent_with(&authoritative));
        assert!(!disagreed.is_consistent_with(&authoritative));
    }

    #[test]
    fn test_consistency_rename() {
        let mut named = session("a", false);
        named.display_name = Some("Launch".to_string());
        let authoritative = vec![named];

        let agreed = PendingMutation::new("a", MutationKind::Rename("Launch".to_string()), 3);
        let disagreed = PendingMutation::new("a", MutationKind::Rename("Other".to_string()), 3);
        assert!(agreed.is_consistent_with(&authoritative));
        assert!(!disagreed.is_consistent_with(&authoritative));
    }

    #[test]
    fn test_consistency_delete() {
        let authoritative = vec![session("a", false)];
        let mutation = PendingMutation::new("a", MutationKind::Delete, 3);
        assert!(!mutation.is_consistent_with(&authoritative));
        assert!(mutation.is_consistent_with(&[]));
    }

    #[test]
    fn test_consistency_create() {
        let draft = session("new", false);
        let mutation = PendingMutation::new("new", MutationKind::Create(draft.clone()), 3);
        assert!(!mutation.is_consistent_with(&[]));
        assert!(mutation.is_consistent_with(&[draft]));
    }

    #[test]
    fn test_consistency_vanished_target_clears_pin_and_rename() {
        let pin = PendingMutation::new("gone", MutationKind::SetPinned(true), 3);
        let rename = PendingMutation::new("gone", MutationKind::Rename("x".to_string()), 3);
        assert!(pin.is_consistent_with(&[]));
        assert!(rename.is_consistent_with(&[]));
    }
}
