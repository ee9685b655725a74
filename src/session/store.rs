//! Shared session list store with an optimistic mutation overlay
//!
//! The `SessionListStore` is the single owner of the rendered session list.
//! It keeps two layers of state: the authoritative copy (replaced wholesale
//! by each accepted poll) and a set of pending mutations applied on top of
//! it. Every change produces a fresh `SessionSnapshot` that is published to
//! subscribers through a watch channel; the authoritative copy is never
//! mutated in place by user actions.
//!
//! Poll results are tagged with issue-time sequence numbers and applied in
//! sequence order only: a slow response arriving after a newer one is
//! discarded, so confirmed state can never be undone by a late poll.

use crate::session::model::{Session, SessionSnapshot};
use crate::session::mutation::{MutationKind, PendingMutation};
use std::sync::RwLock;
use tokio::sync::watch;

/// Observer store for the reconciled session list
///
/// Cheap to share behind an `Arc`; all methods take `&self`. Subscribers
/// receive a fresh snapshot after every accepted poll and every optimistic
/// mutation.
pub struct SessionListStore {
    inner: RwLock<StoreInner>,
    tx: watch::Sender<SessionSnapshot>,
    poll_budget: u8,
}

struct StoreInner {
    authoritative: Vec<Session>,
    pending: Vec<PendingMutation>,
    last_accepted_seq: u64,
    revision: u64,
}

impl SessionListStore {
    /// Create an empty store
    ///
    /// # Arguments
    ///
    /// * `poll_budget` - accepted-but-inconsistent polls a pending mutation
    ///   survives before it expires
    ///
    /// # Examples
    ///
    /// ```
    /// use cofound::session::SessionListStore;
    ///
    /// let store = SessionListStore::new(3);
    /// assert!(store.snapshot().is_empty());
    /// ```
    pub fn new(poll_budget: u8) -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot::default());
        Self {
            inner: RwLock::new(StoreInner {
                authoritative: Vec::new(),
                pending: Vec::new(),
                last_accepted_seq: 0,
                revision: 0,
            }),
            tx,
            poll_budget,
        }
    }

    /// Current effective snapshot (authoritative state plus overlay)
    pub fn snapshot(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }

    /// Subscribe to snapshot updates
    ///
    /// The receiver observes every published snapshot; use
    /// `receiver.borrow_and_update()` after `changed()` resolves.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    /// Number of unconfirmed mutations currently overlaid
    pub fn pending_count(&self) -> usize {
        self.inner.read().map(|inner| inner.pending.len()).unwrap_or(0)
    }

    /// Apply a poll result
    ///
    /// `seq` is the sequence number assigned when the poll was issued.
    /// Results at or below the last accepted sequence are discarded, which
    /// keeps a slow late response from undoing newer confirmed state.
    /// An accepted result replaces the authoritative list wholesale,
    /// confirms pending mutations the list agrees with, and ages out the
    /// rest.
    ///
    /// # Returns
    ///
    /// `true` when the result was accepted, `false` when discarded
    pub fn reconcile(&self, seq: u64, sessions: Vec<Session>) -> bool {
        let Ok(mut inner) = self.inner.write() else {
            return false;
        };

        if seq <= inner.last_accepted_seq {
            tracing::debug!(
                seq,
                last_accepted = inner.last_accepted_seq,
                "Discarding out-of-order poll result"
            );
            return false;
        }

        inner.last_accepted_seq = seq;
        inner.authoritative = sessions;

        let mut kept = Vec::with_capacity(inner.pending.len());
        for mut mutation in std::mem::take(&mut inner.pending) {
            if mutation.is_consistent_with(&inner.authoritative) {
                tracing::debug!(
                    session_id = %mutation.session_id,
                    kind = mutation.kind.name(),
                    "Pending mutation confirmed by poll"
                );
                continue;
            }
            mutation.polls_remaining = mutation.polls_remaining.saturating_sub(1);
            if mutation.polls_remaining == 0 {
                tracing::warn!(
                    session_id = %mutation.session_id,
                    kind = mutation.kind.name(),
                    "Pending mutation expired unconfirmed; authoritative state wins"
                );
                continue;
            }
            kept.push(mutation);
        }
        inner.pending = kept;

        self.publish(&mut inner);
        true
    }

    /// Pin or unpin a session to an absolute value
    ///
    /// The value must be computed from the state the user acted on, so a
    /// duplicated event reapplies the same value instead of toggling twice.
    pub fn set_pinned(&self, session_id: &str, pinned: bool) {
        self.apply(session_id, MutationKind::SetPinned(pinned));
    }

    /// Toggle a session's pin state from the current effective state
    ///
    /// # Returns
    ///
    /// The new pin value, or `None` when the session is unknown
    pub fn toggle_pin(&self, session_id: &str) -> Option<bool> {
        let target = {
            let snapshot = self.snapshot();
            let session = snapshot.get(session_id)?;
            !session.is_pinned
        };
        self.set_pinned(session_id, target);
        Some(target)
    }

    /// Optimistically rename a session
    pub fn rename(&self, session_id: &str, name: impl Into<String>) {
        self.apply(session_id, MutationKind::Rename(name.into()));
    }

    /// Optimistically remove a session
    ///
    /// Callers must have obtained explicit user confirmation first; removal
    /// takes effect locally before any network call is dispatched.
    pub fn remove(&self, session_id: &str) {
        self.apply(session_id, MutationKind::Delete);
    }

    /// Optimistically insert a freshly created session (select-new)
    pub fn insert_new(&self, session: Session) {
        let id = session.id.clone();
        self.apply(&id, MutationKind::Create(session));
    }

    /// Record a mutation and publish the new effective snapshot
    ///
    /// A mutation for the same session and kind replaces the previous one
    /// rather than stacking, so rapid duplicate events stay idempotent.
    fn apply(&self, session_id: &str, kind: MutationKind) {
        let Ok(mut inner) = self.inner.write() else {
            return;
        };

        tracing::debug!(session_id, kind = kind.name(), "Applying optimistic mutation");

        let mutation = PendingMutation::new(session_id, kind, self.poll_budget);
        inner.pending.retain(|existing| !existing.same_slot(&mutation));
        inner.pending.push(mutation);

        self.publish(&mut inner);
    }

    fn publish(&self, inner: &mut StoreInner) {
        let mut effective = inner.authoritative.clone();
        for mutation in &inner.pending {
            mutation.apply_to(&mut effective);
        }
        inner.revision += 1;
        self.tx
            .send_replace(SessionSnapshot::new(effective, inner.revision));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;

    fn session(id: &str, pinned: bool, updated_ms: i64) -> Session {
        Session {
            id: id.to_string(),
            display_name: None,
            status_summary: String::new(),
            is_pinned: pinned,
            last_updated: Some(Utc.timestamp_millis_opt(updated_ms).unwrap()),
        }
    }

    fn named(id: &str, name: &str) -> Session {
        let mut s = session(id, false, 100);
        s.display_name = Some(name.to_string());
        s
    }

    fn ids(snapshot: &SessionSnapshot) -> Vec<String> {
        snapshot.sessions.iter().map(|s| s.id.clone()).collect()
    }

    #[test]
    fn test_reconcile_replaces_wholesale() {
        let store = SessionListStore::new(3);
        assert!(store.reconcile(1, vec![session("a", false, 100)]));
        assert_eq!(ids(&store.snapshot()), vec!["a"]);

        assert!(store.reconcile(2, vec![session("b", false, 200)]));
        assert_eq!(ids(&store.snapshot()), vec!["b"]);
    }

    #[test]
    fn test_reconcile_discards_out_of_order() {
        let store = SessionListStore::new(3);

        // Poll #2 resolves first with snapshot B, then #1 arrives late with A
        assert!(store.reconcile(2, vec![session("b", false, 200)]));
        assert!(!store.reconcile(1, vec![session("a", false, 100)]));

        assert_eq!(ids(&store.snapshot()), vec!["b"]);
    }

    #[test]
    fn test_reconcile_discards_duplicate_seq() {
        let store = SessionListStore::new(3);
        assert!(store.reconcile(1, vec![session("a", false, 100)]));
        assert!(!store.reconcile(1, vec![session("b", false, 200)]));
        assert_eq!(ids(&store.snapshot()), vec!["a"]);
    }

    #[test]
    fn test_snapshot_ordering_applied() {
        let store = SessionListStore::new(3);
        store.reconcile(
            1,
            vec![
                session("recent", false, 900),
                session("pinned", true, 100),
                session("old", false, 50),
            ],
        );
        assert_eq!(ids(&store.snapshot()), vec!["pinned", "recent", "old"]);
    }

    #[test]
    fn test_revision_increases_on_every_publish() {
        let store = SessionListStore::new(3);
        let r0 = store.snapshot().revision;
        store.reconcile(1, vec![session("a", false, 100)]);
        let r1 = store.snapshot().revision;
        store.set_pinned("a", true);
        let r2 = store.snapshot().revision;
        assert!(r0 < r1 && r1 < r2);
    }

    #[test]
    fn test_set_pinned_is_idempotent_for_duplicate_events() {
        let store = SessionListStore::new(3);
        store.reconcile(1, vec![session("a", true, 100)]);

        // Two duplicated unpin events that both captured the pinned state
        store.set_pinned("a", false);
        store.set_pinned("a", false);

        let snapshot = store.snapshot();
        assert!(!snapshot.get("a").unwrap().is_pinned);
        // Replaced, not stacked
        assert_eq!(store.pending_count(), 1);
    }

    #[test]
    fn test_toggle_pin_computes_from_effective_state() {
        let store = SessionListStore::new(3);
        store.reconcile(1, vec![session("a", false, 100)]);

        assert_eq!(store.toggle_pin("a"), Some(true));
        assert!(store.snapshot().get("a").unwrap().is_pinned);

        // Second deliberate toggle sees the overlaid value and flips back
        assert_eq!(store.toggle_pin("a"), Some(false));
        assert!(!store.snapshot().get("a").unwrap().is_pinned);
    }

    #[test]
    fn test_toggle_pin_unknown_session() {
        let store = SessionListStore::new(3);
        assert_eq!(store.toggle_pin("ghost"), None);
        assert_eq!(store.pending_count(), 0);
    }

    #[test]
    fn test_rename_survives_stale_poll() {
        let store = SessionListStore::new(3);
        store.reconcile(1, vec![named("a", "Old name")]);

        store.rename("a", "Foo");
        assert_eq!(
            store.snapshot().get("a").unwrap().display_name.as_deref(),
            Some("Foo")
        );

        // A poll still carrying the old name must not regress the UI
        store.reconcile(2, vec![named("a", "Old name")]);
        assert_eq!(
            store.snapshot().get("a").unwrap().display_name.as_deref(),
            Some("Foo")
        );
    }

    #[test]
    fn test_rename_confirmed_by_poll_clears_pending() {
        let store = SessionListStore::new(3);
        store.reconcile(1, vec![named("a", "Old name")]);
        store.rename("a", "Foo");
        assert_eq!(store.pending_count(), 1);

        store.reconcile(2, vec![named("a", "Foo")]);
        assert_eq!(store.pending_count(), 0);
        assert_eq!(
            store.snapshot().get("a").unwrap().display_name.as_deref(),
            Some("Foo")
        );
    }

    #[test]
    fn test_pending_expires_after_budget() {
        let store = SessionListStore::new(2);
        store.reconcile(1, vec![named("a", "Old name")]);
        store.rename("a", "Foo");

        // Two accepted polls that disagree exhaust the budget
        store.reconcile(2, vec![named("a", "Old name")]);
        assert_eq!(store.pending_count(), 1);
        store.reconcile(3, vec![named("a", "Old name")]);
        assert_eq!(store.pending_count(), 0);

        // Authoritative value shows through again
        assert_eq!(
            store.snapshot().get("a").unwrap().display_name.as_deref(),
            Some("Old name")
        );
    }

    #[test]
    fn test_remove_is_immediate_and_resurrects_on_failed_delete() {
        let store = SessionListStore::new(2);
        store.reconcile(1, vec![session("a", false, 100), session("b", false, 50)]);

        store.remove("a");
        assert_eq!(ids(&store.snapshot()), vec!["b"]);

        // The delete call failed silently: the server keeps listing "a".
        // Once the overlay expires, the next poll resurrects it.
        store.reconcile(2, vec![session("a", false, 100), session("b", false, 50)]);
        assert_eq!(ids(&store.snapshot()), vec!["b"]);
        store.reconcile(3, vec![session("a", false, 100), session("b", false, 50)]);
        assert_eq!(ids(&store.snapshot()), vec!["a", "b"]);
    }

    #[test]
    fn test_remove_confirmed_by_poll() {
        let store = SessionListStore::new(3);
        store.reconcile(1, vec![session("a", false, 100), session("b", false, 50)]);

        store.remove("a");
        store.reconcile(2, vec![session("b", false, 50)]);
        assert_eq!(store.pending_count(), 0);
        assert_eq!(ids(&store.snapshot()), vec!["b"]);
    }

    #[test]
    fn test_insert_new_visible_before_poll_catches_up() {
        let store = SessionListStore::new(3);
        store.reconcile(1, vec![session("a", false, 100)]);

        store.insert_new(Session::draft("founder-123"));
        assert!(store.snapshot().contains("founder-123"));

        // Poll without the new session keeps it overlaid
        store.reconcile(2, vec![session("a", false, 100)]);
        assert!(store.snapshot().contains("founder-123"));

        // Poll that includes it confirms the create
        store.reconcile(
            3,
            vec![session("a", false, 100), session("founder-123", false, 999)],
        );
        assert_eq!(store.pending_count(), 0);
        assert!(store.snapshot().contains("founder-123"));
    }

    #[test]
    fn test_failed_poll_leaves_snapshot_untouched() {
        // A failed fetch never calls reconcile; the last good snapshot stays
        let store = SessionListStore::new(3);
        store.reconcile(1, vec![session("a", false, 100)]);
        let before = store.snapshot();
        let after = store.snapshot();
        assert_eq!(before.revision, after.revision);
        assert_eq!(ids(&after), vec!["a"]);
    }

    #[test]
    fn test_cross_session_mutations_do_not_interfere() {
        let store = SessionListStore::new(3);
        store.reconcile(1, vec![session("a", false, 100), session("b", false, 50)]);

        store.set_pinned("a", true);
        store.rename("b", "Second");

        let snapshot = store.snapshot();
        assert!(snapshot.get("a").unwrap().is_pinned);
        assert_eq!(
            snapshot.get("b").unwrap().display_name.as_deref(),
            Some("Second")
        );
        assert_eq!(store.pending_count(), 2);
    }

    #[tokio::test]
    async fn test_subscribers_observe_mutations() {
        let store = SessionListStore::new(3);
        let mut rx = store.subscribe();

        store.reconcile(1, vec![session("a", false, 100)]);
        rx.changed().await.unwrap();
        assert_eq!(ids(&rx.borrow_and_update()), vec!["a"]);

        store.set_pinned("a", true);
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().get("a").unwrap().is_pinned);
    }
}
