//! Contextual menu state machine
//!
//! Per-row transient UI state for the session list: a single menu may be
//! open at a time, and a rename-in-progress carries its draft text. The
//! state is a tagged variant rather than loose booleans so "only one open
//! at a time" is enforced structurally. The machine holds session ids only,
//! never references into snapshots, so concurrent list reconciliation
//! cannot corrupt it.

/// Menu state for the session list
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MenuState {
    /// No menu open
    #[default]
    Closed,

    /// The menu for one session row is open
    OpenFor(String),

    /// A rename is being edited for one session row
    Renaming {
        /// Session being renamed
        id: String,
        /// Current editor contents
        draft: String,
    },
}

impl MenuState {
    /// Open the menu for a session row
    ///
    /// Opening row B while row A's menu is open implicitly closes A's;
    /// an in-progress rename is likewise discarded.
    pub fn open(&mut self, id: impl Into<String>) {
        *self = Self::OpenFor(id.into());
    }

    /// Start renaming a session
    ///
    /// Seeds the draft from the session's current display name, or empty
    /// when none has been assigned yet.
    pub fn begin_rename(&mut self, id: impl Into<String>, current_name: Option<&str>) {
        *self = Self::Renaming {
            id: id.into(),
            draft: current_name.unwrap_or_default().to_string(),
        };
    }

    /// Replace the rename draft text
    ///
    /// A no-op outside the renaming state.
    pub fn update_draft(&mut self, text: impl Into<String>) {
        if let Self::Renaming { draft, .. } = self {
            *draft = text.into();
        }
    }

    /// Submit the rename draft
    ///
    /// Returns the `(session id, new name)` pair to feed into an optimistic
    /// rename and closes the menu. A blank draft submits nothing and just
    /// closes, like losing focus.
    pub fn submit(&mut self) -> Option<(String, String)> {
        match std::mem::take(self) {
            Self::Renaming { id, draft } => {
                let trimmed = draft.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some((id, trimmed.to_string()))
                }
            }
            other => {
                *self = other;
                None
            }
        }
    }

    /// Close the menu, discarding any draft
    ///
    /// Models both a pointer interaction outside the menu and an action
    /// selection returning the row to rest.
    pub fn cancel(&mut self) {
        *self = Self::Closed;
    }

    /// True when the menu for this session is open (including renaming)
    pub fn is_open_for(&self, id: &str) -> bool {
        match self {
            Self::Closed => false,
            Self::OpenFor(open) => open == id,
            Self::Renaming { id: renaming, .. } => renaming == id,
        }
    }
}
