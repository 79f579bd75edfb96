//! Edit-profile draft.
//!
//! Holds the text being edited apart from the committed username, so the
//! screen can tell whether leaving would throw away changes.

/// What to do when the user tries to leave the edit screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveDecision {
    /// Nothing unsaved; leave right away.
    Leave,
    /// The draft differs from the saved name; ask before discarding.
    ConfirmDiscard,
}

/// Username being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    initial: String,
    text: String,
}

impl ProfileDraft {
    /// Start editing from the currently saved name.
    #[must_use]
    pub fn new(initial: impl Into<String>) -> Self {
        let initial = initial.into();
        Self {
            text: initial.clone(),
            initial,
        }
    }

    /// Replace the draft text.
    pub fn edit(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the trimmed draft differs from the saved name.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.text.trim() != self.initial.trim()
    }

    /// Trimmed text to hand to
    /// [`SessionService::update_username`](crate::services::session::SessionService::update_username),
    /// or `None` if it is blank or unchanged.
    ///
    /// The draft treats the returned name as saved.
    pub fn save(&mut self) -> Option<String> {
        let name = self.text.trim();
        if name.is_empty() || !self.is_dirty() {
            return None;
        }
        let name = name.to_string();
        self.initial.clone_from(&name);
        self.text.clone_from(&name);
        Some(name)
    }

    #[must_use]
    pub fn request_leave(&self) -> LeaveDecision {
        if self.is_dirty() {
            LeaveDecision::ConfirmDiscard
        } else {
            LeaveDecision::Leave
        }
    }

    /// Drop unsaved edits.
    pub fn discard(&mut self) {
        self.text.clone_from(&self.initial);
    }
}
