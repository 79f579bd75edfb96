//! Session state and its transitions.
//!
//! The user and the token are held together in [`Authenticated`], so a
//! session can never have one without the other. The transitions below are
//! pure; [`crate::services::session::SessionService`] applies them and runs
//! the persistence side effects.

use pizzeria_core::{SessionPhase, SessionToken};

use super::user::User;

/// A logged-in identity: the user record and its bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authenticated {
    pub user: User,
    pub token: SessionToken,
}

/// Process-wide authentication state.
///
/// Starts as `{ auth: None, bootstrapped: false }`. `bootstrapped` flips to
/// `true` once, when the persisted session has been read back, and never
/// reverts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    auth: Option<Authenticated>,
    bootstrapped: bool,
}

impl Session {
    /// The logged-in user, if any.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.auth.as_ref().map(|auth| &auth.user)
    }

    /// The session token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&SessionToken> {
        self.auth.as_ref().map(|auth| &auth.token)
    }

    /// Whether a user is logged in.
    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.auth.is_some()
    }

    /// Whether the persisted session has been restored.
    #[must_use]
    pub const fn is_bootstrapped(&self) -> bool {
        self.bootstrapped
    }

    /// Current phase of the authentication state machine.
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        match (self.bootstrapped, self.auth.is_some()) {
            (false, _) => SessionPhase::Booting,
            (true, false) => SessionPhase::LoggedOut,
            (true, true) => SessionPhase::LoggedIn,
        }
    }

    /// Finish bootstrapping with whatever was restored from storage.
    ///
    /// A session that was established while the store was being read is
    /// newer than the stored one and is kept. Returns `false` if the session
    /// was already bootstrapped, in which case nothing changes.
    pub(crate) fn bootstrap_done(&mut self, restored: Option<Authenticated>) -> bool {
        if self.bootstrapped {
            return false;
        }
        if self.auth.is_none() {
            self.auth = restored;
        }
        self.bootstrapped = true;
        true
    }

    /// Replace the session with a freshly logged-in identity.
    pub(crate) fn log_in(&mut self, auth: Authenticated) {
        self.auth = Some(auth);
    }

    /// Clear user and token together.
    pub(crate) fn log_out(&mut self) {
        self.auth = None;
    }

    /// Set the display name of the logged-in user.
    ///
    /// Returns the updated user, or `None` when nobody is logged in.
    pub(crate) fn set_user_name(&mut self, user_name: String) -> Option<User> {
        let auth = self.auth.as_mut()?;
        auth.user.user_name = Some(user_name);
        Some(auth.user.clone())
    }
}
