//! Lifecycle phases.

use serde::{Deserialize, Serialize};

/// Authentication phase of the client session.
///
/// `Booting` is the initial phase and is left exactly once, when the
/// persisted session has been read back. After that the session moves
/// between `LoggedOut` and `LoggedIn` for the rest of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Booting,
    LoggedOut,
    LoggedIn,
}

impl SessionPhase {
    /// Whether the persisted session has been restored.
    #[must_use]
    pub const fn is_bootstrapped(self) -> bool {
        !matches!(self, Self::Booting)
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Booting => write!(f, "booting"),
            Self::LoggedOut => write!(f, "logged_out"),
            Self::LoggedIn => write!(f, "logged_in"),
        }
    }
}
