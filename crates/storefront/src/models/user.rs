//! User domain type.

use serde::{Deserialize, Serialize};

use pizzeria_core::{Email, UserId};

/// The logged-in user.
///
/// Stored as JSON under [`crate::store::keys::AUTH_USER`]. Field names are
/// camelCase on the wire to match what earlier app builds wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID.
    pub id: UserId,
    /// Email the user logged in with.
    pub email: Email,
    /// Display name, set from the profile screen.
    pub user_name: Option<String>,
}

impl User {
    /// Name to show in the UI: the display name, or the email's local part.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.user_name
            .as_deref()
            .unwrap_or_else(|| self.email.local_part())
    }
}
