//! Error types and background failure reporting.
//!
//! Commands only return errors the caller can act on ([`SessionError`]).
//! Failures of the persistent store and the remote backend happen in
//! background work and go through [`report_background_failure`], which logs
//! them and captures them to Sentry.

use thiserror::Error;

/// Persistent store operation failed.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem error.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be encoded or decoded.
    #[error("stored value is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Remote backend call failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    /// The backend answered with an error.
    #[error("backend rejected the request: {0}")]
    Rejected(String),

    /// The backend could not be reached.
    #[error("backend unavailable")]
    Unavailable,
}

/// Errors returned by session commands.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Login email is malformed.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] pizzeria_core::EmailError),

    /// The command needs a logged-in session.
    #[error("no user is logged in")]
    NotLoggedIn,

    /// The new username is blank.
    #[error("username cannot be empty")]
    InvalidUsername,
}

/// Log a failure from background work and capture it to Sentry.
///
/// `operation` names what was being attempted (e.g. `"persist_user"`).
/// Capturing is a no-op when Sentry has not been initialized.
pub fn report_background_failure<E>(operation: &str, error: &E)
where
    E: std::error::Error + 'static,
{
    let event_id = sentry::capture_error(error);
    tracing::error!(
        operation,
        error = %error,
        sentry_event_id = %event_id,
        "Background operation failed"
    );
}

/// Add a breadcrumb for a user command.
///
/// Breadcrumbs appear in Sentry reports to show the commands leading up to a
/// failure.
pub fn add_breadcrumb(category: &str, message: &str) {
    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_session_error_display() {
        assert_eq!(SessionError::NotLoggedIn.to_string(), "no user is logged in");
        assert_eq!(
            SessionError::InvalidUsername.to_string(),
            "username cannot be empty"
        );
    }

    #[test]
    fn test_email_error_converts() {
        let err: SessionError = pizzeria_core::EmailError::Empty.into();
        assert!(matches!(err, SessionError::InvalidEmail(_)));
    }

    #[test]
    fn test_store_error_from_json() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = StoreError::from(json_err);
        assert!(err.to_string().starts_with("stored value is not valid JSON"));
    }

    #[test]
    fn test_report_without_sentry_does_not_panic() {
        report_background_failure("test", &SyncError::Unavailable);
        add_breadcrumb("test", "nothing happened");
    }
}
