//! Session token type.

use core::fmt;

use secrecy::{ExposeSecret, SecretString};

/// Opaque bearer token for the logged-in session.
///
/// Persisted next to the user record; a session is logged in only while it
/// holds both. Redacted from `Debug` output so it never lands in logs.
#[derive(Clone)]
pub struct SessionToken(SecretString);

impl SessionToken {
    /// Wrap a raw token.
    ///
    /// Returns `None` for an empty (or whitespace-only) token, which the app
    /// treats the same as no token at all.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return None;
        }
        Some(Self(SecretString::from(raw)))
    }

    /// Mint a fresh random token.
    #[must_use]
    pub fn generate() -> Self {
        let raw = format!("tok-{}", uuid::Uuid::new_v4().simple());
        Self(SecretString::from(raw))
    }

    /// The raw token, for writing to storage or an `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}

impl PartialEq for SessionToken {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for SessionToken {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_token_is_none() {
        assert!(SessionToken::new("").is_none());
        assert!(SessionToken::new("  ").is_none());
    }

    #[test]
    fn test_expose() {
        let token = SessionToken::new("tok-123").unwrap();
        assert_eq!(token.expose(), "tok-123");
    }

    #[test]
    fn test_generate_is_unique() {
        let a = SessionToken::generate();
        let b = SessionToken::generate();
        assert_ne!(a, b);
        assert!(a.expose().starts_with("tok-"));
    }

    #[test]
    fn test_debug_redacts() {
        let token = SessionToken::new("super-secret-token").unwrap();
        let debug = format!("{token:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret-token"));
    }
}
