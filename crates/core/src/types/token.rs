//! Session token type.
//!
//! Opaque credential handed back by the identity provider after a
//! successful login, or synthesized locally for the bootstrap override
//! account. The override marker must never reach the identity provider;
//! [`SessionToken::is_local`] is how callers tell the two apart.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix carried by locally synthesized tokens.
const LOCAL_PREFIX: &str = "local-";

/// Opaque session credential.
///
/// Implements `Debug` manually so token material never lands in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a provider-issued token.
    #[must_use]
    pub const fn issued(token: String) -> Self {
        Self(token)
    }

    /// Synthesize a local token for the override account.
    ///
    /// Local tokens are markers only; they carry no provider session
    /// and must never be sent upstream.
    #[must_use]
    pub fn local() -> Self {
        Self(format!("{LOCAL_PREFIX}{}", Uuid::new_v4()))
    }

    /// Whether this token was synthesized locally.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.0.starts_with(LOCAL_PREFIX)
    }

    /// Expose the raw token string.
    ///
    /// Only the identity provider client should need this.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SessionToken").field(&"[REDACTED]").finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_local_tokens_are_marked() {
        let token = SessionToken::local();
        assert!(token.is_local());

        let issued = SessionToken::issued("prov-abc123".to_owned());
        assert!(!issued.is_local());
    }

    #[test]
    fn test_local_tokens_are_unique() {
        assert_ne!(SessionToken::local(), SessionToken::local());
    }

    #[test]
    fn test_debug_redacts() {
        let token = SessionToken::issued("prov-abc123".to_owned());
        let debug = format!("{token:?}");
        assert!(!debug.contains("abc123"));
        assert!(debug.contains("REDACTED"));
    }
}
