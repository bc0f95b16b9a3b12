//! Unified error handling for directory operations.

use thiserror::Error;

use crate::clients::{ProviderError, StoreError};
use crate::session::AuthError;

/// Error type for every public directory operation.
///
/// Messages are short and suitable for direct display; internal
/// identifiers and upstream payloads never cross this boundary.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// No authenticated session.
    #[error("not signed in")]
    Unauthenticated,

    /// Authenticated, but the role does not permit this operation.
    #[error("administrator access required")]
    Unauthorized,

    /// Role is sufficient, but the action is disallowed on this target.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Requested account was not found.
    #[error("account not found")]
    NotFound,

    /// Request was malformed (e.g. no fields to update).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Identity provider or profile store call failed.
    #[error("upstream service error: {0}")]
    Upstream(String),
}

impl From<StoreError> for DirectoryError {
    fn from(err: StoreError) -> Self {
        Self::Upstream(err.to_string())
    }
}

impl From<ProviderError> for DirectoryError {
    fn from(err: ProviderError) -> Self {
        Self::Upstream(err.to_string())
    }
}

impl From<AuthError> for DirectoryError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::InvalidEmail(_) => Self::Unauthenticated,
            other => Self::Upstream(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages_are_short() {
        assert_eq!(DirectoryError::Unauthenticated.to_string(), "not signed in");
        assert_eq!(
            DirectoryError::Forbidden("cannot delete the bootstrap account".into()).to_string(),
            "forbidden: cannot delete the bootstrap account"
        );
        assert_eq!(DirectoryError::NotFound.to_string(), "account not found");
    }

    #[test]
    fn test_store_error_maps_to_upstream() {
        let err: DirectoryError = StoreError::Request("timeout".into()).into();
        assert!(matches!(err, DirectoryError::Upstream(_)));
    }
}
