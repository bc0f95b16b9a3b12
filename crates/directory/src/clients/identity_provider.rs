//! Identity provider capability.

use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;

use shiftwise_core::{AccountId, Email, SessionToken};

use crate::models::AccountSummary;

/// Errors surfaced by the identity provider.
///
/// `PermissionDenied` is reported distinctly from other failures so the
/// reconciler can skip synchronization gracefully when the session
/// lacks provider-admin rights.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Email/password pair was rejected.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The current session may not perform this provider call.
    #[error("provider denied permission: {0}")]
    PermissionDenied(String),

    /// Transport or provider-side failure.
    #[error("provider request failed: {0}")]
    Request(String),
}

/// Result of a successful credential verification.
#[derive(Debug, Clone)]
pub struct VerifiedSession {
    /// Account the provider resolved the credentials to.
    pub account_id: AccountId,
    /// Provider-issued token for subsequent calls.
    pub token: SessionToken,
}

/// Capability wrapper around the external authentication service.
///
/// Implementations own transport, retries, and timeouts; this layer
/// composes the calls sequentially and never parallelizes them.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify an email/password pair and open a session.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidCredentials`] when the pair is
    /// rejected, [`ProviderError::Request`] for transport failures.
    async fn verify_credentials(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<VerifiedSession, ProviderError>;

    /// Destroy the provider-side session for the current user.
    async fn destroy_session(&self) -> Result<(), ProviderError>;

    /// Account id of the currently signed-in user, if any.
    ///
    /// `Ok(None)` means the provider knows of no live session; that is
    /// an answer, not an error.
    async fn current_account_id(&self) -> Result<Option<AccountId>, ProviderError>;

    /// Full list of accounts known to the provider.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::PermissionDenied`] when the session
    /// lacks provider-admin rights; callers treat that as "skip sync",
    /// not as a failure.
    async fn list_accounts(&self) -> Result<Vec<AccountSummary>, ProviderError>;

    /// Provision a new provider account with a temporary credential.
    ///
    /// The credential is generated by the caller and communicated
    /// out-of-band; implementations must not log it.
    async fn provision_account(
        &self,
        email: &Email,
        temp_credential: &SecretString,
    ) -> Result<AccountId, ProviderError>;
}
