//! Directory reconciliation.
//!
//! Produces the authoritative list/detail of known accounts for
//! privileged callers and keeps the profile store eventually consistent
//! with the identity provider's account list. The bootstrap override
//! account is the standing exception: its directory entry is
//! synthesized from the session cache and no profile row is ever
//! created, updated, or deleted under its id. The store has no
//! knowledge of the override concept, so that invariant is enforced
//! here, at every mutation entry point.

use std::collections::HashSet;
use std::sync::Arc;

use rand::{Rng, distr::Alphanumeric};
use secrecy::SecretString;

use shiftwise_core::AccountId;

use crate::authz::Authorizer;
use crate::clients::{IdentityProvider, ProfileStore, ProviderError};
use crate::error::DirectoryError;
use crate::models::{Identity, ProfileDraft, ProfileRow, ProfileUpdate};
use crate::session::SessionCache;
use crate::transform;

/// Length of generated temporary credentials.
const TEMP_CREDENTIAL_LENGTH: usize = 20;

/// A newly provisioned account.
///
/// The temporary credential must be communicated out-of-band; it is
/// never logged and appears nowhere else.
pub struct ProvisionedEntry {
    /// The directory entry for the new account.
    pub entry: Identity,
    /// One-time credential generated for the provider account.
    pub temp_credential: SecretString,
}

/// Directory read/sync/mutation service.
///
/// Every operation authorizes against the session cache first and
/// returns a typed [`DirectoryError`] rather than panicking or leaking
/// upstream detail.
pub struct DirectoryService {
    session: SessionCache,
    provider: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
    authorizer: Authorizer,
}

impl DirectoryService {
    /// Create a directory service over the given collaborators.
    #[must_use]
    pub const fn new(
        session: SessionCache,
        provider: Arc<dyn IdentityProvider>,
        profiles: Arc<dyn ProfileStore>,
        authorizer: Authorizer,
    ) -> Self {
        Self {
            session,
            provider,
            profiles,
            authorizer,
        }
    }

    /// List every known account as a reconciled directory entry.
    ///
    /// Synchronizes provider accounts into the profile store first,
    /// unless the caller is the override account (which holds no
    /// provider session with admin rights). Sync failures degrade to a
    /// plain listing; they never abort it. If the override account is
    /// signed in, a synthesized entry for it is appended since no store
    /// row exists under its id.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Unauthenticated`]/
    /// [`DirectoryError::Unauthorized`] for missing or non-admin
    /// sessions, [`DirectoryError::Upstream`] when the store read fails.
    pub async fn list_directory(&self) -> Result<Vec<Identity>, DirectoryError> {
        let caller = self.require_admin().await?;
        let is_override = &caller.id == self.session.override_id();

        if is_override {
            tracing::debug!("override session active, skipping provider sync");
        } else if let Err(err) = self.sync_missing_profiles().await {
            tracing::warn!(error = %err, "directory sync failed, listing existing profiles");
        }

        let rows = self.profiles.select_all().await?;
        let mut entries = transform::to_identities(&rows);

        if is_override && !entries.iter().any(|e| e.id == caller.id) {
            entries.push(caller);
        }

        Ok(entries)
    }

    /// Fetch a single directory entry by account id.
    ///
    /// The override account is not individually addressable: its entry
    /// exists only within [`Self::list_directory`], so its id answers
    /// `NotFound` here like any other absent row.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::NotFound`] when no row exists for the id.
    pub async fn get_by_id(&self, id: &AccountId) -> Result<Identity, DirectoryError> {
        self.require_admin().await?;

        let row = self
            .profiles
            .select(id)
            .await?
            .ok_or(DirectoryError::NotFound)?;
        transform::to_identity(&row)
            .ok_or_else(|| DirectoryError::Upstream("stored profile is malformed".to_owned()))
    }

    /// Provision a new account and its profile row.
    ///
    /// The provider account is created first with a generated temporary
    /// credential, then the profile row is written. The credential is
    /// returned for out-of-band delivery and never logged.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Upstream`] when provisioning or the
    /// row insert fails.
    pub async fn create(&self, draft: ProfileDraft) -> Result<ProvisionedEntry, DirectoryError> {
        self.require_admin().await?;

        let temp_credential = generate_temp_credential();
        let account_id = self
            .provider
            .provision_account(&draft.email, &temp_credential)
            .await?;

        let row = transform::draft_row(&account_id, &draft);
        let inserted = self.profiles.insert(row).await?;
        let entry = transform::to_identity(&inserted).ok_or_else(|| {
            DirectoryError::Upstream("inserted profile row came back malformed".to_owned())
        })?;

        tracing::info!(account_id = %account_id, "provisioned directory account");
        Ok(ProvisionedEntry {
            entry,
            temp_credential,
        })
    }

    /// Apply a partial update to an account.
    ///
    /// The override account's id never reaches the store: its name and
    /// contact fields are updated in the session cache only and a
    /// synthesized entry is returned. For ordinary ids the row's
    /// existence is verified before mutating, so an absent id is
    /// `NotFound` rather than a silent no-op; and a backend that
    /// updates without returning the row triggers a re-fetch instead of
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Validation`] for an empty update and
    /// [`DirectoryError::NotFound`] for an unknown id.
    pub async fn update(
        &self,
        id: &AccountId,
        update: ProfileUpdate,
    ) -> Result<Identity, DirectoryError> {
        self.require_admin().await?;

        if update.is_empty() {
            return Err(DirectoryError::Validation("no fields to update".to_owned()));
        }

        if id == self.session.override_id() {
            return Ok(self.session.update_override_identity(&update));
        }

        // Existence check precedes mutation so NotFound is distinguishable
        // from an update the backend quietly ignored.
        if self.profiles.select(id).await?.is_none() {
            return Err(DirectoryError::NotFound);
        }

        let partial = transform::update_row(&update);
        let updated = match self.profiles.update(id, partial).await? {
            Some(row) => row,
            None => self
                .profiles
                .select(id)
                .await?
                .ok_or(DirectoryError::NotFound)?,
        };

        transform::to_identity(&updated)
            .ok_or_else(|| DirectoryError::Upstream("updated profile is malformed".to_owned()))
    }

    /// Delete an account's profile row.
    ///
    /// Deleting the override account is always [`DirectoryError::Forbidden`].
    /// Deleting an id with no row succeeds: the desired end state,
    /// "account absent", already holds.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Forbidden`] for the override id,
    /// [`DirectoryError::Upstream`] when the store call fails.
    pub async fn delete(&self, id: &AccountId) -> Result<(), DirectoryError> {
        self.require_admin().await?;

        if id == self.session.override_id() {
            return Err(DirectoryError::Forbidden(
                "the bootstrap account cannot be deleted".to_owned(),
            ));
        }

        if self.profiles.select(id).await?.is_none() {
            return Ok(());
        }

        self.profiles.delete(id).await?;
        Ok(())
    }

    /// Resolve the caller and require the admin role.
    async fn require_admin(&self) -> Result<Identity, DirectoryError> {
        if !self.session.is_authenticated().await? {
            return Err(DirectoryError::Unauthenticated);
        }

        let state = self.session.resolve_identity().await?;
        if !self.authorizer.is_admin(&state) {
            return Err(DirectoryError::Unauthorized);
        }
        state
            .identity()
            .cloned()
            .ok_or(DirectoryError::Unauthenticated)
    }

    /// Insert minimal profile rows for provider accounts the store has
    /// never seen. A session without provider-admin rights skips the
    /// sync instead of failing it.
    async fn sync_missing_profiles(&self) -> Result<usize, DirectoryError> {
        let accounts = match self.provider.list_accounts().await {
            Ok(accounts) => accounts,
            Err(ProviderError::PermissionDenied(reason)) => {
                tracing::debug!(%reason, "session lacks provider admin rights, skipping sync");
                return Ok(0);
            }
            Err(other) => return Err(other.into()),
        };

        let rows = self.profiles.select_all().await?;
        let existing: HashSet<&str> = rows.iter().filter_map(|r| r.id.as_deref()).collect();

        let missing: Vec<ProfileRow> = accounts
            .iter()
            .filter(|account| {
                &account.id != self.session.override_id()
                    && !existing.contains(account.id.as_str())
            })
            .map(transform::seed_row)
            .collect();

        if missing.is_empty() {
            return Ok(0);
        }

        let count = missing.len();
        self.profiles.insert_many(missing).await?;
        tracing::info!(count, "seeded profile rows for provider accounts");
        Ok(count)
    }
}

/// Generate a one-time alphanumeric credential.
fn generate_temp_credential() -> SecretString {
    let credential: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TEMP_CREDENTIAL_LENGTH)
        .map(char::from)
        .collect();
    SecretString::from(credential)
}
