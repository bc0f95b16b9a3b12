//! Session cache.
//!
//! Holds at most one resolved [`Identity`] and one [`SessionToken`] for
//! the lifetime of the cache, and answers "who is the current user"
//! without blocking. Resolution may need a network round trip, so cold
//! reads return [`AuthState::Unknown`] while a fire-and-forget refresh
//! populates the cache; callers must treat `Unknown` as "try again
//! shortly", never as a hard logout. Callers that need a settled answer
//! use [`SessionCache::resolve_identity`].
//!
//! The bootstrap override account short-circuits everything: its
//! credentials are checked locally, its token is synthesized, and a
//! durable marker lets the identity be reconstructed synchronously
//! after a restart without any provider call.
//!
//! Non-blocking reads require a Tokio runtime to be current, since a
//! cold read spawns the background refresh task.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

use shiftwise_core::{AccountId, Email, EmailError, SessionToken};

use crate::clients::{IdentityProvider, ProfileStore, ProviderError, StoreError};
use crate::config::OverrideAccount;
use crate::models::{Identity, ProfileUpdate};
use crate::transform;

/// Errors that can occur during session operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Login email failed validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Email/password pair was rejected.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Credentials verified, but no profile row exists for the account.
    #[error("no profile found for account {0}")]
    ProfileMissing(AccountId),

    /// Credentials verified, but the profile row could not be mapped.
    #[error("profile for account {0} is malformed")]
    ProfileInvalid(AccountId),

    /// Identity provider call failed.
    #[error("identity provider error: {0}")]
    Provider(ProviderError),

    /// Profile store call failed.
    #[error("profile store error: {0}")]
    Store(#[from] StoreError),

    /// Durable override marker could not be written.
    #[error("override marker error: {0}")]
    Marker(#[from] MarkerError),
}

/// Errors from the durable override marker store.
#[derive(Debug, Error)]
pub enum MarkerError {
    #[error("override marker i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// What the cache currently knows about the session.
///
/// `Unknown` means resolution has not completed yet; it is distinct
/// from `Unauthenticated`, which is a settled negative answer.
#[derive(Debug, Clone)]
pub enum AuthState {
    /// Resolution pending; a background refresh is (or will be) in flight.
    Unknown,
    /// A user is signed in.
    Authenticated(Identity),
    /// Resolution completed: nobody is signed in.
    Unauthenticated,
}

impl AuthState {
    /// The identity, if authenticated.
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            Self::Unknown | Self::Unauthenticated => None,
        }
    }

    /// Whether this state is a settled, signed-in answer.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// Durable record that the override account signed in.
///
/// Survives process restarts so the override identity can be
/// reconstructed synchronously, without consulting the provider.
pub trait OverrideMarkerStore: Send + Sync {
    /// Record that the override session is active.
    ///
    /// # Errors
    ///
    /// Returns [`MarkerError`] if the marker cannot be persisted.
    fn set(&self) -> Result<(), MarkerError>;

    /// Clear the marker.
    ///
    /// # Errors
    ///
    /// Returns [`MarkerError`] if the marker cannot be removed.
    fn clear(&self) -> Result<(), MarkerError>;

    /// Whether the marker is currently set.
    fn is_set(&self) -> bool;
}

/// Marker held in process memory only; gone after a restart.
#[derive(Debug, Default)]
pub struct InMemoryMarkerStore {
    set: AtomicBool,
}

impl OverrideMarkerStore for InMemoryMarkerStore {
    fn set(&self) -> Result<(), MarkerError> {
        self.set.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn clear(&self) -> Result<(), MarkerError> {
        self.set.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_set(&self) -> bool {
        self.set.load(Ordering::SeqCst)
    }
}

/// Marker persisted as a file at a configured path.
#[derive(Debug)]
pub struct FileMarkerStore {
    path: PathBuf,
}

impl FileMarkerStore {
    /// Create a marker store backed by the given path.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl OverrideMarkerStore for FileMarkerStore {
    fn set(&self) -> Result<(), MarkerError> {
        std::fs::write(&self.path, b"active\n")?;
        Ok(())
    }

    fn clear(&self) -> Result<(), MarkerError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn is_set(&self) -> bool {
        self.path.exists()
    }
}

/// Cached identity and token; both fields are written together under
/// one lock, so readers never observe a torn pair.
#[derive(Default)]
struct Snapshot {
    identity: Option<Identity>,
    token: Option<SessionToken>,
    /// Set once a resolution has completed with "nobody signed in".
    resolved_absent: bool,
}

struct SessionCacheInner {
    provider: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
    marker: Arc<dyn OverrideMarkerStore>,
    override_account: OverrideAccount,
    state: Mutex<Snapshot>,
    refreshing: AtomicBool,
}

/// The process-wide session context.
///
/// Cheap to clone; all clones share one cache. Create exactly one per
/// process and inject it into callers; two independent caches will
/// drift.
#[derive(Clone)]
pub struct SessionCache {
    inner: Arc<SessionCacheInner>,
}

impl SessionCache {
    /// Create a session cache over the given collaborators.
    #[must_use]
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        profiles: Arc<dyn ProfileStore>,
        marker: Arc<dyn OverrideMarkerStore>,
        override_account: OverrideAccount,
    ) -> Self {
        Self {
            inner: Arc::new(SessionCacheInner {
                provider,
                profiles,
                marker,
                override_account,
                state: Mutex::new(Snapshot::default()),
                refreshing: AtomicBool::new(false),
            }),
        }
    }

    /// Log in with an email/password pair.
    ///
    /// The override account is checked first and never reaches the
    /// identity provider; everything else is verified upstream and the
    /// matching profile row is fetched and cached. On any failure the
    /// cache is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for a rejected pair,
    /// [`AuthError::ProfileMissing`]/[`AuthError::ProfileInvalid`] when
    /// the account has no usable profile row, and provider/store
    /// variants for upstream failures.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let email = Email::parse(email)?;

        if self.inner.override_account.matches(&email, password) {
            let identity = self.inner.override_account.identity();
            self.inner.marker.set()?;
            self.store_session(identity.clone(), SessionToken::local());
            return Ok(identity);
        }

        let session = self
            .inner
            .provider
            .verify_credentials(&email, password)
            .await
            .map_err(|e| match e {
                ProviderError::InvalidCredentials => AuthError::InvalidCredentials,
                other => AuthError::Provider(other),
            })?;

        let row = self
            .inner
            .profiles
            .select(&session.account_id)
            .await?
            .ok_or_else(|| AuthError::ProfileMissing(session.account_id.clone()))?;
        let identity = transform::to_identity(&row)
            .ok_or_else(|| AuthError::ProfileInvalid(session.account_id.clone()))?;

        self.inner.marker.clear()?;
        self.store_session(identity.clone(), session.token);
        Ok(identity)
    }

    /// Log out the current user.
    ///
    /// The local cache and the override marker are always cleared, even
    /// when the provider call fails. The provider error, if any, is
    /// still surfaced after clearing.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Provider`] if session destruction failed
    /// upstream, [`AuthError::Marker`] if the marker could not be cleared.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let is_override = self
            .lock_state()
            .identity
            .as_ref()
            .is_some_and(|i| i.id == self.inner.override_account.id)
            || self.inner.marker.is_set();

        let provider_result = if is_override {
            Ok(())
        } else {
            self.inner.provider.destroy_session().await
        };

        self.clear_session();
        self.inner.marker.clear()?;

        provider_result.map_err(AuthError::Provider)
    }

    /// Current identity, non-blocking.
    ///
    /// Returns immediately. A cold cache triggers a background refresh
    /// and reports [`AuthState::Unknown`] for this call; the durable
    /// override marker is consulted first so an override session
    /// resolves synchronously even after a restart.
    #[must_use]
    pub fn current_identity(&self) -> AuthState {
        {
            let mut state = self.lock_state();

            if let Some(identity) = state.identity.clone() {
                return AuthState::Authenticated(identity);
            }

            if self.inner.marker.is_set() {
                let identity = self.inner.override_account.identity();
                state.identity = Some(identity.clone());
                state.token.get_or_insert_with(SessionToken::local);
                state.resolved_absent = false;
                return AuthState::Authenticated(identity);
            }

            if state.resolved_absent {
                return AuthState::Unauthenticated;
            }
        }

        self.spawn_refresh();
        AuthState::Unknown
    }

    /// Current session token, non-blocking.
    ///
    /// Mirrors [`Self::current_identity`]: the override account gets a
    /// locally synthesized token (created on demand), a cached token is
    /// returned as-is, and a cold cache triggers a background refresh
    /// and yields `None` for this call.
    #[must_use]
    pub fn current_token(&self) -> Option<SessionToken> {
        {
            let mut state = self.lock_state();

            let is_override = state
                .identity
                .as_ref()
                .is_some_and(|i| i.id == self.inner.override_account.id);
            if is_override {
                return Some(state.token.get_or_insert_with(SessionToken::local).clone());
            }

            if let Some(token) = state.token.clone() {
                return Some(token);
            }

            if state.resolved_absent {
                return None;
            }
        }

        self.spawn_refresh();
        None
    }

    /// Whether a session exists, awaiting the provider if needed.
    ///
    /// Returns `true` immediately when the durable override marker is
    /// set; otherwise asks the identity provider.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Provider`] if the provider check failed.
    pub async fn is_authenticated(&self) -> Result<bool, AuthError> {
        if self.inner.marker.is_set() {
            return Ok(true);
        }

        let account = self
            .inner
            .provider
            .current_account_id()
            .await
            .map_err(AuthError::Provider)?;
        Ok(account.is_some())
    }

    /// Resolve the current identity, awaiting whatever it takes.
    ///
    /// The explicit asynchronous counterpart to
    /// [`Self::current_identity`] for callers that cannot act on
    /// [`AuthState::Unknown`]. Populates the cache on the way out.
    ///
    /// # Errors
    ///
    /// Returns provider/store errors, or
    /// [`AuthError::ProfileMissing`]/[`AuthError::ProfileInvalid`] when
    /// a live session has no usable profile row.
    pub async fn resolve_identity(&self) -> Result<AuthState, AuthError> {
        match self.current_identity() {
            AuthState::Unknown => {}
            settled => return Ok(settled),
        }

        let Some(account_id) = self
            .inner
            .provider
            .current_account_id()
            .await
            .map_err(AuthError::Provider)?
        else {
            self.lock_state().resolved_absent = true;
            return Ok(AuthState::Unauthenticated);
        };

        let row = self
            .inner
            .profiles
            .select(&account_id)
            .await?
            .ok_or_else(|| AuthError::ProfileMissing(account_id.clone()))?;
        let identity =
            transform::to_identity(&row).ok_or(AuthError::ProfileInvalid(account_id))?;

        let mut state = self.lock_state();
        state.identity = Some(identity.clone());
        state.resolved_absent = false;
        drop(state);

        Ok(AuthState::Authenticated(identity))
    }

    /// Drop all in-memory session state.
    ///
    /// The durable override marker is left alone; it exists precisely
    /// to survive the cache.
    pub fn dispose(&self) {
        self.clear_session();
    }

    /// Id of the configured override account.
    #[must_use]
    pub fn override_id(&self) -> &AccountId {
        &self.inner.override_account.id
    }

    /// Apply name/contact fields to the cached override identity.
    ///
    /// The override account has no profile row; edits to it live in the
    /// cache only. Role and pay fields in the update are ignored.
    pub fn update_override_identity(&self, update: &ProfileUpdate) -> Identity {
        let mut state = self.lock_state();

        let mut identity = state
            .identity
            .take()
            .filter(|i| i.id == self.inner.override_account.id)
            .unwrap_or_else(|| self.inner.override_account.identity());

        if let Some(first_name) = &update.first_name {
            identity.first_name.clone_from(first_name);
        }
        if let Some(last_name) = &update.last_name {
            identity.last_name.clone_from(last_name);
        }
        if let Some(email) = &update.email {
            identity.email.clone_from(email);
        }
        if let Some(phone) = &update.phone {
            identity.phone.clone_from(phone);
        }
        if let Some(avatar_url) = &update.avatar_url {
            identity.avatar_url.clone_from(avatar_url);
        }

        state.identity = Some(identity.clone());
        identity
    }

    fn store_session(&self, identity: Identity, token: SessionToken) {
        let mut state = self.lock_state();
        state.identity = Some(identity);
        state.token = Some(token);
        state.resolved_absent = false;
    }

    fn clear_session(&self) {
        let mut state = self.lock_state();
        state.identity = None;
        state.token = None;
        state.resolved_absent = true;
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, Snapshot> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Kick off a background refresh unless one is already in flight.
    ///
    /// Fire and forget: nobody observes the result; failures are logged
    /// and swallowed so the synchronous caller is never disturbed.
    fn spawn_refresh(&self) {
        if self.inner.refreshing.swap(true, Ordering::SeqCst) {
            return;
        }

        let cache = self.clone();
        tokio::spawn(async move {
            if let Err(err) = cache.refresh().await {
                tracing::error!(error = %err, "background session refresh failed");
            }
            cache.inner.refreshing.store(false, Ordering::SeqCst);
        });
    }

    async fn refresh(&self) -> Result<(), AuthError> {
        let Some(account_id) = self
            .inner
            .provider
            .current_account_id()
            .await
            .map_err(AuthError::Provider)?
        else {
            self.lock_state().resolved_absent = true;
            return Ok(());
        };

        let row = self.inner.profiles.select(&account_id).await?;
        match row.as_ref().and_then(transform::to_identity) {
            Some(identity) => {
                let mut state = self.lock_state();
                state.identity = Some(identity);
                state.resolved_absent = false;
            }
            // A live session with no usable profile row stays Unknown;
            // the next read retries.
            None => {
                tracing::warn!(account_id = %account_id, "session resolved but no usable profile row");
            }
        }

        Ok(())
    }
}
