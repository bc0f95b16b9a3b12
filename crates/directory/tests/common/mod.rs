//! In-memory fakes for the external collaborators.
//!
//! The identity provider and profile store are hosted services in
//! production; these fakes implement the same capability traits with
//! call recording so tests can assert which upstream operations ran.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use secrecy::SecretString;

use shiftwise_core::{AccountId, Email, SessionToken};
use shiftwise_directory::authz::Authorizer;
use shiftwise_directory::clients::{
    IdentityProvider, ProfileStore, ProviderError, StoreError, VerifiedSession,
};
use shiftwise_directory::config::OverrideAccount;
use shiftwise_directory::models::{AccountSummary, ProfileRow};
use shiftwise_directory::session::{InMemoryMarkerStore, SessionCache};
use shiftwise_directory::DirectoryService;

pub const OVERRIDE_EMAIL: &str = "override@example.com";
pub const OVERRIDE_SECRET: &str = "kT9w-qm2Lx0vB4nZ";
pub const OVERRIDE_ID: &str = "override-root";

static INIT_TRACING: Once = Once::new();

pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Identity provider fake with registered credentials and accounts.
#[derive(Default)]
pub struct FakeProvider {
    /// email -> (password, account id)
    pub credentials: Mutex<BTreeMap<String, (String, AccountId)>>,
    pub accounts: Mutex<Vec<AccountSummary>>,
    pub session: Mutex<Option<AccountId>>,
    pub deny_listing: AtomicBool,
    pub fail_listing: AtomicBool,
    pub calls: AtomicUsize,
    provisioned: AtomicUsize,
}

impl FakeProvider {
    pub fn register(&self, email: &str, password: &str, account_id: &str) {
        self.credentials.lock().unwrap().insert(
            email.to_owned(),
            (password.to_owned(), AccountId::from(account_id)),
        );
        self.accounts.lock().unwrap().push(AccountSummary {
            id: AccountId::from(account_id),
            email: Some(email.to_owned()),
            first_name: None,
            last_name: None,
        });
    }

    pub fn add_account(&self, account_id: &str, email: &str) {
        self.accounts.lock().unwrap().push(AccountSummary {
            id: AccountId::from(account_id),
            email: Some(email.to_owned()),
            first_name: None,
            last_name: None,
        });
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    async fn verify_credentials(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<VerifiedSession, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let credentials = self.credentials.lock().unwrap();
        match credentials.get(email.as_str()) {
            Some((expected, account_id)) if expected == password => {
                *self.session.lock().unwrap() = Some(account_id.clone());
                Ok(VerifiedSession {
                    account_id: account_id.clone(),
                    token: SessionToken::issued(format!("prov-{account_id}")),
                })
            }
            _ => Err(ProviderError::InvalidCredentials),
        }
    }

    async fn destroy_session(&self) -> Result<(), ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.session.lock().unwrap() = None;
        Ok(())
    }

    async fn current_account_id(&self) -> Result<Option<AccountId>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.session.lock().unwrap().clone())
    }

    async fn list_accounts(&self) -> Result<Vec<AccountSummary>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.deny_listing.load(Ordering::SeqCst) {
            return Err(ProviderError::PermissionDenied(
                "admin rights required".to_owned(),
            ));
        }
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(ProviderError::Request("listing unavailable".to_owned()));
        }
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn provision_account(
        &self,
        email: &Email,
        _temp_credential: &SecretString,
    ) -> Result<AccountId, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let n = self.provisioned.fetch_add(1, Ordering::SeqCst) + 1;
        let account_id = AccountId::from(format!("acct-new-{n}").as_str());
        self.accounts.lock().unwrap().push(AccountSummary {
            id: account_id.clone(),
            email: Some(email.as_str().to_owned()),
            first_name: None,
            last_name: None,
        });
        Ok(account_id)
    }
}

/// Profile store fake that records every mutation it receives.
#[derive(Default)]
pub struct RecordingStore {
    pub rows: Mutex<BTreeMap<String, ProfileRow>>,
    pub mutations: Mutex<Vec<String>>,
    pub update_returns_none: AtomicBool,
}

impl RecordingStore {
    pub fn seed(&self, row: ProfileRow) {
        let id = row.id.clone().expect("seeded rows need an id");
        self.rows.lock().unwrap().insert(id, row);
    }

    pub fn mutation_log(&self) -> Vec<String> {
        self.mutations.lock().unwrap().clone()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rows.lock().unwrap().contains_key(id)
    }
}

fn merge(existing: &mut ProfileRow, partial: ProfileRow) {
    macro_rules! apply {
        ($($field:ident),* $(,)?) => {
            $(if let Some(value) = partial.$field {
                existing.$field = Some(value);
            })*
        };
    }
    apply!(
        email,
        first_name,
        last_name,
        role,
        position,
        department,
        hourly_rate,
        phone,
        avatar_url,
        address_line1,
        address_line2,
        address_city,
        address_region,
        address_postal_code,
        address_country,
    );
}

#[async_trait]
impl ProfileStore for RecordingStore {
    async fn select(&self, id: &AccountId) -> Result<Option<ProfileRow>, StoreError> {
        Ok(self.rows.lock().unwrap().get(id.as_str()).cloned())
    }

    async fn select_all(&self) -> Result<Vec<ProfileRow>, StoreError> {
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    async fn insert(&self, row: ProfileRow) -> Result<ProfileRow, StoreError> {
        let id = row
            .id
            .clone()
            .ok_or_else(|| StoreError::Request("row without id".to_owned()))?;
        self.mutations.lock().unwrap().push(format!("insert:{id}"));
        self.rows.lock().unwrap().insert(id, row.clone());
        Ok(row)
    }

    async fn insert_many(&self, rows: Vec<ProfileRow>) -> Result<(), StoreError> {
        for row in rows {
            self.insert(row).await?;
        }
        Ok(())
    }

    async fn update(
        &self,
        id: &AccountId,
        partial: ProfileRow,
    ) -> Result<Option<ProfileRow>, StoreError> {
        self.mutations.lock().unwrap().push(format!("update:{id}"));
        let mut rows = self.rows.lock().unwrap();
        let Some(existing) = rows.get_mut(id.as_str()) else {
            return Ok(None);
        };
        merge(existing, partial);
        if self.update_returns_none.load(Ordering::SeqCst) {
            Ok(None)
        } else {
            Ok(Some(existing.clone()))
        }
    }

    async fn delete(&self, id: &AccountId) -> Result<(), StoreError> {
        self.mutations.lock().unwrap().push(format!("delete:{id}"));
        self.rows.lock().unwrap().remove(id.as_str());
        Ok(())
    }
}

pub fn override_account() -> OverrideAccount {
    OverrideAccount {
        id: AccountId::from(OVERRIDE_ID),
        email: Email::parse(OVERRIDE_EMAIL).expect("valid override email"),
        first_name: "System".into(),
        last_name: "Administrator".into(),
        secret: SecretString::from(OVERRIDE_SECRET),
    }
}

pub fn profile_row(id: &str, email: &str, first: &str, last: &str, role: &str) -> ProfileRow {
    ProfileRow {
        id: Some(id.to_owned()),
        email: Some(email.to_owned()),
        first_name: Some(first.to_owned()),
        last_name: Some(last.to_owned()),
        role: Some(role.to_owned()),
        ..Default::default()
    }
}

/// Wire a session cache and directory service over fresh fakes.
pub fn build_env() -> (
    SessionCache,
    DirectoryService,
    Arc<FakeProvider>,
    Arc<RecordingStore>,
) {
    init_tracing();

    let provider = Arc::new(FakeProvider::default());
    let store = Arc::new(RecordingStore::default());
    let session = SessionCache::new(
        Arc::clone(&provider) as Arc<dyn IdentityProvider>,
        Arc::clone(&store) as Arc<dyn ProfileStore>,
        Arc::new(InMemoryMarkerStore::default()),
        override_account(),
    );
    let service = DirectoryService::new(
        session.clone(),
        Arc::clone(&provider) as Arc<dyn IdentityProvider>,
        Arc::clone(&store) as Arc<dyn ProfileStore>,
        Authorizer::default(),
    );

    (session, service, provider, store)
}
