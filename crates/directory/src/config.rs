//! Directory configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHIFTWISE_OVERRIDE_EMAIL` - Email of the bootstrap override account
//! - `SHIFTWISE_OVERRIDE_SECRET` - Override account secret (min 16 chars,
//!   placeholder values rejected)
//!
//! ## Optional
//! - `SHIFTWISE_OVERRIDE_ACCOUNT_ID` - Stable id for the override account
//!   (default: `override-root`)
//! - `SHIFTWISE_OVERRIDE_FIRST_NAME` - Display first name (default: `System`)
//! - `SHIFTWISE_OVERRIDE_LAST_NAME` - Display last name (default: `Administrator`)
//! - `SHIFTWISE_OVERRIDE_MARKER_PATH` - File path for the durable override
//!   marker; when unset the marker lives in process memory only
//!
//! The override account deliberately bypasses the identity provider and
//! the profile store. Its secret is injected here at startup and never
//! compiled into the binary.

use std::path::PathBuf;

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use shiftwise_core::{AccountId, Email, Role};

use crate::models::{Address, Identity};

const MIN_OVERRIDE_SECRET_LENGTH: usize = 16;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Directory subsystem configuration.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Bootstrap override account.
    pub override_account: OverrideAccount,
    /// File path for the durable override marker, if any.
    pub marker_path: Option<PathBuf>,
}

/// The configuration-injected bootstrap account.
///
/// Implements `Debug` manually to redact the secret.
#[derive(Clone)]
pub struct OverrideAccount {
    /// Stable id; no profile row may ever exist under it.
    pub id: AccountId,
    /// Login email.
    pub email: Email,
    /// Display first name.
    pub first_name: String,
    /// Display last name.
    pub last_name: String,
    /// Login secret.
    pub secret: SecretString,
}

impl std::fmt::Debug for OverrideAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverrideAccount")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl OverrideAccount {
    /// Whether the given email/password pair matches this account.
    #[must_use]
    pub fn matches(&self, email: &Email, password: &str) -> bool {
        email == &self.email && password == self.secret.expose_secret()
    }

    /// The synthesized in-memory identity for this account.
    ///
    /// Its fields are fixed by configuration; it is never read from or
    /// written to the profile store.
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            email: self.email.as_str().to_owned(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            role: Role::Admin,
            position: String::new(),
            department: String::new(),
            hourly_rate: Decimal::ZERO,
            phone: String::new(),
            avatar_url: String::new(),
            address: Address::default(),
        }
    }
}

impl DirectoryConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or
    /// invalid, or if the override secret fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let email_raw = get_required_env("SHIFTWISE_OVERRIDE_EMAIL")?;
        let email = Email::parse(&email_raw).map_err(|e| {
            ConfigError::InvalidEnvVar("SHIFTWISE_OVERRIDE_EMAIL".to_string(), e.to_string())
        })?;
        let secret = get_validated_secret("SHIFTWISE_OVERRIDE_SECRET")?;

        let override_account = OverrideAccount {
            id: AccountId::from(get_env_or_default(
                "SHIFTWISE_OVERRIDE_ACCOUNT_ID",
                "override-root",
            )),
            email,
            first_name: get_env_or_default("SHIFTWISE_OVERRIDE_FIRST_NAME", "System"),
            last_name: get_env_or_default("SHIFTWISE_OVERRIDE_LAST_NAME", "Administrator"),
            secret,
        };

        let marker_path = get_optional_env("SHIFTWISE_OVERRIDE_MARKER_PATH").map(PathBuf::from);

        Ok(Self {
            override_account,
            marker_path,
        })
    }
}

fn get_required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn get_optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn get_env_or_default(name: &str, default: &str) -> String {
    get_optional_env(name).unwrap_or_else(|| default.to_string())
}

fn get_validated_secret(name: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(name)?;
    validate_secret_strength(&value, name)?;
    Ok(SecretString::from(value))
}

/// Reject secrets that are too short or look like placeholders.
fn validate_secret_strength(value: &str, name: &str) -> Result<(), ConfigError> {
    if value.len() < MIN_OVERRIDE_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            name.to_string(),
            format!("must be at least {MIN_OVERRIDE_SECRET_LENGTH} characters"),
        ));
    }

    let lowered = value.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lowered.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                name.to_string(),
                format!("looks like a placeholder value (contains {pattern:?})"),
            ));
        }
    }

    Ok(())
}
