//! Capability interfaces for the external collaborators.
//!
//! The identity provider and the profile store are hosted services
//! owned outside this subsystem. They are consumed through the traits
//! here; concrete transport implementations live with the deployment,
//! and tests substitute in-memory fakes.

pub mod identity_provider;
pub mod profile_store;

pub use identity_provider::{IdentityProvider, ProviderError, VerifiedSession};
pub use profile_store::{ProfileStore, StoreError};
