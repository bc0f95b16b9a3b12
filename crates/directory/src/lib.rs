//! Shiftwise Directory - identity, session, and directory reconciliation.
//!
//! This crate is the identity layer of the Shiftwise workforce platform.
//! It owns three concerns:
//!
//! - **Session caching** ([`session`]): resolving who the current user is,
//!   either through the external identity provider or through the
//!   configuration-injected bootstrap override account, and holding that
//!   answer in a process-local cache with non-blocking reads.
//! - **Authorization** ([`authz`]): pure role and permission decisions
//!   derived from the cached identity.
//! - **Directory reconciliation** ([`reconciler`]): keeping the mutable
//!   profile store consistent with the identity provider's account list
//!   and exposing the reconciled directory to privileged callers.
//!
//! # Architecture
//!
//! The identity provider and the profile store are external
//! collaborators, consumed through the capability traits in [`clients`].
//! This crate never owns a wire format or a database; UI code consumes
//! it only through the operations on [`session::SessionCache`] and
//! [`reconciler::DirectoryService`], all of which return typed `Result`s
//! rather than panicking.
//!
//! The bootstrap override account deliberately bypasses the identity
//! provider: its credentials come from configuration, its session token
//! is synthesized locally, and no profile row is ever written for it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod authz;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod reconciler;
pub mod session;
pub mod transform;

pub use authz::{Authorizer, PermissionTable};
pub use config::{DirectoryConfig, OverrideAccount};
pub use error::DirectoryError;
pub use reconciler::DirectoryService;
pub use session::{AuthError, AuthState, SessionCache};
