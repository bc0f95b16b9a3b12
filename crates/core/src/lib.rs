//! Shiftwise Core - Shared types library.
//!
//! This crate provides common types used across all Shiftwise components:
//! - `directory` - Identity, session, and directory reconciliation
//! - the UI/application layer that consumes the directory API
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no store access, no
//! network clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for account IDs, emails, roles, and tokens

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
