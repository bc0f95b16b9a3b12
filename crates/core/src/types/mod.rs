//! Core types for Shiftwise.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod role;
pub mod token;

pub use email::{Email, EmailError};
pub use id::AccountId;
pub use role::Role;
pub use token::SessionToken;
