//! Domain types for the identity and directory layer.

pub mod identity;
pub mod profile;

pub use identity::{Address, Identity};
pub use profile::{AccountSummary, ProfileDraft, ProfileRow, ProfileUpdate};
