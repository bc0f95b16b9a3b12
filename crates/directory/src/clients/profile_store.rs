//! Profile store capability.

use async_trait::async_trait;
use thiserror::Error;

use shiftwise_core::AccountId;

use crate::models::ProfileRow;

/// Errors surfaced by the profile store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport or store-side failure.
    #[error("profile store request failed: {0}")]
    Request(String),
}

/// Capability wrapper around the external record store holding mutable
/// profile rows, keyed by the same account id space as the identity
/// provider.
///
/// The store has no notion of the bootstrap override account; keeping
/// its id out of every mutation is enforced by this crate's callers,
/// not here.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch a single row by account id.
    async fn select(&self, id: &AccountId) -> Result<Option<ProfileRow>, StoreError>;

    /// Fetch every row.
    async fn select_all(&self) -> Result<Vec<ProfileRow>, StoreError>;

    /// Insert one row.
    async fn insert(&self, row: ProfileRow) -> Result<ProfileRow, StoreError>;

    /// Insert a batch of rows.
    async fn insert_many(&self, rows: Vec<ProfileRow>) -> Result<(), StoreError>;

    /// Apply a partial row to an existing record.
    ///
    /// Returns the updated row, or `None` when the backend did not
    /// return one; some backends update successfully yet respond with
    /// no row, so callers re-fetch instead of treating `None` as a
    /// failure.
    async fn update(
        &self,
        id: &AccountId,
        partial: ProfileRow,
    ) -> Result<Option<ProfileRow>, StoreError>;

    /// Delete a row by account id. Deleting an absent row is a no-op.
    async fn delete(&self, id: &AccountId) -> Result<(), StoreError>;
}
