//! Repository trait for mapping storage.

use crate::domain::entities::{Claim, Mapping, NewMapping};
use crate::error::AppError;
use async_trait::async_trait;

/// Storage contract for URL mappings.
///
/// Lookups use exact, case-sensitive string equality and never normalize
/// their input. A miss is `Ok(None)`, not an error.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgMappingRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::InMemoryMappingRepository`] - process-local
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// Finds the first mapping (lowest id) whose long URL equals `long`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] on storage errors.
    async fn find_by_long(&self, long: &str) -> Result<Option<Mapping>, AppError>;

    /// Finds the mapping whose short key equals `short`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] on storage errors.
    async fn find_by_short(&self, short: &str) -> Result<Option<Mapping>, AppError>;

    /// Appends a new mapping with a fresh id.
    ///
    /// Does not check for an existing mapping of the same long URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short key is already taken.
    /// Returns [`AppError::Unavailable`] on storage errors.
    async fn insert(&self, new_mapping: NewMapping) -> Result<Mapping, AppError>;

    /// Atomically looks up `new_mapping.long` and inserts it if absent.
    ///
    /// The lookup and the insert form one unit: two concurrent claims for the
    /// same long URL never both produce [`Claim::Created`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short key is already taken; in
    /// that case nothing is written.
    /// Returns [`AppError::Unavailable`] on storage errors.
    async fn claim(&self, new_mapping: NewMapping) -> Result<Claim, AppError>;

    /// Counts all stored mappings.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] on storage errors.
    async fn count(&self) -> Result<i64, AppError>;

    /// Lists mappings, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] on storage errors.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Mapping>, AppError>;

    /// Verifies the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] if it is not.
    async fn ping(&self) -> Result<(), AppError>;
}
