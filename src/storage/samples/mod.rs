//! Persistence contract for sample records, with Postgres and in-memory backends.

use crate::domain::page::{Page, PageRequest};
use crate::domain::sample::{NewSample, SampleRecord};
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub mod memory;
pub mod postgres;

pub use memory::MemorySampleStore;
pub use postgres::PgSampleStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be mapped back into a record.
    #[error("corrupt row: {0}")]
    CorruptRow(String),
}

/// Exclusive owner of persisted samples.
///
/// Implementations enforce `sample_identifier` uniqueness themselves, so a
/// colliding write fails with [`StoreError::ConstraintViolation`] regardless of
/// any check done by the caller.
#[async_trait]
pub trait SampleStore: Send + Sync {
    /// Persists a new sample and returns it with its generated `id`.
    async fn insert(&self, sample: NewSample) -> Result<SampleRecord, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<SampleRecord>, StoreError>;

    async fn find_by_identifier(
        &self,
        sample_identifier: &str,
    ) -> Result<Option<SampleRecord>, StoreError>;

    async fn exists_by_identifier(&self, sample_identifier: &str) -> Result<bool, StoreError>;

    /// Replaces every mutable column of the row with `record.id`.
    ///
    /// Returns `false` when no such row exists.
    async fn update(&self, record: &SampleRecord) -> Result<bool, StoreError>;

    /// Returns `true` if a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Returns one page, ordered by the requested sort with `id` as tie-breaker.
    async fn list(&self, request: PageRequest) -> Result<Page<SampleRecord>, StoreError>;

    /// Cheap reachability check.
    async fn ping(&self) -> Result<(), StoreError>;
}
