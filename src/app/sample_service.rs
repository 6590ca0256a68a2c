//! Business rules for geological samples.
//!
//! The service is stateless: it owns a handle to a [`SampleStore`] and applies
//! identifier-uniqueness checks, not-found translation, timestamp stamping and
//! record -> response mapping around each store call.

use crate::app::dto::{SamplePage, SampleResponse};
use crate::domain::page::PageRequest;
use crate::domain::sample::{stamp_on_create, stamp_on_update, SampleDetails};
use crate::storage::samples::{SampleStore, StoreError};
use chrono::{DateTime, SubsecRound, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Sample identifier already exists: {0}")]
    DuplicateIdentifier(String),

    #[error("Sample not found with id: {0}")]
    NotFound(Uuid),

    #[error("storage failure: {0}")]
    Storage(#[source] StoreError),
}

impl ServiceError {
    /// Translates a store failure, turning a uniqueness violation on
    /// `sample_identifier` into `DuplicateIdentifier`.
    fn from_store(err: StoreError, sample_identifier: &str) -> Self {
        match err {
            StoreError::ConstraintViolation(_) => {
                ServiceError::DuplicateIdentifier(sample_identifier.to_string())
            }
            other => ServiceError::Storage(other),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        ServiceError::Storage(err)
    }
}

/// Current time at the precision TIMESTAMPTZ keeps (microseconds).
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[derive(Clone)]
pub struct SampleService {
    store: Arc<dyn SampleStore>,
}

impl SampleService {
    pub fn new(store: Arc<dyn SampleStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, details: SampleDetails) -> Result<SampleResponse, ServiceError> {
        let identifier = details.sample_identifier.clone();
        info!(sample_identifier = %identifier, "creating sample");

        if self.store.exists_by_identifier(&identifier).await? {
            warn!(sample_identifier = %identifier, "sample identifier already exists");
            return Err(ServiceError::DuplicateIdentifier(identifier));
        }

        // The store's unique constraint still decides races between concurrent creates.
        let new_sample = stamp_on_create(details, now());
        let record = self
            .store
            .insert(new_sample)
            .await
            .map_err(|e| ServiceError::from_store(e, &identifier))?;

        info!(id = %record.id, sample_identifier = %identifier, "created sample");
        Ok(record.into())
    }

    pub async fn get(&self, id: Uuid) -> Result<SampleResponse, ServiceError> {
        debug!(%id, "fetching sample");
        match self.store.find_by_id(id).await? {
            Some(record) => Ok(record.into()),
            None => {
                warn!(%id, "sample not found");
                Err(ServiceError::NotFound(id))
            }
        }
    }

    pub async fn list(&self, request: PageRequest) -> Result<SamplePage, ServiceError> {
        debug!(
            page = request.page,
            size = request.size,
            sort = request.sort.field.api_name(),
            "listing samples"
        );
        let page = self.store.list(request).await?;
        Ok(page.map(SampleResponse::from).into())
    }

    /// Replaces every mutable field of the sample; `id` and `created_at` are kept.
    pub async fn update(
        &self,
        id: Uuid,
        details: SampleDetails,
    ) -> Result<SampleResponse, ServiceError> {
        info!(%id, "updating sample");

        let Some(existing) = self.store.find_by_id(id).await? else {
            warn!(%id, "sample not found");
            return Err(ServiceError::NotFound(id));
        };

        let identifier = details.sample_identifier.clone();
        if existing.details.sample_identifier != identifier {
            if let Some(other) = self.store.find_by_identifier(&identifier).await? {
                if other.id != id {
                    warn!(%id, sample_identifier = %identifier, "sample identifier already exists");
                    return Err(ServiceError::DuplicateIdentifier(identifier));
                }
            }
        }

        let updated = stamp_on_update(existing, details, now());
        let found = self
            .store
            .update(&updated)
            .await
            .map_err(|e| ServiceError::from_store(e, &identifier))?;
        if !found {
            // Deleted between the read and the write.
            warn!(%id, "sample disappeared during update");
            return Err(ServiceError::NotFound(id));
        }

        info!(%id, "updated sample");
        Ok(updated.into())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        info!(%id, "deleting sample");
        if !self.store.delete(id).await? {
            warn!(%id, "sample not found");
            return Err(ServiceError::NotFound(id));
        }
        info!(%id, "deleted sample");
        Ok(())
    }
}
