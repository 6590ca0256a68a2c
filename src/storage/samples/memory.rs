//! In-memory sample store.
//!
//! Mirrors the Postgres backend's semantics so the service behaves identically on both:
//! unique identifiers, `NULLS LAST` ascending ordering and an `id` tie-breaker. Strings
//! compare by byte value, which is what Postgres does under the `COLLATE "C"` the
//! backend applies to text sort columns.

use crate::domain::page::{Page, PageRequest, SortDirection, SortField};
use crate::domain::sample::{NewSample, SampleRecord};
use crate::storage::samples::{SampleStore, StoreError};
use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    rows: HashMap<Uuid, SampleRecord>,
    /// sample_identifier -> id
    by_identifier: HashMap<String, Uuid>,
}

#[derive(Clone, Default)]
pub struct MemorySampleStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemorySampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.tables.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn unique_violation(sample_identifier: &str) -> StoreError {
    StoreError::ConstraintViolation(format!(
        "duplicate key value violates unique constraint on sample_identifier ({})",
        sample_identifier
    ))
}

fn cmp_opt<T: PartialOrd>(a: Option<&T>, b: Option<&T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (None, None) => Ordering::Equal,
        // Postgres sorts NULL as larger than any value.
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
    }
}

fn cmp_by_field(a: &SampleRecord, b: &SampleRecord, field: SortField) -> Ordering {
    let (da, db) = (&a.details, &b.details);
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::SampleIdentifier => da.sample_identifier.cmp(&db.sample_identifier),
        SortField::SampleName => da.sample_name.cmp(&db.sample_name),
        SortField::SampleType => da.sample_type.as_str().cmp(db.sample_type.as_str()),
        SortField::CollectionDate => da.collection_date.cmp(&db.collection_date),
        SortField::Latitude => cmp_opt(da.latitude.as_ref(), db.latitude.as_ref()),
        SortField::Longitude => cmp_opt(da.longitude.as_ref(), db.longitude.as_ref()),
        SortField::LocationName => cmp_opt(da.location_name.as_ref(), db.location_name.as_ref()),
        SortField::CollectorName => da.collector_name.cmp(&db.collector_name),
        SortField::StorageLocation => {
            cmp_opt(da.storage_location.as_ref(), db.storage_location.as_ref())
        }
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

#[async_trait]
impl SampleStore for MemorySampleStore {
    async fn insert(&self, sample: NewSample) -> Result<SampleRecord, StoreError> {
        let mut tables = self.tables.write().await;
        let identifier = sample.details.sample_identifier.clone();
        if tables.by_identifier.contains_key(&identifier) {
            return Err(unique_violation(&identifier));
        }

        let mut id = Uuid::new_v4();
        while tables.rows.contains_key(&id) {
            id = Uuid::new_v4();
        }
        let record = sample.with_id(id);
        tables.by_identifier.insert(identifier, id);
        tables.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<SampleRecord>, StoreError> {
        Ok(self.tables.read().await.rows.get(&id).cloned())
    }

    async fn find_by_identifier(
        &self,
        sample_identifier: &str,
    ) -> Result<Option<SampleRecord>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .by_identifier
            .get(sample_identifier)
            .and_then(|id| tables.rows.get(id))
            .cloned())
    }

    async fn exists_by_identifier(&self, sample_identifier: &str) -> Result<bool, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .by_identifier
            .contains_key(sample_identifier))
    }

    async fn update(&self, record: &SampleRecord) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let old_identifier = match tables.rows.get(&record.id) {
            Some(existing) => existing.details.sample_identifier.clone(),
            None => return Ok(false),
        };

        let new_identifier = &record.details.sample_identifier;
        if *new_identifier != old_identifier {
            if tables.by_identifier.contains_key(new_identifier) {
                return Err(unique_violation(new_identifier));
            }
            tables.by_identifier.remove(&old_identifier);
            tables.by_identifier.insert(new_identifier.clone(), record.id);
        }

        if let Some(row) = tables.rows.get_mut(&record.id) {
            // created_at is immutable, matching the column list of the SQL UPDATE.
            row.details = record.details.clone();
            row.updated_at = record.updated_at;
        }
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        match tables.rows.remove(&id) {
            Some(removed) => {
                tables
                    .by_identifier
                    .remove(&removed.details.sample_identifier);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self, request: PageRequest) -> Result<Page<SampleRecord>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<&SampleRecord> = tables.rows.values().collect();

        let sort = request.sort;
        rows.sort_by(|a, b| {
            let primary = cmp_by_field(a, b, sort.field);
            let primary = match sort.direction {
                SortDirection::Asc => primary,
                SortDirection::Desc => primary.reverse(),
            };
            primary.then_with(|| a.id.cmp(&b.id))
        });

        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let items = rows
            .into_iter()
            .skip(offset)
            .take(request.size as usize)
            .cloned()
            .collect();

        Ok(Page {
            items,
            total: tables.rows.len() as u64,
            request,
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
