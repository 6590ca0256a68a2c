//! Postgres-backed sample store.

use crate::domain::page::{Page, PageRequest};
use crate::domain::sample::{NewSample, SampleDetails, SampleRecord, SampleType};
use crate::storage::samples::{SampleStore, StoreError};
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

/// Schema of the single `samples` table.
pub const CREATE_SAMPLES_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS samples (
    id UUID PRIMARY KEY,
    sample_identifier VARCHAR(50) NOT NULL,
    sample_name VARCHAR(200) NOT NULL,
    sample_type VARCHAR(20) NOT NULL,
    collection_date DATE NOT NULL,
    latitude DOUBLE PRECISION,
    longitude DOUBLE PRECISION,
    location_name VARCHAR(200),
    collector_name VARCHAR(100) NOT NULL,
    description TEXT,
    storage_location VARCHAR(200),
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL,
    CONSTRAINT samples_sample_identifier_key UNIQUE (sample_identifier)
)";

const SAMPLE_COLUMNS: &str = "id, sample_identifier, sample_name, sample_type, collection_date, \
     latitude, longitude, location_name, collector_name, description, storage_location, \
     created_at, updated_at";

#[derive(Clone)]
pub struct PgSampleStore {
    pool: PgPool,
}

impl PgSampleStore {
    /// Wraps an existing pool. The schema is not touched; see [`Self::ensure_schema`].
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool against `database_url` and makes sure the `samples` table exists.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        info!(max_connections, "connected to postgres sample store");
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_SAMPLES_TABLE_SQL)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Maps unique-constraint failures to `ConstraintViolation`; everything else stays a database error.
fn map_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::ConstraintViolation(db_err.message().to_string());
        }
    }
    StoreError::Database(err)
}

fn record_from_row(row: &PgRow) -> Result<SampleRecord, StoreError> {
    let sample_type: String = row.try_get("sample_type")?;
    let sample_type = sample_type.parse::<SampleType>().map_err(StoreError::CorruptRow)?;

    Ok(SampleRecord {
        id: row.try_get("id")?,
        details: SampleDetails {
            sample_identifier: row.try_get("sample_identifier")?,
            sample_name: row.try_get("sample_name")?,
            sample_type,
            collection_date: row.try_get("collection_date")?,
            latitude: row.try_get("latitude")?,
            longitude: row.try_get("longitude")?,
            location_name: row.try_get("location_name")?,
            collector_name: row.try_get("collector_name")?,
            description: row.try_get("description")?,
            storage_location: row.try_get("storage_location")?,
        },
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl SampleStore for PgSampleStore {
    async fn insert(&self, sample: NewSample) -> Result<SampleRecord, StoreError> {
        let id = Uuid::new_v4();
        let d = &sample.details;

        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(&format!(
            "INSERT INTO samples ({SAMPLE_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {SAMPLE_COLUMNS}"
        ))
        .bind(id)
        .bind(&d.sample_identifier)
        .bind(&d.sample_name)
        .bind(d.sample_type.as_str())
        .bind(d.collection_date)
        .bind(d.latitude)
        .bind(d.longitude)
        .bind(&d.location_name)
        .bind(&d.collector_name)
        .bind(&d.description)
        .bind(&d.storage_location)
        .bind(sample.created_at)
        .bind(sample.updated_at)
        .fetch_one(tx.as_mut())
        .await
        .map_err(map_write_error)?;
        let record = record_from_row(&row)?;
        tx.commit().await?;

        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<SampleRecord>, StoreError> {
        let row = sqlx::query(&format!("SELECT {SAMPLE_COLUMNS} FROM samples WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(record_from_row).transpose()
    }

    async fn find_by_identifier(
        &self,
        sample_identifier: &str,
    ) -> Result<Option<SampleRecord>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {SAMPLE_COLUMNS} FROM samples WHERE sample_identifier = $1"
        ))
        .bind(sample_identifier)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(record_from_row).transpose()
    }

    async fn exists_by_identifier(&self, sample_identifier: &str) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM samples WHERE sample_identifier = $1)")
                .bind(sample_identifier)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn update(&self, record: &SampleRecord) -> Result<bool, StoreError> {
        let d = &record.details;

        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            "UPDATE samples SET
                sample_identifier = $2,
                sample_name = $3,
                sample_type = $4,
                collection_date = $5,
                latitude = $6,
                longitude = $7,
                location_name = $8,
                collector_name = $9,
                description = $10,
                storage_location = $11,
                updated_at = $12
             WHERE id = $1",
        )
        .bind(record.id)
        .bind(&d.sample_identifier)
        .bind(&d.sample_name)
        .bind(d.sample_type.as_str())
        .bind(d.collection_date)
        .bind(d.latitude)
        .bind(d.longitude)
        .bind(&d.location_name)
        .bind(&d.collector_name)
        .bind(&d.description)
        .bind(&d.storage_location)
        .bind(record.updated_at)
        .execute(tx.as_mut())
        .await
        .map_err(map_write_error)?;
        tx.commit().await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM samples WHERE id = $1")
            .bind(id)
            .execute(tx.as_mut())
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, request: PageRequest) -> Result<Page<SampleRecord>, StoreError> {
        // Count and page come from the same snapshot.
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(tx.as_mut())
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM samples")
            .fetch_one(tx.as_mut())
            .await?;

        // Byte-order collation keeps text ordering independent of the database locale.
        let collate = if request.sort.field.is_text() { " COLLATE \"C\"" } else { "" };
        let sql = format!(
            "SELECT {SAMPLE_COLUMNS} FROM samples ORDER BY {}{} {}, id ASC LIMIT $1 OFFSET $2",
            request.sort.field.column(),
            collate,
            request.sort.direction.sql(),
        );
        let offset = i64::try_from(request.offset()).unwrap_or(i64::MAX);
        let rows = sqlx::query(&sql)
            .bind(i64::from(request.size))
            .bind(offset)
            .fetch_all(tx.as_mut())
            .await?;
        tx.commit().await?;

        let items = rows
            .iter()
            .map(record_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page {
            items,
            total: u64::try_from(total).unwrap_or_default(),
            request,
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
