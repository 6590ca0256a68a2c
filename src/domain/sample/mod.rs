//! Domain model for geological samples.
//!
//! A sample is split into the fields a client may set (`SampleDetails`) and the
//! fields owned by the server (`id`, `created_at`, `updated_at`).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

pub mod lifecycle;
pub mod validation;

pub use lifecycle::{stamp_on_create, stamp_on_update};
pub use validation::FieldError;

/// Kind of specimen collected in the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SampleType {
    Rock,
    Mineral,
    Soil,
    Fossil,
    Sediment,
    Other,
}

impl SampleType {
    pub const ALL: [SampleType; 6] = [
        SampleType::Rock,
        SampleType::Mineral,
        SampleType::Soil,
        SampleType::Fossil,
        SampleType::Sediment,
        SampleType::Other,
    ];

    /// Canonical storage / wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            SampleType::Rock => "ROCK",
            SampleType::Mineral => "MINERAL",
            SampleType::Soil => "SOIL",
            SampleType::Fossil => "FOSSIL",
            SampleType::Sediment => "SEDIMENT",
            SampleType::Other => "OTHER",
        }
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SampleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SampleType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown sample type '{}'", s))
    }
}

/// Client-controlled fields of a sample, already validated.
///
/// Every update replaces all of these wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleDetails {
    pub sample_identifier: String,
    pub sample_name: String,
    pub sample_type: SampleType,
    pub collection_date: NaiveDate,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location_name: Option<String>,
    pub collector_name: String,
    pub description: Option<String>,
    pub storage_location: Option<String>,
}

/// A sample that has been stamped but not yet persisted (no `id`).
#[derive(Debug, Clone, PartialEq)]
pub struct NewSample {
    pub details: SampleDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A persisted sample row.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRecord {
    pub id: Uuid,
    pub details: SampleDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewSample {
    /// Attaches the identity key assigned by a store.
    pub fn with_id(self, id: Uuid) -> SampleRecord {
        SampleRecord {
            id,
            details: self.details,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
