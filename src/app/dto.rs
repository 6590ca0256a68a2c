//! Wire shapes of the sample API and their mapping to the domain model.

use crate::domain::page::Page;
use crate::domain::sample::validation::SampleDraft;
use crate::domain::sample::{FieldError, SampleRecord, SampleType};
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use utoipa::ToSchema;
use uuid::Uuid;

/// Body of `POST /api/v1/samples` and `PUT /api/v1/samples/{id}`.
///
/// Every field is optional at the JSON level so that missing values are
/// reported per field instead of as a single parse failure.
#[derive(Deserialize, Serialize, Debug, Clone, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SampleRequest {
    #[schema(example = "GS-2024-001")]
    pub sample_identifier: Option<String>,
    #[schema(example = "Granite Sample")]
    pub sample_name: Option<String>,
    pub sample_type: Option<SampleType>,
    #[schema(value_type = Option<String>, format = Date, example = "2024-01-15")]
    pub collection_date: Option<NaiveDate>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location_name: Option<String>,
    #[schema(example = "Dr. Jane Smith")]
    pub collector_name: Option<String>,
    pub description: Option<String>,
    pub storage_location: Option<String>,
}

impl SampleRequest {
    /// Decodes a JSON body one field at a time, so a value of the wrong type is
    /// reported against the field that carried it. Unknown keys are ignored.
    pub fn from_json(body: JsonValue) -> Result<Self, Vec<FieldError>> {
        let JsonValue::Object(mut fields) = body else {
            return Err(vec![FieldError::new("body", "must be a JSON object")]);
        };
        let mut errors = Vec::new();
        let sample_types = SampleType::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let request = SampleRequest {
            sample_identifier: typed_field(&mut fields, "sampleIdentifier", "must be a string", &mut errors),
            sample_name: typed_field(&mut fields, "sampleName", "must be a string", &mut errors),
            sample_type: typed_field(
                &mut fields,
                "sampleType",
                &format!("must be one of {}", sample_types),
                &mut errors,
            ),
            collection_date: typed_field(
                &mut fields,
                "collectionDate",
                "must be a date in YYYY-MM-DD format",
                &mut errors,
            ),
            latitude: typed_field(&mut fields, "latitude", "must be a number", &mut errors),
            longitude: typed_field(&mut fields, "longitude", "must be a number", &mut errors),
            location_name: typed_field(&mut fields, "locationName", "must be a string", &mut errors),
            collector_name: typed_field(&mut fields, "collectorName", "must be a string", &mut errors),
            description: typed_field(&mut fields, "description", "must be a string", &mut errors),
            storage_location: typed_field(&mut fields, "storageLocation", "must be a string", &mut errors),
        };

        if errors.is_empty() {
            Ok(request)
        } else {
            Err(errors)
        }
    }
}

/// Takes `name` out of the body; `null` and absent both mean "not provided".
fn typed_field<T: DeserializeOwned>(
    fields: &mut Map<String, JsonValue>,
    name: &str,
    expected: &str,
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    match fields.remove(name) {
        None | Some(JsonValue::Null) => None,
        Some(value) => match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(_) => {
                errors.push(FieldError::new(name, expected));
                None
            }
        },
    }
}

impl From<SampleRequest> for SampleDraft {
    fn from(req: SampleRequest) -> Self {
        SampleDraft {
            sample_identifier: req.sample_identifier,
            sample_name: req.sample_name,
            sample_type: req.sample_type,
            collection_date: req.collection_date,
            latitude: req.latitude,
            longitude: req.longitude,
            location_name: req.location_name,
            collector_name: req.collector_name,
            description: req.description,
            storage_location: req.storage_location,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SampleResponse {
    pub id: Uuid,
    pub sample_identifier: String,
    pub sample_name: String,
    pub sample_type: SampleType,
    #[schema(value_type = String, format = Date)]
    pub collection_date: NaiveDate,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location_name: Option<String>,
    pub collector_name: String,
    pub description: Option<String>,
    pub storage_location: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<Utc>,
}

impl From<SampleRecord> for SampleResponse {
    fn from(record: SampleRecord) -> Self {
        let d = record.details;
        SampleResponse {
            id: record.id,
            sample_identifier: d.sample_identifier,
            sample_name: d.sample_name,
            sample_type: d.sample_type,
            collection_date: d.collection_date,
            latitude: d.latitude,
            longitude: d.longitude,
            location_name: d.location_name,
            collector_name: d.collector_name,
            description: d.description,
            storage_location: d.storage_location,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// A page of samples, shaped like the listing the frontend consumes.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SamplePage {
    pub content: Vec<SampleResponse>,
    pub total_elements: u64,
    pub total_pages: u64,
    /// Requested page size.
    pub size: u32,
    /// Zero-based page number.
    pub number: u32,
    pub number_of_elements: usize,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl From<Page<SampleResponse>> for SamplePage {
    fn from(page: Page<SampleResponse>) -> Self {
        let total_pages = page.total_pages();
        let first = page.is_first();
        let last = page.is_last();
        let request = page.request;
        let content = page.items;

        SamplePage {
            total_elements: page.total,
            total_pages,
            size: request.size,
            number: request.page,
            number_of_elements: content.len(),
            first,
            last,
            empty: content.is_empty(),
            content,
        }
    }
}
