//! Field validation for incoming sample payloads.

use crate::domain::sample::{SampleDetails, SampleType};
use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

// Column widths of the `samples` table.
pub const MAX_IDENTIFIER_LEN: usize = 50;
pub const MAX_NAME_LEN: usize = 200;
pub const MAX_LOCATION_NAME_LEN: usize = 200;
pub const MAX_COLLECTOR_NAME_LEN: usize = 100;
pub const MAX_STORAGE_LOCATION_LEN: usize = 200;

/// A single rejected field, reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Sample fields as received, before any constraint has been checked.
#[derive(Debug, Clone, Default)]
pub struct SampleDraft {
    pub sample_identifier: Option<String>,
    pub sample_name: Option<String>,
    pub sample_type: Option<SampleType>,
    pub collection_date: Option<NaiveDate>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location_name: Option<String>,
    pub collector_name: Option<String>,
    pub description: Option<String>,
    pub storage_location: Option<String>,
}

impl SampleDraft {
    /// Checks every constraint and collects all violations before failing.
    pub fn validate(self) -> Result<SampleDetails, Vec<FieldError>> {
        let mut errors = Vec::new();

        let sample_identifier = required_text(
            &mut errors,
            "sampleIdentifier",
            "Sample identifier is required",
            self.sample_identifier,
            MAX_IDENTIFIER_LEN,
        );
        let sample_name = required_text(
            &mut errors,
            "sampleName",
            "Sample name is required",
            self.sample_name,
            MAX_NAME_LEN,
        );
        let collector_name = required_text(
            &mut errors,
            "collectorName",
            "Collector name is required",
            self.collector_name,
            MAX_COLLECTOR_NAME_LEN,
        );

        if self.sample_type.is_none() {
            errors.push(FieldError::new("sampleType", "Sample type is required"));
        }
        if self.collection_date.is_none() {
            errors.push(FieldError::new("collectionDate", "Collection date is required"));
        }

        check_max_len(
            &mut errors,
            "locationName",
            self.location_name.as_deref(),
            MAX_LOCATION_NAME_LEN,
        );
        check_max_len(
            &mut errors,
            "storageLocation",
            self.storage_location.as_deref(),
            MAX_STORAGE_LOCATION_LEN,
        );

        match (
            sample_identifier,
            sample_name,
            self.sample_type,
            self.collection_date,
            collector_name,
        ) {
            (Some(sample_identifier), Some(sample_name), Some(sample_type), Some(collection_date), Some(collector_name))
                if errors.is_empty() =>
            {
                Ok(SampleDetails {
                    sample_identifier,
                    sample_name,
                    sample_type,
                    collection_date,
                    latitude: self.latitude,
                    longitude: self.longitude,
                    location_name: self.location_name,
                    collector_name,
                    description: self.description,
                    storage_location: self.storage_location,
                })
            }
            _ => Err(errors),
        }
    }
}

fn required_text(
    errors: &mut Vec<FieldError>,
    field: &str,
    missing_message: &str,
    value: Option<String>,
    max_len: usize,
) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => {
            if v.chars().count() > max_len {
                errors.push(FieldError::new(
                    field,
                    format!("must be at most {} characters", max_len),
                ));
                None
            } else {
                Some(v)
            }
        }
        _ => {
            errors.push(FieldError::new(field, missing_message));
            None
        }
    }
}

fn check_max_len(errors: &mut Vec<FieldError>, field: &str, value: Option<&str>, max_len: usize) {
    if let Some(v) = value {
        if v.chars().count() > max_len {
            errors.push(FieldError::new(
                field,
                format!("must be at most {} characters", max_len),
            ));
        }
    }
}
