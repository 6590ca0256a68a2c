//! Validation, stamping, sort parsing and configuration.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use geological_sample_api::domain::page::{Page, PageRequest, Sort, SortDirection, SortField, MAX_PAGE_SIZE};
use geological_sample_api::domain::sample::validation::SampleDraft;
use geological_sample_api::domain::sample::{stamp_on_create, stamp_on_update, SampleType};
use geological_sample_api::infra::config::{ServerConfig, StorageBackend};
use std::collections::HashMap;
use uuid::Uuid;

fn valid_draft() -> SampleDraft {
    SampleDraft {
        sample_identifier: Some("GS-2024-001".to_string()),
        sample_name: Some("Granite Sample".to_string()),
        sample_type: Some(SampleType::Rock),
        collection_date: NaiveDate::from_ymd_opt(2024, 1, 15),
        latitude: Some(40.7128),
        longitude: Some(-74.0060),
        location_name: None,
        collector_name: Some("Dr. Jane Smith".to_string()),
        description: None,
        storage_location: None,
    }
}

#[test]
fn valid_draft_passes_unchanged() {
    let details = valid_draft().validate().unwrap();
    assert_eq!(details.sample_identifier, "GS-2024-001");
    assert_eq!(details.sample_type, SampleType::Rock);
    assert_eq!(details.latitude, Some(40.7128));
}

#[test]
fn all_violations_are_reported_together() {
    let draft = SampleDraft {
        sample_identifier: Some("x".repeat(51)),
        sample_name: Some("\t".to_string()),
        storage_location: Some("s".repeat(201)),
        ..SampleDraft::default()
    };
    let errors = draft.validate().unwrap_err();
    let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(
        fields,
        vec![
            "sampleIdentifier",
            "sampleName",
            "collectorName",
            "sampleType",
            "collectionDate",
            "storageLocation"
        ]
    );
    assert_eq!(errors[1].message, "Sample name is required");
}

#[test]
fn coordinates_are_not_range_checked() {
    let mut draft = valid_draft();
    draft.latitude = Some(95.0);
    draft.longitude = Some(-200.0);
    let details = draft.validate().unwrap();
    assert_eq!(details.latitude, Some(95.0));
    assert_eq!(details.longitude, Some(-200.0));
}

#[test]
fn sample_type_round_trips_through_its_storage_name() {
    for t in SampleType::ALL {
        assert_eq!(t.as_str().parse::<SampleType>().unwrap(), t);
    }
    assert!("rock".parse::<SampleType>().is_err());
}

#[test]
fn stamping_sets_and_preserves_timestamps() {
    let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let details = valid_draft().validate().unwrap();
    let new_sample = stamp_on_create(details.clone(), t0);
    assert_eq!(new_sample.created_at, t0);
    assert_eq!(new_sample.updated_at, t0);

    let record = new_sample.with_id(Uuid::new_v4());
    let mut changed = details;
    changed.sample_name = "Changed".to_string();

    let later = stamp_on_update(record.clone(), changed.clone(), t0 + Duration::minutes(5));
    assert_eq!(later.id, record.id);
    assert_eq!(later.created_at, t0);
    assert_eq!(later.updated_at, t0 + Duration::minutes(5));
    assert_eq!(later.details.sample_name, "Changed");

    // A clock that went backwards never moves updated_at before the prior value.
    let skewed = stamp_on_update(later.clone(), changed, t0 - Duration::hours(1));
    assert_eq!(skewed.updated_at, later.updated_at);
    assert!(skewed.created_at <= skewed.updated_at);
}

#[test]
fn sort_expressions_parse() {
    assert_eq!("id".parse::<Sort>().unwrap(), Sort::default());
    assert_eq!(
        "collectionDate,DESC".parse::<Sort>().unwrap(),
        Sort {
            field: SortField::CollectionDate,
            direction: SortDirection::Desc
        }
    );
    assert_eq!(
        "sampleName,asc".parse::<Sort>().unwrap().field,
        SortField::SampleName
    );
    assert!("sample_name".parse::<Sort>().is_err());
    assert!("id,sideways".parse::<Sort>().is_err());
    assert!("id,asc,extra".parse::<Sort>().is_err());
}

#[test]
fn only_text_sort_fields_are_collated() {
    for field in [
        SortField::SampleIdentifier,
        SortField::SampleName,
        SortField::SampleType,
        SortField::LocationName,
        SortField::CollectorName,
        SortField::StorageLocation,
    ] {
        assert!(field.is_text(), "{}", field.api_name());
    }
    for field in [
        SortField::Id,
        SortField::CollectionDate,
        SortField::Latitude,
        SortField::Longitude,
        SortField::CreatedAt,
        SortField::UpdatedAt,
    ] {
        assert!(!field.is_text(), "{}", field.api_name());
    }
}

#[test]
fn page_request_normalises_size_and_page_metadata() {
    assert_eq!(PageRequest::new(0, 0, Sort::default()).size, 20);
    assert_eq!(PageRequest::new(0, 100_000, Sort::default()).size, MAX_PAGE_SIZE);
    assert_eq!(PageRequest::new(3, 20, Sort::default()).offset(), 60);

    let page: Page<u8> = Page {
        items: vec![],
        total: 0,
        request: PageRequest::default(),
    };
    assert_eq!(page.total_pages(), 0);
    assert!(page.is_first());
    assert!(page.is_last());
}

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn config_defaults_to_postgres_and_requires_database_url() {
    assert!(ServerConfig::from_lookup(lookup(&[])).is_err());

    let config = ServerConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/samples")])).unwrap();
    assert_eq!(config.bind_addr.to_string(), "0.0.0.0:8080");
    assert_eq!(config.static_dir.to_str(), Some("static"));
    assert_eq!(
        config.storage,
        StorageBackend::Postgres {
            database_url: "postgres://localhost/samples".to_string(),
            max_connections: 5
        }
    );
}

#[test]
fn config_memory_backend_and_overrides() {
    let config = ServerConfig::from_lookup(lookup(&[
        ("STORAGE_BACKEND", "memory"),
        ("BIND_ADDR", "127.0.0.1:9000"),
        ("STATIC_DIR", "/srv/frontend"),
    ]))
    .unwrap();
    assert_eq!(config.storage, StorageBackend::Memory);
    assert_eq!(config.bind_addr.port(), 9000);

    assert!(ServerConfig::from_lookup(lookup(&[("STORAGE_BACKEND", "sqlite")])).is_err());
    assert!(ServerConfig::from_lookup(lookup(&[
        ("DATABASE_URL", "postgres://x"),
        ("DB_MAX_CONNECTIONS", "many")
    ]))
    .is_err());
}
