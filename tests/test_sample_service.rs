//! Service-level behaviour against the in-memory store.

use chrono::NaiveDate;
use geological_sample_api::{
    MemorySampleStore, PageRequest, SampleDetails, SampleService, SampleStore, SampleType,
    ServiceError, Sort, SortDirection, SortField,
};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

fn details(identifier: &str) -> SampleDetails {
    SampleDetails {
        sample_identifier: identifier.to_string(),
        sample_name: "Granite Sample".to_string(),
        sample_type: SampleType::Rock,
        collection_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        latitude: Some(40.7128),
        longitude: Some(-74.0060),
        location_name: Some("Central Park".to_string()),
        collector_name: "Dr. Jane Smith".to_string(),
        description: Some("Fine-grained granite sample".to_string()),
        storage_location: Some("Lab-A-Shelf-12".to_string()),
    }
}

fn service() -> (SampleService, MemorySampleStore) {
    let store = MemorySampleStore::new();
    (SampleService::new(Arc::new(store.clone())), store)
}

#[tokio::test]
async fn create_assigns_fresh_id_and_equal_timestamps() {
    let (service, _) = service();

    let mut seen = HashSet::new();
    for i in 0..10 {
        let created = service.create(details(&format!("GS-{:03}", i))).await.unwrap();
        assert!(!created.id.is_nil());
        assert!(seen.insert(created.id), "id reused: {}", created.id);
        assert_eq!(created.created_at, created.updated_at);
    }
}

#[tokio::test]
async fn duplicate_identifier_is_rejected_and_store_keeps_one_row() {
    let (service, store) = service();

    service.create(details("GS-2024-001")).await.unwrap();
    let err = service.create(details("GS-2024-001")).await.unwrap_err();
    assert!(matches!(err, ServiceError::DuplicateIdentifier(ref id) if id == "GS-2024-001"));

    assert_eq!(store.len().await, 1);
    assert!(store.exists_by_identifier("GS-2024-001").await.unwrap());
}

#[tokio::test]
async fn get_after_delete_is_not_found() {
    let (service, _) = service();

    let created = service.create(details("GS-DEL")).await.unwrap();
    assert_eq!(service.get(created.id).await.unwrap(), created);

    service.delete(created.id).await.unwrap();
    assert!(matches!(
        service.get(created.id).await,
        Err(ServiceError::NotFound(id)) if id == created.id
    ));
    assert!(matches!(
        service.delete(created.id).await,
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn update_preserves_identity_and_advances_updated_at() {
    let (service, _) = service();

    let created = service.create(details("GS-2024-001")).await.unwrap();

    let mut changed = details("GS-2024-002");
    changed.sample_type = SampleType::Mineral;
    changed.latitude = None;
    changed.description = None;

    let updated = service.update(created.id, changed).await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
    assert_eq!(updated.sample_identifier, "GS-2024-002");
    assert_eq!(updated.sample_type, SampleType::Mineral);
    // Wholesale replacement: omitted optionals are cleared.
    assert_eq!(updated.latitude, None);
    assert_eq!(updated.description, None);

    let fetched = service.get(created.id).await.unwrap();
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn update_keeping_own_identifier_is_allowed() {
    let (service, _) = service();

    let created = service.create(details("GS-SAME")).await.unwrap();
    let mut changed = details("GS-SAME");
    changed.sample_name = "Renamed".to_string();

    let updated = service.update(created.id, changed).await.unwrap();
    assert_eq!(updated.sample_name, "Renamed");
}

#[tokio::test]
async fn update_to_other_samples_identifier_is_rejected() {
    let (service, _) = service();

    service.create(details("GS-A")).await.unwrap();
    let b = service.create(details("GS-B")).await.unwrap();

    let err = service.update(b.id, details("GS-A")).await.unwrap_err();
    assert!(matches!(err, ServiceError::DuplicateIdentifier(_)));
    assert_eq!(service.get(b.id).await.unwrap().sample_identifier, "GS-B");
}

#[tokio::test]
async fn update_unknown_id_is_not_found() {
    let (service, _) = service();
    let err = service.update(Uuid::new_v4(), details("GS-X")).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn list_paginates_25_records() {
    let (service, _) = service();
    for i in 0..25 {
        service.create(details(&format!("GS-{:03}", i))).await.unwrap();
    }

    let first = service
        .list(PageRequest::new(0, 20, Sort::default()))
        .await
        .unwrap();
    assert_eq!(first.content.len(), 20);
    assert_eq!(first.total_elements, 25);
    assert_eq!(first.total_pages, 2);
    assert!(first.first);
    assert!(!first.last);

    let second = service
        .list(PageRequest::new(1, 20, Sort::default()))
        .await
        .unwrap();
    assert_eq!(second.content.len(), 5);
    assert_eq!(second.total_elements, 25);
    assert!(second.last);

    let mut ids: HashSet<Uuid> = first.content.iter().map(|s| s.id).collect();
    ids.extend(second.content.iter().map(|s| s.id));
    assert_eq!(ids.len(), 25);

    let beyond = service
        .list(PageRequest::new(5, 20, Sort::default()))
        .await
        .unwrap();
    assert!(beyond.empty);
    assert_eq!(beyond.total_elements, 25);
}

#[tokio::test]
async fn list_orders_by_requested_field() {
    let (service, _) = service();
    for (identifier, day) in [("GS-B", 3), ("GS-A", 1), ("GS-C", 2)] {
        let mut d = details(identifier);
        d.collection_date = NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        service.create(d).await.unwrap();
    }

    let sort = Sort {
        field: SortField::CollectionDate,
        direction: SortDirection::Desc,
    };
    let page = service.list(PageRequest::new(0, 10, sort)).await.unwrap();
    let order: Vec<&str> = page
        .content
        .iter()
        .map(|s| s.sample_identifier.as_str())
        .collect();
    assert_eq!(order, vec!["GS-B", "GS-C", "GS-A"]);

    let sort = Sort {
        field: SortField::SampleIdentifier,
        direction: SortDirection::Asc,
    };
    let page = service.list(PageRequest::new(0, 10, sort)).await.unwrap();
    let order: Vec<&str> = page
        .content
        .iter()
        .map(|s| s.sample_identifier.as_str())
        .collect();
    assert_eq!(order, vec!["GS-A", "GS-B", "GS-C"]);
}

#[tokio::test]
async fn text_sort_is_byte_order() {
    let (service, _) = service();
    for name in ["apatite", "Basalt", "_core", "Zircon"] {
        let mut d = details(&format!("GS-{}", name));
        d.sample_name = name.to_string();
        service.create(d).await.unwrap();
    }

    let sort = Sort {
        field: SortField::SampleName,
        direction: SortDirection::Asc,
    };
    let page = service.list(PageRequest::new(0, 10, sort)).await.unwrap();
    let order: Vec<&str> = page.content.iter().map(|s| s.sample_name.as_str()).collect();
    // Uppercase before `_` before lowercase, as under `COLLATE "C"`.
    assert_eq!(order, vec!["Basalt", "Zircon", "_core", "apatite"]);
}

#[tokio::test]
async fn concurrent_creates_with_same_identifier_admit_exactly_one() {
    let (service, store) = service();
    let service = Arc::new(service);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service.create(details("GS-RACE")).await
        }));
    }

    let mut ok = 0;
    for h in handles {
        match h.await.unwrap() {
            Ok(_) => ok += 1,
            Err(ServiceError::DuplicateIdentifier(_)) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(ok, 1);
    assert_eq!(store.len().await, 1);
}
