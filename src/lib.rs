pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::dto::{SamplePage, SampleRequest, SampleResponse};
pub use app::sample_service::{SampleService, ServiceError};
pub use domain::page::{PageRequest, Sort, SortDirection, SortField};
pub use domain::sample::{SampleDetails, SampleRecord, SampleType};
pub use storage::samples::{MemorySampleStore, PgSampleStore, SampleStore, StoreError};
