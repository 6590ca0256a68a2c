use crate::app::sample_service::SampleService;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::path::PathBuf;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

pub const SERVICE_NAME: &str = "Geological Sample Management API";

#[derive(Clone)]
pub struct AppState {
    pub sample_service: Arc<SampleService>,
    /// Directory holding the built frontend; `None` disables static serving.
    pub static_dir: Option<PathBuf>,
}

/// Envelope used for every error body.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Query string of `GET /api/v1/samples`.
#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Zero-based page number (default 0).
    pub page: Option<u32>,
    /// Page size (default 20, capped at 2000).
    pub size: Option<u32>,
    /// `field` or `field,asc|desc` (default `id,asc`).
    #[param(example = "collectionDate,desc")]
    pub sort: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "UP")]
    pub status: String,
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: DateTime<Utc>,
    pub service: String,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiEndpoints {
    pub health: String,
    pub samples: String,
    pub api_docs: String,
}

/// Returned by `GET /` when no frontend build is available.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ApiInfoResponse {
    pub service: String,
    pub version: String,
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: DateTime<Utc>,
    pub status: String,
    pub endpoints: ApiEndpoints,
    pub note: String,
}
