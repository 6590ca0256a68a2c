//! CRUD endpoints under `/api/v1/samples`.

use crate::app::dto::{SamplePage, SampleRequest, SampleResponse};
use crate::domain::page::{PageRequest, Sort};
use crate::domain::sample::validation::SampleDraft;
use crate::domain::sample::{FieldError, SampleDetails};
use crate::transport::http::error::ApiError;
use crate::transport::http::types::{ApiResponse, AppState, PageParams};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value as JsonValue;
use tracing::info;
use uuid::Uuid;

/// Parses and validates a sample payload before it reaches the service.
///
/// Only unparseable JSON is a bare 400; wrong-typed fields are reported per field.
fn validated_details(
    body: Result<Json<JsonValue>, JsonRejection>,
) -> Result<SampleDetails, ApiError> {
    let Json(body) = body?;
    let request = SampleRequest::from_json(body).map_err(ApiError::Validation)?;
    SampleDraft::from(request)
        .validate()
        .map_err(ApiError::Validation)
}

fn page_request(params: PageParams) -> Result<PageRequest, ApiError> {
    let sort = match params.sort.as_deref() {
        None | Some("") => Sort::default(),
        Some(s) => s
            .parse::<Sort>()
            .map_err(|msg| ApiError::Validation(vec![FieldError::new("sort", msg)]))?,
    };
    Ok(PageRequest::new(
        params.page.unwrap_or(0),
        params.size.unwrap_or(0),
        sort,
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/samples",
    tag = "Samples",
    request_body = SampleRequest,
    responses(
        (status = 201, description = "Sample created", body = SampleResponse),
        (status = 400, description = "Validation failed or duplicate sample identifier", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn create_sample_handler(
    State(state): State<AppState>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> Result<(StatusCode, Json<SampleResponse>), ApiError> {
    let details = validated_details(body)?;
    info!(sample_identifier = %details.sample_identifier, "POST /api/v1/samples");
    let created = state.sample_service.create(details).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/v1/samples",
    tag = "Samples",
    params(PageParams),
    responses(
        (status = 200, description = "Page of samples", body = SamplePage),
        (status = 400, description = "Invalid paging or sort parameters", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn list_samples_handler(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<SamplePage>, ApiError> {
    let Query(params) = params?;
    let request = page_request(params)?;
    info!(page = request.page, size = request.size, "GET /api/v1/samples");
    Ok(Json(state.sample_service.list(request).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/samples/{id}",
    tag = "Samples",
    params(
        ("id" = Uuid, Path, description = "Server-assigned sample id")
    ),
    responses(
        (status = 200, description = "Sample found", body = SampleResponse),
        (status = 400, description = "Malformed id", body = ApiResponse),
        (status = 404, description = "Sample not found", body = ApiResponse)
    )
)]
pub async fn get_sample_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<SampleResponse>, ApiError> {
    let Path(id) = id?;
    info!(%id, "GET /api/v1/samples/{{id}}");
    Ok(Json(state.sample_service.get(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/samples/{id}",
    tag = "Samples",
    params(
        ("id" = Uuid, Path, description = "Server-assigned sample id")
    ),
    request_body = SampleRequest,
    responses(
        (status = 200, description = "Sample replaced", body = SampleResponse),
        (status = 400, description = "Validation failed or duplicate sample identifier", body = ApiResponse),
        (status = 404, description = "Sample not found", body = ApiResponse)
    )
)]
pub async fn update_sample_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> Result<Json<SampleResponse>, ApiError> {
    let Path(id) = id?;
    let details = validated_details(body)?;
    info!(%id, "PUT /api/v1/samples/{{id}}");
    Ok(Json(state.sample_service.update(id, details).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/samples/{id}",
    tag = "Samples",
    params(
        ("id" = Uuid, Path, description = "Server-assigned sample id")
    ),
    responses(
        (status = 204, description = "Sample deleted"),
        (status = 400, description = "Malformed id", body = ApiResponse),
        (status = 404, description = "Sample not found", body = ApiResponse)
    )
)]
pub async fn delete_sample_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    info!(%id, "DELETE /api/v1/samples/{{id}}");
    state.sample_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
