use crate::app::dto::{SamplePage, SampleRequest, SampleResponse};
use crate::domain::sample::{FieldError, SampleType};
use crate::transport::http::handlers::{health, root, samples};
use crate::transport::http::types::{
    ApiEndpoints, ApiInfoResponse, ApiResponse, AppState, HealthResponse,
};
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Geological Sample Management API"),
    paths(
        health::healthcheck_handler,
        root::root_handler,
        samples::create_sample_handler,
        samples::list_samples_handler,
        samples::get_sample_handler,
        samples::update_sample_handler,
        samples::delete_sample_handler
    ),
    components(schemas(
        ApiResponse,
        ApiInfoResponse,
        ApiEndpoints,
        HealthResponse,
        FieldError,
        SampleType,
        SampleRequest,
        SampleResponse,
        SamplePage
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root::root_handler))
        .route("/healthcheck", get(health::healthcheck_handler))
        .route(
            "/api/v1/samples",
            get(samples::list_samples_handler).post(samples::create_sample_handler),
        )
        .route(
            "/api/v1/samples/:id",
            get(samples::get_sample_handler)
                .put(samples::update_sample_handler)
                .delete(samples::delete_sample_handler),
        )
        .fallback(root::static_fallback_handler)
        .with_state(app_state)
}
