//! `GET /` and static frontend serving.

use crate::transport::http::error::ApiError;
use crate::transport::http::types::{ApiEndpoints, ApiInfoResponse, AppState, SERVICE_NAME};
use axum::extract::{Request, State};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use std::io::ErrorKind;
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};
use tracing::{debug, warn};

const INDEX_FILE: &str = "index.html";

#[utoipa::path(
    get,
    path = "/",
    tag = "Root",
    responses(
        (status = 200, description = "Frontend index.html, or API information when no frontend is built", body = ApiInfoResponse)
    )
)]
pub async fn root_handler(State(state): State<AppState>) -> Response {
    debug!("root endpoint accessed");

    if let Some(dir) = &state.static_dir {
        let index = dir.join(INDEX_FILE);
        match tokio::fs::read_to_string(&index).await {
            Ok(html) => {
                debug!(path = %index.display(), "serving frontend index.html");
                return Html(html).into_response();
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %index.display(), "frontend not found, serving API info instead");
            }
            Err(e) => {
                warn!(path = %index.display(), error = %e, "error reading index.html");
            }
        }
    }

    Json(api_info()).into_response()
}

pub fn api_info() -> ApiInfoResponse {
    ApiInfoResponse {
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        status: "UP".to_string(),
        endpoints: ApiEndpoints {
            health: "/healthcheck".to_string(),
            samples: "/api/v1/samples".to_string(),
            api_docs: "/swagger-ui".to_string(),
        },
        note: "Frontend not built. Place the frontend build in STATIC_DIR to serve it from /."
            .to_string(),
    }
}

/// Fallback for every unmatched route.
///
/// API paths get a JSON 404. Anything else is looked up in the static
/// directory, falling back to `index.html` so client-side routes resolve.
pub async fn static_fallback_handler(State(state): State<AppState>, req: Request) -> Response {
    let path = req.uri().path().to_string();
    if path == "/api" || path.starts_with("/api/") {
        return ApiError::NotFound(format!("No route for {}", path)).into_response();
    }

    let Some(dir) = state.static_dir.as_ref().filter(|d| d.is_dir()) else {
        return ApiError::NotFound(format!("No route for {}", path)).into_response();
    };

    let serve = ServeDir::new(dir).fallback(ServeFile::new(dir.join(INDEX_FILE)));
    match serve.oneshot(req).await {
        Ok(res) => res.into_response(),
        Err(never) => match never {},
    }
}
