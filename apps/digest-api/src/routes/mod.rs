//! API routes

pub mod ingestion;

use axum::{middleware::from_fn_with_state, routing::get, Json, Router};
use repodigest_domain::{
    ingestion::{IngestErrorResponse, IngestSuccessResponse, PatternType, QueryForm},
    ports::QueryProcessor,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    dto::ingestion::{ErrorResponse, HealthResponse, IngestJsonBody},
    handlers,
    middleware::enforce_trusted_host,
    AppState,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::ingestion::ingest_handler,
        health_handler
    ),
    components(
        schemas(
            QueryForm,
            IngestJsonBody,
            PatternType,
            IngestSuccessResponse,
            IngestErrorResponse,
            ErrorResponse,
            HealthResponse
        )
    ),
    tags(
        (name = "ingestion", description = "Repository ingestion endpoints"),
        (name = "health", description = "Health check endpoints")
    ),
    info(
        title = "RepoDigest API",
        version = "0.1.0",
        description = "Turns a Git repository into a prompt-friendly text digest",
        contact(
            name = "RepoDigest Team"
        )
    )
)]
pub struct ApiDoc;

/// Create the main application router
pub fn create_router<P>(state: AppState<P>) -> Router
where
    P: QueryProcessor + 'static,
{
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(ingestion::routes(&state))
        .route("/health", get(health_handler))
        .layer(from_fn_with_state(
            state.allowed_hosts.clone(),
            enforce_trusted_host,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}
