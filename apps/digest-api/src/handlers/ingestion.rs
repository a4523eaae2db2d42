//! Ingestion handler

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use repodigest_domain::{
    ingestion::{IngestErrorResponse, IngestOutcome, IngestSuccessResponse, QueryForm},
    ports::QueryProcessor,
};
use tracing::{error, info, warn};

use crate::{
    dto::ingestion::{ErrorResponse, IngestPayload},
    AppState,
};

/// Ingest a Git repository and return its processed content
///
/// The repository is cloned, filtered and summarized by the query processor.
/// Every error body echoes the submitted filter parameters.
#[utoipa::path(
    post,
    path = "/api/ingest",
    request_body(
        content = QueryForm,
        description = "Form fields, url-encoded or multipart; a JSON body with the same fields is also accepted",
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 200, description = "Successful ingestion", body = IngestSuccessResponse),
        (status = 400, description = "Bad request or processing error", body = IngestErrorResponse),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = IngestErrorResponse)
    ),
    tag = "ingestion"
)]
pub async fn ingest_handler<P>(
    State(state): State<AppState<P>>,
    IngestPayload(form): IngestPayload,
) -> Response
where
    P: QueryProcessor + 'static,
{
    info!(
        input_text = %form.input_text,
        max_file_size = form.max_file_size,
        pattern_type = %form.pattern_type,
        "Received ingest request"
    );

    let outcome = state.ingestion_service.ingest(form).await;

    match &outcome {
        IngestOutcome::Succeeded(response) => {
            info!(repo = %response.short_repo_url, "Successfully ingested repository");
        }
        IngestOutcome::ValidationFailed(response) => {
            warn!(error = %response.error, "Rejected invalid ingest request");
        }
        IngestOutcome::ProcessingFailed(response) => {
            warn!(error = %response.error, repo_url = %response.repo_url, "Query processor reported an error");
        }
        IngestOutcome::InternalError(response) => {
            error!(error = %response.error, repo_url = %response.repo_url, "Failed to ingest repository");
        }
    }

    let status =
        StatusCode::from_u16(outcome.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(outcome.into_response())).into_response()
}
