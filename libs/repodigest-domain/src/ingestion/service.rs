//! Ingestion service - Business logic orchestration
//!
//! Validates a raw form, delegates to the query processor and shapes the
//! processor's answer into one of the two response bodies.

use super::{
    context::QueryContext,
    request::{IngestRequest, QueryForm},
    response::{IngestErrorResponse, IngestResponse, IngestSuccessResponse},
};
use crate::ports::QueryProcessor;

/// Prefix of errors raised while validating the request
pub const VALIDATION_ERROR_PREFIX: &str = "Validation error: ";

/// Prefix of errors raised by the processor itself
pub const INTERNAL_ERROR_PREFIX: &str = "Internal server error: ";

/// Terminal state of a single ingestion
///
/// ```text
/// Received -> Validating -> ValidationFailed
///                        -> Delegating -> ProcessingFailed
///                                      -> Succeeded
///                                      -> InternalError
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The form broke at least one field constraint (400)
    ValidationFailed(IngestErrorResponse),
    /// The processor reported a domain error (400)
    ProcessingFailed(IngestErrorResponse),
    /// The repository was ingested (200)
    Succeeded(IngestSuccessResponse),
    /// The processor itself failed (500)
    InternalError(IngestErrorResponse),
}

impl IngestOutcome {
    /// HTTP status code for this outcome
    pub fn status_code(&self) -> u16 {
        match self {
            IngestOutcome::Succeeded(_) => 200,
            IngestOutcome::ValidationFailed(_) | IngestOutcome::ProcessingFailed(_) => 400,
            IngestOutcome::InternalError(_) => 500,
        }
    }

    pub fn into_response(self) -> IngestResponse {
        match self {
            IngestOutcome::Succeeded(success) => success.into(),
            IngestOutcome::ValidationFailed(error)
            | IngestOutcome::ProcessingFailed(error)
            | IngestOutcome::InternalError(error) => error.into(),
        }
    }
}

/// Error body echoing the caller's raw form values
fn echo_form(form: QueryForm, error: String) -> IngestErrorResponse {
    IngestErrorResponse {
        error,
        repo_url: form.input_text,
        default_file_size: form.max_file_size,
        pattern_type: form.pattern_type,
        pattern: form.pattern,
        token: form.token,
    }
}

/// Service handling `/api/ingest` requests
///
/// Generic over the [`QueryProcessor`] port; each request owns its own
/// values, so a single service is shared by all in-flight requests.
pub struct IngestionService<P> {
    processor: P,
}

impl<P> IngestionService<P>
where
    P: QueryProcessor,
{
    /// Create a new IngestionService around a query processor
    pub fn new(processor: P) -> Self {
        Self { processor }
    }

    /// Ingest a repository described by a raw form
    ///
    /// 1. Validates the form; on failure the processor is never called
    /// 2. Awaits the processor with the normalized query
    /// 3. Maps a reported failure, a success, or a processor error to the
    ///    matching [`IngestOutcome`]
    ///
    /// Error bodies echo the raw form values. For reported failures the
    /// processor's own echoes win where it provides them, except `token`,
    /// which is always the caller's.
    pub async fn ingest(&self, form: QueryForm) -> IngestOutcome {
        let request = match IngestRequest::validate(&form) {
            Ok(request) => request,
            Err(err) => {
                return IngestOutcome::ValidationFailed(echo_form(
                    form,
                    format!("{}{}", VALIDATION_ERROR_PREFIX, err),
                ));
            }
        };

        match self.processor.process_query(request.into_query()).await {
            Ok(QueryContext::Failure(failure)) => {
                IngestOutcome::ProcessingFailed(IngestErrorResponse {
                    error: failure.error,
                    repo_url: failure.repo_url.unwrap_or(form.input_text),
                    default_file_size: failure.default_file_size.unwrap_or(form.max_file_size),
                    pattern_type: failure.pattern_type.unwrap_or(form.pattern_type),
                    pattern: failure.pattern.unwrap_or(form.pattern),
                    token: form.token,
                })
            }
            Ok(QueryContext::Success(success)) => IngestOutcome::Succeeded(success.into()),
            Err(err) => IngestOutcome::InternalError(echo_form(
                form,
                format!("{}{}", INTERNAL_ERROR_PREFIX, err),
            )),
        }
    }

    /// Get the underlying query processor
    pub fn processor(&self) -> &P {
        &self.processor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::{
        context::{QueryFailure, QuerySuccess},
        error::ProcessingError,
        pattern::PatternType,
        request::IngestQuery,
    };
    use std::future::Future;
    use std::sync::{Arc, Mutex};

    // Processor answering every query with the same canned reply
    struct StubProcessor {
        reply: Result<QueryContext, String>,
        queries: Arc<Mutex<Vec<IngestQuery>>>,
    }

    impl StubProcessor {
        fn replying(reply: Result<QueryContext, String>) -> Self {
            Self {
                reply,
                queries: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn calls(&self) -> Vec<IngestQuery> {
            self.queries.lock().unwrap().clone()
        }
    }

    impl QueryProcessor for StubProcessor {
        fn process_query(
            &self,
            query: IngestQuery,
        ) -> impl Future<Output = Result<QueryContext, ProcessingError>> + Send {
            self.queries.lock().unwrap().push(query);
            let reply = self.reply.clone().map_err(ProcessingError::internal);

            async move { reply }
        }
    }

    fn success_context() -> QueryContext {
        QuerySuccess {
            repo_url: "https://github.com/a/b".into(),
            short_repo_url: "a/b".into(),
            summary: "Files analyzed: 2".into(),
            tree: "b/\n├── README.md\n└── src/".into(),
            content: "# b".into(),
            default_file_size: 243,
            pattern_type: "exclude".into(),
            pattern: "*.md".into(),
            token: None,
        }
        .into()
    }

    #[tokio::test]
    async fn test_ingest_success() {
        let service = IngestionService::new(StubProcessor::replying(Ok(success_context())));
        let form = QueryForm::new("https://github.com/a/b", 243).with_pattern("exclude", "*.md");

        let outcome = service.ingest(form).await;

        assert_eq!(outcome.status_code(), 200);
        match outcome {
            IngestOutcome::Succeeded(response) => {
                assert!(response.result());
                assert_eq!(response.repo_url, "https://github.com/a/b");
                assert_eq!(response.short_repo_url, "a/b");
                assert_eq!(response.pattern, "*.md");
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_processor_receives_normalized_query() {
        let service = IngestionService::new(StubProcessor::replying(Ok(success_context())));
        let form = QueryForm::new("  a/b  ", 100)
            .with_pattern("include", " src/ ")
            .with_token(Some("ghp_token".into()));

        service.ingest(form).await;

        let calls = service.processor().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].input_text, "a/b");
        assert_eq!(calls[0].slider_position, 100);
        assert_eq!(calls[0].pattern_type, PatternType::Include);
        assert_eq!(calls[0].pattern, "src/");
        assert!(calls[0].is_index);
        assert_eq!(calls[0].token.as_deref(), Some("ghp_token"));
    }

    #[tokio::test]
    async fn test_validation_failure_skips_processor() {
        let service = IngestionService::new(StubProcessor::replying(Ok(success_context())));

        let outcome = service.ingest(QueryForm::new("", 243)).await;

        assert_eq!(outcome.status_code(), 400);
        assert!(service.processor().calls().is_empty());
        match outcome {
            IngestOutcome::ValidationFailed(response) => {
                assert!(response.error.starts_with("Validation error: "));
                assert_eq!(response.repo_url, "");
                assert_eq!(response.default_file_size, 243);
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_validation_failure_echoes_raw_values() {
        let service = IngestionService::new(StubProcessor::replying(Ok(success_context())));
        let form = QueryForm::new(" a/b ", 900)
            .with_pattern("sometimes", " *.rs ")
            .with_token(Some(String::new()));

        let outcome = service.ingest(form).await;

        match outcome {
            IngestOutcome::ValidationFailed(response) => {
                assert_eq!(response.repo_url, " a/b ");
                assert_eq!(response.default_file_size, 900);
                assert_eq!(response.pattern_type, "sometimes");
                assert_eq!(response.pattern, " *.rs ");
                assert_eq!(response.token.as_deref(), Some(""));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_reported_failure_is_bad_request() {
        let failure = QueryFailure {
            error: "Invalid repository URL 'a/'".into(),
            repo_url: Some("a/".into()),
            default_file_size: Some(243),
            pattern_type: Some("exclude".into()),
            pattern: Some(String::new()),
        };
        let service = IngestionService::new(StubProcessor::replying(Ok(failure.into())));

        let outcome = service.ingest(QueryForm::new("a/", 243)).await;

        assert_eq!(outcome.status_code(), 400);
        match outcome {
            IngestOutcome::ProcessingFailed(response) => {
                assert_eq!(response.error, "Invalid repository URL 'a/'");
                assert_eq!(response.repo_url, "a/");
            }
            other => panic!("expected processing failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_reported_failure_falls_back_to_raw_values() {
        let failure = QueryFailure {
            default_file_size: Some(50),
            ..QueryFailure::new("Repository not found")
        };
        let service = IngestionService::new(StubProcessor::replying(Ok(failure.into())));
        let form = QueryForm::new("  ghost/repo ", 120)
            .with_pattern("include", " docs/ ")
            .with_token(Some("ghp_raw".into()));

        let outcome = service.ingest(form).await;

        match outcome {
            IngestOutcome::ProcessingFailed(response) => {
                assert_eq!(response.repo_url, "  ghost/repo ");
                assert_eq!(response.default_file_size, 50);
                assert_eq!(response.pattern_type, "include");
                assert_eq!(response.pattern, " docs/ ");
                assert_eq!(response.token.as_deref(), Some("ghp_raw"));
            }
            other => panic!("expected processing failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_processor_error_is_internal() {
        let service = IngestionService::new(StubProcessor::replying(Err(
            "clone exited with status 128".into(),
        )));

        let outcome = service.ingest(QueryForm::new("a/b", 243)).await;

        assert_eq!(outcome.status_code(), 500);
        match outcome.into_response() {
            IngestResponse::Error(response) => {
                assert_eq!(
                    response.error,
                    "Internal server error: clone exited with status 128"
                );
                assert_eq!(response.repo_url, "a/b");
            }
            other => panic!("expected error response, got {:?}", other),
        }
    }
}
