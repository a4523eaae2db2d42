//! HTTP Query Processor Implementation
//!
//! This module implements the `QueryProcessor` port by forwarding queries to a
//! remote query processing service. The service does the cloning, walking and
//! filtering; this adapter only moves JSON and converts failures to domain
//! errors.

use std::time::Duration;

use repodigest_domain::{
    ingestion::{IngestQuery, ProcessingError, QueryContext},
    ports::QueryProcessor,
};
use reqwest::{Client, Url};
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::error::{AdapterError, Result};

/// Path of the query endpoint, relative to the base URL
const QUERY_PATH: &str = "api/query";

/// Longest upstream error body kept in error messages
const MAX_ERROR_BODY_CHARS: usize = 512;

/// HTTP-based implementation of the QueryProcessor port
///
/// Each query is POSTed as JSON to `{base_url}/api/query`. The answer is the
/// processor's flat result mapping.
///
/// ## Error Handling
///
/// - Connection failures and timeouts become `ProcessingError::Transport`
/// - Non-2xx answers become `ProcessingError::Upstream`
/// - Bodies that are not a valid result become `ProcessingError::MalformedResult`
#[derive(Clone)]
pub struct HttpQueryProcessor {
    client: Client,
    endpoint: Url,
}

impl HttpQueryProcessor {
    /// Create a new HTTP query processor
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the query processing service
    /// * `timeout` - Upper bound for a whole query, including the clone
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use std::time::Duration;
    /// use repodigest_http::HttpQueryProcessor;
    ///
    /// let processor = HttpQueryProcessor::new("http://127.0.0.1:8001", Duration::from_secs(300))
    ///     .expect("valid processor URL");
    /// ```
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Self::with_client(client, base_url)
    }

    /// Create a processor around an existing client
    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let endpoint = Self::endpoint_for(base_url)?;
        info!(endpoint = %endpoint, "Initializing HttpQueryProcessor");
        Ok(Self { client, endpoint })
    }

    /// Get the query endpoint URL
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn endpoint_for(base_url: &str) -> Result<Url> {
        let mut base =
            Url::parse(base_url).map_err(|e| AdapterError::invalid_base_url(base_url, e.to_string()))?;

        if !matches!(base.scheme(), "http" | "https") {
            return Err(AdapterError::invalid_base_url(
                base_url,
                format!("unsupported scheme '{}'", base.scheme()),
            ));
        }

        // Keep any path prefix when joining
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        base.join(QUERY_PATH)
            .map_err(|e| AdapterError::invalid_base_url(base_url, e.to_string()))
    }
}

fn truncate(body: &str) -> String {
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        body.to_string()
    } else {
        let mut short: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        short.push('…');
        short
    }
}

impl QueryProcessor for HttpQueryProcessor {
    fn process_query(
        &self,
        query: IngestQuery,
    ) -> impl std::future::Future<Output = std::result::Result<QueryContext, ProcessingError>> + Send
    {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let span = info_span!(
            "process_query",
            input_text = %query.input_text,
            slider_position = query.slider_position,
            pattern_type = %query.pattern_type,
        );

        async move {
            debug!(endpoint = %endpoint, "Forwarding query to processor");

            let response = match client.post(endpoint.clone()).json(&query).send().await {
                Ok(response) => response,
                Err(err) => {
                    error!(error = ?err, "Query processor request failed");
                    return Err(ProcessingError::transport(err.to_string()));
                }
            };

            let status = response.status();
            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    error!(status = %status, error = ?err, "Failed to read query processor body");
                    return Err(ProcessingError::transport(err.to_string()));
                }
            };

            if !status.is_success() {
                warn!(status = %status, "Query processor returned an error status");
                return Err(ProcessingError::upstream(status.as_u16(), truncate(&body)));
            }

            let context: QueryContext = serde_json::from_str(&body).map_err(|err| {
                error!(error = %err, "Query processor returned a malformed result");
                ProcessingError::malformed_result(err.to_string())
            })?;

            match &context {
                QueryContext::Failure(failure) => {
                    info!(error = %failure.error, "Query processor reported a failure")
                }
                QueryContext::Success(success) => {
                    info!(repo = %success.short_repo_url, "Query processed successfully")
                }
            }

            Ok(context)
        }
        .instrument(span)
    }
}
