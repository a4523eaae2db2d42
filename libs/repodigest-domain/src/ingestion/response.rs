//! Response bodies of the ingest endpoint
//!
//! A response is exactly one of [`IngestSuccessResponse`] or
//! [`IngestErrorResponse`]. [`IngestResponse`] serializes untagged, so only
//! the active variant's fields appear on the wire.

use serde::{Serialize, Serializer};

use crate::ingestion::context::QuerySuccess;

/// Serializes the success discriminator, which is always `true`
fn serialize_true<S: Serializer>(_: &(), serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_bool(true)
}

/// Body of a successful ingestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct IngestSuccessResponse {
    /// Always `true`
    #[serde(serialize_with = "serialize_true")]
    #[cfg_attr(feature = "openapi", schema(value_type = bool, example = true))]
    result: (),
    /// Original repository URL
    pub repo_url: String,
    /// Short repository URL (user/repo)
    pub short_repo_url: String,
    /// Ingestion summary with token estimates
    pub summary: String,
    /// File tree structure
    pub tree: String,
    /// Processed file content
    pub content: String,
    /// File size slider position used
    pub default_file_size: i64,
    /// Pattern type used
    pub pattern_type: String,
    /// Pattern used
    pub pattern: String,
    /// Token used, if any
    pub token: Option<String>,
}

impl IngestSuccessResponse {
    pub fn result(&self) -> bool {
        true
    }
}

impl From<QuerySuccess> for IngestSuccessResponse {
    fn from(success: QuerySuccess) -> Self {
        Self {
            result: (),
            repo_url: success.repo_url,
            short_repo_url: success.short_repo_url,
            summary: success.summary,
            tree: success.tree,
            content: success.content,
            default_file_size: success.default_file_size,
            pattern_type: success.pattern_type,
            pattern: success.pattern,
            token: success.token,
        }
    }
}

/// Body of a failed ingestion, echoing the filter parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct IngestErrorResponse {
    /// Error message
    #[cfg_attr(feature = "openapi", schema(example = "Invalid repository URL 'octocat/'"))]
    pub error: String,
    /// Repository URL that failed
    pub repo_url: String,
    /// File size slider position used
    pub default_file_size: i64,
    /// Pattern type used
    pub pattern_type: String,
    /// Pattern used
    pub pattern: String,
    /// Token used, if any
    pub token: Option<String>,
}

/// Either response shape, serialized without a tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum IngestResponse {
    Success(IngestSuccessResponse),
    Error(IngestErrorResponse),
}

impl From<IngestSuccessResponse> for IngestResponse {
    fn from(response: IngestSuccessResponse) -> Self {
        IngestResponse::Success(response)
    }
}

impl From<IngestErrorResponse> for IngestResponse {
    fn from(response: IngestErrorResponse) -> Self {
        IngestResponse::Error(response)
    }
}
