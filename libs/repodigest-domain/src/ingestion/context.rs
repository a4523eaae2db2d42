//! Query processor results
//!
//! The processor answers with a flat mapping. A mapping carrying an `error`
//! key is a [`QueryFailure`], even when its value is `null`; anything else
//! must hold every success field.

use serde::{Deserialize, Deserializer};

/// Error text used when the processor sends `"error": null`
pub const UNDESCRIBED_FAILURE: &str = "Query processor reported an error without a message";

/// A domain-level failure reported by the query processor
///
/// The echoed parameters are optional: when absent, the raw request values
/// are echoed instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFailure {
    pub error: String,
    pub repo_url: Option<String>,
    pub default_file_size: Option<i64>,
    pub pattern_type: Option<String>,
    pub pattern: Option<String>,
}

impl QueryFailure {
    /// A failure with no echoed parameters
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            repo_url: None,
            default_file_size: None,
            pattern_type: None,
            pattern: None,
        }
    }
}

/// A completed ingestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySuccess {
    pub repo_url: String,
    pub short_repo_url: String,
    pub summary: String,
    pub tree: String,
    pub content: String,
    pub default_file_size: i64,
    pub pattern_type: String,
    pub pattern: String,
    pub token: Option<String>,
}

/// Result of [`QueryProcessor::process_query`](crate::ports::QueryProcessor::process_query)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawQueryContext")]
pub enum QueryContext {
    Failure(QueryFailure),
    Success(QuerySuccess),
}

/// Wire shape of a processor result before it is split into a variant
#[derive(Debug, Deserialize)]
struct RawQueryContext {
    /// Outer `None`: no `error` key. Inner `None`: `"error": null`.
    #[serde(default, deserialize_with = "present")]
    error: Option<Option<String>>,
    repo_url: Option<String>,
    short_repo_url: Option<String>,
    summary: Option<String>,
    tree: Option<String>,
    content: Option<String>,
    default_file_size: Option<i64>,
    pattern_type: Option<String>,
    pattern: Option<String>,
    token: Option<String>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, String> {
    value.ok_or_else(|| format!("missing field `{}` in query result", field))
}

impl TryFrom<RawQueryContext> for QueryContext {
    type Error = String;

    fn try_from(raw: RawQueryContext) -> Result<Self, Self::Error> {
        if let Some(error) = raw.error {
            return Ok(QueryContext::Failure(QueryFailure {
                error: error.unwrap_or_else(|| UNDESCRIBED_FAILURE.to_string()),
                repo_url: raw.repo_url,
                default_file_size: raw.default_file_size,
                pattern_type: raw.pattern_type,
                pattern: raw.pattern,
            }));
        }

        Ok(QueryContext::Success(QuerySuccess {
            repo_url: required(raw.repo_url, "repo_url")?,
            short_repo_url: required(raw.short_repo_url, "short_repo_url")?,
            summary: required(raw.summary, "summary")?,
            tree: required(raw.tree, "tree")?,
            content: required(raw.content, "content")?,
            default_file_size: required(raw.default_file_size, "default_file_size")?,
            pattern_type: required(raw.pattern_type, "pattern_type")?,
            pattern: required(raw.pattern, "pattern")?,
            token: raw.token,
        }))
    }
}

impl From<QueryFailure> for QueryContext {
    fn from(failure: QueryFailure) -> Self {
        QueryContext::Failure(failure)
    }
}

impl From<QuerySuccess> for QueryContext {
    fn from(success: QuerySuccess) -> Self {
        QueryContext::Success(success)
    }
}
