//! DTOs and input adapters for the ingest endpoint
//!
//! The endpoint takes url-encoded form fields, multipart form fields or a JSON
//! body. All of them are decoded into the domain's raw [`QueryForm`];
//! validation happens afterwards.

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    Form, Json,
};
use repodigest_domain::ingestion::{PatternType, QueryForm};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

/// JSON request body for the ingest endpoint
///
/// Unlike form fields, JSON clients may send `null` for the optional fields.
#[derive(Debug, Deserialize, ToSchema)]
pub struct IngestJsonBody {
    /// Git repository URL or slug to ingest
    #[schema(example = "https://github.com/octocat/hello-world")]
    pub input_text: String,
    /// File size slider position (0-500)
    #[schema(example = 243)]
    pub max_file_size: i64,
    /// `include` or `exclude`, defaults to `exclude`
    #[serde(default)]
    pub pattern_type: Option<String>,
    /// Glob/regex pattern, defaults to empty
    #[serde(default)]
    pub pattern: Option<String>,
    /// Personal access token for private repositories
    #[serde(default)]
    pub token: Option<String>,
}

impl From<IngestJsonBody> for QueryForm {
    fn from(body: IngestJsonBody) -> Self {
        QueryForm {
            input_text: body.input_text,
            max_file_size: body.max_file_size,
            pattern_type: body
                .pattern_type
                .unwrap_or_else(|| PatternType::default().to_string()),
            pattern: body.pattern.unwrap_or_default(),
            token: body.token,
        }
    }
}

/// Error response body for failures outside the ingestion flow
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error description
    #[schema(example = "Rate limit exceeded: 10 per 1 minute")]
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Health check response body
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
}

/// Raw ingest fields, from a url-encoded form, a multipart form or a JSON body
/// depending on `Content-Type`
#[derive(Debug)]
pub struct IngestPayload(pub QueryForm);

type PayloadRejection = (StatusCode, Json<ErrorResponse>);

fn reject(status: StatusCode, message: impl Into<String>) -> PayloadRejection {
    (status, Json(ErrorResponse::new(message)))
}

/// Body encodings accepted by the ingest endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Multipart,
    UrlEncoded,
}

fn body_kind(headers: &HeaderMap) -> BodyKind {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim_start().to_ascii_lowercase())
        .unwrap_or_default();

    if content_type.starts_with("application/json") {
        BodyKind::Json
    } else if content_type.starts_with("multipart/form-data") {
        BodyKind::Multipart
    } else {
        BodyKind::UrlEncoded
    }
}

/// Collect the ingest fields of a multipart body, with the same defaults as
/// the url-encoded form
async fn form_from_multipart(mut multipart: Multipart) -> Result<QueryForm, PayloadRejection> {
    let mut input_text = None;
    let mut max_file_size = None;
    let mut pattern_type = None;
    let mut pattern = None;
    let mut token = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| reject(e.status(), e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let value = field
            .text()
            .await
            .map_err(|e| reject(e.status(), e.body_text()))?;

        match name.as_str() {
            "input_text" => input_text = Some(value),
            "max_file_size" => max_file_size = Some(value),
            "pattern_type" => pattern_type = Some(value),
            "pattern" => pattern = Some(value),
            "token" => token = Some(value),
            _ => debug!(field = %name, "Ignoring unknown multipart field"),
        }
    }

    let missing = |field: &str| {
        reject(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("Failed to deserialize form body: missing field `{}`", field),
        )
    };
    let input_text = input_text.ok_or_else(|| missing("input_text"))?;
    let max_file_size = max_file_size
        .ok_or_else(|| missing("max_file_size"))?
        .trim()
        .parse::<i64>()
        .map_err(|e| {
            reject(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Failed to deserialize form body: max_file_size: {}", e),
            )
        })?;

    Ok(QueryForm {
        input_text,
        max_file_size,
        pattern_type: pattern_type.unwrap_or_else(|| PatternType::default().to_string()),
        pattern: pattern.unwrap_or_default(),
        token,
    })
}

#[async_trait]
impl<S> FromRequest<S> for IngestPayload
where
    S: Send + Sync,
{
    type Rejection = PayloadRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match body_kind(req.headers()) {
            BodyKind::Json => {
                let Json(body) = Json::<IngestJsonBody>::from_request(req, state)
                    .await
                    .map_err(|rejection| reject(rejection.status(), rejection.body_text()))?;
                Ok(Self(body.into()))
            }
            BodyKind::Multipart => {
                let multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|rejection| reject(rejection.status(), rejection.body_text()))?;
                Ok(Self(form_from_multipart(multipart).await?))
            }
            BodyKind::UrlEncoded => {
                let Form(form) = Form::<QueryForm>::from_request(req, state)
                    .await
                    .map_err(|rejection| reject(rejection.status(), rejection.body_text()))?;
                Ok(Self(form))
            }
        }
    }
}

/// Encode fields as a `multipart/form-data` body delimited by `boundary`
#[cfg(test)]
pub(crate) fn multipart_body(boundary: &str, fields: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            boundary, name, value
        ));
    }
    body.push_str(&format!("--{}--\r\n", boundary));
    body
}
