//! Ingest request models
//!
//! A request arrives as a raw [`QueryForm`] (from form fields or a JSON body),
//! is validated into an [`IngestRequest`], and is handed to the query
//! processor as an [`IngestQuery`].

use serde::{Deserialize, Serialize};

use crate::ingestion::{
    error::{ValidationError, Violation},
    pattern::PatternType,
};

/// Lowest accepted file size slider position
pub const MIN_FILE_SIZE_POSITION: i64 = 0;

/// Highest accepted file size slider position
pub const MAX_FILE_SIZE_POSITION: i64 = 500;

fn default_pattern_type() -> String {
    PatternType::default().as_str().to_string()
}

/// Raw, unvalidated ingest fields as submitted by the client
///
/// Nothing is trimmed or coerced here: `pattern_type` stays a plain string
/// and `max_file_size` may be out of range. Error responses echo these values
/// back so the client can restore its form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct QueryForm {
    /// Git repository URL or slug to ingest
    #[cfg_attr(feature = "openapi", schema(example = "https://github.com/octocat/hello-world"))]
    pub input_text: String,

    /// File size slider position (0-500)
    #[cfg_attr(feature = "openapi", schema(example = 243))]
    pub max_file_size: i64,

    /// `include` or `exclude`
    #[serde(default = "default_pattern_type")]
    #[cfg_attr(feature = "openapi", schema(example = "exclude"))]
    pub pattern_type: String,

    /// Glob/regex pattern for file filtering
    #[serde(default)]
    pub pattern: String,

    /// Personal access token for private repositories
    #[serde(default)]
    pub token: Option<String>,
}

impl QueryForm {
    /// Create a form with the default pattern settings and no token
    pub fn new(input_text: impl Into<String>, max_file_size: i64) -> Self {
        Self {
            input_text: input_text.into(),
            max_file_size,
            pattern_type: default_pattern_type(),
            pattern: String::new(),
            token: None,
        }
    }

    pub fn with_pattern(mut self, pattern_type: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.pattern_type = pattern_type.into();
        self.pattern = pattern.into();
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }
}

/// A validated and normalized ingest request
///
/// Invariants:
/// - `input_text` is trimmed and never empty
/// - `max_file_size` lies within
///   [`MIN_FILE_SIZE_POSITION`]..=[`MAX_FILE_SIZE_POSITION`]
/// - `pattern` is trimmed (possibly empty)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestRequest {
    input_text: String,
    max_file_size: u16,
    pattern_type: PatternType,
    pattern: String,
    token: Option<String>,
}

impl IngestRequest {
    /// Validate a raw form
    ///
    /// Every field is checked independently; the error lists all violations.
    pub fn validate(form: &QueryForm) -> Result<Self, ValidationError> {
        let mut violations = Vec::new();

        let input_text = form.input_text.trim();
        if input_text.is_empty() {
            violations.push(Violation::EmptyInput);
        }

        let max_file_size = if (MIN_FILE_SIZE_POSITION..=MAX_FILE_SIZE_POSITION)
            .contains(&form.max_file_size)
        {
            Some(form.max_file_size as u16)
        } else {
            violations.push(Violation::out_of_range(
                "max_file_size",
                form.max_file_size,
                MIN_FILE_SIZE_POSITION,
                MAX_FILE_SIZE_POSITION,
            ));
            None
        };

        let pattern_type = match form.pattern_type.parse::<PatternType>() {
            Ok(pattern_type) => Some(pattern_type),
            Err(err) => {
                violations.push(err.into());
                None
            }
        };

        match (max_file_size, pattern_type) {
            (Some(max_file_size), Some(pattern_type)) if violations.is_empty() => Ok(Self {
                input_text: input_text.to_string(),
                max_file_size,
                pattern_type,
                pattern: form.pattern.trim().to_string(),
                token: form.token.clone(),
            }),
            _ => Err(ValidationError::new(violations)),
        }
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn max_file_size(&self) -> u16 {
        self.max_file_size
    }

    pub fn pattern_type(&self) -> PatternType {
        self.pattern_type
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Build the processor query for an index-style ingestion
    pub fn into_query(self) -> IngestQuery {
        IngestQuery {
            input_text: self.input_text,
            slider_position: self.max_file_size,
            pattern_type: self.pattern_type,
            pattern: self.pattern,
            is_index: true,
            token: self.token,
        }
    }
}

/// Arguments passed to the query processor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestQuery {
    pub input_text: String,
    pub slider_position: u16,
    pub pattern_type: PatternType,
    pub pattern: String,
    /// Marks the query as coming from the index page flow
    pub is_index: bool,
    pub token: Option<String>,
}
