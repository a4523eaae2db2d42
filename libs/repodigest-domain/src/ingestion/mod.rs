//! Ingestion domain module
//!
//! Request validation, processor results and response shaping for the
//! ingest endpoint.

pub mod context;
pub mod error;
pub mod pattern;
pub mod request;
pub mod response;
pub mod service;

pub use context::{QueryContext, QueryFailure, QuerySuccess};
pub use error::{InvalidPatternType, ProcessingError, Result, ValidationError, Violation};
pub use pattern::PatternType;
pub use request::{IngestQuery, IngestRequest, QueryForm};
pub use response::{IngestErrorResponse, IngestResponse, IngestSuccessResponse};
pub use service::{IngestOutcome, IngestionService, INTERNAL_ERROR_PREFIX, VALIDATION_ERROR_PREFIX};
