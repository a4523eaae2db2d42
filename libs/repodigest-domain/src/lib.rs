//! # RepoDigest Domain Layer
//!
//! This crate contains the request validation and response shaping behind the
//! RepoDigest ingest endpoint. It follows hexagonal architecture principles:
//!
//! - **Entities**: Raw forms, validated requests, processor results, responses
//! - **Ports**: Trait definitions for external dependencies (QueryProcessor)
//! - **Services**: Ingestion orchestration
//!
//! ## Architecture
//!
//! This layer has NO dependencies on infrastructure concerns (HTTP, git,
//! filesystem). Repository processing is expressed as a port implemented by
//! adapter crates.
//!
//! ## Example
//!
//! ```rust
//! use repodigest_domain::ingestion::{IngestionService, QueryForm};
//! use repodigest_domain::ports::QueryProcessor;
//!
//! async fn example<P: QueryProcessor>(service: IngestionService<P>) {
//!     let form = QueryForm::new("https://github.com/octocat/hello-world", 243);
//!     let outcome = service.ingest(form).await;
//!     println!("Ingestion answered with status {}", outcome.status_code());
//! }
//! ```

pub mod ingestion;
pub mod ports;

// Re-export commonly used types
pub use ingestion::{IngestOutcome, IngestResponse, IngestionService, PatternType, QueryForm};
pub use ports::QueryProcessor;
