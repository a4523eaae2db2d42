//! Ports (trait definitions) for external dependencies
//!
//! The domain defines what it needs from the outside world; adapter crates
//! provide implementations.
//!
//! ## Static Dispatch
//!
//! We use native Rust async traits with `impl Future` return types instead of
//! `async_trait` so services stay generic over their collaborators.

use std::future::Future;

use crate::ingestion::{context::QueryContext, error::ProcessingError, request::IngestQuery};

/// Port for the repository query processor
///
/// The processor clones the repository, walks and filters its files and
/// aggregates their content. All of that is opaque to the domain.
///
/// Implementations must:
/// - Report domain failures (unknown repository, invalid URL, ...) as
///   [`QueryContext::Failure`]
/// - Reserve `Err` for failures of the processor itself
pub trait QueryProcessor: Send + Sync {
    /// Process an ingestion query
    ///
    /// This may take a long time (network I/O, cloning) and must not block
    /// the executor while doing so.
    ///
    /// # Errors
    ///
    /// Returns a [`ProcessingError`] if the processor cannot produce a result
    fn process_query(
        &self,
        query: IngestQuery,
    ) -> impl Future<Output = Result<QueryContext, ProcessingError>> + Send;
}
