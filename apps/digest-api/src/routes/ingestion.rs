//! Ingestion routes

use axum::{middleware::from_fn_with_state, routing::post, Router};
use repodigest_domain::ports::QueryProcessor;

use crate::{handlers::ingestion::ingest_handler, middleware::enforce_rate_limit, AppState};

/// Create ingestion routes, gated by the rate limiter
pub fn routes<P>(state: &AppState<P>) -> Router<AppState<P>>
where
    P: QueryProcessor + 'static,
{
    Router::new()
        .route("/api/ingest", post(ingest_handler::<P>))
        .route_layer(from_fn_with_state(
            state.rate_limiter.clone(),
            enforce_rate_limit,
        ))
}
