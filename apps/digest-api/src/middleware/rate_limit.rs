//! Rate limit gate for expensive routes

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::RETRY_AFTER, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use repodigest_ratelimit::{Admission, RateLimiter};
use tracing::{debug, warn};

use crate::dto::ingestion::ErrorResponse;

/// Key used when the peer address is unknown
const UNKNOWN_CLIENT: &str = "unknown";

/// Identify the client by its peer IP address
fn client_key(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Whole seconds, rounded up, never zero
fn retry_after_secs(retry_after: Duration) -> u64 {
    let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
    secs.max(1)
}

/// Reject requests from clients over their budget with 429
pub async fn enforce_rate_limit(
    State(limiter): State<Arc<dyn RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_key(&request);

    match limiter.check(&client) {
        Admission::Allowed { remaining } => {
            debug!(client = %client, remaining, "Request admitted");
            next.run(request).await
        }
        Admission::Denied { retry_after } => {
            let secs = retry_after_secs(retry_after);
            warn!(client = %client, retry_after_secs = secs, "Rate limit exceeded");

            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(ErrorResponse::new(format!(
                    "Rate limit exceeded: {}",
                    limiter.policy()
                ))),
            )
                .into_response();
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(secs));
            response
        }
    }
}
