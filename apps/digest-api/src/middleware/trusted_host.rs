//! Host header allow-list

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::HOST, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use crate::dto::ingestion::ErrorResponse;

/// Host names the server answers for
///
/// A pattern is an exact host name, `*.example.com` for any subdomain of
/// `example.com` (but not `example.com` itself), or `*` for every host.
#[derive(Debug, Clone)]
pub struct AllowedHosts {
    patterns: Vec<String>,
}

impl AllowedHosts {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| p.as_ref().trim().to_ascii_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn allows(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        self.patterns.iter().any(|pattern| {
            if pattern == "*" {
                true
            } else if let Some(suffix) = pattern.strip_prefix('*') {
                host.ends_with(suffix)
            } else {
                *pattern == host
            }
        })
    }
}

/// Host header value without its port
fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        // IPv6 literal, e.g. [::1]:8000
        match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        }
    } else {
        host.split(':').next().unwrap_or(host)
    }
}

/// Reject requests whose `Host` header is not allowed with 400
pub async fn enforce_trusted_host(
    State(hosts): State<Arc<AllowedHosts>>,
    request: Request,
    next: Next,
) -> Response {
    let host = request
        .headers()
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .map(strip_port)
        .unwrap_or("");

    if hosts.allows(host) {
        next.run(request).await
    } else {
        warn!(host = %host, "Rejected request for untrusted host");
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Invalid host header")),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_hosts() {
        let hosts = AllowedHosts::new(["localhost", "127.0.0.1"]);

        assert!(hosts.allows("localhost"));
        assert!(hosts.allows("LOCALHOST"));
        assert!(hosts.allows("127.0.0.1"));
        assert!(!hosts.allows("evil.example"));
        assert!(!hosts.allows(""));
    }

    #[test]
    fn test_wildcard_matches_subdomains_only() {
        let hosts = AllowedHosts::new(["*.digest.dev"]);

        assert!(hosts.allows("api.digest.dev"));
        assert!(hosts.allows("a.b.digest.dev"));
        assert!(!hosts.allows("digest.dev"));
        assert!(!hosts.allows("notdigest.dev"));
    }

    #[test]
    fn test_any_host() {
        assert!(AllowedHosts::new(["*"]).allows("whatever.example"));
    }

    #[test]
    fn test_strip_port() {
        assert_eq!(strip_port("localhost:8000"), "localhost");
        assert_eq!(strip_port("localhost"), "localhost");
        assert_eq!(strip_port("[::1]:8000"), "[::1]");
    }
}
