//! Digest API - Repository ingestion service
//!
//! HTTP front of RepoDigest: validates ingest requests, forwards them to the
//! query processor and shapes its answers into JSON responses.

mod config;
mod dto;
mod handlers;
mod middleware;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use repodigest_domain::{ingestion::IngestionService, ports::QueryProcessor};
use repodigest_http::HttpQueryProcessor;
use repodigest_ratelimit::{RateLimiter, SlidingWindowLimiter};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use config::{ApiConfig, LogFormat};
use middleware::AllowedHosts;

/// Application state shared across handlers
pub struct AppState<P> {
    pub ingestion_service: Arc<IngestionService<P>>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub allowed_hosts: Arc<AllowedHosts>,
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            ingestion_service: Arc::clone(&self.ingestion_service),
            rate_limiter: Arc::clone(&self.rate_limiter),
            allowed_hosts: Arc::clone(&self.allowed_hosts),
        }
    }
}

impl<P: QueryProcessor> AppState<P> {
    pub fn new(
        processor: P,
        rate_limiter: Arc<dyn RateLimiter>,
        allowed_hosts: AllowedHosts,
    ) -> Self {
        Self {
            ingestion_service: Arc::new(IngestionService::new(processor)),
            rate_limiter,
            allowed_hosts: Arc::new(allowed_hosts),
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Text => subscriber.init(),
    }
}

/// Periodically forget clients whose requests have all left the window
fn spawn_limiter_purge(limiter: Arc<SlidingWindowLimiter>) {
    let period = limiter.policy().window();

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let forgotten = limiter.purge();
            if forgotten > 0 {
                debug!(
                    forgotten,
                    tracked = limiter.tracked_clients(),
                    "Purged idle rate limit entries"
                );
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env()?;

    // Initialize tracing
    init_tracing(config.log_format);

    info!("Starting Digest API service");

    let processor = HttpQueryProcessor::new(&config.processor_url, config.processor_timeout)?;

    info!(rate_limit = %config.rate_limit, "Initializing ingest rate limiter");
    let limiter = Arc::new(SlidingWindowLimiter::new(config.rate_limit));
    spawn_limiter_purge(Arc::clone(&limiter));

    info!(allowed_hosts = ?config.allowed_hosts, "Restricting accepted Host headers");

    // Create shared application state
    let state = AppState::new(
        processor,
        limiter,
        AllowedHosts::new(&config.allowed_hosts),
    );

    // Build HTTP router
    let app = routes::create_router(state);

    let addr = config.bind_addr();
    info!(addr = %addr, "Starting HTTP server");

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}
