//! Service configuration read from the environment

use std::time::Duration;

use anyhow::{bail, Context, Result};
use repodigest_ratelimit::RatePolicy;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_PROCESSOR_URL: &str = "http://127.0.0.1:8001";
const DEFAULT_PROCESSOR_TIMEOUT_SECS: u64 = 300;
const DEFAULT_RATE_LIMIT: &str = "10/minute";
const DEFAULT_ALLOWED_HOSTS: &[&str] = &["localhost", "127.0.0.1"];

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub processor_url: String,
    pub processor_timeout: Duration,
    pub rate_limit: RatePolicy,
    pub allowed_hosts: Vec<String>,
    pub log_format: LogFormat,
}

impl ApiConfig {
    /// Read the configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("API_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("API_PORT") {
            Some(port) => port
                .trim()
                .parse::<u16>()
                .with_context(|| format!("API_PORT must be a port number, got '{}'", port))?,
            None => DEFAULT_PORT,
        };

        let processor_url =
            lookup("QUERY_PROCESSOR_URL").unwrap_or_else(|| DEFAULT_PROCESSOR_URL.to_string());

        let timeout_secs = match lookup("QUERY_PROCESSOR_TIMEOUT_SECS") {
            Some(secs) => secs.trim().parse::<u64>().with_context(|| {
                format!("QUERY_PROCESSOR_TIMEOUT_SECS must be a number of seconds, got '{}'", secs)
            })?,
            None => DEFAULT_PROCESSOR_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            bail!("QUERY_PROCESSOR_TIMEOUT_SECS must be positive");
        }

        let rate_limit = lookup("INGEST_RATE_LIMIT")
            .unwrap_or_else(|| DEFAULT_RATE_LIMIT.to_string())
            .parse::<RatePolicy>()
            .context("INGEST_RATE_LIMIT is invalid")?;

        let allowed_hosts = match lookup("ALLOWED_HOSTS") {
            Some(hosts) => hosts
                .split(',')
                .map(str::trim)
                .filter(|h| !h.is_empty())
                .map(String::from)
                .collect(),
            None => DEFAULT_ALLOWED_HOSTS.iter().map(|h| h.to_string()).collect(),
        };

        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("") | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => bail!("LOG_FORMAT must be 'text' or 'json', got '{}'", other),
        };

        Ok(Self {
            host,
            port,
            processor_url,
            processor_timeout: Duration::from_secs(timeout_secs),
            rate_limit,
            allowed_hosts,
            log_format,
        })
    }

    /// Address the HTTP server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ApiConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();

        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
        assert_eq!(config.processor_url, "http://127.0.0.1:8001");
        assert_eq!(config.processor_timeout, Duration::from_secs(300));
        assert_eq!(config.rate_limit, RatePolicy::per_minute(10).unwrap());
        assert_eq!(config.allowed_hosts, vec!["localhost", "127.0.0.1"]);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("API_HOST", "127.0.0.1"),
            ("API_PORT", "9090"),
            ("QUERY_PROCESSOR_URL", "http://processor:8001"),
            ("QUERY_PROCESSOR_TIMEOUT_SECS", "30"),
            ("INGEST_RATE_LIMIT", "100/hour"),
            ("ALLOWED_HOSTS", "digest.dev, *.digest.dev,,"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
        assert_eq!(config.processor_timeout, Duration::from_secs(30));
        assert_eq!(config.rate_limit.max_requests(), 100);
        assert_eq!(config.allowed_hosts, vec!["digest.dev", "*.digest.dev"]);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(config(&[("API_PORT", "http")]).is_err());
        assert!(config(&[("QUERY_PROCESSOR_TIMEOUT_SECS", "0")]).is_err());
        assert!(config(&[("INGEST_RATE_LIMIT", "lots")]).is_err());
        assert!(config(&[("LOG_FORMAT", "xml")]).is_err());
    }
}
