use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid chat endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },
    #[error("unsupported chat store type: {0} (expected file, memory or redis)")]
    UnsupportedStore(String),
    #[error("invalid Redis URL '{url}': {reason}")]
    InvalidRedisUrl { url: String, reason: String },
}

/// Accepts only absolute http(s) URLs.
pub fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidEndpoint {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other =>
            Err(ConfigError::InvalidEndpoint {
                url: raw.to_string(),
                reason: format!("unsupported scheme '{}'", other),
            }),
    }
}
