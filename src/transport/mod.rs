pub mod http;

pub use self::http::HttpTransport;

use async_trait::async_trait;
use thiserror::Error;
use crate::models::bot::Bot;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("could not reach chat endpoint: {0}")]
    Network(#[from] reqwest::Error),
    #[error("malformed reply from chat endpoint: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One request/response exchange with the chat endpoint. No retries.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, prompt: &str, bot: Bot) -> Result<String, TransportError>;
}
