use async_trait::async_trait;
use log::{ debug, warn };
use reqwest::Client as HttpClient;
use serde::{ Deserialize, Serialize };
use url::Url;
use super::{ Transport, TransportError };
use crate::models::bot::Bot;

#[derive(Debug)]
pub struct HttpTransport {
    http: HttpClient,
    endpoint: Url,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    prompt: &'a str,
    bot: Bot,
}

#[derive(Deserialize)]
struct ChatResponse {
    response: String,
    #[serde(default)]
    success: Option<bool>,
}

impl HttpTransport {
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: HttpClient::new(),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, prompt: &str, bot: Bot) -> Result<String, TransportError> {
        let req = ChatRequest { prompt, bot };
        // Error statuses still carry a displayable `response` body.
        let resp = self.http.post(self.endpoint.clone()).json(&req).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        debug!("Chat endpoint answered {} ({} bytes)", status, body.len());

        let data: ChatResponse = serde_json::from_str(&body)?;
        if data.success == Some(false) {
            warn!("Chat endpoint reported failure for bot {}: {}", bot, data.response);
        }
        Ok(data.response)
    }
}
