//! Optional external text generator used for utterances the classifier cannot place.
//!
//! Callers always go through [`generate_with_timeout`]; every failure, including a slow
//! backend, comes back as a [`GeneratorError`] for the caller to replace with fallback text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Reply shape shared with the rule engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedReply {
    pub text: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("text generator did not answer within {0:?}")]
    Timeout(Duration),
    #[error("text generator transport failed: {0}")]
    Transport(String),
    #[error("text generator returned a malformed reply: {0}")]
    Malformed(String),
    #[error("text generator responded with status {0}")]
    Status(u16),
}

impl From<reqwest::Error> for GeneratorError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            GeneratorError::Malformed(value.to_string())
        } else {
            GeneratorError::Transport(value.to_string())
        }
    }
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, query: &str) -> Result<GeneratedReply, GeneratorError>;
}

/// Await the generator for at most `limit`.
pub async fn generate_with_timeout(
    generator: &dyn TextGenerator,
    query: &str,
    limit: Duration,
) -> Result<GeneratedReply, GeneratorError> {
    let reply = tokio::time::timeout(limit, generator.generate(query))
        .await
        .map_err(|_| GeneratorError::Timeout(limit))??;

    if reply.text.trim().is_empty() {
        return Err(GeneratorError::Malformed("empty text".to_string()));
    }
    Ok(reply)
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    query: &'a str,
}

/// Posts `{ "query": ... }` to `<base>/generate`.
#[derive(Debug, Clone)]
pub struct HttpTextGenerator {
    http_client: Client,
    base_url: String,
}

impl HttpTextGenerator {
    pub fn new(base_url: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/generate", self.base_url)
    }
}

#[async_trait]
impl TextGenerator for HttpTextGenerator {
    async fn generate(&self, query: &str) -> Result<GeneratedReply, GeneratorError> {
        let response = self
            .http_client
            .post(self.endpoint())
            .json(&GenerateRequest { query })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeneratorError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let reply: GeneratedReply = serde_json::from_slice(&body)
            .map_err(|err| GeneratorError::Malformed(err.to_string()))?;
        debug!(category = %reply.category, "text generator replied");
        Ok(reply)
    }
}
