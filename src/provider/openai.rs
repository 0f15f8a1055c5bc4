//! OpenAI Chat Completions backend.
//!
//! JSON mode (`response_format: json_object`) makes the API reject any
//! answer that is not a JSON object, so no cleanup is applied to the output.

use super::{no_content, parse_structured, send_json, ClientSettings, ProviderClient};
use crate::error::OfferError;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, info};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    settings: ClientSettings,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(settings: ClientSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at an OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn request_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.settings.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": self.settings.temperature,
            "response_format": { "type": "json_object" },
        })
    }
}

/// Text of the first choice.
fn response_text(envelope: &Value) -> Option<&str> {
    envelope["choices"][0]["message"]["content"].as_str()
}

#[async_trait]
impl ProviderClient for OpenAiClient {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.settings.model
    }

    async fn structured_offer(&self, prompt: &str) -> Result<Value, OfferError> {
        info!("Calling OpenAI API ({})...", self.settings.model);
        let request = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.settings.api_key)
            .json(&self.request_body(prompt));

        let envelope = send_json(self.name(), request).await?;
        let text = response_text(&envelope).ok_or_else(|| no_content(self.name(), "message content"))?;
        debug!("Received response from OpenAI ({} chars)", text.len());
        parse_structured(self.name(), text)
    }
}
