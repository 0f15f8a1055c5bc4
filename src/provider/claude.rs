//! Anthropic Messages API backend.

use super::{no_content, parse_structured, send_json, ClientSettings, ProviderClient};
use crate::error::OfferError;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, info};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone)]
pub struct ClaudeClient {
    http: reqwest::Client,
    settings: ClientSettings,
    base_url: String,
}

impl ClaudeClient {
    pub fn new(settings: ClientSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at another endpoint (a proxy or a local test server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn request_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.settings.model,
            "max_tokens": self.settings.max_tokens,
            "temperature": self.settings.temperature,
            "messages": [{ "role": "user", "content": prompt }],
        })
    }
}

/// Concatenated `text` blocks of the answer, or `None` if there are none.
fn response_text(envelope: &Value) -> Option<String> {
    let text: String = envelope["content"]
        .as_array()?
        .iter()
        .filter(|block| block["type"] == "text")
        .filter_map(|block| block["text"].as_str())
        .collect();
    (!text.is_empty()).then_some(text)
}

#[async_trait]
impl ProviderClient for ClaudeClient {
    fn name(&self) -> &str {
        "claude"
    }

    fn model(&self) -> &str {
        &self.settings.model
    }

    async fn structured_offer(&self, prompt: &str) -> Result<Value, OfferError> {
        info!("Calling Claude API ({})...", self.settings.model);
        let request = self
            .http
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.settings.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&self.request_body(prompt));

        let envelope = send_json(self.name(), request).await?;
        let text = response_text(&envelope).ok_or_else(|| no_content(self.name(), "text block"))?;
        debug!("Received response from Claude ({} chars)", text.len());
        parse_structured(self.name(), &text)
    }
}
