//! Google Gemini `generateContent` backend.
//!
//! Gemini has no strict JSON mode for this request shape and regularly wraps
//! its answer in a ```` ```json ```` fence, which is stripped before parsing.

use super::{no_content, parse_structured, send_json, strip_code_fence, ClientSettings, ProviderClient};
use crate::error::OfferError;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, info};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    settings: ClientSettings,
    base_url: String,
}

impl GeminiClient {
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
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": self.settings.temperature,
                "candidateCount": 1,
            },
        })
    }
}

/// Concatenated text parts of the first candidate.
fn response_text(envelope: &Value) -> Option<String> {
    let text: String = envelope["candidates"][0]["content"]["parts"]
        .as_array()?
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect();
    (!text.is_empty()).then_some(text)
}

#[async_trait]
impl ProviderClient for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.settings.model
    }

    async fn structured_offer(&self, prompt: &str) -> Result<Value, OfferError> {
        info!("Calling Gemini API ({})...", self.settings.model);
        let request = self
            .http
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, self.settings.model
            ))
            .header("x-goog-api-key", &self.settings.api_key)
            .json(&self.request_body(prompt));

        let envelope = send_json(self.name(), request).await?;
        let text = response_text(&envelope).ok_or_else(|| no_content(self.name(), "candidate text"))?;
        debug!("Received response from Gemini ({} chars)", text.len());
        parse_structured(self.name(), &strip_code_fence(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GeminiClient {
        GeminiClient::new(ClientSettings {
            api_key: "g-key".into(),
            model: "gemini-pro".into(),
            temperature: 0.1,
            max_tokens: 4096,
        })
    }

    #[test]
    fn request_asks_for_one_low_temperature_candidate() {
        let body = client().request_body("PROMPT");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "PROMPT");
        assert_eq!(body["generationConfig"]["candidateCount"], 1);
        assert!(body["generationConfig"]["temperature"].as_f64().unwrap() < 0.2);
    }

    #[test]
    fn fenced_candidate_parses_after_stripping() {
        let envelope = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "```json\n{\"formInfo\": {}}\n```" }] }
            }]
        });
        let text = response_text(&envelope).unwrap();
        let value = parse_structured("gemini", &strip_code_fence(&text)).unwrap();
        assert!(value["formInfo"].is_object());
    }

    #[test]
    fn missing_candidates_yield_none() {
        assert_eq!(response_text(&json!({"candidates": []})), None);
    }
}
