//! LLM provider clients.
//!
//! Every backend implements [`ProviderClient`]: one prompt in, one JSON
//! object out. The prompt is always sent as the sole user message with a low
//! sampling temperature. Backend-specific request/response translation lives
//! in one file per backend; transport, status mapping and output parsing are
//! shared here.
//!
//! | Name     | Client           | Credential variable  |
//! |----------|------------------|----------------------|
//! | `openai` | [`OpenAiClient`] | `OPENAI_API_KEY`     |
//! | `claude` | [`ClaudeClient`] | `ANTHROPIC_API_KEY`  |
//! | `gemini` | [`GeminiClient`] | `GOOGLE_API_KEY`     |
//!
//! Two failure families stay distinct: transport/HTTP failures
//! ([`OfferError::Provider`], [`OfferError::Auth`], [`OfferError::RateLimited`])
//! and output that is not a JSON object ([`OfferError::ResponseParse`]).

mod claude;
mod gemini;
mod openai;

pub use claude::ClaudeClient;
pub use gemini::GeminiClient;
pub use openai::OpenAiClient;

use crate::config::{ProviderKind, WorkflowConfig};
use crate::error::OfferError;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// A backend that turns a prompt into a structured (JSON object) response.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Provider name as configured, e.g. `openai`.
    fn name(&self) -> &str;

    /// Model identifier sent with each request.
    fn model(&self) -> &str;

    /// Send `prompt` once and parse the answer as a JSON object.
    async fn structured_offer(&self, prompt: &str) -> Result<Value, OfferError>;
}

/// Settings shared by every backend client.
#[derive(Clone)]
pub struct ClientSettings {
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: usize,
}

impl std::fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSettings")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Build the client for `kind`.
///
/// The credential comes from `config.api_key` or, failing that, the
/// provider's environment variable. A missing credential is reported here,
/// before any request is made.
pub fn create_client(
    kind: ProviderKind,
    config: &WorkflowConfig,
) -> Result<Arc<dyn ProviderClient>, OfferError> {
    let api_key = resolve_api_key(kind, config.api_key.as_deref())?;
    let settings = ClientSettings {
        api_key,
        model: config
            .model
            .clone()
            .unwrap_or_else(|| kind.default_model().to_string()),
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    };
    debug!("Initialised {} client with model {}", kind, settings.model);

    Ok(match kind {
        ProviderKind::OpenAi => Arc::new(OpenAiClient::new(settings)),
        ProviderKind::Claude => Arc::new(ClaudeClient::new(settings)),
        ProviderKind::Gemini => Arc::new(GeminiClient::new(settings)),
    })
}

/// Resolve the API key from `explicit` or the provider's environment variable.
pub fn resolve_api_key(kind: ProviderKind, explicit: Option<&str>) -> Result<String, OfferError> {
    resolve_api_key_with(kind, explicit, |name| std::env::var(name).ok())
}

fn resolve_api_key_with(
    kind: ProviderKind,
    explicit: Option<&str>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, OfferError> {
    explicit
        .map(str::to_string)
        .or_else(|| lookup(kind.env_var()))
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| OfferError::MissingCredential {
            provider: kind.to_string(),
            env_var: kind.env_var(),
        })
}

// ── Shared transport ─────────────────────────────────────────────────────────

/// Send `request` and decode the JSON envelope, mapping HTTP failures.
pub(crate) async fn send_json(
    provider: &str,
    request: reqwest::RequestBuilder,
) -> Result<Value, OfferError> {
    let response = request.send().await.map_err(|e| OfferError::Provider {
        provider: provider.to_string(),
        detail: format!("request failed: {e}"),
    })?;

    let status = response.status();
    let body = response.text().await.map_err(|e| OfferError::Provider {
        provider: provider.to_string(),
        detail: format!("failed to read response body: {e}"),
    })?;

    if !status.is_success() {
        return Err(status_error(provider, status.as_u16(), &body));
    }

    serde_json::from_str(&body).map_err(|e| OfferError::Provider {
        provider: provider.to_string(),
        detail: format!("unexpected API response envelope: {e}"),
    })
}

/// Map a non-2xx HTTP answer onto an error variant.
pub(crate) fn status_error(provider: &str, status: u16, body: &str) -> OfferError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.chars().take(200).collect());

    match status {
        401 | 403 => OfferError::Auth {
            provider: provider.to_string(),
            detail: message,
        },
        429 => OfferError::RateLimited {
            provider: provider.to_string(),
        },
        _ => OfferError::Provider {
            provider: provider.to_string(),
            detail: format!("HTTP {status}: {message}"),
        },
    }
}

/// Error for an envelope that carries no generated text.
pub(crate) fn no_content(provider: &str, what: &str) -> OfferError {
    OfferError::Provider {
        provider: provider.to_string(),
        detail: format!("response contained no {what}"),
    }
}

// ── Output parsing ───────────────────────────────────────────────────────────

/// Parse model output as a JSON object.
pub fn parse_structured(provider: &str, text: &str) -> Result<Value, OfferError> {
    let value: Value = serde_json::from_str(text.trim()).map_err(|e| OfferError::ResponseParse {
        provider: provider.to_string(),
        detail: e.to_string(),
    })?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(OfferError::ResponseParse {
            provider: provider.to_string(),
            detail: "expected a JSON object at the top level".to_string(),
        })
    }
}

static RE_OPENING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```(?:json|JSON)?[ \t]*\r?\n?").unwrap());
static RE_CLOSING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n?```$").unwrap());

/// Strip a leading ```` ```json ```` / ```` ``` ```` and a trailing ```` ``` ````.
///
/// Either end is stripped independently, so a truncated answer that only
/// opens a fence is still cleaned.
pub fn strip_code_fence(raw: &str) -> String {
    let s = raw.trim();
    let s = RE_OPENING_FENCE.replace(s, "");
    let s = RE_CLOSING_FENCE.replace(&s, "");
    s.trim().to_string()
}
