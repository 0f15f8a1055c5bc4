//! Configuration types for a workflow run.
//!
//! All run behaviour is controlled through [`WorkflowConfig`], built via its
//! [`WorkflowConfigBuilder`]. Method and provider are kept as plain names
//! here and resolved into [`ExtractionMethod`] / [`ProviderKind`] during the
//! workflow's configure stage, so an unknown name is always reported as a
//! configuration error before any document is opened.

use crate::error::OfferError;
use crate::extract::ExtractionStrategy;
use crate::progress::ProgressCallback;
use crate::provider::ProviderClient;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// Configuration for one workflow run.
///
/// # Example
/// ```rust
/// use offer_filler::WorkflowConfig;
///
/// let config = WorkflowConfig::builder()
///     .extraction_method("ocr")
///     .provider_name("claude")
///     .ocr_language("pol")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct WorkflowConfig {
    /// `ocr` or `text`. Default: `text`.
    pub extraction_method: String,

    /// `openai`, `claude`, or `gemini`. Default: `openai`.
    pub provider_name: String,

    /// Model identifier. If None, uses the provider default.
    pub model: Option<String>,

    /// API key. If None, read from the provider's environment variable.
    pub api_key: Option<String>,

    /// Pre-constructed provider client. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn ProviderClient>>,

    /// Pre-constructed extraction strategy. Takes precedence over `extraction_method`.
    pub extractor: Option<Arc<dyn ExtractionStrategy>>,

    /// Sampling temperature. Default: 0.1.
    ///
    /// Extraction wants the model to copy values, not invent them.
    pub temperature: f32,

    /// Maximum tokens the provider may generate. Default: 4096.
    pub max_tokens: usize,

    /// Tesseract language code for the `ocr` method. Default: `pol`.
    pub ocr_language: String,

    /// Upscaling factor applied when rasterising pages for OCR. Default: 2.0.
    pub ocr_scale: f32,

    /// Tesseract executable. Default: `tesseract` (looked up on `PATH`).
    pub tesseract_command: PathBuf,

    /// Instruction template file. If None, uses the built-in instructions.
    pub instruction_template: Option<PathBuf>,

    /// Extension of documents picked up from the input folder. Default: `pdf`.
    pub input_extension: String,

    /// Receives stage and per-document events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            extraction_method: ExtractionMethod::Text.to_string(),
            provider_name: ProviderKind::OpenAi.to_string(),
            model: None,
            api_key: None,
            provider: None,
            extractor: None,
            temperature: 0.1,
            max_tokens: 4096,
            ocr_language: "pol".to_string(),
            ocr_scale: 2.0,
            tesseract_command: PathBuf::from("tesseract"),
            instruction_template: None,
            input_extension: "pdf".to_string(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for WorkflowConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkflowConfig")
            .field("extraction_method", &self.extraction_method)
            .field("provider_name", &self.provider_name)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("provider", &self.provider.as_ref().map(|_| "<dyn ProviderClient>"))
            .field("extractor", &self.extractor.as_ref().map(|_| "<dyn ExtractionStrategy>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("ocr_language", &self.ocr_language)
            .field("ocr_scale", &self.ocr_scale)
            .field("instruction_template", &self.instruction_template)
            .field("input_extension", &self.input_extension)
            .finish()
    }
}

impl WorkflowConfig {
    /// Create a new builder for `WorkflowConfig`.
    pub fn builder() -> WorkflowConfigBuilder {
        WorkflowConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`WorkflowConfig`].
pub struct WorkflowConfigBuilder {
    config: WorkflowConfig,
}

impl WorkflowConfigBuilder {
    pub fn extraction_method(mut self, name: impl Into<String>) -> Self {
        self.config.extraction_method = name.into();
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = name.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn ProviderClient>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn extractor(mut self, extractor: Arc<dyn ExtractionStrategy>) -> Self {
        self.config.extractor = Some(extractor);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn ocr_language(mut self, lang: impl Into<String>) -> Self {
        self.config.ocr_language = lang.into();
        self
    }

    pub fn ocr_scale(mut self, factor: f32) -> Self {
        self.config.ocr_scale = factor;
        self
    }

    pub fn tesseract_command(mut self, cmd: impl Into<PathBuf>) -> Self {
        self.config.tesseract_command = cmd.into();
        self
    }

    pub fn instruction_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.instruction_template = Some(path.into());
        self
    }

    pub fn input_extension(mut self, ext: impl Into<String>) -> Self {
        self.config.input_extension = ext.into();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating numeric constraints.
    pub fn build(self) -> Result<WorkflowConfig, OfferError> {
        let c = &self.config;
        if !(c.ocr_scale > 0.0 && c.ocr_scale <= 8.0) {
            return Err(OfferError::InvalidConfig(format!(
                "OCR scale must be in (0, 8], got {}",
                c.ocr_scale
            )));
        }
        if c.max_tokens == 0 {
            return Err(OfferError::InvalidConfig("max_tokens must be ≥ 1".into()));
        }
        if c.input_extension.trim_start_matches('.').is_empty() {
            return Err(OfferError::InvalidConfig(
                "input extension must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How page text is obtained from a PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    /// Rasterise each page and run optical character recognition.
    Ocr,
    /// Read the embedded text layer.
    Text,
}

impl FromStr for ExtractionMethod {
    type Err = OfferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ocr" => Ok(ExtractionMethod::Ocr),
            "text" => Ok(ExtractionMethod::Text),
            _ => Err(OfferError::UnknownExtractionMethod { name: s.to_string() }),
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExtractionMethod::Ocr => "ocr",
            ExtractionMethod::Text => "text",
        })
    }
}

/// Supported LLM backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[serde(rename = "openai")]
    OpenAi,
    Claude,
    Gemini,
}

impl ProviderKind {
    /// Environment variable holding this provider's API key.
    pub fn env_var(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Claude => "ANTHROPIC_API_KEY",
            ProviderKind::Gemini => "GOOGLE_API_KEY",
        }
    }

    /// Model used when no override is configured.
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "gpt-4-turbo",
            ProviderKind::Claude => "claude-3-opus-20240229",
            ProviderKind::Gemini => "gemini-pro",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = OfferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "claude" => Ok(ProviderKind::Claude),
            "gemini" => Ok(ProviderKind::Gemini),
            _ => Err(OfferError::UnknownProvider { name: s.to_string() }),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Claude => "claude",
            ProviderKind::Gemini => "gemini",
        })
    }
}
