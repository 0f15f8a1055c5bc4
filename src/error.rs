//! Error types for the offer-filler library.
//!
//! Two layers reflect two questions a caller asks after a failed run:
//!
//! * [`OfferError`] — **what** went wrong: a missing credential, a corrupt
//!   PDF, a rate-limited provider, an LLM answer that does not match the
//!   offer schema. Every variant maps onto one [`ErrorCategory`].
//!
//! * [`WorkflowError`] — **where** it went wrong: the [`Stage`] of the
//!   pipeline that failed, wrapping the underlying [`OfferError`]. This is
//!   what [`crate::workflow::run_workflow`] returns, so a failed run can be
//!   diagnosed from its message alone without re-running it.

use crate::schema::ValidationReport;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the offer-filler library.
#[derive(Debug, Error)]
pub enum OfferError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// Extraction method name is not one of `ocr` / `text`.
    #[error("Unknown extraction method '{name}'. Use 'ocr' or 'text'.")]
    UnknownExtractionMethod { name: String },

    /// Provider name is not one of the supported backends.
    #[error("Unknown LLM provider '{name}'. Use 'openai', 'claude', or 'gemini'.")]
    UnknownProvider { name: String },

    /// No API key was passed explicitly and the provider's variable is unset.
    #[error("API key not provided for {provider}.\nSet {env_var} or pass the key explicitly.")]
    MissingCredential {
        provider: String,
        env_var: &'static str,
    },

    /// The instruction template could not be read.
    #[error("Instruction template '{path}' could not be read: {source}")]
    TemplateUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input directory does not exist or is not a directory.
    #[error("Input folder not found: '{path}'")]
    InputDirNotFound { path: PathBuf },

    /// Builder or preflight validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Extraction errors ─────────────────────────────────────────────────
    /// A document could not be opened or one of its pages failed to extract.
    #[error("Failed to extract '{filename}': {detail}")]
    Extraction { filename: String, detail: String },

    // ── Provider errors ───────────────────────────────────────────────────
    /// Transport failure or a non-2xx answer from the provider API.
    #[error("LLM provider '{provider}' error: {detail}")]
    Provider { provider: String, detail: String },

    /// The provider rejected the credential (HTTP 401/403).
    #[error("Authentication error from provider '{provider}': {detail}")]
    Auth { provider: String, detail: String },

    /// The provider answered HTTP 429.
    #[error("Rate limit exceeded for provider '{provider}'")]
    RateLimited { provider: String },

    /// The provider answered, but its output is not a JSON object.
    #[error("Response from '{provider}' is not valid structured data: {detail}")]
    ResponseParse { provider: String, detail: String },

    // ── Validation errors ─────────────────────────────────────────────────
    /// The structured response does not match the offer schema.
    #[error("{0}")]
    Validation(ValidationReport),

    // ── Storage errors ────────────────────────────────────────────────────
    /// Could not create or write an output artifact.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not read or list a file or directory.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A saved artifact is not valid JSON.
    #[error("File '{path}' is not valid JSON: {source}")]
    ArtifactParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be serialised for persistence.
    #[error("Serialisation failed: {0}")]
    Serialize(#[from] serde_json::Error),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of an [`OfferError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad method/provider name, missing credential, missing template.
    Configuration,
    /// Document unreadable or corrupt.
    Extraction,
    /// Network, authentication, rate-limit, or unparseable provider output.
    Provider,
    /// Response does not match the schema.
    Validation,
    /// Artifact read/write failure.
    Storage,
    /// A worker task panicked or was cancelled.
    Internal,
}

impl OfferError {
    /// Map this error onto the pipeline's error taxonomy.
    pub fn category(&self) -> ErrorCategory {
        match self {
            OfferError::UnknownExtractionMethod { .. }
            | OfferError::UnknownProvider { .. }
            | OfferError::MissingCredential { .. }
            | OfferError::TemplateUnreadable { .. }
            | OfferError::InputDirNotFound { .. }
            | OfferError::InvalidConfig(_) => ErrorCategory::Configuration,
            OfferError::Extraction { .. } => ErrorCategory::Extraction,
            OfferError::Provider { .. }
            | OfferError::Auth { .. }
            | OfferError::RateLimited { .. }
            | OfferError::ResponseParse { .. } => ErrorCategory::Provider,
            OfferError::Validation(_) => ErrorCategory::Validation,
            OfferError::OutputWriteFailed { .. }
            | OfferError::ReadFailed { .. }
            | OfferError::ArtifactParse { .. }
            | OfferError::Serialize(_) => ErrorCategory::Storage,
            OfferError::Internal(_) => ErrorCategory::Internal,
        }
    }

    /// `true` for errors raised before any side effect takes place.
    pub fn is_configuration(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }
}

/// Pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Resolve method, provider, credential and template; check the input dir.
    Configure,
    Discover,
    Extract,
    Consolidate,
    BuildPrompt,
    Dispatch,
    Validate,
    Persist,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Configure => "configure",
            Stage::Discover => "discover",
            Stage::Extract => "extract",
            Stage::Consolidate => "consolidate",
            Stage::BuildPrompt => "build_prompt",
            Stage::Dispatch => "dispatch",
            Stage::Validate => "validate",
            Stage::Persist => "persist",
        };
        f.write_str(name)
    }
}

/// A failed workflow run: the stage that failed and why.
#[derive(Debug, Error)]
#[error("[{stage}] {source}")]
pub struct WorkflowError {
    pub stage: Stage,
    #[source]
    pub source: OfferError,
}

impl WorkflowError {
    pub fn new(stage: Stage, source: OfferError) -> Self {
        Self { stage, source }
    }

    /// Returns a closure suitable for `map_err` that tags errors with `stage`.
    pub(crate) fn at(stage: Stage) -> impl FnOnce(OfferError) -> WorkflowError {
        move |source| WorkflowError { stage, source }
    }
}
