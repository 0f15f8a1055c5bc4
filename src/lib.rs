//! # offer-filler
//!
//! Fill a grid-connection offer form from a folder of PDF documents using a
//! large language model.
//!
//! The PDFs (technical conditions, site plans, equipment data sheets) are
//! read page by page, folded into one text, and sent to an LLM together with
//! an annotated description of the offer form. The model's JSON answer is
//! validated against the same form description and saved.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input folder
//!  │
//!  ├─ 0. Configure    resolve method, provider, credential, template
//!  ├─ 1. Discover     list *.pdf (non-recursive, sorted)
//!  ├─ 2. Extract      text layer or OCR per file (spawn_blocking), saved at once
//!  ├─ 3. Consolidate  one string with file and page-break markers
//!  ├─ 4. Build prompt instructions + schema description + text
//!  ├─ 5. Dispatch     one call to openai / claude / gemini, no retry
//!  ├─ 6. Validate     whole-form check, every bad field reported
//!  └─ 7. Persist      filled_offer_<ts>.json + complete_result_<ts>.json
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use offer_filler::{run_workflow, WorkflowConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credential read from OPENAI_API_KEY
//!     let config = WorkflowConfig::builder().extraction_method("ocr").build()?;
//!     let outcome = run_workflow("input", "output", &config).await?;
//!     if outcome.is_no_input() {
//!         eprintln!("nothing to process");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `offer-filler` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! ## External Tools
//!
//! * **pdfium** is loaded at runtime from `PDFIUM_LIB_PATH` (a file or a
//!   directory) or from the system library path.
//! * **tesseract** with the `pol` language pack is required for the `ocr`
//!   method only.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod provider;
pub mod schema;
pub mod store;
pub mod workflow;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionMethod, ProviderKind, WorkflowConfig, WorkflowConfigBuilder};
pub use error::{ErrorCategory, OfferError, Stage, WorkflowError};
pub use extract::{ExtractionStrategy, OcrStrategy, TextLayerStrategy};
pub use output::{ArtifactPaths, ExtractedDocument, Page, WorkflowOutcome, WorkflowRequest, WorkflowResult};
pub use progress::{NoopProgressCallback, ProgressCallback, WorkflowProgressCallback};
pub use provider::{create_client, ClaudeClient, GeminiClient, OpenAiClient, ProviderClient};
pub use schema::{ValidatedOffer, ValidationReport, OFFER_SCHEMA};
pub use store::ResultStore;
pub use workflow::{run_workflow, run_workflow_sync};
