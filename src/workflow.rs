//! The end-to-end offer-filling run.
//!
//! ```text
//! configure ──▶ discover ──▶ extract(*) ──▶ consolidate ──▶ build_prompt
//!                                                               │
//!                    persist ◀── validate ◀── dispatch ◀────────┘
//! ```
//!
//! Stages run strictly in order and never loop back. Every failure is
//! returned as a [`WorkflowError`] tagged with the stage it happened in.
//! Side effects are limited to the output folder: each extracted document
//! is saved as soon as it is produced, a response that fails validation is
//! saved before the error is returned, and a successful run writes the offer
//! plus a complete-result record.

use crate::config::{ExtractionMethod, ProviderKind, WorkflowConfig};
use crate::error::{OfferError, Stage, WorkflowError};
use crate::extract::{self, ExtractionStrategy};
use crate::output::{ArtifactPaths, ExtractedDocument, WorkflowOutcome, WorkflowRequest, WorkflowResult};
use crate::pipeline::{consolidate, discover, prompt};
use crate::provider::{self, ProviderClient};
use crate::schema::{self, OFFER_SCHEMA};
use crate::store::ResultStore;
use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Everything the configure stage resolved. Built before any side effect.
struct Prepared {
    method: ExtractionMethod,
    extractor: Arc<dyn ExtractionStrategy>,
    provider: Arc<dyn ProviderClient>,
    instructions: String,
}

/// Run the whole workflow over `input_dir`, writing artifacts to `output_dir`.
///
/// # Returns
/// * `Ok(WorkflowOutcome::NoInput)` when the folder holds no matching
///   documents. Nothing is written and no provider is called.
/// * `Ok(WorkflowOutcome::Completed { .. })` when the offer was validated
///   and saved.
///
/// # Errors
/// A [`WorkflowError`] naming the failed stage. Configuration problems
/// (unknown method or provider, missing credential, unreadable template,
/// missing input folder) are reported at [`Stage::Configure`], before any
/// document is opened or any request is sent.
///
/// # Example
/// ```rust,no_run
/// use offer_filler::{run_workflow, WorkflowConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = WorkflowConfig::builder()
///     .extraction_method("text")
///     .provider_name("claude")
///     .build()?;
/// let outcome = run_workflow("input", "output", &config).await?;
/// if let Some(result) = outcome.result() {
///     println!("{}", serde_json::to_string_pretty(&result.offer)?);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn run_workflow(
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &WorkflowConfig,
) -> Result<WorkflowOutcome, WorkflowError> {
    let started = Instant::now();
    let input_dir = input_dir.as_ref();
    let store = ResultStore::new(output_dir.as_ref());
    info!(
        "Starting workflow: input={}, output={}, method={}, provider={}",
        input_dir.display(),
        store.dir().display(),
        config.extraction_method,
        config.provider_name
    );

    // ── Configure ────────────────────────────────────────────────────────
    enter(config, Stage::Configure);
    let prepared = preflight(input_dir, config)
        .await
        .map_err(WorkflowError::at(Stage::Configure))?;

    // ── Discover ─────────────────────────────────────────────────────────
    enter(config, Stage::Discover);
    let paths = discover::discover_documents(input_dir, &config.input_extension)
        .await
        .map_err(WorkflowError::at(Stage::Discover))?;
    if paths.is_empty() {
        warn!(
            "No '.{}' files found in {}; nothing to do",
            config.input_extension.trim_start_matches('.'),
            input_dir.display()
        );
        if let Some(ref cb) = config.progress_callback {
            cb.on_workflow_complete(0);
        }
        return Ok(WorkflowOutcome::NoInput);
    }
    info!("Found {} file(s) to process", paths.len());

    // ── Extract ──────────────────────────────────────────────────────────
    enter(config, Stage::Extract);
    let (documents, extracted_paths) = extract_all(&paths, &prepared, &store, config)
        .await
        .map_err(WorkflowError::at(Stage::Extract))?;

    // ── Consolidate ──────────────────────────────────────────────────────
    enter(config, Stage::Consolidate);
    let consolidated = consolidate::consolidate(&documents);
    debug!("Consolidated text: {} chars", consolidated.len());

    // ── Build prompt ─────────────────────────────────────────────────────
    enter(config, Stage::BuildPrompt);
    let prompt = prompt::build_prompt(&prepared.instructions, &OFFER_SCHEMA, &consolidated)
        .map_err(WorkflowError::at(Stage::BuildPrompt))?;
    debug!("Prompt: {} chars", prompt.len());

    // ── Dispatch ─────────────────────────────────────────────────────────
    enter(config, Stage::Dispatch);
    let provider = &prepared.provider;
    info!(
        "Sending consolidated text to {} ({})...",
        provider.name(),
        provider.model()
    );
    let raw_response = provider
        .structured_offer(&prompt)
        .await
        .map_err(WorkflowError::at(Stage::Dispatch))?;

    // ── Validate ─────────────────────────────────────────────────────────
    enter(config, Stage::Validate);
    let offer = match schema::validate(&raw_response) {
        Ok(offer) => offer,
        Err(report) => {
            warn!("LLM response validation failed: {}", report);
            let saved = store
                .save_failed_response(&raw_response, &report.to_string(), &Local::now())
                .await;
            if let Err(e) = saved {
                warn!("Could not save the failed response: {}", e);
            }
            return Err(WorkflowError::new(Stage::Validate, OfferError::Validation(report)));
        }
    };

    // ── Persist ──────────────────────────────────────────────────────────
    enter(config, Stage::Persist);
    let result = WorkflowResult {
        request: WorkflowRequest {
            prompt,
            provider: provider.name().to_string(),
            model: provider.model().to_string(),
            source_filenames: documents.iter().map(|d| d.filename.clone()).collect(),
        },
        offer,
        raw_response,
        timestamp: Local::now(),
    };
    let offer_path = store
        .save_offer(&result.offer, &result.timestamp)
        .await
        .map_err(WorkflowError::at(Stage::Persist))?;
    let complete_result_path = store
        .save_complete_result(&result)
        .await
        .map_err(WorkflowError::at(Stage::Persist))?;

    info!(
        "Workflow completed: {} document(s) with '{}' in {}ms",
        documents.len(),
        prepared.method,
        started.elapsed().as_millis()
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_workflow_complete(documents.len());
    }

    Ok(WorkflowOutcome::Completed {
        result: Box::new(result),
        artifacts: ArtifactPaths {
            extracted: extracted_paths,
            offer: offer_path,
            complete_result: complete_result_path,
        },
    })
}

/// Synchronous wrapper around [`run_workflow`].
///
/// Creates a temporary tokio runtime internally.
pub fn run_workflow_sync(
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &WorkflowConfig,
) -> Result<WorkflowOutcome, WorkflowError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| {
            WorkflowError::new(
                Stage::Configure,
                OfferError::Internal(format!("Failed to create tokio runtime: {e}")),
            )
        })?
        .block_on(run_workflow(input_dir, output_dir, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn enter(config: &WorkflowConfig, stage: Stage) {
    debug!("Entering stage {}", stage);
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage_start(stage);
    }
}

/// Resolve every configured name into something runnable.
///
/// Names are parsed even when an injected extractor or provider will be
/// used instead, so a typo never goes unnoticed.
async fn preflight(input_dir: &Path, config: &WorkflowConfig) -> Result<Prepared, OfferError> {
    let method: ExtractionMethod = config.extraction_method.parse()?;
    let kind: ProviderKind = config.provider_name.parse()?;

    let extractor = match config.extractor {
        Some(ref e) => Arc::clone(e),
        None => extract::strategy_for(method, config),
    };

    // Injected client first, then the named provider with its credential.
    let provider = match config.provider {
        Some(ref p) => Arc::clone(p),
        None => provider::create_client(kind, config)?,
    };

    let instructions = prompt::load_instructions(config.instruction_template.as_deref()).await?;

    let is_dir = tokio::fs::metadata(input_dir)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);
    if !is_dir {
        return Err(OfferError::InputDirNotFound {
            path: input_dir.to_path_buf(),
        });
    }

    Ok(Prepared {
        method,
        extractor,
        provider,
        instructions,
    })
}

/// Extract each document in order, saving it before moving to the next.
///
/// Stops at the first failure; documents saved so far stay on disk.
async fn extract_all(
    paths: &[PathBuf],
    prepared: &Prepared,
    store: &ResultStore,
    config: &WorkflowConfig,
) -> Result<(Vec<ExtractedDocument>, Vec<PathBuf>), OfferError> {
    let total = paths.len();
    let stems = discover::artifact_stems(paths);
    let mut documents = Vec::with_capacity(total);
    let mut saved = Vec::with_capacity(total);

    for (i, (path, stem)) in paths.iter().zip(&stems).enumerate() {
        let index = i + 1;
        let filename = extract::file_name(path);
        info!("Processing {} ({}/{})...", filename, index, total);
        if let Some(ref cb) = config.progress_callback {
            cb.on_document_start(index, total, &filename);
        }

        // pdfium and tesseract block, so keep them off the async workers.
        let extractor = Arc::clone(&prepared.extractor);
        let owned = path.clone();
        let doc = tokio::task::spawn_blocking(move || extractor.extract(&owned))
            .await
            .map_err(|e| OfferError::Internal(format!("extraction task panicked: {e}")))??;

        saved.push(store.save_extracted(&doc, stem).await?);
        if let Some(ref cb) = config.progress_callback {
            cb.on_document_extracted(index, total, &doc.filename, doc.pages.len());
        }
        documents.push(doc);
    }

    Ok((documents, saved))
}
