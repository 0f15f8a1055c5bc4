//! Progress-callback trait for workflow events.
//!
//! Inject an [`Arc<dyn WorkflowProgressCallback>`] via
//! [`crate::config::WorkflowConfigBuilder::progress_callback`] to follow a
//! run as it moves through its stages and documents.
//!
//! # Example
//!
//! ```rust
//! use offer_filler::{Stage, WorkflowConfig, WorkflowProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct PageCounter {
//!     pages: AtomicUsize,
//! }
//!
//! impl WorkflowProgressCallback for PageCounter {
//!     fn on_document_extracted(&self, _index: usize, _total: usize, filename: &str, pages: usize) {
//!         self.pages.fetch_add(pages, Ordering::SeqCst);
//!         eprintln!("{filename}: {pages} pages");
//!     }
//! }
//!
//! let counter = Arc::new(PageCounter { pages: AtomicUsize::new(0) });
//! let config = WorkflowConfig::builder()
//!     .progress_callback(counter as Arc<dyn WorkflowProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::error::Stage;
use std::sync::Arc;

/// Called by the workflow as it advances.
///
/// Stages run strictly one after another, so calls never overlap within a
/// run. All methods default to no-ops.
pub trait WorkflowProgressCallback: Send + Sync {
    /// Called when a stage begins.
    fn on_stage_start(&self, stage: Stage) {
        let _ = stage;
    }

    /// Called before a document is extracted.
    ///
    /// # Arguments
    /// * `index`    — 1-indexed position in discovery order
    /// * `total`    — number of discovered documents
    /// * `filename` — file name without directory
    fn on_document_start(&self, index: usize, total: usize, filename: &str) {
        let _ = (index, total, filename);
    }

    /// Called after a document has been extracted and its artifact saved.
    fn on_document_extracted(&self, index: usize, total: usize, filename: &str, pages: usize) {
        let _ = (index, total, filename, pages);
    }

    /// Called once when the run ends without error.
    ///
    /// `documents` is 0 when the input folder held nothing to process.
    fn on_workflow_complete(&self, documents: usize) {
        let _ = documents;
    }
}

/// A no-op implementation; the default when no callback is configured.
pub struct NoopProgressCallback;

impl WorkflowProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::WorkflowConfig`].
pub type ProgressCallback = Arc<dyn WorkflowProgressCallback>;
