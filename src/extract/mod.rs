//! Page-text extraction strategies.
//!
//! A strategy maps one PDF path to an [`ExtractedDocument`]: every page, in
//! order, numbered from 1. Two strategies exist, selected by
//! [`ExtractionMethod`] through [`strategy_for`]:
//!
//! * [`TextLayerStrategy`] — reads the embedded text layer via pdfium
//! * [`OcrStrategy`] — rasterises each page via pdfium and runs tesseract
//!
//! Both are blocking; [`crate::workflow`] runs them inside
//! `tokio::task::spawn_blocking`. Any page failure fails the whole document.

mod ocr;
mod text;

pub use ocr::OcrStrategy;
pub use text::TextLayerStrategy;

use crate::config::{ExtractionMethod, WorkflowConfig};
use crate::error::OfferError;
use crate::output::ExtractedDocument;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Turns a PDF file into page texts.
pub trait ExtractionStrategy: Send + Sync {
    /// The method recorded in the produced document.
    fn method(&self) -> ExtractionMethod;

    /// Extract all pages of `path`, failing on the first page that cannot be read.
    fn extract(&self, path: &Path) -> Result<ExtractedDocument, OfferError>;
}

/// Build the strategy for `method`.
pub fn strategy_for(method: ExtractionMethod, config: &WorkflowConfig) -> Arc<dyn ExtractionStrategy> {
    match method {
        ExtractionMethod::Text => Arc::new(TextLayerStrategy),
        ExtractionMethod::Ocr => Arc::new(OcrStrategy::new(
            config.ocr_language.clone(),
            config.ocr_scale,
            config.tesseract_command.clone(),
        )),
    }
}

/// File name of `path` as recorded in artifacts.
pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Bind pdfium from `PDFIUM_LIB_PATH` (file or directory) or the system library.
fn bind_pdfium() -> Result<Pdfium, String> {
    let bindings = match std::env::var_os("PDFIUM_LIB_PATH") {
        Some(p) => {
            let p = PathBuf::from(p);
            let lib = if p.is_dir() {
                Pdfium::pdfium_platform_library_name_at_path(&p)
            } else {
                p
            };
            Pdfium::bind_to_library(&lib)
        }
        None => Pdfium::bind_to_system_library(),
    }
    .map_err(|e| {
        format!(
            "failed to bind pdfium library: {e:?}\n\
             Install libpdfium or set PDFIUM_LIB_PATH=/path/to/libpdfium"
        )
    })?;
    Ok(Pdfium::new(bindings))
}

/// Open `path`, run `page_text` on every page in order, close the document.
///
/// The document handle is owned by this frame and released on every exit
/// path, including a failing page.
pub(crate) fn extract_pages<F>(
    path: &Path,
    method: ExtractionMethod,
    mut page_text: F,
) -> Result<ExtractedDocument, OfferError>
where
    F: FnMut(&PdfPage<'_>) -> Result<String, String>,
{
    let filename = file_name(path);
    info!("Extracting text from {} using {}", filename, method);

    let fail = |detail: String| OfferError::Extraction {
        filename: filename.clone(),
        detail,
    };

    let pdfium = bind_pdfium().map_err(fail)?;
    let document = pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| fail(format!("cannot open document: {e:?}")))?;

    let mut texts = Vec::new();
    for (index, page) in document.pages().iter().enumerate() {
        let page_number = index + 1;
        let text = page_text(&page).map_err(|detail| fail(format!("page {page_number}: {detail}")))?;
        debug!("Extracted page {} of {} ({} chars)", page_number, filename, text.len());
        texts.push(text);
    }

    Ok(ExtractedDocument::from_texts(filename.clone(), method, texts))
}
