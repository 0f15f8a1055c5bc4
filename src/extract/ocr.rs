//! OCR extraction: pdfium rasterisation + tesseract.
//!
//! Each page is rendered at a fixed upscaling factor (2× by default) and
//! written as a lossless PNG to a temporary file, which tesseract reads and
//! prints back to stdout. The temp file is removed when the page is done.

use super::{extract_pages, ExtractionStrategy};
use crate::config::ExtractionMethod;
use crate::error::OfferError;
use crate::output::ExtractedDocument;
use image::{DynamicImage, ImageFormat};
use pdfium_render::prelude::*;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Rasterises each page and runs optical character recognition on it.
#[derive(Debug, Clone)]
pub struct OcrStrategy {
    language: String,
    scale: f32,
    tesseract: PathBuf,
}

impl OcrStrategy {
    pub fn new(language: impl Into<String>, scale: f32, tesseract: impl Into<PathBuf>) -> Self {
        Self {
            language: language.into(),
            scale,
            tesseract: tesseract.into(),
        }
    }

    fn recognise_page(&self, page: &PdfPage<'_>) -> Result<String, String> {
        let render_config = PdfRenderConfig::new().scale_page_by_factor(self.scale);
        let image = page
            .render_with_config(&render_config)
            .map_err(|e| format!("rasterisation failed: {e:?}"))?
            .as_image();
        debug!("Rendered page for OCR → {}x{} px", image.width(), image.height());

        let png = write_png(&image)?;
        run_tesseract(&self.tesseract, png.path(), &self.language)
    }
}

impl Default for OcrStrategy {
    fn default() -> Self {
        Self::new("pol", 2.0, "tesseract")
    }
}

impl ExtractionStrategy for OcrStrategy {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Ocr
    }

    fn extract(&self, path: &Path) -> Result<ExtractedDocument, OfferError> {
        extract_pages(path, ExtractionMethod::Ocr, |page| self.recognise_page(page))
    }
}

/// Encode `image` as PNG into a named temp file that lives as long as the handle.
fn write_png(image: &DynamicImage) -> Result<tempfile::NamedTempFile, String> {
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| format!("PNG encoding failed: {e}"))?;

    let mut file = tempfile::Builder::new()
        .prefix("offer-page-")
        .suffix(".png")
        .tempfile()
        .map_err(|e| format!("temp file: {e}"))?;
    file.write_all(&buf)
        .map_err(|e| format!("temp file write: {e}"))?;
    Ok(file)
}

/// Run `tesseract <image> stdout -l <language>` and return the recognised text.
fn run_tesseract(tesseract: &Path, image: &Path, language: &str) -> Result<String, String> {
    let output = Command::new(tesseract)
        .arg(image)
        .arg("stdout")
        .arg("-l")
        .arg(language)
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                format!(
                    "tesseract not found at '{}'. Install tesseract-ocr with the '{}' language pack",
                    tesseract.display(),
                    language
                )
            } else {
                format!("failed to run tesseract: {e}")
            }
        })?;

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("tesseract exited with code {code}: {}", stderr.trim()));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
