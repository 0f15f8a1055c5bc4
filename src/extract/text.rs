use super::{extract_pages, ExtractionStrategy};
use crate::config::ExtractionMethod;
use crate::error::OfferError;
use crate::output::ExtractedDocument;
use std::path::Path;

/// Reads each page's embedded text layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextLayerStrategy;

impl ExtractionStrategy for TextLayerStrategy {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Text
    }

    fn extract(&self, path: &Path) -> Result<ExtractedDocument, OfferError> {
        extract_pages(path, ExtractionMethod::Text, |page| {
            page.text()
                .map(|text| text.all())
                .map_err(|e| format!("text layer unreadable: {e:?}"))
        })
    }
}
