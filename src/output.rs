//! Data produced by a workflow run.

use crate::config::ExtractionMethod;
use crate::schema::ValidatedOffer;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// Text of one PDF page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// 1-indexed, contiguous within a document.
    pub page_number: usize,
    pub content: String,
}

/// All page texts of one input file, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// File name without directory, e.g. `site.pdf`.
    pub filename: String,
    pub extraction_method: ExtractionMethod,
    pub pages: Vec<Page>,
}

impl ExtractedDocument {
    /// Number pages `1..=N` in the order given.
    pub fn from_texts(
        filename: impl Into<String>,
        extraction_method: ExtractionMethod,
        texts: impl IntoIterator<Item = String>,
    ) -> Self {
        let pages = texts
            .into_iter()
            .enumerate()
            .map(|(i, content)| Page {
                page_number: i + 1,
                content,
            })
            .collect();
        Self {
            filename: filename.into(),
            extraction_method,
            pages,
        }
    }

    /// The file name without its extension, used to name the saved artifact.
    pub fn stem(&self) -> &str {
        std::path::Path::new(&self.filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.filename)
    }
}

/// What was sent to the provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowRequest {
    pub prompt: String,
    pub provider: String,
    pub model: String,
    pub source_filenames: Vec<String>,
}

/// Everything a successful run produced. Written once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowResult {
    pub request: WorkflowRequest,
    pub offer: ValidatedOffer,
    pub raw_response: Value,
    /// Serialised as ISO-8601.
    pub timestamp: DateTime<Local>,
}

/// Paths of the artifacts written by a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactPaths {
    pub extracted: Vec<PathBuf>,
    pub offer: PathBuf,
    pub complete_result: PathBuf,
}

/// How a run ended, when it did not fail.
#[derive(Debug, Clone)]
pub enum WorkflowOutcome {
    /// The input directory contained no matching documents.
    NoInput,
    /// The offer was validated and persisted.
    Completed {
        result: Box<WorkflowResult>,
        artifacts: ArtifactPaths,
    },
}

impl WorkflowOutcome {
    pub fn is_no_input(&self) -> bool {
        matches!(self, WorkflowOutcome::NoInput)
    }

    pub fn result(&self) -> Option<&WorkflowResult> {
        match self {
            WorkflowOutcome::Completed { result, .. } => Some(result),
            WorkflowOutcome::NoInput => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_are_numbered_from_one() {
        let doc = ExtractedDocument::from_texts(
            "site.pdf",
            ExtractionMethod::Text,
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
        );
        let numbers: Vec<_> = doc.pages.iter().map(|p| p.page_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(doc.stem(), "site");
    }

    #[test]
    fn extracted_document_json_shape() {
        let doc = ExtractedDocument::from_texts("a.pdf", ExtractionMethod::Ocr, vec!["x".into()]);
        let v = serde_json::to_value(&doc).unwrap();
        assert_eq!(v["extraction_method"], "ocr");
        assert_eq!(v["pages"][0]["page_number"], 1);
        assert_eq!(v["pages"][0]["content"], "x");
    }
}
