//! Fold extracted documents into the single text block sent to the model.
//!
//! Every document contributes a file marker naming it, followed by its
//! pages joined with a page-break marker:
//!
//! ```text
//! \n\n--- NEW FILE: site.pdf ---\n\n<page 1>\n\n--- PAGE BREAK ---\n\n<page 2>
//! ```
//!
//! Because each document's block is self-contained, consolidating `[A, B]`
//! and `[C]` separately and concatenating gives the same string as
//! consolidating `[A, B, C]`.

use crate::output::ExtractedDocument;

/// Separator placed between consecutive pages of one document.
pub const PAGE_SEPARATOR: &str = "\n\n--- PAGE BREAK ---\n\n";

/// File marker placed before each document's pages.
pub fn file_marker(filename: &str) -> String {
    format!("\n\n--- NEW FILE: {filename} ---\n\n")
}

/// Concatenate all documents in the given order.
///
/// A document with no pages still contributes its file marker but no text.
pub fn consolidate(documents: &[ExtractedDocument]) -> String {
    let mut out = String::new();
    for doc in documents {
        out.push_str(&file_marker(&doc.filename));
        for (i, page) in doc.pages.iter().enumerate() {
            if i > 0 {
                out.push_str(PAGE_SEPARATOR);
            }
            out.push_str(&page.content);
        }
    }
    out
}
