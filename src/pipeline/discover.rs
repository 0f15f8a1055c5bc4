//! Input discovery: list the documents to process.

use crate::error::OfferError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// List regular files in `dir` whose extension matches `extension`.
///
/// Non-recursive. The extension comparison ignores case and a leading dot,
/// so `pdf`, `.pdf` and `PDF` are equivalent. Results are sorted by file name
/// so repeated runs over the same folder see the same order.
pub async fn discover_documents(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, OfferError> {
    let wanted = extension.trim_start_matches('.');
    let read_failed = |source| OfferError::ReadFailed {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(read_failed)?;
    let mut found = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(read_failed)? {
        let path = entry.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(wanted));
        if !matches {
            continue;
        }
        // Follows symlinks, so a link to a PDF counts.
        let is_file = tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if is_file {
            found.push(path);
        }
    }

    found.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!("Discovered {} '.{}' file(s) in {}", found.len(), wanted, dir.display());
    Ok(found)
}

/// Artifact stem for each discovered path, in the same order.
///
/// Usually the file stem. Discovery ignores extension case, so `site.pdf` and
/// `site.PDF` can both be listed; every path whose stem is shared keeps its
/// extension as well (`site_pdf`, `site_PDF`) so their artifacts never collide.
pub fn artifact_stems(paths: &[PathBuf]) -> Vec<String> {
    let stem_of = |p: &Path| {
        p.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    };

    let mut seen: HashMap<String, usize> = HashMap::new();
    for path in paths {
        *seen.entry(stem_of(path)).or_default() += 1;
    }

    paths
        .iter()
        .map(|path| {
            let stem = stem_of(path);
            match path.extension() {
                Some(ext) if seen.get(&stem).copied().unwrap_or(0) > 1 => {
                    format!("{stem}_{}", ext.to_string_lossy())
                }
                _ => stem,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"%PDF-1.4").unwrap();
    }

    #[tokio::test]
    async fn lists_matching_files_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "b.pdf");
        touch(tmp.path(), "a.PDF");
        touch(tmp.path(), "notes.txt");
        std::fs::create_dir(tmp.path().join("nested.pdf")).unwrap();

        let found = discover_documents(tmp.path(), "pdf").await.unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.PDF", "b.pdf"]);
    }

    #[tokio::test]
    async fn same_stem_with_different_case_gets_distinct_artifact_stems() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "site.pdf");
        touch(tmp.path(), "site.PDF");
        touch(tmp.path(), "annex.pdf");

        let found = discover_documents(tmp.path(), "pdf").await.unwrap();
        assert_eq!(found.len(), 3);

        let mut stems = artifact_stems(&found);
        stems.sort();
        assert_eq!(stems, vec!["annex", "site_PDF", "site_pdf"]);
    }

    #[test]
    fn unique_stems_are_left_alone() {
        let paths = vec![PathBuf::from("in/a.pdf"), PathBuf::from("in/b.PDF")];
        assert_eq!(artifact_stems(&paths), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn does_not_descend_into_subdirectories() {
        let tmp = tempfile::tempdir().unwrap();
        let sub = tmp.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        touch(&sub, "deep.pdf");

        let found = discover_documents(tmp.path(), ".pdf").await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn missing_directory_is_read_error() {
        let err = discover_documents(Path::new("/no/such/offer/dir"), "pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, OfferError::ReadFailed { .. }));
    }
}
