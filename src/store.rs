//! Persistence of run artifacts in the output folder.
//!
//! The folder is flat. Each save writes one pretty-printed JSON file and
//! never touches an existing artifact of another kind:
//!
//! | File                         | Content                               |
//! |------------------------------|---------------------------------------|
//! | `<stem>_extracted.json`      | one [`ExtractedDocument`]             |
//! | `filled_offer_<ts>.json`     | the [`ValidatedOffer`]                |
//! | `complete_result_<ts>.json`  | the full [`WorkflowResult`]           |
//! | `failed_response_<ts>.json`  | `{timestamp, error, response}`        |
//!
//! `<stem>` is the source file stem, or `<stem>_<ext>` when two inputs share
//! a stem. `<ts>` is the local time as `YYYYMMDD_HHMMSS`. Two runs writing to
//! the same folder within the same second will overwrite each other's offer
//! files.

use crate::error::OfferError;
use crate::output::{ExtractedDocument, WorkflowResult};
use crate::schema::{self, ValidatedOffer};
use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Prefix of the primary offer artifact.
pub const OFFER_PREFIX: &str = "filled_offer";
/// Prefix of the full-result debug artifact.
pub const COMPLETE_RESULT_PREFIX: &str = "complete_result";
/// Prefix of the artifact written when validation fails.
pub const FAILED_RESPONSE_PREFIX: &str = "failed_response";

/// `<prefix>_<YYYYMMDD_HHMMSS>.json`
pub fn artifact_name(prefix: &str, timestamp: &DateTime<Local>) -> String {
    format!("{prefix}_{}.json", timestamp.format("%Y%m%d_%H%M%S"))
}

/// Writes and reads artifacts in one output folder.
#[derive(Debug, Clone)]
pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save one extracted document as `<stem>_extracted.json`.
    ///
    /// The caller picks `stem` so that documents sharing a file stem get
    /// distinct names; see [`crate::pipeline::discover::artifact_stems`].
    pub async fn save_extracted(
        &self,
        doc: &ExtractedDocument,
        stem: &str,
    ) -> Result<PathBuf, OfferError> {
        let path = self.dir.join(format!("{stem}_extracted.json"));
        write_json(&path, doc).await?;
        debug!("Saved extracted data to {}", path.display());
        Ok(path)
    }

    /// Save the validated offer alone; this is the run's primary output.
    pub async fn save_offer(
        &self,
        offer: &ValidatedOffer,
        timestamp: &DateTime<Local>,
    ) -> Result<PathBuf, OfferError> {
        let path = self.dir.join(artifact_name(OFFER_PREFIX, timestamp));
        write_json(&path, offer).await?;
        info!("Saved filled offer to {}", path.display());
        Ok(path)
    }

    /// Save prompt, provider, raw response, offer and timestamp together.
    pub async fn save_complete_result(&self, result: &WorkflowResult) -> Result<PathBuf, OfferError> {
        let path = self
            .dir
            .join(artifact_name(COMPLETE_RESULT_PREFIX, &result.timestamp));
        write_json(&path, result).await?;
        debug!("Saved complete result to {}", path.display());
        Ok(path)
    }

    /// Save a response that failed validation, with the error that rejected it.
    pub async fn save_failed_response(
        &self,
        response: &Value,
        error: &str,
        timestamp: &DateTime<Local>,
    ) -> Result<PathBuf, OfferError> {
        let path = self.dir.join(artifact_name(FAILED_RESPONSE_PREFIX, timestamp));
        let record = json!({
            "timestamp": timestamp.to_rfc3339(),
            "error": error,
            "response": response,
        });
        write_json(&path, &record).await?;
        info!("Saved failed response to {}", path.display());
        Ok(path)
    }

    /// Read a saved offer and run it through validation again.
    pub async fn load_offer(path: &Path) -> Result<ValidatedOffer, OfferError> {
        let value = Self::load_json(path).await?;
        schema::validate(&value).map_err(OfferError::Validation)
    }

    /// Read any JSON artifact.
    pub async fn load_json(path: &Path) -> Result<Value, OfferError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| OfferError::ReadFailed {
                path: path.to_path_buf(),
                source,
            })?;
        serde_json::from_str(&text).map_err(|source| OfferError::ArtifactParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Pretty-print `value` to `path` via a temp file and rename, creating the
/// folder if needed.
async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), OfferError> {
    let write_failed = |source| OfferError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(write_failed)?;
    }

    let mut bytes = serde_json::to_vec_pretty(value)?;
    bytes.push(b'\n');

    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, &bytes).await.map_err(write_failed)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_failed)?;
    Ok(())
}
