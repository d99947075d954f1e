//! Text-in/text-out helpers shared by the command-line tools.

use serde_json::Value;
use thiserror::Error;

use crate::{FilterError, JsonFilter, JsonPatch, PatchError};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Patch(#[from] PatchError),
    #[error("invalid filter: {0}")]
    Filter(#[from] FilterError),
}

/// Applies a patch (a JSON array of operations) to a document, returning the
/// patched document as JSON text.
pub fn apply_patch(document_json: &str, patch_json: &str) -> Result<String, CliError> {
    let mut document: Value = serde_json::from_str(document_json)?;
    let patch = JsonPatch::from_json_array(&serde_json::from_str(patch_json)?)?;
    patch.apply_to(&mut document)?;
    Ok(serde_json::to_string(&document)?)
}

/// Diffs two documents, returning the patch as a JSON array of operations.
pub fn create_patch(before_json: &str, after_json: &str) -> Result<String, CliError> {
    let before: Value = serde_json::from_str(before_json)?;
    let after: Value = serde_json::from_str(after_json)?;
    let patch = JsonPatch::create(&before, &after);
    Ok(serde_json::to_string(&patch.to_json_array())?)
}

/// Filters a document by a path filter, returning the filtered document as
/// JSON text.
pub fn filter_document(document_json: &str, filter_text: &str) -> Result<String, CliError> {
    let document: Value = serde_json::from_str(document_json)?;
    let filter = JsonFilter::parse(filter_text)?;
    Ok(serde_json::to_string(&filter.filter_value(&document))?)
}
