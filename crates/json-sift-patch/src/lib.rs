//! JSON patch creation and application.
//!
//! A [`JsonPatch`] is an ordered list of add/remove/replace operations, each
//! addressed by a [`JsonPointer`]. [`JsonPatch::create`] diffs two documents
//! into a patch that turns the first into the second, preferring a granular
//! patch over a wholesale replace whenever it would serialize smaller;
//! [`JsonPatch::apply`] runs a patch against a document.
//!
//! # Example
//!
//! ```
//! use json_sift_patch::JsonPatch;
//! use serde_json::json;
//!
//! let before = json!({"name": "Ed", "age": 41});
//! let after = json!({"name": "Ed", "age": 42});
//!
//! let patch = JsonPatch::create(&before, &after);
//! assert_eq!(patch.to_json_array(), json!([{"replace": "/age", "value": 42}]));
//! assert_eq!(patch.apply(&before).unwrap(), after);
//! ```

use json_sift_pointer::PointerError;
use serde_json::Value;
use thiserror::Error;

mod apply;
mod diff;
mod operation;
mod seq_diff;

pub use diff::CostModel;
pub use operation::{JsonPatchOperation, PatchOperationKind};
pub use seq_diff::{diff_ranges, DiffRange};

#[doc(no_inline)]
pub use json_sift_pointer::JsonPointer;

/// Errors produced when parsing or applying a patch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatchError {
    #[error("the root can only be replaced")]
    RootOnlyReplace,
    #[error("{name} was not found on {pointer:?}")]
    NotFound { name: String, pointer: String },
    #[error("{name} could not be added to {pointer:?}")]
    KeyExists { name: String, pointer: String },
    #[error("{name} is not a valid array index")]
    InvalidIndex { name: String },
    #[error("{index} is out of range for {pointer:?}")]
    OutOfRange { index: usize, pointer: String },
    #[error("a patch can only apply to an object or an array; the parent of {pointer:?} refers to {kind}")]
    InvalidParent { pointer: String, kind: &'static str },
    #[error("add and replace operations require a value")]
    MissingValue,
    #[error("remove operations cannot carry a value")]
    UnexpectedValue,
    #[error("{0}")]
    InvalidOperation(String),
    #[error(transparent)]
    Pointer(#[from] PointerError),
}

/// An ordered list of patch operations, optionally annotated with the
/// approximate number of serialized bytes the patch saves over resending the
/// whole document (negative when the patch is larger).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JsonPatch {
    operations: Vec<JsonPatchOperation>,
    byte_count_saved: Option<i64>,
}

impl JsonPatch {
    /// An empty, do-nothing patch.
    pub fn empty() -> Self {
        JsonPatch::default()
    }

    /// Creates a patch from a list of operations.
    pub fn new(operations: Vec<JsonPatchOperation>) -> Self {
        JsonPatch { operations, byte_count_saved: None }
    }

    /// Creates a patch with a known byte savings.
    pub fn with_byte_count(operations: Vec<JsonPatchOperation>, byte_count_saved: i64) -> Self {
        JsonPatch { operations, byte_count_saved: Some(byte_count_saved) }
    }

    /// Diffs `before` against `after` into a patch using the default cost
    /// model.
    pub fn create(before: &Value, after: &Value) -> Self {
        Self::create_with_costs(before, after, &CostModel::default())
    }

    /// Diffs `before` against `after` under a custom cost model.
    pub fn create_with_costs(before: &Value, after: &Value, costs: &CostModel) -> Self {
        let (operations, byte_count_saved) = diff::do_create(before, after, costs);
        JsonPatch::with_byte_count(operations, byte_count_saved)
    }

    /// Gets the operations, in application order.
    pub fn operations(&self) -> &[JsonPatchOperation] {
        &self.operations
    }

    /// The approximate number of bytes saved by the patch, if known.
    pub fn byte_count_saved(&self) -> Option<i64> {
        self.byte_count_saved
    }

    /// Returns true if the patch has no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Applies the patch to a clone of the document, leaving it untouched.
    pub fn apply(&self, before: &Value) -> Result<Value, PatchError> {
        let mut result = before.clone();
        self.apply_to(&mut result)?;
        Ok(result)
    }

    /// Applies the patch to the document in place.
    ///
    /// Operations run in order; on error, operations before the failing one
    /// have already been applied.
    pub fn apply_to(&self, document: &mut Value) -> Result<(), PatchError> {
        for operation in &self.operations {
            apply::apply_operation(document, operation)?;
        }
        Ok(())
    }

    /// Serializes the patch to a JSON array of operation objects.
    pub fn to_json_array(&self) -> Value {
        Value::Array(self.operations.iter().map(JsonPatchOperation::to_json_object).collect())
    }

    /// Parses a patch from a JSON array of operation objects.
    pub fn from_json_array(value: &Value) -> Result<Self, PatchError> {
        let items = value
            .as_array()
            .ok_or_else(|| PatchError::InvalidOperation("a patch must be an array".to_string()))?;
        let operations = items
            .iter()
            .map(JsonPatchOperation::from_json_object)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(JsonPatch::new(operations))
    }
}
