//! json-sift — JSON pointers, path filters, and minimal-edit patches.
//!
//! Re-exports the member crates:
//!
//! - [`JsonPointer`] addresses a single node within a JSON document.
//! - [`JsonFilter`] includes or excludes parts of a document by property
//!   path.
//! - [`JsonPatch`] diffs two documents into add/remove/replace operations
//!   and applies them.

pub use json_sift_filter::{FilterError, JsonFilter};
pub use json_sift_patch::{
    CostModel, JsonPatch, JsonPatchOperation, PatchError, PatchOperationKind,
};
pub use json_sift_pointer::{JsonPointer, PointerError};

pub mod cli;
