//! A single patch operation and its wire shape.

use json_sift_pointer::JsonPointer;
use serde_json::{Map, Value};

use crate::PatchError;

/// The kind of patch operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOperationKind {
    /// Adds a node to the document.
    Add,
    /// Removes a node from the document.
    Remove,
    /// Replaces a node in the document.
    Replace,
}

impl PatchOperationKind {
    fn as_str(self) -> &'static str {
        match self {
            PatchOperationKind::Add => "add",
            PatchOperationKind::Remove => "remove",
            PatchOperationKind::Replace => "replace",
        }
    }
}

/// One Add/Remove/Replace instruction tied to a pointer.
///
/// A value is required for Add and Replace and must be absent for Remove;
/// the constructor enforces this, so an operation is well formed once built.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonPatchOperation {
    pub(crate) kind: PatchOperationKind,
    pub(crate) pointer: JsonPointer,
    pub(crate) value: Option<Value>,
}

impl JsonPatchOperation {
    /// Creates an operation, validating the kind/value combination.
    pub fn new(
        kind: PatchOperationKind,
        pointer: JsonPointer,
        value: Option<Value>,
    ) -> Result<Self, PatchError> {
        match kind {
            PatchOperationKind::Add | PatchOperationKind::Replace => {
                if value.is_none() {
                    return Err(PatchError::MissingValue);
                }
            }
            PatchOperationKind::Remove => {
                if value.is_some() {
                    return Err(PatchError::UnexpectedValue);
                }
            }
        }
        Ok(JsonPatchOperation { kind, pointer, value })
    }

    /// Creates an Add operation.
    pub fn add(pointer: JsonPointer, value: Value) -> Self {
        JsonPatchOperation { kind: PatchOperationKind::Add, pointer, value: Some(value) }
    }

    /// Creates a Remove operation.
    pub fn remove(pointer: JsonPointer) -> Self {
        JsonPatchOperation { kind: PatchOperationKind::Remove, pointer, value: None }
    }

    /// Creates a Replace operation.
    pub fn replace(pointer: JsonPointer, value: Value) -> Self {
        JsonPatchOperation { kind: PatchOperationKind::Replace, pointer, value: Some(value) }
    }

    pub fn kind(&self) -> PatchOperationKind {
        self.kind
    }

    pub fn pointer(&self) -> &JsonPointer {
        &self.pointer
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Re-roots the operation under the given ancestor pointer.
    pub(crate) fn rebase(self, prefix: &JsonPointer) -> Self {
        JsonPatchOperation {
            kind: self.kind,
            pointer: prefix.concat(&self.pointer),
            value: self.value,
        }
    }

    /// Serializes the operation to its wire object, e.g.
    /// `{"add":"/ptr","value":…}` or `{"remove":"/ptr"}`.
    pub fn to_json_object(&self) -> Value {
        let mut object = Map::new();
        object.insert(self.kind.as_str().to_string(), Value::String(self.pointer.to_string()));
        if let Some(value) = &self.value {
            object.insert("value".to_string(), value.clone());
        }
        Value::Object(object)
    }

    /// Parses an operation from its wire object.
    ///
    /// Exactly one of `add`/`remove`/`replace` must be present (a string
    /// pointer), with `value` required for add/replace and forbidden for
    /// remove. Unknown keys or wrong types fail the parse.
    pub fn from_json_object(object: &Value) -> Result<Self, PatchError> {
        let map = object
            .as_object()
            .ok_or_else(|| PatchError::InvalidOperation("operation must be an object".to_string()))?;

        let mut kind_and_pointer: Option<(PatchOperationKind, &Value)> = None;
        let mut value: Option<&Value> = None;

        for (key, entry) in map {
            let kind = match key.as_str() {
                "add" => PatchOperationKind::Add,
                "remove" => PatchOperationKind::Remove,
                "replace" => PatchOperationKind::Replace,
                "value" => {
                    value = Some(entry);
                    continue;
                }
                other => {
                    return Err(PatchError::InvalidOperation(format!("unknown key: {other}")));
                }
            };
            if kind_and_pointer.is_some() {
                return Err(PatchError::InvalidOperation(
                    "operation must have exactly one of add, remove, or replace".to_string(),
                ));
            }
            kind_and_pointer = Some((kind, entry));
        }

        let (kind, pointer_value) = kind_and_pointer.ok_or_else(|| {
            PatchError::InvalidOperation(
                "operation must have one of add, remove, or replace".to_string(),
            )
        })?;
        let pointer_text = pointer_value
            .as_str()
            .ok_or_else(|| PatchError::InvalidOperation("pointer must be a string".to_string()))?;
        let pointer = JsonPointer::parse(pointer_text)?;

        Self::new(kind, pointer, value.cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pointer(text: &str) -> JsonPointer {
        JsonPointer::parse(text).unwrap()
    }

    #[test]
    fn constructor_validates_value_presence() {
        assert!(JsonPatchOperation::new(PatchOperationKind::Add, pointer("/a"), None).is_err());
        assert!(JsonPatchOperation::new(PatchOperationKind::Replace, pointer("/a"), None).is_err());
        assert!(
            JsonPatchOperation::new(PatchOperationKind::Remove, pointer("/a"), Some(json!(1)))
                .is_err()
        );
        // a JSON null is still a value
        assert!(
            JsonPatchOperation::new(PatchOperationKind::Add, pointer("/a"), Some(json!(null)))
                .is_ok()
        );
    }

    #[test]
    fn wire_shape_round_trips() {
        let operations = [
            JsonPatchOperation::add(pointer("/a"), json!({"b": 1})),
            JsonPatchOperation::remove(pointer("/a/0")),
            JsonPatchOperation::replace(JsonPointer::root(), json!([1, 2])),
        ];
        for operation in operations {
            let wire = operation.to_json_object();
            assert_eq!(JsonPatchOperation::from_json_object(&wire).unwrap(), operation);
        }
    }

    #[test]
    fn wire_shape_examples() {
        assert_eq!(
            JsonPatchOperation::add(pointer("/baz"), json!("qux")).to_json_object(),
            json!({"add": "/baz", "value": "qux"})
        );
        assert_eq!(
            JsonPatchOperation::remove(pointer("/baz")).to_json_object(),
            json!({"remove": "/baz"})
        );
    }

    #[test]
    fn invalid_wire_shapes_fail() {
        let invalid = [
            json!([]),
            json!({}),
            json!({"add": "/a"}),
            json!({"remove": "/a", "value": 1}),
            json!({"replace": "/a"}),
            json!({"add": "/a", "remove": "/b", "value": 1}),
            json!({"add": 5, "value": 1}),
            json!({"add": "not-a-pointer", "value": 1}),
            json!({"frobnicate": "/a"}),
        ];
        for wire in invalid {
            assert!(JsonPatchOperation::from_json_object(&wire).is_err(), "{wire}");
        }
    }
}
