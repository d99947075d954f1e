//! Applies patch operations to a document in place.

use json_sift_pointer::{parse_index, JsonPointer};
use serde_json::Value;

use crate::{JsonPatchOperation, PatchError, PatchOperationKind};

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Applies one operation to the document, mutating it in place.
pub(crate) fn apply_operation(
    document: &mut Value,
    operation: &JsonPatchOperation,
) -> Result<(), PatchError> {
    let Some((name, parent_names)) = operation.pointer.names().split_last() else {
        // only a replace can target the whole document
        return match (&operation.kind, &operation.value) {
            (PatchOperationKind::Replace, Some(value)) => {
                *document = value.clone();
                Ok(())
            }
            _ => Err(PatchError::RootOnlyReplace),
        };
    };

    let parent_pointer = JsonPointer::new(parent_names.to_vec());
    let parent = match parent_pointer.evaluate_mut(document) {
        Some(parent) => parent,
        None => {
            return Err(PatchError::InvalidParent {
                pointer: operation.pointer.to_string(),
                kind: "nothing",
            });
        }
    };

    match parent {
        Value::Object(map) => match &operation.kind {
            PatchOperationKind::Remove => {
                if map.shift_remove(name).is_none() {
                    return Err(PatchError::NotFound {
                        name: name.clone(),
                        pointer: parent_pointer.to_string(),
                    });
                }
            }
            PatchOperationKind::Add => {
                if map.contains_key(name) {
                    return Err(PatchError::KeyExists {
                        name: name.clone(),
                        pointer: parent_pointer.to_string(),
                    });
                }
                map.insert(name.clone(), required_value(operation)?);
            }
            PatchOperationKind::Replace => {
                if !map.contains_key(name) {
                    return Err(PatchError::NotFound {
                        name: name.clone(),
                        pointer: parent_pointer.to_string(),
                    });
                }
                map.insert(name.clone(), required_value(operation)?);
            }
        },
        Value::Array(items) => {
            let index =
                parse_index(name).ok_or_else(|| PatchError::InvalidIndex { name: name.clone() })?;
            match &operation.kind {
                PatchOperationKind::Remove => {
                    if index >= items.len() {
                        return Err(PatchError::OutOfRange {
                            index,
                            pointer: parent_pointer.to_string(),
                        });
                    }
                    items.remove(index);
                }
                PatchOperationKind::Add => {
                    if index > items.len() {
                        return Err(PatchError::OutOfRange {
                            index,
                            pointer: parent_pointer.to_string(),
                        });
                    }
                    items.insert(index, required_value(operation)?);
                }
                PatchOperationKind::Replace => {
                    if index >= items.len() {
                        return Err(PatchError::OutOfRange {
                            index,
                            pointer: parent_pointer.to_string(),
                        });
                    }
                    items[index] = required_value(operation)?;
                }
            }
        }
        scalar => {
            return Err(PatchError::InvalidParent {
                pointer: operation.pointer.to_string(),
                kind: kind_name(scalar),
            });
        }
    }

    Ok(())
}

fn required_value(operation: &JsonPatchOperation) -> Result<Value, PatchError> {
    operation.value.clone().ok_or(PatchError::MissingValue)
}
