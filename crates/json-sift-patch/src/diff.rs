//! Creates a patch from a before/after document pair.
//!
//! The differ recurses into objects and arrays, producing the smaller of a
//! granular patch or a wholesale replace at every level. Savings are tracked
//! as the approximate number of serialized bytes the patch avoids resending
//! relative to the full "after" document.

use json_sift_pointer::JsonPointer;
use serde_json::Value;

use crate::seq_diff::diff_ranges;
use crate::JsonPatchOperation;

/// Byte-cost constants used when weighing a granular patch against a
/// wholesale replace.
///
/// The defaults approximate the serialized size of each operation's wire
/// framing; [`create`](crate::JsonPatch::create) uses them. Custom models are
/// only useful when the patch is serialized some other way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostModel {
    /// Savings of replacing a node wholesale. Any subtree patch that saves
    /// less than this is collapsed into a replace.
    pub replace_saved: i64,
    /// Savings per matched object property, plus the key length.
    pub object_key_saved: i64,
    /// Cost of removing an object property, plus the key length.
    pub object_remove_cost: i64,
    /// Cost of adding an object property (the value itself is counted
    /// separately).
    pub object_add_cost: i64,
    /// Cost of adding an array item, plus the index digit count.
    pub array_add_cost: i64,
    /// Cost of removing an array item, plus the index digit count.
    pub array_remove_cost: i64,
    /// Savings of the separator following each retained array item.
    pub item_separator: i64,
}

impl Default for CostModel {
    fn default() -> Self {
        CostModel {
            replace_saved: -24,     // {"replace":"","value":},
            object_key_saved: 4,    // "name":,
            object_remove_cost: 15, // {"remove":"/name"},
            object_add_cost: 18,    // {"add":/,"value"},
            array_add_cost: 21,     // {"add":"/123","value":},
            array_remove_cost: 15,  // {"remove":"/123"},
            item_separator: 1,
        }
    }
}

fn byte_count(value: &Value) -> i64 {
    serde_json::to_string(value).map_or(0, |text| text.len() as i64)
}

/// Recursively diffs `before` against `after`, returning the operations and
/// the bytes saved. Falls back to a single root replace whenever the granular
/// patch would save fewer bytes.
pub(crate) fn do_create(
    before: &Value,
    after: &Value,
    costs: &CostModel,
) -> (Vec<JsonPatchOperation>, i64) {
    match (before, after) {
        (Value::Object(before_map), Value::Object(after_map)) => {
            let mut operations = Vec::new();
            let mut saved: i64 = 0;

            for (key, before_value) in before_map {
                let pointer = JsonPointer::new(vec![key.clone()]);
                if let Some(after_value) = after_map.get(key) {
                    let (child_operations, child_saved) =
                        do_create(before_value, after_value, costs);
                    saved += child_saved;
                    saved += costs.object_key_saved + key.len() as i64;
                    // child pointers grow by "/key"
                    saved -= (key.len() as i64 + 1) * child_operations.len() as i64;
                    operations
                        .extend(child_operations.into_iter().map(|op| op.rebase(&pointer)));
                } else {
                    operations.push(JsonPatchOperation::remove(pointer));
                    saved -= costs.object_remove_cost + key.len() as i64;
                }
            }

            for (key, after_value) in after_map {
                if !before_map.contains_key(key) {
                    operations.push(JsonPatchOperation::add(
                        JsonPointer::new(vec![key.clone()]),
                        after_value.clone(),
                    ));
                    saved -= costs.object_add_cost;
                }
            }

            if saved >= costs.replace_saved {
                return (operations, saved);
            }
        }
        (Value::Array(before_items), Value::Array(after_items)) => {
            let mut operations = Vec::new();
            let mut saved: i64 = 0;

            // walk the mismatch spans end to start so that edits near the
            // start don't shift the indices used near the end
            let ranges = diff_ranges(before_items, after_items, |a, b| a == b);
            let mut identical_end = after_items.len();
            for range in ranges.iter().rev() {
                for item in &after_items[range.second_start + range.second_len..identical_end] {
                    saved += byte_count(item) + costs.item_separator;
                }
                identical_end = range.second_start;

                let replace_count = range.first_len.min(range.second_len);
                if range.second_len > range.first_len {
                    // all extra items insert at the same index, emitted in
                    // reverse so they land in order
                    let pointer_text = (range.first_start + replace_count).to_string();
                    for offset in (0..range.second_len - range.first_len).rev() {
                        let item = after_items[range.second_start + replace_count + offset].clone();
                        operations.push(JsonPatchOperation::add(
                            JsonPointer::new(vec![pointer_text.clone()]),
                            item,
                        ));
                        saved -= costs.array_add_cost + pointer_text.len() as i64;
                    }
                } else {
                    for offset in (0..range.first_len - range.second_len).rev() {
                        let pointer_text =
                            (range.first_start + replace_count + offset).to_string();
                        saved -= costs.array_remove_cost + pointer_text.len() as i64;
                        operations
                            .push(JsonPatchOperation::remove(JsonPointer::new(vec![pointer_text])));
                    }
                }

                for offset in (0..replace_count).rev() {
                    let pointer_index = range.first_start + offset;
                    let (child_operations, child_saved) = do_create(
                        &before_items[pointer_index],
                        &after_items[range.second_start + offset],
                        costs,
                    );
                    let pointer_text = pointer_index.to_string();
                    saved += child_saved;
                    saved += costs.item_separator + pointer_text.len() as i64;
                    saved -= (pointer_text.len() as i64 + 1) * child_operations.len() as i64;
                    let pointer = JsonPointer::new(vec![pointer_text]);
                    operations
                        .extend(child_operations.into_iter().map(|op| op.rebase(&pointer)));
                }
            }
            for item in &after_items[..identical_end] {
                saved += byte_count(item) + costs.item_separator;
            }

            if saved >= costs.replace_saved {
                return (operations, saved);
            }
        }
        _ => {
            if before == after {
                return (Vec::new(), byte_count(after));
            }
        }
    }

    let replace =
        vec![JsonPatchOperation::replace(JsonPointer::root(), after.clone())];
    (replace, costs.replace_saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PatchOperationKind;
    use serde_json::json;

    #[test]
    fn equal_scalars_save_their_byte_count() {
        let (operations, saved) = do_create(&json!("hello"), &json!("hello"), &CostModel::default());
        assert!(operations.is_empty());
        assert_eq!(saved, 7); // "hello"

        let (operations, saved) = do_create(&json!(12345), &json!(12345), &CostModel::default());
        assert!(operations.is_empty());
        assert_eq!(saved, 5);
    }

    #[test]
    fn unequal_scalars_replace_wholesale() {
        let (operations, saved) = do_create(&json!(1), &json!(2), &CostModel::default());
        assert_eq!(saved, -24);
        assert_eq!(
            operations,
            [JsonPatchOperation::replace(JsonPointer::root(), json!(2))]
        );
    }

    #[test]
    fn type_change_replaces_wholesale() {
        let (operations, saved) = do_create(&json!({"a": 1}), &json!([1]), &CostModel::default());
        assert_eq!(saved, -24);
        assert_eq!(operations.len(), 1);
        assert_eq!(operations[0].kind(), PatchOperationKind::Replace);
    }

    #[test]
    fn small_array_patch_collapses_to_replace() {
        // two nested replaces would cost twice the wholesale replace
        let (operations, saved) = do_create(&json!([2, 4]), &json!([6, 8]), &CostModel::default());
        assert_eq!(saved, -24);
        assert_eq!(
            operations,
            [JsonPatchOperation::replace(JsonPointer::root(), json!([6, 8]))]
        );
    }

    #[test]
    fn single_item_replace_ties_with_wholesale() {
        // one nested replace saves exactly the replace threshold, so the
        // granular patch wins the tie
        let (operations, saved) = do_create(&json!([12]), &json!([24]), &CostModel::default());
        assert_eq!(saved, -24);
        assert_eq!(
            operations,
            [JsonPatchOperation::replace(
                JsonPointer::parse("/0").unwrap(),
                json!(24)
            )]
        );
    }
}
