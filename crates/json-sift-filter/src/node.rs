//! The filter trie.
//!
//! Each node corresponds to one path segment and carries a tri-state
//! inclusion decision. Conflicting leaf assignments (`foo` then `!foo`)
//! cancel back to [`Inclusion::Unset`] rather than erroring, which is what
//! makes `!xyzzy,xyzzy,!xyzzy` collapse to `!xyzzy`.

use indexmap::IndexMap;

use crate::path::{PropertyPath, ANY_PROPERTY, EXCLUDE_PREFIX, PROPERTY_SEPARATOR};

/// Tri-state inclusion decision carried by each trie node.
///
/// A three-valued enum, not `Option<bool>`: `Unset` is a real state produced
/// by cancellation and the decision logic matches on it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Inclusion {
    Included,
    Excluded,
    #[default]
    Unset,
}

/// One node of the filter trie.
///
/// Children are keyed case-insensitively (lowercased key, original casing
/// kept for rendering). A `*` child is the wildcard, consulted only when no
/// exact-name child matches.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct FilterNode {
    name: String,
    inclusion: Inclusion,
    children: IndexMap<String, FilterNode>,
}

impl FilterNode {
    pub fn inclusion(&self) -> Inclusion {
        self.inclusion
    }

    /// Finds the child for a property name, falling back to the wildcard.
    pub fn find_child(&self, name: &str) -> Option<&FilterNode> {
        self.children
            .get(&name.to_lowercase())
            .or_else(|| self.children.get(ANY_PROPERTY))
    }

    /// Inserts a parsed path, creating intermediate nodes as needed.
    pub fn add_path(&mut self, path: &PropertyPath) {
        self.add_parts(&path.parts, path.is_excluded);
    }

    fn add_parts(&mut self, parts: &[String], is_excluded: bool) {
        let (first, rest) = match parts.split_first() {
            Some(split) => split,
            None => return,
        };

        let child = self
            .children
            .entry(first.to_lowercase())
            .or_insert_with(|| FilterNode {
                name: first.clone(),
                ..FilterNode::default()
            });

        if rest.is_empty() {
            let assigned = if is_excluded { Inclusion::Excluded } else { Inclusion::Included };
            child.inclusion = match child.inclusion {
                Inclusion::Unset => assigned,
                current if current == assigned => current,
                _ => Inclusion::Unset,
            };
        } else {
            child.add_parts(rest, is_excluded);
        }
    }

    /// True if this node or any descendant is explicitly included.
    pub fn is_any_included(&self) -> bool {
        self.inclusion == Inclusion::Included
            || self.children.values().any(FilterNode::is_any_included)
    }

    /// True if any sibling of `child` (any child of `self` when `child` is
    /// `None`) resolves to included, directly or transitively.
    ///
    /// Explicit states win over transitive ones: an explicitly excluded
    /// sibling stops the scan before ambiguous siblings are consulted.
    pub fn is_sibling_included(&self, child: Option<&FilterNode>) -> bool {
        let siblings = || {
            self.children.values().filter(|sibling| match child {
                Some(child) => !std::ptr::eq(*sibling, child),
                None => true,
            })
        };

        if siblings().any(|sibling| sibling.inclusion == Inclusion::Included) {
            true
        } else if siblings().any(|sibling| sibling.inclusion == Inclusion::Excluded) {
            false
        } else {
            siblings().any(|sibling| sibling.is_sibling_included(None))
        }
    }

    /// Renders all assigned paths, sorted by segment at each level, excluded
    /// paths prefixed with `!`.
    pub fn render_children(&self, prefix: &str, out: &mut Vec<String>) {
        let mut keys: Vec<&String> = self.children.keys().collect();
        keys.sort();

        for key in keys {
            let child = &self.children[key.as_str()];
            let full_name = format!("{prefix}{}", child.name);

            match child.inclusion {
                Inclusion::Included => out.push(full_name.clone()),
                Inclusion::Excluded => out.push(format!("{EXCLUDE_PREFIX}{full_name}")),
                Inclusion::Unset => {}
            }

            child.render_children(&format!("{full_name}{PROPERTY_SEPARATOR}"), out);
        }
    }
}

/// The three-step inclusion decision for a candidate property under `node`.
///
/// 1. A child with any included descendant is included.
/// 2. A child explicitly excluded is excluded.
/// 3. Otherwise the property is included only when no sibling resolves to
///    included; this is what makes `a,!a.b` mean "a except a.b".
pub(crate) fn should_include_property(node: &FilterNode, child: Option<&FilterNode>) -> bool {
    if let Some(child_node) = child {
        if child_node.is_any_included() {
            return true;
        }
        if child_node.inclusion() == Inclusion::Excluded {
            return false;
        }
    }

    !node.is_sibling_included(child)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_with(paths: &[&str]) -> FilterNode {
        let mut root = FilterNode::default();
        for path in paths {
            root.add_path(&PropertyPath::try_parse(path, None).unwrap());
        }
        root
    }

    #[test]
    fn conflicting_assignments_cancel() {
        let root = node_with(&["xyzzy", "!xyzzy"]);
        let child = root.find_child("xyzzy").unwrap();
        assert_eq!(child.inclusion(), Inclusion::Unset);
    }

    #[test]
    fn reassignment_after_cancel_sticks() {
        let root = node_with(&["!xyzzy", "xyzzy", "!xyzzy"]);
        let child = root.find_child("xyzzy").unwrap();
        assert_eq!(child.inclusion(), Inclusion::Excluded);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let root = node_with(&["Name"]);
        assert!(root.find_child("name").is_some());
        assert!(root.find_child("NAME").is_some());
    }

    #[test]
    fn wildcard_matches_when_no_exact_child() {
        let root = node_with(&["*", "name.first"]);
        let wildcard = root.find_child("anything").unwrap();
        assert_eq!(wildcard.inclusion(), Inclusion::Included);
        let exact = root.find_child("name").unwrap();
        assert_eq!(exact.inclusion(), Inclusion::Unset);
        assert!(exact.is_any_included());
    }

    #[test]
    fn sibling_scan_prefers_explicit_states() {
        // only exclusions at this level: nothing is "included by a sibling"
        let root = node_with(&["!a", "!b"]);
        assert!(!root.is_sibling_included(None));

        let root = node_with(&["a", "!b"]);
        assert!(root.is_sibling_included(None));

        // ambiguous sibling with an included descendant counts
        let root = node_with(&["a.b"]);
        assert!(root.is_sibling_included(None));
    }

    #[test]
    fn renders_sorted_with_exclusion_prefix() {
        let root = node_with(&["xy.zzy", "!foo.bar", "foo", "!abcd", "!efg.hij.lmn"]);
        let mut out = Vec::new();
        root.render_children("", &mut out);
        assert_eq!(out, ["!abcd", "!efg.hij.lmn", "foo", "!foo.bar", "xy.zzy"]);
    }
}
