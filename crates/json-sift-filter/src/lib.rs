//! Path-based filtering of JSON documents.
//!
//! A [`JsonFilter`] is compiled once from a filter spec string and then
//! applied repeatedly: to whole trees with [`JsonFilter::filter_value`], to
//! typed values with [`JsonFilter::filter_object`], to write-event streams
//! with [`JsonFilter::filtered_writer`], or as a plain path predicate with
//! [`JsonFilter::is_path_included`].
//!
//! # Filter specs
//!
//! A spec is one or more paths separated by commas (or semicolons). Each
//! path is property names separated by periods; a path prefixed with `!` is
//! excluded rather than included. Groups expand Cartesian-style, and `*`
//! matches any property.
//!
//! ```
//! use json_sift_filter::JsonFilter;
//! use serde_json::json;
//!
//! let filter = JsonFilter::parse("name,!name.middle").unwrap();
//! let filtered = filter.filter_value(
//!     &json!({"id": 123, "name": {"first": "Ed", "middle": "James", "last": "Ball"}}),
//! );
//! assert_eq!(filtered, json!({"name": {"first": "Ed", "last": "Ball"}}));
//! ```
//!
//! Including a path excludes its unnamed siblings; excluding a path keeps
//! its siblings included. Matching is case-insensitive.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

mod node;
mod path;
mod writer;

pub use writer::{write_value, FilteredJsonWriter, JsonWriter, Scalar, ValueWriter};

use node::{should_include_property, FilterNode};
use path::{split_full_paths, PropertyPath, ANY_PROPERTY, EXCLUDE_PREFIX, PATH_SEPARATOR, PROPERTY_SEPARATOR};

/// Error returned by the throwing parse entry points.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("invalid filter syntax")]
    InvalidSyntax,
}

/// Filters data from JSON by path.
#[derive(Debug, PartialEq)]
pub struct JsonFilter {
    root: FilterNode,
}

impl JsonFilter {
    /// An empty filter; includes everything.
    pub fn empty() -> Self {
        JsonFilter { root: FilterNode::default() }
    }

    /// Attempts to create a filter from a spec string.
    ///
    /// Blank input yields the empty filter. Returns `None` when any path in
    /// the spec is invalid; a filter is never partially accepted.
    pub fn try_parse(value: &str) -> Option<Self> {
        Self::try_parse_with_root(value, "")
    }

    /// Attempts to create a filter, prefixing every path with `root_path`.
    ///
    /// Ancestor levels of the root are given synthetic `*` paths so that the
    /// containers above the rooted target are still traversed.
    pub fn try_parse_with_root(value: &str, root_path: &str) -> Option<Self> {
        if value.trim().is_empty() {
            return Some(Self::empty());
        }

        let mut paths: Vec<PropertyPath> = Vec::new();

        let root_path = if root_path.is_empty() { None } else { Some(root_path) };
        if let Some(root) = root_path {
            if root.contains(path::is_path_boundary) {
                return None;
            }

            let parsed_root = PropertyPath::try_parse(root, None)?;
            if parsed_root.is_excluded {
                return None;
            }

            let mut next_prefix = String::new();
            for root_part in &parsed_root.parts {
                paths.push(PropertyPath::try_parse(&format!("{next_prefix}{ANY_PROPERTY}"), None)?);
                next_prefix.push_str(root_part);
                next_prefix.push(PROPERTY_SEPARATOR);
            }
        }

        for full_path in split_full_paths(value) {
            paths.push(PropertyPath::try_parse(&full_path, root_path)?);
        }

        let mut root = FilterNode::default();
        for property_path in &paths {
            root.add_path(property_path);
        }
        Some(JsonFilter { root })
    }

    /// Creates a filter from a spec string, or fails with [`FilterError`].
    pub fn parse(value: &str) -> Result<Self, FilterError> {
        Self::try_parse(value).ok_or(FilterError::InvalidSyntax)
    }

    /// Like [`parse`](Self::parse), with a root path.
    pub fn parse_with_root(value: &str, root_path: &str) -> Result<Self, FilterError> {
        Self::try_parse_with_root(value, root_path).ok_or(FilterError::InvalidSyntax)
    }

    /// Creates a writer that filters events on their way to `inner`.
    pub fn filtered_writer<'a, W: JsonWriter + ?Sized>(
        &'a self,
        inner: &'a mut W,
    ) -> FilteredJsonWriter<'a, W> {
        FilteredJsonWriter::new(inner, &self.root)
    }

    /// Filters data from a tree, producing a new tree.
    pub fn filter_value(&self, value: &Value) -> Value {
        let mut builder = ValueWriter::new();
        {
            let mut filtered = self.filtered_writer(&mut builder);
            write_value(value, &mut filtered);
        }
        builder.into_value().unwrap_or(Value::Null)
    }

    /// Filters data from a typed value.
    ///
    /// Serializes the value, filters the tree, and deserializes the result
    /// back into the typed shape; filtered-out fields must therefore be
    /// optional in `T`.
    pub fn filter_object<T>(&self, value: &T) -> serde_json::Result<T>
    where
        T: Serialize + DeserializeOwned,
    {
        let tree = serde_json::to_value(value)?;
        serde_json::from_value(self.filter_value(&tree))
    }

    /// Determines whether the given dotted path is included by the filter.
    ///
    /// Fails closed: unparseable or excluded-form path text is not included.
    pub fn is_path_included(&self, path: &str) -> bool {
        let property_path = match PropertyPath::try_parse(path, None) {
            Some(parsed) if !parsed.is_excluded => parsed,
            _ => return false,
        };

        let mut node = &self.root;
        for part in &property_path.parts {
            let child = node.find_child(part);
            if !should_include_property(node, child) {
                return false;
            }
            match child {
                Some(child_node) => node = child_node,
                None => break,
            }
        }
        true
    }

    /// All assigned property paths in canonical order.
    ///
    /// Excluded paths start with the `!` prefix.
    pub fn property_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.root.render_children("", &mut out);
        out
    }
}

impl fmt::Display for JsonFilter {
    /// Converts the filter to a parsable, canonical string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join_paths(self.property_paths()))
    }
}

/// Prefixes a path with the standard exclusion marker.
pub fn exclude_path(path: &str) -> String {
    format!("{EXCLUDE_PREFIX}{path}")
}

/// Joins paths with the standard delimiter.
pub fn join_paths<I>(paths: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut out = String::new();
    for (index, path) in paths.into_iter().enumerate() {
        if index > 0 {
            out.push(PATH_SEPARATOR);
        }
        out.push_str(path.as_ref());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn canonical(spec: &str) -> Option<String> {
        JsonFilter::try_parse(spec).map(|filter| filter.to_string())
    }

    #[test]
    fn parse_and_canonicalize() {
        let cases: &[(&str, Option<&str>)] = &[
            ("", Some("")),
            (" ", Some("")),
            ("xyzzy", Some("xyzzy")),
            (" xyzzy ", Some("xyzzy")),
            ("!xyzzy", Some("!xyzzy")),
            ("! xyzzy", Some("!xyzzy")),
            ("xy.zzy", Some("xy.zzy")),
            (" xy . zzy ", Some("xy.zzy")),
            ("! xy . zzy", Some("!xy.zzy")),
            ("xy zzy", Some("xy zzy")),
            ("xy..zzy", None),
            ("xy..zzy,abc", None),
            ("xy.", None),
            (".zzy", None),
            (",abc,,def,", Some("abc,def")),
            ("abc,!def,ghi", Some("abc,!def,ghi")),
            (
                " xy . zzy ,! foo . bar , foo,!abcd,!efg.hij.lmn ",
                Some("!abcd,!efg.hij.lmn,foo,!foo.bar,xy.zzy"),
            ),
            (
                "items.(id,(request,response.(code,content))),next",
                Some("items.id,items.request,items.response.code,items.response.content,next"),
            ),
            ("(me,you).(first,last)", Some("me.first,me.last,you.first,you.last")),
            ("re(quest,sponse)", Some("request,response")),
            ("a.(b,!c,!(d,!e.f))", Some("a.b,!a.c,!a.d,a.e.f")),
            ("xyzzy,!xyzzy", Some("")),
            ("!xyzzy,abc,xyzzy,!def", Some("abc,!def")),
            ("!xyzzy,xyzzy,!xyzzy", Some("!xyzzy")),
            ("xyzzy,!xyzzy,xyzzy", Some("xyzzy")),
        ];

        for (spec, expected) in cases {
            let actual = canonical(spec);
            assert_eq!(actual.as_deref(), *expected, "canonical form of {spec:?}");
            if let Some(canonical_form) = actual {
                // canonicalization is idempotent
                assert_eq!(canonical(&canonical_form).as_deref(), Some(canonical_form.as_str()));
            }
        }
    }

    #[test]
    fn supports_semicolons() {
        assert_eq!(canonical("abc;!def,ghi;jkl").as_deref(), Some("abc,!def,ghi,jkl"));
    }

    #[test]
    fn parse_with_root_path() {
        let cases: &[(&str, &str, Option<&str>)] = &[
            ("xyzzy", "root.path", Some("*,root.*,root.path.xyzzy")),
            ("xyzzy", "", Some("xyzzy")),
            ("xyzzy", " ", None),
            ("xyzzy", "root.path.", None),
            ("xyzzy", "root..path", None),
            ("xyzzy", ".root.path", None),
            ("xyzzy", "root,path", None),
            (
                " xy . zzy ,! foo . bar , foo,!abcd,!efg.hij.lmn ",
                "root.path",
                Some("*,root.*,!root.path.abcd,!root.path.efg.hij.lmn,root.path.foo,!root.path.foo.bar,root.path.xy.zzy"),
            ),
        ];

        for (spec, root, expected) in cases {
            let actual = JsonFilter::try_parse_with_root(spec, root).map(|filter| filter.to_string());
            assert_eq!(actual.as_deref(), *expected, "root {root:?} spec {spec:?}");
            if let Some(canonical_form) = actual {
                assert_eq!(canonical(&canonical_form).as_deref(), Some(canonical_form.as_str()));
            }
        }
    }

    #[test]
    fn parse_reports_invalid_syntax() {
        assert_eq!(JsonFilter::parse("xy..zzy"), Err(FilterError::InvalidSyntax));
        assert!(JsonFilter::parse("xy.zzy").is_ok());
    }

    #[test]
    fn empty_filter_includes_everything() {
        let filter = JsonFilter::empty();
        assert!(filter.is_path_included("anything.at.all"));
        assert_eq!(filter.to_string(), "");

        let value = json!({"a": 1, "b": [2, 3]});
        assert_eq!(filter.filter_value(&value), value);
    }

    #[test]
    fn include_excludes_unnamed_siblings() {
        let filter = JsonFilter::parse("id").unwrap();
        assert!(filter.is_path_included("id"));
        assert!(!filter.is_path_included("name.first"));
    }

    #[test]
    fn exclude_keeps_unnamed_siblings() {
        let filter = JsonFilter::parse("!id").unwrap();
        assert!(!filter.is_path_included("id"));
        assert!(filter.is_path_included("name.first"));
    }

    #[test]
    fn include_with_nested_exclusion() {
        let filter = JsonFilter::parse("a,!a.b").unwrap();
        assert!(filter.is_path_included("a"));
        assert!(!filter.is_path_included("a.b"));
        assert!(filter.is_path_included("a.c"));
        assert!(!filter.is_path_included("d"));
    }

    #[test]
    fn excluded_form_path_fails_closed() {
        let filter = JsonFilter::parse("a").unwrap();
        assert!(!filter.is_path_included("!a"));
        assert!(!filter.is_path_included("a..b"));
    }

    #[test]
    fn filter_value_basic_scenario() {
        let filter = JsonFilter::parse("name,!name.middle").unwrap();
        let before = json!({"id": 123, "name": {"first": "Ed", "middle": "James", "last": "Ball"}});
        assert_eq!(
            filter.filter_value(&before),
            json!({"name": {"first": "Ed", "last": "Ball"}})
        );
    }

    #[test]
    fn filter_value_applies_inside_arrays() {
        let filter = JsonFilter::parse("items.id").unwrap();
        let before = json!({"items": [{"id": 1, "x": 2}, {"id": 3, "x": 4}], "next": "n"});
        assert_eq!(filter.filter_value(&before), json!({"items": [{"id": 1}, {"id": 3}]}));
    }

    #[test]
    fn wildcard_includes_any_property() {
        let filter = JsonFilter::parse("*,!name").unwrap();
        let before = json!({"id": 1, "name": "x", "other": true});
        assert_eq!(filter.filter_value(&before), json!({"id": 1, "other": true}));
    }

    #[test]
    fn root_path_filter_traverses_ancestors() {
        let filter = JsonFilter::try_parse_with_root("xyzzy", "root.path").unwrap();
        let before = json!({"sibling": 1, "root": {"path": {"xyzzy": 2, "other": 3}, "extra": 4}});
        assert_eq!(
            filter.filter_value(&before),
            json!({"sibling": 1, "root": {"path": {"xyzzy": 2}, "extra": 4}})
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        let filter = JsonFilter::parse("name").unwrap();
        let before = json!({"Name": "x", "id": 1});
        assert_eq!(filter.filter_value(&before), json!({"Name": "x"}));
        assert!(filter.is_path_included("NAME"));
    }

    #[test]
    fn path_helpers() {
        assert_eq!(exclude_path("a.b"), "!a.b");
        assert_eq!(join_paths(["a", "!b", "c.d"]), "a,!b,c.d");
        assert_eq!(join_paths(Vec::<String>::new()), "");
    }
}
