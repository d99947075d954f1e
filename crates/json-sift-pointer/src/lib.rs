//! JSON Pointer utilities.
//!
//! A [`JsonPointer`] addresses a single node within a JSON document as an
//! immutable sequence of segments (property names and/or array indices).
//!
//! The textual form is `/`-prefixed, `/`-joined segments. Only the `/`
//! character is percent-escaped (as `%2F`); any other percent sequence passes
//! through verbatim in both directions, so `%20` stays `%20`.
//!
//! # Example
//!
//! ```
//! use json_sift_pointer::JsonPointer;
//! use serde_json::json;
//!
//! let pointer = JsonPointer::parse("/foo/0").unwrap();
//! assert_eq!(pointer.names(), ["foo", "0"]);
//!
//! let doc = json!({"foo": [42]});
//! assert_eq!(pointer.evaluate(&doc), Some(&json!(42)));
//! assert_eq!(pointer.to_string(), "/foo/0");
//! ```

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Errors produced when parsing a JSON pointer from text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PointerError {
    #[error("a non-root pointer must start with a slash")]
    MissingLeadingSlash,
    #[error("none of the names may be empty")]
    EmptyName,
}

/// Points to a specific node within a JSON document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JsonPointer {
    names: Vec<String>,
}

impl JsonPointer {
    /// Creates a pointer from the given property names and/or array indices.
    pub fn new(names: Vec<String>) -> Self {
        JsonPointer { names }
    }

    /// The root pointer (empty segment list).
    pub fn root() -> Self {
        JsonPointer { names: Vec::new() }
    }

    /// Parses a JSON pointer.
    ///
    /// The empty string is the root pointer. Any other text must start with
    /// a slash and must not contain empty segments.
    pub fn parse(text: &str) -> Result<Self, PointerError> {
        if text.is_empty() {
            return Ok(Self::root());
        }
        if !text.starts_with('/') {
            return Err(PointerError::MissingLeadingSlash);
        }

        let mut names = Vec::new();
        for segment in text.split('/').skip(1) {
            let name = decode_segment(segment);
            if name.is_empty() {
                return Err(PointerError::EmptyName);
            }
            names.push(name);
        }
        Ok(JsonPointer { names })
    }

    /// Attempts to parse a JSON pointer, returning `None` on invalid text.
    pub fn try_parse(text: &str) -> Option<Self> {
        Self::parse(text).ok()
    }

    /// Gets the property names and/or array indices.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns true if this is the root pointer.
    pub fn is_root(&self) -> bool {
        self.names.is_empty()
    }

    /// Gets the parent pointer, or `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, parent) = self.names.split_last()?;
        Some(JsonPointer { names: parent.to_vec() })
    }

    /// Concatenates two pointers.
    pub fn concat(&self, other: &JsonPointer) -> Self {
        let mut names = self.names.clone();
        names.extend(other.names.iter().cloned());
        JsonPointer { names }
    }

    /// Evaluates the pointer against a document.
    ///
    /// Objects are looked up by exact name; arrays by non-negative decimal
    /// index. Returns `None` as soon as a segment does not resolve, including
    /// when a scalar is reached while segments remain.
    pub fn evaluate<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        let mut current = value;
        for name in &self.names {
            match current {
                Value::Object(map) => current = map.get(name)?,
                Value::Array(items) => current = items.get(parse_index(name)?)?,
                _ => return None,
            }
        }
        Some(current)
    }

    /// Mutable variant of [`evaluate`](Self::evaluate).
    pub fn evaluate_mut<'a>(&self, value: &'a mut Value) -> Option<&'a mut Value> {
        let mut current = value;
        for name in &self.names {
            match current {
                Value::Object(map) => current = map.get_mut(name)?,
                Value::Array(items) => current = items.get_mut(parse_index(name)?)?,
                _ => return None,
            }
        }
        Some(current)
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in &self.names {
            f.write_str("/")?;
            f.write_str(&encode_segment(name))?;
        }
        Ok(())
    }
}

/// Checks that a segment is a valid non-negative decimal array index.
///
/// Signs, whitespace, and non-digit characters are all rejected; indices that
/// overflow `usize` fail the parse.
pub fn parse_index(name: &str) -> Option<usize> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

/// Unescapes a pointer segment. Only `%2F`/`%2f` decodes (to `/`); all other
/// percent sequences pass through verbatim.
pub fn decode_segment(segment: &str) -> String {
    if !segment.contains('%') {
        return segment.to_string();
    }
    let mut out = String::with_capacity(segment.len());
    let bytes = segment.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && bytes[i + 1] == b'2'
            && (bytes[i + 2] == b'F' || bytes[i + 2] == b'f')
        {
            out.push('/');
            i += 3;
        } else {
            // %  and anything after it are plain ASCII here; multi-byte chars
            // never start with b'%' so char boundaries are preserved
            let ch_len = segment[i..].chars().next().map_or(1, char::len_utf8);
            out.push_str(&segment[i..i + ch_len]);
            i += ch_len;
        }
    }
    out
}

/// Escapes a pointer segment. Only `/` is escaped, as uppercase `%2F`.
pub fn encode_segment(segment: &str) -> String {
    if !segment.contains('/') {
        return segment.to_string();
    }
    segment.replace('/', "%2F")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_pointers() {
        let cases: &[(&str, &[&str], Option<&str>)] = &[
            ("", &[], None),
            ("/foo", &["foo"], None),
            ("/foo/another%20prop", &["foo", "another%20prop"], None),
            ("/foo/anArray/0", &["foo", "anArray", "0"], None),
            ("/foo/has%2fslash", &["foo", "has/slash"], Some("/foo/has%2Fslash")),
            ("/foo/has%2Fslash", &["foo", "has/slash"], None),
        ];
        for (text, names, round_trip) in cases {
            let pointer = JsonPointer::parse(text).unwrap();
            assert_eq!(pointer.names(), *names, "names for {text:?}");
            assert_eq!(pointer.to_string(), round_trip.unwrap_or(text), "round trip for {text:?}");
        }
    }

    #[test]
    fn parse_invalid_pointers() {
        for text in ["/", "a/b/c", "/a//b/c", "/a/b/c/"] {
            assert!(JsonPointer::try_parse(text).is_none(), "{text:?} should not parse");
            assert!(JsonPointer::parse(text).is_err());
        }
    }

    #[test]
    fn parse_error_kinds() {
        assert_eq!(JsonPointer::parse("a/b"), Err(PointerError::MissingLeadingSlash));
        assert_eq!(JsonPointer::parse("/a//b"), Err(PointerError::EmptyName));
    }

    #[test]
    fn root_and_parent() {
        let root = JsonPointer::root();
        assert!(root.is_root());
        assert!(root.parent().is_none());
        assert_eq!(root.to_string(), "");

        let pointer = JsonPointer::parse("/a/b").unwrap();
        let parent = pointer.parent().unwrap();
        assert_eq!(parent.names(), ["a"]);
        assert_eq!(parent.parent().unwrap(), root);
    }

    #[test]
    fn concat_pointers() {
        let a = JsonPointer::parse("/a").unwrap();
        let b = JsonPointer::parse("/b/c").unwrap();
        assert_eq!(a.concat(&b).to_string(), "/a/b/c");
        assert_eq!(JsonPointer::root().concat(&a), a);
    }

    #[test]
    fn display_escapes_slash_only() {
        let pointer = JsonPointer::new(vec!["has/slash".to_string(), "has%percent".to_string()]);
        assert_eq!(pointer.to_string(), "/has%2Fslash/has%percent");
        assert_eq!(JsonPointer::parse(&pointer.to_string()).unwrap(), pointer);
    }

    #[test]
    fn index_parsing() {
        assert_eq!(parse_index("0"), Some(0));
        assert_eq!(parse_index("123"), Some(123));
        assert_eq!(parse_index("01"), Some(1));
        assert_eq!(parse_index("-1"), None);
        assert_eq!(parse_index("+1"), None);
        assert_eq!(parse_index("1.5"), None);
        assert_eq!(parse_index(""), None);
        assert_eq!(parse_index("abc"), None);
    }
}
