//! JSON write-event plumbing.
//!
//! A [`JsonWriter`] receives one call per structural event (object/array
//! start and end, property names, scalars) with scalar payloads carried by
//! the [`Scalar`] tagged union. [`write_value`] walks a tree and emits its
//! events; [`ValueWriter`] does the reverse, assembling a tree from events.
//!
//! [`FilteredJsonWriter`] sits between the two: it forwards events to an
//! inner writer only for included paths, tracking position with an explicit
//! status stack so that everything beneath an excluded property is
//! suppressed without further trie lookups.

use serde_json::{Map, Number, Value};

use crate::node::{should_include_property, FilterNode};

/// A scalar write-event payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

/// Receiver of JSON write events.
///
/// Comments and raw fragments are passthrough events; writers that cannot
/// represent them may ignore them.
pub trait JsonWriter {
    fn start_object(&mut self);
    fn end_object(&mut self);
    fn start_array(&mut self);
    fn end_array(&mut self);
    fn property_name(&mut self, name: &str);
    fn scalar(&mut self, value: Scalar);
    fn comment(&mut self, _text: &str) {}
    fn raw(&mut self, _json: &str) {}
}

/// Emits the write events for a tree, in document order.
pub fn write_value(value: &Value, writer: &mut dyn JsonWriter) {
    match value {
        Value::Null => writer.scalar(Scalar::Null),
        Value::Bool(value) => writer.scalar(Scalar::Bool(*value)),
        Value::Number(value) => writer.scalar(Scalar::Number(value.clone())),
        Value::String(value) => writer.scalar(Scalar::String(value.clone())),
        Value::Array(items) => {
            writer.start_array();
            for item in items {
                write_value(item, writer);
            }
            writer.end_array();
        }
        Value::Object(properties) => {
            writer.start_object();
            for (name, property_value) in properties {
                writer.property_name(name);
                write_value(property_value, writer);
            }
            writer.end_object();
        }
    }
}

enum Container {
    Object(Map<String, Value>),
    Array(Vec<Value>),
}

struct OpenContainer {
    container: Container,
    /// Property slot in the parent object this container will fill on close.
    slot: Option<String>,
}

/// Builds an in-memory tree from write events.
///
/// The event stream must be well formed (names only inside objects, balanced
/// start/end); a value arriving in an object with no pending name is dropped.
#[derive(Default)]
pub struct ValueWriter {
    result: Option<Value>,
    stack: Vec<OpenContainer>,
    pending_name: Option<String>,
}

impl ValueWriter {
    pub fn new() -> Self {
        ValueWriter::default()
    }

    /// The assembled tree, or `None` if no value event was received.
    pub fn into_value(self) -> Option<Value> {
        self.result
    }

    fn insert(&mut self, value: Value, slot: Option<String>) {
        match self.stack.last_mut() {
            Some(OpenContainer { container: Container::Object(map), .. }) => {
                if let Some(name) = slot {
                    map.insert(name, value);
                }
            }
            Some(OpenContainer { container: Container::Array(items), .. }) => items.push(value),
            None => self.result = Some(value),
        }
    }
}

impl JsonWriter for ValueWriter {
    fn start_object(&mut self) {
        let slot = self.pending_name.take();
        self.stack.push(OpenContainer { container: Container::Object(Map::new()), slot });
    }

    fn end_object(&mut self) {
        if let Some(open) = self.stack.pop() {
            if let Container::Object(map) = open.container {
                self.insert(Value::Object(map), open.slot);
            }
        }
    }

    fn start_array(&mut self) {
        let slot = self.pending_name.take();
        self.stack.push(OpenContainer { container: Container::Array(Vec::new()), slot });
    }

    fn end_array(&mut self) {
        if let Some(open) = self.stack.pop() {
            if let Container::Array(items) = open.container {
                self.insert(Value::Array(items), open.slot);
            }
        }
    }

    fn property_name(&mut self, name: &str) {
        self.pending_name = Some(name.to_string());
    }

    fn scalar(&mut self, value: Scalar) {
        let slot = self.pending_name.take();
        let value = match value {
            Scalar::Null => Value::Null,
            Scalar::Bool(value) => Value::Bool(value),
            Scalar::Number(value) => Value::Number(value),
            Scalar::String(value) => Value::String(value),
        };
        self.insert(value, slot);
    }

    fn raw(&mut self, json: &str) {
        if let Ok(value) = serde_json::from_str::<Value>(json) {
            let slot = self.pending_name.take();
            self.insert(value, slot);
        }
    }
}

#[derive(Clone, Copy)]
struct Status<'f> {
    is_included: bool,
    is_property: bool,
    node: Option<&'f FilterNode>,
}

/// A writer proxy that drops events for excluded paths.
///
/// Frames on the status stack record whether the current position is
/// included and which trie node (if any) still applies. Container frames
/// inherit the inclusion of their parent, so values nested under an excluded
/// property are suppressed without consulting the trie again.
pub struct FilteredJsonWriter<'a, W: JsonWriter + ?Sized> {
    inner: &'a mut W,
    stack: Vec<Status<'a>>,
}

impl<'a, W: JsonWriter + ?Sized> FilteredJsonWriter<'a, W> {
    pub(crate) fn new(inner: &'a mut W, root: &'a FilterNode) -> Self {
        FilteredJsonWriter {
            inner,
            stack: vec![Status { is_included: true, is_property: false, node: Some(root) }],
        }
    }

    fn top(&self) -> Status<'a> {
        // the root frame is never popped
        self.stack.last().copied().unwrap_or(Status {
            is_included: true,
            is_property: false,
            node: None,
        })
    }

    fn push_container(&mut self) -> bool {
        let status = self.top();
        self.stack.push(Status { is_included: status.is_included, is_property: false, node: status.node });
        status.is_included
    }

    fn pop_container(&mut self) -> bool {
        if self.top().is_property {
            self.stack.pop();
        }
        self.stack.pop().map_or(false, |status| status.is_included)
    }
}

impl<W: JsonWriter + ?Sized> JsonWriter for FilteredJsonWriter<'_, W> {
    fn start_object(&mut self) {
        if self.push_container() {
            self.inner.start_object();
        }
    }

    fn end_object(&mut self) {
        if self.pop_container() {
            self.inner.end_object();
        }
    }

    fn start_array(&mut self) {
        if self.push_container() {
            self.inner.start_array();
        }
    }

    fn end_array(&mut self) {
        if self.pop_container() {
            self.inner.end_array();
        }
    }

    fn property_name(&mut self, name: &str) {
        // replace the frame of the previous property at this depth
        if self.top().is_property {
            self.stack.pop();
        }

        let status = self.top();
        let child = status.node.and_then(|node| node.find_child(name));
        let is_included = status.is_included
            && status.node.map_or(true, |node| should_include_property(node, child));
        if is_included {
            self.inner.property_name(name);
        }

        self.stack.push(Status { is_included, is_property: true, node: child });
    }

    fn scalar(&mut self, value: Scalar) {
        if self.top().is_included {
            self.inner.scalar(value);
        }
    }

    fn comment(&mut self, text: &str) {
        if self.top().is_included {
            self.inner.comment(text);
        }
    }

    fn raw(&mut self, json: &str) {
        if self.top().is_included {
            self.inner.raw(json);
        }
    }
}
