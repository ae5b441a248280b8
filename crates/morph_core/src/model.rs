//! Attribute models
//!
//! A [`Model`] is a small typed key/value store described by a [`Schema`].
//! Every write is type-checked against the schema and, when the value
//! actually changes, recorded as a [`Change`] and emitted synchronously to
//! change listeners. Bindings read the recorded changes to keep the document
//! in sync.

use indexmap::IndexMap;
use tracing::trace;

use crate::error::{ModelError, Result};
use crate::events::{ListenerId, Listeners};
use crate::node::NodeId;

/// Declared type of an attribute
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttrType {
    Number,
    String,
    Boolean,
    /// A single document node
    Node,
    /// An ordered list of document nodes
    Nodes,
}

/// A stored attribute value
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    Number(f64),
    String(String),
    Boolean(bool),
    Node(NodeId),
    Nodes(Vec<NodeId>),
}

impl AttrValue {
    pub fn ty(&self) -> AttrType {
        match self {
            AttrValue::Number(_) => AttrType::Number,
            AttrValue::String(_) => AttrType::String,
            AttrValue::Boolean(_) => AttrType::Boolean,
            AttrValue::Node(_) => AttrType::Node,
            AttrValue::Nodes(_) => AttrType::Nodes,
        }
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Number(value)
    }
}

impl From<f32> for AttrValue {
    fn from(value: f32) -> Self {
        AttrValue::Number(value as f64)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        AttrValue::Number(value as f64)
    }
}

impl From<u32> for AttrValue {
    fn from(value: u32) -> Self {
        AttrValue::Number(value as f64)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Boolean(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::String(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::String(value)
    }
}

impl From<NodeId> for AttrValue {
    fn from(value: NodeId) -> Self {
        AttrValue::Node(value)
    }
}

impl From<Vec<NodeId>> for AttrValue {
    fn from(value: Vec<NodeId>) -> Self {
        AttrValue::Nodes(value)
    }
}

/// Declaration of a single attribute
#[derive(Clone, Debug, PartialEq)]
pub struct AttrSpec {
    pub name: &'static str,
    pub ty: AttrType,
    pub required: bool,
    pub default: Option<AttrValue>,
}

impl AttrSpec {
    /// An optional attribute without default
    pub fn new(name: &'static str, ty: AttrType) -> Self {
        Self {
            name,
            ty,
            required: false,
            default: None,
        }
    }

    /// Builder: mark as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Builder: set the default value (implies the attribute is always present)
    pub fn default_value(mut self, value: impl Into<AttrValue>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// Ordered set of attribute declarations
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schema {
    attrs: IndexMap<&'static str, AttrSpec>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: declare an attribute. A later declaration replaces an earlier one.
    pub fn attr(mut self, spec: AttrSpec) -> Self {
        self.attrs.insert(spec.name, spec);
        self
    }

    pub fn get(&self, name: &str) -> Option<&AttrSpec> {
        self.attrs.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttrSpec> {
        self.attrs.values()
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

/// A recorded attribute write
#[derive(Clone, Debug, PartialEq)]
pub struct Change {
    pub name: &'static str,
    pub previous: Option<AttrValue>,
    pub value: Option<AttrValue>,
}

/// Schema-checked attribute store with change events
pub struct Model {
    schema: Schema,
    values: IndexMap<&'static str, AttrValue>,
    listeners: Listeners<Change>,
    pending: Vec<Change>,
}

impl Model {
    /// Create a model with every declared default applied
    pub fn new(schema: Schema) -> Self {
        let values = schema
            .iter()
            .filter_map(|spec| spec.default.clone().map(|value| (spec.name, value)))
            .collect();
        Self {
            schema,
            values,
            listeners: Listeners::new(),
            pending: Vec::new(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Check that every required attribute has a value
    pub fn validate(&self) -> Result<()> {
        match self
            .schema
            .iter()
            .find(|spec| spec.required && !self.values.contains_key(spec.name))
        {
            Some(spec) => Err(ModelError::MissingRequired(spec.name.to_string())),
            None => Ok(()),
        }
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.values.get(name)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.values.get(name)? {
            AttrValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn get_number(&self, name: &str) -> Option<f64> {
        match self.values.get(name)? {
            AttrValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.values.get(name)? {
            AttrValue::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn get_node(&self, name: &str) -> Option<NodeId> {
        match self.values.get(name)? {
            AttrValue::Node(value) => Some(*value),
            _ => None,
        }
    }

    pub fn get_nodes(&self, name: &str) -> Option<&[NodeId]> {
        match self.values.get(name)? {
            AttrValue::Nodes(value) => Some(value.as_slice()),
            _ => None,
        }
    }

    /// Write an attribute. Returns `true` if the stored value changed.
    pub fn set(&mut self, name: &str, value: impl Into<AttrValue>) -> Result<bool> {
        let value = value.into();
        let spec = self
            .schema
            .get(name)
            .ok_or_else(|| ModelError::UnknownAttribute(name.to_string()))?;
        if spec.ty != value.ty() {
            return Err(ModelError::TypeMismatch {
                name: name.to_string(),
                expected: spec.ty,
                actual: value.ty(),
            });
        }
        let key = spec.name;

        if self.values.get(key) == Some(&value) {
            return Ok(false);
        }
        let previous = self.values.insert(key, value.clone());
        self.record(Change {
            name: key,
            previous,
            value: Some(value),
        });
        Ok(true)
    }

    /// Remove an attribute value. Returns `true` if a value was present.
    pub fn unset(&mut self, name: &str) -> Result<bool> {
        let key = self
            .schema
            .get(name)
            .ok_or_else(|| ModelError::UnknownAttribute(name.to_string()))?
            .name;
        let Some(previous) = self.values.shift_remove(key) else {
            return Ok(false);
        };
        self.record(Change {
            name: key,
            previous: Some(previous),
            value: None,
        });
        Ok(true)
    }

    /// Register a change listener
    pub fn on_change<F>(&mut self, handler: F) -> ListenerId
    where
        F: FnMut(&Change) + 'static,
    {
        self.listeners.subscribe(handler)
    }

    pub fn off_change(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Take the changes recorded since the last call
    pub fn drain_changes(&mut self) -> Vec<Change> {
        std::mem::take(&mut self.pending)
    }

    fn record(&mut self, change: Change) {
        trace!("model change: {} = {:?}", change.name, change.value);
        self.listeners.emit(&change);
        self.pending.push(change);
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("values", &self.values)
            .field("pending", &self.pending.len())
            .finish()
    }
}
