//! Model to document bindings

use crate::model::{AttrValue, Change};
use crate::node::NodeId;

/// Anything that can toggle CSS classes on a node
pub trait ClassTarget {
    fn set_class(&mut self, node: NodeId, class: &str, enabled: bool);
}

/// Mirrors a boolean attribute as a CSS class on a node
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BooleanClassBinding {
    pub attr: &'static str,
    pub class: &'static str,
}

impl BooleanClassBinding {
    pub const fn new(attr: &'static str, class: &'static str) -> Self {
        Self { attr, class }
    }

    /// Apply a single change if it concerns this binding's attribute.
    /// Returns `true` when the target was touched.
    pub fn apply<T: ClassTarget + ?Sized>(&self, change: &Change, target: &mut T, node: NodeId) -> bool {
        if change.name != self.attr {
            return false;
        }
        let enabled = matches!(change.value, Some(AttrValue::Boolean(true)));
        target.set_class(node, self.class, enabled);
        true
    }

    /// Apply the current value, independent of any change
    pub fn sync<T: ClassTarget + ?Sized>(&self, value: bool, target: &mut T, node: NodeId) {
        target.set_class(node, self.class, value);
    }
}
