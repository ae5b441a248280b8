//! Transform helpers
//!
//! A helper is the element that actually animates. It mimics the geometry of
//! its end node, which is either the node it was created from or, for nodes
//! carrying `data-transform-helper="<name>"`, the end node of the registered
//! helper with that name.

use morph_core::{NodeId, Rect, Vector};
use morph_dom::Document;

use crate::error::Result;

/// Names a helper; read when no explicit name is given
pub const HELPER_NAME_ATTR: &str = "data-transform-helper-name";
/// Aliases a node to a registered helper's end node
pub const HELPER_ALIAS_ATTR: &str = "data-transform-helper";
/// Drops the prepared state as soon as the forward run completes.
/// Any non-empty value enables it; an empty value does not.
pub const HIDE_COMPLETE_ATTR: &str = "data-transform-hide-complete";

/// Per-helper behaviour read from the source node
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HelperOptions {
    /// Drop the prepared state as soon as the forward run completes
    pub hide_complete: bool,
}

impl HelperOptions {
    pub fn from_node(doc: &Document, node: NodeId) -> Self {
        Self {
            hide_complete: doc
                .attribute(node, HIDE_COMPLETE_ATTR)
                .is_some_and(|value| !value.is_empty()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Helper {
    /// The animated element: a body-level marker for registered helpers,
    /// the source node itself for ad-hoc ones
    pub el: NodeId,
    pub end_node: NodeId,
    pub name: Option<String>,
    /// End node box in pixels, as of the last refresh
    pub end_rect: Rect,
    /// Viewport-normalized, as of the last refresh
    pub end_node_position: Vector,
    pub end_node_dimension: Vector,
    /// Offset by viewport scroll only, ignoring the source node
    pub global: bool,
    pub options: HelperOptions,
}

impl Helper {
    pub fn new(el: NodeId, end_node: NodeId, name: Option<String>, options: HelperOptions) -> Self {
        Self {
            el,
            end_node,
            name,
            end_rect: Rect::ZERO,
            end_node_position: Vector::ZERO,
            end_node_dimension: Vector::ZERO,
            global: false,
            options,
        }
    }

    /// Re-measure the end node. Returns the pixel rect that was read.
    pub fn refresh(&mut self, doc: &Document, viewport: Vector) -> Result<Rect> {
        let rect = doc.bounding_client_rect(self.end_node)?;
        self.end_rect = rect;
        self.end_node_position = rect.position() / viewport;
        self.end_node_dimension = rect.dimension() / viewport;
        Ok(rect)
    }
}

/// Marker class for a helper name: lower-cased, with everything outside
/// `[0-9a-z_-]` removed
pub fn marker_class(name: &str) -> String {
    let sanitized: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_digit() || c.is_ascii_lowercase() || *c == '_' || *c == '-')
        .collect();
    format!("transform-helper-{}", sanitized)
}
