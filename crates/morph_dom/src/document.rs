//! In-memory document
//!
//! A slotmap arena of element, text and fragment nodes. Layout is owned by
//! the host: it assigns each element a bounding rect with
//! [`Document::set_layout_rect`], and controllers read it back with
//! [`Document::bounding_client_rect`]. Reads are counted so callers (and
//! tests) can see how many forced layout reads a piece of code performs.

use std::cell::Cell;

use indexmap::IndexMap;
use morph_core::{ClassTarget, NodeId, Rect};
use slotmap::SlotMap;
use tracing::trace;

use crate::error::{DomError, Result};
use crate::selector::Selector;
use crate::style::InlineStyle;

/// Element data
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    tag: String,
    attributes: IndexMap<String, String>,
    classes: Vec<String>,
    style: InlineStyle,
    layout: Rect,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attribute value. `class` and `style` live in the class list and inline
    /// style instead.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn style(&self) -> &InlineStyle {
        &self.style
    }

    pub fn layout(&self) -> Rect {
        self.layout
    }
}

/// What a node holds
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Element(Element),
    Text(String),
    /// A parentless container whose children move on append
    Fragment,
}

#[derive(Clone, Debug)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// The document tree
pub struct Document {
    nodes: SlotMap<NodeId, NodeData>,
    body: NodeId,
    layout_reads: Cell<u64>,
}

impl Document {
    /// Create a document holding an empty `body`
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let body = nodes.insert(NodeData {
            kind: NodeKind::Element(Element::new("body")),
            parent: None,
            children: Vec::new(),
        });
        Self {
            nodes,
            body,
            layout_reads: Cell::new(0),
        }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // =========================================================================
    // Creation and tree mutation
    // =========================================================================

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.insert(NodeKind::Element(Element::new(tag)))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.insert(NodeKind::Text(text.to_string()))
    }

    pub fn create_fragment(&mut self) -> NodeId {
        self.insert(NodeKind::Fragment)
    }

    fn insert(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.insert(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        })
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    /// Appending a fragment moves the fragment's children instead.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.node(parent)?;
        let kind = &self.node(child)?.kind;

        if matches!(kind, NodeKind::Fragment) {
            let moved = std::mem::take(&mut self.node_mut(child)?.children);
            for grandchild in moved {
                self.node_mut(grandchild)?.parent = None;
                self.append_child(parent, grandchild)?;
            }
            return Ok(());
        }

        if child == parent || self.ancestors(parent).any(|a| a == child) {
            return Err(DomError::Hierarchy { child });
        }

        self.detach(child)?;
        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Remove a node from its parent. The node stays alive and can be re-appended.
    pub fn detach(&mut self, node: NodeId) -> Result<()> {
        if let Some(parent) = self.node(node)?.parent {
            self.node_mut(parent)?.children.retain(|c| *c != node);
            self.node_mut(node)?.parent = None;
        }
        Ok(())
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    pub fn kind(&self, node: NodeId) -> Result<&NodeKind> {
        Ok(&self.node(node)?.kind)
    }

    pub fn element(&self, node: NodeId) -> Result<&Element> {
        match &self.node(node)?.kind {
            NodeKind::Element(element) => Ok(element),
            _ => Err(DomError::NotAnElement(node)),
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Result<&mut Element> {
        match &mut self.node_mut(node)?.kind {
            NodeKind::Element(element) => Ok(element),
            _ => Err(DomError::NotAnElement(node)),
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node)?.parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Child nodes that are elements (`el.children`)
    pub fn element_children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(node)
            .iter()
            .copied()
            .filter(|c| self.element(*c).is_ok())
    }

    pub fn last_element_child(&self, node: NodeId) -> Option<NodeId> {
        self.element_children(node).last()
    }

    /// Strict ancestors, nearest first
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(node), move |n| self.parent(*n))
    }

    /// Attached to the document body
    pub fn is_connected(&self, node: NodeId) -> bool {
        node == self.body || self.ancestors(node).any(|a| a == self.body)
    }

    /// Descendants in document order, excluding `root`
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// Matching descendants of `root` in document order
    pub fn query_selector_all(&self, root: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|n| self.element(*n).is_ok_and(|e| selector.matches(e)))
            .collect()
    }

    pub fn query_selector(&self, root: NodeId, selector: &Selector) -> Option<NodeId> {
        self.query_selector_all(root, selector).into_iter().next()
    }

    /// Nearest inclusive ancestor matching `selector`
    pub fn closest(&self, node: NodeId, selector: &Selector) -> Option<NodeId> {
        std::iter::once(node)
            .chain(self.ancestors(node))
            .find(|n| self.element(*n).is_ok_and(|e| selector.matches(e)))
    }

    /// Concatenated text of a node and its descendants
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        for n in std::iter::once(node).chain(self.descendants(node)) {
            if let Some(NodeKind::Text(text)) = self.nodes.get(n).map(|d| &d.kind) {
                out.push_str(text);
            }
        }
        out
    }

    // =========================================================================
    // Attributes and classes
    // =========================================================================

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).ok()?.attribute(name)
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    /// Set an attribute. `class` and `style` are routed to the class list and
    /// inline style.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        let element = self.element_mut(node)?;
        match name {
            "class" => {
                element.classes = value.split_whitespace().map(str::to_string).collect();
            }
            "style" => element.style.set_css_text(value),
            _ => {
                element.attributes.insert(name.to_string(), value.to_string());
            }
        }
        Ok(())
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<()> {
        self.element_mut(node)?.attributes.shift_remove(name);
        Ok(())
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node).is_ok_and(|e| e.has_class(class))
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) -> Result<()> {
        let element = self.element_mut(node)?;
        if !element.has_class(class) {
            element.classes.push(class.to_string());
        }
        Ok(())
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) -> Result<()> {
        self.element_mut(node)?.classes.retain(|c| c != class);
        Ok(())
    }

    pub fn toggle_class(&mut self, node: NodeId, class: &str, enabled: bool) -> Result<()> {
        if enabled {
            self.add_class(node, class)
        } else {
            self.remove_class(node, class)
        }
    }

    // =========================================================================
    // Style and layout
    // =========================================================================

    pub fn style(&self, node: NodeId) -> Result<&InlineStyle> {
        Ok(&self.element(node)?.style)
    }

    pub fn style_mut(&mut self, node: NodeId) -> Result<&mut InlineStyle> {
        Ok(&mut self.element_mut(node)?.style)
    }

    /// `el.style.cssText = ...`
    pub fn set_css_text(&mut self, node: NodeId, css_text: &str) -> Result<()> {
        self.style_mut(node)?.set_css_text(css_text);
        Ok(())
    }

    /// Assign the layout box of an element, in viewport pixels
    pub fn set_layout_rect(&mut self, node: NodeId, rect: Rect) -> Result<()> {
        self.element_mut(node)?.layout = rect;
        Ok(())
    }

    /// Forced layout read of an element's viewport-relative box
    pub fn bounding_client_rect(&self, node: NodeId) -> Result<Rect> {
        let rect = self.element(node)?.layout;
        self.layout_reads.set(self.layout_reads.get() + 1);
        trace!("layout read {:?} -> {:?}", node, rect);
        Ok(rect)
    }

    /// Number of `bounding_client_rect` calls so far
    pub fn layout_reads(&self) -> u64 {
        self.layout_reads.get()
    }

    fn node(&self, node: NodeId) -> Result<&NodeData> {
        self.nodes.get(node).ok_or(DomError::UnknownNode(node))
    }

    fn node_mut(&mut self, node: NodeId) -> Result<&mut NodeData> {
        self.nodes.get_mut(node).ok_or(DomError::UnknownNode(node))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("body", &self.body)
            .finish()
    }
}

impl ClassTarget for Document {
    fn set_class(&mut self, node: NodeId, class: &str, enabled: bool) {
        if let Err(err) = self.toggle_class(node, class, enabled) {
            tracing::warn!("class binding on {:?} failed: {}", node, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_append_moves_node() {
        let mut doc = Document::new();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        let child = doc.create_element("span");

        doc.append_child(a, child).unwrap();
        doc.append_child(b, child).unwrap();

        assert!(doc.children(a).is_empty());
        assert_eq!(doc.children(b), &[child]);
        assert_eq!(doc.parent(child), Some(b));
    }

    #[test]
    fn test_append_fragment_moves_children() {
        let mut doc = Document::new();
        let frag = doc.create_fragment();
        let x = doc.create_element("p");
        let t = doc.create_text("hi");
        doc.append_child(frag, x).unwrap();
        doc.append_child(frag, t).unwrap();

        let body = doc.body();
        doc.append_child(body, frag).unwrap();

        assert_eq!(doc.children(body), &[x, t]);
        assert!(doc.children(frag).is_empty());
        assert_eq!(doc.last_element_child(body), Some(x));
        assert!(doc.is_connected(x));
    }

    #[test]
    fn test_hierarchy_error() {
        let mut doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("div");
        doc.append_child(outer, inner).unwrap();
        assert_eq!(
            doc.append_child(inner, outer),
            Err(DomError::Hierarchy { child: outer })
        );
    }

    #[test]
    fn test_query_and_closest() {
        let mut doc = Document::new();
        let body = doc.body();
        let card = doc.create_element("div");
        let img = doc.create_element("img");
        let caption = doc.create_element("span");
        doc.set_attribute(card, "data-transform-target-name", "gallery")
            .unwrap();
        doc.set_attribute(img, "data-transform-helper", "image")
            .unwrap();
        doc.set_attribute(caption, "data-transform-helper", "caption")
            .unwrap();
        doc.append_child(body, card).unwrap();
        doc.append_child(card, img).unwrap();
        doc.append_child(card, caption).unwrap();

        let helpers = Selector::attribute("data-transform-helper");
        assert_eq!(doc.query_selector_all(card, &helpers), vec![img, caption]);
        assert_eq!(doc.query_selector_all(img, &helpers), vec![]);

        let target = Selector::attribute("data-transform-target-name");
        assert_eq!(doc.closest(img, &target), Some(card));
        assert_eq!(doc.closest(card, &target), Some(card));
        assert_eq!(doc.closest(body, &target), None);
    }

    #[test]
    fn test_class_and_style_attributes() {
        let mut doc = Document::new();
        let el = doc.create_element("span");
        doc.set_attribute(el, "class", "a  b").unwrap();
        doc.set_attribute(el, "style", "width: 5px").unwrap();
        doc.add_class(el, "a").unwrap();
        doc.toggle_class(el, "c", true).unwrap();

        assert_eq!(doc.element(el).unwrap().classes(), &["a", "b", "c"]);
        assert_eq!(doc.style(el).unwrap().get("width"), Some("5px"));
        assert_eq!(doc.attribute(el, "class"), None);
    }

    #[test]
    fn test_layout_reads_counted() {
        let mut doc = Document::new();
        let el = doc.create_element("div");
        doc.set_layout_rect(el, Rect::new(1.0, 2.0, 3.0, 4.0)).unwrap();

        assert_eq!(doc.layout_reads(), 0);
        assert_eq!(doc.bounding_client_rect(el), Ok(Rect::new(1.0, 2.0, 3.0, 4.0)));
        assert_eq!(doc.layout_reads(), 1);

        let text = doc.create_text("x");
        assert_eq!(doc.bounding_client_rect(text), Err(DomError::NotAnElement(text)));
    }
}
