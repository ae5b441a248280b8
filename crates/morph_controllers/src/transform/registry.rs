//! Helper registry
//!
//! Registered helpers, in registration order. Registering a helper
//! materializes a hidden `span` marker on the document body; that marker is
//! what gets animated, wherever the helper's end node lives.

use morph_core::{Collection, NodeId, Vector};
use morph_dom::Document;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::error::{Result, TransformError};
use crate::transform::helper::{
    marker_class, Helper, HelperOptions, HELPER_ALIAS_ATTR, HELPER_NAME_ATTR,
};

pub const HELPER_CLASS: &str = "transform-helper";
pub const HELPER_HIDDEN_CLASS: &str = "transform-helper-hidden";
pub const HELPER_PREPARE_CLASS: &str = "transform-helper-prepare";

#[derive(Default)]
pub struct HelperRegistry {
    helpers: Collection<Helper>,
    /// First registered helper per name
    by_name: FxHashMap<String, usize>,
}

impl HelperRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a helper for `node` without registering it.
    ///
    /// A node with a non-empty `data-transform-helper` attribute takes the
    /// end node of the registered helper of that name.
    pub fn create_helper(&self, doc: &Document, node: NodeId, name: Option<&str>) -> Result<Helper> {
        let end_node = match doc.attribute(node, HELPER_ALIAS_ATTR).filter(|v| !v.is_empty()) {
            Some(alias) => {
                self.find(alias)
                    .ok_or_else(|| TransformError::HelperNotFound {
                        name: alias.to_string(),
                    })?
                    .end_node
            }
            None => node,
        };
        let name = name
            .or_else(|| doc.attribute(node, HELPER_NAME_ATTR))
            .map(str::to_string);
        Ok(Helper::new(
            node,
            end_node,
            name,
            HelperOptions::from_node(doc, node),
        ))
    }

    /// Register a helper for `node` and attach its marker to the body
    pub fn add_helper(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        name: Option<&str>,
        global: bool,
    ) -> Result<&Helper> {
        let mut helper = self.create_helper(doc, node, name)?;
        let name = helper
            .name
            .clone()
            .ok_or(TransformError::UnnamedHelper { node })?;
        helper.global = global;

        let marker = doc.create_element("span");
        doc.add_class(marker, HELPER_CLASS)?;
        doc.add_class(marker, &marker_class(&name))?;
        doc.add_class(marker, HELPER_HIDDEN_CLASS)?;
        let body = doc.body();
        doc.append_child(body, marker)?;
        helper.el = marker;

        let index = self.helpers.add(helper);
        self.by_name.entry(name.clone()).or_insert(index);
        debug!(
            "registered transform helper '{}' (global: {}, marker {:?})",
            name, global, marker
        );
        Ok(&self.helpers.as_slice()[index])
    }

    pub fn find(&self, name: &str) -> Option<&Helper> {
        self.by_name.get(name).and_then(|i| self.helpers.get(*i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Helper> {
        self.helpers.iter()
    }

    pub fn as_slice(&self) -> &[Helper] {
        self.helpers.as_slice()
    }

    pub fn len(&self) -> usize {
        self.helpers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.helpers.is_empty()
    }

    /// Re-measure every helper's end node
    pub fn refresh(&mut self, doc: &Document, viewport: Vector) -> Result<()> {
        trace!("refreshing {} transform helper(s)", self.helpers.len());
        for helper in self.helpers.iter_mut() {
            helper.refresh(doc, viewport)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for HelperRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.helpers.iter()).finish()
    }
}
