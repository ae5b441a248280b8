//! Optional-attribute controller
//!
//! Renders a template with a set of optional attributes, appends the result
//! to a parent element and controls the last element it produced.

use morph_core::{AttrSpec, AttrType, Model, NodeId, Schema};
use morph_dom::{Document, Template};
use serde_json::Value;
use tracing::debug;

use crate::error::OptionalError;

pub const CHUNK_NAME: &str = "chunkName";

pub fn schema() -> Schema {
    Schema::new().attr(AttrSpec::new(CHUNK_NAME, AttrType::String).required())
}

#[derive(Debug)]
pub struct OptionalController {
    el: NodeId,
    model: Model,
}

impl OptionalController {
    /// Render `template` with `attributes` (an empty object when `None`),
    /// append it to `parent` and bind to `parent`'s last element child.
    pub fn mount(
        doc: &mut Document,
        parent: NodeId,
        template: &Template,
        attributes: Option<&Value>,
        chunk_name: &str,
    ) -> Result<Self, OptionalError> {
        let mut model = Model::new(schema());
        model.set(CHUNK_NAME, chunk_name)?;
        model.validate()?;
        model.drain_changes();

        let empty = Value::Object(Default::default());
        let fragment = template.to_fragment(doc, attributes.unwrap_or(&empty))?;
        doc.append_child(parent, fragment)?;

        let el = doc
            .last_element_child(parent)
            .ok_or(OptionalError::NothingMounted { parent })?;
        debug!("optional chunk '{}' mounted as {:?}", chunk_name, el);
        Ok(Self { el, model })
    }

    /// The controlled element
    pub fn el(&self) -> NodeId {
        self.el
    }

    pub fn chunk_name(&self) -> &str {
        self.model.get_str(CHUNK_NAME).unwrap_or_default()
    }

    pub fn model(&self) -> &Model {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morph_dom::Interpolate;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_mount_binds_last_element() {
        let mut doc = Document::new();
        let parent = doc.create_element("div");
        let existing = doc.create_element("p");
        doc.append_child(parent, existing).unwrap();

        let template = Template::new(Interpolate::new(
            "---\nchunk: teaser\n---<span>{{label}}</span><aside data-kind=\"{{kind}}\"></aside>",
        ));
        let controller = OptionalController::mount(
            &mut doc,
            parent,
            &template,
            Some(&json!({"label": "More", "kind": "note"})),
            "teaser",
        )
        .unwrap();

        assert_eq!(doc.element_children(parent).count(), 3);
        assert_eq!(doc.element(controller.el()).unwrap().tag(), "aside");
        assert_eq!(doc.attribute(controller.el(), "data-kind"), Some("note"));
        assert_eq!(controller.chunk_name(), "teaser");
    }

    #[test]
    fn test_mount_without_attributes_uses_empty_object() {
        let mut doc = Document::new();
        let parent = doc.create_element("div");
        let template = Template::new(|data: &Value| {
            assert!(data.as_object().is_some_and(|o| o.is_empty()));
            "<b></b>".to_string()
        });
        let controller = OptionalController::mount(&mut doc, parent, &template, None, "x").unwrap();
        assert_eq!(doc.parent(controller.el()), Some(parent));
    }

    #[test]
    fn test_mount_with_no_element_fails() {
        let mut doc = Document::new();
        let parent = doc.create_element("div");
        let template = Template::new(|_: &Value| "just text".to_string());
        assert!(matches!(
            OptionalController::mount(&mut doc, parent, &template, None, "x"),
            Err(OptionalError::NothingMounted { .. })
        ));
    }
}
