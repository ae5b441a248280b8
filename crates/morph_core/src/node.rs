//! Node identifiers shared between the model layer and the document

use slotmap::new_key_type;

new_key_type! {
    /// Handle to a node in a `morph_dom::Document`
    pub struct NodeId;
}
