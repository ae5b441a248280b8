//! Morph Document Model
//!
//! An in-memory document the controllers operate on:
//!
//! - **Document**: slotmap arena of elements, text and fragments with
//!   attributes, class lists, inline styles and host-assigned layout rects
//! - **Selectors**: compound `tag.class[attr=value]` lists
//! - **Markup**: fragment parser for rendered templates
//! - **Templates**: render functions with front-matter stripping
//! - **Viewport**: dimension, scroll and queued `Init`/`Resize`/`Scroll` events
//!
//! Layout is not computed here. The host assigns each element's client rect
//! with [`Document::set_layout_rect`]; reads go through
//! [`Document::bounding_client_rect`] and are counted.
//!
//! # Example
//!
//! ```rust
//! use morph_dom::{Document, Selector};
//!
//! let mut doc = Document::new();
//! let fragment = morph_dom::markup::parse_fragment(
//!     &mut doc,
//!     r#"<div data-transform-helper-name="card"></div>"#,
//! )
//! .unwrap();
//! doc.append_child(doc.body(), fragment).unwrap();
//!
//! let selector = Selector::parse("[data-transform-helper-name]").unwrap();
//! assert_eq!(doc.query_selector_all(doc.body(), &selector).len(), 1);
//! ```

mod animate;
pub mod document;
pub mod error;
pub mod markup;
pub mod selector;
pub mod style;
pub mod template;
pub mod viewport;

pub use document::{Document, Element, NodeKind};
pub use error::{DomError, Result};
pub use markup::{parse_fragment, MarkupNode};
pub use selector::Selector;
pub use style::InlineStyle;
pub use template::{Interpolate, Render, Template};
pub use viewport::{SubscriptionId, Viewport, ViewportEvent, ViewportObserver, ViewportSubscription};
