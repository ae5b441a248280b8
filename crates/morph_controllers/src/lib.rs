//! Morph Controllers
//!
//! Controllers bind a root element to a model and drive behaviour on it:
//!
//! - **Transform**: morphs a clicked element into its helper elements with a
//!   scale/translate tween about a computed transform-origin, and back again
//!   on the next click
//! - **Optional**: renders a template of optional attributes into a parent
//!   and controls the element it produced
//!
//! Controllers are single-threaded and frame-driven: the host calls
//! [`TransformController::frame`] once per animation frame.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use morph_controllers::{TransformConfig, TransformController};
//! use morph_core::{Rect, Vector};
//! use morph_dom::{Document, ViewportObserver};
//!
//! let mut doc = Document::new();
//! let root = doc.body();
//! let viewport = Rc::new(ViewportObserver::new());
//! let config = TransformConfig::default().with_name("gallery");
//! let mut controller =
//!     TransformController::new(&mut doc, root, &config, viewport.clone()).unwrap();
//! viewport.init(Vector::new(1000.0, 1000.0));
//!
//! let card = doc.create_element("div");
//! doc.set_attribute(card, "data-transform-target-name", "gallery").unwrap();
//! doc.append_child(root, card).unwrap();
//! doc.set_layout_rect(card, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
//!
//! controller.handle_click(&mut doc, card).unwrap();
//! for _ in 0..100 {
//!     controller.frame(&mut doc, 16.0).unwrap();
//! }
//! assert!(controller.model().ended());
//! ```

pub mod config;
pub mod error;
pub mod optional;
pub mod transform;

pub use config::{OriginMode, TransformConfig};
pub use error::{ConfigError, OptionalError, Result, TransformError};
pub use optional::OptionalController;
pub use transform::{
    HelperGeometry, HelperRegistry, OriginPolicy, Phase, StartOutcome, TransformController,
    TransformEvent, TransformModel,
};
