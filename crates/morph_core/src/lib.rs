//! Morph Core Runtime
//!
//! This crate provides the foundational primitives for the Morph UI toolkit:
//!
//! - **Geometry**: `Vector` and `Rect` values used for viewport-normalized math
//! - **Models**: attribute schemas with typed values and synchronous change events
//! - **Collections**: ordered live collections with `add` notifications
//! - **Bindings**: boolean attribute to CSS class bindings
//!
//! # Example
//!
//! ```rust
//! use morph_core::model::{AttrSpec, AttrType, AttrValue, Model, Schema};
//!
//! let schema = Schema::new()
//!     .attr(AttrSpec::new("running", AttrType::Boolean).default_value(false));
//! let mut model = Model::new(schema);
//!
//! model.set("running", true).unwrap();
//! assert_eq!(model.get_bool("running"), Some(true));
//! assert_eq!(model.get("running"), Some(&AttrValue::Boolean(true)));
//! ```

pub mod binding;
pub mod collection;
pub mod error;
pub mod events;
pub mod geometry;
pub mod model;
pub mod node;

pub use binding::{BooleanClassBinding, ClassTarget};
pub use collection::{Added, Collection};
pub use error::{ModelError, Result};
pub use events::{ListenerId, Listeners};
pub use geometry::{Rect, Vector};
pub use model::{AttrSpec, AttrType, AttrValue, Change, Model, Schema};
pub use node::NodeId;
