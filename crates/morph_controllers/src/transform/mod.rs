//! Shared element transforms
//!
//! Morphs a clicked source element into one or more helper elements and,
//! on the next trigger, back again.

pub mod controller;
pub mod engine;
pub mod geometry;
pub mod helper;
pub mod model;
pub mod registry;

pub use controller::{TransformController, TransformEvent, TARGET_NAME_ATTR};
pub use engine::{EngineContext, EngineEvent, Phase, Run, RunHelper, StartOutcome, TransformEngine};
pub use geometry::{calculate_position, HelperGeometry, OriginPolicy};
pub use helper::{Helper, HelperOptions};
pub use model::TransformModel;
pub use registry::HelperRegistry;
