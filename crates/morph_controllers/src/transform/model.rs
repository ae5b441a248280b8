//! Transform model state
//!
//! The controller's state lives in a schema-checked [`Model`] so the boolean
//! flags can be bound to classes on the root element. This module declares
//! the schema and wraps the dynamic store in typed accessors.

use morph_core::{AttrSpec, AttrType, BooleanClassBinding, Change, Model, NodeId, Schema};

use crate::config::TransformConfig;
use crate::error::Result;

pub const START_DELAY: &str = "transformStartDelay";
pub const END_DELAY: &str = "transformEndDelay";
pub const LAST_NODE: &str = "lastNode";
pub const LAST_NODE_HELPERS: &str = "lastNodeHelpers";
pub const EASING: &str = "transformEasing";
pub const DURATION: &str = "transformDuration";
pub const CREATE_HELPER: &str = "transformCreateHelper";
pub const HELPER_SELECTOR: &str = "transformHelperSelector";
pub const TRIGGER_EVENT: &str = "triggerEvent";
pub const NAME: &str = "transformName";
pub const RUNNING: &str = "transformRunning";
pub const ENDED: &str = "transformEnded";

/// Class bindings on the controller root
pub const BINDINGS: [BooleanClassBinding; 2] = [
    BooleanClassBinding::new(RUNNING, "js-transform-running"),
    BooleanClassBinding::new(ENDED, "js-transform-ended"),
];

pub fn schema() -> Schema {
    Schema::new()
        .attr(AttrSpec::new(START_DELAY, AttrType::Number).required().default_value(0))
        .attr(AttrSpec::new(END_DELAY, AttrType::Number).required().default_value(0))
        .attr(AttrSpec::new(LAST_NODE, AttrType::Node))
        .attr(AttrSpec::new(LAST_NODE_HELPERS, AttrType::Nodes))
        .attr(
            AttrSpec::new(EASING, AttrType::String)
                .required()
                .default_value("linear"),
        )
        .attr(AttrSpec::new(DURATION, AttrType::Number).required().default_value(1200))
        .attr(
            AttrSpec::new(CREATE_HELPER, AttrType::Boolean)
                .required()
                .default_value(true),
        )
        .attr(
            AttrSpec::new(HELPER_SELECTOR, AttrType::String)
                .required()
                .default_value("[data-transform-helper-name]"),
        )
        .attr(
            AttrSpec::new(TRIGGER_EVENT, AttrType::String)
                .required()
                .default_value(".transform-helper"),
        )
        .attr(AttrSpec::new(NAME, AttrType::String))
        .attr(AttrSpec::new(RUNNING, AttrType::Boolean).required().default_value(false))
        .attr(AttrSpec::new(ENDED, AttrType::Boolean).required().default_value(false))
}

#[derive(Debug)]
pub struct TransformModel {
    model: Model,
}

impl Default for TransformModel {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformModel {
    pub fn new() -> Self {
        Self {
            model: Model::new(schema()),
        }
    }

    pub fn from_config(config: &TransformConfig) -> Result<Self> {
        let mut this = Self::new();
        let model = &mut this.model;
        model.set(START_DELAY, config.start_delay)?;
        model.set(END_DELAY, config.end_delay)?;
        model.set(EASING, config.easing.as_str())?;
        model.set(DURATION, config.duration_ms)?;
        model.set(CREATE_HELPER, config.create_helper)?;
        model.set(HELPER_SELECTOR, config.helper_selector.as_str())?;
        model.set(TRIGGER_EVENT, config.trigger_event.as_str())?;
        if let Some(name) = &config.name {
            model.set(NAME, name.as_str())?;
        }
        model.validate()?;
        // configuration is not a state change
        model.drain_changes();
        Ok(this)
    }

    /// The underlying attribute store
    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    pub fn drain_changes(&mut self) -> Vec<Change> {
        self.model.drain_changes()
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Frames to wait before a forward run
    pub fn start_delay(&self) -> i32 {
        delay_frames(self.model.get_number(START_DELAY).unwrap_or(0.0))
    }

    /// Frames to wait before a reverse run
    pub fn end_delay(&self) -> i32 {
        delay_frames(self.model.get_number(END_DELAY).unwrap_or(0.0))
    }

    pub fn easing(&self) -> &str {
        self.model.get_str(EASING).unwrap_or("linear")
    }

    pub fn duration_ms(&self) -> u32 {
        self.model.get_number(DURATION).unwrap_or(1200.0).max(0.0) as u32
    }

    pub fn create_helper(&self) -> bool {
        self.model.get_bool(CREATE_HELPER).unwrap_or(true)
    }

    pub fn helper_selector(&self) -> &str {
        self.model
            .get_str(HELPER_SELECTOR)
            .unwrap_or("[data-transform-helper-name]")
    }

    pub fn trigger_event(&self) -> &str {
        self.model.get_str(TRIGGER_EVENT).unwrap_or(".transform-helper")
    }

    pub fn name(&self) -> Option<&str> {
        self.model.get_str(NAME)
    }

    pub fn set_name(&mut self, name: &str) -> Result<()> {
        self.model.set(NAME, name)?;
        Ok(())
    }

    // =========================================================================
    // Run state
    // =========================================================================

    pub fn running(&self) -> bool {
        self.model.get_bool(RUNNING).unwrap_or(false)
    }

    pub fn set_running(&mut self, running: bool) -> Result<()> {
        self.model.set(RUNNING, running)?;
        Ok(())
    }

    pub fn ended(&self) -> bool {
        self.model.get_bool(ENDED).unwrap_or(false)
    }

    pub fn set_ended(&mut self, ended: bool) -> Result<()> {
        self.model.set(ENDED, ended)?;
        Ok(())
    }

    /// Parked: the forward run finished and nothing is in flight
    pub fn is_parked(&self) -> bool {
        self.ended() && !self.running()
    }

    pub fn last_node(&self) -> Option<NodeId> {
        self.model.get_node(LAST_NODE)
    }

    pub fn set_last_node(&mut self, node: Option<NodeId>) -> Result<()> {
        match node {
            Some(node) => self.model.set(LAST_NODE, node)?,
            None => self.model.unset(LAST_NODE)?,
        };
        Ok(())
    }

    pub fn last_node_helpers(&self) -> Option<&[NodeId]> {
        self.model.get_nodes(LAST_NODE_HELPERS)
    }

    pub fn set_last_node_helpers(&mut self, helpers: Vec<NodeId>) -> Result<()> {
        self.model.set(LAST_NODE_HELPERS, helpers)?;
        Ok(())
    }
}

/// Any negative delay resolves immediately, so the sign is decided before
/// rounding; partial frames round up.
fn delay_frames(value: f64) -> i32 {
    if value < 0.0 {
        -1
    } else {
        value.ceil() as i32
    }
}
