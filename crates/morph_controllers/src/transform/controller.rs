//! Transform controller
//!
//! Glue between the document, the viewport and the lifecycle engine. The
//! host forwards clicks with [`TransformController::handle_click`] and calls
//! [`TransformController::frame`] once per animation frame; everything else
//! (delays, layout reads, tween playback, viewport refreshes, root classes)
//! happens inside `frame`.
//!
//! ```ignore
//! let viewport = Rc::new(ViewportObserver::new());
//! let mut controller = TransformController::new(&mut doc, root, &config, viewport.clone())?;
//! viewport.init(Vector::new(1280.0, 720.0));
//!
//! controller.handle_click(&mut doc, clicked)?;
//! loop {
//!     controller.frame(&mut doc, 16.0)?;
//! }
//! ```

use std::rc::Rc;

use morph_animation::FrameClock;
use morph_core::{ListenerId, Listeners, NodeId};
use morph_dom::{Document, Selector, Viewport, ViewportEvent, ViewportSubscription};
use tracing::{debug, trace};

use crate::config::TransformConfig;
use crate::error::Result;
use crate::transform::engine::{EngineContext, EngineEvent, Phase, StartOutcome, TransformEngine};
use crate::transform::helper::{Helper, HELPER_ALIAS_ATTR};
use crate::transform::model::{TransformModel, BINDINGS};
use crate::transform::registry::HelperRegistry;

/// Marks a click target; its value is matched against `transformName`
pub const TARGET_NAME_ATTR: &str = "data-transform-target-name";

/// Payload of the start and end hooks
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransformEvent {
    /// Source node of the run
    pub node: NodeId,
    /// `transformEnded` at the time of the hook
    pub ended: bool,
}

pub struct TransformController {
    root: NodeId,
    model: TransformModel,
    registry: HelperRegistry,
    engine: TransformEngine,
    viewport: Rc<dyn Viewport>,
    subscription: Option<ViewportSubscription>,
    clock: FrameClock,
    target_selector: Selector,
    alias_selector: Selector,
    started: Listeners<TransformEvent>,
    ended: Listeners<TransformEvent>,
}

impl TransformController {
    /// Create a controller for `root`.
    ///
    /// With `create-helper` enabled, every element under `root` matching the
    /// helper selector is registered as a global helper.
    pub fn new(
        doc: &mut Document,
        root: NodeId,
        config: &TransformConfig,
        viewport: Rc<dyn Viewport>,
    ) -> Result<Self> {
        config.validate()?;
        let model = TransformModel::from_config(config)?;
        let subscription = viewport.subscribe();

        let mut controller = Self {
            root,
            model,
            registry: HelperRegistry::new(),
            engine: TransformEngine::new(config.origin_policy()),
            viewport,
            subscription: Some(subscription),
            clock: FrameClock::new(),
            target_selector: Selector::attribute(TARGET_NAME_ATTR),
            alias_selector: Selector::attribute(HELPER_ALIAS_ATTR),
            started: Listeners::new(),
            ended: Listeners::new(),
        };
        controller.setup_helpers(doc)?;
        for binding in &BINDINGS {
            let value = controller.model.model().get_bool(binding.attr).unwrap_or(false);
            binding.sync(value, doc, root);
        }

        debug!(
            "transform controller '{}' ready with {} helper(s)",
            controller.model.name().unwrap_or_default(),
            controller.registry.len()
        );
        Ok(controller)
    }

    fn setup_helpers(&mut self, doc: &mut Document) -> Result<()> {
        if !self.model.create_helper() {
            return Ok(());
        }
        let selector = Selector::parse(self.model.helper_selector())?;
        for node in doc.query_selector_all(self.root, &selector) {
            self.registry.add_helper(doc, node, None, true)?;
        }
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn model(&self) -> &TransformModel {
        &self.model
    }

    pub fn registry(&self) -> &HelperRegistry {
        &self.registry
    }

    pub fn engine(&self) -> &TransformEngine {
        &self.engine
    }

    pub fn phase(&self) -> Phase {
        self.engine.phase()
    }

    /// Frames seen by [`frame`](Self::frame)
    pub fn frame_count(&self) -> u64 {
        self.clock.frame()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Register a helper by hand
    pub fn add_helper(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        name: Option<&str>,
        global: bool,
    ) -> Result<&Helper> {
        self.registry.add_helper(doc, node, name, global)
    }

    /// Handle a click on `target`.
    ///
    /// Starts a transform when the nearest `data-transform-target-name`
    /// ancestor (or `target` itself) names this controller. Returns `None`
    /// when the click is not for this controller.
    pub fn handle_click(&mut self, doc: &mut Document, target: NodeId) -> Result<Option<StartOutcome>> {
        let Some(trigger) = doc.closest(target, &self.target_selector) else {
            return Ok(None);
        };
        if doc.attribute(trigger, TARGET_NAME_ATTR) != self.model.name() {
            trace!("click on {:?} is for another transform", trigger);
            return Ok(None);
        }
        let helpers = doc.query_selector_all(trigger, &self.alias_selector);
        self.start_transform(doc, Some(trigger), Some(helpers)).map(Some)
    }

    /// Start a transform, or the reverse trip if the last one ended.
    /// `None` falls back to the last run's node and helpers.
    pub fn start_transform(
        &mut self,
        doc: &mut Document,
        node: Option<NodeId>,
        helpers: Option<Vec<NodeId>>,
    ) -> Result<StartOutcome> {
        let outcome = self.engine.start(&mut self.model, node, helpers);
        self.sync_bindings(doc);
        outcome
    }

    /// Run one animation frame of `dt_ms` milliseconds
    pub fn frame(&mut self, doc: &mut Document, dt_ms: f32) -> Result<()> {
        let frame = self.clock.tick(dt_ms);

        let viewport_events = self
            .subscription
            .as_ref()
            .map(ViewportSubscription::drain)
            .unwrap_or_default();
        for event in viewport_events {
            self.on_viewport_event(doc, event)?;
        }

        let result = {
            let mut cx = EngineContext {
                doc: &mut *doc,
                model: &mut self.model,
                registry: &mut self.registry,
                viewport: &*self.viewport,
            };
            self.engine.frame(&mut cx, dt_ms)
        };
        self.sync_bindings(doc);

        for event in result? {
            trace!("frame {}: {:?}", frame, event);
            match event {
                EngineEvent::Began { node, ended } => {
                    self.started.emit(&TransformEvent { node, ended });
                }
                EngineEvent::Completed { node, ended } => {
                    self.ended.emit(&TransformEvent { node, ended });
                    self.on_transform_ended(doc)?;
                }
                EngineEvent::Abandoned => {}
            }
        }
        Ok(())
    }

    /// Re-measure every registered helper
    pub fn refresh(&mut self, doc: &Document) -> Result<()> {
        self.registry.refresh(doc, self.viewport.dimension())
    }

    /// Detach from the viewport
    pub fn destroy(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.viewport.unsubscribe(&subscription);
            debug!("transform controller detached from viewport");
        }
    }

    // =========================================================================
    // Hooks
    // =========================================================================

    /// Called when a run's tween begins
    pub fn on_transform_start<F>(&mut self, handler: F) -> ListenerId
    where
        F: FnMut(&TransformEvent) + 'static,
    {
        self.started.subscribe(handler)
    }

    /// Called when a run's tween completes, after `transformEnded` flipped
    pub fn on_transform_end<F>(&mut self, handler: F) -> ListenerId
    where
        F: FnMut(&TransformEvent) + 'static,
    {
        self.ended.subscribe(handler)
    }

    pub fn off_transform_start(&mut self, id: ListenerId) -> bool {
        self.started.unsubscribe(id)
    }

    pub fn off_transform_end(&mut self, id: ListenerId) -> bool {
        self.ended.unsubscribe(id)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn on_viewport_event(&mut self, doc: &Document, event: ViewportEvent) -> Result<()> {
        match event {
            ViewportEvent::Init => self.refresh(doc),
            ViewportEvent::Resize | ViewportEvent::Scroll => {
                if self.model.is_parked() {
                    trace!("transform parked, {:?} ignored", event);
                    Ok(())
                } else {
                    self.refresh(doc)
                }
            }
        }
    }

    fn on_transform_ended(&mut self, doc: &Document) -> Result<()> {
        if !self.model.ended() {
            self.engine.clear_last_client_rect();
            self.refresh(doc)?;
        }
        Ok(())
    }

    fn sync_bindings(&mut self, doc: &mut Document) {
        for change in self.model.drain_changes() {
            for binding in &BINDINGS {
                binding.apply(&change, doc, self.root);
            }
        }
    }
}

impl Drop for TransformController {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl std::fmt::Debug for TransformController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformController")
            .field("root", &self.root)
            .field("model", &self.model)
            .field("helpers", &self.registry.len())
            .field("phase", &self.engine.phase())
            .field("subscribed", &self.subscription.is_some())
            .finish()
    }
}
