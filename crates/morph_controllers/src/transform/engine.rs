//! Transform lifecycle
//!
//! A run moves through explicit phases, one step per animation frame:
//!
//! ```text
//! Idle -> Delaying -> MeasuringLayout -> Animating -> Idle
//! ```
//!
//! - **Delaying** waits `transformStartDelay` (forward) or
//!   `transformEndDelay` (reverse) frames. A negative delay skips the wait.
//! - **MeasuringLayout** takes the layout reads on the next frame and builds
//!   the tween.
//! - **Animating** advances the tween. Its begin step prepares the helpers,
//!   its complete step flips `transformEnded` and tears down.
//!
//! Only one run is in flight at a time; a start while running is ignored.
//! There is no cancellation.

use morph_animation::{
    Direction, Easing, FrameDelay, NextFrame, Property, TargetTracks, Track, Tween,
};
use morph_core::{NodeId, Rect, Vector};
use morph_dom::{Document, Viewport};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::transform::geometry::{calculate_position, HelperGeometry, OriginPolicy};
use crate::transform::helper::Helper;
use crate::transform::model::TransformModel;
use crate::transform::registry::{HelperRegistry, HELPER_CLASS, HELPER_PREPARE_CLASS};

/// Observable lifecycle phase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Delaying,
    MeasuringLayout,
    Animating,
}

/// Result of a start request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// A run was already in flight
    Ignored,
    /// Neither an explicit nor a last node was available
    Abandoned,
}

/// Lifecycle notifications produced by [`TransformEngine::frame`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineEvent {
    Began { node: NodeId, ended: bool },
    Completed { node: NodeId, ended: bool },
    Abandoned,
}

/// Everything a lifecycle step touches
pub struct EngineContext<'a> {
    pub doc: &'a mut Document,
    pub model: &'a mut TransformModel,
    pub registry: &'a mut HelperRegistry,
    pub viewport: &'a dyn Viewport,
}

/// A helper taking part in a run, with its geometry for that run
#[derive(Clone, Debug)]
pub struct RunHelper {
    pub helper: Helper,
    pub geometry: HelperGeometry,
}

/// An animating run
#[derive(Debug)]
pub struct Run {
    pub node: NodeId,
    pub node_helpers: Vec<NodeId>,
    pub helpers: Vec<RunHelper>,
    pub tween: Tween<NodeId>,
}

#[derive(Debug)]
enum State {
    Idle,
    Delaying {
        delay: FrameDelay,
        node: Option<NodeId>,
        node_helpers: Option<Vec<NodeId>>,
    },
    MeasuringLayout {
        read: NextFrame,
        node: NodeId,
        node_helpers: Vec<NodeId>,
    },
    Animating(Box<Run>),
}

#[derive(Debug)]
pub struct TransformEngine {
    state: State,
    policy: OriginPolicy,
    /// Source rect of the forward run, reused by the reverse run
    last_client_rect: Option<Rect>,
}

impl Default for TransformEngine {
    fn default() -> Self {
        Self::new(OriginPolicy::default())
    }
}

impl TransformEngine {
    pub fn new(policy: OriginPolicy) -> Self {
        Self {
            state: State::Idle,
            policy,
            last_client_rect: None,
        }
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            State::Idle => Phase::Idle,
            State::Delaying { .. } => Phase::Delaying,
            State::MeasuringLayout { .. } => Phase::MeasuringLayout,
            State::Animating(_) => Phase::Animating,
        }
    }

    pub fn policy(&self) -> OriginPolicy {
        self.policy
    }

    /// The animating run, if any
    pub fn run(&self) -> Option<&Run> {
        match &self.state {
            State::Animating(run) => Some(run),
            _ => None,
        }
    }

    pub fn last_client_rect(&self) -> Option<Rect> {
        self.last_client_rect
    }

    pub fn clear_last_client_rect(&mut self) {
        self.last_client_rect = None;
    }

    /// Request a run. `None` arguments fall back to the last run's node and
    /// helpers once the delay has passed.
    pub fn start(
        &mut self,
        model: &mut TransformModel,
        node: Option<NodeId>,
        node_helpers: Option<Vec<NodeId>>,
    ) -> Result<StartOutcome> {
        if model.running() {
            debug!("transform already running, start ignored");
            return Ok(StartOutcome::Ignored);
        }
        model.set_running(true)?;

        let frames = if model.ended() {
            model.end_delay()
        } else {
            model.start_delay()
        };
        let delay = FrameDelay::new(frames);
        debug!(
            "transform start (ended: {}, delay: {} frame(s))",
            model.ended(),
            frames
        );

        if delay.is_resolved() {
            return self.resolve_delay(model, node, node_helpers);
        }
        self.state = State::Delaying {
            delay,
            node,
            node_helpers,
        };
        Ok(StartOutcome::Started)
    }

    /// Advance the lifecycle by one animation frame of `dt_ms` milliseconds
    pub fn frame(
        &mut self,
        cx: &mut EngineContext<'_>,
        dt_ms: f32,
    ) -> Result<SmallVec<[EngineEvent; 2]>> {
        let mut events = SmallVec::new();

        match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => {}
            State::Delaying {
                mut delay,
                node,
                node_helpers,
            } => {
                if delay.tick() {
                    if self.resolve_delay(cx.model, node, node_helpers)? == StartOutcome::Abandoned {
                        events.push(EngineEvent::Abandoned);
                    }
                } else {
                    trace!("transform delay {:.2}", delay.progress());
                    self.state = State::Delaying {
                        delay,
                        node,
                        node_helpers,
                    };
                }
            }
            State::MeasuringLayout {
                mut read,
                node,
                node_helpers,
            } => {
                if read.tick() {
                    let run = match self.measure(cx, node, node_helpers) {
                        Ok(run) => run,
                        Err(err) => {
                            warn!("transform measurement failed: {}", err);
                            cx.model.set_running(false)?;
                            return Err(err);
                        }
                    };
                    self.state = State::Animating(Box::new(run));
                } else {
                    self.state = State::MeasuringLayout {
                        read,
                        node,
                        node_helpers,
                    };
                }
            }
            State::Animating(mut run) => {
                let step = run.tween.advance(dt_ms);
                if step.began {
                    self.begin(cx, &run)?;
                    events.push(EngineEvent::Began {
                        node: run.node,
                        ended: cx.model.ended(),
                    });
                }
                run.tween.render(&mut *cx.doc);
                if step.completed {
                    if let Err(err) = self.complete(cx, &run) {
                        warn!("transform teardown failed: {}", err);
                        cx.model.set_running(false)?;
                        return Err(err);
                    }
                    events.push(EngineEvent::Completed {
                        node: run.node,
                        ended: cx.model.ended(),
                    });
                } else {
                    self.state = State::Animating(run);
                }
            }
        }

        Ok(events)
    }

    fn resolve_delay(
        &mut self,
        model: &mut TransformModel,
        node: Option<NodeId>,
        node_helpers: Option<Vec<NodeId>>,
    ) -> Result<StartOutcome> {
        let node_helpers = node_helpers
            .or_else(|| model.last_node_helpers().map(<[NodeId]>::to_vec))
            .unwrap_or_default();
        let Some(node) = node.or_else(|| model.last_node()) else {
            warn!("transform has no node and no last node, run abandoned");
            model.set_running(false)?;
            self.state = State::Idle;
            return Ok(StartOutcome::Abandoned);
        };

        let mut read = NextFrame::new();
        read.request();
        self.state = State::MeasuringLayout {
            read,
            node,
            node_helpers,
        };
        Ok(StartOutcome::Started)
    }

    /// Layout reads and tween construction
    fn measure(
        &mut self,
        cx: &mut EngineContext<'_>,
        node: NodeId,
        node_helpers: Vec<NodeId>,
    ) -> Result<Run> {
        let viewport = cx.viewport.dimension();
        let rect = cx.doc.bounding_client_rect(node)?;
        let absolute_offset = rect.position();

        let client_rect = match self.last_client_rect.take() {
            Some(sticky) => sticky,
            None => {
                self.last_client_rect = Some(rect);
                rect
            }
        };

        cx.registry.refresh(cx.doc, viewport)?;
        let mut helpers: Vec<Helper> = cx.registry.iter().cloned().collect();
        for &node_helper in &node_helpers {
            let mut helper = cx.registry.create_helper(cx.doc, node_helper, None)?;
            helper.refresh(cx.doc, viewport)?;
            helpers.push(helper);
        }

        let ended = cx.model.ended();
        let easing = cx.model.easing().parse::<Easing>().unwrap_or_else(|err| {
            warn!("{}, falling back to linear", err);
            Easing::Linear
        });
        let mut builder = Tween::builder()
            .easing(easing)
            .direction(if ended {
                Direction::Reverse
            } else {
                Direction::Normal
            })
            .duration(cx.model.duration_ms())
            .autoplay(false);

        let mut run_helpers = Vec::with_capacity(helpers.len());
        for helper in helpers {
            let offset = if helper.global {
                Vector::new(0.0, -cx.viewport.scroll_y())
            } else {
                absolute_offset
            };
            let geometry = calculate_position(client_rect, offset, helper.end_rect, viewport, self.policy);
            trace!(
                "helper {:?}: translate ({}%, {}%), start scale {:?}",
                helper.name,
                geometry.translate_x(),
                geometry.translate_y(),
                geometry.start_scale
            );

            builder = builder.target(
                helper.el,
                TargetTracks::new()
                    .with(Property::TranslateX, Track::constant(geometry.translate_x()))
                    .with(Property::TranslateY, Track::constant(geometry.translate_y()))
                    .with(
                        Property::ScaleX,
                        Track::between(geometry.start_scale.x, geometry.end_scale.x),
                    )
                    .with(
                        Property::ScaleY,
                        Track::between(geometry.start_scale.y, geometry.end_scale.y),
                    )
                    .with(Property::Opacity, Track::to(1.0)),
            );
            run_helpers.push(RunHelper { helper, geometry });
        }

        let mut tween = builder.build();
        tween.play();
        debug!(
            "transform animating {} helper(s), {}",
            run_helpers.len(),
            tween.direction().as_str()
        );

        Ok(Run {
            node,
            node_helpers,
            helpers: run_helpers,
            tween,
        })
    }

    fn begin(&mut self, cx: &mut EngineContext<'_>, run: &Run) -> Result<()> {
        if cx.model.ended() {
            return Ok(());
        }
        for RunHelper { helper, geometry } in &run.helpers {
            cx.doc.set_css_text(helper.el, &geometry.css_text(false))?;
            cx.doc.add_class(helper.el, HELPER_CLASS)?;
            cx.doc.add_class(helper.el, HELPER_PREPARE_CLASS)?;
        }
        Ok(())
    }

    /// Tears down the DOM first and flips the model last, so a failed DOM
    /// write leaves the model describing the run that was in flight.
    fn complete(&mut self, cx: &mut EngineContext<'_>, run: &Run) -> Result<()> {
        let ended = !cx.model.ended();

        if ended {
            for RunHelper { helper, .. } in &run.helpers {
                if helper.options.hide_complete {
                    cx.doc.remove_class(helper.el, HELPER_PREPARE_CLASS)?;
                    cx.doc.style_mut(helper.el)?.clear();
                }
            }
        } else {
            if let Some(last) = cx.model.last_node() {
                cx.doc.style_mut(last)?.clear();
            }
            for RunHelper { helper, .. } in &run.helpers {
                cx.doc.remove_class(helper.el, HELPER_CLASS)?;
                cx.doc.remove_class(helper.el, HELPER_PREPARE_CLASS)?;
                cx.doc.style_mut(helper.el)?.clear();
            }
        }

        let model = &mut *cx.model;
        model.set_ended(ended)?;
        model.set_last_node_helpers(run.node_helpers.clone())?;
        model.set_running(false)?;
        // a completed reverse run forgets its node, unless nothing was animated
        if ended || run.helpers.is_empty() {
            model.set_last_node(Some(run.node))?;
        } else {
            model.set_last_node(None)?;
        }

        debug!("transform completed (ended: {})", ended);
        Ok(())
    }
}
