//! Property tweens
//!
//! A [`Tween`] interpolates a fixed set of transform properties on a list of
//! targets over a duration. It does not own the targets: values are pushed
//! into a [`TweenSink`] on [`Tween::render`].
//!
//! Playback is split in two calls so the owner can react between them:
//!
//! ```ignore
//! let step = tween.advance(dt_ms);
//! if step.began { /* prepare targets */ }
//! tween.render(&mut sink);
//! if step.completed { /* tear down */ }
//! ```

use smallvec::SmallVec;
use tracing::trace;

use crate::easing::Easing;

/// Playback direction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    /// Play from the first value to the last
    #[default]
    Normal,
    /// Play from the last value back to the first
    Reverse,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Normal => "normal",
            Direction::Reverse => "reverse",
        }
    }
}

/// An animatable property
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    /// Horizontal translation, in percent of the target's own width
    TranslateX,
    /// Vertical translation, in percent of the target's own height
    TranslateY,
    ScaleX,
    ScaleY,
    Opacity,
}

impl Property {
    /// Value assumed when neither the track nor the sink provides a start value
    pub fn initial_value(&self) -> f32 {
        match self {
            Property::TranslateX | Property::TranslateY => 0.0,
            Property::ScaleX | Property::ScaleY | Property::Opacity => 1.0,
        }
    }
}

/// Start and end value of one property
///
/// A missing `from` is resolved from the sink when the tween first renders.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Track {
    pub from: Option<f32>,
    pub to: f32,
}

impl Track {
    pub const fn between(from: f32, to: f32) -> Self {
        Self {
            from: Some(from),
            to,
        }
    }

    /// Hold a single value for the whole tween
    pub const fn constant(value: f32) -> Self {
        Self::between(value, value)
    }

    /// Animate from the target's current value
    pub const fn to(value: f32) -> Self {
        Self {
            from: None,
            to: value,
        }
    }
}

/// Tracks for one target
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TargetTracks {
    tracks: SmallVec<[(Property, Track); 5]>,
}

impl TargetTracks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the track for a property, replacing an earlier one
    pub fn with(mut self, property: Property, track: Track) -> Self {
        if let Some(slot) = self.tracks.iter_mut().find(|(p, _)| *p == property) {
            slot.1 = track;
        } else {
            self.tracks.push((property, track));
        }
        self
    }

    pub fn get(&self, property: Property) -> Option<&Track> {
        self.tracks
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, track)| track)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Property, Track)> {
        self.tracks.iter()
    }
}

/// Interpolated values for one target at one point in time
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TweenValues {
    pub translate_x: Option<f32>,
    pub translate_y: Option<f32>,
    pub scale_x: Option<f32>,
    pub scale_y: Option<f32>,
    pub opacity: Option<f32>,
}

impl TweenValues {
    pub fn get(&self, property: Property) -> Option<f32> {
        match property {
            Property::TranslateX => self.translate_x,
            Property::TranslateY => self.translate_y,
            Property::ScaleX => self.scale_x,
            Property::ScaleY => self.scale_y,
            Property::Opacity => self.opacity,
        }
    }

    fn set(&mut self, property: Property, value: f32) {
        let slot = match property {
            Property::TranslateX => &mut self.translate_x,
            Property::TranslateY => &mut self.translate_y,
            Property::ScaleX => &mut self.scale_x,
            Property::ScaleY => &mut self.scale_y,
            Property::Opacity => &mut self.opacity,
        };
        *slot = Some(value);
    }

    /// CSS `transform` value for the transform properties, if any are set
    pub fn transform_css(&self) -> Option<String> {
        let mut parts: SmallVec<[String; 3]> = SmallVec::new();
        if let Some(x) = self.translate_x {
            parts.push(format!("translateX({}%)", x));
        }
        if let Some(y) = self.translate_y {
            parts.push(format!("translateY({}%)", y));
        }
        match (self.scale_x, self.scale_y) {
            (None, None) => {}
            (x, y) => parts.push(format!(
                "scale({}, {})",
                x.unwrap_or(1.0),
                y.unwrap_or(1.0)
            )),
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// Receives interpolated values for tween targets
pub trait TweenSink<T> {
    /// Current value of a property on a target, used to resolve open tracks
    fn current(&self, target: T, property: Property) -> Option<f32>;

    /// Write interpolated values to a target
    fn apply(&mut self, target: T, values: &TweenValues);
}

/// Lifecycle notifications produced by [`Tween::advance`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TweenStep {
    /// The tween started playing this frame
    pub began: bool,
    /// The tween reached its end this frame
    pub completed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TweenState {
    Idle,
    Playing { began: bool },
    Completed,
}

#[derive(Clone, Debug)]
struct TweenTarget<T> {
    target: T,
    tracks: TargetTracks,
    /// Start values resolved on first render, in track order
    resolved: Option<SmallVec<[f32; 5]>>,
}

/// Builder for [`Tween`]
#[derive(Clone, Debug)]
pub struct TweenBuilder<T> {
    targets: Vec<(T, TargetTracks)>,
    easing: Easing,
    direction: Direction,
    duration_ms: u32,
    autoplay: bool,
}

impl<T: Copy> Default for TweenBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> TweenBuilder<T> {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            easing: Easing::Linear,
            direction: Direction::Normal,
            duration_ms: 1000,
            autoplay: true,
        }
    }

    /// Add a target with its property tracks
    pub fn target(mut self, target: T, tracks: TargetTracks) -> Self {
        self.targets.push((target, tracks));
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn duration(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Start playing on construction (defaults to `true`)
    pub fn autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    pub fn build(self) -> Tween<T> {
        let mut tween = Tween {
            targets: self
                .targets
                .into_iter()
                .map(|(target, tracks)| TweenTarget {
                    target,
                    tracks,
                    resolved: None,
                })
                .collect(),
            easing: self.easing,
            direction: self.direction,
            duration_ms: self.duration_ms,
            elapsed_ms: 0.0,
            state: TweenState::Idle,
        };
        if self.autoplay {
            tween.play();
        }
        tween
    }
}

/// A multi-target property tween
#[derive(Clone, Debug)]
pub struct Tween<T> {
    targets: Vec<TweenTarget<T>>,
    easing: Easing,
    direction: Direction,
    duration_ms: u32,
    elapsed_ms: f32,
    state: TweenState,
}

impl<T: Copy> Tween<T> {
    pub fn builder() -> TweenBuilder<T> {
        TweenBuilder::new()
    }

    /// Start (or restart) playback from the beginning
    pub fn play(&mut self) {
        self.elapsed_ms = 0.0;
        self.state = TweenState::Playing { began: false };
        for target in &mut self.targets {
            target.resolved = None;
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, TweenState::Playing { .. })
    }

    pub fn is_completed(&self) -> bool {
        self.state == TweenState::Completed
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn targets(&self) -> impl Iterator<Item = T> + '_ {
        self.targets.iter().map(|t| t.target)
    }

    /// Tracks of the target at `index`
    pub fn tracks(&self, index: usize) -> Option<&TargetTracks> {
        self.targets.get(index).map(|t| &t.tracks)
    }

    /// Linear time progress (0.0 to 1.0), before direction and easing
    pub fn progress(&self) -> f32 {
        match self.state {
            TweenState::Idle => 0.0,
            TweenState::Completed => 1.0,
            TweenState::Playing { .. } => {
                if self.duration_ms == 0 {
                    1.0
                } else {
                    (self.elapsed_ms / self.duration_ms as f32).clamp(0.0, 1.0)
                }
            }
        }
    }

    /// Advance playback by `dt_ms` milliseconds
    pub fn advance(&mut self, dt_ms: f32) -> TweenStep {
        let TweenState::Playing { began } = self.state else {
            return TweenStep::default();
        };

        let mut step = TweenStep {
            began: !began,
            completed: false,
        };
        self.elapsed_ms += dt_ms.max(0.0);
        if self.elapsed_ms >= self.duration_ms as f32 {
            self.elapsed_ms = self.duration_ms as f32;
            self.state = TweenState::Completed;
            step.completed = true;
            trace!("tween completed ({})", self.direction.as_str());
        } else {
            self.state = TweenState::Playing { began: true };
        }
        step
    }

    /// Push the values for the current progress into `sink`
    pub fn render<S: TweenSink<T> + ?Sized>(&mut self, sink: &mut S) {
        if self.state == TweenState::Idle {
            return;
        }
        let mut t = self.progress();
        if self.direction == Direction::Reverse {
            t = 1.0 - t;
        }
        let eased = self.easing.apply(t);

        for target in &mut self.targets {
            let resolved = target.resolved.get_or_insert_with(|| {
                target
                    .tracks
                    .iter()
                    .map(|(property, track)| {
                        track
                            .from
                            .or_else(|| sink.current(target.target, *property))
                            .unwrap_or_else(|| property.initial_value())
                    })
                    .collect()
            });

            let mut values = TweenValues::default();
            for ((property, track), from) in target.tracks.iter().zip(resolved.iter()) {
                values.set(*property, from + (track.to - from) * eased);
            }
            sink.apply(target.target, &values);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Recorder {
        current: HashMap<(u32, Property), f32>,
        applied: Vec<(u32, TweenValues)>,
    }

    impl TweenSink<u32> for Recorder {
        fn current(&self, target: u32, property: Property) -> Option<f32> {
            self.current.get(&(target, property)).copied()
        }

        fn apply(&mut self, target: u32, values: &TweenValues) {
            self.applied.push((target, *values));
        }
    }

    fn scale_tracks() -> TargetTracks {
        TargetTracks::new()
            .with(Property::TranslateX, Track::constant(50.0))
            .with(Property::ScaleX, Track::between(2.0, 1.0))
            .with(Property::ScaleY, Track::between(2.0, 1.0))
    }

    #[test]
    fn test_begin_and_complete_reported_once() {
        let mut tween = Tween::builder()
            .target(1u32, scale_tracks())
            .duration(100)
            .autoplay(false)
            .build();

        assert_eq!(tween.advance(16.0), TweenStep::default());
        tween.play();

        assert_eq!(
            tween.advance(50.0),
            TweenStep {
                began: true,
                completed: false
            }
        );
        assert_eq!(tween.advance(40.0), TweenStep::default());
        assert_eq!(
            tween.advance(40.0),
            TweenStep {
                began: false,
                completed: true
            }
        );
        assert!(tween.is_completed());
        assert_eq!(tween.advance(16.0), TweenStep::default());
    }

    #[test]
    fn test_normal_direction_interpolates_forward() {
        let mut tween = Tween::builder()
            .target(1u32, scale_tracks())
            .duration(100)
            .build();
        let mut sink = Recorder::default();

        tween.advance(50.0);
        tween.render(&mut sink);
        let (_, values) = sink.applied[0];
        assert_eq!(values.translate_x, Some(50.0));
        assert_eq!(values.scale_x, Some(1.5));

        tween.advance(50.0);
        tween.render(&mut sink);
        assert_eq!(sink.applied[1].1.scale_y, Some(1.0));
    }

    #[test]
    fn test_reverse_direction_ends_on_first_value() {
        let mut tween = Tween::builder()
            .target(1u32, scale_tracks())
            .direction(Direction::Reverse)
            .duration(100)
            .build();
        let mut sink = Recorder::default();

        tween.advance(0.0);
        tween.render(&mut sink);
        assert_eq!(sink.applied[0].1.scale_x, Some(1.0));

        tween.advance(100.0);
        tween.render(&mut sink);
        assert_eq!(sink.applied[1].1.scale_x, Some(2.0));
    }

    #[test]
    fn test_open_track_resolves_from_sink() {
        let mut sink = Recorder::default();
        sink.current.insert((7, Property::Opacity), 0.0);

        let mut tween = Tween::builder()
            .target(7u32, TargetTracks::new().with(Property::Opacity, Track::to(1.0)))
            .target(8u32, TargetTracks::new().with(Property::Opacity, Track::to(1.0)))
            .duration(10)
            .build();
        tween.advance(5.0);
        tween.render(&mut sink);

        assert_eq!(sink.applied[0], (7, TweenValues {
            opacity: Some(0.5),
            ..Default::default()
        }));
        assert_eq!(sink.applied[1].1.opacity, Some(1.0));
    }

    #[test]
    fn test_zero_duration_completes_on_first_advance() {
        let mut tween = Tween::builder()
            .target(1u32, scale_tracks())
            .duration(0)
            .build();
        assert_eq!(
            tween.advance(0.0),
            TweenStep {
                began: true,
                completed: true
            }
        );
    }

    #[test]
    fn test_transform_css() {
        let values = TweenValues {
            translate_x: Some(20.0),
            translate_y: Some(-10.0),
            scale_x: Some(2.0),
            scale_y: Some(0.5),
            opacity: Some(1.0),
        };
        assert_eq!(
            values.transform_css().as_deref(),
            Some("translateX(20%) translateY(-10%) scale(2, 0.5)")
        );
        assert_eq!(TweenValues::default().transform_css(), None);
    }
}
