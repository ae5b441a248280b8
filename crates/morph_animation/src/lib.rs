//! Morph Animation System
//!
//! Frame-driven primitives for element transitions.
//!
//! # Features
//!
//! - **Easing**: the usual polynomial, sine and cubic-bezier curves, parsed from their camel-case names
//! - **Frame delays**: resolve-once waits counted in animation frames
//! - **Tweens**: multi-target property interpolation with begin/complete steps and reverse playback

pub mod easing;
pub mod frame;
pub mod tween;

pub use easing::{Easing, EasingParseError};
pub use frame::{FrameClock, FrameDelay, NextFrame};
pub use tween::{
    Direction, Property, TargetTracks, Track, Tween, TweenBuilder, TweenSink, TweenStep,
    TweenValues,
};
