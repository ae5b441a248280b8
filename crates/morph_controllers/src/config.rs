//! Transform controller configuration
//!
//! Loaded from TOML. Every key is optional:
//!
//! ```toml
//! name = "gallery"
//! duration-ms = 800
//! easing = "easeInOutQuad"
//! start-delay = 0
//! end-delay = 2
//! create-helper = true
//! helper-selector = "[data-transform-helper-name]"
//! trigger-event = ".transform-helper"
//! origin-policy = "clamp"
//! origin-fallback = 0.5
//! ```

use morph_animation::Easing;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::transform::geometry::OriginPolicy;

/// How a degenerate transform-origin axis is resolved
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OriginMode {
    /// Replace the axis with `origin-fallback`
    #[default]
    Clamp,
    /// Keep the non-finite value
    Propagate,
}

/// Transform controller settings
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TransformConfig {
    /// Value matched against `data-transform-target-name` on click
    pub name: Option<String>,
    pub duration_ms: u32,
    /// Easing name, e.g. `linear`, `easeInOutQuad`, `cubicBezier(a,b,c,d)`
    pub easing: String,
    /// Frames to wait before the forward run
    pub start_delay: i32,
    /// Frames to wait before the reverse run
    pub end_delay: i32,
    /// Register every helper-selector match under the root as a global helper
    pub create_helper: bool,
    pub helper_selector: String,
    pub trigger_event: String,
    pub origin_policy: OriginMode,
    pub origin_fallback: f32,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            name: None,
            duration_ms: 1200,
            easing: "linear".to_string(),
            start_delay: 0,
            end_delay: 0,
            create_helper: true,
            helper_selector: "[data-transform-helper-name]".to_string(),
            trigger_event: ".transform-helper".to_string(),
            origin_policy: OriginMode::Clamp,
            origin_fallback: 0.5,
        }
    }
}

impl TransformConfig {
    /// Parse and validate a TOML document
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.easing.parse::<Easing>()?;
        if self.origin_policy == OriginMode::Clamp && !self.origin_fallback.is_finite() {
            return Err(ConfigError::InvalidOriginFallback(self.origin_fallback));
        }
        Ok(())
    }

    /// Builder: set the transform name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder: set start and end delays, in frames
    pub fn with_delays(mut self, start: i32, end: i32) -> Self {
        self.start_delay = start;
        self.end_delay = end;
        self
    }

    /// Builder: set the duration in milliseconds
    pub fn with_duration(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn origin_policy(&self) -> OriginPolicy {
        match self.origin_policy {
            OriginMode::Clamp => OriginPolicy::Clamp(self.origin_fallback),
            OriginMode::Propagate => OriginPolicy::Propagate,
        }
    }
}
