//! Helper geometry
//!
//! Maps a source rectangle onto a helper's end rectangle. All values are
//! viewport-normalized: pixel measurements divided by the viewport
//! dimension.
//!
//! For a source box `S` and an end box `E` (after subtracting the offset):
//!
//! ```text
//! start_scale = S.dimension / E.dimension
//! end_position = E.position / E.dimension
//! origin = (S.position - E.position) / (E.dimension - S.dimension)
//! ```
//!
//! Scaling `E` by `start_scale` about `origin` lands exactly on `S`, so the
//! tween from `start_scale` to `(1, 1)` morphs the source into the helper.

use morph_core::{Rect, Vector};
use tracing::warn;

/// Resolution of a transform-origin axis whose denominator is zero
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OriginPolicy {
    /// Replace a non-finite axis with the given fraction of the helper box
    Clamp(f32),
    /// Keep the non-finite value
    Propagate,
}

impl Default for OriginPolicy {
    fn default() -> Self {
        OriginPolicy::Clamp(0.5)
    }
}

/// Per-run mapping of one helper
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HelperGeometry {
    /// Viewport dimension the geometry was computed against, in pixels
    pub viewport: Vector,
    pub start_node_position: Vector,
    pub start_node_dimension: Vector,
    /// End position with the offset already subtracted
    pub end_node_position: Vector,
    pub end_node_dimension: Vector,
    pub start_position: Vector,
    pub end_position: Vector,
    pub start_scale: Vector,
    pub end_scale: Vector,
    pub origin: Vector,
    /// At least one origin axis was non-finite before the policy applied
    pub degenerate: bool,
}

/// Compute the geometry of one helper.
///
/// `offset_px` is subtracted from both positions: the source node's
/// absolute offset for local helpers, `(0, -scroll_y)` for global ones.
pub fn calculate_position(
    client_rect: Rect,
    offset_px: Vector,
    end_rect: Rect,
    viewport: Vector,
    policy: OriginPolicy,
) -> HelperGeometry {
    let offset = offset_px / viewport;

    let end_node_dimension = end_rect.dimension() / viewport;
    let end_node_position = end_rect.position() / viewport - offset;

    let start_node_dimension = client_rect.dimension() / viewport;
    let start_node_position = client_rect.position() / viewport - offset;

    let start_position = start_node_position * start_node_dimension;
    let end_position = end_node_position * end_node_dimension.recip();

    let start_scale = start_node_dimension / end_node_dimension;
    let end_scale = Vector::ONE;

    let raw_origin =
        (start_node_position - end_node_position) / (end_node_dimension - start_node_dimension);
    let (origin, degenerate) = resolve_origin(raw_origin, policy);
    if degenerate {
        warn!(
            "degenerate transform origin {:?} (source {:?}, end {:?}), resolved to {:?}",
            raw_origin, client_rect, end_rect, origin
        );
    }

    HelperGeometry {
        viewport,
        start_node_position,
        start_node_dimension,
        end_node_position,
        end_node_dimension,
        start_position,
        end_position,
        start_scale,
        end_scale,
        origin,
        degenerate,
    }
}

fn resolve_origin(raw: Vector, policy: OriginPolicy) -> (Vector, bool) {
    let degenerate = !raw.is_finite();
    let origin = match policy {
        OriginPolicy::Clamp(fallback) => Vector::new(
            if raw.x.is_finite() { raw.x } else { fallback },
            if raw.y.is_finite() { raw.y } else { fallback },
        ),
        OriginPolicy::Propagate => raw,
    };
    (origin, degenerate)
}

/// `-0` prints as `-0` in CSS, which is noise
fn css_number(value: f32) -> f32 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

impl HelperGeometry {
    /// Horizontal translation in percent of the helper width
    pub fn translate_x(&self) -> f32 {
        css_number(self.end_position.x * 100.0)
    }

    /// Vertical translation in percent of the helper height
    pub fn translate_y(&self) -> f32 {
        css_number(self.end_position.y * 100.0)
    }

    /// Helper box size in pixels
    pub fn size_px(&self) -> Vector {
        self.end_node_dimension * self.viewport
    }

    /// Scale shown before the tween runs: the start scale on the forward
    /// trip, the end scale once the transform has ended.
    pub fn resting_scale(&self, ended: bool) -> Vector {
        if ended {
            self.end_scale
        } else {
            self.start_scale
        }
    }

    /// Inline style applied to the helper when a forward run begins
    pub fn css_text(&self, ended: bool) -> String {
        let size = self.size_px();
        let scale = self.resting_scale(ended);
        format!(
            "width: {}px; height: {}px; transform: translate({}%, {}%) scale({}, {}); transform-origin: {}% {}%;",
            size.x,
            size.y,
            self.translate_x(),
            self.translate_y(),
            scale.x,
            scale.y,
            css_number(self.origin.x * 100.0),
            css_number(self.origin.y * 100.0),
        )
    }
}
