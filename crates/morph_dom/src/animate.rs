//! Tween output
//!
//! Lets a [`Tween`](morph_animation::Tween) targeting element ids write
//! straight into inline styles.

use morph_animation::{Property, TweenSink, TweenValues};
use morph_core::NodeId;
use tracing::warn;

use crate::document::Document;

impl TweenSink<NodeId> for Document {
    fn current(&self, target: NodeId, property: Property) -> Option<f32> {
        match property {
            Property::Opacity => self
                .style(target)
                .ok()?
                .get("opacity")
                .and_then(|value| value.parse().ok()),
            // transforms are only ever written by tweens, never read back
            _ => None,
        }
    }

    fn apply(&mut self, target: NodeId, values: &TweenValues) {
        let style = match self.style_mut(target) {
            Ok(style) => style,
            Err(err) => {
                warn!("dropping tween frame for {:?}: {}", target, err);
                return;
            }
        };
        if let Some(transform) = values.transform_css() {
            style.set("transform", transform);
        }
        if let Some(opacity) = values.opacity {
            style.set("opacity", opacity.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morph_animation::{Easing, TargetTracks, Track, Tween};

    #[test]
    fn test_tween_writes_inline_style() {
        let mut doc = Document::new();
        let node = doc.create_element("span");
        doc.set_css_text(node, "opacity: 0.5").unwrap();

        let mut tween = Tween::builder()
            .target(
                node,
                TargetTracks::new()
                    .with(Property::TranslateX, Track::constant(20.0))
                    .with(Property::ScaleX, Track::between(2.0, 1.0))
                    .with(Property::ScaleY, Track::between(2.0, 1.0))
                    .with(Property::Opacity, Track::to(1.0)),
            )
            .easing(Easing::Linear)
            .duration(100)
            .build();

        tween.advance(50.0);
        tween.render(&mut doc);

        let style = doc.style(node).unwrap();
        assert_eq!(style.get("transform"), Some("translateX(20%) scale(1.5, 1.5)"));
        assert_eq!(style.get("opacity"), Some("0.75"));
    }
}
