//! Transform Demo
//!
//! Drives a transform controller headlessly:
//! - Loads the controller configuration from TOML
//! - Builds a small page from markup and lays it out by hand
//! - Clicks a card, plays the forward trip, then clicks again for the return
//!
//! Run with: RUST_LOG=debug cargo run -p morph_controllers --example transform_demo

use std::rc::Rc;

use morph_controllers::{Phase, TransformConfig, TransformController};
use morph_core::{Rect, Vector};
use morph_dom::{parse_fragment, Document, Selector, ViewportObserver};
use tracing::info;
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r#"
name = "gallery"
duration-ms = 240
easing = "easeInOutCubic"
start-delay = 2
end-delay = -1
"#;

const PAGE: &str = r#"<main>
  <ul class="cards">
    <li class="card" data-transform-target-name="gallery">
      <img class="thumb" data-transform-helper="detail">
      <h2>Harbour at dusk</h2>
    </li>
  </ul>
  <section class="detail" data-transform-helper-name="detail"></section>
</main>"#;

const FRAME_MS: f32 = 16.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = TransformConfig::from_toml(CONFIG)?;

    let mut doc = Document::new();
    let fragment = parse_fragment(&mut doc, PAGE)?;
    let body = doc.body();
    doc.append_child(body, fragment)?;

    let card = doc
        .query_selector(body, &Selector::parse(".card")?)
        .ok_or("card missing")?;
    let thumb = doc
        .query_selector(body, &Selector::parse(".thumb")?)
        .ok_or("thumb missing")?;
    let detail = doc
        .query_selector(body, &Selector::parse(".detail")?)
        .ok_or("detail missing")?;
    doc.set_layout_rect(card, Rect::new(40.0, 120.0, 240.0, 160.0))?;
    doc.set_layout_rect(thumb, Rect::new(40.0, 120.0, 240.0, 120.0))?;
    doc.set_layout_rect(detail, Rect::new(0.0, 0.0, 1280.0, 540.0))?;

    let viewport = Rc::new(ViewportObserver::new());
    let mut controller = TransformController::new(&mut doc, body, &config, viewport.clone())?;
    viewport.init(Vector::new(1280.0, 720.0));

    controller.on_transform_start(|event| info!("started (ended: {})", event.ended));
    controller.on_transform_end(|event| info!("finished (ended: {})", event.ended));

    for trip in ["forward", "return"] {
        controller.handle_click(&mut doc, thumb)?;
        let start = controller.frame_count();
        loop {
            controller.frame(&mut doc, FRAME_MS)?;
            if let Some(run) = controller.engine().run() {
                for helper in &run.helpers {
                    info!(
                        "{:?} transform: {}",
                        helper.helper.el,
                        doc.style(helper.helper.el)?.get("transform").unwrap_or("none")
                    );
                }
            }
            if controller.phase() == Phase::Idle {
                break;
            }
        }
        info!(
            "{} trip took {} frame(s), {} layout read(s) so far",
            trip,
            controller.frame_count() - start,
            doc.layout_reads()
        );
    }

    Ok(())
}
