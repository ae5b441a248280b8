//! Integration tests for the transform controller
//!
//! These tests drive a controller frame by frame against an in-memory
//! document and verify that:
//! - Clicks toggle between the forward and the reverse trip
//! - Starts are ignored while a run is in flight
//! - Helper geometry matches the closed-form mapping
//! - Aliased and global helpers pick the right end node and offset
//! - The source rect is sticky across the forward/reverse pair
//! - Viewport events refresh helpers unless the transform is parked

use std::cell::Cell;
use std::rc::Rc;

use morph_controllers::{Phase, StartOutcome, TransformConfig, TransformController};
use morph_core::{NodeId, Rect, Vector};
use morph_dom::{parse_fragment, Document, Selector, ViewportObserver};
use pretty_assertions::assert_eq;

const CARD: Rect = Rect::new(0.0, 0.0, 100.0, 100.0);
const DETAIL: Rect = Rect::new(200.0, 0.0, 50.0, 50.0);

const SIMPLE: &str = r#"<main>
  <div class="card" data-transform-target-name="gallery"></div>
  <section class="detail" data-transform-helper-name="detail"></section>
</main>"#;

const ALIASED: &str = r#"<main>
  <div class="card" data-transform-target-name="gallery"><img data-transform-helper="detail"></div>
  <section class="detail" data-transform-helper-name="detail"></section>
</main>"#;

struct Page {
    doc: Document,
    viewport: Rc<ViewportObserver>,
    controller: TransformController,
}

impl Page {
    fn new(markup: &str, config: TransformConfig) -> Self {
        let mut doc = Document::new();
        let fragment = parse_fragment(&mut doc, markup).unwrap();
        let body = doc.body();
        doc.append_child(body, fragment).unwrap();
        set_rects(&mut doc, ".card", CARD);
        set_rects(&mut doc, "[data-transform-helper-name]", DETAIL);

        let viewport = Rc::new(ViewportObserver::new());
        let controller = TransformController::new(&mut doc, body, &config, viewport.clone()).unwrap();
        viewport.init(Vector::new(1000.0, 1000.0));
        Self {
            doc,
            viewport,
            controller,
        }
    }

    fn simple() -> Self {
        Self::new(SIMPLE, config())
    }

    fn node(&self, selector: &str) -> NodeId {
        let selector = Selector::parse(selector).unwrap();
        self.doc.query_selector(self.doc.body(), &selector).unwrap()
    }

    fn marker(&self, name: &str) -> NodeId {
        self.controller.registry().find(name).unwrap().el
    }

    fn click(&mut self, selector: &str) -> Option<StartOutcome> {
        let target = self.node(selector);
        self.controller.handle_click(&mut self.doc, target).unwrap()
    }

    fn frame(&mut self) {
        self.controller.frame(&mut self.doc, 50.0).unwrap();
    }

    /// Run frames until the controller is idle again
    fn settle(&mut self) {
        for _ in 0..100 {
            self.frame();
            if self.controller.phase() == Phase::Idle {
                return;
            }
        }
        panic!("transform did not settle");
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.doc.has_class(node, class)
    }
}

fn config() -> TransformConfig {
    TransformConfig::default()
        .with_name("gallery")
        .with_duration(100)
}

fn set_rects(doc: &mut Document, selector: &str, rect: Rect) {
    let selector = Selector::parse(selector).unwrap();
    for node in doc.query_selector_all(doc.body(), &selector) {
        doc.set_layout_rect(node, rect).unwrap();
    }
}

fn approx(a: Vector, b: Vector) -> bool {
    (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
}

/// Two clicks run the forward and then the reverse trip
#[test]
fn test_clicks_toggle_ended() {
    let mut page = Page::simple();
    let root = page.doc.body();

    assert_eq!(page.click(".card"), Some(StartOutcome::Started));
    assert!(page.has_class(root, "js-transform-running"));
    page.settle();

    assert!(page.controller.model().ended());
    assert!(!page.controller.model().running());
    assert!(page.has_class(root, "js-transform-ended"));
    assert!(!page.has_class(root, "js-transform-running"));
    assert_eq!(page.controller.model().last_node(), Some(page.node(".card")));

    assert_eq!(page.click(".card"), Some(StartOutcome::Started));
    page.settle();

    assert!(!page.controller.model().ended());
    assert!(!page.has_class(root, "js-transform-ended"));
    // a reverse run over at least one helper forgets the node
    assert_eq!(page.controller.model().last_node(), None);
}

/// Starting while a run is in flight does nothing
#[test]
fn test_start_is_not_reentrant() {
    let mut page = Page::simple();
    let began = Rc::new(Cell::new(0));
    let ended = Rc::new(Cell::new(0));
    {
        let began = began.clone();
        page.controller.on_transform_start(move |_| began.set(began.get() + 1));
        let ended = ended.clone();
        page.controller.on_transform_end(move |_| ended.set(ended.get() + 1));
    }

    assert_eq!(page.click(".card"), Some(StartOutcome::Started));
    assert_eq!(page.click(".card"), Some(StartOutcome::Ignored));
    page.frame();
    page.frame();
    assert_eq!(
        page.controller
            .start_transform(&mut page.doc, None, None)
            .unwrap(),
        StartOutcome::Ignored
    );
    page.settle();

    assert_eq!(began.get(), 1);
    assert_eq!(ended.get(), 1);
    assert!(page.controller.model().ended());
}

/// Clicks on targets named for another transform are ignored
#[test]
fn test_click_for_other_transform_is_ignored() {
    let mut page = Page::new(SIMPLE, config().with_name("other"));
    assert_eq!(page.click(".card"), None);
    assert_eq!(page.click(".detail"), None);
    assert!(!page.controller.model().running());
}

/// Source 100x100 at the origin onto a 50x50 helper at x=200
#[test]
fn test_closed_form_geometry_and_helper_style() {
    let mut page = Page::simple();
    page.click(".card");
    page.frame(); // delay
    page.frame(); // layout read

    let run = page.controller.engine().run().unwrap();
    assert_eq!(run.helpers.len(), 1);
    let geometry = run.helpers[0].geometry;
    assert!(approx(geometry.start_scale, Vector::new(2.0, 2.0)));
    assert_eq!(geometry.end_scale, Vector::ONE);
    assert!(approx(geometry.end_position, Vector::new(4.0, 0.0)));
    assert!(approx(geometry.origin, Vector::new(4.0, 0.0)));

    page.frame(); // begin, halfway through the tween
    let marker = page.marker("detail");
    assert!(page.has_class(marker, "transform-helper"));
    assert!(page.has_class(marker, "transform-helper-prepare"));
    assert_eq!(
        page.doc.style(marker).unwrap().css_text(),
        "width: 50px; height: 50px; transform: translateX(400%) translateY(0%) scale(1.5, 1.5); transform-origin: 400% 0%; opacity: 1;"
    );
}

/// The forward run plays normally, the reverse run backwards
#[test]
fn test_direction_flips_with_ended() {
    let mut page = Page::simple();
    page.click(".card");
    page.frame();
    page.frame();
    assert_eq!(
        page.controller.engine().run().unwrap().tween.direction(),
        morph_animation::Direction::Normal
    );
    page.settle();

    page.click(".card");
    page.frame();
    page.frame();
    assert_eq!(
        page.controller.engine().run().unwrap().tween.direction(),
        morph_animation::Direction::Reverse
    );
}

/// Nodes carrying `data-transform-helper` become ad-hoc helpers that mimic
/// the aliased helper's end node
#[test]
fn test_aliased_helper_uses_registered_end_node() {
    let mut page = Page::new(ALIASED, config());
    let img = page.node("img");
    let detail = page.node(".detail");

    page.click(".card");
    page.frame();
    page.frame();

    let run = page.controller.engine().run().unwrap();
    assert_eq!(run.node_helpers, vec![img]);
    assert_eq!(run.helpers.len(), 2);
    let adhoc = &run.helpers[1];
    assert_eq!(adhoc.helper.el, img);
    assert_eq!(adhoc.helper.end_node, detail);
    assert!(!adhoc.helper.global);
    assert!(approx(adhoc.geometry.start_scale, run.helpers[0].geometry.start_scale));

    page.frame();
    assert!(page.has_class(img, "transform-helper-prepare"));
}

/// Global helpers are offset by scroll, local ones by the source node
#[test]
fn test_global_and_local_offsets() {
    let mut page = Page::new(ALIASED, config());
    let card = page.node(".card");
    page.doc
        .set_layout_rect(card, Rect::new(0.0, 300.0, 100.0, 100.0))
        .unwrap();
    page.viewport.set_scroll_y(250.0);

    page.click(".card");
    page.frame();
    page.frame();

    let run = page.controller.engine().run().unwrap();
    let global = &run.helpers[0].geometry;
    assert!(approx(global.end_node_position, Vector::new(0.2, 0.25)));
    assert!(approx(global.start_node_position, Vector::new(0.0, 0.55)));

    let local = &run.helpers[1].geometry;
    assert!(approx(local.end_node_position, Vector::new(0.2, -0.3)));
    assert!(approx(local.start_node_position, Vector::ZERO));
}

/// The reverse run reuses the forward run's source rect
#[test]
fn test_client_rect_is_sticky_for_the_return_trip() {
    let mut page = Page::simple();
    let card = page.node(".card");

    page.click(".card");
    page.settle();
    assert_eq!(page.controller.engine().last_client_rect(), Some(CARD));

    page.doc
        .set_layout_rect(card, Rect::new(500.0, 500.0, 300.0, 300.0))
        .unwrap();
    page.click(".card");
    page.frame();
    page.frame();

    let run = page.controller.engine().run().unwrap();
    assert_eq!(
        run.helpers[0].geometry.start_node_dimension,
        Vector::new(0.1, 0.1)
    );
    assert_eq!(page.controller.engine().last_client_rect(), None);

    page.settle();
    assert!(!page.controller.model().ended());
    assert_eq!(page.controller.engine().last_client_rect(), None);
}

/// Resize and scroll refresh helpers unless the transform is parked
#[test]
fn test_viewport_refresh_is_gated_while_parked() {
    let mut page = Page::simple();
    page.frame(); // init
    let reads = page.doc.layout_reads();
    assert_eq!(reads, 1);

    page.viewport.set_dimension(Vector::new(800.0, 1000.0));
    page.frame();
    assert_eq!(page.doc.layout_reads(), reads + 1);
    let end = page.controller.registry().find("detail").unwrap();
    assert!(approx(end.end_node_position, Vector::new(0.25, 0.0)));

    page.click(".card");
    page.settle();
    assert!(page.controller.model().is_parked());

    let reads = page.doc.layout_reads();
    page.viewport.set_dimension(Vector::new(1000.0, 1000.0));
    page.viewport.set_scroll_y(40.0);
    page.frame();
    assert_eq!(page.doc.layout_reads(), reads);

    page.viewport.init(Vector::new(1000.0, 1000.0));
    page.frame();
    assert_eq!(page.doc.layout_reads(), reads + 1);
}

/// `data-transform-hide-complete` helpers drop their prepared state when the
/// forward run completes; the others keep it until the return trip ends.
/// An empty attribute value does not enable the option.
#[test]
fn test_hide_complete_and_teardown() {
    let markup = r#"<main>
      <div class="card" data-transform-target-name="gallery"></div>
      <section data-transform-helper-name="detail" data-transform-hide-complete="true"></section>
      <aside data-transform-helper-name="aside"></aside>
      <figure data-transform-helper-name="figure" data-transform-hide-complete></figure>
    </main>"#;
    let mut page = Page::new(markup, config());
    let detail = page.marker("detail");
    let aside = page.marker("aside");
    let figure = page.marker("figure");

    page.click(".card");
    page.settle();

    assert!(!page.has_class(detail, "transform-helper-prepare"));
    assert!(page.doc.style(detail).unwrap().is_empty());
    for kept in [aside, figure] {
        assert!(page.has_class(kept, "transform-helper-prepare"));
        assert!(!page.doc.style(kept).unwrap().is_empty());
    }

    page.click(".card");
    page.settle();

    for marker in [detail, aside, figure] {
        assert!(!page.has_class(marker, "transform-helper"));
        assert!(!page.has_class(marker, "transform-helper-prepare"));
        assert!(page.has_class(marker, "transform-helper-hidden"));
        assert!(page.doc.style(marker).unwrap().is_empty());
    }
}

/// Without a node or a last node the run is dropped after the delay
#[test]
fn test_run_without_node_is_abandoned() {
    let mut page = Page::simple();
    let outcome = page
        .controller
        .start_transform(&mut page.doc, None, None)
        .unwrap();
    assert_eq!(outcome, StartOutcome::Started);
    assert!(page.controller.model().running());

    page.frame();
    assert_eq!(page.controller.phase(), Phase::Idle);
    assert!(!page.controller.model().running());
    assert!(!page.has_class(page.doc.body(), "js-transform-running"));
}

/// The last node and helpers are reused when a start names neither
#[test]
fn test_start_falls_back_to_last_node() {
    let mut page = Page::simple();
    page.click(".card");
    page.settle();

    page.controller
        .start_transform(&mut page.doc, None, None)
        .unwrap();
    page.frame();
    page.frame();
    assert_eq!(
        page.controller.engine().run().unwrap().node,
        page.node(".card")
    );
    page.settle();
    assert!(!page.controller.model().ended());
}

#[test]
fn test_delays_are_counted_in_frames() {
    let mut page = Page::new(SIMPLE, config().with_delays(3, -1));
    page.click(".card");
    for _ in 0..2 {
        page.frame();
        assert_eq!(page.controller.phase(), Phase::Delaying);
    }
    page.frame();
    assert_eq!(page.controller.phase(), Phase::MeasuringLayout);
    page.settle();

    // negative end delay: measured on the very next frame
    page.click(".card");
    assert_eq!(page.controller.phase(), Phase::MeasuringLayout);
    page.frame();
    assert_eq!(page.controller.phase(), Phase::Animating);
}

#[test]
fn test_create_helper_disabled_registers_nothing() {
    let mut config = config();
    config.create_helper = false;
    let page = Page::new(SIMPLE, config);
    assert!(page.controller.registry().is_empty());
}

#[test]
fn test_destroy_and_drop_unsubscribe() {
    let mut page = Page::simple();
    assert_eq!(page.viewport.subscriber_count(), 1);
    page.controller.destroy();
    assert!(!page.controller.is_subscribed());
    assert_eq!(page.viewport.subscriber_count(), 0);

    let viewport = page.viewport.clone();
    let body = page.doc.body();
    let second = TransformController::new(&mut page.doc, body, &config(), viewport.clone()).unwrap();
    assert_eq!(viewport.subscriber_count(), 1);
    drop(second);
    assert_eq!(viewport.subscriber_count(), 0);
}
