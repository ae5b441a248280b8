//! Viewport
//!
//! The viewport exposes its current dimension and vertical scroll and
//! publishes `Init`, `Resize` and `Scroll` events. Consumers receive events
//! through a [`ViewportSubscription`] queue which they drain on their own
//! frame, so no callback ever runs while the publisher is borrowed.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use morph_core::Vector;
use slotmap::{new_key_type, SlotMap};
use tracing::trace;

new_key_type! {
    /// Identifies one viewport subscription
    pub struct SubscriptionId;
}

/// Viewport notifications
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportEvent {
    /// The viewport measured itself for the first time
    Init,
    Resize,
    Scroll,
}

type Queue = Rc<RefCell<VecDeque<ViewportEvent>>>;

/// Receiving end of a viewport subscription
#[derive(Debug)]
pub struct ViewportSubscription {
    id: SubscriptionId,
    queue: Queue,
}

impl ViewportSubscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Take every event published since the last drain, oldest first
    pub fn drain(&self) -> Vec<ViewportEvent> {
        self.queue.borrow_mut().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

/// Source of viewport geometry and events
pub trait Viewport {
    /// Width and height in pixels
    fn dimension(&self) -> Vector;

    /// Vertical scroll offset in pixels
    fn scroll_y(&self) -> f32;

    fn subscribe(&self) -> ViewportSubscription;

    fn unsubscribe(&self, subscription: &ViewportSubscription);
}

/// In-process viewport driven by the host
///
/// ```ignore
/// let viewport = Rc::new(ViewportObserver::new());
/// let sub = viewport.subscribe();
/// viewport.init(Vector::new(1280.0, 720.0));
/// assert_eq!(sub.drain(), vec![ViewportEvent::Init]);
/// ```
#[derive(Debug, Default)]
pub struct ViewportObserver {
    dimension: Cell<Vector>,
    scroll_y: Cell<f32>,
    initialized: Cell<bool>,
    subscribers: RefCell<SlotMap<SubscriptionId, Queue>>,
}

impl ViewportObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the first measurement and publish `Init`
    pub fn init(&self, dimension: Vector) {
        self.dimension.set(dimension);
        self.initialized.set(true);
        self.publish(ViewportEvent::Init);
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.get()
    }

    /// Update the dimension and publish `Resize`
    pub fn set_dimension(&self, dimension: Vector) {
        self.dimension.set(dimension);
        self.publish(ViewportEvent::Resize);
    }

    /// Update the scroll offset and publish `Scroll`
    pub fn set_scroll_y(&self, scroll_y: f32) {
        self.scroll_y.set(scroll_y);
        self.publish(ViewportEvent::Scroll);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    fn publish(&self, event: ViewportEvent) {
        let subscribers = self.subscribers.borrow();
        trace!("viewport {:?} -> {} subscriber(s)", event, subscribers.len());
        for queue in subscribers.values() {
            queue.borrow_mut().push_back(event);
        }
    }
}

impl Viewport for ViewportObserver {
    fn dimension(&self) -> Vector {
        self.dimension.get()
    }

    fn scroll_y(&self) -> f32 {
        self.scroll_y.get()
    }

    fn subscribe(&self) -> ViewportSubscription {
        let queue: Queue = Rc::default();
        let id = self.subscribers.borrow_mut().insert(Rc::clone(&queue));
        ViewportSubscription { id, queue }
    }

    fn unsubscribe(&self, subscription: &ViewportSubscription) {
        self.subscribers.borrow_mut().remove(subscription.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_are_queued_per_subscription() {
        let viewport = ViewportObserver::new();
        let a = viewport.subscribe();
        viewport.init(Vector::new(1000.0, 800.0));
        let b = viewport.subscribe();
        viewport.set_scroll_y(120.0);
        viewport.set_dimension(Vector::new(500.0, 800.0));

        assert_eq!(
            a.drain(),
            vec![ViewportEvent::Init, ViewportEvent::Scroll, ViewportEvent::Resize]
        );
        assert_eq!(b.drain(), vec![ViewportEvent::Scroll, ViewportEvent::Resize]);
        assert!(a.is_empty());
        assert_eq!(viewport.dimension(), Vector::new(500.0, 800.0));
        assert_eq!(viewport.scroll_y(), 120.0);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let viewport = ViewportObserver::new();
        let sub = viewport.subscribe();
        viewport.unsubscribe(&sub);
        viewport.set_scroll_y(1.0);
        assert!(sub.is_empty());
        assert_eq!(viewport.subscriber_count(), 0);
    }
}
