//! Listener registry
//!
//! Synchronous, single-threaded event fan-out used by models, collections and
//! the viewport observer.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle returned by [`Listeners::subscribe`]
    pub struct ListenerId;
}

/// Event handler function type
pub type Handler<E> = Box<dyn FnMut(&E)>;

/// Dispatches events of type `E` to registered handlers
///
/// Handlers run in registration order.
pub struct Listeners<E> {
    handlers: SlotMap<ListenerId, Handler<E>>,
    order: Vec<ListenerId>,
}

impl<E> Listeners<E> {
    pub fn new() -> Self {
        Self {
            handlers: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    /// Register a handler
    pub fn subscribe<F>(&mut self, handler: F) -> ListenerId
    where
        F: FnMut(&E) + 'static,
    {
        let id = self.handlers.insert(Box::new(handler));
        self.order.push(id);
        id
    }

    /// Remove a handler. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.order.retain(|other| *other != id);
        self.handlers.remove(id).is_some()
    }

    /// Dispatch an event to all registered handlers
    pub fn emit(&mut self, event: &E) {
        for id in &self.order {
            if let Some(handler) = self.handlers.get_mut(*id) {
                handler(event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.handlers.len())
            .finish()
    }
}
