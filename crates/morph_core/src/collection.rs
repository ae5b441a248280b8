//! Ordered live collections

use crate::events::{ListenerId, Listeners};

/// Notification emitted by [`Collection::add`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Added {
    /// Position of the new item
    pub index: usize,
}

/// An append-only ordered collection with `add` listeners
///
/// Iteration order is insertion order.
pub struct Collection<T> {
    items: Vec<T>,
    listeners: Listeners<Added>,
}

impl<T> Collection<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            listeners: Listeners::new(),
        }
    }

    /// Append an item and notify listeners. Returns the new item's index.
    pub fn add(&mut self, item: T) -> usize {
        let index = self.items.len();
        self.items.push(item);
        self.listeners.emit(&Added { index });
        index
    }

    pub fn on_add<F>(&mut self, handler: F) -> ListenerId
    where
        F: FnMut(&Added) + 'static,
    {
        self.listeners.subscribe(handler)
    }

    pub fn off_add(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn find<P>(&self, predicate: P) -> Option<&T>
    where
        P: FnMut(&&T) -> bool,
    {
        self.items.iter().find(predicate)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
