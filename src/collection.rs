//! Dense list with deferred removal.
//!
//! Collision passes mark entities dead while walking the list; nothing is
//! actually removed until [`RemovalList::apply_pending_removals`] runs at the
//! end of the pass, so indices stay valid for the whole tick.

use std::ops::Index;

#[derive(Clone, Debug)]
pub struct RemovalList<T> {
    items: Vec<T>,
    pending: Vec<bool>,
}

impl<T> Default for RemovalList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pending: Vec::new(),
        }
    }
}

impl<T> RemovalList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
        self.pending.push(false);
    }

    pub fn extend<I: IntoIterator<Item = T>>(&mut self, items: I) {
        for item in items {
            self.push(item);
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Insertion order, pending items included.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    /// Items not yet queued for removal, with their indices.
    pub fn live(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.items
            .iter()
            .enumerate()
            .filter(move |(i, _)| !self.pending[*i])
    }

    /// Mark `index` for removal. Returns `true` only the first time an item is
    /// queued; repeats and out-of-range indices are no-ops.
    pub fn queue_removal(&mut self, index: usize) -> bool {
        match self.pending.get_mut(index) {
            Some(flag) if !*flag => {
                *flag = true;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self, index: usize) -> bool {
        self.pending.get(index).copied().unwrap_or(false)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.iter().filter(|p| **p).count()
    }

    /// Drop every queued item in one sweep, keeping the survivors in order.
    /// Returns how many were removed.
    pub fn apply_pending_removals(&mut self) -> usize {
        let before = self.items.len();
        let mut flags = std::mem::take(&mut self.pending).into_iter();
        self.items.retain(|_| !flags.next().unwrap_or(false));
        self.pending = vec![false; self.items.len()];
        before - self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.pending.clear();
    }
}

impl<T> Index<usize> for RemovalList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<'a, T> IntoIterator for &'a RemovalList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
