//! Ordered item storage with an optional filtered view.
//!
//! [`ItemCollection`] keeps the full set of a menu's items in insertion (or
//! sorted) order. A filter never copies or drops items: it records the
//! positions of the matching items, and every position-based accessor works
//! on that active view. Filters are always evaluated against the full set, so
//! re-filtering never narrows an already narrowed view.

use std::cmp::Ordering;

use crate::item::{Item, ItemId};

/// An item removed from a collection, with its former active-view position.
#[derive(Debug)]
pub struct Removed {
    /// The detached item.
    pub item: Item,
    /// Where it was in the active view, `None` if it was filtered out.
    pub position: Option<usize>,
}

/// The item store behind a [`Menu`](crate::Menu).
#[derive(Debug, Default)]
pub struct ItemCollection {
    items: Vec<Item>,
    /// Positions into `items` of the active view, when filtered.
    filtered: Option<Vec<usize>>,
}

impl ItemCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items in the active view.
    pub fn len(&self) -> usize {
        match &self.filtered {
            Some(view) => view.len(),
            None => self.items.len(),
        }
    }

    /// Whether the active view is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of items including filtered-out ones.
    pub fn total_len(&self) -> usize {
        self.items.len()
    }

    /// Whether a filter is active.
    pub fn is_filtered(&self) -> bool {
        self.filtered.is_some()
    }

    fn slot(&self, position: usize) -> Option<usize> {
        match &self.filtered {
            Some(view) => view.get(position).copied(),
            None => (position < self.items.len()).then_some(position),
        }
    }

    /// The item at `position` in the active view.
    pub fn get(&self, position: usize) -> Option<&Item> {
        self.slot(position).map(|slot| &self.items[slot])
    }

    /// Mutable access to the item at `position` in the active view.
    pub fn get_mut(&mut self, position: usize) -> Option<&mut Item> {
        let slot = self.slot(position)?;
        self.items.get_mut(slot)
    }

    /// Iterate the active view in order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> + '_ {
        (0..self.len()).filter_map(move |position| self.get(position))
    }

    /// Every item, ignoring the filter.
    pub fn all(&self) -> &[Item] {
        &self.items
    }

    pub(crate) fn all_mut(&mut self) -> &mut [Item] {
        &mut self.items
    }

    /// Active-view position of the item with `id`.
    pub fn position_of(&self, id: ItemId) -> Option<usize> {
        let slot = self.items.iter().position(|item| item.id() == id)?;
        match &self.filtered {
            Some(view) => view.iter().position(|&s| s == slot),
            None => Some(slot),
        }
    }

    /// Look up an item by id in the full set.
    pub fn find(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Mutable lookup by id in the full set.
    pub fn find_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    /// Whether an item with `id` is stored, filtered out or not.
    pub fn contains(&self, id: ItemId) -> bool {
        self.find(id).is_some()
    }

    /// Append an item and return its active-view position.
    ///
    /// While filtered, the new item joins the filtered view as well.
    pub fn push(&mut self, item: Item) -> usize {
        self.items.push(item);
        let slot = self.items.len() - 1;
        if let Some(view) = &mut self.filtered {
            view.push(slot);
        }
        self.renumber();
        self.len() - 1
    }

    /// Remove the item with `id`.
    pub fn remove(&mut self, id: ItemId) -> Option<Removed> {
        let slot = self.items.iter().position(|item| item.id() == id)?;
        let position = match &mut self.filtered {
            Some(view) => {
                let position = view.iter().position(|&s| s == slot);
                view.retain(|&s| s != slot);
                for s in view.iter_mut() {
                    if *s > slot {
                        *s -= 1;
                    }
                }
                position
            }
            None => Some(slot),
        };

        let mut item = self.items.remove(slot);
        item.detach();
        self.renumber();
        Some(Removed { item, position })
    }

    /// Remove the item at `position` in the active view.
    pub fn remove_at(&mut self, position: usize) -> Option<Removed> {
        let id = self.get(position)?.id();
        self.remove(id)
    }

    /// Keep only the items matching `predicate` in the active view.
    ///
    /// The predicate sees the full set, not the current view.
    pub fn apply_filter<P>(&mut self, mut predicate: P)
    where
        P: FnMut(&Item) -> bool,
    {
        let view = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| predicate(item))
            .map(|(slot, _)| slot)
            .collect();
        self.filtered = Some(view);
        self.renumber();
    }

    /// Drop the filter. Returns `true` if one was active.
    pub fn reset_filter(&mut self) -> bool {
        let was_filtered = self.filtered.take().is_some();
        self.renumber();
        was_filtered
    }

    /// Stable-sort the full set. Any filter is cleared.
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&Item, &Item) -> Ordering,
    {
        self.filtered = None;
        self.items.sort_by(compare);
        self.renumber();
    }

    /// Remove everything, returning the detached items.
    pub fn clear(&mut self) -> Vec<Item> {
        self.filtered = None;
        let mut items = std::mem::take(&mut self.items);
        for item in &mut items {
            item.detach();
        }
        items
    }

    /// Store each item's active-view position on the item itself.
    fn renumber(&mut self) {
        match &self.filtered {
            Some(view) => {
                for item in &mut self.items {
                    item.set_index(None);
                }
                for (position, &slot) in view.iter().enumerate() {
                    self.items[slot].set_index(Some(position));
                }
            }
            None => {
                for (position, item) in self.items.iter_mut().enumerate() {
                    item.set_index(Some(position));
                }
            }
        }
    }
}
