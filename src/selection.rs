//! Selection state: the set of selected ids and the rubber-band rectangle.

use std::collections::HashSet;
use std::hash::Hash;

/// Set of selected ids (devices or cables)
pub struct SelectionManager<T> {
    selected: HashSet<T>,
}

impl<T> Default for SelectionManager<T> {
    fn default() -> Self {
        Self { selected: HashSet::new() }
    }
}

impl<T> SelectionManager<T>
where
    T: Copy + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item without disturbing the rest of the selection
    pub fn add(&mut self, id: T) {
        self.selected.insert(id);
    }

    pub fn remove(&mut self, id: T) -> bool {
        self.selected.remove(&id)
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Drop everything and select exactly `ids` (rubber-band release)
    pub fn replace_selection<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.selected.clear();
        self.selected.extend(ids);
    }

    /// Whether `id` is part of the selection
    pub fn contains(&self, id: T) -> bool {
        self.selected.contains(&id)
    }

    pub fn iter(&self) -> std::collections::hash_set::Iter<'_, T> {
        self.selected.iter()
    }

    /// Snapshot of the selected IDs
    pub fn to_set(&self) -> HashSet<T> {
        self.selected.clone()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

/// Rubber-band rectangle between a fixed anchor and the live pointer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectionBox {
    anchor: (f32, f32),
    corner: (f32, f32),
}

impl SelectionBox {
    /// Start a zero-size box at the press point
    pub fn new(anchor: (f32, f32)) -> Self {
        Self { anchor, corner: anchor }
    }

    pub fn anchor(&self) -> (f32, f32) {
        self.anchor
    }

    /// Move the live corner to the pointer
    pub fn update(&mut self, pointer: (f32, f32)) {
        self.corner = pointer;
    }

    /// `(x, y, width, height)` with non-negative extent, whichever way the
    /// pointer moved from the anchor
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let x = self.anchor.0.min(self.corner.0);
        let y = self.anchor.1.min(self.corner.1);
        let width = (self.anchor.0 - self.corner.0).abs();
        let height = (self.anchor.1 - self.corner.1).abs();
        (x, y, width, height)
    }
}
