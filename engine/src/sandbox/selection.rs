//! Selection Set
//!
//! Ordered, duplicate-free list of selected bodies. Mutations report whether
//! anything changed so the owner knows when to re-highlight and notify.

use super::BodyId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: Vec<BodyId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` if absent, remove it if present. Additions go to the end.
    pub fn toggle(&mut self, id: BodyId) {
        if let Some(index) = self.ids.iter().position(|&other| other == id) {
            self.ids.remove(index);
        } else {
            self.ids.push(id);
        }
    }

    /// Replace the whole selection, keeping first occurrences only.
    /// Returns `true` if the contents changed.
    pub fn set(&mut self, ids: impl IntoIterator<Item = BodyId>) -> bool {
        let mut next: Vec<BodyId> = Vec::new();
        for id in ids {
            if !next.contains(&id) {
                next.push(id);
            }
        }
        let changed = next != self.ids;
        self.ids = next;
        changed
    }

    pub fn get(&self) -> &[BodyId] {
        &self.ids
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.ids.contains(&id)
    }

    /// Drop every id for which `exists` returns false. Returns `true` if any were dropped.
    pub fn retain_existing(&mut self, exists: impl Fn(BodyId) -> bool) -> bool {
        let before = self.ids.len();
        self.ids.retain(|&id| exists(id));
        self.ids.len() != before
    }

    pub fn clear(&mut self) -> bool {
        self.set(std::iter::empty())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
