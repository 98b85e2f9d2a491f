//! Bounded most-recent-first history with move-to-front promotion.
//!
//! Backed by a `VecDeque` with the newest entry at the front. Lookups
//! are linear scans; capacity is small.

use std::collections::VecDeque;

use super::item::{Candidate, ClipboardItem, ItemId};

/// Result of admitting a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// An equal entry existed and was moved to the front.
    Promoted(ItemId),
    /// A new entry was created at the front.
    Inserted(ItemId),
    /// A new entry was created and the oldest one dropped.
    InsertedAndEvicted { inserted: ItemId, evicted: ItemId },
}

#[derive(Debug)]
pub struct History {
    entries: VecDeque<ClipboardItem>,
    capacity: usize,
}

impl History {
    /// Create an empty history.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0. The history must hold at least one item.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "history capacity must be >= 1");
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Promote an equal entry, or insert the candidate at the front and
    /// evict from the tail past capacity.
    ///
    /// `captured_at` is only used when a new entry is created; promoted
    /// entries keep their original timestamp.
    pub fn admit(&mut self, candidate: Candidate, captured_at: u64) -> Admission {
        if let Some(pos) = self
            .entries
            .iter()
            .position(|item| candidate.same_content_as(item))
        {
            if let Some(id) = self.move_to_front(pos) {
                return Admission::Promoted(id);
            }
        }

        let item = candidate.into_item(captured_at);
        let inserted = item.id;
        self.entries.push_front(item);

        if self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_back() {
                return Admission::InsertedAndEvicted {
                    inserted,
                    evicted: evicted.id,
                };
            }
        }
        Admission::Inserted(inserted)
    }

    /// Move the entry with `id` to the front. Returns `false` if no
    /// such entry exists or it is already the newest.
    pub fn promote(&mut self, id: ItemId) -> bool {
        match self.entries.iter().position(|item| item.id == id) {
            Some(0) | None => false,
            Some(pos) => self.move_to_front(pos).is_some(),
        }
    }

    fn move_to_front(&mut self, pos: usize) -> Option<ItemId> {
        let existing = self.entries.remove(pos)?;
        let id = existing.id;
        self.entries.push_front(existing);
        Some(id)
    }

    /// Entry at `index` (0 = most recent).
    pub fn get(&self, index: usize) -> Option<&ClipboardItem> {
        self.entries.get(index)
    }

    /// Iterate entries newest-first.
    pub fn iter(&self) -> impl Iterator<Item = &ClipboardItem> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
