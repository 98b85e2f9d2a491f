//! History engine: sensitive filtering, normalization and the bounded
//! deduplicating history.
//!
//! The engine is plain state with no I/O and no locking. It is owned by
//! a single task (the daemon loop), which is the only writer; other
//! parties see copies handed out through the daemon's message channels.
//!
//! [`Engine::ingest`] is total: every snapshot produces one of the
//! [`EngineAction`] outcomes, never an error.

pub mod history;
pub mod item;
pub mod normalize;

use std::time::{SystemTime, UNIX_EPOCH};

use history::{Admission, History};
pub use item::{Category, ClipboardItem, ItemId};

use crate::config::EngineConfig;
use crate::sensitive::{SensitiveFilter, SuppressReason};
use crate::snapshot::ClipboardSnapshot;

/// Outcome of ingesting one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineAction {
    /// Dropped by the sensitive filter. History untouched.
    Suppressed(SuppressReason),
    /// An equal entry was moved to the front.
    Promoted(ItemId),
    /// A new entry was added at the front.
    Inserted(ItemId),
    /// A new entry was added and the oldest one evicted.
    InsertedAndEvicted { inserted: ItemId, evicted: ItemId },
    /// The snapshot carried nothing capturable. History untouched.
    Skipped,
}

impl EngineAction {
    /// Whether history order or contents changed.
    pub fn changed_history(&self) -> bool {
        matches!(
            self,
            EngineAction::Promoted(_)
                | EngineAction::Inserted(_)
                | EngineAction::InsertedAndEvicted { .. }
        )
    }
}

impl From<Admission> for EngineAction {
    fn from(admission: Admission) -> Self {
        match admission {
            Admission::Promoted(id) => EngineAction::Promoted(id),
            Admission::Inserted(id) => EngineAction::Inserted(id),
            Admission::InsertedAndEvicted { inserted, evicted } => {
                EngineAction::InsertedAndEvicted { inserted, evicted }
            }
        }
    }
}

#[derive(Debug)]
pub struct Engine {
    history: History,
    filter: SensitiveFilter,
}

impl Engine {
    /// # Panics
    ///
    /// Panics if `config.capacity` is 0.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            history: History::new(config.capacity),
            filter: SensitiveFilter::new(config),
        }
    }

    /// Ingest a snapshot, stamping new entries with the current time.
    pub fn ingest(&mut self, snapshot: &ClipboardSnapshot) -> EngineAction {
        self.ingest_at(snapshot, epoch_millis())
    }

    /// Ingest a snapshot with an explicit capture time.
    ///
    /// 1. Source application on the denylist → suppressed.
    /// 2. Normalize; nothing capturable → skipped.
    /// 3. Text captures matching the secret heuristic → suppressed.
    /// 4. Promote an equal entry, or insert and evict past capacity.
    pub fn ingest_at(&mut self, snapshot: &ClipboardSnapshot, now: u64) -> EngineAction {
        if let Some(reason) = self.filter.check_source(snapshot.source_app.as_deref()) {
            return EngineAction::Suppressed(reason);
        }

        let Some(candidate) = normalize::normalize(snapshot) else {
            return EngineAction::Skipped;
        };

        if let Some(reason) = candidate
            .captured_text()
            .and_then(|text| self.filter.check_text(text))
        {
            return EngineAction::Suppressed(reason);
        }

        let category = candidate.category;
        let len = candidate.content.len();
        let action = EngineAction::from(self.history.admit(candidate, now));
        match &action {
            EngineAction::Inserted(_) => {
                tracing::debug!(%category, len, "captured");
            }
            EngineAction::InsertedAndEvicted { evicted, .. } => {
                tracing::debug!(%category, len, %evicted, "captured, evicted oldest");
            }
            EngineAction::Promoted(id) => {
                tracing::debug!(%category, %id, "promoted existing entry");
            }
            _ => {}
        }
        action
    }

    /// Entries newest-first.
    pub fn items(&self) -> impl Iterator<Item = &ClipboardItem> {
        self.history.iter()
    }

    /// A copy of the entry at `index`, for writing back to the clipboard.
    pub fn select(&self, index: usize) -> Option<ClipboardItem> {
        self.history.get(index).cloned()
    }

    /// Move the entry with `id` to the front, as after writing it back
    /// to the clipboard. Returns whether the order changed.
    pub fn promote(&mut self, id: ItemId) -> bool {
        let moved = self.history.promote(id);
        if moved {
            tracing::debug!(%id, "promoted restored entry");
        }
        moved
    }

    /// Drop every entry. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.history.len();
        self.history.clear();
        removed
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

/// Current time as Unix epoch milliseconds, or 0 if the clock reads
/// before the epoch.
pub(crate) fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
