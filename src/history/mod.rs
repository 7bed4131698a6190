//! Bounded undo/redo stack of canvas snapshots.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::canvas::PixelBuffer;

pub const DEFAULT_CAPACITY: usize = 20;

/// Immutable copy of a canvas at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot(Arc<PixelBuffer>);

impl Snapshot {
    pub fn capture(buffer: &PixelBuffer) -> Self {
        Self(Arc::new(buffer.clone()))
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.0
    }

    pub fn to_buffer(&self) -> PixelBuffer {
        PixelBuffer::clone(&self.0)
    }
}

impl From<PixelBuffer> for Snapshot {
    fn from(buffer: PixelBuffer) -> Self {
        Self(Arc::new(buffer))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoOutcome {
    Restored(Snapshot),
    /// Stepped below the oldest entry; the caller shows its initial canvas.
    Initial,
    /// Nothing left to undo.
    Nothing,
}

#[derive(Debug, Clone)]
pub struct HistoryStack {
    entries: VecDeque<Snapshot>,
    // `None` sits before the first entry.
    index: Option<usize>,
    capacity: usize,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl HistoryStack {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            index: None,
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.index.and_then(|index| self.entries.get(index))
    }

    /// Drops every entry after the current one, appends `snapshot` and evicts
    /// the oldest entry once over capacity.
    pub fn push(&mut self, snapshot: Snapshot) {
        let keep = self.index.map_or(0, |index| index + 1);
        let pruned = self.entries.len().saturating_sub(keep);
        self.entries.truncate(keep);
        self.entries.push_back(snapshot);

        if self.entries.len() > self.capacity {
            self.entries.pop_front();
            tracing::debug!(capacity = self.capacity, "evicted oldest snapshot");
        }
        self.index = Some(self.entries.len() - 1);
        tracing::debug!(len = self.entries.len(), pruned, "pushed snapshot");
    }

    /// Steps back one entry. At or below the oldest entry this reports
    /// `Initial` for as long as any entry exists; `Nothing` only when empty.
    pub fn undo(&mut self) -> UndoOutcome {
        match self.index {
            _ if self.entries.is_empty() => UndoOutcome::Nothing,
            None | Some(0) => {
                self.index = None;
                UndoOutcome::Initial
            }
            Some(index) => {
                self.index = Some(index - 1);
                self.entries
                    .get(index - 1)
                    .cloned()
                    .map_or(UndoOutcome::Nothing, UndoOutcome::Restored)
            }
        }
    }

    /// Steps forward; `None` when already at the newest entry.
    pub fn redo(&mut self) -> Option<Snapshot> {
        let next = self.index.map_or(0, |index| index + 1);
        let snapshot = self.entries.get(next).cloned()?;
        self.index = Some(next);
        Some(snapshot)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = None;
    }

    pub fn can_undo(&self) -> bool {
        self.index.is_some()
    }

    pub fn can_redo(&self) -> bool {
        let next = self.index.map_or(0, |index| index + 1);
        next < self.entries.len()
    }
}
