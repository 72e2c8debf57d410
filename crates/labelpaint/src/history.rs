//! Undo/redo history of minimal label diffs

use tracing::debug;

/// One committed stroke: the voxels it changed and the label it wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// `(offset, previous label)` pairs in first-touched order, offsets unique
    pub snapshot: Vec<(usize, u8)>,
    /// Label written to every offset in `snapshot`
    pub label: u8,
    /// Per-voxel labels written, parallel to `snapshot`, when the entry did not
    /// write one uniform label (applied label maps)
    pub written: Option<Vec<u8>>,
}

impl HistoryEntry {
    pub fn new(snapshot: Vec<(usize, u8)>, label: u8) -> Self {
        Self {
            snapshot,
            label,
            written: None,
        }
    }

    /// An entry writing a different label per voxel
    pub fn with_written(snapshot: Vec<(usize, u8)>, written: Vec<u8>, label: u8) -> Self {
        debug_assert_eq!(snapshot.len(), written.len());
        Self {
            snapshot,
            label,
            written: Some(written),
        }
    }

    /// Whether every voxel in the entry received `label`
    #[inline]
    pub fn is_uniform(&self) -> bool {
        self.written.is_none()
    }

    /// `(offset, label written)` pairs for re-applying the entry
    pub fn redo_writes(&self) -> impl Iterator<Item = (usize, u8)> + '_ {
        self.snapshot.iter().enumerate().map(|(i, &(offset, _))| {
            let label = self
                .written
                .as_ref()
                .and_then(|written| written.get(i).copied())
                .unwrap_or(self.label);
            (offset, label)
        })
    }

    /// Whether the entry changed no voxels
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    /// First voxel the entry recorded
    #[inline]
    pub fn first_offset(&self) -> Option<usize> {
        self.snapshot.first().map(|&(offset, _)| offset)
    }
}

/// Linear undo stack with a redo tail
///
/// `applied` entries (from the front) are currently reflected in the label
/// data; entries after them form the redo buffer until the next push.
#[derive(Debug, Default, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    applied: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position of the most recently applied entry (`None` when nothing is applied)
    #[inline]
    pub fn index(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    #[inline]
    pub fn can_redo(&self) -> bool {
        self.applied < self.entries.len()
    }

    /// Entry at a position
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    /// The most recently applied entry
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.index().and_then(|index| self.entries.get(index))
    }

    /// The entry applied just before [`Self::current`]
    pub fn previous(&self) -> Option<&HistoryEntry> {
        self.applied
            .checked_sub(2)
            .and_then(|index| self.entries.get(index))
    }

    /// Append an entry, discarding the redo tail
    ///
    /// With a `limit`, the oldest entries are dropped so at most `limit` remain.
    pub fn push(&mut self, entry: HistoryEntry, limit: Option<usize>) {
        self.entries.truncate(self.applied);
        self.entries.push(entry);

        if let Some(limit) = limit.filter(|&limit| limit > 0) {
            let excess = self.entries.len().saturating_sub(limit);
            if excess > 0 {
                self.entries.drain(..excess);
                debug!("history: dropped {} oldest entries (limit {})", excess, limit);
            }
        }
        self.applied = self.entries.len();
    }

    /// Step back one entry, returning the entry to revert
    pub fn step_back(&mut self) -> Option<&HistoryEntry> {
        let index = self.index()?;
        self.applied = index;
        self.entries.get(index)
    }

    /// Step forward one entry, returning the entry to re-apply
    pub fn step_forward(&mut self) -> Option<&HistoryEntry> {
        if !self.can_redo() {
            return None;
        }
        self.applied += 1;
        self.entries.get(self.applied - 1)
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
        self.applied = 0;
    }
}
