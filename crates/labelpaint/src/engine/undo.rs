//! Undo/redo for the paint engine

use labelpaint_ipc::ModifiedKind;
use tracing::debug;

use super::PaintEngine;

impl PaintEngine {
    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Revert the most recently applied stroke
    ///
    /// Returns the number of voxels restored, or `None` if there was nothing to undo.
    pub fn undo(&mut self) -> Option<usize> {
        let Some(label_map) = self.label_map.as_mut() else {
            debug!("Undo: no label map");
            return None;
        };
        let Some(entry) = self.history.step_back() else {
            debug!("Undo: no entries available");
            return None;
        };

        let data = label_map.data_mut();
        for &(offset, previous) in &entry.snapshot {
            if let Some(value) = data.get_mut(offset) {
                *value = previous;
            }
        }
        let restored = entry.snapshot.len();
        let label = entry.label;

        debug!(
            "Undid label {} stroke ({} voxels), {} entries remaining",
            label,
            restored,
            self.history.index().map_or(0, |index| index + 1)
        );
        self.notify(ModifiedKind::Undo, restored);
        Some(restored)
    }

    /// Re-apply the next undone stroke
    ///
    /// Returns the number of voxels written, or `None` if there was nothing to redo.
    pub fn redo(&mut self) -> Option<usize> {
        let Some(label_map) = self.label_map.as_mut() else {
            debug!("Redo: no label map");
            return None;
        };
        let Some(entry) = self.history.step_forward() else {
            debug!("Redo: no entries available");
            return None;
        };

        let data = label_map.data_mut();
        for (offset, label) in entry.redo_writes() {
            if let Some(value) = data.get_mut(offset) {
                *value = label;
            }
        }
        let written = entry.snapshot.len();

        debug!("Redid label {} stroke ({} voxels)", entry.label, written);
        self.notify(ModifiedKind::Redo, written);
        Some(written)
    }

    /// Drop all undo/redo entries; label data is left as is
    pub fn clear_history(&mut self) {
        debug!("Clearing {} history entries", self.history.len());
        self.history.clear();
    }
}
