//! Label map ownership: lazy creation, replacement and diff-based application

use labelpaint_ipc::ModifiedKind;
use tracing::{debug, info};

use crate::error::PaintError;
use crate::history::HistoryEntry;
use crate::volume::LabelVolume;

use super::PaintEngine;

impl PaintEngine {
    /// Create an all-zero label map from the background geometry if none exists
    pub(crate) fn ensure_label_map(&mut self) -> Result<(), PaintError> {
        if self.label_map.is_some() {
            return Ok(());
        }
        let Some(background) = self.background.as_ref() else {
            return Err(PaintError::NoBackgroundImage);
        };
        let geometry = background.geometry().clone();
        debug!("Creating label map {:?}", geometry.dimensions);
        self.label_map = Some(LabelVolume::new(geometry)?);
        Ok(())
    }

    /// The committed label map, if one exists
    ///
    /// Never reflects an in-flight stroke.
    pub fn get_label_map(&self) -> Option<&LabelVolume> {
        self.label_map.as_ref()
    }

    /// Replace the label map wholesale (e.g. after loading one from disk)
    ///
    /// Any in-flight stroke is cancelled and history is cleared, since prior
    /// entries refer to the old data.
    pub fn set_label_map(&mut self, volume: LabelVolume) {
        if self.cancel_stroke() {
            debug!("set_label_map: cancelled in-flight stroke");
        }
        let voxel_count = volume.voxel_count();
        info!(
            "Label map replaced: {:?}, {} voxels",
            volume.dimensions(),
            voxel_count
        );
        self.label_map = Some(volume);
        self.history.clear();
        self.notify(ModifiedKind::LabelMapReplaced, voxel_count);
    }

    /// Copy another volume's labels into the label map as one undoable step
    ///
    /// Creates the label map from the background (or from `volume`'s geometry
    /// when there is no background) if needed. Returns the number of voxels
    /// that changed.
    pub fn apply_label_map(&mut self, volume: &LabelVolume) -> Result<usize, PaintError> {
        if self.label_map.is_none() {
            match self.ensure_label_map() {
                Err(PaintError::NoBackgroundImage) => {
                    self.label_map = Some(LabelVolume::new(volume.geometry().clone())?);
                }
                other => other?,
            }
        }
        let Some(label_map) = self.label_map.as_mut() else {
            return Err(PaintError::NoBackgroundImage);
        };
        if !label_map.same_dimensions(volume) {
            return Err(PaintError::GeometryMismatch {
                expected: label_map.dimensions(),
                actual: volume.dimensions(),
            });
        }

        let data = label_map.data_mut();
        let mut snapshot = Vec::new();
        let mut written = Vec::new();
        for (offset, (current, &incoming)) in data.iter_mut().zip(volume.data()).enumerate() {
            if *current != incoming {
                snapshot.push((offset, *current));
                written.push(incoming);
                *current = incoming;
            }
        }

        let changed = snapshot.len();
        self.history.push(
            HistoryEntry::with_written(snapshot, written, self.config.active_label),
            self.config.history_limit,
        );
        info!("Label map applied: {} voxels changed", changed);
        self.notify(ModifiedKind::LabelMapApplied, changed);
        Ok(changed)
    }
}
