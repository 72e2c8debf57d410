//! Fill-between-slices interpolation
//!
//! When two consecutive strokes paint the same label on two different slices
//! of the slicing axis, every voxel of the second stroke whose projection onto
//! the first stroke's slice carries that label is extruded through the slices
//! strictly between them. This approximates a 3D fill from two 2D sections;
//! it does not flood-fill the enclosed region.

use tracing::debug;

use crate::constants::UNLABELED;

use super::PaintEngine;

impl PaintEngine {
    /// Fill between the two most recently applied strokes
    ///
    /// Writes go straight into the label data and are not recorded in history.
    /// Returns the number of voxels whose label changed. Every unmet
    /// precondition aborts silently with 0.
    pub(crate) fn fill_between_slices(&mut self) -> usize {
        let Some(axis) = self.config.slicing_mode.axis() else {
            return 0;
        };
        let (Some(previous), Some(current)) = (self.history.previous(), self.history.current())
        else {
            debug!("fill_between_slices: fewer than two strokes");
            return 0;
        };

        let label = current.label;
        if previous.label != label || label == UNLABELED {
            debug!(
                "fill_between_slices: labels {} and {} do not qualify",
                previous.label, label
            );
            return 0;
        }
        if !previous.is_uniform() || !current.is_uniform() {
            return 0;
        }
        let (Some(first), Some(second)) = (previous.first_offset(), current.first_offset()) else {
            debug!("fill_between_slices: empty stroke");
            return 0;
        };

        let Some(label_map) = self.label_map.as_ref() else {
            return 0;
        };
        let mapper = label_map.mapper();
        let first_slice = mapper.offset_to_index(first)[axis];
        let second_slice = mapper.offset_to_index(second)[axis];
        if first_slice == second_slice {
            debug!("fill_between_slices: both strokes on slice {}", first_slice);
            return 0;
        }
        let min_slice = first_slice.min(second_slice);
        let max_slice = first_slice.max(second_slice);

        let mut targets = Vec::new();
        for &(offset, _) in &current.snapshot {
            let mut index = mapper.offset_to_index(offset);
            index[axis] = first_slice;
            let reference = mapper.index_to_world(index.as_dvec3());
            if label_map.label_at_world(reference) != Some(label) {
                continue;
            }
            for slice in (min_slice + 1)..max_slice {
                index[axis] = slice;
                if let Some(target) = mapper.index_to_offset(index) {
                    targets.push(target);
                }
            }
        }

        let Some(label_map) = self.label_map.as_mut() else {
            return 0;
        };
        let data = label_map.data_mut();
        let mut filled = 0;
        for target in targets {
            if data[target] != label {
                data[target] = label;
                filled += 1;
            }
        }

        debug!(
            "fill_between_slices: label {} between slices {} and {} on axis {}, {} voxels",
            label, min_slice, max_slice, axis, filled
        );
        filled
    }
}
