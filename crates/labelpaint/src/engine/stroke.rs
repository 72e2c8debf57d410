//! Stroke handling for the paint engine

use glam::DVec3;
use labelpaint_ipc::{ModifiedKind, points_from_flat};
use tracing::{debug, info, warn};

use crate::constants::MIN_ELLIPSE_EXTENT;
use crate::error::PaintError;
use crate::geometry::CoordinateMapper;
use crate::history::HistoryEntry;
use crate::raster::{TouchMask, triangulate};
use crate::worker::{RasterCommand, RasterWorker};

use super::{ActiveStroke, PaintEngine, StrokeSummary};

impl PaintEngine {
    /// Begin a stroke
    ///
    /// Creates the label map from the background geometry on first use. Without
    /// a label map or background image the call is a logged no-op and the engine
    /// stays idle.
    pub fn start_stroke(&mut self) -> Result<(), PaintError> {
        if self.stroke.is_some() {
            return Err(PaintError::StrokeInProgress);
        }

        match self.ensure_label_map() {
            Ok(()) => {}
            Err(PaintError::NoBackgroundImage) => {
                warn!("start_stroke: no label map or background image, ignoring");
                return Ok(());
            }
            Err(e) => return Err(e),
        }
        let Some(label_map) = self.label_map.as_ref() else {
            return Ok(());
        };

        let slice_axis = self.config.slicing_mode.axis();
        let worker = RasterWorker::spawn(label_map.dimensions(), slice_axis)?;
        self.stroke = Some(ActiveStroke {
            worker,
            commands: 0,
        });
        debug!(
            "Stroke started: label={}, radius={}, slicing={:?}",
            self.config.active_label, self.config.radius, self.config.slicing_mode
        );
        Ok(())
    }

    /// The in-flight stroke and the mapper of its label map
    fn stroke_target(&mut self) -> Option<(&mut ActiveStroke, &CoordinateMapper)> {
        let stroke = self.stroke.as_mut()?;
        let mapper = self.label_map.as_ref()?.mapper();
        Some((stroke, mapper))
    }

    fn queue(stroke: &mut ActiveStroke, command: RasterCommand) {
        stroke.worker.send(command);
        stroke.commands += 1;
    }

    /// Extend the brush stroke to a world point
    pub fn add_point(&mut self, point: impl Into<DVec3>) {
        let radius = self.config.radius;
        let Some((stroke, mapper)) = self.stroke_target() else {
            debug!("add_point: no active stroke, ignoring");
            return;
        };
        let point = mapper.world_to_index(point.into());
        let radius = mapper.voxel_radius(radius);
        Self::queue(stroke, RasterCommand::Paint { point, radius });
    }

    /// Fill a closed polygon of world points into the stroke
    ///
    /// A polygon that cannot be triangulated is skipped and reported; the stroke
    /// itself stays open.
    pub fn paint_polygon(&mut self, points: &[DVec3]) -> Result<(), PaintError> {
        let fixed_axis = self.config.slicing_mode.axis();
        let Some((stroke, mapper)) = self.stroke_target() else {
            debug!("paint_polygon: no active stroke, ignoring");
            return Ok(());
        };
        if points.is_empty() {
            return Ok(());
        }

        let index_points: Vec<DVec3> = points.iter().map(|&p| mapper.world_to_index(p)).collect();
        let polygon = triangulate(&index_points, fixed_axis).map_err(|e| {
            warn!("paint_polygon: skipping polygon of {} points: {}", points.len(), e);
            e
        })?;

        debug!(
            "paint_polygon: {} triangles across axis {}",
            polygon.triangles.len(),
            polygon.fixed_axis
        );
        Self::queue(
            stroke,
            RasterCommand::Triangles {
                triangles: polygon.triangles,
                fixed_axis: polygon.fixed_axis,
            },
        );
        Ok(())
    }

    /// [`Self::paint_polygon`] for a flat `[x0, y0, z0, x1, ...]` coordinate list
    pub fn paint_polygon_flat(&mut self, coordinates: &[f64]) -> Result<(), PaintError> {
        let points: Vec<DVec3> = points_from_flat(coordinates)?
            .into_iter()
            .map(DVec3::from)
            .collect();
        self.paint_polygon(&points)
    }

    /// Fill the axis-aligned index box spanned by two world corners
    pub fn paint_rectangle(&mut self, corner1: impl Into<DVec3>, corner2: impl Into<DVec3>) {
        let Some((stroke, mapper)) = self.stroke_target() else {
            debug!("paint_rectangle: no active stroke, ignoring");
            return;
        };
        let corner1 = mapper.world_to_voxel(corner1.into());
        let corner2 = mapper.world_to_voxel(corner2.into());
        Self::queue(stroke, RasterCommand::Rectangle { corner1, corner2 });
    }

    /// Stamp an ellipse with world-space half extents `scale`
    pub fn paint_ellipse(&mut self, center: impl Into<DVec3>, scale: impl Into<DVec3>) {
        let Some((stroke, mapper)) = self.stroke_target() else {
            debug!("paint_ellipse: no active stroke, ignoring");
            return;
        };
        let center = mapper.world_to_index(center.into());
        let scale = mapper.vector_to_index(scale.into());
        // Collapsed axes still cover the center voxel
        let scale = DVec3::select(
            scale.cmpeq(DVec3::ZERO),
            DVec3::splat(MIN_ELLIPSE_EXTENT),
            scale,
        )
        .abs();
        Self::queue(stroke, RasterCommand::Ellipse { center, scale });
    }

    /// Finish the stroke: await the touch-mask and commit it
    ///
    /// Returns `None` when no stroke was in progress. If the worker failed the
    /// stroke is dropped, nothing is committed and the label data is untouched.
    pub async fn end_stroke(&mut self) -> Result<Option<StrokeSummary>, PaintError> {
        let Some(stroke) = self.stroke.take() else {
            debug!("end_stroke: no active stroke, ignoring");
            return Ok(None);
        };

        debug!("end_stroke: awaiting mask after {} commands", stroke.commands);
        let mask = stroke.worker.finish().await.map_err(|e| {
            warn!("end_stroke: stroke dropped: {}", e);
            e
        })?;
        self.apply_touch_mask(&mask).map(Some)
    }

    /// Abandon the stroke without committing anything
    ///
    /// Returns whether a stroke was in progress.
    pub fn cancel_stroke(&mut self) -> bool {
        match self.stroke.take() {
            Some(stroke) => {
                stroke.worker.cancel();
                debug!("Stroke cancelled after {} commands", stroke.commands);
                true
            }
            None => false,
        }
    }

    /// Diff a touch-mask into the label data and commit it as one stroke
    ///
    /// Voxels are visited in ascending offset order. Only voxels whose label
    /// changes (and that pass the voxel filter) are written and recorded.
    pub fn apply_touch_mask(&mut self, mask: &TouchMask) -> Result<StrokeSummary, PaintError> {
        self.ensure_label_map()?;
        let label = self.config.active_label;

        let Some(label_map) = self.label_map.as_mut() else {
            return Err(PaintError::NoBackgroundImage);
        };
        if mask.dimensions() != label_map.dimensions() {
            return Err(PaintError::GeometryMismatch {
                expected: label_map.dimensions(),
                actual: mask.dimensions(),
            });
        }

        // Scalars are only meaningful when the background shares the label grid
        let background = self
            .background
            .as_deref()
            .filter(|image| image.geometry().dimensions == mask.dimensions());
        let filter = self.voxel_filter.as_ref();

        let data = label_map.data_mut();
        let mut snapshot = Vec::new();
        let mut touched = 0;
        for offset in mask.touched_offsets() {
            touched += 1;
            let previous = data[offset];
            if previous == label {
                continue;
            }
            if let Some(filter) = filter {
                let scalar = background.and_then(|image| image.scalar(offset));
                if !filter(scalar, offset, label) {
                    continue;
                }
            }
            snapshot.push((offset, previous));
            data[offset] = label;
        }

        let changed = snapshot.len();
        self.history
            .push(HistoryEntry::new(snapshot, label), self.config.history_limit);

        let filled = if self.config.auto_fill_between_slices {
            self.fill_between_slices()
        } else {
            0
        };

        info!(
            "Stroke committed: label={}, touched={}, changed={}, filled={}",
            label, touched, changed, filled
        );
        self.notify(ModifiedKind::Paint, changed);
        if filled > 0 {
            self.notify(ModifiedKind::Fill, filled);
        }

        Ok(StrokeSummary {
            touched,
            changed,
            filled,
        })
    }
}
