//! Label paint engine
//!
//! This module provides the engine that connects:
//! - Stroke input (brush points, polygons, rectangles, ellipses)
//! - The background rasterization worker (touch-mask generation)
//! - The label volume (diffing the mask against current labels)
//! - Undo/redo history and fill-between-slices
//!
//! The engine is driven by an interaction layer but does not depend on one.

mod dispatch;
mod fill;
mod label_map;
mod stroke;
mod undo;

use std::sync::Arc;

use labelpaint_config::{PaintConfig, SlicingMode};
use labelpaint_ipc::ModifiedKind;
use tracing::debug;

use crate::history::History;
use crate::image::ImageSource;
use crate::volume::LabelVolume;
use crate::worker::RasterWorker;

/// Predicate deciding whether a touched voxel may take the stroke's label
///
/// Arguments are the background scalar at the voxel (if available), the voxel
/// offset and the label being painted.
pub type VoxelFilter = Box<dyn Fn(Option<f64>, usize, u8) -> bool + Send + Sync>;

/// Observer called after every committed mutation
pub type ModifiedCallback = Box<dyn Fn(&ModifiedEvent) + Send + Sync>;

/// Notification sent to observers when label data changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifiedEvent {
    pub kind: ModifiedKind,
    /// Voxels written by the mutation
    pub voxel_count: usize,
}

/// Result of committing one stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StrokeSummary {
    /// Voxels marked in the touch-mask
    pub touched: usize,
    /// Voxels whose label actually changed (recorded in history)
    pub changed: usize,
    /// Voxels written by fill-between-slices
    pub filled: usize,
}

/// Per-stroke state; present only while stroking
pub(crate) struct ActiveStroke {
    pub(crate) worker: RasterWorker,
    /// Commands queued to the worker so far
    pub(crate) commands: usize,
}

/// Paint engine for one label volume
///
/// Lifecycle of a stroke:
/// 1. `start_stroke` spawns a rasterization worker sized to the label map
/// 2. `add_point` / `paint_polygon` / ... queue geometry to the worker
/// 3. `end_stroke` awaits the touch-mask, diffs it into the label data,
///    pushes a history entry and optionally fills between slices
pub struct PaintEngine {
    pub(crate) config: PaintConfig,
    pub(crate) background: Option<Arc<dyn ImageSource>>,
    /// Lazily created from the background geometry on first stroke
    pub(crate) label_map: Option<LabelVolume>,
    pub(crate) stroke: Option<ActiveStroke>,
    pub(crate) history: History,
    pub(crate) voxel_filter: Option<VoxelFilter>,
    pub(crate) listeners: Vec<ModifiedCallback>,
}

impl Default for PaintEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PaintEngine {
    /// Create an engine with default paint settings
    pub fn new() -> Self {
        Self::with_config(PaintConfig::default())
    }

    /// Create an engine with the given paint settings
    pub fn with_config(mut config: PaintConfig) -> Self {
        config.radius = config.radius.max(0.0);
        Self {
            config,
            background: None,
            label_map: None,
            stroke: None,
            history: History::new(),
            voxel_filter: None,
            listeners: Vec::new(),
        }
    }

    /// Current paint settings
    pub fn config(&self) -> &PaintConfig {
        &self.config
    }

    /// Replace all paint settings at once
    pub fn set_config(&mut self, config: PaintConfig) {
        self.config = config;
        self.config.radius = self.config.radius.max(0.0);
    }

    /// Set the label written by subsequent strokes
    pub fn set_label(&mut self, label: u8) {
        self.config.active_label = label;
    }

    pub fn label(&self) -> u8 {
        self.config.active_label
    }

    /// Set the brush radius in world units (negative values clamp to 0)
    pub fn set_radius(&mut self, radius: f64) {
        self.config.radius = if radius.is_finite() { radius.max(0.0) } else { 0.0 };
    }

    pub fn radius(&self) -> f64 {
        self.config.radius
    }

    /// Set the axis held fixed while painting
    ///
    /// Takes effect at the next `start_stroke`.
    pub fn set_slicing_mode(&mut self, mode: SlicingMode) {
        self.config.slicing_mode = mode;
    }

    pub fn slicing_mode(&self) -> SlicingMode {
        self.config.slicing_mode
    }

    pub fn set_auto_fill_between_slices(&mut self, enabled: bool) {
        self.config.auto_fill_between_slices = enabled;
    }

    pub fn auto_fill_between_slices(&self) -> bool {
        self.config.auto_fill_between_slices
    }

    /// Set the image whose geometry shapes a freshly created label map
    pub fn set_background_image(&mut self, image: Arc<dyn ImageSource>) {
        debug!(
            "background image set: dimensions {:?}",
            image.geometry().dimensions
        );
        self.background = Some(image);
    }

    pub fn background_image(&self) -> Option<&Arc<dyn ImageSource>> {
        self.background.as_ref()
    }

    /// Restrict which touched voxels may be painted
    pub fn set_voxel_filter(
        &mut self,
        filter: impl Fn(Option<f64>, usize, u8) -> bool + Send + Sync + 'static,
    ) {
        self.voxel_filter = Some(Box::new(filter));
    }

    pub fn clear_voxel_filter(&mut self) {
        self.voxel_filter = None;
    }

    /// Register an observer for committed mutations
    pub fn on_modified(&mut self, callback: impl Fn(&ModifiedEvent) + Send + Sync + 'static) {
        self.listeners.push(Box::new(callback));
    }

    /// Undo/redo history
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Whether a stroke is in flight
    pub fn is_stroking(&self) -> bool {
        self.stroke.is_some()
    }

    pub(crate) fn notify(&self, kind: ModifiedKind, voxel_count: usize) {
        let event = ModifiedEvent { kind, voxel_count };
        for listener in &self.listeners {
            listener(&event);
        }
    }
}
