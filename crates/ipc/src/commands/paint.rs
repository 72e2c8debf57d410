//! Paint command types for the label paint engine.

use labelpaint_config::SlicingMode;
use serde::{Deserialize, Serialize};

use crate::types::WorldPoint;

/// Commands for driving strokes, history and brush settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PaintCommand {
    /// Begin a new stroke
    StartStroke,
    /// Add a brush point (world coordinates) to the current stroke
    AddPoint { point: WorldPoint },
    /// Fill a closed polygon (world coordinates) into the current stroke
    PaintPolygon { points: Vec<WorldPoint> },
    /// Fill the axis-aligned box spanned by two world corners
    PaintRectangle { corner1: WorldPoint, corner2: WorldPoint },
    /// Stamp an ellipse with world-space half extents
    PaintEllipse { center: WorldPoint, scale: WorldPoint },
    /// Finish the current stroke and commit it
    EndStroke,
    /// Discard the current stroke without committing
    CancelStroke,
    /// Revert the most recent history entry
    Undo,
    /// Re-apply the next history entry
    Redo,
    /// Drop all history entries
    ClearHistory,
    /// Set the label written by strokes
    SetLabel { label: u8 },
    /// Set brush radius in world units
    SetRadius { radius: f64 },
    /// Set the axis held fixed while painting
    SetSlicingMode { mode: SlicingMode },
    /// Enable/disable fill-between-slices
    SetAutoFillBetweenSlices { enabled: bool },
}
