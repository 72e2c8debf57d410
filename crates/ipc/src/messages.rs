//! Main IPC message enums for communication between the UI and the engine.

use serde::{Deserialize, Serialize};

use crate::commands::PaintCommand;
use crate::types::ModifiedKind;

/// Messages from the engine to the interaction layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum EngineToUi {
    /// Label data changed and views should redraw
    Modified {
        kind: ModifiedKind,
        /// Number of voxels written by the mutation
        voxel_count: usize,
    },

    /// Undo/redo availability after a history change
    HistoryChanged { can_undo: bool, can_redo: bool },

    /// Error notification
    Error { code: String, message: String },
}

/// Messages from the interaction layer to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum UiToEngine {
    /// Paint-specific commands (strokes, brush settings, undo, etc.)
    PaintCommand(PaintCommand),
}
