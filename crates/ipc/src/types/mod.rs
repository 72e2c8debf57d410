//! Shared value types carried by paint protocol messages.

mod point;

pub use point::*;

use serde::{Deserialize, Serialize};

/// What kind of committed mutation produced a modified notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModifiedKind {
    /// A stroke was diffed and committed
    Paint,
    /// A history entry was reverted
    Undo,
    /// A history entry was re-applied
    Redo,
    /// Fill-between-slices wrote interpolated voxels
    Fill,
    /// The label map was replaced wholesale (history cleared)
    LabelMapReplaced,
    /// A label map was applied as an undoable diff
    LabelMapApplied,
}
