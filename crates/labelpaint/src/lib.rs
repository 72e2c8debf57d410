//! Label volume painting
//!
//! This crate implements the editing core of a segmentation tool: brush,
//! polygon, rectangle and ellipse strokes are rasterized on a background
//! thread into a touch-mask, diffed into a `u8` label volume, and recorded as
//! minimal undo/redo entries. An optional heuristic fills the slices between
//! two consecutive same-label strokes.
//!
//! # Architecture
//!
//! ```text
//! stroke input ──► PaintEngine ──► RasterWorker (thread) ──► TouchMask
//!                       │                                        │
//!                       ◄───────────── end_stroke().await ◄──────┘
//!                       │
//!                       ├── diff into LabelVolume
//!                       ├── History (undo/redo)
//!                       └── fill-between-slices
//! ```

pub mod constants;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod history;
pub mod image;
pub mod raster;
pub mod volume;
mod worker;

pub use engine::{ModifiedCallback, ModifiedEvent, PaintEngine, StrokeSummary, VoxelFilter};
pub use error::{PaintError, TriangulationError};
pub use geometry::{CoordinateMapper, VolumeGeometry};
pub use history::{History, HistoryEntry};
pub use image::{ImageSource, ScalarVolume};
pub use labelpaint_config::{PaintConfig, SlicingMode};
pub use labelpaint_ipc::ModifiedKind;
pub use raster::TouchMask;
pub use volume::LabelVolume;
