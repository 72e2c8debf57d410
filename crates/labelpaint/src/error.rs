//! Error types for the paint engine.

use thiserror::Error;

/// Why a polygon could not be turned into triangles
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriangulationError {
    #[error("Polygon needs at least 3 distinct points, got {0}")]
    TooFewPoints(usize),
    #[error("Polygon has zero area")]
    Degenerate,
    #[error("Polygon is self-intersecting")]
    NotSimple,
}

#[derive(Debug, Error)]
pub enum PaintError {
    #[error("A stroke is already in progress")]
    StrokeInProgress,

    #[error("Rasterization worker disconnected")]
    WorkerDisconnected,

    #[error("Failed to spawn rasterization worker: {0}")]
    WorkerSpawn(#[from] std::io::Error),

    #[error("Triangulation failed: {0}")]
    Triangulation(#[from] TriangulationError),

    #[error("Dimension mismatch: expected {expected:?}, got {actual:?}")]
    GeometryMismatch {
        expected: [usize; 3],
        actual: [usize; 3],
    },

    #[error("Data length mismatch: expected {expected}, got {actual}")]
    DataLength { expected: usize, actual: usize },

    #[error("No background image set")]
    NoBackgroundImage,

    #[error("Invalid volume geometry: {0}")]
    InvalidGeometry(String),

    #[error("Malformed stroke input: {0}")]
    Protocol(#[from] labelpaint_ipc::IpcError),
}

impl PaintError {
    /// Short machine-readable code for UI error messages
    pub fn code(&self) -> &'static str {
        match self {
            Self::StrokeInProgress => "stroke_in_progress",
            Self::WorkerDisconnected => "worker_disconnected",
            Self::WorkerSpawn(_) => "worker_spawn",
            Self::Triangulation(_) => "triangulation",
            Self::GeometryMismatch { .. } => "geometry_mismatch",
            Self::DataLength { .. } => "data_length",
            Self::NoBackgroundImage => "no_background_image",
            Self::InvalidGeometry(_) => "invalid_geometry",
            Self::Protocol(_) => "protocol",
        }
    }
}
