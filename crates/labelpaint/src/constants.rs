/// Name given to the per-stroke rasterization thread.
pub const RASTER_THREAD_NAME: &str = "labelpaint-raster";

/// Index-space half extent used for ellipse axes that collapse to zero.
pub const MIN_ELLIPSE_EXTENT: f64 = 0.25;

/// Tolerance for point-in-triangle and polygon area tests (index units).
pub const GEOMETRY_EPSILON: f64 = 1e-9;

/// Label value meaning "unlabeled" (also the eraser label).
pub const UNLABELED: u8 = 0;
