//! Background image collaborators
//!
//! The engine never decodes image files. It only needs the geometry of the
//! background scan (to shape a fresh label map) and, for voxel filters, the
//! scalar intensity at an offset.

use crate::error::PaintError;
use crate::geometry::VolumeGeometry;

/// A source of background image geometry and scalars
pub trait ImageSource: Send + Sync {
    /// Geometry of the image grid
    fn geometry(&self) -> &VolumeGeometry;

    /// Scalar intensity at a linear offset, if the source carries scalars
    fn scalar(&self, _offset: usize) -> Option<f64> {
        None
    }
}

/// An in-memory single-component scalar volume
#[derive(Debug, Clone)]
pub struct ScalarVolume {
    geometry: VolumeGeometry,
    values: Vec<f32>,
}

impl ScalarVolume {
    pub fn new(geometry: VolumeGeometry, values: Vec<f32>) -> Result<Self, PaintError> {
        geometry.validate()?;
        if values.len() != geometry.voxel_count() {
            return Err(PaintError::DataLength {
                expected: geometry.voxel_count(),
                actual: values.len(),
            });
        }
        Ok(Self { geometry, values })
    }

    /// A volume filled with one constant value
    pub fn filled(geometry: VolumeGeometry, value: f32) -> Result<Self, PaintError> {
        geometry.validate()?;
        let count = geometry.voxel_count();
        Self::new(geometry, vec![value; count])
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

impl ImageSource for ScalarVolume {
    fn geometry(&self) -> &VolumeGeometry {
        &self.geometry
    }

    fn scalar(&self, offset: usize) -> Option<f64> {
        self.values.get(offset).map(|&v| f64::from(v))
    }
}

/// Geometry-only source, for hosts that keep scalars elsewhere
impl ImageSource for VolumeGeometry {
    fn geometry(&self) -> &VolumeGeometry {
        self
    }
}
