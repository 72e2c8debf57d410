//! Volume geometry and world/index/offset conversion
//!
//! A volume's voxel grid is placed in world space by an affine transform:
//! `world = origin + direction * (spacing ⊙ index)`. [`CoordinateMapper`]
//! caches that transform and its inverse so strokes can be converted to
//! voxel space without recomputing the matrix inverse on every point.

use glam::{DMat3, DVec3, IVec3};
use serde::{Deserialize, Serialize};

use crate::error::PaintError;

/// Grid size and world placement of a volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeGeometry {
    /// Voxel counts along i, j, k
    pub dimensions: [usize; 3],
    /// World distance between voxel centers along each axis
    pub spacing: DVec3,
    /// World position of voxel (0, 0, 0)
    pub origin: DVec3,
    /// Axis directions (columns are the i, j, k unit vectors in world space)
    pub direction: DMat3,
}

impl VolumeGeometry {
    /// Axis-aligned geometry with the given spacing and origin
    pub fn new(dimensions: [usize; 3], spacing: DVec3, origin: DVec3) -> Self {
        Self {
            dimensions,
            spacing,
            origin,
            direction: DMat3::IDENTITY,
        }
    }

    /// Unit-spacing geometry at the world origin, where index space equals world space
    pub fn with_dimensions(dimensions: [usize; 3]) -> Self {
        Self::new(dimensions, DVec3::ONE, DVec3::ZERO)
    }

    /// Set the direction matrix
    pub fn with_direction(mut self, direction: DMat3) -> Self {
        self.direction = direction;
        self
    }

    /// Total number of voxels
    #[inline]
    pub fn voxel_count(&self) -> usize {
        self.dimensions.iter().product()
    }

    /// Check that the geometry describes a usable, invertible grid
    pub fn validate(&self) -> Result<(), PaintError> {
        if self.dimensions.contains(&0) {
            return Err(PaintError::InvalidGeometry(format!(
                "empty dimensions {:?}",
                self.dimensions
            )));
        }
        if self
            .dimensions
            .iter()
            .try_fold(1usize, |count, &d| count.checked_mul(d))
            .is_none()
        {
            return Err(PaintError::InvalidGeometry(format!(
                "dimensions {:?} overflow the voxel count",
                self.dimensions
            )));
        }
        if self.dimensions.iter().any(|&d| d > i32::MAX as usize) {
            return Err(PaintError::InvalidGeometry(format!(
                "dimensions {:?} exceed index range",
                self.dimensions
            )));
        }
        if !self.spacing.is_finite() || self.spacing.min_element() <= 0.0 {
            return Err(PaintError::InvalidGeometry(format!(
                "spacing must be positive, got {:?}",
                self.spacing
            )));
        }
        if !self.origin.is_finite() {
            return Err(PaintError::InvalidGeometry("origin is not finite".to_string()));
        }
        let det = self.direction.determinant();
        if !det.is_finite() || det.abs() < f64::EPSILON {
            return Err(PaintError::InvalidGeometry(
                "direction matrix is singular".to_string(),
            ));
        }
        Ok(())
    }
}

/// Round to the nearest integer with halves going up (`-0.5` becomes `0`)
#[inline]
pub fn round_half_up(v: DVec3) -> DVec3 {
    (v + DVec3::splat(0.5)).floor()
}

/// Cached world <-> index <-> offset transforms for one geometry
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateMapper {
    dimensions: [usize; 3],
    spacing: DVec3,
    origin: DVec3,
    index_to_world: DMat3,
    world_to_index: DMat3,
}

impl CoordinateMapper {
    /// Build the mapper; the geometry must have passed [`VolumeGeometry::validate`]
    pub fn new(geometry: &VolumeGeometry) -> Self {
        let index_to_world = geometry.direction * DMat3::from_diagonal(geometry.spacing);
        Self {
            dimensions: geometry.dimensions,
            spacing: geometry.spacing,
            origin: geometry.origin,
            index_to_world,
            world_to_index: index_to_world.inverse(),
        }
    }

    #[inline]
    pub fn dimensions(&self) -> [usize; 3] {
        self.dimensions
    }

    /// Continuous index coordinates of a world point (not rounded)
    #[inline]
    pub fn world_to_index(&self, world: DVec3) -> DVec3 {
        self.world_to_index * (world - self.origin)
    }

    /// World position of (possibly fractional) index coordinates
    #[inline]
    pub fn index_to_world(&self, index: DVec3) -> DVec3 {
        self.origin + self.index_to_world * index
    }

    /// Nearest voxel index of a world point (may lie outside the grid)
    #[inline]
    pub fn world_to_voxel(&self, world: DVec3) -> IVec3 {
        round_half_up(self.world_to_index(world)).as_ivec3()
    }

    /// Map a world-space vector (no translation) into index space
    #[inline]
    pub fn vector_to_index(&self, vector: DVec3) -> DVec3 {
        self.world_to_index * vector
    }

    /// Per-axis voxel radius of a world-space radius
    ///
    /// Anisotropic spacing turns a physical circle into an ellipse in voxel space.
    #[inline]
    pub fn voxel_radius(&self, world_radius: f64) -> DVec3 {
        DVec3::splat(world_radius) / self.spacing
    }

    /// Whether an index lies inside the grid
    #[inline]
    pub fn contains(&self, index: IVec3) -> bool {
        index
            .to_array()
            .iter()
            .zip(self.dimensions)
            .all(|(&c, d)| c >= 0 && (c as usize) < d)
    }

    /// Linear offset `i + j*nx + k*nx*ny`, or `None` outside the grid
    #[inline]
    pub fn index_to_offset(&self, index: IVec3) -> Option<usize> {
        if !self.contains(index) {
            return None;
        }
        let [nx, ny, _] = self.dimensions;
        Some(index.x as usize + nx * (index.y as usize + ny * index.z as usize))
    }

    /// Inverse of [`Self::index_to_offset`]; offset must be in range
    #[inline]
    pub fn offset_to_index(&self, offset: usize) -> IVec3 {
        let [nx, ny, _] = self.dimensions;
        let i = offset % nx;
        let j = (offset / nx) % ny;
        let k = offset / (nx * ny);
        IVec3::new(i as i32, j as i32, k as i32)
    }
}
