//! Label volume storage - one `u8` label per voxel

use glam::{DVec3, IVec3};

use crate::error::PaintError;
use crate::geometry::{CoordinateMapper, VolumeGeometry};

/// A 3D grid of labels parallel in geometry to the background image
///
/// Geometry is fixed at construction; only the label data changes.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelVolume {
    geometry: VolumeGeometry,
    mapper: CoordinateMapper,
    /// Labels in `i + j*nx + k*nx*ny` order
    data: Vec<u8>,
}

impl LabelVolume {
    /// Create an all-zero (unlabeled) volume with the given geometry
    pub fn new(geometry: VolumeGeometry) -> Result<Self, PaintError> {
        geometry.validate()?;
        let count = geometry.voxel_count();
        Self::from_data(geometry, vec![0; count])
    }

    /// Wrap existing label data (e.g. a label map decoded from file)
    pub fn from_data(geometry: VolumeGeometry, data: Vec<u8>) -> Result<Self, PaintError> {
        geometry.validate()?;
        let expected = geometry.voxel_count();
        if data.len() != expected {
            return Err(PaintError::DataLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            mapper: CoordinateMapper::new(&geometry),
            geometry,
            data,
        })
    }

    #[inline]
    pub fn geometry(&self) -> &VolumeGeometry {
        &self.geometry
    }

    #[inline]
    pub fn dimensions(&self) -> [usize; 3] {
        self.geometry.dimensions
    }

    #[inline]
    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    /// Raw label data for export
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the volume, returning its label data
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    pub fn voxel_count(&self) -> usize {
        self.data.len()
    }

    /// Label at a linear offset
    #[inline]
    pub fn get(&self, offset: usize) -> Option<u8> {
        self.data.get(offset).copied()
    }

    /// Label at integer index coordinates
    #[inline]
    pub fn label_at_index(&self, index: IVec3) -> Option<u8> {
        self.mapper.index_to_offset(index).map(|offset| self.data[offset])
    }

    /// Label of the voxel nearest to a world position
    #[inline]
    pub fn label_at_world(&self, world: DVec3) -> Option<u8> {
        self.label_at_index(self.mapper.world_to_voxel(world))
    }

    /// Number of voxels carrying `label`
    pub fn count_label(&self, label: u8) -> usize {
        self.data.iter().filter(|&&value| value == label).count()
    }

    /// Whether another volume shares this grid size
    pub fn same_dimensions(&self, other: &LabelVolume) -> bool {
        self.dimensions() == other.dimensions()
    }
}
