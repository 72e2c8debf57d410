//! Binary touch-mask for one in-flight stroke

use glam::IVec3;

/// Marks which voxels a stroke touched (same layout as the label data)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TouchMask {
    dimensions: [usize; 3],
    touched: Vec<bool>,
}

impl TouchMask {
    /// An untouched mask sized to the given grid
    pub fn new(dimensions: [usize; 3]) -> Self {
        Self {
            dimensions,
            touched: vec![false; dimensions.iter().product()],
        }
    }

    #[inline]
    pub fn dimensions(&self) -> [usize; 3] {
        self.dimensions
    }

    /// Number of voxels in the mask (touched or not)
    #[inline]
    pub fn len(&self) -> usize {
        self.touched.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.touched.is_empty()
    }

    /// Largest valid index along each axis
    #[inline]
    pub fn max_index(&self) -> IVec3 {
        let [nx, ny, nz] = self.dimensions;
        IVec3::new(nx as i32 - 1, ny as i32 - 1, nz as i32 - 1)
    }

    #[inline]
    fn offset(&self, index: IVec3) -> Option<usize> {
        let [nx, ny, nz] = self.dimensions;
        if index.cmplt(IVec3::ZERO).any() {
            return None;
        }
        let (i, j, k) = (index.x as usize, index.y as usize, index.z as usize);
        (i < nx && j < ny && k < nz).then(|| i + nx * (j + ny * k))
    }

    /// Mark a voxel; returns true if it was newly touched
    ///
    /// Out-of-grid indices are ignored.
    #[inline]
    pub fn mark(&mut self, index: IVec3) -> bool {
        match self.offset(index) {
            Some(offset) => !std::mem::replace(&mut self.touched[offset], true),
            None => false,
        }
    }

    /// Mark a voxel by linear offset
    #[inline]
    pub fn mark_offset(&mut self, offset: usize) -> bool {
        match self.touched.get_mut(offset) {
            Some(slot) => !std::mem::replace(slot, true),
            None => false,
        }
    }

    #[inline]
    pub fn is_touched(&self, index: IVec3) -> bool {
        self.offset(index).is_some_and(|offset| self.touched[offset])
    }

    /// Number of touched voxels
    pub fn touched_count(&self) -> usize {
        self.touched.iter().filter(|&&t| t).count()
    }

    /// Touched offsets in ascending order
    pub fn touched_offsets(&self) -> impl Iterator<Item = usize> + '_ {
        self.touched
            .iter()
            .enumerate()
            .filter_map(|(offset, &t)| t.then_some(offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_and_iterate_ascending() {
        let mut mask = TouchMask::new([3, 3, 3]);
        assert!(mask.mark(IVec3::new(2, 2, 2)));
        assert!(mask.mark(IVec3::new(0, 1, 0)));
        assert!(!mask.mark(IVec3::new(0, 1, 0)));
        assert!(!mask.mark(IVec3::new(3, 0, 0)));
        assert!(!mask.mark(IVec3::new(-1, 0, 0)));

        let offsets: Vec<usize> = mask.touched_offsets().collect();
        assert_eq!(offsets, vec![3, 26]);
        assert_eq!(mask.touched_count(), 2);
    }

    #[test]
    fn test_mark_offset_bounds() {
        let mut mask = TouchMask::new([2, 2, 2]);
        assert!(mask.mark_offset(7));
        assert!(!mask.mark_offset(8));
        assert!(mask.is_touched(IVec3::ONE));
    }
}
