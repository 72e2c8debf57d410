//! Stroke rasterization into touch-masks
//!
//! Everything here works in voxel index space. The engine converts world
//! geometry through the label map's [`crate::geometry::CoordinateMapper`]
//! before handing commands to the rasterizer, so this module never sees
//! spacing or direction.

mod brush;
mod mask;
mod polygon;

pub use brush::{BrushPath, stamp_ellipsoid};
pub use mask::TouchMask;
pub use polygon::{Triangle, TriangulatedPolygon, fill_triangles, triangulate};

use glam::IVec3;

/// Mark every voxel in the inclusive box between two corners
///
/// Corners may be given in any order and may lie outside the grid; the box is
/// clamped. Returns the number of voxels marked.
pub fn fill_box(mask: &mut TouchMask, corner1: IVec3, corner2: IVec3) -> usize {
    let max_index = mask.max_index();
    let lo = corner1.min(corner2).max(IVec3::ZERO);
    let hi = corner1.max(corner2).min(max_index);
    if lo.cmpgt(hi).any() {
        return 0;
    }

    let mut marked = 0;
    for k in lo.z..=hi.z {
        for j in lo.y..=hi.y {
            for i in lo.x..=hi.x {
                if mask.mark(IVec3::new(i, j, k)) {
                    marked += 1;
                }
            }
        }
    }
    marked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_box_clamped() {
        let mut mask = TouchMask::new([4, 4, 4]);
        let marked = fill_box(&mut mask, IVec3::new(2, 3, 1), IVec3::new(-5, 1, 1));
        // i in 0..=2, j in 1..=3, k = 1
        assert_eq!(marked, 9);
        assert_eq!(mask.touched_count(), 9);
        assert!(mask.is_touched(IVec3::new(0, 1, 1)));
        assert!(!mask.is_touched(IVec3::new(3, 1, 1)));
    }

    #[test]
    fn test_fill_box_outside() {
        let mut mask = TouchMask::new([4, 4, 4]);
        assert_eq!(fill_box(&mut mask, IVec3::splat(5), IVec3::splat(9)), 0);
        assert_eq!(mask.touched_count(), 0);
    }
}
