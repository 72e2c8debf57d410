//! Brush footprints: ellipsoid dabs joined along the motion path

use glam::{DVec3, I64Vec3, IVec3};

use super::TouchMask;
use crate::geometry::round_half_up;

/// Normalized distance of `x` from `center` along one axis
#[inline]
fn axis_term(center: f64, x: f64, radius: f64) -> f64 {
    if radius > 0.0 {
        (center - x) / radius
    } else if center == x {
        0.0
    } else {
        f64::INFINITY
    }
}

/// Stamp one brush dab
///
/// `center` is rounded to the nearest voxel; `radius` is the per-axis voxel
/// radius. When `slice_axis` is set the dab is a flat ellipse on the center's
/// slice rather than an ellipsoid. Returns the number of newly touched voxels.
pub fn stamp_ellipsoid(
    mask: &mut TouchMask,
    center: DVec3,
    radius: DVec3,
    slice_axis: Option<usize>,
) -> usize {
    let center = round_half_up(center);
    let max_index = mask.max_index().as_dvec3();

    let mut lo = center;
    let mut hi = center;
    for axis in 0..3 {
        if slice_axis == Some(axis) {
            if center[axis] < 0.0 || center[axis] > max_index[axis] {
                return 0;
            }
            continue;
        }
        lo[axis] = (center[axis] - radius[axis]).max(0.0) + 0.5;
        hi[axis] = (center[axis] + radius[axis]).min(max_index[axis]) + 0.5;
    }
    let lo = lo.floor();
    let hi = hi.floor();
    if lo.cmpgt(hi).any() {
        return 0;
    }

    let lo = lo.as_ivec3();
    let hi = hi.as_ivec3();
    let flat = |axis: usize| slice_axis == Some(axis);

    let mut marked = 0;
    for k in lo.z..=hi.z {
        let dz = if flat(2) { 0.0 } else { axis_term(center.z, f64::from(k), radius.z) };
        let remaining_z = 1.0 - dz * dz;
        for j in lo.y..=hi.y {
            let dy = if flat(1) { 0.0 } else { axis_term(center.y, f64::from(j), radius.y) };
            let remaining_y = remaining_z - dy * dy;
            for i in lo.x..=hi.x {
                let dx = if flat(0) { 0.0 } else { axis_term(center.x, f64::from(i), radius.x) };
                if remaining_y - dx * dx >= 0.0 && mask.mark(IVec3::new(i, j, k)) {
                    marked += 1;
                }
            }
        }
    }
    marked
}

/// Parameter range `[t0, t1]` of the segment `a..b` inside the box `lo..hi`
fn clip_segment(a: DVec3, b: DVec3, lo: DVec3, hi: DVec3) -> Option<(f64, f64)> {
    let d = b - a;
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for axis in 0..3 {
        if d[axis] == 0.0 {
            if a[axis] < lo[axis] || a[axis] > hi[axis] {
                return None;
            }
            continue;
        }
        let ta = (lo[axis] - a[axis]) / d[axis];
        let tb = (hi[axis] - a[axis]) / d[axis];
        t0 = t0.max(ta.min(tb));
        t1 = t1.min(ta.max(tb));
        if t0 > t1 {
            return None;
        }
    }
    Some((t0, t1))
}

/// Continuous brush stroke state
///
/// Each new point is connected to the previous one with an integer DDA line
/// and a dab is stamped at every step, so fast drags leave no gaps. Segments
/// are clipped to the grid (widened by the brush radius) before stepping, so
/// far-off points cost nothing and only their in-grid part is painted.
#[derive(Debug, Default, Clone)]
pub struct BrushPath {
    last: Option<DVec3>,
}

impl BrushPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend the path to `point` (index space), stamping dabs along the way
    ///
    /// Non-finite points are ignored and leave the path where it was.
    pub fn paint_to(
        &mut self,
        mask: &mut TouchMask,
        point: DVec3,
        radius: DVec3,
        slice_axis: Option<usize>,
    ) -> usize {
        if !point.is_finite() {
            return 0;
        }
        let point = round_half_up(point);
        let start = self.last.replace(point).unwrap_or(point);

        // Capped so an oversized brush still walks a bounded segment
        let extent = mask.max_index().as_dvec3();
        let margin = radius.abs().min(extent + DVec3::ONE) + DVec3::ONE;
        let Some((t0, t1)) = clip_segment(start, point, -margin, extent + margin) else {
            return 0;
        };
        let from = round_half_up(start.lerp(point, t0)).as_i64vec3();
        let to = round_half_up(start.lerp(point, t1)).as_i64vec3();

        let delta = to - from;
        let step_dir = delta.signum();
        let delta = delta.abs();
        let steps = delta.max_element();

        let mut threshold = I64Vec3::splat(steps);
        let mut cursor = from;
        let mut marked = 0;
        for _ in 0..=steps {
            marked += stamp_ellipsoid(mask, cursor.as_dvec3(), radius, slice_axis);
            threshold -= delta;
            for axis in 0..3 {
                if threshold[axis] <= 0 {
                    threshold[axis] += steps;
                    cursor[axis] += step_dir[axis];
                }
            }
        }
        marked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_voxel_radius_touches_single_voxel() {
        let mut mask = TouchMask::new([4, 4, 4]);
        let marked = stamp_ellipsoid(&mut mask, DVec3::splat(2.0), DVec3::splat(0.5), None);
        assert_eq!(marked, 1);
        assert!(mask.is_touched(IVec3::splat(2)));
    }

    #[test]
    fn test_sphere_containment() {
        let mut mask = TouchMask::new([16, 16, 16]);
        let center = DVec3::splat(8.0);
        let radius = 3.5;
        stamp_ellipsoid(&mut mask, center, DVec3::splat(radius), None);

        for k in 0..16 {
            for j in 0..16 {
                for i in 0..16 {
                    let index = IVec3::new(i, j, k);
                    let inside = index.as_dvec3().distance(center) <= radius;
                    assert_eq!(mask.is_touched(index), inside, "voxel {index}");
                }
            }
        }
    }

    #[test]
    fn test_slice_axis_keeps_dab_flat() {
        let mut mask = TouchMask::new([8, 8, 8]);
        stamp_ellipsoid(&mut mask, DVec3::new(4.0, 4.0, 3.0), DVec3::splat(2.0), Some(2));
        assert!(mask.is_touched(IVec3::new(4, 4, 3)));
        assert!(mask.is_touched(IVec3::new(6, 4, 3)));
        assert!(!mask.is_touched(IVec3::new(4, 4, 2)));
        assert!(!mask.is_touched(IVec3::new(4, 4, 4)));
    }

    #[test]
    fn test_slice_outside_grid_is_skipped() {
        let mut mask = TouchMask::new([8, 8, 8]);
        let marked = stamp_ellipsoid(&mut mask, DVec3::new(4.0, 4.0, 9.0), DVec3::splat(2.0), Some(2));
        assert_eq!(marked, 0);
    }

    #[test]
    fn test_anisotropic_radius() {
        let mut mask = TouchMask::new([9, 9, 9]);
        stamp_ellipsoid(&mut mask, DVec3::splat(4.0), DVec3::new(3.0, 1.0, 0.0), None);
        assert!(mask.is_touched(IVec3::new(7, 4, 4)));
        assert!(!mask.is_touched(IVec3::new(4, 6, 4)));
        assert!(!mask.is_touched(IVec3::new(4, 4, 5)));
        assert!(mask.is_touched(IVec3::new(4, 5, 4)));
    }

    #[test]
    fn test_path_has_no_gaps() {
        let mut mask = TouchMask::new([16, 4, 4]);
        let mut path = BrushPath::new();
        let radius = DVec3::splat(0.5);
        path.paint_to(&mut mask, DVec3::new(1.0, 1.0, 1.0), radius, None);
        path.paint_to(&mut mask, DVec3::new(12.0, 1.0, 1.0), radius, None);

        for i in 1..=12 {
            assert!(mask.is_touched(IVec3::new(i, 1, 1)), "gap at {i}");
        }
        assert_eq!(mask.touched_count(), 12);
    }

    #[test]
    fn test_diagonal_path() {
        let mut mask = TouchMask::new([8, 8, 8]);
        let mut path = BrushPath::new();
        let radius = DVec3::splat(0.5);
        path.paint_to(&mut mask, DVec3::new(5.0, 5.0, 2.0), radius, Some(2));
        path.paint_to(&mut mask, DVec3::new(1.0, 3.0, 2.0), radius, Some(2));

        assert!(mask.is_touched(IVec3::new(5, 5, 2)));
        assert!(mask.is_touched(IVec3::new(1, 3, 2)));
        // One dab per DDA step along the major axis
        assert_eq!(mask.touched_count(), 5);
    }

    #[test]
    fn test_far_points_are_clipped() {
        let mut mask = TouchMask::new([4, 4, 4]);
        let mut path = BrushPath::new();
        let radius = DVec3::splat(0.5);
        path.paint_to(&mut mask, DVec3::new(1.0, 1.0, 1.0), radius, None);
        path.paint_to(&mut mask, DVec3::new(1e12, 1.0, 1.0), radius, None);
        path.paint_to(&mut mask, DVec3::new(-1e12, 1.0, 1.0), radius, None);

        for i in 0..4 {
            assert!(mask.is_touched(IVec3::new(i, 1, 1)));
        }
        assert_eq!(mask.touched_count(), 4);
    }

    #[test]
    fn test_segment_outside_grid_is_skipped() {
        let mut mask = TouchMask::new([4, 4, 4]);
        let mut path = BrushPath::new();
        let radius = DVec3::splat(1.0);
        assert_eq!(path.paint_to(&mut mask, DVec3::splat(50.0), radius, None), 0);
        assert_eq!(path.paint_to(&mut mask, DVec3::new(90.0, 50.0, 50.0), radius, None), 0);
        assert_eq!(path.paint_to(&mut mask, DVec3::splat(f64::NAN), radius, None), 0);
        assert_eq!(mask.touched_count(), 0);
    }

    #[test]
    fn test_segment_entering_grid() {
        let mut mask = TouchMask::new([4, 4, 4]);
        let mut path = BrushPath::new();
        let radius = DVec3::splat(0.5);
        path.paint_to(&mut mask, DVec3::new(-1e9, 2.0, 2.0), radius, None);
        path.paint_to(&mut mask, DVec3::new(2.0, 2.0, 2.0), radius, None);
        assert_eq!(mask.touched_count(), 3);
        assert!(mask.is_touched(IVec3::new(0, 2, 2)));
    }

    #[test]
    fn test_half_index_rounds_up() {
        let mut mask = TouchMask::new([4, 4, 4]);
        let marked = stamp_ellipsoid(&mut mask, DVec3::new(-0.5, 1.0, 1.0), DVec3::splat(0.4), None);
        assert_eq!(marked, 1);
        assert!(mask.is_touched(IVec3::new(0, 1, 1)));
    }
}
