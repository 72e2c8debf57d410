//! Polygon triangulation and triangle scan fill
//!
//! Polygons arrive as index-space points lying (roughly) on one slice. They
//! are projected onto the slice plane, ear-clipped into triangles, and each
//! triangle is filled on the slice its vertices sit on.

use glam::{DVec2, DVec3, IVec3};
use tracing::debug;

use super::TouchMask;
use crate::constants::GEOMETRY_EPSILON;
use crate::error::TriangulationError;

/// A triangle in index space
pub type Triangle = [DVec3; 3];

/// Triangles of one polygon and the slice axis they lie across
#[derive(Debug, Clone, PartialEq)]
pub struct TriangulatedPolygon {
    pub triangles: Vec<Triangle>,
    pub fixed_axis: usize,
}

/// The two in-plane axes for a fixed axis, in ascending order
#[inline]
fn plane_axes(fixed: usize) -> (usize, usize) {
    match fixed {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    }
}

#[inline]
fn project(point: DVec3, (u, v): (usize, usize)) -> DVec2 {
    DVec2::new(point[u], point[v])
}

/// Twice the signed area of triangle abc (positive when counter-clockwise)
#[inline]
fn cross(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    (b - a).perp_dot(c - a)
}

fn signed_area(points: &[DVec2]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| points[i].perp_dot(points[(i + 1) % n]))
        .sum::<f64>()
        * 0.5
}

/// Axis most aligned with the polygon normal (Newell's method)
fn dominant_axis(points: &[DVec3]) -> Option<usize> {
    let n = points.len();
    let normal = (0..n).fold(DVec3::ZERO, |acc, i| {
        let (a, b) = (points[i], points[(i + 1) % n]);
        acc + DVec3::new(
            (a.y - b.y) * (a.z + b.z),
            (a.z - b.z) * (a.x + b.x),
            (a.x - b.x) * (a.y + b.y),
        )
    });
    let abs = normal.abs();
    if abs.max_element() <= GEOMETRY_EPSILON {
        return None;
    }
    Some(if abs.x >= abs.y && abs.x >= abs.z {
        0
    } else if abs.y >= abs.z {
        1
    } else {
        2
    })
}

fn on_segment(a: DVec2, b: DVec2, p: DVec2) -> bool {
    p.x >= a.x.min(b.x) - GEOMETRY_EPSILON
        && p.x <= a.x.max(b.x) + GEOMETRY_EPSILON
        && p.y >= a.y.min(b.y) - GEOMETRY_EPSILON
        && p.y <= a.y.max(b.y) + GEOMETRY_EPSILON
}

/// Closed-segment intersection test (touching counts)
fn segments_intersect(a: DVec2, b: DVec2, c: DVec2, d: DVec2) -> bool {
    let d1 = cross(c, d, a);
    let d2 = cross(c, d, b);
    let d3 = cross(a, b, c);
    let d4 = cross(a, b, d);
    let straddles = |x: f64, y: f64| {
        (x > GEOMETRY_EPSILON && y < -GEOMETRY_EPSILON)
            || (x < -GEOMETRY_EPSILON && y > GEOMETRY_EPSILON)
    };
    if straddles(d1, d2) && straddles(d3, d4) {
        return true;
    }
    (d1.abs() <= GEOMETRY_EPSILON && on_segment(c, d, a))
        || (d2.abs() <= GEOMETRY_EPSILON && on_segment(c, d, b))
        || (d3.abs() <= GEOMETRY_EPSILON && on_segment(a, b, c))
        || (d4.abs() <= GEOMETRY_EPSILON && on_segment(a, b, d))
}

fn is_simple(points: &[DVec2]) -> bool {
    let n = points.len();
    for i in 0..n {
        let (a, b) = (points[i], points[(i + 1) % n]);
        for j in (i + 2)..n {
            // First and last edges share a vertex
            if i == 0 && j == n - 1 {
                continue;
            }
            let (c, d) = (points[j], points[(j + 1) % n]);
            if segments_intersect(a, b, c, d) {
                return false;
            }
        }
    }
    true
}

/// Inclusive point-in-triangle test, either winding
fn triangle_contains(a: DVec2, b: DVec2, c: DVec2, p: DVec2) -> bool {
    let d1 = cross(a, b, p);
    let d2 = cross(b, c, p);
    let d3 = cross(c, a, p);
    let has_neg = d1 < -GEOMETRY_EPSILON || d2 < -GEOMETRY_EPSILON || d3 < -GEOMETRY_EPSILON;
    let has_pos = d1 > GEOMETRY_EPSILON || d2 > GEOMETRY_EPSILON || d3 > GEOMETRY_EPSILON;
    !(has_neg && has_pos)
}

/// Ear-clip a simple polygon into triangles
///
/// `fixed_axis` names the slice axis the polygon lies on; when `None` the axis
/// is taken from the polygon normal. Consecutive duplicate points (including
/// an explicit closing point) are ignored.
pub fn triangulate(
    points: &[DVec3],
    fixed_axis: Option<usize>,
) -> Result<TriangulatedPolygon, TriangulationError> {
    let mut ring: Vec<DVec3> = Vec::with_capacity(points.len());
    for &point in points {
        if ring
            .last()
            .is_none_or(|last: &DVec3| last.distance_squared(point) > GEOMETRY_EPSILON)
        {
            ring.push(point);
        }
    }
    while ring.len() > 1
        && ring[0].distance_squared(ring[ring.len() - 1]) <= GEOMETRY_EPSILON
    {
        ring.pop();
    }
    if ring.len() < 3 {
        return Err(TriangulationError::TooFewPoints(ring.len()));
    }

    let fixed = match fixed_axis {
        Some(axis) => axis,
        None => dominant_axis(&ring).ok_or(TriangulationError::Degenerate)?,
    };
    let axes = plane_axes(fixed);
    let flat: Vec<DVec2> = ring.iter().map(|&p| project(p, axes)).collect();

    if !is_simple(&flat) {
        return Err(TriangulationError::NotSimple);
    }
    let area = signed_area(&flat);
    if area.abs() <= GEOMETRY_EPSILON {
        return Err(TriangulationError::Degenerate);
    }

    let mut remaining: Vec<usize> = (0..ring.len()).collect();
    if area < 0.0 {
        remaining.reverse();
    }

    let mut triangles = Vec::with_capacity(ring.len() - 2);
    let mut cursor = 0;
    let mut misses = 0;
    while remaining.len() > 3 {
        let len = remaining.len();
        if misses >= len {
            return Err(TriangulationError::NotSimple);
        }
        let at = cursor % len;
        let (ia, ib, ic) = (remaining[(at + len - 1) % len], remaining[at], remaining[(at + 1) % len]);
        let (a, b, c) = (flat[ia], flat[ib], flat[ic]);
        let turn = cross(a, b, c);

        if turn.abs() <= GEOMETRY_EPSILON {
            // Collinear vertex contributes no area
            remaining.remove(at);
            cursor = at;
            misses = 0;
            continue;
        }
        let is_ear = turn > 0.0
            && remaining
                .iter()
                .filter(|&&idx| idx != ia && idx != ib && idx != ic)
                .all(|&idx| !triangle_contains(a, b, c, flat[idx]));
        if !is_ear {
            cursor = at + 1;
            misses += 1;
            continue;
        }

        triangles.push([ring[ia], ring[ib], ring[ic]]);
        remaining.remove(at);
        cursor = at;
        misses = 0;
    }

    let (ia, ib, ic) = (remaining[0], remaining[1], remaining[2]);
    if cross(flat[ia], flat[ib], flat[ic]).abs() > GEOMETRY_EPSILON {
        triangles.push([ring[ia], ring[ib], ring[ic]]);
    }

    debug!(
        "triangulated {} points into {} triangles (fixed axis {})",
        ring.len(),
        triangles.len(),
        fixed
    );
    Ok(TriangulatedPolygon {
        triangles,
        fixed_axis: fixed,
    })
}

/// Mark every voxel covered by the triangles on their slice
///
/// Each triangle is filled on the slice nearest to its vertices' mean position
/// along `fixed_axis`; triangles whose slice lies outside the grid are
/// skipped. Returns the number of newly touched voxels.
pub fn fill_triangles(mask: &mut TouchMask, triangles: &[Triangle], fixed_axis: usize) -> usize {
    let max_index = mask.max_index();
    let axes = plane_axes(fixed_axis);
    let mut marked = 0;

    for triangle in triangles {
        let slice = (triangle.iter().map(|p| p[fixed_axis]).sum::<f64>() / 3.0).round();
        if slice < 0.0 || slice > f64::from(max_index[fixed_axis]) {
            debug!("fill_triangles: slice {} outside grid, skipping", slice);
            continue;
        }

        let [a, b, c] = triangle.map(|p| project(p, axes));
        let lo = a.min(b).min(c).floor().max(DVec2::ZERO);
        let hi = a
            .max(b)
            .max(c)
            .ceil()
            .min(DVec2::new(f64::from(max_index[axes.0]), f64::from(max_index[axes.1])));
        if lo.cmpgt(hi).any() {
            continue;
        }

        for v in (lo.y as i32)..=(hi.y as i32) {
            for u in (lo.x as i32)..=(hi.x as i32) {
                if !triangle_contains(a, b, c, DVec2::new(f64::from(u), f64::from(v))) {
                    continue;
                }
                let mut index = IVec3::ZERO;
                index[fixed_axis] = slice as i32;
                index[axes.0] = u;
                index[axes.1] = v;
                if mask.mark(index) {
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

    fn on_slice(z: f64, points: &[(f64, f64)]) -> Vec<DVec3> {
        points.iter().map(|&(x, y)| DVec3::new(x, y, z)).collect()
    }

    #[test]
    fn test_square_fill() {
        let square = on_slice(2.0, &[(1.0, 1.0), (3.0, 1.0), (3.0, 3.0), (1.0, 3.0)]);
        let triangles = triangulate(&square, Some(2)).unwrap().triangles;
        assert_eq!(triangles.len(), 2);

        let mut mask = TouchMask::new([5, 5, 5]);
        let marked = fill_triangles(&mut mask, &triangles, 2);
        assert_eq!(marked, 9);
        assert!(mask.is_touched(IVec3::new(2, 2, 2)));
        assert!(!mask.is_touched(IVec3::new(2, 2, 1)));
        assert!(!mask.is_touched(IVec3::new(0, 2, 2)));
    }

    #[test]
    fn test_non_convex_fill() {
        // L-shape with the notch at (3..4, 3..4)
        let l_shape = on_slice(
            1.0,
            &[(0.0, 0.0), (4.0, 0.0), (4.0, 2.0), (2.0, 2.0), (2.0, 4.0), (0.0, 4.0)],
        );
        let polygon = triangulate(&l_shape, None).unwrap();
        assert_eq!(polygon.fixed_axis, 2);
        let triangles = polygon.triangles;
        assert_eq!(triangles.len(), 4);

        let mut mask = TouchMask::new([6, 6, 3]);
        fill_triangles(&mut mask, &triangles, 2);
        assert_eq!(mask.touched_count(), 21);
        assert!(!mask.is_touched(IVec3::new(3, 3, 1)));
        assert!(!mask.is_touched(IVec3::new(4, 4, 1)));
        assert!(mask.is_touched(IVec3::new(2, 4, 1)));
        assert!(mask.is_touched(IVec3::new(4, 2, 1)));
    }

    #[test]
    fn test_clockwise_and_closed_input() {
        let square = on_slice(
            0.0,
            &[(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0), (0.0, 0.0)],
        );
        let triangles = triangulate(&square, Some(2)).unwrap().triangles;
        let mut mask = TouchMask::new([4, 4, 1]);
        assert_eq!(fill_triangles(&mut mask, &triangles, 2), 9);
    }

    #[test]
    fn test_polygon_on_i_slice() {
        let points = vec![
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(1.0, 2.0, 0.0),
            DVec3::new(1.0, 0.0, 2.0),
        ];
        let polygon = triangulate(&points, None).unwrap();
        assert_eq!(polygon.fixed_axis, 0);
        let mut mask = TouchMask::new([3, 3, 3]);
        fill_triangles(&mut mask, &polygon.triangles, polygon.fixed_axis);
        // Right triangle with legs of 2 covers 6 lattice points
        assert_eq!(mask.touched_count(), 6);
        assert!(mask.is_touched(IVec3::new(1, 1, 1)));
        assert!(!mask.is_touched(IVec3::new(1, 2, 2)));
    }

    #[test]
    fn test_too_few_points() {
        let points = on_slice(0.0, &[(0.0, 0.0), (1.0, 1.0), (1.0, 1.0)]);
        assert_eq!(
            triangulate(&points, Some(2)),
            Err(TriangulationError::TooFewPoints(2))
        );
    }

    #[test]
    fn test_collinear_is_degenerate() {
        let points = on_slice(0.0, &[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        assert_eq!(
            triangulate(&points, Some(2)),
            Err(TriangulationError::Degenerate)
        );
        assert_eq!(triangulate(&points, None), Err(TriangulationError::Degenerate));
    }

    #[test]
    fn test_bowtie_is_not_simple() {
        let bowtie = on_slice(0.0, &[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)]);
        assert_eq!(
            triangulate(&bowtie, Some(2)),
            Err(TriangulationError::NotSimple)
        );
    }

    #[test]
    fn test_triangle_outside_grid_skipped() {
        let triangle = [DVec3::new(0.0, 0.0, 7.0), DVec3::new(2.0, 0.0, 7.0), DVec3::new(0.0, 2.0, 7.0)];
        let mut mask = TouchMask::new([4, 4, 4]);
        assert_eq!(fill_triangles(&mut mask, &[triangle], 2), 0);
    }
}
