//! World-space point helpers.

use crate::error::IpcError;

/// A point in world (physical) coordinates
pub type WorldPoint = [f64; 3];

/// Split a flat `[x0, y0, z0, x1, ...]` list into points
///
/// Interaction layers often hand polygons over as flat float arrays.
pub fn points_from_flat(flat: &[f64]) -> Result<Vec<WorldPoint>, IpcError> {
    if flat.len() % 3 != 0 {
        return Err(IpcError::RaggedCoordinates(flat.len()));
    }
    Ok(flat.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_from_flat() {
        let points = points_from_flat(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(points, vec![[0.0, 1.0, 2.0], [3.0, 4.0, 5.0]]);
    }

    #[test]
    fn test_points_from_flat_ragged() {
        let err = points_from_flat(&[0.0, 1.0]).unwrap_err();
        assert!(matches!(err, IpcError::RaggedCoordinates(2)));
    }
}
