//! Catmull-Rom tangents and cubic Hermite evaluation over waypoint lists.

use crate::utils::math::hermite_basis;
use glam::Vec3;

/// Finite-difference Catmull-Rom tangents, one per point.
///
/// Interior tangents are `p[i+1] - p[i-1]`; the endpoints copy their single
/// interior neighbour. Two points share the chord as tangent. A lone point
/// gets a zero tangent.
pub fn build_tangents(points: &[Vec3]) -> Vec<Vec3> {
    match points.len() {
        0 => Vec::new(),
        1 => vec![Vec3::ZERO],
        2 => {
            let chord = points[1] - points[0];
            vec![chord, chord]
        }
        n => {
            let mut tangents = vec![Vec3::ZERO; n];
            for i in 1..n - 1 {
                tangents[i] = points[i + 1] - points[i - 1];
            }
            tangents[0] = tangents[1];
            tangents[n - 1] = tangents[n - 2];
            tangents
        }
    }
}

/// Parametric span of a path: one unit per segment.
pub fn span(point_count: usize) -> f32 {
    point_count.saturating_sub(1) as f32
}

/// Evaluates the Hermite curve at `cursor`, clamped to `[0, span]`.
///
/// Returns `None` for an empty path.
pub fn evaluate(points: &[Vec3], tangents: &[Vec3], cursor: f32) -> Option<Vec3> {
    debug_assert_eq!(points.len(), tangents.len());
    match points.len() {
        0 => None,
        1 => Some(points[0]),
        n => {
            let cursor = cursor.clamp(0.0, span(n));
            let segment = (cursor.floor() as usize).min(n - 2);
            let t = cursor - segment as f32;
            let (h00, h10, h01, h11) = hermite_basis(t);
            Some(
                points[segment] * h00
                    + tangents[segment] * h10
                    + points[segment + 1] * h01
                    + tangents[segment + 1] * h11,
            )
        }
    }
}
