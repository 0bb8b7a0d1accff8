//! Additional math helpers layered on top of `glam`.

use glam::{Quat, Vec3, Vec4};

/// Converts angular velocity vector (radians/sec) into a quaternion delta.
pub fn angular_velocity_to_quat(angular: Vec3, dt: f32) -> Quat {
    let angle = angular.length() * dt;
    if angle.abs() < 1e-6 {
        return Quat::IDENTITY;
    }
    let axis = angular.normalize();
    Quat::from_axis_angle(axis, angle)
}

/// Returns `rotation` untouched when already unit length, otherwise its
/// normalized form. Degenerate input maps to identity.
pub fn unit_rotation(rotation: Quat) -> Quat {
    if rotation.is_normalized() {
        return rotation;
    }
    Quat::from_vec4(Vec4::from(rotation).normalize_or(Vec4::W))
}

/// Cubic Hermite basis weights `(h00, h10, h01, h11)` at `t` in `[0, 1]`.
pub fn hermite_basis(t: f32) -> (f32, f32, f32, f32) {
    let t2 = t * t;
    let t3 = t2 * t;
    (
        2.0 * t3 - 3.0 * t2 + 1.0,
        t3 - 2.0 * t2 + t,
        -2.0 * t3 + 3.0 * t2,
        t3 - t2,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hermite_basis_interpolates_endpoints() {
        assert_eq!(hermite_basis(0.0), (1.0, 0.0, 0.0, 0.0));
        assert_eq!(hermite_basis(1.0), (0.0, 0.0, 1.0, 0.0));
    }

    #[test]
    fn unit_rotation_normalizes_only_when_needed() {
        let unit = Quat::from_rotation_y(0.7);
        assert_eq!(unit_rotation(unit), unit);
        assert_eq!(
            unit_rotation(Quat::from_xyzw(0.0, 0.0, 2.0, 0.0)),
            Quat::from_xyzw(0.0, 0.0, 1.0, 0.0)
        );
        assert_eq!(unit_rotation(Quat::from_xyzw(0.0, 0.0, 0.0, 0.0)), Quat::IDENTITY);
    }

    #[test]
    fn zero_angular_velocity_is_identity() {
        assert_eq!(angular_velocity_to_quat(Vec3::ZERO, 0.1), Quat::IDENTITY);
    }
}
