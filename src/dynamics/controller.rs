//! Position-tracking control law for path-driven bodies.

use glam::Vec3;

/// Stateless inverse-dynamics controller.
///
/// Computes the central force that, held for one timestep under explicit
/// Euler integration, carries a body from its current position to the target
/// while cancelling its residual velocity. There is no integral term and no
/// history; the output is a one-shot force sample.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrajectoryController;

impl TrajectoryController {
    /// Zero force for a non-positive or non-finite `dt`. Magnitude is not
    /// clamped; hosts with force limits clamp the result themselves.
    pub fn inverse_dynamics(
        current_pos: Vec3,
        target_pos: Vec3,
        current_velocity: Vec3,
        mass: f32,
        dt: f32,
    ) -> Vec3 {
        if dt <= 0.0 || !dt.is_finite() {
            return Vec3::ZERO;
        }
        let desired_velocity = (target_pos - current_pos) / dt;
        mass * (desired_velocity - current_velocity) / dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_rest_on_target_needs_no_force() {
        let p = Vec3::new(1.0, -2.0, 3.0);
        for dt in [1e-3, 1.0 / 60.0, 0.5, 4.0] {
            assert_eq!(
                TrajectoryController::inverse_dynamics(p, p, Vec3::ZERO, 5.0, dt),
                Vec3::ZERO
            );
        }
    }

    #[test]
    fn zero_timestep_is_guarded() {
        let force = TrajectoryController::inverse_dynamics(
            Vec3::ZERO,
            Vec3::splat(10.0),
            Vec3::X,
            3.0,
            0.0,
        );
        assert_eq!(force, Vec3::ZERO);
    }

    #[test]
    fn residual_velocity_is_cancelled() {
        let force =
            TrajectoryController::inverse_dynamics(Vec3::ZERO, Vec3::ZERO, Vec3::X, 2.0, 0.5);
        assert!((force - Vec3::new(-4.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn force_scales_with_mass() {
        let light =
            TrajectoryController::inverse_dynamics(Vec3::ZERO, Vec3::Y, Vec3::ZERO, 1.0, 0.1);
        let heavy =
            TrajectoryController::inverse_dynamics(Vec3::ZERO, Vec3::Y, Vec3::ZERO, 4.0, 0.1);
        assert!((heavy - light * 4.0).length() < 1e-3);
    }
}
