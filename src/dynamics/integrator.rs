use glam::Vec3;

use crate::{
    core::rigidbody::RigidBody,
    utils::{allocator::Arena, math::angular_velocity_to_quat},
};

/// Integrator responsible for stepping rigid bodies forward in time.
#[derive(Debug, Clone)]
pub struct Integrator {
    pub dt: f32,
    pub substeps: u32,
}

impl Integrator {
    pub fn new(dt: f32, substeps: u32) -> Self {
        let substep_dt = dt / substeps.max(1) as f32;
        Self {
            dt: substep_dt,
            substeps: substeps.max(1),
        }
    }

    fn is_simulated(body: &RigidBody) -> bool {
        body.in_world && body.is_awake && !body.is_static()
    }

    /// Semi-implicit Euler: the accumulated force is read, never cleared.
    pub fn integrate_velocity(&self, body: &mut RigidBody, gravity: Vec3, dt: f32) {
        if !Self::is_simulated(body) {
            return;
        }

        let acceleration = body.force * body.inverse_mass + gravity * body.gravity_scale;
        body.velocity.linear += acceleration * dt;

        body.velocity.linear *= (1.0 - body.linear_velocity_damping * dt).max(0.0);
        body.velocity.angular *= (1.0 - body.angular_velocity_damping * dt).max(0.0);
    }

    pub fn integrate_position(&self, body: &mut RigidBody, dt: f32) {
        if !Self::is_simulated(body) {
            return;
        }

        body.transform.position += body.velocity.linear * dt;

        if body.inverse_inertia != glam::Mat3::ZERO {
            let delta = angular_velocity_to_quat(body.velocity.angular, dt);
            body.transform.rotation = (delta * body.transform.rotation).normalize();
        }
    }

    pub fn step(&self, bodies: &mut Arena<RigidBody>, gravity: Vec3) {
        for _ in 0..self.substeps {
            for body in bodies.iter_mut() {
                self.integrate_velocity(body, gravity, self.dt);
                self.integrate_position(body, self.dt);
            }
        }
    }
}
