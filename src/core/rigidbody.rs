use super::{
    collider::ColliderShape,
    types::{MassProperties, ObjectId, Transform, Velocity},
};
use crate::config::{DEFAULT_ANGULAR_DAMPING, DEFAULT_LINEAR_DAMPING};
use glam::{Mat3, Vec3};

/// Whether the simulation may put an idle body to sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivationPolicy {
    #[default]
    AllowSleep,
    /// Never deactivate; used for driven bodies.
    AlwaysActive,
}

/// Simulation-side body record: kinematic state and properties.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub shape: ColliderShape,
    pub transform: Transform,
    pub velocity: Velocity,
    /// Central force accumulated since the last world step.
    pub force: Vec3,
    pub mass_properties: MassProperties,
    pub friction: f32,
    pub gravity_scale: f32,
    pub linear_velocity_damping: f32,
    pub angular_velocity_damping: f32,
    pub inverse_mass: f32,
    pub inverse_inertia: Mat3,
    pub activation: ActivationPolicy,
    pub is_awake: bool,
    pub idle_frames: u32,
    pub in_world: bool,
    /// Non-owning back reference to the scene object using this body.
    pub user_tag: Option<ObjectId>,
}

impl RigidBody {
    pub fn new(shape: ColliderShape, transform: Transform, mass_properties: MassProperties) -> Self {
        let mut body = Self {
            shape,
            transform,
            velocity: Velocity::default(),
            force: Vec3::ZERO,
            mass_properties,
            friction: 0.0,
            gravity_scale: 1.0,
            linear_velocity_damping: DEFAULT_LINEAR_DAMPING,
            angular_velocity_damping: DEFAULT_ANGULAR_DAMPING,
            inverse_mass: 0.0,
            inverse_inertia: Mat3::ZERO,
            activation: ActivationPolicy::default(),
            is_awake: true,
            idle_frames: 0,
            in_world: false,
            user_tag: None,
        };
        body.recompute_inverses();
        body
    }

    pub fn is_static(&self) -> bool {
        self.mass_properties.is_static()
    }

    pub fn apply_central_force(&mut self, force: Vec3) {
        if self.is_static() {
            return;
        }
        self.force += force;
        self.wake();
    }

    pub fn wake(&mut self) {
        self.is_awake = true;
        self.idle_frames = 0;
    }

    pub fn set_mass_properties(&mut self, props: MassProperties) {
        self.mass_properties = props;
        self.recompute_inverses();
    }

    /// Singular inertia means the body cannot rotate at all.
    fn recompute_inverses(&mut self) {
        self.inverse_mass = if self.is_static() {
            0.0
        } else {
            1.0 / self.mass_properties.mass
        };
        let inertia = self.mass_properties.inertia;
        self.inverse_inertia = if inertia.determinant().abs() < f32::EPSILON {
            Mat3::ZERO
        } else {
            inertia.inverse()
        };
    }
}
