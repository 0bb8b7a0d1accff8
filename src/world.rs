//! In-process physics service backing scene objects.
//!
//! Integrates gravity and commanded central forces for every inserted body.
//! Contact generation and solving are left to a full engine.

use std::{cell::RefCell, rc::Rc};

use glam::{Mat3, Vec3};

use crate::{
    config::{
        DEFAULT_GRAVITY, DEFAULT_SUBSTEPS, DEFAULT_TIME_STEP, SLEEP_FRAMES,
        SLEEP_LINEAR_THRESHOLD,
    },
    core::{ActivationPolicy, MassProperties, ObjectId, RigidBody, Transform, Velocity},
    dynamics::integrator::Integrator,
    simulation::{BodyDesc, Simulation},
    utils::{
        allocator::{Arena, BodyId},
        logging::ScopedTimer,
    },
};

/// Central simulation container.
pub struct PhysicsWorld {
    bodies: Arena<RigidBody>,
    pub integrator: Integrator,
    pub gravity: Vec3,
    pub time_accumulated: f32,
    pub time_step: f32,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_STEP)
    }
}

impl PhysicsWorld {
    pub fn new(time_step: f32) -> Self {
        let ts = if time_step <= 0.0 {
            DEFAULT_TIME_STEP
        } else {
            time_step
        };

        Self {
            bodies: Arena::new(),
            integrator: Integrator::new(ts, DEFAULT_SUBSTEPS),
            gravity: Vec3::from_slice(&DEFAULT_GRAVITY),
            time_accumulated: 0.0,
            time_step: ts,
        }
    }

    /// Wraps the world for sharing with scene objects.
    pub fn into_shared(self) -> Rc<RefCell<PhysicsWorld>> {
        Rc::new(RefCell::new(self))
    }

    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn body(&self, id: BodyId) -> Option<&RigidBody> {
        self.bodies.get(id)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn bodies_in_world(&self) -> usize {
        self.bodies.iter().filter(|(_, body)| body.in_world).count()
    }

    /// Bodies carrying an object tag, for resolving hits back to owners.
    pub fn tagged_bodies(&self) -> impl Iterator<Item = (BodyId, ObjectId)> + '_ {
        self.bodies
            .iter()
            .filter_map(|(id, body)| body.user_tag.map(|tag| (id, tag)))
    }

    /// Advances the simulation using a fixed timestep accumulator.
    ///
    /// Forces commanded before this call act on every substep it runs and
    /// are cleared when it returns.
    pub fn step(&mut self, dt: f32) {
        let _timer = ScopedTimer::new("world::step");
        for _ in 0..self.accumulate(dt) {
            self.integrate();
        }
        self.clear_forces();
    }

    /// Banks `dt` and returns how many fixed steps are now due.
    pub fn accumulate(&mut self, dt: f32) -> u32 {
        self.time_accumulated += dt;
        let mut due = 0;
        while self.time_accumulated >= self.time_step {
            self.time_accumulated -= self.time_step;
            due += 1;
        }
        due
    }

    /// Runs exactly one fixed step of `time_step` and clears commanded forces.
    pub fn step_fixed(&mut self) {
        let _timer = ScopedTimer::new("world::step_fixed");
        self.integrate();
        self.clear_forces();
    }

    fn integrate(&mut self) {
        self.integrator.step(&mut self.bodies, self.gravity);
        self.update_sleeping();
    }

    fn clear_forces(&mut self) {
        for body in self.bodies.iter_mut() {
            body.force = Vec3::ZERO;
        }
    }

    fn update_sleeping(&mut self) {
        for body in self.bodies.iter_mut() {
            if body.activation == ActivationPolicy::AlwaysActive
                || body.is_static()
                || !body.in_world
                || !body.is_awake
            {
                continue;
            }
            let idle = body.velocity.linear.length() < SLEEP_LINEAR_THRESHOLD
                && body.velocity.angular.length() < SLEEP_LINEAR_THRESHOLD;
            if !idle {
                body.idle_frames = 0;
                continue;
            }
            body.idle_frames += 1;
            if body.idle_frames >= SLEEP_FRAMES {
                body.is_awake = false;
                body.velocity = Velocity::default();
            }
        }
    }

    fn expect_body(&mut self, id: BodyId) -> &mut RigidBody {
        match self.bodies.get_mut(id) {
            Some(body) => body,
            None => panic!("unknown or destroyed body {id:?}"),
        }
    }
}

impl Simulation for PhysicsWorld {
    fn create_body(&mut self, desc: BodyDesc) -> BodyId {
        let props = MassProperties::new(desc.mass, desc.inertia);
        self.bodies
            .insert(RigidBody::new(desc.shape, desc.transform, props))
    }

    fn destroy_body(&mut self, id: BodyId) {
        let in_world = self.expect_body(id).in_world;
        assert!(!in_world, "body {id:?} destroyed while still in the world");
        self.bodies.remove(id);
    }

    fn insert_into_world(&mut self, id: BodyId) {
        let body = self.expect_body(id);
        body.in_world = true;
        body.wake();
    }

    fn remove_from_world(&mut self, id: BodyId) {
        self.expect_body(id).in_world = false;
    }

    fn is_in_world(&self, id: BodyId) -> bool {
        self.bodies.get(id).is_some_and(|body| body.in_world)
    }

    fn transform(&self, id: BodyId) -> Option<Transform> {
        self.bodies.get(id).map(|body| body.transform)
    }

    fn velocity(&self, id: BodyId) -> Option<Velocity> {
        self.bodies.get(id).map(|body| body.velocity)
    }

    fn set_velocity(&mut self, id: BodyId, velocity: Velocity) {
        let body = self.expect_body(id);
        body.velocity = velocity;
        body.wake();
    }

    fn apply_central_force(&mut self, id: BodyId, force: Vec3) {
        self.expect_body(id).apply_central_force(force);
    }

    fn set_friction(&mut self, id: BodyId, friction: f32) {
        self.expect_body(id).friction = friction;
    }

    fn set_activation_policy(&mut self, id: BodyId, policy: ActivationPolicy) {
        let body = self.expect_body(id);
        body.activation = policy;
        if policy == ActivationPolicy::AlwaysActive {
            body.wake();
        }
    }

    fn set_mass_properties(&mut self, id: BodyId, mass: f32, inertia: Mat3) {
        self.expect_body(id)
            .set_mass_properties(MassProperties::new(mass, inertia));
    }

    fn set_user_tag(&mut self, id: BodyId, tag: Option<ObjectId>) {
        self.expect_body(id).user_tag = tag;
    }

    fn user_tag(&self, id: BodyId) -> Option<ObjectId> {
        self.bodies.get(id).and_then(|body| body.user_tag)
    }
}
