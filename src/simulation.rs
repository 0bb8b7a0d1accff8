//! The seam between scene objects and the physics service that simulates them.
//!
//! Objects never touch simulation internals; they hold a [`BodyHandle`] and
//! issue commands through the [`Simulation`] trait.

use std::{cell::RefCell, rc::Rc};

use glam::{Mat3, Vec3};

use crate::{
    core::{ActivationPolicy, ColliderShape, ObjectId, Transform, Velocity},
    utils::allocator::BodyId,
};

/// Everything the simulation needs to create a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub shape: ColliderShape,
    pub transform: Transform,
    pub mass: f32,
    pub inertia: Mat3,
}

/// Operations consumed from the physics service.
///
/// Mutating an unknown body and destroying a body that is still inserted in
/// the world are contract violations; implementations panic on them.
pub trait Simulation {
    fn create_body(&mut self, desc: BodyDesc) -> BodyId;

    fn destroy_body(&mut self, id: BodyId);

    fn insert_into_world(&mut self, id: BodyId);

    fn remove_from_world(&mut self, id: BodyId);

    fn is_in_world(&self, id: BodyId) -> bool;

    fn transform(&self, id: BodyId) -> Option<Transform>;

    fn velocity(&self, id: BodyId) -> Option<Velocity>;

    fn linear_velocity(&self, id: BodyId) -> Option<Vec3> {
        self.velocity(id).map(|velocity| velocity.linear)
    }

    fn angular_velocity(&self, id: BodyId) -> Option<Vec3> {
        self.velocity(id).map(|velocity| velocity.angular)
    }

    fn set_velocity(&mut self, id: BodyId, velocity: Velocity);

    fn apply_central_force(&mut self, id: BodyId, force: Vec3);

    fn set_friction(&mut self, id: BodyId, friction: f32);

    fn set_activation_policy(&mut self, id: BodyId, policy: ActivationPolicy);

    fn set_mass_properties(&mut self, id: BodyId, mass: f32, inertia: Mat3);

    /// Associates a body with the object using it. Never an ownership edge.
    fn set_user_tag(&mut self, id: BodyId, tag: Option<ObjectId>);

    fn user_tag(&self, id: BodyId) -> Option<ObjectId>;
}

/// The single-threaded shared sink every handle talks to.
pub type SharedSimulation = Rc<RefCell<dyn Simulation>>;

/// Exclusive owner of one simulation body.
///
/// Not `Clone`. Dropping the handle removes the body from the world and then
/// destroys it, so a body is destroyed exactly once. The simulation must not
/// be borrowed while a handle is dropped.
pub struct BodyHandle {
    id: BodyId,
    sim: SharedSimulation,
}

impl BodyHandle {
    pub fn create(sim: &SharedSimulation, desc: BodyDesc) -> Self {
        let id = sim.borrow_mut().create_body(desc);
        log::trace!("created body {id:?} ({:?})", desc.shape.kind());
        Self {
            id,
            sim: Rc::clone(sim),
        }
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn simulation(&self) -> &SharedSimulation {
        &self.sim
    }

    pub fn insert_into_world(&self) {
        let mut sim = self.sim.borrow_mut();
        if !sim.is_in_world(self.id) {
            sim.insert_into_world(self.id);
            log::trace!("inserted body {:?}", self.id);
        }
    }

    pub fn remove_from_world(&self) {
        let mut sim = self.sim.borrow_mut();
        if sim.is_in_world(self.id) {
            sim.remove_from_world(self.id);
            log::trace!("removed body {:?}", self.id);
        }
    }

    pub fn is_in_world(&self) -> bool {
        self.sim.borrow().is_in_world(self.id)
    }

    pub fn transform(&self) -> Transform {
        self.sim
            .borrow()
            .transform(self.id)
            .unwrap_or_else(|| lost_body(self.id))
    }

    pub fn velocity(&self) -> Velocity {
        self.sim
            .borrow()
            .velocity(self.id)
            .unwrap_or_else(|| lost_body(self.id))
    }

    pub fn set_velocity(&self, velocity: Velocity) {
        self.sim.borrow_mut().set_velocity(self.id, velocity);
    }

    pub fn apply_central_force(&self, force: Vec3) {
        self.sim.borrow_mut().apply_central_force(self.id, force);
    }

    pub fn set_friction(&self, friction: f32) {
        self.sim.borrow_mut().set_friction(self.id, friction);
    }

    pub fn set_activation_policy(&self, policy: ActivationPolicy) {
        self.sim.borrow_mut().set_activation_policy(self.id, policy);
    }

    pub fn set_mass_properties(&self, mass: f32, inertia: Mat3) {
        self.sim
            .borrow_mut()
            .set_mass_properties(self.id, mass, inertia);
    }

    pub fn set_user_tag(&self, tag: Option<ObjectId>) {
        self.sim.borrow_mut().set_user_tag(self.id, tag);
    }
}

impl Drop for BodyHandle {
    fn drop(&mut self) {
        let mut sim = self.sim.borrow_mut();
        if sim.is_in_world(self.id) {
            sim.remove_from_world(self.id);
        }
        sim.destroy_body(self.id);
        log::trace!("destroyed body {:?}", self.id);
    }
}

impl std::fmt::Debug for BodyHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BodyHandle").field("id", &self.id).finish()
    }
}

fn lost_body(id: BodyId) -> ! {
    panic!("simulation no longer knows body {id:?}; it was destroyed behind its owner")
}
