use glam::{Mat3, Mat4, Quat, Vec3, Vec4};

use crate::{
    config::SceneConfig,
    core::{ActivationPolicy, ColliderShape, ObjectId, ShapeKind, Transform, Velocity},
    dynamics::TrajectoryController,
    path::MotionPath,
    render::{Mesh, Primitive, RenderTarget, TextureId},
    simulation::{BodyDesc, BodyHandle, SharedSimulation},
    utils::{allocator::BodyId, math::unit_rotation},
};

/// A rendered rigid body, optionally driven along a [`MotionPath`].
///
/// The authoritative transform lives in the simulation; every transform
/// accessor reads it back from the body. Exactly one body is live per
/// object, and it is destroyed when the object is dropped.
#[derive(Debug)]
pub struct PhysicsObject {
    id: ObjectId,
    mesh: Mesh,
    texture: Option<TextureId>,
    shape_kind: ShapeKind,
    mass: f32,
    color: Vec4,
    true_color: Vec4,
    drawable: bool,
    collidable: bool,
    friction: f32,
    hold_when_paused: bool,
    motion: Option<MotionPath>,
    last_force: Vec3,
    body: BodyHandle,
}

impl PhysicsObject {
    pub fn builder(shape_kind: ShapeKind) -> PhysicsObjectBuilder {
        PhysicsObjectBuilder::new(shape_kind)
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn body(&self) -> &BodyHandle {
        &self.body
    }

    pub fn body_id(&self) -> BodyId {
        self.body.id()
    }

    pub fn shape_kind(&self) -> ShapeKind {
        self.shape_kind
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn transform(&self) -> Transform {
        self.body.transform()
    }

    pub fn translation(&self) -> Vec3 {
        self.transform().position
    }

    pub fn orientation(&self) -> Quat {
        self.transform().rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.transform().scale
    }

    pub fn velocity(&self) -> Velocity {
        self.body.velocity()
    }

    pub fn model_matrix(&self) -> Mat4 {
        self.transform().to_matrix()
    }

    /// Current tint, possibly overridden by [`Self::highlight`].
    pub fn color(&self) -> Vec4 {
        self.color
    }

    pub fn true_color(&self) -> Vec4 {
        self.true_color
    }

    pub fn set_true_color(&mut self, color: Vec4) {
        self.color = color;
        self.true_color = color;
    }

    pub fn highlight(&mut self, color: Vec4) {
        self.color = color;
    }

    pub fn restore_color(&mut self) {
        self.color = self.true_color;
    }

    pub fn is_highlighted(&self) -> bool {
        self.color != self.true_color
    }

    pub fn is_drawable(&self) -> bool {
        self.drawable
    }

    pub fn set_drawable(&mut self, drawable: bool) {
        self.drawable = drawable;
    }

    pub fn is_collidable(&self) -> bool {
        self.collidable
    }

    /// Removes or reinserts the body; the body itself survives either way.
    pub fn set_collidable(&mut self, collidable: bool) {
        if collidable {
            self.body.insert_into_world();
        } else {
            self.body.remove_from_world();
        }
        self.collidable = collidable;
    }

    pub fn motion_path(&self) -> Option<&MotionPath> {
        self.motion.as_ref()
    }

    /// Edits that turn an empty path into a non-empty one (or back) keep the
    /// current mass properties; use [`Self::set_motion_path`] for that.
    pub fn motion_path_mut(&mut self) -> Option<&mut MotionPath> {
        self.motion.as_mut()
    }

    /// Attaches or detaches a path and re-applies mass properties: scripted
    /// bodies get zero rotational inertia.
    pub fn set_motion_path(&mut self, motion: Option<MotionPath>) {
        self.motion = motion;
        let shape = ColliderShape::from_kind(self.shape_kind, self.scale());
        let inertia = body_inertia(&shape, self.mass, self.is_path_driven());
        self.body.set_mass_properties(self.mass, inertia);
    }

    pub fn is_path_driven(&self) -> bool {
        self.motion.as_ref().is_some_and(|path| !path.is_empty())
    }

    /// Force commanded by the most recent [`Self::update`].
    pub fn last_force(&self) -> Vec3 {
        self.last_force
    }

    /// Swaps the collision shape, keeping transform, velocity, mass, the
    /// collidable flag and motion state.
    pub fn set_shape(&mut self, shape_kind: ShapeKind) {
        let transform = self.body.transform();
        let velocity = self.body.velocity();
        let previous = self.shape_kind;

        self.shape_kind = shape_kind;
        self.body = self.spawn_body(transform);
        self.body.set_velocity(velocity);

        if self.mesh.primitive() == Primitive::from(previous) {
            self.mesh = Mesh::for_shape(shape_kind);
        }
        log::debug!("object {:?} reshaped {previous} -> {shape_kind}", self.id);
    }

    /// Advances the motion path and commands the force that tracks it.
    pub fn update(&mut self, dt: f32) {
        let hold_when_paused = self.hold_when_paused;
        let Some(path) = self.motion.as_mut().filter(|path| !path.is_empty()) else {
            return;
        };

        if path.is_enabled() {
            path.step(dt);
        } else if !hold_when_paused {
            self.last_force = Vec3::ZERO;
            return;
        }

        let current = self.body.transform().position;
        let target = path.position().unwrap_or(current);
        let velocity = self.body.velocity().linear;
        let force =
            TrajectoryController::inverse_dynamics(current, target, velocity, self.mass, dt);

        self.body.apply_central_force(force);
        self.last_force = force;
    }

    pub fn render(&self, target: &mut dyn RenderTarget) {
        if self.drawable {
            target.draw(&self.mesh);
        }
    }

    /// Deep copy with a fresh body carrying identical kinematic state and a
    /// new identity.
    pub fn duplicate(&self) -> PhysicsObject {
        let id = ObjectId::next();
        let transform = self.body.transform();
        let copy = PhysicsObject {
            id,
            mesh: self.mesh.clone(),
            texture: self.texture,
            shape_kind: self.shape_kind,
            mass: self.mass,
            color: self.color,
            true_color: self.true_color,
            drawable: self.drawable,
            collidable: self.collidable,
            friction: self.friction,
            hold_when_paused: self.hold_when_paused,
            motion: self.motion.clone(),
            last_force: self.last_force,
            body: self.spawn_body_for(id, transform),
        };
        copy.body.set_velocity(self.body.velocity());
        copy
    }

    fn spawn_body(&self, transform: Transform) -> BodyHandle {
        self.spawn_body_for(self.id, transform)
    }

    fn spawn_body_for(&self, id: ObjectId, transform: Transform) -> BodyHandle {
        spawn_body(
            self.body.simulation(),
            BodySettings {
                id,
                shape_kind: self.shape_kind,
                transform,
                mass: self.mass,
                friction: self.friction,
                collidable: self.collidable,
                path_driven: self.is_path_driven(),
            },
        )
    }
}

struct BodySettings {
    id: ObjectId,
    shape_kind: ShapeKind,
    transform: Transform,
    mass: f32,
    friction: f32,
    collidable: bool,
    path_driven: bool,
}

fn body_inertia(shape: &ColliderShape, mass: f32, path_driven: bool) -> Mat3 {
    if path_driven {
        Mat3::ZERO
    } else {
        shape.local_inertia(mass)
    }
}

/// Shared construction path for new objects, reshapes and copies.
fn spawn_body(sim: &SharedSimulation, settings: BodySettings) -> BodyHandle {
    let shape = ColliderShape::from_kind(settings.shape_kind, settings.transform.scale);
    let transform = Transform {
        rotation: unit_rotation(settings.transform.rotation),
        ..settings.transform
    };
    let body = BodyHandle::create(
        sim,
        BodyDesc {
            shape,
            transform,
            mass: settings.mass,
            inertia: body_inertia(&shape, settings.mass, settings.path_driven),
        },
    );
    body.set_user_tag(Some(settings.id));
    body.set_friction(settings.friction);
    if settings.collidable {
        body.insert_into_world();
    }
    if settings.mass != 0.0 {
        body.set_activation_policy(ActivationPolicy::AlwaysActive);
    }
    body
}

/// Builder for [`PhysicsObject`].
pub struct PhysicsObjectBuilder {
    shape_kind: ShapeKind,
    mesh: Option<Mesh>,
    texture: Option<TextureId>,
    transform: Transform,
    color: Vec4,
    mass: f32,
    collidable: bool,
    drawable: bool,
    motion: Option<MotionPath>,
    config: SceneConfig,
}

impl PhysicsObjectBuilder {
    pub fn new(shape_kind: ShapeKind) -> Self {
        Self {
            shape_kind,
            mesh: None,
            texture: None,
            transform: Transform::default(),
            color: Vec4::ONE,
            mass: 0.0,
            collidable: true,
            drawable: true,
            motion: None,
            config: SceneConfig::default(),
        }
    }

    /// Defaults to a fresh primitive matching the shape kind.
    pub fn mesh(mut self, mesh: Mesh) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn texture(mut self, texture: TextureId) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn orientation(mut self, rotation: Quat) -> Self {
        self.transform.rotation = rotation;
        self
    }

    pub fn dimensions(mut self, scale: Vec3) -> Self {
        self.transform.scale = scale;
        self
    }

    pub fn color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }

    pub fn mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn collidable(mut self, collidable: bool) -> Self {
        self.collidable = collidable;
        self
    }

    pub fn drawable(mut self, drawable: bool) -> Self {
        self.drawable = drawable;
        self
    }

    pub fn motion_path(mut self, motion: MotionPath) -> Self {
        self.motion = Some(motion);
        self
    }

    pub fn config(mut self, config: SceneConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self, sim: &SharedSimulation) -> PhysicsObject {
        let id = ObjectId::next();
        let path_driven = self.motion.as_ref().is_some_and(|path| !path.is_empty());
        let body = spawn_body(
            sim,
            BodySettings {
                id,
                shape_kind: self.shape_kind,
                transform: self.transform,
                mass: self.mass,
                friction: self.config.friction,
                collidable: self.collidable,
                path_driven,
            },
        );

        PhysicsObject {
            id,
            mesh: self
                .mesh
                .unwrap_or_else(|| Mesh::for_shape(self.shape_kind)),
            texture: self.texture,
            shape_kind: self.shape_kind,
            mass: self.mass,
            color: self.color,
            true_color: self.color,
            drawable: self.drawable,
            collidable: self.collidable,
            friction: self.config.friction,
            hold_when_paused: self.config.hold_paused_paths,
            motion: self.motion,
            last_force: Vec3::ZERO,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{render::MeshId, simulation::Simulation, world::PhysicsWorld};
    use std::{cell::RefCell, rc::Rc};

    fn shared_world() -> (Rc<RefCell<PhysicsWorld>>, SharedSimulation) {
        let world = PhysicsWorld::new(1.0 / 60.0).into_shared();
        let sim: SharedSimulation = world.clone();
        (world, sim)
    }

    fn straight_path() -> MotionPath {
        MotionPath::new(vec![Vec3::ZERO, Vec3::X, Vec3::new(2.0, 0.0, 0.0)], 1.0)
    }

    #[derive(Default)]
    struct DrawLog(Vec<MeshId>);

    impl RenderTarget for DrawLog {
        fn set_matrix(&mut self, _: crate::render::UniformLocation, _: &Mat4) {}

        fn set_color(&mut self, _: crate::render::UniformLocation, _: Vec4) {}

        fn draw(&mut self, mesh: &Mesh) {
            self.0.push(mesh.id());
        }
    }

    #[test]
    fn construction_registers_tagged_body() {
        let (world, sim) = shared_world();
        let object = PhysicsObject::builder(ShapeKind::Box)
            .position(Vec3::new(1.0, 2.0, 3.0))
            .mass(2.0)
            .texture(TextureId(3))
            .build(&sim);
        assert_eq!(object.texture(), Some(TextureId(3)));

        let world = world.borrow();
        let body = world.body(object.body_id()).unwrap();
        assert!(body.in_world);
        assert_eq!(body.user_tag, Some(object.id()));
        assert_eq!(body.activation, ActivationPolicy::AlwaysActive);
        assert!((body.friction - crate::config::DEFAULT_FRICTION).abs() < 1e-6);
        assert_ne!(body.inverse_inertia, Mat3::ZERO);
        assert_eq!(object.translation(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn static_objects_may_sleep() {
        let (world, sim) = shared_world();
        let object = PhysicsObject::builder(ShapeKind::Cylinder).build(&sim);
        let world = world.borrow();
        let body = world.body(object.body_id()).unwrap();
        assert_eq!(body.activation, ActivationPolicy::AllowSleep);
        assert_eq!(body.inverse_mass, 0.0);
    }

    #[test]
    fn path_driven_objects_cannot_tumble() {
        let (world, sim) = shared_world();
        let mut object = PhysicsObject::builder(ShapeKind::Box)
            .mass(1.0)
            .motion_path(straight_path())
            .build(&sim);
        assert!(object.is_path_driven());
        assert_eq!(
            world.borrow().body(object.body_id()).unwrap().inverse_inertia,
            Mat3::ZERO
        );

        object.set_motion_path(None);
        assert_ne!(
            world.borrow().body(object.body_id()).unwrap().inverse_inertia,
            Mat3::ZERO
        );
    }

    #[test]
    fn dropping_object_destroys_its_body() {
        let (world, sim) = shared_world();
        let object = PhysicsObject::builder(ShapeKind::Box).mass(1.0).build(&sim);
        let id = object.body_id();
        drop(object);

        let world = world.borrow();
        assert!(world.body(id).is_none());
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn collidable_toggle_keeps_body_alive() {
        let (world, sim) = shared_world();
        let mut object = PhysicsObject::builder(ShapeKind::Box).mass(1.0).build(&sim);

        object.set_collidable(false);
        assert!(!object.body().is_in_world());
        assert_eq!(world.borrow().body_count(), 1);

        object.set_collidable(false);
        object.set_collidable(true);
        assert!(object.body().is_in_world());
        assert!(object.is_collidable());
    }

    #[test]
    fn reshaping_preserves_kinematic_state() {
        let (world, sim) = shared_world();
        let rotation = Quat::from_rotation_y(0.7);
        let mut object = PhysicsObject::builder(ShapeKind::Box)
            .transform(Transform::new(Vec3::new(4.0, 5.0, 6.0), rotation, Vec3::splat(2.0)))
            .mass(3.0)
            .motion_path(straight_path())
            .build(&sim);
        object.update(0.5);
        object.body().set_velocity(Velocity {
            linear: Vec3::new(1.0, 0.0, -1.0),
            angular: Vec3::ZERO,
        });
        let old_body = object.body_id();
        let before = object.transform();

        object.set_shape(ShapeKind::Cylinder);

        assert_eq!(object.shape_kind(), ShapeKind::Cylinder);
        assert_eq!(object.mesh().primitive(), Primitive::Cylinder);
        assert_eq!(object.transform(), before);
        assert_eq!(object.velocity().linear, Vec3::new(1.0, 0.0, -1.0));
        assert_eq!(object.mass(), 3.0);
        assert!((object.motion_path().unwrap().cursor() - 0.5).abs() < 1e-6);

        let world = world.borrow();
        assert_eq!(world.body_count(), 1);
        assert!(world.body(old_body).is_none());
        let body = world.body(object.body_id()).unwrap();
        assert!(matches!(body.shape, ColliderShape::Cylinder { .. }));
        assert_eq!(body.inverse_inertia, Mat3::ZERO);
        assert_eq!(body.user_tag, Some(object.id()));
    }

    #[test]
    fn highlight_is_restored_from_true_color() {
        let (_world, sim) = shared_world();
        let base = Vec4::new(0.2, 0.4, 0.6, 1.0);
        let mut object = PhysicsObject::builder(ShapeKind::Box).color(base).build(&sim);

        object.highlight(Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert!(object.is_highlighted());
        assert_eq!(object.true_color(), base);

        object.restore_color();
        assert_eq!(object.color(), base);
    }

    #[test]
    fn update_without_path_commands_nothing() {
        let (world, sim) = shared_world();
        let mut object = PhysicsObject::builder(ShapeKind::Box).mass(1.0).build(&sim);
        object.update(1.0 / 60.0);
        assert_eq!(object.last_force(), Vec3::ZERO);
        assert_eq!(world.borrow().body(object.body_id()).unwrap().force, Vec3::ZERO);
    }

    #[test]
    fn update_steers_towards_next_waypoint() {
        let (world, sim) = shared_world();
        let mut object = PhysicsObject::builder(ShapeKind::Box)
            .mass(1.0)
            .motion_path(straight_path())
            .build(&sim);

        object.update(1.0);

        assert!((object.motion_path().unwrap().cursor() - 1.0).abs() < 1e-6);
        let force = object.last_force();
        assert!((force - Vec3::X).length() < 1e-5, "force = {force:?}");
        assert_eq!(world.borrow().body(object.body_id()).unwrap().force, force);
    }

    #[test]
    fn paused_path_holds_frozen_target_by_default() {
        let (_world, sim) = shared_world();
        let mut object = PhysicsObject::builder(ShapeKind::Box)
            .mass(1.0)
            .motion_path(straight_path())
            .build(&sim);
        object.motion_path_mut().unwrap().set_enabled(false);

        object.update(0.5);

        assert_eq!(object.motion_path().unwrap().cursor(), 0.0);
        assert_eq!(object.last_force(), Vec3::ZERO);

        object.body().set_velocity(Velocity {
            linear: Vec3::X,
            angular: Vec3::ZERO,
        });
        object.update(0.5);
        assert!((object.last_force() - Vec3::new(-2.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn paused_path_releases_when_configured() {
        let (_world, sim) = shared_world();
        let config = SceneConfig {
            hold_paused_paths: false,
            ..SceneConfig::default()
        };
        let mut object = PhysicsObject::builder(ShapeKind::Box)
            .mass(1.0)
            .motion_path(straight_path())
            .config(config)
            .build(&sim);
        object.body().set_velocity(Velocity {
            linear: Vec3::X,
            angular: Vec3::ZERO,
        });
        object.motion_path_mut().unwrap().set_enabled(false);

        object.update(0.5);

        assert_eq!(object.last_force(), Vec3::ZERO);
    }

    #[test]
    fn hidden_objects_skip_draw() {
        let (_world, sim) = shared_world();
        let mut object = PhysicsObject::builder(ShapeKind::Box).build(&sim);
        let mut log = DrawLog::default();

        object.render(&mut log);
        object.set_drawable(false);
        object.render(&mut log);

        assert_eq!(log.0, vec![object.mesh().id()]);
    }

    #[test]
    fn duplicate_gets_its_own_body_and_identity() {
        let (world, sim) = shared_world();
        let mut original = PhysicsObject::builder(ShapeKind::Cylinder)
            .position(Vec3::Y)
            .mass(2.0)
            .motion_path(straight_path())
            .build(&sim);
        original.update(0.25);

        let copy = original.duplicate();
        assert_ne!(copy.id(), original.id());
        assert_ne!(copy.body_id(), original.body_id());
        assert_eq!(copy.transform(), original.transform());
        assert_eq!(copy.motion_path(), original.motion_path());
        assert_eq!(world.borrow().user_tag(copy.body_id()), Some(copy.id()));

        drop(original);
        assert_eq!(world.borrow().body_count(), 1);
        assert_eq!(copy.translation(), Vec3::Y);
    }
}
