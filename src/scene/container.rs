use std::rc::Rc;

use glam::Vec4;

use super::object::PhysicsObject;
use crate::{
    config::SceneConfig,
    core::{ObjectId, ShapeKind, Transform},
    render::{Mesh, RenderTarget, UniformLocations},
    simulation::SharedSimulation,
    utils::{allocator::BodyId, logging::ScopedTimer},
};

/// Ordered collection of exclusively owned [`PhysicsObject`]s.
///
/// Indices are positions in insertion order and shift down when an earlier
/// object is deleted.
pub struct Scene {
    sim: SharedSimulation,
    config: SceneConfig,
    objects: Vec<PhysicsObject>,
}

impl Scene {
    pub fn new(sim: SharedSimulation) -> Self {
        Self::with_config(sim, SceneConfig::default())
    }

    pub fn with_config(sim: SharedSimulation, config: SceneConfig) -> Self {
        Self {
            sim,
            config,
            objects: Vec::new(),
        }
    }

    pub fn simulation(&self) -> &SharedSimulation {
        &self.sim
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn add_box(&mut self, transform: Transform, color: Vec4, mass: f32) -> usize {
        self.add_primitive(ShapeKind::Box, Mesh::cube_with_normals(), transform, color, mass)
    }

    pub fn add_cylinder(&mut self, transform: Transform, color: Vec4, mass: f32) -> usize {
        self.add_primitive(
            ShapeKind::Cylinder,
            Mesh::cylinder_with_normals(),
            transform,
            color,
            mass,
        )
    }

    fn add_primitive(
        &mut self,
        kind: ShapeKind,
        mesh: Mesh,
        transform: Transform,
        color: Vec4,
        mass: f32,
    ) -> usize {
        let object = PhysicsObject::builder(kind)
            .mesh(mesh)
            .transform(transform)
            .color(color)
            .mass(mass)
            .config(self.config)
            .build(&self.sim);
        self.push(object)
    }

    /// Appends an object built against this scene's simulation.
    pub fn push(&mut self, object: PhysicsObject) -> usize {
        debug_assert!(
            Rc::ptr_eq(object.body().simulation(), &self.sim),
            "object belongs to a different simulation"
        );
        self.objects.push(object);
        self.objects.len() - 1
    }

    /// Destroys the object at `index`; later indices shift down by one.
    ///
    /// Panics when `index` is out of range.
    pub fn delete(&mut self, index: usize) {
        assert!(
            index < self.objects.len(),
            "scene index {index} out of range (len={})",
            self.objects.len()
        );
        let object = self.objects.remove(index);
        log::trace!("deleted object {:?} at {index}", object.id());
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PhysicsObject> {
        self.objects.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut PhysicsObject> {
        self.objects.get_mut(index)
    }

    pub fn objects(&self) -> &[PhysicsObject] {
        &self.objects
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PhysicsObject> {
        self.objects.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, PhysicsObject> {
        self.objects.iter_mut()
    }

    /// Resolves a simulation body back to the index of its owning object.
    pub fn find_by_handle(&self, body: BodyId) -> Option<usize> {
        self.objects
            .iter()
            .position(|object| object.body_id() == body)
    }

    pub fn find_by_object(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|object| object.id() == id)
    }

    /// Issues this frame's force commands. Step the simulation afterwards.
    pub fn update(&mut self, dt: f32) {
        let _timer = ScopedTimer::new("scene::update");
        for object in &mut self.objects {
            object.update(dt);
        }
    }

    /// Draws objects in insertion order.
    pub fn render(&self, target: &mut dyn RenderTarget, uniforms: &UniformLocations) {
        for object in &self.objects {
            target.set_matrix(uniforms.model_matrix, &object.model_matrix());
            target.set_color(uniforms.color, object.color());
            object.render(target);
        }
    }

    /// Deep copy: every object gets its own freshly created body.
    pub fn duplicate(&self) -> Scene {
        Scene {
            sim: Rc::clone(&self.sim),
            config: self.config,
            objects: self.objects.iter().map(PhysicsObject::duplicate).collect(),
        }
    }

    /// Moves the objects into a new scene and leaves this one empty.
    pub fn take(&mut self) -> Scene {
        Scene {
            sim: Rc::clone(&self.sim),
            config: self.config,
            objects: std::mem::take(&mut self.objects),
        }
    }
}

impl<'a> IntoIterator for &'a Scene {
    type Item = &'a PhysicsObject;
    type IntoIter = std::slice::Iter<'a, PhysicsObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("config", &self.config)
            .field("objects", &self.objects)
            .finish()
    }
}
