//! Scene Rig – scripted rigid bodies on top of a physics world.
//!
//! Scene objects bind a mesh, a collision shape and a simulation body.
//! Objects with a motion path are steered along a Catmull-Rom/Hermite
//! curve by an inverse-dynamics controller, and whole scenes round-trip
//! through a JSON scene file.

pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod path;
pub mod render;
pub mod scene;
pub mod simulation;
pub mod utils;
pub mod world;

use std::{cell::RefCell, path::Path, rc::Rc};

pub use glam::{Mat4, Quat, Vec3, Vec4};

pub use config::SceneConfig;
pub use crate::core::{
    ActivationPolicy, ColliderShape, MassProperties, ObjectId, RigidBody, ShapeKind, Transform,
    Velocity,
};
pub use dynamics::{Integrator, TrajectoryController};
pub use error::{Result, SceneError};
pub use path::{build_tangents, MotionPath};
pub use render::{Mesh, MeshId, Primitive, RenderTarget, TextureId, UniformLocation, UniformLocations};
pub use scene::{ObjectRecord, PathRecord, PhysicsObject, PhysicsObjectBuilder, Scene, SceneRecord};
pub use simulation::{BodyDesc, BodyHandle, SharedSimulation, Simulation};
pub use utils::allocator::{Arena, BodyId};
pub use world::PhysicsWorld;

/// High-level convenience wrapper that owns a [`PhysicsWorld`] and the
/// [`Scene`] living in it.
pub struct SceneRig {
    world: Rc<RefCell<PhysicsWorld>>,
    scene: Scene,
}

impl SceneRig {
    /// Creates an empty rig with the provided fixed timestep.
    pub fn new(timestep: f32) -> Self {
        Self::with_config(timestep, SceneConfig::default())
    }

    pub fn with_config(timestep: f32, config: SceneConfig) -> Self {
        let world = PhysicsWorld::new(timestep).into_shared();
        let sim: SharedSimulation = world.clone();
        Self {
            world,
            scene: Scene::with_config(sim, config),
        }
    }

    /// Replaces the current scene with the one stored at `path`.
    ///
    /// On failure the current scene is kept and the error is returned.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let sim: SharedSimulation = self.world.clone();
        let scene = Scene::load_with_config(sim, *self.scene.config(), path)?;
        self.scene = scene;
        Ok(())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.scene.save(path)
    }

    /// Runs one frame of `dt` seconds.
    ///
    /// Path forces are commanded once per fixed world step, for exactly the
    /// time that step integrates. Frames shorter than the step bank their
    /// time and neither advance paths nor command forces.
    pub fn frame(&mut self, dt: f32) {
        let (due, time_step) = {
            let mut world = self.world.borrow_mut();
            (world.accumulate(dt), world.time_step)
        };
        for _ in 0..due {
            self.scene.update(time_step);
            self.world.borrow_mut().step_fixed();
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn world(&self) -> &Rc<RefCell<PhysicsWorld>> {
        &self.world
    }
}
