//! Persisted scene layout and its conversions.
//!
//! One record per object in scene order. Tangents and the path cursor are
//! never stored; loading rebuilds tangents and starts every path at its
//! first point.

use std::{ffi::OsString, fs, path::Path};

use glam::{Quat, Vec3, Vec4};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{container::Scene, object::PhysicsObject};
use crate::{
    config::SceneConfig,
    core::{ShapeKind, Transform},
    error::{Result, SceneError},
    path::MotionPath,
    render::Mesh,
    simulation::SharedSimulation,
};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneRecord {
    pub objects: Vec<ObjectRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    /// `"box"` or `"cylinder"`; anything else is skipped on load.
    #[serde(rename = "type")]
    pub kind: String,
    pub position: [f32; 3],
    /// Unit quaternion, `w` first.
    pub orientation: [f32; 4],
    pub dimensions: [f32; 3],
    pub color: [f32; 4],
    pub mass: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathRecord {
    pub speed: f32,
    pub points: Vec<[f32; 3]>,
    #[serde(default, rename = "loop", skip_serializing_if = "is_false")]
    pub looping: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Objects are kept untyped until their `type` is known, so records of
/// other kinds may carry any fields.
#[derive(Deserialize)]
struct RawSceneRecord {
    objects: Vec<Value>,
}

fn known_kind(index: usize, name: &str) -> Option<ShapeKind> {
    match name.parse::<ShapeKind>() {
        Ok(kind) => Some(kind),
        Err(reason) => {
            log::warn!("skipping scene record {index}: {reason}");
            None
        }
    }
}

impl ObjectRecord {
    pub fn from_object(object: &PhysicsObject) -> Self {
        let transform = object.transform();
        let q = transform.rotation;
        let path = object
            .motion_path()
            .filter(|path| !path.is_empty())
            .map(|path| PathRecord {
                speed: path.speed(),
                points: path.points().iter().map(|p| p.to_array()).collect(),
                looping: path.is_looping(),
            });

        Self {
            kind: object.shape_kind().as_str().to_owned(),
            position: transform.position.to_array(),
            orientation: [q.w, q.x, q.y, q.z],
            dimensions: transform.scale.to_array(),
            color: object.true_color().to_array(),
            mass: object.mass(),
            path,
        }
    }

    pub fn transform(&self) -> Transform {
        let [w, x, y, z] = self.orientation;
        Transform::new(
            Vec3::from_array(self.position),
            Quat::from_xyzw(x, y, z, w),
            Vec3::from_array(self.dimensions),
        )
    }

    pub fn motion_path(&self) -> Option<MotionPath> {
        self.path.as_ref().map(|record| {
            let points = record.points.iter().copied().map(Vec3::from_array).collect();
            MotionPath::new(points, record.speed).with_looping(record.looping)
        })
    }

    fn validate(&self, index: usize) -> Result<()> {
        let path_values = self
            .path
            .iter()
            .flat_map(|path| std::iter::once(path.speed).chain(path.points.iter().flatten().copied()));
        let all_finite = self
            .position
            .iter()
            .chain(&self.orientation)
            .chain(&self.dimensions)
            .chain(&self.color)
            .copied()
            .chain(std::iter::once(self.mass))
            .chain(path_values)
            .all(f32::is_finite);
        if !all_finite {
            return Err(SceneError::InvalidRecord {
                index,
                reason: "non-finite number".to_owned(),
            });
        }
        if self.orientation.iter().all(|c| *c == 0.0) {
            return Err(SceneError::InvalidRecord {
                index,
                reason: "zero-length orientation".to_owned(),
            });
        }
        Ok(())
    }
}

impl Scene {
    pub fn to_record(&self) -> SceneRecord {
        SceneRecord {
            objects: self.iter().map(ObjectRecord::from_object).collect(),
        }
    }

    /// Rebuilds a scene; records with an unknown `type` are skipped.
    pub fn from_record(
        sim: SharedSimulation,
        config: SceneConfig,
        record: &SceneRecord,
    ) -> Result<Scene> {
        let mut scene = Scene::with_config(sim, config);
        for (index, object) in record.objects.iter().enumerate() {
            if let Some(kind) = known_kind(index, &object.kind) {
                scene.push_record(index, kind, object)?;
            }
        }
        Ok(scene)
    }

    fn push_record(&mut self, index: usize, kind: ShapeKind, object: &ObjectRecord) -> Result<()> {
        object.validate(index)?;
        let mut builder = PhysicsObject::builder(kind)
            .mesh(Mesh::for_shape(kind))
            .transform(object.transform())
            .color(Vec4::from_array(object.color))
            .mass(object.mass)
            .config(*self.config());
        if let Some(path) = object.motion_path() {
            builder = builder.motion_path(path);
        }
        let built = builder.build(self.simulation());
        self.push(built);
        Ok(())
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_record())?)
    }

    pub fn from_json_str(sim: SharedSimulation, text: &str) -> Result<Scene> {
        Self::from_json_str_with_config(sim, SceneConfig::default(), text)
    }

    pub fn from_json_str_with_config(
        sim: SharedSimulation,
        config: SceneConfig,
        text: &str,
    ) -> Result<Scene> {
        let raw: RawSceneRecord = serde_json::from_str(text)?;
        let mut scene = Scene::with_config(sim, config);
        for (index, value) in raw.objects.into_iter().enumerate() {
            if let Some(name) = value.get("type").and_then(Value::as_str) {
                if known_kind(index, name).is_none() {
                    continue;
                }
            }
            let object: ObjectRecord = serde_json::from_value(value)?;
            if let Some(kind) = known_kind(index, &object.kind) {
                scene.push_record(index, kind, &object)?;
            }
        }
        Ok(scene)
    }

    /// Writes next to `path` first and renames into place, so a failed save
    /// never leaves a partial scene behind.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut text = self.to_json_string()?;
        text.push('\n');

        let mut staging = OsString::from(path.as_os_str());
        staging.push(".tmp");
        let staging = Path::new(&staging);

        let written = fs::write(staging, text).and_then(|()| fs::rename(staging, path));
        if let Err(err) = written {
            let _ = fs::remove_file(staging);
            return Err(err.into());
        }
        log::debug!("saved {} objects to {}", self.len(), path.display());
        Ok(())
    }

    /// Fails with [`SceneError::Io`] when no scene file can be read; the
    /// caller picks the fallback.
    pub fn load(sim: SharedSimulation, path: impl AsRef<Path>) -> Result<Scene> {
        Self::load_with_config(sim, SceneConfig::default(), path)
    }

    pub fn load_with_config(
        sim: SharedSimulation,
        config: SceneConfig,
        path: impl AsRef<Path>,
    ) -> Result<Scene> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let scene = Self::from_json_str_with_config(sim, config, &text)?;
        log::debug!("loaded {} objects from {}", scene.len(), path.display());
        Ok(scene)
    }
}
