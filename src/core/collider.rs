use super::types::InertiaTensorExt;
use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of shape kinds a scene object can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Box,
    Cylinder,
}

impl ShapeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Box => "box",
            ShapeKind::Cylinder => "cylinder",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "box" => Ok(ShapeKind::Box),
            "cylinder" => Ok(ShapeKind::Cylinder),
            other => Err(format!("unknown shape kind `{other}`")),
        }
    }
}

/// Collision geometry handed to the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    Box { half_extents: Vec3 },
    /// Aligned along local Y.
    Cylinder { radius: f32, half_height: f32 },
}

impl ColliderShape {
    /// Unit shape of `kind` scaled by `scale`. This is the only place shape
    /// kinds turn into geometry.
    pub fn from_kind(kind: ShapeKind, scale: Vec3) -> Self {
        match kind {
            ShapeKind::Box => ColliderShape::Box {
                half_extents: scale,
            },
            ShapeKind::Cylinder => ColliderShape::Cylinder {
                radius: scale.x,
                half_height: scale.y,
            },
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            ColliderShape::Box { .. } => ShapeKind::Box,
            ColliderShape::Cylinder { .. } => ShapeKind::Cylinder,
        }
    }

    /// Local inertia tensor for `mass`; zero for static bodies.
    pub fn local_inertia(&self, mass: f32) -> Mat3 {
        if mass.abs() < f32::EPSILON {
            return Mat3::ZERO;
        }
        match *self {
            ColliderShape::Box { half_extents } => Mat3::for_solid_box(half_extents, mass),
            ColliderShape::Cylinder {
                radius,
                half_height,
            } => Mat3::for_solid_cylinder(radius, half_height, mass),
        }
    }
}
