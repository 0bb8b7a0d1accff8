//! Thin rendering collaborator: mesh handles and the draw-call sink.

use glam::{Mat4, Vec4};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::ShapeKind;

static NEXT_MESH_ID: AtomicU64 = AtomicU64::new(0);

/// Primitive geometry a mesh was generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Cube,
    Cylinder,
}

impl From<ShapeKind> for Primitive {
    fn from(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Box => Primitive::Cube,
            ShapeKind::Cylinder => Primitive::Cylinder,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub u64);

/// Handle to uploaded mesh geometry. Vertex data lives with the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mesh {
    id: MeshId,
    primitive: Primitive,
}

impl Mesh {
    pub fn new(primitive: Primitive) -> Self {
        Self {
            id: MeshId(NEXT_MESH_ID.fetch_add(1, Ordering::Relaxed)),
            primitive,
        }
    }

    pub fn cube_with_normals() -> Self {
        Self::new(Primitive::Cube)
    }

    pub fn cylinder_with_normals() -> Self {
        Self::new(Primitive::Cylinder)
    }

    pub fn for_shape(kind: ShapeKind) -> Self {
        Self::new(kind.into())
    }

    pub fn id(&self) -> MeshId {
        self.id
    }

    pub fn primitive(&self) -> Primitive {
        self.primitive
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Shader uniform slot, as handed out by the graphics backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

/// Uniform slots used when drawing scene objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformLocations {
    pub model_matrix: UniformLocation,
    pub color: UniformLocation,
}

/// Draw-call sink implemented by the graphics backend.
pub trait RenderTarget {
    fn set_matrix(&mut self, location: UniformLocation, matrix: &Mat4);

    fn set_color(&mut self, location: UniformLocation, color: Vec4);

    fn draw(&mut self, mesh: &Mesh);
}
