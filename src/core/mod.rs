//! Core types describing bodies, shapes, and shared data.

pub mod collider;
pub mod rigidbody;
pub mod types;

pub use collider::{ColliderShape, ShapeKind};
pub use rigidbody::{ActivationPolicy, RigidBody};
pub use types::{InertiaTensorExt, MassProperties, ObjectId, Transform, Velocity};
