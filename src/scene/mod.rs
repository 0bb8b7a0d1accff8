//! Scene objects, the scene container, and scene persistence.

pub mod container;
pub mod object;
pub mod record;

pub use container::Scene;
pub use object::{PhysicsObject, PhysicsObjectBuilder};
pub use record::{ObjectRecord, PathRecord, SceneRecord};
