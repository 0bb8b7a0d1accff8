//! Utility helpers including the body arena, logging and math extensions.

pub mod allocator;
pub mod logging;
pub mod math;

pub use allocator::{Arena, BodyId};
pub use math::*;
