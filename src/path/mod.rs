//! Scripted motion: waypoint paths and their spline evaluation.

pub mod motion;
pub mod spline;

pub use motion::MotionPath;
pub use spline::build_tangents;
