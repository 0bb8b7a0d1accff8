//! Global configuration constants and scene-level settings.

use serde::{Deserialize, Serialize};

/// Default gravity vector applied in the physics world (Y-up).
pub const DEFAULT_GRAVITY: [f32; 3] = [0.0, -9.81, 0.0];

/// Default integration timestep (in seconds).
pub const DEFAULT_TIME_STEP: f32 = 1.0 / 60.0;

/// Number of integrator substeps per fixed timestep.
pub const DEFAULT_SUBSTEPS: u32 = 1;

/// Friction applied to every body created by a scene.
pub const DEFAULT_FRICTION: f32 = 0.5;

/// Default damping applied to linear velocity.
pub const DEFAULT_LINEAR_DAMPING: f32 = 0.0;

/// Default damping applied to angular velocity.
pub const DEFAULT_ANGULAR_DAMPING: f32 = 0.0;

/// Linear speed under which a body counts as idle.
pub const SLEEP_LINEAR_THRESHOLD: f32 = 0.05;

/// Consecutive idle substeps before a body is put to sleep.
pub const SLEEP_FRAMES: u32 = 120;

/// Settings shared by every object a [`crate::scene::Scene`] creates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Friction coefficient handed to the simulation on construction.
    pub friction: f32,
    /// Keep commanding the frozen target while a motion path is paused.
    pub hold_paused_paths: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            friction: DEFAULT_FRICTION,
            hold_paused_paths: true,
        }
    }
}
