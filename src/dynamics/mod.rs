//! Simulation dynamics: integration and the trajectory control law.

pub mod controller;
pub mod integrator;

pub use controller::TrajectoryController;
pub use integrator::Integrator;
