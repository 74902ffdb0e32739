//! Simulation plumbing for membrane bioreactor models.
//!
//! Provides the pieces a process model needs to be stepped through time
//! without knowing anything about wastewater:
//!
//! - [`Simulation`]: advances an owned state snapshot by a time step.
//! - [`TimeIntegrable`]: explicit Euler integration of unit-typed quantities.
//! - [`constraint`]: construction-time numeric invariants for configuration.

pub mod constraint;
mod simulation;
mod time;

pub use simulation::Simulation;
pub use time::{DurationExt, TimeDerivativeOf, TimeIntegrable};
