//! Membrane bioreactor process models.
//!
//! The crate couples an activated-sludge biokinetic model (ASM1 extended with
//! soluble microbial products and extracellular polymeric substances) to a
//! membrane fouling model:
//!
//! - [`sludge`]: components, parameters, process kinetics, and the Petersen matrix.
//! - [`reactor`]: the material balance that integrates concentrations and volume.
//! - [`membrane`]: permeate flux, air-scouring shear, fouling resistance, and TMP.
//! - [`mbr`]: the integrated model, stepped through [`mbr_core::Simulation`].
//!
//! Supporting modules provide the typed [`State`], unit aliases, configuration
//! loading, a documented reference plant, and scenario sweeps.

pub mod config;
pub mod mbr;
pub mod membrane;
pub mod reactor;
pub mod reference;
pub mod scenario;
pub mod sludge;
pub mod state;
pub mod units;

pub use config::{ConfigError, MbrConfig};
pub use mbr::{MbrError, MbrModel};
pub use state::{Hydraulics, MembraneState, State, StateError};
