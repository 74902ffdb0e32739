//! Activated-sludge biokinetics.
//!
//! Seventeen state components react through thirteen processes.
//! [`Kinetics`] evaluates the process rates from the current concentrations,
//! and the [`PetersenMatrix`] maps those rates onto per-component rates of
//! change.
//!
//! All arithmetic here is in model units: g/m³ for COD and nitrogen
//! components, mol/m³ for alkalinity, and days for time.

mod component;
mod kinetics;
mod parameters;
mod stoichiometry;

pub use component::{Component, ComponentUnit, ComponentVector, Concentration, ConcentrationError};
pub use kinetics::{Kinetics, KineticsError, Process, ProcessRates};
pub use parameters::{
    HydrolysisSaturation, KineticParameters, ParameterError, StoichiometricParameters,
};
pub(crate) use parameters::{non_negative, positive};
pub use stoichiometry::{CompositionMatrix, Conservation, PetersenMatrix, build_matrix};
