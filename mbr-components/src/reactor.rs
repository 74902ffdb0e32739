//! Material balance of the completely mixed bioreactor.

use std::time::Duration;

use log::trace;
use mbr_core::{DurationExt, TimeIntegrable};
use thiserror::Error;
use uom::si::{
    f64::{Mass, MassConcentration, Volume},
    mass::kilogram,
    mass_concentration::kilogram_per_cubic_meter,
    volume::cubic_meter,
};

use crate::{
    sludge::{
        Component, ComponentVector, Kinetics, KineticParameters, KineticsError, ParameterError,
        PetersenMatrix, ProcessRates, StoichiometricParameters, build_matrix,
    },
    state::{Hydraulics, State},
    units::{celsius, cubic_meters_per_day},
};

/// Errors that abort a reactor step.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ReactorError {
    #[error("time step must be greater than zero")]
    ZeroTimeStep,
    #[error("reactor volume must be positive, got {0} m³")]
    NonPositiveVolume(f64),
    #[error("mass balance of {quantity} is not finite")]
    NonFinite { quantity: &'static str },
    #[error(transparent)]
    Kinetics(#[from] KineticsError),
}

/// A completely mixed activated-sludge reactor.
///
/// Holds the kinetics and the Petersen matrix, both fixed at construction.
/// Stepping integrates the 17 component balances, the mixed-liquor solids
/// balance, and the liquid volume with one explicit Euler step.
#[derive(Debug, Clone, PartialEq)]
pub struct Bioreactor {
    kinetics: Kinetics,
    matrix: PetersenMatrix,
}

impl Bioreactor {
    /// Creates a reactor, building the Petersen matrix once.
    ///
    /// # Errors
    ///
    /// Returns a [`ParameterError`] if either parameter set is invalid.
    pub fn new(
        kinetics: KineticParameters,
        stoichiometry: &StoichiometricParameters,
    ) -> Result<Self, ParameterError> {
        stoichiometry.validate()?;
        Ok(Self {
            kinetics: Kinetics::new(kinetics)?,
            matrix: build_matrix(stoichiometry),
        })
    }

    /// The process-rate evaluator.
    #[must_use]
    pub fn kinetics(&self) -> &Kinetics {
        &self.kinetics
    }

    /// The stoichiometric matrix fixed at construction.
    #[must_use]
    pub fn matrix(&self) -> &PetersenMatrix {
        &self.matrix
    }

    /// Evaluates the process rates of a state, in g/m³/d.
    ///
    /// # Errors
    ///
    /// Propagates any [`KineticsError`].
    pub fn process_rates(&self, state: &State) -> Result<ProcessRates, KineticsError> {
        self.kinetics.rates(&state.reactor, celsius(state.temperature))
    }

    /// Evaluates the reaction rate of every component, in model units per day.
    ///
    /// # Errors
    ///
    /// Propagates any [`KineticsError`].
    pub fn component_rates(&self, state: &State) -> Result<ComponentVector, KineticsError> {
        let rates = self.process_rates(state)?;
        Ok(self.matrix.component_rates(&rates))
    }

    /// Advances the reactor side of `state` by `dt`.
    ///
    /// For each component the total mass is updated as
    /// `C·V + (Q_in·C_in − Q_out·C + r·V)·Δt` and divided by the new volume.
    /// A mass that would go negative is set to zero.
    /// Membrane fields and time are carried over unchanged.
    ///
    /// # Errors
    ///
    /// Returns a [`ReactorError`] if `dt` is zero, the volume is or would
    /// become non-positive, a rate cannot be evaluated, or a balance is
    /// not finite.
    pub fn step(&self, state: &State, dt: Duration) -> Result<State, ReactorError> {
        if dt.is_zero() {
            return Err(ReactorError::ZeroTimeStep);
        }

        let Hydraulics {
            volume, q_in, q_out, ..
        } = state.hydraulics;

        let v = volume.get::<cubic_meter>();
        if !v.is_finite() || v <= 0.0 {
            return Err(ReactorError::NonPositiveVolume(v));
        }

        let new_volume = volume.step_by_duration(q_in - q_out, dt);
        let new_v = new_volume.get::<cubic_meter>();
        if !new_v.is_finite() || new_v <= 0.0 {
            return Err(ReactorError::NonPositiveVolume(new_v));
        }

        let rates = self.component_rates(state)?;

        let days = dt.as_days();
        let (flow_in, flow_out) = (cubic_meters_per_day(q_in), cubic_meters_per_day(q_out));

        let mut reactor = ComponentVector::zeros();
        for component in Component::ALL {
            let c = state.reactor[component];
            let c_in = state.influent[component];

            let mass = c * v + (flow_in * c_in - flow_out * c + rates[component] * v) * days;
            if !mass.is_finite() {
                return Err(ReactorError::NonFinite {
                    quantity: component.symbol(),
                });
            }
            if mass < 0.0 {
                trace!("{} mass floored at zero (was {mass})", component.symbol());
            }

            reactor[component] = mass.max(0.0) / new_v;
        }

        let x_mlss = mixed_liquor_solids(state, dt, new_volume)?;

        Ok(State {
            reactor,
            x_mlss,
            hydraulics: Hydraulics {
                volume: new_volume,
                ..state.hydraulics
            },
            ..state.clone()
        }
        .with_derived_solids())
    }
}

/// Mixed-liquor solids balance: inflow and outflow only, no reaction.
fn mixed_liquor_solids(
    state: &State,
    dt: Duration,
    new_volume: Volume,
) -> Result<MassConcentration, ReactorError> {
    let Hydraulics {
        volume, q_in, q_out, ..
    } = state.hydraulics;

    let mass: Mass =
        state.x_mlss * volume + (q_in * state.in_x_mlss - q_out * state.x_mlss) * dt.as_time();
    let mass = mass.get::<kilogram>();

    if !mass.is_finite() {
        return Err(ReactorError::NonFinite { quantity: "X_MLSS" });
    }
    if mass < 0.0 {
        trace!("X_MLSS mass floored at zero (was {mass} kg)");
    }

    Ok(MassConcentration::new::<kilogram_per_cubic_meter>(
        mass.max(0.0) / new_volume.get::<cubic_meter>(),
    ))
}
