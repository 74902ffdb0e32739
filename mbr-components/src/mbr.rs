//! The integrated membrane bioreactor model.

use std::time::Duration;

use log::debug;
use mbr_core::{DurationExt, Simulation};
use thiserror::Error;
use uom::si::{pressure::kilopascal, time::day, volume::cubic_meter};

use crate::{
    config::MbrConfig,
    membrane::{Membrane, MembraneError},
    reactor::{Bioreactor, ReactorError},
    sludge::{CompositionMatrix, ParameterError},
    state::State,
};

/// Errors that abort an integrated step.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MbrError {
    #[error("reactor step failed")]
    Reactor(#[from] ReactorError),
    #[error("membrane step failed")]
    Membrane(#[from] MembraneError),
}

/// A bioreactor coupled to a submerged membrane.
///
/// Each step runs the reactor balance, then the membrane fouling model on
/// the updated liquor, then advances the clock.
#[derive(Debug, Clone, PartialEq)]
pub struct MbrModel {
    bioreactor: Bioreactor,
    membrane: Membrane,
    composition: CompositionMatrix,
}

impl MbrModel {
    /// Builds a model from a configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ParameterError`] if any parameter is out of range.
    pub fn new(config: &MbrConfig) -> Result<Self, ParameterError> {
        Ok(Self {
            bioreactor: Bioreactor::new(config.kinetics.clone(), &config.stoichiometry)?,
            membrane: Membrane::new(config.membrane.clone())?,
            composition: CompositionMatrix::new(&config.stoichiometry),
        })
    }

    /// The biological side of the model.
    #[must_use]
    pub fn bioreactor(&self) -> &Bioreactor {
        &self.bioreactor
    }

    /// The filtration side of the model.
    #[must_use]
    pub fn membrane(&self) -> &Membrane {
        &self.membrane
    }

    /// Oxygen-demand, nitrogen, and charge content of each component.
    #[must_use]
    pub fn composition(&self) -> &CompositionMatrix {
        &self.composition
    }
}

impl Simulation for MbrModel {
    type State = State;
    type Error = MbrError;

    fn step(&self, state: &State, dt: Duration) -> Result<State, MbrError> {
        let state = self.bioreactor.step(state, dt)?;
        let mut state = self.membrane.step(&state, dt)?;
        state.time += dt.as_time();

        debug!(
            "t = {:.4} d, V = {:.1} m³, TMP = {:.3} kPa",
            state.time.get::<day>(),
            state.hydraulics.volume.get::<cubic_meter>(),
            state.membrane.tmp.get::<kilopascal>(),
        );

        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::time::second;

    use crate::reference;

    #[test]
    fn time_advances_by_each_step() {
        let model = MbrModel::new(&MbrConfig::default()).unwrap();
        let states = model
            .step_many(reference::initial_state(), 4, Duration::from_secs(900))
            .unwrap();

        assert_eq!(states.len(), 5);
        assert_relative_eq!(states[4].time.get::<second>(), 3_600.0);
    }

    #[test]
    fn reactor_errors_are_wrapped() {
        let model = MbrModel::new(&MbrConfig::default()).unwrap();
        let result = model.step(&reference::initial_state(), Duration::ZERO);
        assert_eq!(result, Err(MbrError::Reactor(ReactorError::ZeroTimeStep)));
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let mut config = MbrConfig::default();
        config.kinetics.k_oh = 0.0;
        assert!(MbrModel::new(&config).is_err());
    }

    #[test]
    fn invalid_membrane_configuration_is_rejected() {
        let mut config = MbrConfig::default();
        config.membrane.viscosity = -config.membrane.viscosity;
        assert!(matches!(
            MbrModel::new(&config),
            Err(ParameterError::Invalid {
                name: "viscosity",
                ..
            })
        ));
    }
}
