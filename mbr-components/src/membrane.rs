//! Membrane filtration and fouling.
//!
//! Each step evaluates the permeate flux, the air-scouring shear, and the
//! fouling rates from the incoming state, integrates the irreversible and
//! reversible resistances, recomputes the trans-membrane pressure from
//! Darcy's law, and finally refreshes the cake properties for the next step.

mod air_scouring;
mod fouling;
mod parameters;

use std::time::Duration;

use log::trace;
use mbr_core::{
    TimeIntegrable,
    constraint::{Constrained, StrictlyPositive},
};
use thiserror::Error;
use uom::si::{
    f64::{DynamicViscosity, Pressure, Velocity},
    volume::cubic_meter,
};

pub use air_scouring::AirScouring;
pub use fouling::{
    CakeConditions, CakeState, FoulingDrivers, ResistanceRates, resistance_rates,
};
pub use parameters::{CakeModel, MembraneParameters};

use crate::{
    sludge::{Component, ParameterError, positive},
    state::{Hydraulics, MembraneState, State},
    units::{HydraulicResistance, SpecificArea, from_grams_per_cubic_meter, per_meter},
};

/// Errors that abort a membrane step.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MembraneError {
    #[error("time step must be greater than zero")]
    ZeroTimeStep,
    #[error("reactor volume must be positive to compute flux, got {0} m³")]
    NonPositiveVolume(f64),
    #[error("{quantity} is not finite")]
    NonFinite { quantity: &'static str },
}

/// A submerged membrane module and its fouling laws.
#[derive(Debug, Clone, PartialEq)]
pub struct Membrane {
    clean_resistance: Constrained<HydraulicResistance, StrictlyPositive>,
    viscosity: Constrained<DynamicViscosity, StrictlyPositive>,
    membrane_density: Constrained<SpecificArea, StrictlyPositive>,
    params: MembraneParameters,
}

impl Membrane {
    /// Creates a membrane from its parameters.
    ///
    /// # Errors
    ///
    /// Returns a [`ParameterError`] if any membrane, air-scouring, or cake
    /// parameter is outside its physical range.
    pub fn new(params: MembraneParameters) -> Result<Self, ParameterError> {
        params.validate()?;

        Ok(Self {
            clean_resistance: positive("clean_resistance", params.clean_resistance)?,
            viscosity: positive("viscosity", params.viscosity)?,
            membrane_density: positive("membrane_density", params.membrane_density)?,
            params,
        })
    }

    /// The parameters in use.
    #[must_use]
    pub fn parameters(&self) -> &MembraneParameters {
        &self.params
    }

    /// Permeate flux, `J = Q_out / (membrane_density · V)`.
    ///
    /// # Errors
    ///
    /// Returns [`MembraneError::NonPositiveVolume`] if the reactor is empty.
    pub fn flux(&self, hydraulics: &Hydraulics) -> Result<Velocity, MembraneError> {
        let v = hydraulics.volume.get::<cubic_meter>();
        if !v.is_finite() || v <= 0.0 {
            return Err(MembraneError::NonPositiveVolume(v));
        }
        Ok(hydraulics.q_out / (self.membrane_density.into_inner() * hydraulics.volume))
    }

    /// Total resistance, `R_m + R_i + R_r`.
    #[must_use]
    pub fn total_resistance(
        &self,
        r_i: HydraulicResistance,
        r_r: HydraulicResistance,
    ) -> HydraulicResistance {
        self.clean_resistance.into_inner() + r_i + r_r
    }

    /// Trans-membrane pressure from Darcy's law, `TMP = J · mu · R_t`.
    #[must_use]
    pub fn transmembrane_pressure(&self, flux: Velocity, r_t: HydraulicResistance) -> Pressure {
        flux * *self.viscosity.as_ref() * r_t
    }

    /// Fouling drivers of a state at a given flux.
    #[must_use]
    pub fn fouling_drivers(&self, state: &State, flux: Velocity) -> FoulingDrivers {
        FoulingDrivers {
            flux,
            smp: from_grams_per_cubic_meter(
                state.reactor.sum_of(&[Component::SUap, Component::SBap]),
            ),
            x_mlss: state.x_mlss,
            x_tss: state.x_tss,
            alpha_c: state.membrane.alpha_c,
            m_rback: state.membrane.m_rback,
        }
    }

    /// Fouling rates of a state at its current flux.
    ///
    /// # Errors
    ///
    /// Returns [`MembraneError::NonPositiveVolume`] if the reactor is empty.
    pub fn resistance_rates(&self, state: &State) -> Result<ResistanceRates, MembraneError> {
        let flux = self.flux(&state.hydraulics)?;
        Ok(resistance_rates(&self.params, &self.fouling_drivers(state, flux)))
    }

    /// Advances the membrane side of `state` by `dt`.
    ///
    /// Concentrations, hydraulics, and time are carried over unchanged.
    ///
    /// # Errors
    ///
    /// Returns a [`MembraneError`] if `dt` is zero, the reactor is empty, or
    /// any membrane quantity becomes non-finite.
    pub fn step(&self, state: &State, dt: Duration) -> Result<State, MembraneError> {
        if dt.is_zero() {
            return Err(MembraneError::ZeroTimeStep);
        }

        let flux = self.flux(&state.hydraulics)?;
        let MembraneState { r_i, r_r, v_sg, .. } = state.membrane;

        let tau_w = self
            .params
            .air_scouring
            .shear_stress(v_sg, state.x_tss, state.temperature);

        let rates = resistance_rates(&self.params, &self.fouling_drivers(state, flux));

        let r_i = r_i.step_by_duration(rates.irreversible, dt);
        let r_r = r_r.step_by_duration(rates.reversible, dt);
        let r_r = if r_r.value < 0.0 {
            trace!("reversible resistance floored at zero (was {} 1/m)", r_r.value);
            per_meter(0.0)
        } else {
            r_r
        };

        let r_t = self.total_resistance(r_i, r_r);
        let tmp = self.transmembrane_pressure(flux, r_t);

        let CakeState { alpha_c, m_rback } = self.params.cake.refresh(&CakeConditions {
            x_eps: state.reactor[Component::XEps],
            x_mlss: state.x_mlss,
            tau_w,
            tmp,
        });

        for (quantity, value) in [
            ("R_i", r_i.value),
            ("R_r", r_r.value),
            ("TMP", tmp.value),
            ("tau_w", tau_w.value),
            ("alpha_c", alpha_c.value),
            ("m_rback", m_rback.value),
        ] {
            if !value.is_finite() {
                return Err(MembraneError::NonFinite { quantity });
            }
        }

        Ok(State {
            membrane: MembraneState {
                r_i,
                r_r,
                r_t,
                alpha_c,
                m_rback,
                tau_w,
                tmp,
                v_sg,
            },
            ..state.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        dynamic_viscosity::pascal_second, f64::VolumeRate, pressure::pascal,
        velocity::meter_per_second, volume_rate::cubic_meter_per_second,
    };

    use crate::{
        reference,
        units::{
            SECONDS_PER_DAY, cubic_meters_per_day, kilograms_per_square_meter_second,
            meters_per_kilogram,
        },
    };

    fn membrane() -> Membrane {
        Membrane::new(MembraneParameters::default()).unwrap()
    }

    #[test]
    fn negative_viscosity_is_rejected() {
        let params = MembraneParameters {
            viscosity: DynamicViscosity::new::<pascal_second>(-1e-3),
            ..MembraneParameters::default()
        };
        assert!(matches!(
            Membrane::new(params),
            Err(ParameterError::Invalid {
                name: "viscosity",
                ..
            })
        ));
    }

    #[test]
    fn invalid_cake_model_is_rejected() {
        let params = MembraneParameters::default().with_back_transport(
            meters_per_kilogram(-1e12),
            Velocity::new::<meter_per_second>(6e-6),
        );
        assert!(matches!(
            Membrane::new(params),
            Err(ParameterError::Invalid {
                name: "specific_cake_resistance",
                ..
            })
        ));
    }

    #[test]
    fn reference_flux() {
        let state = reference::initial_state();
        let flux = membrane().flux(&state.hydraulics).unwrap();
        let expected = 18_446.33 / SECONDS_PER_DAY / (25.0 * 1_500.0);
        assert_relative_eq!(flux.get::<meter_per_second>(), expected, max_relative = 1e-12);
        assert_relative_eq!(cubic_meters_per_day(state.hydraulics.q_out), 18_446.33);
    }

    #[test]
    fn darcy_pressure() {
        let m = membrane();
        let tmp = m.transmembrane_pressure(Velocity::new::<meter_per_second>(1e-5), per_meter(2e12));
        assert_relative_eq!(tmp.get::<pascal>(), 1e-5 * 1e-3 * 2e12);
    }

    #[test]
    fn total_resistance_holds_after_step() {
        let m = membrane();
        let mut state = reference::initial_state();
        for _ in 0..8 {
            assert_relative_eq!(
                state.membrane.r_t.value,
                1e12 + state.membrane.r_i.value + state.membrane.r_r.value,
                max_relative = 1e-12
            );
            state = m.step(&state, Duration::from_secs(900)).unwrap();
        }
        assert!(state.membrane.alpha_c.value > 0.0);
        assert!(state.membrane.tmp.value > 0.0);
    }

    #[test]
    fn zero_outflow_means_zero_flux() {
        let m = membrane();
        let mut state = reference::initial_state();
        state.hydraulics.q_out = VolumeRate::new::<cubic_meter_per_second>(0.0);
        state.membrane.alpha_c = meters_per_kilogram(1e12);
        state.membrane.m_rback = kilograms_per_square_meter_second(1e-5);

        let rates = m.resistance_rates(&state).unwrap();
        assert_eq!(rates.irreversible.value, 0.0);
        assert_relative_eq!(rates.reversible.value, -1e12 * 1e-5);

        let next = m.step(&state, Duration::from_secs(900)).unwrap();
        assert_eq!(next.membrane.r_r.value, 0.0);
        assert_eq!(next.membrane.tmp.value, 0.0);
    }

    #[test]
    fn irreversible_resistance_never_decreases() {
        let m = membrane();
        let mut state = reference::initial_state();
        state.reactor[Component::SUap] = 10.0;
        state.membrane.alpha_c = meters_per_kilogram(1e12);

        let next = m.step(&state, Duration::from_secs(900)).unwrap();
        assert!(next.membrane.r_i > state.membrane.r_i);
    }

    #[test]
    fn zero_time_step_is_rejected() {
        let state = reference::initial_state();
        assert_eq!(
            membrane().step(&state, Duration::ZERO),
            Err(MembraneError::ZeroTimeStep)
        );
    }

    #[test]
    fn concentrations_are_untouched() {
        let state = reference::initial_state();
        let next = membrane().step(&state, Duration::from_secs(900)).unwrap();
        assert_eq!(next.reactor, state.reactor);
        assert_eq!(next.hydraulics, state.hydraulics);
        assert_eq!(next.time, state.time);
    }
}
