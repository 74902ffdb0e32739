//! The full snapshot of an MBR passed between simulation steps.

use thiserror::Error;
use uom::si::f64::{
    MassConcentration, Pressure, ThermodynamicTemperature, Time, Velocity, Volume, VolumeRate,
};

use crate::{
    sludge::{Component, ComponentVector, ConcentrationError},
    units::{
        HydraulicResistance, MassFlux, SpecificCakeResistance, from_grams_per_cubic_meter,
    },
};

/// Solids mass per unit of particulate COD.
pub const COD_TO_TSS: f64 = 0.75;

/// Particulate components that make up the suspended solids.
pub const SUSPENDED_SOLIDS: [Component; 6] = [
    Component::XS,
    Component::XH,
    Component::XA,
    Component::XP,
    Component::XI,
    Component::XEps,
];

/// Total suspended solids of a set of concentrations.
#[must_use]
pub fn total_suspended_solids(concentrations: &ComponentVector) -> MassConcentration {
    from_grams_per_cubic_meter(COD_TO_TSS * concentrations.sum_of(&SUSPENDED_SOLIDS))
}

/// Volume and flows of the reactor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hydraulics {
    pub volume: Volume,
    pub q_in: VolumeRate,
    pub q_out: VolumeRate,
    /// Lower bound of the permeate flow envelope.
    pub q_min: VolumeRate,
    /// Upper bound of the permeate flow envelope.
    pub q_max: VolumeRate,
}

/// Fouling state of the membrane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MembraneState {
    /// Irreversible fouling resistance.
    pub r_i: HydraulicResistance,
    /// Reversible (cake) fouling resistance.
    pub r_r: HydraulicResistance,
    /// Total resistance, `R_m + R_i + R_r`.
    pub r_t: HydraulicResistance,
    /// Specific cake resistance.
    pub alpha_c: SpecificCakeResistance,
    /// Back-transport mass flux away from the membrane.
    pub m_rback: MassFlux,
    /// Wall shear stress from air scouring.
    pub tau_w: Pressure,
    /// Trans-membrane pressure.
    pub tmp: Pressure,
    /// Superficial gas velocity of the scouring air.
    pub v_sg: Velocity,
}

/// A complete, self-consistent snapshot of the bioreactor.
///
/// A step never mutates a `State`; it returns a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    /// Simulation time since the start of the run.
    pub time: Time,
    /// Liquor temperature.
    pub temperature: ThermodynamicTemperature,
    /// Reactor concentrations in model units.
    pub reactor: ComponentVector,
    /// Influent concentrations in model units.
    pub influent: ComponentVector,
    /// Mixed-liquor suspended solids, tracked without a reaction term.
    pub x_mlss: MassConcentration,
    /// Influent mixed-liquor suspended solids.
    pub in_x_mlss: MassConcentration,
    /// Total suspended solids derived from the particulate components.
    pub x_tss: MassConcentration,
    pub hydraulics: Hydraulics,
    pub membrane: MembraneState,
}

/// Reasons a [`State`] is not physically meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum StateError {
    #[error("invalid reactor concentration")]
    Reactor(#[source] ConcentrationError),
    #[error("invalid influent concentration")]
    Influent(#[source] ConcentrationError),
    #[error("reactor volume must be positive, got {0} m³")]
    NonPositiveVolume(f64),
    #[error("{quantity} must be finite and non-negative, got {value}")]
    Invalid { quantity: &'static str, value: f64 },
    #[error("{quantity} must be finite, got {value}")]
    NotFinite { quantity: &'static str, value: f64 },
}

impl State {
    /// Recomputes [`x_tss`](Self::x_tss) from the reactor concentrations.
    #[must_use]
    pub fn with_derived_solids(mut self) -> Self {
        self.x_tss = total_suspended_solids(&self.reactor);
        self
    }

    /// Checks that the snapshot can be stepped.
    ///
    /// # Errors
    ///
    /// Returns the first invalid concentration, non-positive volume, or
    /// negative or non-finite flow, solids, or membrane value.
    pub fn validate(&self) -> Result<(), StateError> {
        self.reactor.validate().map_err(StateError::Reactor)?;
        self.influent.validate().map_err(StateError::Influent)?;

        let volume = self.hydraulics.volume.value;
        if !volume.is_finite() || volume <= 0.0 {
            return Err(StateError::NonPositiveVolume(volume));
        }

        for (quantity, value) in [
            ("Q_in", self.hydraulics.q_in.value),
            ("Q_out", self.hydraulics.q_out.value),
            ("Q_min", self.hydraulics.q_min.value),
            ("Q_max", self.hydraulics.q_max.value),
            ("X_MLSS", self.x_mlss.value),
            ("in_X_MLSS", self.in_x_mlss.value),
            ("R_i", self.membrane.r_i.value),
            ("R_r", self.membrane.r_r.value),
            ("alpha_c", self.membrane.alpha_c.value),
            ("v_sg", self.membrane.v_sg.value),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(StateError::Invalid { quantity, value });
            }
        }

        for (quantity, value) in [
            ("time", self.time.value),
            ("temperature", self.temperature.value),
            ("R_t", self.membrane.r_t.value),
            ("m_rback", self.membrane.m_rback.value),
            ("tau_w", self.membrane.tau_w.value),
            ("TMP", self.membrane.tmp.value),
        ] {
            if !value.is_finite() {
                return Err(StateError::NotFinite { quantity, value });
            }
        }

        Ok(())
    }
}
