//! Scenario sweeps over the reference plant.
//!
//! A [`Scenario`] perturbs the reference initial state (solids, feed oxygen,
//! temperature); [`run_scenario`] steps it and condenses each snapshot into
//! a [`Summary`] of effluent quality and fouling.

use std::time::Duration;

use log::debug;
use mbr_core::Simulation;
use uom::si::{
    f64::{MassConcentration, Pressure, ThermodynamicTemperature, Time},
    mass_concentration::kilogram_per_cubic_meter,
    thermodynamic_temperature::degree_celsius,
};

use crate::{
    mbr::{MbrError, MbrModel},
    reference,
    sludge::{Component, CompositionMatrix, Conservation},
    state::State,
    units::{HydraulicResistance, from_grams_per_cubic_meter, grams_per_cubic_meter},
};

/// Organic components counted in the total COD.
const ORGANIC_COD: [Component; 10] = [
    Component::SI,
    Component::SS,
    Component::XI,
    Component::XS,
    Component::XH,
    Component::XEps,
    Component::SUap,
    Component::SBap,
    Component::XA,
    Component::XP,
];

/// Operating conditions applied on top of the reference plant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scenario {
    pub name: &'static str,
    /// Mixed-liquor solids in the reactor and the feed.
    pub x_mlss: MassConcentration,
    /// Dissolved oxygen in the feed.
    pub influent_oxygen: MassConcentration,
    pub temperature: ThermodynamicTemperature,
}

impl Scenario {
    /// Creates a scenario from MLSS in g/L, feed oxygen in mg/L, and
    /// temperature in °C.
    #[must_use]
    pub fn new(name: &'static str, mlss: f64, oxygen: f64, celsius: f64) -> Self {
        Self {
            name,
            x_mlss: MassConcentration::new::<kilogram_per_cubic_meter>(mlss),
            influent_oxygen: from_grams_per_cubic_meter(oxygen),
            temperature: ThermodynamicTemperature::new::<degree_celsius>(celsius),
        }
    }

    /// The seven reference cases: MLSS, feed oxygen, and temperature each
    /// varied around 15 g/L, 1 mg/L, and 20 °C.
    #[must_use]
    pub fn reference_sweep() -> Vec<Scenario> {
        vec![
            Scenario::new("mlss-3", 3.0, 1.0, 20.0),
            Scenario::new("baseline", 15.0, 1.0, 20.0),
            Scenario::new("mlss-30", 30.0, 1.0, 20.0),
            Scenario::new("anoxic-feed", 15.0, 0.0, 20.0),
            Scenario::new("aerated-feed", 15.0, 4.5, 20.0),
            Scenario::new("cold", 15.0, 1.0, 5.0),
            Scenario::new("warm", 15.0, 1.0, 30.0),
        ]
    }

    /// Applies the scenario's conditions to a state.
    #[must_use]
    pub fn apply(&self, state: &State) -> State {
        let mut influent = state.influent;
        influent[Component::SO] = grams_per_cubic_meter(self.influent_oxygen);

        State {
            temperature: self.temperature,
            influent,
            x_mlss: self.x_mlss,
            in_x_mlss: self.x_mlss,
            ..state.clone()
        }
    }
}

/// Effluent quality and fouling indicators of one snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub time: Time,
    /// Organic COD of all soluble and particulate fractions.
    pub total_cod: MassConcentration,
    /// Soluble microbial products, `S_UAP + S_BAP`.
    pub smp: MassConcentration,
    pub x_eps: MassConcentration,
    /// Total nitrogen, organic and inorganic.
    pub total_nitrogen: MassConcentration,
    pub r_t: HydraulicResistance,
    pub tmp: Pressure,
}

impl Summary {
    /// Condenses a state using the nitrogen contents of `composition`.
    #[must_use]
    pub fn from_state(state: &State, composition: &CompositionMatrix) -> Self {
        let c = &state.reactor;
        let total_nitrogen: f64 = c
            .iter()
            .map(|(component, value)| composition.content(Conservation::Nitrogen, component) * value)
            .sum();

        Self {
            time: state.time,
            total_cod: from_grams_per_cubic_meter(c.sum_of(&ORGANIC_COD)),
            smp: from_grams_per_cubic_meter(c.sum_of(&[Component::SUap, Component::SBap])),
            x_eps: from_grams_per_cubic_meter(c[Component::XEps]),
            total_nitrogen: from_grams_per_cubic_meter(total_nitrogen),
            r_t: state.membrane.r_t,
            tmp: state.membrane.tmp,
        }
    }
}

/// Runs one scenario from the reference state and summarises every snapshot.
///
/// The number of steps is `duration / dt`, rounded up.
/// The first summary describes the initial state.
///
/// # Errors
///
/// Returns the first step error.
pub fn run_scenario(
    model: &MbrModel,
    scenario: &Scenario,
    duration: Duration,
    dt: Duration,
) -> Result<Vec<Summary>, MbrError> {
    let initial = scenario.apply(&reference::initial_state_for(model.membrane().parameters()));
    let snapshots = snapshot_count(duration, dt);

    debug!(
        "running scenario `{}` for {} steps",
        scenario.name,
        snapshots - 1
    );

    model
        .step_iter(initial, dt)
        .take(snapshots)
        .map(|state| state.map(|state| Summary::from_state(&state, model.composition())))
        .collect()
}

/// Number of snapshots in a run of `duration`, including the initial one.
///
/// Saturates at `usize::MAX` for runs too long to count.
fn snapshot_count(duration: Duration, dt: Duration) -> usize {
    let steps = duration.as_nanos().div_ceil(dt.as_nanos().max(1));
    usize::try_from(steps).map_or(usize::MAX, |steps| steps.saturating_add(1))
}

/// Runs independent scenarios, in parallel when the `parallel` feature is
/// enabled.
///
/// Results are returned in the order of `scenarios`.
pub fn run_sweep(
    model: &MbrModel,
    scenarios: &[Scenario],
    duration: Duration,
    dt: Duration,
) -> Vec<Result<Vec<Summary>, MbrError>> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        scenarios
            .par_iter()
            .map(|scenario| run_scenario(model, scenario, duration, dt))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        scenarios
            .iter()
            .map(|scenario| run_scenario(model, scenario, duration, dt))
            .collect()
    }
}
