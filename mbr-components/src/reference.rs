//! A documented reference plant and its influent profiles.
//!
//! The reference reactor holds 1500 m³ of liquor at 20 °C, fed and drained
//! at 18 446.33 m³/d, with the reactor concentrations initially equal to the
//! influent.

use uom::si::{
    f64::{Pressure, ThermodynamicTemperature, Time, Velocity, Volume},
    pressure::pascal,
    thermodynamic_temperature::degree_celsius,
    time::second,
    velocity::centimeter_per_second,
    volume::cubic_meter,
};

use crate::{
    membrane::MembraneParameters,
    sludge::{Component, ComponentVector},
    state::{Hydraulics, MembraneState, State, total_suspended_solids},
    units::{
        from_cubic_meters_per_day, from_grams_per_cubic_meter,
        kilograms_per_square_meter_second, meters_per_kilogram, per_meter,
    },
};

/// Reference reactor and influent concentrations, in Petersen column order.
pub const REFERENCE_CONCENTRATIONS: [f64; Component::COUNT] = [
    9.00, 69.50, 51.20, 202.32, 26.76, 1.41, 0.0, 21.00, 0.0, 0.0, 0.0, 0.0, 0.0, 31.56, 6.95,
    9.37, 7.00,
];

/// Reference mixed-liquor suspended solids, g/m³.
pub const REFERENCE_MLSS: f64 = 13_400.0;

/// The reference initial state using the default membrane parameters.
#[must_use]
pub fn initial_state() -> State {
    initial_state_for(&MembraneParameters::default())
}

/// The reference initial state for a membrane with the given parameters.
///
/// The membrane starts clean: `R_t = R_m` and every other membrane
/// quantity except the scouring air is zero.
#[must_use]
pub fn initial_state_for(params: &MembraneParameters) -> State {
    let concentrations = ComponentVector::from_array(REFERENCE_CONCENTRATIONS);
    let mlss = from_grams_per_cubic_meter(REFERENCE_MLSS);

    State {
        time: Time::new::<second>(0.0),
        temperature: ThermodynamicTemperature::new::<degree_celsius>(20.0),
        reactor: concentrations,
        influent: concentrations,
        x_mlss: mlss,
        in_x_mlss: mlss,
        x_tss: total_suspended_solids(&concentrations),
        hydraulics: Hydraulics {
            volume: Volume::new::<cubic_meter>(1_500.0),
            q_in: from_cubic_meters_per_day(18_446.33),
            q_out: from_cubic_meters_per_day(18_446.33),
            q_min: from_cubic_meters_per_day(10_000.0),
            q_max: from_cubic_meters_per_day(32_180.0),
        },
        membrane: MembraneState {
            r_i: per_meter(0.0),
            r_r: per_meter(0.0),
            r_t: params.clean_resistance,
            alpha_c: meters_per_kilogram(0.0),
            m_rback: kilograms_per_square_meter_second(0.0),
            tau_w: Pressure::new::<pascal>(0.0),
            tmp: Pressure::new::<pascal>(0.0),
            v_sg: Velocity::new::<centimeter_per_second>(1.0),
        },
    }
}

/// Influent weather conditions of the benchmark plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Influent {
    Dry,
    Rain,
    Storm,
}

/// Influent composition and flows for one weather condition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InfluentProfile {
    /// Influent concentrations; components the profile does not list are zero.
    pub concentrations: ComponentVector,
    /// Average inflow, m³/d.
    pub q_average: f64,
    /// Peak inflow, m³/d.
    pub q_peak: f64,
}

impl Influent {
    pub const ALL: [Influent; 3] = [Influent::Dry, Influent::Rain, Influent::Storm];

    /// The composition and flows of this influent.
    #[must_use]
    pub fn profile(self) -> InfluentProfile {
        use Component as C;

        // S_I, S_S, X_I, X_S, X_H, S_NH, S_ND, X_ND, S_ALK; then Q_av, Q_max.
        let (values, q_average, q_peak) = match self {
            Influent::Dry => (
                [30.00, 69.50, 51.20, 202.32, 28.17, 31.56, 6.95, 10.59, 7.00],
                18_446.33,
                32_180.0,
            ),
            Influent::Rain => (
                [25.96, 60.13, 44.30, 175.05, 24.37, 27.30, 6.01, 9.16, 7.00],
                21_319.75,
                52_126.0,
            ),
            Influent::Storm => (
                [28.03, 64.93, 51.92, 193.32, 27.25, 29.48, 6.49, 10.24, 7.00],
                19_744.72,
                60_000.0,
            ),
        };

        let mut concentrations = ComponentVector::zeros();
        for (component, value) in [
            C::SI,
            C::SS,
            C::XI,
            C::XS,
            C::XH,
            C::SNh,
            C::SNd,
            C::XNd,
            C::SAlk,
        ]
        .into_iter()
        .zip(values)
        {
            concentrations[component] = value;
        }

        InfluentProfile {
            concentrations,
            q_average,
            q_peak,
        }
    }
}

/// Feeds `state` with an influent profile at its average flow.
///
/// Replaces the influent concentrations and `Q_in`.
/// Mixed-liquor solids in the feed and the reactor contents are unchanged.
#[must_use]
pub fn apply_influent(state: &State, influent: Influent) -> State {
    let profile = influent.profile();
    State {
        influent: profile.concentrations,
        hydraulics: Hydraulics {
            q_in: from_cubic_meters_per_day(profile.q_average),
            ..state.hydraulics
        },
        ..state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::units::cubic_meters_per_day;

    #[test]
    fn reactor_starts_equal_to_influent() {
        let state = initial_state();
        assert_eq!(state.reactor, state.influent);
        assert_eq!(state.reactor[Component::XH], 26.76);
        assert_eq!(state.reactor[Component::SAlk], 7.0);
        assert_eq!(state.membrane.r_t, MembraneParameters::default().clean_resistance);
    }

    #[test]
    fn rain_profile() {
        let profile = Influent::Rain.profile();
        assert_eq!(profile.concentrations[Component::XS], 175.05);
        assert_eq!(profile.concentrations[Component::SBap], 0.0);
        assert_eq!(profile.q_peak, 52_126.0);
    }

    #[test]
    fn applying_storm_influent_raises_inflow() {
        let state = apply_influent(&initial_state(), Influent::Storm);
        assert_relative_eq!(cubic_meters_per_day(state.hydraulics.q_in), 19_744.72);
        assert_relative_eq!(cubic_meters_per_day(state.hydraulics.q_out), 18_446.33);
        assert_eq!(state.influent[Component::SI], 28.03);
        assert_eq!(state.reactor, initial_state().reactor);
    }

    #[test]
    fn every_profile_is_a_valid_influent() {
        for influent in Influent::ALL {
            assert!(influent.profile().concentrations.validate().is_ok());
            assert!(apply_influent(&initial_state(), influent).validate().is_ok());
        }
    }
}
