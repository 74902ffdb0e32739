use std::time::Duration;

use approx::assert_relative_eq;
use mbr_components::{
    MbrConfig, MbrModel,
    reference::{self, Influent, apply_influent},
    sludge::{Component, Process},
};
use mbr_core::Simulation;
use uom::si::{
    f64::ThermodynamicTemperature, thermodynamic_temperature::degree_celsius,
    volume::cubic_meter,
};

const FIFTEEN_MINUTES: Duration = Duration::from_secs(900);

fn model() -> MbrModel {
    MbrModel::new(&MbrConfig::default()).unwrap()
}

#[test]
fn one_step_from_the_reference_state() {
    let model = model();
    let initial = reference::initial_state();
    let next = model.step(&initial, FIFTEEN_MINUTES).unwrap();

    assert_eq!(
        next.hydraulics.volume.get::<cubic_meter>(),
        initial.hydraulics.volume.get::<cubic_meter>()
    );

    // Without oxygen or nitrate only ammonification, decay, and EPS
    // hydrolysis run, and the feed matches the liquor.
    let days = 900.0 / 86_400.0;
    let ammonification = 0.05 * 6.95 * 26.76;
    let eps_hydrolysis = 0.17 * 1.41;
    let nitrogen_release = 0.07 - 0.07 * (1.0 - 0.4);

    assert_relative_eq!(
        next.reactor[Component::SNh],
        31.56 + ammonification * days,
        max_relative = 1e-12
    );
    assert_relative_eq!(
        next.reactor[Component::SNd],
        6.95 + (-ammonification + nitrogen_release * eps_hydrolysis) * days,
        max_relative = 1e-12
    );
}

#[test]
fn reference_rates_are_limited_to_anoxic_free_processes() {
    let model = model();
    let rates = model
        .bioreactor()
        .process_rates(&reference::initial_state())
        .unwrap();

    for (process, rate) in rates.iter() {
        match process {
            Process::Ammonification | Process::HeterotrophDecay | Process::EpsHydrolysis => {
                assert!(rate > 0.0, "{}", process.label());
            }
            _ => assert_eq!(rate, 0.0, "{}", process.label()),
        }
    }
}

#[test]
fn warmer_liquor_accelerates_smp_and_eps_processes() {
    let model = model();
    let mut state = reference::initial_state();
    state.reactor[Component::SO] = 2.0;
    state.reactor[Component::SUap] = 10.0;

    let mut warm = state.clone();
    warm.temperature = ThermodynamicTemperature::new::<degree_celsius>(30.0);

    let at_20 = model.bioreactor().process_rates(&state).unwrap();
    let at_30 = model.bioreactor().process_rates(&warm).unwrap();

    for process in [
        Process::AerobicGrowthOnBap,
        Process::AerobicGrowthOnUap,
        Process::EpsHydrolysis,
    ] {
        assert!(at_30[process] > at_20[process], "{}", process.label());
    }
    assert_relative_eq!(
        at_30[Process::EpsHydrolysis] / at_20[Process::EpsHydrolysis],
        (0.11_f64 * 10.0).exp(),
        max_relative = 1e-12
    );
}

#[test]
fn a_day_of_storm_influent_stays_physical() {
    let model = model();
    let initial = apply_influent(&reference::initial_state(), Influent::Storm);

    let states = model.step_many(initial, 96, FIFTEEN_MINUTES).unwrap();
    let last = states.last().unwrap();

    assert!(last.validate().is_ok());
    assert!(last.hydraulics.volume > states[0].hydraulics.volume);
    assert!(last.membrane.r_i >= states[0].membrane.r_i);
}

#[test]
fn replay_is_deterministic() {
    let model = model();
    let first = model
        .step_many(reference::initial_state(), 48, FIFTEEN_MINUTES)
        .unwrap();
    let second = model
        .step_many(reference::initial_state(), 48, FIFTEEN_MINUTES)
        .unwrap();
    assert_eq!(first, second);
}
