use std::ops::Index;

use log::trace;
use thiserror::Error;

use super::{Component, ComponentVector, HydrolysisSaturation, KineticParameters, ParameterError};

/// A biochemical process of the model, in Petersen matrix row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Process {
    /// p1: ammonification of soluble organic nitrogen.
    Ammonification,
    /// p2a: aerobic heterotrophic growth on `S_S`.
    AerobicGrowthOnSubstrate,
    /// p2b: aerobic heterotrophic growth on `S_BAP`.
    AerobicGrowthOnBap,
    /// p2c: aerobic heterotrophic growth on `S_UAP`.
    AerobicGrowthOnUap,
    /// p3a: anoxic heterotrophic growth on `S_S`.
    AnoxicGrowthOnSubstrate,
    /// p3b: anoxic heterotrophic growth on `S_BAP`.
    AnoxicGrowthOnBap,
    /// p3c: anoxic heterotrophic growth on `S_UAP`.
    AnoxicGrowthOnUap,
    /// p4: decay of heterotrophs.
    HeterotrophDecay,
    /// p5: hydrolysis of entrapped organics.
    Hydrolysis,
    /// p6: hydrolysis of entrapped organic nitrogen.
    NitrogenHydrolysis,
    /// p7: hydrolysis of EPS.
    EpsHydrolysis,
    /// p8: aerobic growth of autotrophs.
    AutotrophGrowth,
    /// p9: decay of autotrophs.
    AutotrophDecay,
}

impl Process {
    /// Number of processes.
    pub const COUNT: usize = 13;

    /// All processes in Petersen matrix row order.
    pub const ALL: [Process; Process::COUNT] = [
        Process::Ammonification,
        Process::AerobicGrowthOnSubstrate,
        Process::AerobicGrowthOnBap,
        Process::AerobicGrowthOnUap,
        Process::AnoxicGrowthOnSubstrate,
        Process::AnoxicGrowthOnBap,
        Process::AnoxicGrowthOnUap,
        Process::HeterotrophDecay,
        Process::Hydrolysis,
        Process::NitrogenHydrolysis,
        Process::EpsHydrolysis,
        Process::AutotrophGrowth,
        Process::AutotrophDecay,
    ];

    /// Row index of this process.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Short label, e.g. `"p2b"`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Process::Ammonification => "p1",
            Process::AerobicGrowthOnSubstrate => "p2a",
            Process::AerobicGrowthOnBap => "p2b",
            Process::AerobicGrowthOnUap => "p2c",
            Process::AnoxicGrowthOnSubstrate => "p3a",
            Process::AnoxicGrowthOnBap => "p3b",
            Process::AnoxicGrowthOnUap => "p3c",
            Process::HeterotrophDecay => "p4",
            Process::Hydrolysis => "p5",
            Process::NitrogenHydrolysis => "p6",
            Process::EpsHydrolysis => "p7",
            Process::AutotrophGrowth => "p8",
            Process::AutotrophDecay => "p9",
        }
    }
}

/// Process rates in g/m³/d, indexed by [`Process`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProcessRates([f64; Process::COUNT]);

impl ProcessRates {
    /// Wraps raw rates given in Petersen row order.
    #[must_use]
    pub fn from_array(rates: [f64; Process::COUNT]) -> Self {
        Self(rates)
    }

    /// Raw rates in Petersen row order.
    #[must_use]
    pub fn as_array(&self) -> &[f64; Process::COUNT] {
        &self.0
    }

    /// Iterates over `(process, rate)` pairs in row order.
    pub fn iter(&self) -> impl Iterator<Item = (Process, f64)> + '_ {
        Process::ALL.into_iter().zip(self.0.iter().copied())
    }
}

impl Index<Process> for ProcessRates {
    type Output = f64;

    fn index(&self, process: Process) -> &f64 {
        &self.0[process.index()]
    }
}

/// Errors raised while evaluating process rates.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum KineticsError {
    #[error("temperature must be finite, got {0} °C")]
    InvalidTemperature(f64),
    #[error("rate of {} is not finite ({rate})", .process.label())]
    NonFiniteRate { process: Process, rate: f64 },
}

/// Monod saturation `s / (k + s)`.
fn saturation(s: f64, k: f64) -> f64 {
    s / (k + s)
}

/// Monod inhibition `k / (k + s)`.
fn inhibition(s: f64, k: f64) -> f64 {
    k / (k + s)
}

/// Evaluates the thirteen process rates from concentrations and temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct Kinetics {
    params: KineticParameters,
}

impl Kinetics {
    /// Creates a kinetics evaluator with the given parameters.
    ///
    /// # Errors
    ///
    /// Returns a [`ParameterError`] if [`KineticParameters::validate`] rejects
    /// the parameters.
    pub fn new(params: KineticParameters) -> Result<Self, ParameterError> {
        params.validate()?;
        Ok(Self { params })
    }

    /// The parameters in use.
    #[must_use]
    pub fn parameters(&self) -> &KineticParameters {
        &self.params
    }

    /// Arrhenius-style correction `exp(−θ·(T_ref − T))`.
    #[must_use]
    pub fn temperature_factor(&self, theta: f64, temperature: f64) -> f64 {
        (-theta * (self.params.reference_temperature - temperature)).exp()
    }

    /// Computes all process rates.
    ///
    /// `c` holds concentrations in model units and `temperature` is in °C.
    ///
    /// # Errors
    ///
    /// Returns a [`KineticsError`] if the temperature is not finite or any
    /// rate evaluates to a non-finite value.
    pub fn rates(&self, c: &ComponentVector, temperature: f64) -> Result<ProcessRates, KineticsError> {
        if !temperature.is_finite() {
            return Err(KineticsError::InvalidTemperature(temperature));
        }

        let hydrolysis = self.hydrolysis(c);

        let rates = ProcessRates([
            self.ammonification(c),
            self.aerobic_growth_on_substrate(c),
            self.aerobic_growth_on_bap(c, temperature),
            self.aerobic_growth_on_uap(c, temperature),
            self.anoxic_growth_on_substrate(c),
            self.anoxic_growth_on_bap(c, temperature),
            self.anoxic_growth_on_uap(c, temperature),
            self.heterotroph_decay(c),
            hydrolysis,
            Self::nitrogen_hydrolysis(c, hydrolysis),
            self.eps_hydrolysis(c, temperature),
            self.autotroph_growth(c),
            self.autotroph_decay(c),
        ]);

        if let Some((process, rate)) = rates.iter().find(|(_, rate)| !rate.is_finite()) {
            return Err(KineticsError::NonFiniteRate { process, rate });
        }

        trace!("process rates (g/m3/d): {:?}", rates.as_array());
        Ok(rates)
    }

    /// p1: `k_a · S_ND · X_H`.
    #[must_use]
    pub fn ammonification(&self, c: &ComponentVector) -> f64 {
        self.params.k_a * c[Component::SNd] * c[Component::XH]
    }

    /// p2a: growth on `S_S` limited by substrate and oxygen.
    #[must_use]
    pub fn aerobic_growth_on_substrate(&self, c: &ComponentVector) -> f64 {
        let p = &self.params;
        p.mu_h
            * saturation(c[Component::SS], p.k_s)
            * saturation(c[Component::SO], p.k_oh)
            * c[Component::XH]
    }

    /// p2b: growth on `S_BAP` limited by substrate, oxygen, and alkalinity.
    #[must_use]
    pub fn aerobic_growth_on_bap(&self, c: &ComponentVector, temperature: f64) -> f64 {
        let p = &self.params;
        self.temperature_factor(p.theta_smp, temperature)
            * p.mu_bap
            * saturation(c[Component::SBap], p.k_bap)
            * saturation(c[Component::SO], p.k_oh)
            * saturation(c[Component::SAlk], p.k_alk_h)
            * c[Component::XH]
    }

    /// p2c: growth on `S_UAP` limited by substrate, oxygen, and alkalinity.
    #[must_use]
    pub fn aerobic_growth_on_uap(&self, c: &ComponentVector, temperature: f64) -> f64 {
        let p = &self.params;
        self.temperature_factor(p.theta_smp, temperature)
            * p.mu_uap
            * saturation(c[Component::SUap], p.k_uap)
            * saturation(c[Component::SO], p.k_oh)
            * saturation(c[Component::SAlk], p.k_alk_h)
            * c[Component::XH]
    }

    /// p3a: denitrifying growth on `S_S`, inhibited by oxygen.
    #[must_use]
    pub fn anoxic_growth_on_substrate(&self, c: &ComponentVector) -> f64 {
        let p = &self.params;
        p.mu_h
            * p.eta_g
            * saturation(c[Component::SS], p.k_s)
            * inhibition(c[Component::SO], p.k_oh)
            * saturation(c[Component::SNo], p.k_no)
            * c[Component::XH]
    }

    /// p3b: denitrifying growth on `S_BAP`.
    #[must_use]
    pub fn anoxic_growth_on_bap(&self, c: &ComponentVector, temperature: f64) -> f64 {
        let p = &self.params;
        self.temperature_factor(p.theta_smp, temperature)
            * p.mu_bap
            * p.eta_g
            * saturation(c[Component::SBap], p.k_bap)
            * inhibition(c[Component::SO], p.k_oh)
            * saturation(c[Component::SNo], p.k_no)
            * saturation(c[Component::SAlk], p.k_alk_h)
            * c[Component::XH]
    }

    /// p3c: denitrifying growth on `S_UAP`.
    #[must_use]
    pub fn anoxic_growth_on_uap(&self, c: &ComponentVector, temperature: f64) -> f64 {
        let p = &self.params;
        self.temperature_factor(p.theta_smp, temperature)
            * p.mu_uap
            * p.eta_g
            * saturation(c[Component::SUap], p.k_uap)
            * inhibition(c[Component::SO], p.k_oh)
            * saturation(c[Component::SNo], p.k_no)
            * saturation(c[Component::SAlk], p.k_alk_h)
            * c[Component::XH]
    }

    /// p4: `b_H · X_H`.
    #[must_use]
    pub fn heterotroph_decay(&self, c: &ComponentVector) -> f64 {
        self.params.b_h * c[Component::XH]
    }

    /// p5: hydrolysis of `X_S`, aerobic plus anoxic pathways.
    ///
    /// The rate is zero when there is no heterotrophic biomass or no
    /// substrate to hydrolyse.
    #[must_use]
    pub fn hydrolysis(&self, c: &ComponentVector) -> f64 {
        let p = &self.params;
        let (x_s, x_h) = (c[Component::XS], c[Component::XH]);
        if x_h <= 0.0 || x_s <= 0.0 {
            return 0.0;
        }

        let loading = x_s / x_h;
        let substrate_term = match p.hydrolysis_saturation {
            HydrolysisSaturation::Additive => x_s / (p.k_x + loading),
            HydrolysisSaturation::Multiplicative => x_s / (p.k_x * loading),
        };

        let s_o = c[Component::SO];
        let oxic = saturation(s_o, p.k_oh);
        let anoxic = p.eta_h * inhibition(s_o, p.k_oh) * saturation(c[Component::SNo], p.k_no);

        p.k_h * substrate_term * (oxic + anoxic)
    }

    /// p6: p5 scaled by the nitrogen content of `X_S`.
    fn nitrogen_hydrolysis(c: &ComponentVector, hydrolysis: f64) -> f64 {
        let x_s = c[Component::XS];
        if x_s <= 0.0 {
            return 0.0;
        }
        hydrolysis * c[Component::XNd] / x_s
    }

    /// p7: first-order hydrolysis of EPS.
    #[must_use]
    pub fn eps_hydrolysis(&self, c: &ComponentVector, temperature: f64) -> f64 {
        let p = &self.params;
        self.temperature_factor(p.theta_eps, temperature) * p.k_h_eps * c[Component::XEps]
    }

    /// p8: nitrifier growth limited by ammonia and oxygen.
    #[must_use]
    pub fn autotroph_growth(&self, c: &ComponentVector) -> f64 {
        let p = &self.params;
        p.mu_a
            * saturation(c[Component::SNh], p.k_nh)
            * saturation(c[Component::SO], p.k_oa)
            * c[Component::XA]
    }

    /// p9: `b_A · X_A`.
    #[must_use]
    pub fn autotroph_decay(&self, c: &ComponentVector) -> f64 {
        self.params.b_a * c[Component::XA]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn kinetics() -> Kinetics {
        Kinetics::new(KineticParameters::default()).unwrap()
    }

    fn aerated_liquor() -> ComponentVector {
        let mut c = ComponentVector::zeros();
        c[Component::SS] = 69.5;
        c[Component::XS] = 202.32;
        c[Component::XH] = 26.76;
        c[Component::XEps] = 1.41;
        c[Component::SUap] = 5.0;
        c[Component::SBap] = 21.0;
        c[Component::XA] = 10.0;
        c[Component::SO] = 2.0;
        c[Component::SNo] = 1.0;
        c[Component::SNh] = 31.56;
        c[Component::SNd] = 6.95;
        c[Component::XNd] = 9.37;
        c[Component::SAlk] = 7.0;
        c
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let result = Kinetics::new(KineticParameters {
            b_h: -0.3,
            ..KineticParameters::default()
        });
        assert_eq!(
            result,
            Err(ParameterError::Invalid {
                name: "b_h",
                source: mbr_core::constraint::ConstraintError::Negative,
            })
        );
    }

    #[test]
    fn ammonification_is_bilinear() {
        let c = aerated_liquor();
        let rate = kinetics().ammonification(&c);
        assert_relative_eq!(rate, 0.05 * 6.95 * 26.76);
    }

    #[test]
    fn aerobic_growth_on_substrate_matches_hand_calculation() {
        let c = aerated_liquor();
        let expected = 4.0 * (69.5 / 79.5) * (2.0 / 2.2) * 26.76;
        assert_relative_eq!(kinetics().aerobic_growth_on_substrate(&c), expected);
    }

    #[test]
    fn anoxic_growth_is_inhibited_by_oxygen() {
        let k = kinetics();
        let mut c = aerated_liquor();

        let aerated = k.anoxic_growth_on_substrate(&c);
        c[Component::SO] = 0.0;
        let anoxic = k.anoxic_growth_on_substrate(&c);

        assert!(anoxic > aerated);
        let expected = 4.0 * 0.8 * (69.5 / 79.5) * (1.0 / 1.5) * 26.76;
        assert_relative_eq!(anoxic, expected);
    }

    #[test]
    fn no_oxygen_and_no_nitrate_stop_growth() {
        let mut c = aerated_liquor();
        c[Component::SO] = 0.0;
        c[Component::SNo] = 0.0;

        let rates = kinetics().rates(&c, 20.0).unwrap();
        for process in [
            Process::AerobicGrowthOnSubstrate,
            Process::AerobicGrowthOnBap,
            Process::AerobicGrowthOnUap,
            Process::AnoxicGrowthOnSubstrate,
            Process::AnoxicGrowthOnBap,
            Process::AnoxicGrowthOnUap,
            Process::Hydrolysis,
            Process::NitrogenHydrolysis,
            Process::AutotrophGrowth,
        ] {
            assert_eq!(rates[process], 0.0, "{} should be zero", process.label());
        }
        assert!(rates[Process::Ammonification] > 0.0);
        assert!(rates[Process::EpsHydrolysis] > 0.0);
    }

    #[test]
    fn hydrolysis_saturation_forms() {
        let c = aerated_liquor();
        let loading = 202.32 / 26.76;
        let pathways = 2.0 / 2.2 + 0.8 * (0.2 / 2.2) * (1.0 / 1.5);

        let additive = kinetics().hydrolysis(&c);
        assert_relative_eq!(additive, 3.0 * 202.32 / (0.1 + loading) * pathways);

        let multiplicative = Kinetics::new(KineticParameters {
            hydrolysis_saturation: HydrolysisSaturation::Multiplicative,
            ..KineticParameters::default()
        })
        .unwrap()
        .hydrolysis(&c);
        assert_relative_eq!(multiplicative, 3.0 * 202.32 / (0.1 * loading) * pathways);
    }

    #[test]
    fn hydrolysis_without_biomass_or_substrate_is_zero() {
        let k = kinetics();

        let mut c = aerated_liquor();
        c[Component::XH] = 0.0;
        let rates = k.rates(&c, 20.0).unwrap();
        assert_eq!(rates[Process::Hydrolysis], 0.0);
        assert_eq!(rates[Process::NitrogenHydrolysis], 0.0);

        let mut c = aerated_liquor();
        c[Component::XS] = 0.0;
        let rates = k.rates(&c, 20.0).unwrap();
        assert_eq!(rates[Process::Hydrolysis], 0.0);
        assert_eq!(rates[Process::NitrogenHydrolysis], 0.0);
    }

    #[test]
    fn nitrogen_hydrolysis_is_proportional_release() {
        let c = aerated_liquor();
        let rates = kinetics().rates(&c, 20.0).unwrap();
        assert_relative_eq!(
            rates[Process::NitrogenHydrolysis],
            rates[Process::Hydrolysis] * 9.37 / 202.32
        );
    }

    #[test]
    fn temperature_correction_is_unity_at_reference() {
        let k = kinetics();
        assert_relative_eq!(k.temperature_factor(0.069, 20.0), 1.0);
        assert_relative_eq!(k.temperature_factor(0.11, 30.0), (1.1_f64).exp());
        assert!(k.temperature_factor(0.069, 5.0) < 1.0);
    }

    #[test]
    fn warmer_liquor_speeds_up_smp_growth_and_eps_hydrolysis() {
        let k = kinetics();
        let c = aerated_liquor();

        let at_20 = k.rates(&c, 20.0).unwrap();
        let at_30 = k.rates(&c, 30.0).unwrap();

        for process in [
            Process::AerobicGrowthOnBap,
            Process::AerobicGrowthOnUap,
            Process::AnoxicGrowthOnBap,
            Process::AnoxicGrowthOnUap,
            Process::EpsHydrolysis,
        ] {
            assert!(at_30[process] > at_20[process], "{}", process.label());
        }
        assert_relative_eq!(
            at_30[Process::AerobicGrowthOnSubstrate],
            at_20[Process::AerobicGrowthOnSubstrate]
        );
    }

    #[test]
    fn non_finite_temperature_is_rejected() {
        let c = aerated_liquor();
        assert_eq!(
            kinetics().rates(&c, f64::NAN).unwrap_err().to_string(),
            "temperature must be finite, got NaN °C"
        );
    }

    #[test]
    fn non_finite_concentration_surfaces_as_error() {
        let mut c = aerated_liquor();
        c[Component::XA] = f64::INFINITY;
        assert!(matches!(
            kinetics().rates(&c, 20.0),
            Err(KineticsError::NonFiniteRate {
                process: Process::AutotrophGrowth,
                ..
            })
        ));
    }
}
