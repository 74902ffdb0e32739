use mbr_core::constraint::{Constrained, ConstraintError, NonNegative, RawValue, StrictlyPositive};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a parameter set is physically meaningless.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("parameter `{name}` is invalid: {source}")]
    Invalid {
        name: &'static str,
        #[source]
        source: ConstraintError,
    },
    #[error("decay fractions of `{process}` sum to {total}, which exceeds 1")]
    ExcessDecayFractions { process: &'static str, total: f64 },
    #[error("parameter `{name}` must not exceed 1, got {value}")]
    AboveUnity { name: &'static str, value: f64 },
}

/// Wraps `value` as strictly positive, naming it in the error.
pub(crate) fn positive<T: RawValue>(
    name: &'static str,
    value: T,
) -> Result<Constrained<T, StrictlyPositive>, ParameterError> {
    StrictlyPositive::new(value).map_err(|source| ParameterError::Invalid { name, source })
}

/// Wraps `value` as non-negative, naming it in the error.
pub(crate) fn non_negative<T: RawValue>(
    name: &'static str,
    value: T,
) -> Result<Constrained<T, NonNegative>, ParameterError> {
    NonNegative::new(value).map_err(|source| ParameterError::Invalid { name, source })
}

fn fraction(name: &'static str, value: f64) -> Result<(), ParameterError> {
    non_negative(name, value)?;
    if value > 1.0 {
        return Err(ParameterError::AboveUnity { name, value });
    }
    Ok(())
}

/// Form of the hydrolysis saturation term in process p5.
///
/// Two forms of the denominator are in circulation.
/// The additive form is the Monod-consistent one and is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HydrolysisSaturation {
    /// `X_S / (K_X + X_S/X_H)`.
    #[default]
    Additive,
    /// `X_S / (K_X · X_S/X_H)`.
    Multiplicative,
}

/// Rate constants and half-saturation constants of the biokinetic model.
///
/// Units: concentrations in g/m³ (alkalinity in mol/m³), rates in 1/d,
/// temperatures in °C.
/// Defaults are the 20 °C reference values of the ASM1 benchmark set with
/// the SMP/EPS extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KineticParameters {
    /// Maximum heterotrophic growth rate on `S_S`, 1/d.
    pub mu_h: f64,
    /// Maximum heterotrophic growth rate on `S_BAP` at 20 °C, 1/d.
    pub mu_bap: f64,
    /// Maximum heterotrophic growth rate on `S_UAP` at 20 °C, 1/d.
    pub mu_uap: f64,
    /// Maximum autotrophic growth rate, 1/d.
    pub mu_a: f64,
    /// Half-saturation constant for `S_S`, gCOD/m³.
    pub k_s: f64,
    /// Oxygen half-saturation constant for heterotrophs, gO₂/m³.
    pub k_oh: f64,
    /// Nitrate half-saturation constant for denitrifiers, gN/m³.
    pub k_no: f64,
    /// Half-saturation constant for `S_BAP`, gCOD/m³.
    pub k_bap: f64,
    /// Half-saturation constant for `S_UAP`, gCOD/m³.
    pub k_uap: f64,
    /// Alkalinity half-saturation constant for heterotrophs, mol/m³.
    pub k_alk_h: f64,
    /// Ammonia half-saturation constant for autotrophs, gN/m³.
    pub k_nh: f64,
    /// Oxygen half-saturation constant for autotrophs, gO₂/m³.
    pub k_oa: f64,
    /// Heterotrophic decay rate, 1/d.
    pub b_h: f64,
    /// Autotrophic decay rate, 1/d.
    pub b_a: f64,
    /// Anoxic growth correction factor.
    pub eta_g: f64,
    /// Anoxic hydrolysis correction factor.
    pub eta_h: f64,
    /// Maximum specific hydrolysis rate, 1/d.
    pub k_h: f64,
    /// Half-saturation coefficient for hydrolysis of slowly biodegradable substrate.
    pub k_x: f64,
    /// Ammonification rate, m³/(gCOD·d).
    pub k_a: f64,
    /// EPS hydrolysis rate at 20 °C, 1/d.
    pub k_h_eps: f64,
    /// Arrhenius exponent for growth on soluble microbial products, 1/°C.
    pub theta_smp: f64,
    /// Arrhenius exponent for EPS hydrolysis, 1/°C.
    pub theta_eps: f64,
    /// Temperature the rate constants are quoted at, °C.
    pub reference_temperature: f64,
    /// Form of the hydrolysis saturation term.
    pub hydrolysis_saturation: HydrolysisSaturation,
}

impl Default for KineticParameters {
    fn default() -> Self {
        Self {
            mu_h: 4.0,
            mu_bap: 0.15,
            mu_uap: 0.45,
            mu_a: 0.5,
            k_s: 10.0,
            k_oh: 0.2,
            k_no: 0.5,
            k_bap: 85.0,
            k_uap: 100.0,
            k_alk_h: 0.1,
            k_nh: 1.0,
            k_oa: 0.4,
            b_h: 0.3,
            b_a: 0.05,
            eta_g: 0.8,
            eta_h: 0.8,
            k_h: 3.0,
            k_x: 0.1,
            k_a: 0.05,
            k_h_eps: 0.17,
            theta_smp: 0.069,
            theta_eps: 0.11,
            reference_temperature: 20.0,
            hydrolysis_saturation: HydrolysisSaturation::Additive,
        }
    }
}

impl KineticParameters {
    /// Checks that every constant lies in its physical range.
    ///
    /// Half-saturation constants must be strictly positive so that every
    /// saturation term is defined at zero concentration.
    ///
    /// # Errors
    ///
    /// Returns the first invalid parameter found.
    pub fn validate(&self) -> Result<(), ParameterError> {
        for (name, value) in [
            ("k_s", self.k_s),
            ("k_oh", self.k_oh),
            ("k_no", self.k_no),
            ("k_bap", self.k_bap),
            ("k_uap", self.k_uap),
            ("k_alk_h", self.k_alk_h),
            ("k_nh", self.k_nh),
            ("k_oa", self.k_oa),
            ("k_x", self.k_x),
        ] {
            positive(name, value)?;
        }

        for (name, value) in [
            ("mu_h", self.mu_h),
            ("mu_bap", self.mu_bap),
            ("mu_uap", self.mu_uap),
            ("mu_a", self.mu_a),
            ("b_h", self.b_h),
            ("b_a", self.b_a),
            ("eta_g", self.eta_g),
            ("eta_h", self.eta_h),
            ("k_h", self.k_h),
            ("k_a", self.k_a),
            ("k_h_eps", self.k_h_eps),
            ("theta_smp", self.theta_smp),
            ("theta_eps", self.theta_eps),
        ] {
            non_negative(name, value)?;
        }

        if !self.reference_temperature.is_finite() {
            return Err(ParameterError::Invalid {
                name: "reference_temperature",
                source: ConstraintError::NotFinite,
            });
        }

        Ok(())
    }
}

/// Yields, production fractions, and nitrogen contents.
///
/// These fix the Petersen matrix; all values are dimensionless mass ratios
/// (gCOD/gCOD or gN/gCOD).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoichiometricParameters {
    /// Heterotrophic yield on `S_S`.
    pub y_h: f64,
    /// Autotrophic yield.
    pub y_a: f64,
    /// Heterotrophic yield on soluble microbial products.
    pub y_smp: f64,
    /// Fraction of decayed biomass leading to particulate products.
    pub f_p: f64,
    /// Nitrogen content of active biomass, gN/gCOD.
    pub i_xb: f64,
    /// Nitrogen content of particulate products, gN/gCOD.
    pub i_xp: f64,
    /// Nitrogen content of `S_BAP`, gN/gCOD.
    pub i_xbap: f64,
    /// Nitrogen content of `X_EPS`, gN/gCOD.
    pub i_xeps: f64,
    /// Fraction of `S_UAP` produced during heterotrophic growth.
    pub gamma_h: f64,
    /// Fraction of `S_UAP` produced during autotrophic growth.
    pub gamma_a: f64,
    /// Fraction of `S_S` produced during EPS hydrolysis.
    pub f_s: f64,
    /// EPS produced during heterotrophic growth.
    pub f_eps_h: f64,
    /// EPS produced during heterotrophic decay.
    pub f_eps_dh: f64,
    /// EPS produced during autotrophic growth.
    pub f_eps_a: f64,
    /// EPS produced during autotrophic decay.
    pub f_eps_da: f64,
    /// BAP produced during biomass decay.
    pub f_bap: f64,
}

impl Default for StoichiometricParameters {
    fn default() -> Self {
        Self {
            y_h: 0.67,
            y_a: 0.24,
            y_smp: 0.45,
            f_p: 0.08,
            i_xb: 0.086,
            i_xp: 0.06,
            i_xbap: 0.07,
            i_xeps: 0.07,
            gamma_h: 0.0924,
            gamma_a: 0.0,
            f_s: 0.4,
            f_eps_h: 0.10,
            f_eps_dh: 0.025,
            f_eps_a: 0.0,
            f_eps_da: 0.0,
            f_bap: 0.0215,
        }
    }
}

impl StoichiometricParameters {
    /// Checks yields and fractions.
    ///
    /// # Errors
    ///
    /// Returns the first invalid parameter, or
    /// [`ParameterError::ExcessDecayFractions`] if a decay process would
    /// distribute more than all of the decayed biomass.
    pub fn validate(&self) -> Result<(), ParameterError> {
        for (name, value) in [("y_h", self.y_h), ("y_a", self.y_a), ("y_smp", self.y_smp)] {
            positive(name, value)?;
            if value > 1.0 {
                return Err(ParameterError::AboveUnity { name, value });
            }
        }

        for (name, value) in [
            ("f_p", self.f_p),
            ("gamma_h", self.gamma_h),
            ("gamma_a", self.gamma_a),
            ("f_s", self.f_s),
            ("f_eps_h", self.f_eps_h),
            ("f_eps_dh", self.f_eps_dh),
            ("f_eps_a", self.f_eps_a),
            ("f_eps_da", self.f_eps_da),
            ("f_bap", self.f_bap),
            ("i_xb", self.i_xb),
            ("i_xp", self.i_xp),
            ("i_xbap", self.i_xbap),
            ("i_xeps", self.i_xeps),
        ] {
            fraction(name, value)?;
        }

        for (process, total) in [
            ("heterotroph decay", self.f_p + self.f_eps_dh + self.f_bap),
            ("autotroph decay", self.f_p + self.f_eps_da + self.f_bap),
        ] {
            if total > 1.0 {
                return Err(ParameterError::ExcessDecayFractions { process, total });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(KineticParameters::default().validate().is_ok());
        assert!(StoichiometricParameters::default().validate().is_ok());
    }

    #[test]
    fn zero_half_saturation_is_rejected() {
        let params = KineticParameters {
            k_oh: 0.0,
            ..KineticParameters::default()
        };
        assert_eq!(
            params.validate(),
            Err(ParameterError::Invalid {
                name: "k_oh",
                source: ConstraintError::Zero,
            })
        );
    }

    #[test]
    fn yields_above_one_are_rejected() {
        let params = StoichiometricParameters {
            y_smp: 1.2,
            ..StoichiometricParameters::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ParameterError::AboveUnity { name: "y_smp", .. })
        ));
    }

    #[test]
    fn decay_fractions_must_fit_in_decayed_biomass() {
        let params = StoichiometricParameters {
            f_p: 0.6,
            f_bap: 0.5,
            ..StoichiometricParameters::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ParameterError::ExcessDecayFractions {
                process: "heterotroph decay",
                ..
            })
        ));
    }
}
