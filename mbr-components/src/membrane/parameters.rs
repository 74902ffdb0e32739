use mbr_core::constraint::ConstraintError;
use serde::{Deserialize, Serialize};
use uom::si::{
    dynamic_viscosity::pascal_second,
    f64::{DynamicViscosity, Pressure, Velocity},
    pressure::kilopascal,
};

use crate::{
    sludge::{ParameterError, non_negative, positive},
    units::{
        HydraulicResistance, InverseVelocity, IrreversibleFoulingCoefficient, SpecificArea,
        SpecificCakeResistance, irreversible_fouling_coefficient, meters_per_kilogram, per_meter,
        seconds_per_meter, square_meters_per_cubic_meter,
    },
};

use super::AirScouring;

/// How the specific cake resistance and back-transport flux are refreshed
/// after each membrane step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum CakeModel {
    /// Cake resistance follows the EPS fraction of the solids and grows with
    /// the square of the pressure ratio.
    /// Back transport is driven by shear and opposed by pressure:
    ///
    /// ```text
    /// alpha_c0 = max(0, eps_slope · X_EPS/X_MLSS + eps_intercept)
    /// alpha_c  = alpha_c0 · (TMP / critical_pressure)²
    /// m_rback  = back_transport_coefficient · (tau_w − pressure_weight · TMP)
    /// ```
    PressurePowerLaw {
        critical_pressure: Pressure,
        eps_slope: SpecificCakeResistance,
        eps_intercept: SpecificCakeResistance,
        back_transport_coefficient: InverseVelocity,
        pressure_weight: f64,
    },
    /// Constant cake resistance with back transport proportional to the
    /// mixed-liquor solids: `m_rback = back_transport_velocity · X_MLSS`.
    BackTransport {
        specific_cake_resistance: SpecificCakeResistance,
        back_transport_velocity: Velocity,
    },
}

impl Default for CakeModel {
    fn default() -> Self {
        Self::PressurePowerLaw {
            critical_pressure: Pressure::new::<kilopascal>(20.0),
            eps_slope: meters_per_kilogram(1.966e9),
            eps_intercept: meters_per_kilogram(2.564e13),
            back_transport_coefficient: seconds_per_meter(2e-3),
            pressure_weight: 1e-5,
        }
    }
}

impl CakeModel {
    fn validate(&self) -> Result<(), ParameterError> {
        match *self {
            Self::PressurePowerLaw {
                critical_pressure,
                eps_slope,
                eps_intercept,
                back_transport_coefficient,
                pressure_weight,
            } => {
                positive("critical_pressure", critical_pressure)?;
                non_negative("back_transport_coefficient", back_transport_coefficient)?;
                non_negative("pressure_weight", pressure_weight)?;
                for (name, value) in [
                    ("eps_slope", eps_slope.value),
                    ("eps_intercept", eps_intercept.value),
                ] {
                    if !value.is_finite() {
                        return Err(ParameterError::Invalid {
                            name,
                            source: ConstraintError::NotFinite,
                        });
                    }
                }
                Ok(())
            }
            Self::BackTransport {
                specific_cake_resistance,
                back_transport_velocity,
            } => {
                non_negative("specific_cake_resistance", specific_cake_resistance)?;
                non_negative("back_transport_velocity", back_transport_velocity)?;
                Ok(())
            }
        }
    }
}

/// Membrane, fluid, and fouling-law constants.
///
/// Quantities are serialised as plain numbers in SI base units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MembraneParameters {
    /// Intrinsic resistance of the clean membrane, `R_m`.
    pub clean_resistance: HydraulicResistance,
    /// Permeate viscosity.
    pub viscosity: DynamicViscosity,
    /// Membrane area per unit reactor volume.
    pub membrane_density: SpecificArea,
    /// Proportionality constant of irreversible fouling, `k_i`.
    pub irreversible_coefficient: IrreversibleFoulingCoefficient,
    /// Flux sensitivity of irreversible fouling, `b`.
    pub flux_exponent: InverseVelocity,
    pub air_scouring: AirScouring,
    pub cake: CakeModel,
}

impl Default for MembraneParameters {
    fn default() -> Self {
        Self {
            clean_resistance: per_meter(1e12),
            viscosity: DynamicViscosity::new::<pascal_second>(1e-3),
            membrane_density: square_meters_per_cubic_meter(25.0),
            irreversible_coefficient: irreversible_fouling_coefficient(1e3),
            flux_exponent: seconds_per_meter(1e5),
            air_scouring: AirScouring::default(),
            cake: CakeModel::default(),
        }
    }
}

impl MembraneParameters {
    /// Checks every membrane constant.
    ///
    /// # Errors
    ///
    /// Returns the first parameter outside its physical range.
    pub fn validate(&self) -> Result<(), ParameterError> {
        positive("clean_resistance", self.clean_resistance)?;
        positive("viscosity", self.viscosity)?;
        positive("membrane_density", self.membrane_density)?;
        non_negative("irreversible_coefficient", self.irreversible_coefficient)?;
        non_negative("flux_exponent", self.flux_exponent)?;
        self.air_scouring.validate()?;
        self.cake.validate()
    }

    /// A back-transport cake model, for callers that prefer a fixed
    /// specific cake resistance.
    #[must_use]
    pub fn with_back_transport(
        self,
        specific_cake_resistance: SpecificCakeResistance,
        back_transport_velocity: Velocity,
    ) -> Self {
        Self {
            cake: CakeModel::BackTransport {
                specific_cake_resistance,
                back_transport_velocity,
            },
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::velocity::meter_per_second;

    #[test]
    fn defaults_are_valid() {
        assert!(MembraneParameters::default().validate().is_ok());
    }

    #[test]
    fn zero_viscosity_is_rejected() {
        let params = MembraneParameters {
            viscosity: DynamicViscosity::new::<pascal_second>(0.0),
            ..MembraneParameters::default()
        };
        assert_eq!(
            params.validate(),
            Err(ParameterError::Invalid {
                name: "viscosity",
                source: ConstraintError::Zero,
            })
        );
    }

    #[test]
    fn critical_pressure_must_be_positive() {
        let params = MembraneParameters {
            cake: CakeModel::PressurePowerLaw {
                critical_pressure: Pressure::new::<kilopascal>(0.0),
                eps_slope: meters_per_kilogram(1.966e9),
                eps_intercept: meters_per_kilogram(2.564e13),
                back_transport_coefficient: seconds_per_meter(2e-3),
                pressure_weight: 1e-5,
            },
            ..MembraneParameters::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ParameterError::Invalid {
                name: "critical_pressure",
                ..
            })
        ));
    }

    #[test]
    fn back_transport_variant_is_valid() {
        let params = MembraneParameters::default().with_back_transport(
            meters_per_kilogram(1e12),
            Velocity::new::<meter_per_second>(6e-6),
        );
        assert!(params.validate().is_ok());
        assert!(matches!(params.cake, CakeModel::BackTransport { .. }));
    }
}
