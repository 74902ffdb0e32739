use uom::si::f64::{MassConcentration, Pressure, Velocity};

use crate::units::{
    HydraulicResistanceRate, MassFlux, SpecificCakeResistance, grams_per_cubic_meter,
    meters_per_kilogram,
};

use super::{CakeModel, MembraneParameters};

/// Conditions at the membrane surface that drive fouling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoulingDrivers {
    pub flux: Velocity,
    /// Soluble microbial products, `S_UAP + S_BAP`.
    pub smp: MassConcentration,
    pub x_mlss: MassConcentration,
    pub x_tss: MassConcentration,
    pub alpha_c: SpecificCakeResistance,
    pub m_rback: MassFlux,
}

/// Time derivatives of the fouling resistances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResistanceRates {
    pub irreversible: HydraulicResistanceRate,
    pub reversible: HydraulicResistanceRate,
}

/// Evaluates the irreversible and reversible fouling rates.
///
/// ```text
/// dR_i/dt = mu · alpha_c · X_TSS · k_i · exp(b·J) · J · SMP
/// dR_r/dt = alpha_c · (J · X_MLSS − m_rback)
/// ```
///
/// With zero flux the irreversible rate vanishes and the reversible rate
/// reduces to `−alpha_c · m_rback`.
#[must_use]
pub fn resistance_rates(params: &MembraneParameters, drivers: &FoulingDrivers) -> ResistanceRates {
    let FoulingDrivers {
        flux,
        smp,
        x_mlss,
        x_tss,
        alpha_c,
        m_rback,
    } = *drivers;

    let flux_factor = (params.flux_exponent * flux).value.exp();

    ResistanceRates {
        irreversible: params.viscosity
            * alpha_c
            * x_tss
            * params.irreversible_coefficient
            * flux
            * smp
            * flux_factor,
        reversible: alpha_c * (flux * x_mlss - m_rback),
    }
}

/// Cake properties used by the next step's fouling rates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CakeState {
    pub alpha_c: SpecificCakeResistance,
    pub m_rback: MassFlux,
}

/// Inputs to a cake-property refresh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CakeConditions {
    /// EPS concentration in g/m³.
    pub x_eps: f64,
    pub x_mlss: MassConcentration,
    pub tau_w: Pressure,
    pub tmp: Pressure,
}

impl CakeModel {
    /// Computes the specific cake resistance and back-transport flux for the
    /// current pressure and shear.
    #[must_use]
    pub fn refresh(&self, conditions: &CakeConditions) -> CakeState {
        let CakeConditions {
            x_eps,
            x_mlss,
            tau_w,
            tmp,
        } = *conditions;

        match *self {
            Self::PressurePowerLaw {
                critical_pressure,
                eps_slope,
                eps_intercept,
                back_transport_coefficient,
                pressure_weight,
            } => {
                let mlss = grams_per_cubic_meter(x_mlss);
                let eps_fraction = if mlss > 0.0 { x_eps / mlss } else { 0.0 };

                let alpha_c0 = eps_slope * eps_fraction + eps_intercept;
                let alpha_c0 = if alpha_c0.value > 0.0 {
                    alpha_c0
                } else {
                    meters_per_kilogram(0.0)
                };

                let pressure_ratio = (tmp / critical_pressure).value;

                CakeState {
                    alpha_c: alpha_c0 * pressure_ratio.powi(2),
                    m_rback: back_transport_coefficient * (tau_w - tmp * pressure_weight),
                }
            }
            Self::BackTransport {
                specific_cake_resistance,
                back_transport_velocity,
            } => CakeState {
                alpha_c: specific_cake_resistance,
                m_rback: back_transport_velocity * x_mlss,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        mass_concentration::kilogram_per_cubic_meter, pressure::pascal,
        velocity::meter_per_second,
    };

    use crate::units::{kilograms_per_square_meter_second, per_meter_second};

    fn drivers(flux: f64) -> FoulingDrivers {
        FoulingDrivers {
            flux: Velocity::new::<meter_per_second>(flux),
            smp: MassConcentration::new::<kilogram_per_cubic_meter>(0.02),
            x_mlss: MassConcentration::new::<kilogram_per_cubic_meter>(13.4),
            x_tss: MassConcentration::new::<kilogram_per_cubic_meter>(0.2),
            alpha_c: meters_per_kilogram(1e12),
            m_rback: kilograms_per_square_meter_second(5e-5),
        }
    }

    #[test]
    fn zero_flux_leaves_only_back_transport() {
        let rates = resistance_rates(&MembraneParameters::default(), &drivers(0.0));
        assert_eq!(rates.irreversible, per_meter_second(0.0));
        assert_relative_eq!(rates.reversible.value, -1e12 * 5e-5);
    }

    #[test]
    fn fouling_rates_match_hand_calculation() {
        let params = MembraneParameters::default();
        let j = 5e-6;
        let rates = resistance_rates(&params, &drivers(j));

        let irreversible = 1e-3 * 1e12 * 0.2 * 1e3 * (1e5 * j).exp() * j * 0.02;
        let reversible = 1e12 * (j * 13.4 - 5e-5);

        assert_relative_eq!(rates.irreversible.value, irreversible, max_relative = 1e-12);
        assert_relative_eq!(rates.reversible.value, reversible, max_relative = 1e-12);
    }

    #[test]
    fn power_law_scales_with_pressure_ratio() {
        let model = CakeModel::default();
        let conditions = CakeConditions {
            x_eps: 1.41,
            x_mlss: MassConcentration::new::<kilogram_per_cubic_meter>(13.4),
            tau_w: Pressure::new::<pascal>(0.12),
            tmp: Pressure::new::<pascal>(10_000.0),
        };
        let cake = model.refresh(&conditions);

        let alpha_c0 = 1.966e9 * (1.41 / 13_400.0) + 2.564e13;
        assert_relative_eq!(cake.alpha_c.value, alpha_c0 * 0.25, max_relative = 1e-12);
        assert_relative_eq!(
            cake.m_rback.value,
            2e-3 * (0.12 - 1e-5 * 10_000.0),
            max_relative = 1e-12
        );
    }

    #[test]
    fn negative_cake_correlation_is_clamped() {
        let model = CakeModel::PressurePowerLaw {
            critical_pressure: Pressure::new::<pascal>(20_000.0),
            eps_slope: meters_per_kilogram(1.966e9),
            eps_intercept: meters_per_kilogram(-2.564e13),
            back_transport_coefficient: crate::units::seconds_per_meter(2e-3),
            pressure_weight: 1e-5,
        };
        let cake = model.refresh(&CakeConditions {
            x_eps: 1.41,
            x_mlss: MassConcentration::new::<kilogram_per_cubic_meter>(13.4),
            tau_w: Pressure::new::<pascal>(0.12),
            tmp: Pressure::new::<pascal>(5_000.0),
        });
        assert_eq!(cake.alpha_c.value, 0.0);
    }

    #[test]
    fn back_transport_is_proportional_to_solids() {
        let model = CakeModel::BackTransport {
            specific_cake_resistance: meters_per_kilogram(1e12),
            back_transport_velocity: Velocity::new::<meter_per_second>(6e-6),
        };
        let cake = model.refresh(&CakeConditions {
            x_eps: 1.41,
            x_mlss: MassConcentration::new::<kilogram_per_cubic_meter>(10.0),
            tau_w: Pressure::new::<pascal>(0.12),
            tmp: Pressure::new::<pascal>(5_000.0),
        });
        assert_eq!(cake.alpha_c, meters_per_kilogram(1e12));
        assert_relative_eq!(cake.m_rback.value, 6e-5);
    }
}
