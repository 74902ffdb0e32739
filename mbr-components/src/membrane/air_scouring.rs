use mbr_core::constraint::ConstraintError;
use serde::{Deserialize, Serialize};
use uom::si::{
    f64::{MassConcentration, Pressure, ThermodynamicTemperature, Velocity},
    mass_concentration::kilogram_per_cubic_meter,
    pressure::pascal,
    velocity::centimeter_per_second,
};

use crate::{sludge::ParameterError, units::celsius};

/// Empirical wall-shear correlation for air-scoured membranes.
///
/// Shear stress is a cubic in the superficial gas velocity `v` (cm/s):
///
/// ```text
/// tau_w = p1·v³ + p2·v² + p3·v + p4    [Pa]
/// ```
///
/// Each `pk` is a surface in suspended solids `X` (kg/m³) and liquid
/// temperature `T` (°C):
///
/// ```text
/// pk = a1 + a2·X + a3·T + a4·X² + a5·X·T
/// ```
///
/// The regression is only meaningful over the range it was fitted on;
/// values outside it are returned as computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AirScouring {
    /// `[a1, a2, a3, a4, a5]` for `p1` through `p4`.
    pub coefficients: [[f64; 5]; 4],
}

impl Default for AirScouring {
    fn default() -> Self {
        Self {
            coefficients: [
                [-9.884e-3, -1.106e-4, 1.256e-5, 1.669e-6, -3.722e-7],
                [4.231e-2, 3.862e-4, -9.708e-5, 3.378e-6, 4.288e-6],
                [0.2627, 6.695e-3, -5.703e-4, -3.598e-5, -5.445e-5],
                [-0.151, -2.212e-3, -4.014e-4, 1.985e-4, 8.685e-7],
            ],
        }
    }
}

impl AirScouring {
    pub(super) fn validate(&self) -> Result<(), ParameterError> {
        if self.coefficients.iter().flatten().all(|a| a.is_finite()) {
            Ok(())
        } else {
            Err(ParameterError::Invalid {
                name: "air_scouring.coefficients",
                source: ConstraintError::NotFinite,
            })
        }
    }

    /// Wall shear stress induced by scouring air.
    #[must_use]
    pub fn shear_stress(
        &self,
        v_sg: Velocity,
        x_tss: MassConcentration,
        temperature: ThermodynamicTemperature,
    ) -> Pressure {
        let v = v_sg.get::<centimeter_per_second>();
        let x = x_tss.get::<kilogram_per_cubic_meter>();
        let t = celsius(temperature);

        let [p1, p2, p3, p4] =
            self.coefficients
                .map(|[a1, a2, a3, a4, a5]| a1 + a2 * x + a3 * t + a4 * x * x + a5 * x * t);

        Pressure::new::<pascal>(((p1 * v + p2) * v + p3) * v + p4)
    }
}
