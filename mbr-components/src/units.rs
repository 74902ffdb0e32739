//! Unit aliases and conversions used across the MBR models.
//!
//! Quantities without a named `uom` type are declared directly from their
//! ISQ dimension exponents `<L, M, T, I, Th, N, J>`.
//! Values of these types are built with the constructor functions below,
//! which take SI base units.
//!
//! Biokinetic arithmetic uses the conventional activated-sludge model units
//! (grams per cubic meter, cubic meters, days).
//! The helpers at the bottom of this module are the only place those
//! conversions happen.

use std::marker::PhantomData;

use uom::{
    si::{
        Dimension, ISQ, Quantity, SI,
        f64::{MassConcentration, MolarConcentration, ThermodynamicTemperature, VolumeRate},
        mass_concentration::kilogram_per_cubic_meter,
        molar_concentration::mole_per_cubic_meter,
        thermodynamic_temperature::degree_celsius,
        volume_rate::cubic_meter_per_second,
    },
    typenum::{N1, N2, P1, P4, Z0},
};

/// Hydraulic resistance of a membrane or fouling layer, 1/m in SI.
pub type HydraulicResistance = Quantity<ISQ<N1, Z0, Z0, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Rate of change of hydraulic resistance, 1/(m·s) in SI.
pub type HydraulicResistanceRate = Quantity<ISQ<N1, Z0, N1, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Specific cake resistance, m/kg in SI.
pub type SpecificCakeResistance = Quantity<ISQ<P1, N1, Z0, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Mass flux through a surface, kg/(m²·s) in SI.
pub type MassFlux = Quantity<ISQ<N2, P1, N1, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Surface area per unit volume, m²/m³ in SI.
///
/// Used for membrane packing density.
/// Shares its dimension with [`HydraulicResistance`].
pub type SpecificArea = Quantity<ISQ<N1, Z0, Z0, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Reciprocal velocity, s/m in SI.
pub type InverseVelocity = Quantity<ISQ<N1, Z0, P1, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Proportionality constant of the irreversible fouling law, m⁴·s/kg² in SI.
pub type IrreversibleFoulingCoefficient =
    Quantity<ISQ<P4, N2, P1, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Seconds per day, the conversion between SI time and biokinetic time.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Grams per kilogram.
const GRAMS_PER_KILOGRAM: f64 = 1_000.0;

/// Builds a quantity directly from its value in SI base units.
fn from_si<D>(value: f64) -> Quantity<D, SI<f64>, f64>
where
    D: Dimension + ?Sized,
{
    Quantity {
        dimension: PhantomData,
        units: PhantomData,
        value,
    }
}

/// Creates a [`HydraulicResistance`] from a value in 1/m.
#[must_use]
pub fn per_meter(value: f64) -> HydraulicResistance {
    from_si(value)
}

/// Creates a [`SpecificArea`] from a value in m²/m³.
#[must_use]
pub fn square_meters_per_cubic_meter(value: f64) -> SpecificArea {
    from_si(value)
}

/// Creates a [`SpecificCakeResistance`] from a value in m/kg.
#[must_use]
pub fn meters_per_kilogram(value: f64) -> SpecificCakeResistance {
    from_si(value)
}

/// Creates a [`MassFlux`] from a value in kg/(m²·s).
#[must_use]
pub fn kilograms_per_square_meter_second(value: f64) -> MassFlux {
    from_si(value)
}

/// Creates an [`InverseVelocity`] from a value in s/m.
#[must_use]
pub fn seconds_per_meter(value: f64) -> InverseVelocity {
    from_si(value)
}

/// Creates an [`IrreversibleFoulingCoefficient`] from a value in m⁴·s/kg².
#[must_use]
pub fn irreversible_fouling_coefficient(value: f64) -> IrreversibleFoulingCoefficient {
    from_si(value)
}

/// Creates a [`HydraulicResistanceRate`] from a value in 1/(m·s).
#[must_use]
pub fn per_meter_second(value: f64) -> HydraulicResistanceRate {
    from_si(value)
}

/// Returns a mass concentration in g/m³.
#[must_use]
pub fn grams_per_cubic_meter(concentration: MassConcentration) -> f64 {
    concentration.get::<kilogram_per_cubic_meter>() * GRAMS_PER_KILOGRAM
}

/// Creates a mass concentration from a value in g/m³.
#[must_use]
pub fn from_grams_per_cubic_meter(value: f64) -> MassConcentration {
    MassConcentration::new::<kilogram_per_cubic_meter>(value / GRAMS_PER_KILOGRAM)
}

/// Returns a molar concentration in mol/m³.
#[must_use]
pub fn moles_per_cubic_meter(concentration: MolarConcentration) -> f64 {
    concentration.get::<mole_per_cubic_meter>()
}

/// Returns a volumetric flow rate in m³/d.
#[must_use]
pub fn cubic_meters_per_day(rate: VolumeRate) -> f64 {
    rate.get::<cubic_meter_per_second>() * SECONDS_PER_DAY
}

/// Creates a volumetric flow rate from a value in m³/d.
#[must_use]
pub fn from_cubic_meters_per_day(value: f64) -> VolumeRate {
    VolumeRate::new::<cubic_meter_per_second>(value / SECONDS_PER_DAY)
}

/// Returns a temperature in °C, the basis of the Arrhenius corrections.
#[must_use]
pub fn celsius(temperature: ThermodynamicTemperature) -> f64 {
    temperature.get::<degree_celsius>()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        dynamic_viscosity::pascal_second,
        f64::{DynamicViscosity, Pressure, Velocity},
        pressure::pascal,
        velocity::meter_per_second,
    };

    #[test]
    fn concentration_round_trip_in_model_units() {
        let c = from_grams_per_cubic_meter(13_400.0);
        assert_relative_eq!(c.get::<kilogram_per_cubic_meter>(), 13.4);
        assert_relative_eq!(grams_per_cubic_meter(c), 13_400.0);
    }

    #[test]
    fn flow_in_cubic_meters_per_day() {
        let q = from_cubic_meters_per_day(18_446.33);
        assert_relative_eq!(
            q.get::<cubic_meter_per_second>(),
            18_446.33 / 86_400.0
        );
        assert_relative_eq!(cubic_meters_per_day(q), 18_446.33, epsilon = 1e-9);
    }

    #[test]
    fn darcy_law_produces_pressure() {
        let flux = Velocity::new::<meter_per_second>(5.0e-6);
        let viscosity = DynamicViscosity::new::<pascal_second>(1.0e-3);
        let resistance = per_meter(1.0e12);

        let tmp: Pressure = flux * viscosity * resistance;

        assert_relative_eq!(tmp.get::<pascal>(), 5_000.0, epsilon = 1e-9);
    }
}
