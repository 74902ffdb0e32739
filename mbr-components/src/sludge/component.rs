use std::ops::{Index, IndexMut};

use thiserror::Error;
use uom::si::f64::{MassConcentration, MolarConcentration};
use uom::si::molar_concentration::mole_per_cubic_meter;

use crate::units::{from_grams_per_cubic_meter, grams_per_cubic_meter, moles_per_cubic_meter};

/// A tracked state component of the activated-sludge model.
///
/// The discriminant order is the column order of the Petersen matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Component {
    /// Soluble inert organic matter.
    SI,
    /// Readily biodegradable substrate.
    SS,
    /// Particulate inert organic matter.
    XI,
    /// Slowly biodegradable substrate.
    XS,
    /// Active heterotrophic biomass.
    XH,
    /// Extracellular polymeric substances.
    XEps,
    /// Utilization-associated soluble microbial products.
    SUap,
    /// Biomass-associated soluble microbial products.
    SBap,
    /// Active autotrophic biomass.
    XA,
    /// Particulate products arising from biomass decay.
    XP,
    /// Dissolved oxygen.
    SO,
    /// Nitrate and nitrite nitrogen.
    SNo,
    /// Dinitrogen.
    SN2,
    /// Ammonium and ammonia nitrogen.
    SNh,
    /// Soluble biodegradable organic nitrogen.
    SNd,
    /// Particulate biodegradable organic nitrogen.
    XNd,
    /// Alkalinity.
    SAlk,
}

/// The unit a component's concentration is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentUnit {
    /// g COD/m³ (oxygen is carried as negative COD).
    GramCod,
    /// g N/m³.
    GramNitrogen,
    /// mol HCO₃⁻/m³.
    MoleBicarbonate,
}

impl ComponentUnit {
    /// Returns `true` if the unit is an amount of substance rather than a mass.
    #[must_use]
    pub fn is_molar(self) -> bool {
        matches!(self, ComponentUnit::MoleBicarbonate)
    }

    /// Returns the unit label used in reports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ComponentUnit::GramCod => "gCOD/m3",
            ComponentUnit::GramNitrogen => "gN/m3",
            ComponentUnit::MoleBicarbonate => "molHCO3/m3",
        }
    }
}

impl Component {
    /// Number of tracked components.
    pub const COUNT: usize = 17;

    /// All components in Petersen matrix column order.
    pub const ALL: [Component; Component::COUNT] = [
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
        Component::SO,
        Component::SNo,
        Component::SN2,
        Component::SNh,
        Component::SNd,
        Component::XNd,
        Component::SAlk,
    ];

    /// Column index of this component.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Conventional symbol, e.g. `"S_NH"`.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Component::SI => "S_I",
            Component::SS => "S_S",
            Component::XI => "X_I",
            Component::XS => "X_S",
            Component::XH => "X_H",
            Component::XEps => "X_EPS",
            Component::SUap => "S_UAP",
            Component::SBap => "S_BAP",
            Component::XA => "X_A",
            Component::XP => "X_P",
            Component::SO => "S_O",
            Component::SNo => "S_NO",
            Component::SN2 => "S_N2",
            Component::SNh => "S_NH",
            Component::SNd => "S_ND",
            Component::XNd => "X_ND",
            Component::SAlk => "S_ALK",
        }
    }

    /// Looks a component up by its symbol.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Component> {
        Component::ALL.into_iter().find(|c| c.symbol() == symbol)
    }

    /// Unit this component's concentration is expressed in.
    #[must_use]
    pub fn unit(self) -> ComponentUnit {
        match self {
            Component::SNo
            | Component::SN2
            | Component::SNh
            | Component::SNd
            | Component::XNd => ComponentUnit::GramNitrogen,
            Component::SAlk => ComponentUnit::MoleBicarbonate,
            _ => ComponentUnit::GramCod,
        }
    }
}

/// A unit-tagged concentration at the boundary of the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Concentration {
    Mass(MassConcentration),
    Molar(MolarConcentration),
}

/// Errors raised when a concentration cannot be stored for a component.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConcentrationError {
    #[error("{component:?} is measured in {expected}, got an incompatible quantity")]
    UnitMismatch {
        component: Component,
        expected: &'static str,
    },
    #[error("{component:?} concentration must be finite and non-negative, got {value}")]
    Invalid { component: Component, value: f64 },
}

/// One value per [`Component`], indexed by component.
///
/// When used for concentrations, values are in model units
/// (see [`Component::unit`]).
/// The same layout holds rates of change and composition weights.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ComponentVector([f64; Component::COUNT]);

impl ComponentVector {
    /// A vector of zeros.
    #[must_use]
    pub fn zeros() -> Self {
        Self([0.0; Component::COUNT])
    }

    /// Wraps raw values given in Petersen column order.
    #[must_use]
    pub fn from_array(values: [f64; Component::COUNT]) -> Self {
        Self(values)
    }

    /// Builds a vector by evaluating `f` for each component.
    pub fn from_fn(mut f: impl FnMut(Component) -> f64) -> Self {
        Self(std::array::from_fn(|i| f(Component::ALL[i])))
    }

    /// Raw values in Petersen column order.
    #[must_use]
    pub fn as_array(&self) -> &[f64; Component::COUNT] {
        &self.0
    }

    /// Iterates over `(component, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (Component, f64)> + '_ {
        Component::ALL.into_iter().zip(self.0.iter().copied())
    }

    /// Sum of the values for the given components.
    #[must_use]
    pub fn sum_of(&self, components: &[Component]) -> f64 {
        components.iter().map(|&c| self[c]).sum()
    }

    /// Returns the unit-tagged concentration of `component`.
    #[must_use]
    pub fn concentration(&self, component: Component) -> Concentration {
        let value = self[component];
        if component.unit().is_molar() {
            Concentration::Molar(MolarConcentration::new::<mole_per_cubic_meter>(value))
        } else {
            Concentration::Mass(from_grams_per_cubic_meter(value))
        }
    }

    /// Stores a unit-tagged concentration for `component`.
    ///
    /// # Errors
    ///
    /// Returns [`ConcentrationError::UnitMismatch`] if a mass concentration is
    /// given for alkalinity or a molar concentration for any other component,
    /// and [`ConcentrationError::Invalid`] if the value is negative or not finite.
    pub fn set_concentration(
        &mut self,
        component: Component,
        concentration: Concentration,
    ) -> Result<(), ConcentrationError> {
        let unit = component.unit();
        let value = match (concentration, unit.is_molar()) {
            (Concentration::Mass(c), false) => grams_per_cubic_meter(c),
            (Concentration::Molar(c), true) => moles_per_cubic_meter(c),
            _ => {
                return Err(ConcentrationError::UnitMismatch {
                    component,
                    expected: unit.label(),
                });
            }
        };

        if !value.is_finite() || value < 0.0 {
            return Err(ConcentrationError::Invalid { component, value });
        }

        self.0[component.index()] = value;
        Ok(())
    }

    /// Builder-style variant of [`set_concentration`](Self::set_concentration).
    ///
    /// # Errors
    ///
    /// See [`set_concentration`](Self::set_concentration).
    pub fn with_concentration(
        mut self,
        component: Component,
        concentration: Concentration,
    ) -> Result<Self, ConcentrationError> {
        self.set_concentration(component, concentration)?;
        Ok(self)
    }

    /// Checks that every value is a valid concentration.
    ///
    /// # Errors
    ///
    /// Returns the first component holding a negative or non-finite value.
    pub fn validate(&self) -> Result<(), ConcentrationError> {
        match self.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            Some((component, value)) => Err(ConcentrationError::Invalid { component, value }),
            None => Ok(()),
        }
    }
}

impl Index<Component> for ComponentVector {
    type Output = f64;

    fn index(&self, component: Component) -> &f64 {
        &self.0[component.index()]
    }
}

impl IndexMut<Component> for ComponentVector {
    fn index_mut(&mut self, component: Component) -> &mut f64 {
        &mut self.0[component.index()]
    }
}
