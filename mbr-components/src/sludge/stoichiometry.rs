use super::{Component, ComponentVector, Process, ProcessRates, StoichiometricParameters};

/// Molecular weight of nitrogen, used to express nitrogen species as charge.
const N: f64 = 14.0;

/// Oxygen equivalent of nitrate reduced to dinitrogen, gCOD/gN.
const NITRATE_TO_N2_OXYGEN: f64 = 40.0 / N;

/// Oxygen equivalent of nitrate, gCOD/gN.
const NITRATE_OXYGEN: f64 = 64.0 / N;

/// Oxygen equivalent of dinitrogen, gCOD/gN.
const N2_OXYGEN: f64 = 24.0 / N;

/// The 13×17 Petersen matrix of stoichiometric coefficients.
///
/// Rows follow [`Process::ALL`] and columns follow [`Component::ALL`].
/// A matrix is built once by [`build_matrix`] and never changes afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PetersenMatrix {
    rows: [[f64; Component::COUNT]; Process::COUNT],
}

/// Builds the Petersen matrix from stoichiometric parameters.
///
/// Oxygen, nitrate, and ammonia coefficients of the growth processes are
/// derived from continuity, so every growth row conserves both ThOD and
/// nitrogen for any parameter set. Nitrification also conserves charge.
#[must_use]
pub fn build_matrix(p: &StoichiometricParameters) -> PetersenMatrix {
    use Component as C;
    use Process as P;

    let mut m = PetersenMatrix {
        rows: [[0.0; Component::COUNT]; Process::COUNT],
    };

    // Nitrogen bound in newly grown heterotrophic biomass and its EPS.
    let n_growth = p.i_xb * (1.0 - p.f_eps_h) + p.i_xeps * p.f_eps_h;

    let oxygen_on_substrate = 1.0 - (1.0 - p.gamma_h) / p.y_h;
    let oxygen_on_smp = 1.0 - 1.0 / p.y_smp;

    let ammonia_on_substrate = -n_growth;
    let ammonia_on_bap = p.i_xbap / p.y_smp - n_growth;
    let ammonia_on_uap = -n_growth;

    let anoxic_alkalinity = (1.0 - p.y_h) / (40.0 * p.y_h) - p.i_xb / N;

    m.set(P::Ammonification, C::SNh, 1.0);
    m.set(P::Ammonification, C::SNd, -1.0);
    m.set(P::Ammonification, C::SAlk, 1.0 / N);

    for (aerobic, anoxic, substrate, consumed, oxygen, ammonia) in [
        (
            P::AerobicGrowthOnSubstrate,
            P::AnoxicGrowthOnSubstrate,
            C::SS,
            -1.0 / p.y_h,
            oxygen_on_substrate,
            ammonia_on_substrate,
        ),
        (
            P::AerobicGrowthOnBap,
            P::AnoxicGrowthOnBap,
            C::SBap,
            -1.0 / p.y_smp,
            oxygen_on_smp,
            ammonia_on_bap,
        ),
        (
            P::AerobicGrowthOnUap,
            P::AnoxicGrowthOnUap,
            C::SUap,
            -1.0 / p.y_smp,
            oxygen_on_smp,
            ammonia_on_uap,
        ),
    ] {
        for process in [aerobic, anoxic] {
            m.set(process, substrate, consumed);
            m.set(process, C::XH, 1.0 - p.f_eps_h);
            m.set(process, C::XEps, p.f_eps_h);
            m.set(process, C::SNh, ammonia);
        }
        if substrate == C::SS {
            m.set(aerobic, C::SUap, p.gamma_h / p.y_h);
            m.set(anoxic, C::SUap, p.gamma_h / p.y_h);
        }

        m.set(aerobic, C::SO, oxygen);
        m.set(aerobic, C::SAlk, -p.i_xb / N);

        let nitrate = oxygen / NITRATE_TO_N2_OXYGEN;
        m.set(anoxic, C::SNo, nitrate);
        m.set(anoxic, C::SN2, -nitrate);
        m.set(anoxic, C::SAlk, anoxic_alkalinity);
    }

    for (decay, biomass, f_eps) in [
        (P::HeterotrophDecay, C::XH, p.f_eps_dh),
        (P::AutotrophDecay, C::XA, p.f_eps_da),
    ] {
        m.set(decay, C::XS, 1.0 - p.f_p - f_eps - p.f_bap);
        m.set(decay, biomass, -1.0);
        m.set(decay, C::XEps, f_eps);
        m.set(decay, C::SBap, p.f_bap);
        m.set(decay, C::XP, p.f_p);
        m.set(
            decay,
            C::XNd,
            p.i_xb - p.f_p * p.i_xp - f_eps * p.i_xeps - p.f_bap * p.i_xbap,
        );
    }

    m.set(P::Hydrolysis, C::SS, 1.0);
    m.set(P::Hydrolysis, C::XS, -1.0);

    m.set(P::NitrogenHydrolysis, C::SNd, 1.0);
    m.set(P::NitrogenHydrolysis, C::XNd, -1.0);

    m.set(P::EpsHydrolysis, C::SS, p.f_s);
    m.set(P::EpsHydrolysis, C::XEps, -1.0);
    m.set(P::EpsHydrolysis, C::SUap, 1.0 - p.f_s);
    m.set(P::EpsHydrolysis, C::SNd, p.i_xeps - p.i_xbap * (1.0 - p.f_s));

    m.set(P::AutotrophGrowth, C::XEps, p.f_eps_a);
    m.set(P::AutotrophGrowth, C::SUap, p.gamma_a / p.y_a);
    m.set(P::AutotrophGrowth, C::XA, 1.0 - p.f_eps_a);
    let n_nitrifiers = p.i_xb * (1.0 - p.f_eps_a) + p.i_xeps * p.f_eps_a;
    m.set(
        P::AutotrophGrowth,
        C::SO,
        -(NITRATE_OXYGEN - p.y_a - p.gamma_a) / p.y_a,
    );
    m.set(P::AutotrophGrowth, C::SNo, 1.0 / p.y_a);
    m.set(P::AutotrophGrowth, C::SNh, -n_nitrifiers - 1.0 / p.y_a);
    m.set(
        P::AutotrophGrowth,
        C::SAlk,
        -n_nitrifiers / N - 1.0 / (7.0 * p.y_a),
    );

    m
}

impl PetersenMatrix {
    fn set(&mut self, process: Process, component: Component, value: f64) {
        self.rows[process.index()][component.index()] = value;
    }

    /// The stoichiometric coefficient of `component` in `process`.
    #[must_use]
    pub fn coefficient(&self, process: Process, component: Component) -> f64 {
        self.rows[process.index()][component.index()]
    }

    /// The full row of a process.
    #[must_use]
    pub fn row(&self, process: Process) -> &[f64; Component::COUNT] {
        &self.rows[process.index()]
    }

    /// Maps process rates onto component rates of change (`νᵀ·ρ`).
    #[must_use]
    pub fn component_rates(&self, rates: &ProcessRates) -> ComponentVector {
        ComponentVector::from_fn(|component| {
            rates
                .iter()
                .map(|(process, rate)| self.coefficient(process, component) * rate)
                .sum()
        })
    }

    /// Conservation residuals of every process against a composition matrix.
    ///
    /// Entry `[process][conservation]` is zero when the process conserves
    /// that quantity.
    #[must_use]
    pub fn continuity(
        &self,
        composition: &CompositionMatrix,
    ) -> [[f64; Conservation::COUNT]; Process::COUNT] {
        let mut residuals = [[0.0; Conservation::COUNT]; Process::COUNT];
        for process in Process::ALL {
            for conservation in Conservation::ALL {
                residuals[process.index()][conservation as usize] =
                    composition.residual(self.row(process), conservation);
            }
        }
        residuals
    }
}

/// A quantity conserved by the biochemical processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conservation {
    /// Theoretical oxygen demand, gCOD.
    TheoreticalOxygenDemand,
    /// Total nitrogen, gN.
    Nitrogen,
    /// Ionic charge, mol.
    Charge,
}

impl Conservation {
    /// Number of conserved quantities.
    pub const COUNT: usize = 3;

    /// All conserved quantities in composition-matrix row order.
    pub const ALL: [Conservation; Conservation::COUNT] = [
        Conservation::TheoreticalOxygenDemand,
        Conservation::Nitrogen,
        Conservation::Charge,
    ];
}

/// Content of each conserved quantity per unit of each component.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionMatrix {
    rows: [[f64; Component::COUNT]; Conservation::COUNT],
}

impl CompositionMatrix {
    /// Builds the composition matrix from nitrogen contents.
    #[must_use]
    pub fn new(p: &StoichiometricParameters) -> Self {
        let thod = ComponentVector::from_fn(|component| match component {
            Component::SO => -1.0,
            Component::SNo => -NITRATE_OXYGEN,
            Component::SN2 => -N2_OXYGEN,
            Component::SNh | Component::SNd | Component::XNd | Component::SAlk => 0.0,
            _ => 1.0,
        });

        let nitrogen = ComponentVector::from_fn(|component| match component {
            Component::XH | Component::XA => p.i_xb,
            Component::XEps => p.i_xeps,
            Component::SBap => p.i_xbap,
            Component::XP => p.i_xp,
            Component::SNo
            | Component::SN2
            | Component::SNh
            | Component::SNd
            | Component::XNd => 1.0,
            _ => 0.0,
        });

        let charge = ComponentVector::from_fn(|component| match component {
            Component::SNo => -1.0 / N,
            Component::SNh => 1.0 / N,
            Component::SAlk => -1.0,
            _ => 0.0,
        });

        Self {
            rows: [*thod.as_array(), *nitrogen.as_array(), *charge.as_array()],
        }
    }

    /// Content of `conservation` per unit of `component`.
    #[must_use]
    pub fn content(&self, conservation: Conservation, component: Component) -> f64 {
        self.rows[conservation as usize][component.index()]
    }

    /// Net production of `conservation` by one unit of a process row.
    #[must_use]
    pub fn residual(&self, row: &[f64; Component::COUNT], conservation: Conservation) -> f64 {
        self.rows[conservation as usize]
            .iter()
            .zip(row)
            .map(|(content, coefficient)| content * coefficient)
            .sum()
    }
}
