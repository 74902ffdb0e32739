//! # Scenario Sweep
//!
//! Runs the seven reference scenarios (mixed-liquor solids, feed oxygen, and
//! temperature varied around a 15 g/L, 1 mg/L, 20 °C baseline) for one day
//! and compares end-of-run effluent quality and fouling.
//!
//! ```sh
//! cargo run --example scenario_sweep --features parallel
//! ```

use std::{error::Error, time::Duration};

use log::{LevelFilter, warn};
use mbr_components::{
    MbrConfig, MbrModel,
    scenario::{Scenario, run_sweep},
    units::grams_per_cubic_meter,
};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use uom::si::pressure::kilopascal;

const DURATION: Duration = Duration::from_secs(24 * 3_600);
const STEP: Duration = Duration::from_secs(15 * 60);

fn main() -> Result<(), Box<dyn Error>> {
    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let model = MbrModel::new(&MbrConfig::default())?;
    let scenarios = Scenario::reference_sweep();

    println!(
        "{:<14} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "scenario", "COD", "SMP", "X_EPS", "TN", "TMP [kPa]"
    );

    for (scenario, result) in scenarios.iter().zip(run_sweep(&model, &scenarios, DURATION, STEP)) {
        let summaries = match result {
            Ok(summaries) => summaries,
            Err(err) => {
                warn!("scenario `{}` failed: {err}", scenario.name);
                continue;
            }
        };
        let Some(last) = summaries.last() else {
            continue;
        };

        println!(
            "{:<14} {:>10.2} {:>10.2} {:>10.3} {:>10.2} {:>10.3}",
            scenario.name,
            grams_per_cubic_meter(last.total_cod),
            grams_per_cubic_meter(last.smp),
            grams_per_cubic_meter(last.x_eps),
            grams_per_cubic_meter(last.total_nitrogen),
            last.tmp.get::<kilopascal>(),
        );
    }

    Ok(())
}
