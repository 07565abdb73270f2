use miette::*;
use rayon::prelude::*;

use crate::machine::parse_machines;
use crate::toggle::solve_toggle;
use crate::SolverConfig;

#[tracing::instrument]
pub fn process(input: &str) -> Result<String> {
    let machines = parse_machines(input)?;
    let config = SolverConfig::default();

    let total_presses: u64 = machines
        .par_iter()
        .map(|m| solve_toggle(m, &config))
        .sum::<Result<u64, _>>()?;

    Ok(total_presses.to_string())
}
