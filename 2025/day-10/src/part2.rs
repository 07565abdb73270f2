use miette::*;
use rayon::prelude::*;

use crate::accumulate::solve_accumulate;
use crate::machine::parse_machines;
use crate::SolverConfig;

#[tracing::instrument]
pub fn process(input: &str) -> Result<String> {
    let machines = parse_machines(input)?;
    let config = SolverConfig::default();

    let total: u64 = machines
        .par_iter()
        .map(|m| solve_accumulate(m, &config))
        .sum::<Result<u64, _>>()?;

    Ok(total.to_string())
}
