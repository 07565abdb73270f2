use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use miette::*;
use rayon::prelude::*;

use aoc2025_day_10::{parse_machines, Solver};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let input = include_str!("../../input2.txt");
    let machines = parse_machines(input)?;
    let solver = Solver::default();

    // Machines with many buttons dominate the runtime, so show where we are.
    let progress = ProgressBar::new(machines.len() as u64).with_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} machines [{elapsed_precise}]")
            .into_diagnostic()?,
    );

    let result: u64 = machines
        .par_iter()
        .progress_with(progress)
        .map(|m| solver.solve_accumulate(m))
        .sum::<Result<u64, _>>()?;

    println!("Result: {}", result);
    Ok(())
}
