//! Minimum button presses for the factory machines of Advent of Code 2025, day 10.
//!
//! Part 1 toggles indicator lights (each button pressed at most once); part 2
//! accumulates joltage counters (buttons pressed any number of times).

pub mod accumulate;
pub mod combinations;
pub mod config;
pub mod error;
pub mod free_vars;
pub mod linear;
pub mod machine;
pub mod part1;
pub mod part2;
pub mod toggle;
pub mod verify;

use rayon::prelude::*;

pub use config::SolverConfig;
pub use error::{Mode, SolveError};
pub use machine::{parse_machines, Machine};

/// Per-part sums over a batch of machines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Totals {
    pub toggle: u64,
    pub accumulate: u64,
}

/// Both solvers bound to one configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn solve_toggle(&self, machine: &Machine) -> Result<u64, SolveError> {
        toggle::solve_toggle(machine, &self.config)
    }

    pub fn solve_accumulate(&self, machine: &Machine) -> Result<u64, SolveError> {
        accumulate::solve_accumulate(machine, &self.config)
    }

    /// Solves every machine in parallel. The first failing machine is reported by index.
    #[tracing::instrument(skip_all, fields(machines = machines.len()))]
    pub fn solve_all(&self, machines: &[Machine]) -> Result<Totals, SolveError> {
        machines
            .par_iter()
            .enumerate()
            .map(|(index, machine)| -> Result<Totals, SolveError> {
                let toggle = self
                    .solve_toggle(machine)
                    .map_err(|e| e.at_machine(index))?;
                let accumulate = self
                    .solve_accumulate(machine)
                    .map_err(|e| e.at_machine(index))?;
                Ok(Totals { toggle, accumulate })
            })
            .try_reduce(Totals::default, |a, b| {
                Ok(Totals {
                    toggle: a.toggle + b.toggle,
                    accumulate: a.accumulate + b.accumulate,
                })
            })
    }
}

/// Part-1 answer for one machine with the default configuration.
pub fn solve_toggle(machine: &Machine) -> Result<u64, SolveError> {
    Solver::default().solve_toggle(machine)
}

/// Part-2 answer for one machine with the default configuration.
pub fn solve_accumulate(machine: &Machine) -> Result<u64, SolveError> {
    Solver::default().solve_accumulate(machine)
}
