use nalgebra::{DMatrix, DVector};
use rayon::iter::{ParallelBridge, ParallelIterator};

use crate::combinations::Combinations;
use crate::config::SolverConfig;
use crate::error::{Mode, Rejection, SolveError};
use crate::free_vars::{best_one_free, best_two_free};
use crate::linear::{self, incidence_matrix, SubsetShape};
use crate::machine::Machine;
use crate::verify::{as_press_count, total_presses, verify};

/// Read-only data shared by every subset evaluation of one machine.
struct Search<'a> {
    buttons: &'a [Vec<usize>],
    targets: &'a [u64],
    incidence: DMatrix<f64>,
    b: DVector<f64>,
    /// Largest target value, the natural ceiling for any single press count.
    t_upper: u64,
    config: &'a SolverConfig,
}

impl Search<'_> {
    fn evaluate(&self, subset: &[usize]) -> Option<u64> {
        let a = self.incidence.select_columns(subset);
        let check = |presses: &[u64]| verify(self.buttons, self.targets, subset, presses);

        match SubsetShape::classify(self.targets.len(), subset.len())? {
            SubsetShape::Overdetermined | SubsetShape::Square => {
                let outcome = linear::solve(&a, &self.b, self.config).and_then(|x| {
                    let presses = x
                        .iter()
                        .map(|&v| as_press_count(v, self.config.integrality_tolerance))
                        .collect::<Result<Vec<u64>, Rejection>>()?;
                    check(&presses)?;
                    Ok(total_presses(&presses))
                });

                outcome
                    .inspect_err(|rejection| {
                        tracing::trace!(%rejection, ?subset, "subset pruned")
                    })
                    .ok()
            }
            SubsetShape::OneFree => best_one_free(&a, &self.b, self.t_upper, self.config, check),
            SubsetShape::TwoFree => best_two_free(&a, &self.b, self.t_upper, self.config, check),
        }
    }
}

/// Fewest total presses that drive every joltage counter to exactly its target.
///
/// Subsets of `1..=min(m + 2, n)` buttons are searched, where `m` is the
/// counter count; each is solved as a linear system (or a one/two free
/// variable family) and every candidate is replayed with integer arithmetic.
#[tracing::instrument(
    skip_all,
    fields(buttons = machine.num_buttons(), counters = machine.target_joltages().len())
)]
pub fn solve_accumulate(machine: &Machine, config: &SolverConfig) -> Result<u64, SolveError> {
    let targets = machine.target_joltages();
    if targets.iter().all(|&t| t == 0) {
        return Ok(0);
    }

    let buttons = machine.buttons();
    let num_targets = targets.len();
    let num_buttons = buttons.len();

    let search = Search {
        buttons,
        targets,
        incidence: incidence_matrix(buttons, num_targets),
        b: DVector::from_iterator(num_targets, targets.iter().map(|&t| t as f64)),
        t_upper: targets.iter().copied().max().unwrap_or(0),
        config,
    };

    let mut best: Option<u64> = None;
    for size in 1..=(num_targets + 2).min(num_buttons) {
        let size_best = Combinations::new(num_buttons, size)
            .par_bridge()
            .filter_map(|subset| search.evaluate(&subset))
            .min();

        if let Some(total) = size_best {
            tracing::trace!(size, total, "subset size produced a candidate");
            best = Some(best.map_or(total, |b| b.min(total)));
        }
    }

    match best {
        Some(total) => {
            tracing::debug!(total, "counters matched");
            Ok(total)
        }
        None => Err(SolveError::Infeasible {
            mode: Mode::Accumulate,
        }),
    }
}
