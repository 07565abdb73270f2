//! Underdetermined subsets: one or two more buttons than counters.
//!
//! With one free column `t`, the basic presses are affine in `t`:
//! `x_basic(t) = x0 − coef·t`, so the total `sum(x0) + (1 − sum(coef))·t` is
//! minimised at an end of the interval where every basic press stays
//! non-negative. Two free columns enumerate the first and solve the second
//! analytically.

use itertools::Itertools;
use nalgebra::{DMatrix, DVector, Dyn, LU};

use crate::config::SolverConfig;
use crate::error::Rejection;
use crate::linear::factor_square;
use crate::verify::as_press_count;

/// Press counts aligned with the subset's columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub presses: Vec<u64>,
    pub total: u64,
}

/// An `m × (m + 1)` system with one column chosen as the free variable.
///
/// The factorisation and `coef` only depend on the matrix, so one prepared
/// system can be evaluated against many right-hand sides.
pub struct OneFreeSystem {
    free: usize,
    basic: LU<f64, Dyn, Dyn>,
    coef: DVector<f64>,
}

impl OneFreeSystem {
    pub fn prepare(
        a: &DMatrix<f64>,
        free: usize,
        config: &SolverConfig,
    ) -> Result<Self, Rejection> {
        debug_assert_eq!(a.ncols(), a.nrows() + 1);

        let free_column = a.column(free).into_owned();
        let basic = factor_square(a.clone().remove_column(free), config)?;
        let coef = basic.solve(&free_column).ok_or(Rejection::Singular)?;

        Ok(Self { free, basic, coef })
    }

    /// Cheapest integral point for target `b`, with `t` bounded above by `t_upper`.
    pub fn best_point(
        &self,
        b: &DVector<f64>,
        t_upper: f64,
        config: &SolverConfig,
    ) -> Result<Candidate, Rejection> {
        let eps = config.pivot_epsilon;
        let tol = config.integrality_tolerance;
        let x0 = self.basic.solve(b).ok_or(Rejection::Singular)?;

        // x0[i] − coef[i]·t ≥ 0 for every basic variable
        let mut t_min = 0.0_f64;
        let mut t_max = t_upper;
        for (&c, &x) in self.coef.iter().zip(x0.iter()) {
            if c > eps {
                t_max = t_max.min(x / c);
            } else if c < -eps {
                t_min = t_min.max(x / c);
            } else if x < -eps {
                return Err(Rejection::NonIntegerOrNegative { value: x });
            }
        }

        let lowest = (t_min - tol).ceil().max(0.0);
        let highest = (t_max + tol).floor();
        if t_min > t_max + eps || lowest > highest {
            return Err(Rejection::EmptyRange { t_min, t_max });
        }

        let slope = 1.0 - self.coef.sum();
        let t = if slope < -eps { highest } else { lowest };

        let mut presses = x0
            .iter()
            .zip(self.coef.iter())
            .map(|(&x, &c)| as_press_count(x - c * t, tol))
            .collect::<Result<Vec<u64>, _>>()?;
        presses.insert(self.free, t as u64);

        let total = presses.iter().sum();
        Ok(Candidate { presses, total })
    }
}

fn keep_min(best: &mut Option<u64>, total: u64) {
    *best = Some(best.map_or(total, |b| b.min(total)));
}

/// Minimum verified total over every choice of free column.
///
/// `check` receives each candidate's presses (aligned with `a`'s columns) and
/// must accept it before it counts.
pub fn best_one_free<F>(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    t_upper: u64,
    config: &SolverConfig,
    check: F,
) -> Option<u64>
where
    F: Fn(&[u64]) -> Result<(), Rejection>,
{
    let mut best = None;

    for free in 0..a.ncols() {
        let outcome = OneFreeSystem::prepare(a, free, config)
            .and_then(|system| system.best_point(b, t_upper as f64, config))
            .and_then(|candidate| {
                check(&candidate.presses)?;
                Ok(candidate.total)
            });

        match outcome {
            Ok(total) => keep_min(&mut best, total),
            Err(rejection) => tracing::trace!(%rejection, free, "free column pruned"),
        }
    }

    best
}

/// Minimum verified total over every ordered pair of free columns.
///
/// The first free value is enumerated over `0..=min(t_upper, cap)`; the second
/// is solved analytically on the adjusted target `b − t1·A[:, first]`.
pub fn best_two_free<F>(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    t_upper: u64,
    config: &SolverConfig,
    check: F,
) -> Option<u64>
where
    F: Fn(&[u64]) -> Result<(), Rejection>,
{
    let width = a.ncols();
    let limit = t_upper.min(config.free_variable_cap);
    let mut best = None;

    for (first, second) in (0..width)
        .cartesian_product(0..width)
        .filter(|(first, second)| first != second)
    {
        let reduced = a.clone().remove_column(first);
        // position of `second` once `first` is gone
        let relative = if second > first { second - 1 } else { second };

        let system = match OneFreeSystem::prepare(&reduced, relative, config) {
            Ok(system) => system,
            Err(rejection) => {
                tracing::trace!(%rejection, first, second, "free pair pruned");
                continue;
            }
        };

        let first_column = a.column(first).into_owned();
        for t1 in 0..=limit {
            let adjusted = b - &first_column * (t1 as f64);
            let outcome = system
                .best_point(&adjusted, t_upper as f64, config)
                .and_then(|mut candidate| {
                    candidate.presses.insert(first, t1);
                    check(&candidate.presses)?;
                    Ok(candidate.total + t1)
                });

            match outcome {
                Ok(total) => keep_min(&mut best, total),
                Err(rejection) => {
                    tracing::trace!(%rejection, first, second, t1, "free value pruned")
                }
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear::incidence_matrix;
    use crate::verify::verify;

    fn setup(buttons: &[Vec<usize>], targets: &[u64]) -> (DMatrix<f64>, DVector<f64>) {
        let a = incidence_matrix(buttons, targets.len());
        let b = DVector::from_iterator(targets.len(), targets.iter().map(|&t| t as f64));
        (a, b)
    }

    fn accept_all(_: &[u64]) -> Result<(), Rejection> {
        Ok(())
    }

    #[test]
    fn duplicate_buttons_share_the_load() {
        let buttons = vec![vec![0], vec![0]];
        let (a, b) = setup(&buttons, &[4]);
        let check = |p: &[u64]| verify(&buttons, &[4], &[0, 1], p);
        assert_eq!(best_one_free(&a, &b, 4, &SolverConfig::default(), check), Some(4));
    }

    #[test]
    fn picks_cheapest_end_of_range() {
        // {0}, {1}, {0,1} against [3, 5]: pressing {0,1} three times is cheapest
        let buttons = vec![vec![0], vec![1], vec![0, 1]];
        let targets = [3, 5];
        let (a, b) = setup(&buttons, &targets);
        let check = |p: &[u64]| verify(&buttons, &targets, &[0, 1, 2], p);
        assert_eq!(best_one_free(&a, &b, 5, &SolverConfig::default(), check), Some(5));
    }

    #[test]
    fn free_point_respects_bounds() {
        let (a, b) = setup(&[vec![0], vec![1], vec![0, 1]], &[3, 5]);
        let system = OneFreeSystem::prepare(&a, 2, &SolverConfig::default()).unwrap();
        let candidate = system.best_point(&b, 5.0, &SolverConfig::default()).unwrap();
        assert_eq!(
            candidate,
            Candidate {
                presses: vec![0, 2, 3],
                total: 5,
            }
        );
    }

    #[test]
    fn singular_basis_is_rejected() {
        // removing column 2 leaves two copies of {0,1}
        let (a, _) = setup(&[vec![0, 1], vec![0, 1], vec![0]], &[2, 2]);
        assert!(matches!(
            OneFreeSystem::prepare(&a, 2, &SolverConfig::default()),
            Err(Rejection::Singular)
        ));
    }

    #[test]
    fn pinned_negative_basic_is_rejected() {
        // the free {1} cannot move button {0}, which is stuck below zero
        let (a, _) = setup(&[vec![0], vec![1], vec![1]], &[0, 0]);
        let system = OneFreeSystem::prepare(&a, 2, &SolverConfig::default()).unwrap();
        let b = DVector::from_vec(vec![-1.0, 2.0]);
        assert_eq!(
            system.best_point(&b, 2.0, &SolverConfig::default()),
            Err(Rejection::NonIntegerOrNegative { value: -1.0 })
        );
    }

    #[test]
    fn range_follows_both_bounds() {
        // {0} = t - 2 and {0,1} = 3 - t, so t must lie in [2, 3]
        let (a, b) = setup(&[vec![0], vec![0, 1], vec![1]], &[1, 3]);
        let system = OneFreeSystem::prepare(&a, 2, &SolverConfig::default()).unwrap();

        let candidate = system.best_point(&b, 3.0, &SolverConfig::default()).unwrap();
        assert_eq!(candidate.presses, vec![0, 1, 2]);
        assert_eq!(candidate.total, 3);

        assert!(matches!(
            system.best_point(&b, 1.0, &SolverConfig::default()),
            Err(Rejection::EmptyRange { .. })
        ));
    }

    #[test]
    fn two_free_variables() {
        // one counter, three interchangeable buttons
        let buttons = vec![vec![0], vec![0], vec![0]];
        let (a, b) = setup(&buttons, &[6]);
        let check = |p: &[u64]| verify(&buttons, &[6], &[0, 1, 2], p);
        assert_eq!(best_two_free(&a, &b, 6, &SolverConfig::default(), check), Some(6));
    }

    #[test]
    fn two_free_prefers_the_shared_button() {
        // {0,1} covers both counters at once
        let buttons = vec![vec![0], vec![1], vec![0, 1], vec![1]];
        let targets = [2, 3];
        let (a, b) = setup(&buttons, &targets);
        let check = |p: &[u64]| verify(&buttons, &targets, &[0, 1, 2, 3], p);
        assert_eq!(best_two_free(&a, &b, 3, &SolverConfig::default(), check), Some(3));
    }

    #[test]
    fn two_free_enumeration_is_capped() {
        let buttons = vec![vec![0], vec![0], vec![0]];
        let (a, b) = setup(&buttons, &[6]);
        let config = SolverConfig {
            free_variable_cap: 0,
            ..SolverConfig::default()
        };
        assert_eq!(best_two_free(&a, &b, 6, &config, accept_all), Some(6));
    }

    #[test]
    fn verifier_vetoes_candidates() {
        let (a, b) = setup(&[vec![0], vec![0]], &[4]);
        let reject = |_: &[u64]| -> Result<(), Rejection> {
            Err(Rejection::VerificationMismatch {
                counter: 0,
                expected: 4,
                actual: 0,
            })
        };
        assert_eq!(best_one_free(&a, &b, 4, &SolverConfig::default(), reject), None);
    }
}
