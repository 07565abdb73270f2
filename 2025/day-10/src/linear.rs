use nalgebra::{DMatrix, DVector, Dyn, LU};

use crate::config::SolverConfig;
use crate::error::Rejection;

/// How a subset of `n` buttons relates to `m` counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubsetShape {
    /// `n < m`: least squares, accepted only with a zero residual.
    Overdetermined,
    /// `n == m`: unique solution unless singular.
    Square,
    /// `n == m + 1`.
    OneFree,
    /// `n == m + 2`.
    TwoFree,
}

impl SubsetShape {
    /// `None` when the subset leaves more than two free variables.
    pub fn classify(num_targets: usize, subset_len: usize) -> Option<Self> {
        use std::cmp::Ordering::*;
        match subset_len.cmp(&num_targets) {
            Less => Some(Self::Overdetermined),
            Equal => Some(Self::Square),
            Greater => match subset_len - num_targets {
                1 => Some(Self::OneFree),
                2 => Some(Self::TwoFree),
                _ => None,
            },
        }
    }
}

/// `A[counter][button] = 1.0` when the button feeds the counter.
pub fn incidence_matrix(buttons: &[Vec<usize>], num_targets: usize) -> DMatrix<f64> {
    let mut a = DMatrix::zeros(num_targets, buttons.len());
    for (col, button) in buttons.iter().enumerate() {
        for &row in button.iter().filter(|&&r| r < num_targets) {
            a[(row, col)] = 1.0;
        }
    }
    a
}

/// LU factorisation of a square matrix, refusing (numerically) singular ones.
///
/// For 0/1 incidence matrices the determinant is an integer, so anything
/// within `pivot_epsilon` of zero is exactly singular.
pub fn factor_square(
    a: DMatrix<f64>,
    config: &SolverConfig,
) -> Result<LU<f64, Dyn, Dyn>, Rejection> {
    debug_assert!(a.is_square());
    let lu = a.lu();
    if lu.determinant().abs() < config.pivot_epsilon {
        return Err(Rejection::Singular);
    }
    Ok(lu)
}

/// Solves `A x = b` for square and overdetermined `A`.
///
/// The result is real-valued; integrality is checked by the caller.
pub fn solve(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    config: &SolverConfig,
) -> Result<DVector<f64>, Rejection> {
    let (m, n) = a.shape();
    debug_assert_eq!(b.len(), m);

    if n == m {
        return factor_square(a.clone(), config)?
            .solve(b)
            .ok_or(Rejection::Singular);
    }

    debug_assert!(n < m, "underdetermined systems go through free_vars");

    // Minimum-norm least squares; rank-deficient subsets still get a candidate
    // that the residual and integrality checks can judge.
    let x = a
        .clone()
        .svd(true, true)
        .solve(b, config.pivot_epsilon)
        .map_err(|_| Rejection::Singular)?;

    let residual = (a * &x - b).norm_squared();
    if residual > config.residual_tolerance {
        return Err(Rejection::ResidualTooLarge { residual });
    }

    Ok(x)
}
