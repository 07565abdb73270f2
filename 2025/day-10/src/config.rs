//! Numeric tolerances and search bounds shared by every solver routine.

/// Maximum distance from the nearest integer for a solved value to count as a press count.
pub const INTEGRALITY_TOLERANCE: f64 = 1e-6;

/// Upper bound on `‖A x − b‖²` for an overdetermined subset to be accepted.
pub const RESIDUAL_TOLERANCE: f64 = 1e-6;

/// Numerical epsilon for comparing pivots, slopes and coefficients to zero.
pub const PIVOT_EPSILON: f64 = 1e-9;

/// Largest value enumerated for the first of two free variables.
///
/// Tied to the magnitudes seen in puzzle inputs; a machine whose optimum
/// needs a larger first free value is not found through the two-free path.
pub const FREE_VARIABLE_CAP: u64 = 100;

/// Toggle search refuses machines with more buttons than this (`2^n` subsets).
pub const MAX_TOGGLE_BUTTONS: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverConfig {
    pub integrality_tolerance: f64,
    pub residual_tolerance: f64,
    pub pivot_epsilon: f64,
    pub free_variable_cap: u64,
    pub max_toggle_buttons: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            integrality_tolerance: INTEGRALITY_TOLERANCE,
            residual_tolerance: RESIDUAL_TOLERANCE,
            pivot_epsilon: PIVOT_EPSILON,
            free_variable_cap: FREE_VARIABLE_CAP,
            max_toggle_buttons: MAX_TOGGLE_BUTTONS,
        }
    }
}
