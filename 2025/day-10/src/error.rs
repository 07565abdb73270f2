use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

/// Which target vector a solve was aiming for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Indicator lights, buttons pressed at most once.
    Toggle,
    /// Joltage counters, buttons pressed any number of times.
    Accumulate,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Toggle => f.write_str("light"),
            Mode::Accumulate => f.write_str("joltage"),
        }
    }
}

/// Failures that reach the caller of a solve.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error("no combination of button presses reaches the target {mode} state")]
    #[diagnostic(
        code(factory::infeasible),
        help("check that every non-zero target index is covered by at least one button")
    )]
    Infeasible { mode: Mode },

    #[error("{count} buttons exceed the toggle search limit of {max}")]
    #[diagnostic(code(factory::too_many_buttons))]
    TooManyButtons { count: usize, max: usize },

    #[error("machine #{index} could not be solved")]
    #[diagnostic(code(factory::machine))]
    Machine {
        index: usize,
        #[source]
        source: Box<SolveError>,
    },
}

impl SolveError {
    pub(crate) fn at_machine(self, index: usize) -> Self {
        SolveError::Machine {
            index,
            source: Box::new(self),
        }
    }
}

/// Why a single subset (or free-variable choice) was pruned from the search.
///
/// These never escape a machine solve; they are logged and skipped.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Rejection {
    #[error("matrix has no unique solution")]
    Singular,

    #[error("least-squares residual {residual:e} exceeds tolerance")]
    ResidualTooLarge { residual: f64 },

    #[error("value {value} is not a non-negative integer")]
    NonIntegerOrNegative { value: f64 },

    #[error("free variable range [{t_min}, {t_max}] is empty")]
    EmptyRange { t_min: f64, t_max: f64 },

    #[error("counter {counter} accumulates {actual} instead of {expected}")]
    VerificationMismatch {
        counter: usize,
        expected: u64,
        actual: u64,
    },
}
