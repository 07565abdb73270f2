use crate::combinations::Combinations;
use crate::config::SolverConfig;
use crate::error::{Mode, SolveError};
use crate::machine::{Machine, Row};

/// Fewest distinct buttons whose combined toggles light exactly the target pattern.
///
/// Pressing a button twice cancels out, so each button is used at most once.
/// Subsets are tried in increasing size, making the first match minimal.
#[tracing::instrument(skip_all, fields(buttons = machine.num_buttons()))]
pub fn solve_toggle(machine: &Machine, config: &SolverConfig) -> Result<u64, SolveError> {
    let num_buttons = machine.num_buttons();
    if num_buttons > config.max_toggle_buttons {
        return Err(SolveError::TooManyButtons {
            count: num_buttons,
            max: config.max_toggle_buttons,
        });
    }

    let target = machine.target_lights();
    let masks: Vec<Row> = (0..num_buttons).map(|b| machine.light_mask(b)).collect();

    for size in 0..=num_buttons {
        for subset in Combinations::new(num_buttons, size) {
            let mut state = Row::repeat(false, target.len());
            for &b in &subset {
                state ^= &masks[b];
            }

            if state.as_bitslice() == target {
                tracing::debug!(presses = size, ?subset, "lights matched");
                return Ok(size as u64);
            }
        }
    }

    Err(SolveError::Infeasible { mode: Mode::Toggle })
}
