use crate::error::Rejection;

/// Converts a solved real value into a press count.
///
/// Values within `tolerance` below zero clamp to 0; anything more negative, or
/// farther than `tolerance` from the nearest integer, is rejected.
pub fn as_press_count(value: f64, tolerance: f64) -> Result<u64, Rejection> {
    if !value.is_finite() || value < -tolerance {
        return Err(Rejection::NonIntegerOrNegative { value });
    }

    let rounded = value.round();
    if (value - rounded).abs() > tolerance {
        return Err(Rejection::NonIntegerOrNegative { value });
    }

    Ok(rounded.max(0.0) as u64)
}

/// Replays a candidate with integer arithmetic against the machine's own button sets.
///
/// `presses[i]` belongs to button `subset[i]`. Floating-point solves can land
/// within tolerance of an integer that does not actually reproduce the
/// targets, so every candidate passes through here before it counts.
pub fn verify(
    buttons: &[Vec<usize>],
    targets: &[u64],
    subset: &[usize],
    presses: &[u64],
) -> Result<(), Rejection> {
    debug_assert_eq!(subset.len(), presses.len());

    let mut accumulated: Vec<Option<u64>> = vec![Some(0); targets.len()];
    for (&button, &count) in subset.iter().zip(presses) {
        for &counter in buttons[button].iter().filter(|&&c| c < targets.len()) {
            let slot = &mut accumulated[counter];
            *slot = slot.and_then(|v| v.checked_add(count));
        }
    }

    for (counter, (&expected, actual)) in targets.iter().zip(accumulated).enumerate() {
        match actual {
            Some(actual) if actual == expected => {}
            actual => {
                return Err(Rejection::VerificationMismatch {
                    counter,
                    expected,
                    actual: actual.unwrap_or(u64::MAX),
                })
            }
        }
    }

    Ok(())
}

/// Sum of a verified press vector.
pub fn total_presses(presses: &[u64]) -> u64 {
    presses.iter().sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const TOL: f64 = 1e-6;

    #[rstest]
    #[case::exact(3.0, 3)]
    #[case::just_below(4.999_999_9, 5)]
    #[case::just_above(2.000_000_5, 2)]
    #[case::negative_zero_clamped(-5e-7, 0)]
    #[case::zero(0.0, 0)]
    fn accepts_near_integers(#[case] value: f64, #[case] expected: u64) {
        assert_eq!(as_press_count(value, TOL), Ok(expected));
    }

    #[rstest]
    #[case::fractional(2.5)]
    #[case::slightly_off(7.001)]
    #[case::negative(-1.0)]
    #[case::barely_negative(-2e-6)]
    #[case::not_a_number(f64::NAN)]
    #[case::infinite(f64::INFINITY)]
    fn rejects_everything_else(#[case] value: f64) {
        assert!(matches!(
            as_press_count(value, TOL),
            Err(Rejection::NonIntegerOrNegative { .. })
        ));
    }

    #[test]
    fn accepts_exact_replay() {
        let buttons = vec![vec![0], vec![1], vec![0, 1]];
        assert_eq!(verify(&buttons, &[3, 5], &[1, 2], &[2, 3]), Ok(()));
    }

    #[test]
    fn catches_mismatch() {
        let buttons = vec![vec![0], vec![1], vec![0, 1]];
        assert_eq!(
            verify(&buttons, &[3, 5], &[0, 1], &[3, 4]),
            Err(Rejection::VerificationMismatch {
                counter: 1,
                expected: 5,
                actual: 4,
            })
        );
    }

    #[test]
    fn ignores_out_of_range_counters() {
        let buttons = vec![vec![0, 9]];
        assert_eq!(verify(&buttons, &[4], &[0], &[4]), Ok(()));
    }

    #[test]
    fn overflow_is_a_mismatch() {
        let buttons = vec![vec![0], vec![0]];
        assert!(verify(&buttons, &[1], &[0, 1], &[u64::MAX, 2]).is_err());
    }
}
