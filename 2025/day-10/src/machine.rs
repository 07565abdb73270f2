use bitvec::prelude::*;
use chumsky::prelude::*;
use miette::{miette, Result};

/// A bit vector backed by `usize` words with Least Significant Bit first ordering.
pub type Row = BitVec<usize, Lsb0>;

/// One factory machine: a light diagram, its buttons, and the joltage requirements.
///
/// Lights and joltage counters are two independent target spaces that share
/// the same buttons. A button index that falls outside the space being solved
/// is ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Machine {
    target_lights: Row,
    /// Each button's affected indices, sorted and de-duplicated.
    buttons: Vec<Vec<usize>>,
    target_joltages: Vec<u64>,
}

impl Machine {
    pub fn new<L, B, I>(lights: L, buttons: B, joltages: Vec<u64>) -> Self
    where
        L: IntoIterator<Item = bool>,
        B: IntoIterator<Item = I>,
        I: IntoIterator<Item = usize>,
    {
        let buttons = buttons
            .into_iter()
            .map(|indices| {
                let mut indices: Vec<usize> = indices.into_iter().collect();
                indices.sort_unstable();
                indices.dedup();
                indices
            })
            .collect();

        Self {
            target_lights: lights.into_iter().collect(),
            buttons,
            target_joltages: joltages,
        }
    }

    pub fn target_lights(&self) -> &BitSlice<usize, Lsb0> {
        &self.target_lights
    }

    pub fn buttons(&self) -> &[Vec<usize>] {
        &self.buttons
    }

    pub fn target_joltages(&self) -> &[u64] {
        &self.target_joltages
    }

    pub fn num_buttons(&self) -> usize {
        self.buttons.len()
    }

    /// Mask of the lights a button toggles, clipped to the diagram width.
    pub fn light_mask(&self, button: usize) -> Row {
        let len = self.target_lights.len();
        let mut row = Row::repeat(false, len);
        for &i in self.buttons[button].iter().filter(|&&i| i < len) {
            row.set(i, true);
        }
        row
    }
}

fn parser<'a>() -> impl Parser<'a, &'a str, Vec<Machine>, extra::Err<Rich<'a, char>>> {
    // Custom whitespace parser that excludes newlines
    let hspace = one_of(" \t").repeated();

    let light = choice((just('.').to(false), just('#').to(true)));

    // [.##.]
    let diagram = light
        .repeated()
        .collect::<Vec<bool>>()
        .delimited_by(just('['), just(']'));

    // (0,2,3)
    let indices = text::int(10)
        .from_str::<usize>()
        .unwrapped()
        .separated_by(just(','))
        .collect::<Vec<usize>>()
        .delimited_by(just('('), just(')'));

    // (0,2) (1,3) ...
    let buttons = indices.padded_by(hspace).repeated().collect::<Vec<_>>();

    // {3,5,4,7}
    let joltages = text::int(10)
        .from_str::<u64>()
        .unwrapped()
        .separated_by(just(','))
        .collect::<Vec<u64>>()
        .delimited_by(just('{'), just('}'));

    let machine = diagram
        .then_ignore(hspace)
        .then(buttons)
        .then(joltages.or_not())
        .then_ignore(hspace)
        .map(|((lights, buttons), joltages)| {
            Machine::new(lights, buttons, joltages.unwrap_or_default())
        });

    machine
        .separated_by(text::newline())
        .allow_trailing()
        .collect()
}

/// Parses one machine per line.
pub fn parse_machines(input: &str) -> Result<Vec<Machine>> {
    parser()
        .parse(input)
        .into_result()
        .map_err(|e| miette!("Parse failed: {:?}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_three_sections() -> Result<()> {
        let machines = parse_machines("[.##.] (3) (1,3) (2) (2,3) (0,2) (0,1) {3,5,4,7}")?;
        assert_eq!(machines.len(), 1);

        let m = &machines[0];
        assert_eq!(
            m.target_lights().iter().by_vals().collect::<Vec<_>>(),
            vec![false, true, true, false]
        );
        assert_eq!(m.num_buttons(), 6);
        assert_eq!(m.buttons()[1], vec![1, 3]);
        assert_eq!(m.target_joltages(), &[3, 5, 4, 7]);
        Ok(())
    }

    #[test]
    fn joltages_are_optional() -> Result<()> {
        let machines = parse_machines("[#.] (0) (0,1)\n[..] (1)\n")?;
        assert_eq!(machines.len(), 2);
        assert!(machines[0].target_joltages().is_empty());
        assert_eq!(machines[1].buttons(), &[vec![1]]);
        Ok(())
    }

    #[test]
    fn button_indices_are_normalised() {
        let m = Machine::new([true], [vec![2, 0, 2]], vec![]);
        assert_eq!(m.buttons()[0], vec![0, 2]);
        // index 2 is outside the single-light diagram
        assert_eq!(m.light_mask(0), bitvec![usize, Lsb0; 1]);
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(parse_machines("[.x] (0) {1}").is_err());
        assert!(parse_machines("(0) {1}").is_err());
    }
}
