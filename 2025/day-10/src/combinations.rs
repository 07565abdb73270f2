use std::iter::FusedIterator;

/// Lazy iterator over every `k`-element subset of `0..n`, in lexicographic order.
///
/// Only the current subset is held in memory; restart by constructing a new one.
#[derive(Clone, Debug)]
pub struct Combinations {
    n: usize,
    indices: Vec<usize>,
    state: State,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    First,
    Running,
    Done,
}

impl Combinations {
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            state: if k > n { State::Done } else { State::First },
        }
    }

    /// Moves `indices` to the next subset. Returns `false` once exhausted.
    fn advance(&mut self) -> bool {
        let k = self.indices.len();
        // Rightmost position that can still move right.
        let Some(i) = (0..k).rev().find(|&i| self.indices[i] < self.n - k + i) else {
            return false;
        };

        self.indices[i] += 1;
        for j in (i + 1)..k {
            self.indices[j] = self.indices[j - 1] + 1;
        }
        true
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            State::Done => None,
            State::First => {
                self.state = State::Running;
                Some(self.indices.clone())
            }
            State::Running => {
                if self.advance() {
                    Some(self.indices.clone())
                } else {
                    self.state = State::Done;
                    None
                }
            }
        }
    }
}

impl FusedIterator for Combinations {}
