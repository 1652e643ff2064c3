use std::collections::BTreeMap;
use std::fmt;

use ndarray::Array2;

use crate::mdp::{Action, State};

/// A deterministic policy over a square grid.
///
/// Terminal cells hold `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    actions: Array2<Option<Action>>,
}

impl Policy {
    pub fn new(actions: Array2<Option<Action>>) -> Self {
        Self { actions }
    }

    pub fn grid_size(&self) -> usize {
        self.actions.nrows()
    }

    /// Action chosen at `(row, col)`, `None` for terminal or out-of-grid cells.
    pub fn action_at(&self, row: usize, col: usize) -> Option<Action> {
        self.actions.get((row, col)).copied().flatten()
    }

    pub fn actions(&self) -> &Array2<Option<Action>> {
        &self.actions
    }

    /// Every non-terminal state with its action, in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (State, Action)> + '_ {
        self.actions
            .indexed_iter()
            .filter_map(|((row, col), a)| a.map(|a| (State::new(row, col), a)))
    }

    pub fn to_map(&self) -> BTreeMap<State, Action> {
        self.iter().collect()
    }

    /// Fraction of cells on which both policies agree, counting a terminal
    /// cell as agreeing only with another terminal cell.
    ///
    /// # Panics
    /// Panics if the policies cover different grid sizes.
    pub fn agreement(&self, other: &Policy) -> f64 {
        assert_eq!(
            self.actions.dim(),
            other.actions.dim(),
            "policies cover different grids"
        );
        let total = self.actions.len();
        if total == 0 {
            return 1.0;
        }
        let same = self
            .actions
            .iter()
            .zip(other.actions.iter())
            .filter(|(a, b)| a == b)
            .count();
        same as f64 / total as f64
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.actions.rows() {
            let line: Vec<String> = row
                .iter()
                .map(|a| a.map_or('G', Action::arrow).to_string())
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
