use std::fmt;

use crate::mdp::Action;

/// A cell of a square grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct State {
    pub row: usize,
    pub col: usize,
}

impl State {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for State {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A deterministic MDP over the cells of an `N x N` grid.
///
/// The solver only reads from the environment. Implementations must keep every
/// successor inside the grid; [`ValueIteration::new`](crate::mdp::ValueIteration::new)
/// checks this once for every state and action and refuses environments that
/// do not.
pub trait Environment {
    /// Side length `N` of the grid.
    fn grid_size(&self) -> usize;

    /// Whether `(row, col)` is terminal. Terminal states are never backed up.
    fn is_terminal(&self, row: usize, col: usize) -> bool;

    /// One-step transition: successor row, successor column and reward.
    fn successor_and_reward(&self, row: usize, col: usize, action: Action) -> (usize, usize, f64);

    /// Value a terminal state is pinned to.
    fn terminal_value(&self, _row: usize, _col: usize) -> f64 {
        0.0
    }

    /// All states in row-major order, which is also the sweep order.
    fn states(&self) -> Box<dyn Iterator<Item = State> + '_> {
        let n = self.grid_size();
        Box::new((0..n).flat_map(move |row| (0..n).map(move |col| State { row, col })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Corridor;

    impl Environment for Corridor {
        fn grid_size(&self) -> usize {
            2
        }

        fn is_terminal(&self, row: usize, col: usize) -> bool {
            (row, col) == (1, 1)
        }

        fn successor_and_reward(&self, row: usize, col: usize, _action: Action) -> (usize, usize, f64) {
            (row, col, 0.0)
        }
    }

    #[test]
    fn test_states_are_row_major() {
        let states: Vec<State> = Corridor.states().collect();
        assert_eq!(
            states,
            vec![
                State::new(0, 0),
                State::new(0, 1),
                State::new(1, 0),
                State::new(1, 1)
            ]
        );
    }

    #[test]
    fn test_default_terminal_value_is_zero() {
        assert_eq!(Corridor.terminal_value(1, 1), 0.0);
    }

    #[test]
    fn test_state_display_and_conversion() {
        let s: State = (3, 0).into();
        assert_eq!(s.to_string(), "(3, 0)");
    }
}
