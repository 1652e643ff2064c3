//! A configurable square grid world with a goal, penalty ("grey") cells and
//! ordinary cells.
//!
//! Moving off the grid leaves the agent where it is. Every move is rewarded
//! with the reward of the cell being left, so `Q(s, a) = R(s) + γ·V(s')`.

use crate::error::{Error, Result};
use crate::mdp::{Action, Environment, State};

/// Reward assigned to each class of cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rewards {
    /// Reward for leaving an ordinary cell
    pub regular: f64,
    /// Reward for leaving a grey cell
    pub grey: f64,
    /// Reward of a goal cell, also the value it is pinned to
    pub goal: f64,
}

impl Default for Rewards {
    fn default() -> Self {
        Self {
            regular: -1.0,
            grey: -5.0,
            goal: 10.0,
        }
    }
}

/// Layout and rewards of a grid world.
#[derive(Debug, Clone, PartialEq)]
pub struct GridWorldConfig {
    /// Side length of the square grid
    pub grid_size: usize,
    pub rewards: Rewards,
    /// Non-terminal cells rewarded with `rewards.grey`
    pub grey_states: Vec<State>,
    /// Goal cells; terminal and valued at `rewards.goal`
    pub terminal_states: Vec<State>,
}

impl Default for GridWorldConfig {
    fn default() -> Self {
        Self {
            grid_size: 5,
            rewards: Rewards::default(),
            grey_states: vec![State::new(0, 4), State::new(2, 2), State::new(3, 0)],
            terminal_states: vec![State::new(4, 4)],
        }
    }
}

impl GridWorldConfig {
    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 {
            return Err(Error::InvalidConfiguration(
                "grid size must be at least 1".to_string(),
            ));
        }
        let Rewards { regular, grey, goal } = self.rewards;
        if !(regular.is_finite() && grey.is_finite() && goal.is_finite()) {
            return Err(Error::InvalidConfiguration(format!(
                "rewards must be finite, got regular={regular}, grey={grey}, goal={goal}"
            )));
        }
        for (kind, states) in [("terminal", &self.terminal_states), ("grey", &self.grey_states)] {
            if let Some(s) = states
                .iter()
                .find(|s| s.row >= self.grid_size || s.col >= self.grid_size)
            {
                return Err(Error::InvalidConfiguration(format!(
                    "{kind} state {s} lies outside the {n}x{n} grid",
                    n = self.grid_size
                )));
            }
        }
        if let Some(s) = self
            .grey_states
            .iter()
            .find(|s| self.terminal_states.contains(s))
        {
            return Err(Error::InvalidConfiguration(format!(
                "state {s} is listed as both grey and terminal"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellClass {
    Regular,
    Grey,
    Goal,
}

/// Deterministic grid world built from a [`GridWorldConfig`].
#[derive(Debug, Clone)]
pub struct GridWorld {
    size: usize,
    rewards: Rewards,
    // row-major, one entry per cell
    cells: Vec<CellClass>,
}

impl GridWorld {
    /// Builds the grid world, rejecting configurations with out-of-grid
    /// coordinates, overlapping classes, non-finite rewards or an empty grid.
    ///
    /// # Examples
    ///
    /// ```
    /// use bellman_grid::mdp::{Action, CellClass, Environment, GridWorld, GridWorldConfig};
    ///
    /// let world = GridWorld::new(GridWorldConfig::default()).unwrap();
    /// assert_eq!(world.cell_class(2, 2), CellClass::Grey);
    /// assert!(world.is_terminal(4, 4));
    ///
    /// // Walking into the wall keeps the agent in place.
    /// assert_eq!(world.successor_and_reward(0, 0, Action::Up), (0, 0, -1.0));
    /// ```
    pub fn new(config: GridWorldConfig) -> Result<Self> {
        config.validate()?;
        let n = config.grid_size;
        let mut cells = vec![CellClass::Regular; n * n];
        for s in &config.grey_states {
            cells[s.row * n + s.col] = CellClass::Grey;
        }
        for s in &config.terminal_states {
            cells[s.row * n + s.col] = CellClass::Goal;
        }
        Ok(Self {
            size: n,
            rewards: config.rewards,
            cells,
        })
    }

    /// # Panics
    /// Panics if `(row, col)` is outside the grid.
    pub fn cell_class(&self, row: usize, col: usize) -> CellClass {
        assert!(
            row < self.size && col < self.size,
            "({row}, {col}) is outside the {n}x{n} grid",
            n = self.size
        );
        self.cells[row * self.size + col]
    }

    /// Reward for leaving `(row, col)`.
    pub fn reward(&self, row: usize, col: usize) -> f64 {
        match self.cell_class(row, col) {
            CellClass::Regular => self.rewards.regular,
            CellClass::Grey => self.rewards.grey,
            CellClass::Goal => self.rewards.goal,
        }
    }

    fn step(&self, row: usize, col: usize, action: Action) -> (usize, usize) {
        let (dr, dc) = action.delta();
        match (row.checked_add_signed(dr), col.checked_add_signed(dc)) {
            (Some(r), Some(c)) if r < self.size && c < self.size => (r, c),
            _ => (row, col),
        }
    }
}

impl Environment for GridWorld {
    fn grid_size(&self) -> usize {
        self.size
    }

    fn is_terminal(&self, row: usize, col: usize) -> bool {
        self.cell_class(row, col) == CellClass::Goal
    }

    fn successor_and_reward(&self, row: usize, col: usize, action: Action) -> (usize, usize, f64) {
        let (r, c) = self.step(row, col, action);
        (r, c, self.reward(row, col))
    }

    fn terminal_value(&self, _row: usize, _col: usize) -> f64 {
        self.rewards.goal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let world = GridWorld::new(GridWorldConfig::default()).unwrap();
        assert_eq!(world.grid_size(), 5);
        assert_eq!(world.cell_class(0, 4), CellClass::Grey);
        assert_eq!(world.cell_class(3, 0), CellClass::Grey);
        assert_eq!(world.cell_class(4, 4), CellClass::Goal);
        assert_eq!(world.cell_class(1, 1), CellClass::Regular);
        assert_eq!(world.reward(2, 2), -5.0);
        assert_eq!(world.reward(0, 0), -1.0);
        assert_eq!(world.terminal_value(4, 4), 10.0);
        let terminals: Vec<_> = world.states().filter(|s| world.is_terminal(s.row, s.col)).collect();
        assert_eq!(terminals, vec![State::new(4, 4)]);
    }

    #[test]
    fn test_moves_inside_grid() {
        let world = GridWorld::new(GridWorldConfig::default()).unwrap();
        assert_eq!(world.successor_and_reward(1, 1, Action::Right), (1, 2, -1.0));
        assert_eq!(world.successor_and_reward(1, 1, Action::Left), (1, 0, -1.0));
        assert_eq!(world.successor_and_reward(1, 1, Action::Down), (2, 1, -1.0));
        assert_eq!(world.successor_and_reward(1, 1, Action::Up), (0, 1, -1.0));
    }

    #[test]
    fn test_reward_belongs_to_the_cell_being_left() {
        let world = GridWorld::new(GridWorldConfig::default()).unwrap();
        // Leaving a grey cell
        assert_eq!(world.successor_and_reward(2, 2, Action::Left), (2, 1, -5.0));
        // Entering a grey cell
        assert_eq!(world.successor_and_reward(2, 1, Action::Right), (2, 2, -1.0));
    }

    #[test]
    fn test_off_grid_moves_stay_in_place() {
        let world = GridWorld::new(GridWorldConfig::default()).unwrap();
        for action in Action::ALL {
            let (r, c, _) = world.successor_and_reward(0, 0, action);
            assert!(r < 5 && c < 5);
        }
        assert_eq!(world.successor_and_reward(0, 0, Action::Left), (0, 0, -1.0));
        assert_eq!(world.successor_and_reward(0, 0, Action::Up), (0, 0, -1.0));
        assert_eq!(world.successor_and_reward(4, 0, Action::Down), (4, 0, -1.0));
        assert_eq!(world.successor_and_reward(0, 4, Action::Right), (0, 4, -5.0));
    }

    #[test]
    fn test_single_cell_grid() {
        let config = GridWorldConfig {
            grid_size: 1,
            grey_states: vec![],
            terminal_states: vec![],
            ..GridWorldConfig::default()
        };
        let world = GridWorld::new(config).unwrap();
        for action in Action::ALL {
            assert_eq!(world.successor_and_reward(0, 0, action), (0, 0, -1.0));
        }
    }

    #[test]
    fn test_rejects_empty_grid() {
        let config = GridWorldConfig {
            grid_size: 0,
            grey_states: vec![],
            terminal_states: vec![],
            ..GridWorldConfig::default()
        };
        assert!(matches!(
            GridWorld::new(config),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_rejects_terminal_outside_grid() {
        let config = GridWorldConfig {
            terminal_states: vec![State::new(5, 0)],
            ..GridWorldConfig::default()
        };
        assert!(matches!(
            GridWorld::new(config),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_rejects_grey_outside_grid() {
        let config = GridWorldConfig {
            grey_states: vec![State::new(0, 7)],
            ..GridWorldConfig::default()
        };
        assert!(GridWorld::new(config).is_err());
    }

    #[test]
    fn test_rejects_overlapping_classes() {
        let config = GridWorldConfig {
            grey_states: vec![State::new(4, 4)],
            ..GridWorldConfig::default()
        };
        assert!(GridWorld::new(config).is_err());
    }

    #[test]
    fn test_rejects_non_finite_rewards() {
        let config = GridWorldConfig {
            rewards: Rewards {
                grey: f64::NAN,
                ..Rewards::default()
            },
            ..GridWorldConfig::default()
        };
        assert!(GridWorld::new(config).is_err());
    }
}
