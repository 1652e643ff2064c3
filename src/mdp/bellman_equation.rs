//! The Bellman optimality backup for a deterministic environment.
//!
//! Both sweep disciplines of [`ValueIteration`](crate::mdp::ValueIteration)
//! and greedy policy extraction go through [`backup`]; they differ only in
//! which table they hand it.

use ndarray::Array2;

use crate::mdp::{Action, Environment};

/// Result of backing up a single state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backup {
    /// `max_a Q(s, a)`
    pub value: f64,
    /// First action in [`Action::ALL`] order attaining `value`
    pub action: Action,
}

/// Compute Q(s, a) = R(s, a) + gamma * V(s').
///
/// The successor returned by the environment is used as is; boundary handling
/// is the environment's business.
pub fn action_value<E>(
    env: &E,
    values: &Array2<f64>,
    row: usize,
    col: usize,
    action: Action,
    discount: f64,
) -> f64
where
    E: Environment + ?Sized,
{
    let (next_row, next_col, reward) = env.successor_and_reward(row, col, action);
    reward + discount * values[[next_row, next_col]]
}

/// Backs up `(row, col)` against `values` without modifying it.
///
/// Ties go to the action that comes first in [`Action::ALL`]. The caller is
/// responsible for skipping terminal states.
///
/// # Examples
///
/// ```
/// use bellman_grid::mdp::{backup, Action, GridWorld, GridWorldConfig};
/// use ndarray::Array2;
///
/// let world = GridWorld::new(GridWorldConfig::default()).unwrap();
/// let mut values = Array2::zeros((5, 5));
/// values[[4, 4]] = 10.0;
///
/// let b = backup(&world, &values, 3, 4, 0.9);
/// assert_eq!(b.action, Action::Down);
/// assert!((b.value - 8.0).abs() < 1e-12);
/// ```
pub fn backup<E>(env: &E, values: &Array2<f64>, row: usize, col: usize, discount: f64) -> Backup
where
    E: Environment + ?Sized,
{
    let mut best = Backup {
        value: f64::NEG_INFINITY,
        action: Action::ALL[0],
    };
    for action in Action::ALL {
        let q_sa = action_value(env, values, row, col, action, discount);
        if q_sa > best.value {
            best = Backup { value: q_sa, action };
        }
    }
    best
}
