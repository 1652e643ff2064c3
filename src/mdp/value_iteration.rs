//! Value iteration with two sweep disciplines.
//!
//! * [`Discipline::Standard`] reads every backup of a sweep from the table as
//!   it stood when the sweep began and writes into a candidate copy, so two
//!   tables are live during a sweep.
//! * [`Discipline::InPlace`] writes each backup straight back into the single
//!   live table, so later states in the same sweep already see the new values.
//!
//! Both are fixed-point iterations of the same contraction and reach the same
//! optimal values for `0 < γ < 1`. In-place sweeps propagate information
//! sooner and usually need no more sweeps than standard ones.

use log::{debug, info, trace, warn};
use ndarray::Array2;

use crate::error::{Error, Result};
use crate::mdp::{backup, Action, Environment, Policy};

/// Solver parameters, fixed for the lifetime of one solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueIterationConfig {
    /// Discount factor, strictly between 0 and 1
    pub discount: f64,
    /// Stop once the largest per-state change of a sweep falls below this
    pub theta: f64,
    /// Upper bound on the number of sweeps
    pub max_iterations: usize,
    /// Starting value of every non-terminal state
    pub initial_value: f64,
}

impl Default for ValueIterationConfig {
    fn default() -> Self {
        Self {
            discount: 0.9,
            theta: 1e-6,
            max_iterations: 1000,
            initial_value: 0.0,
        }
    }
}

impl ValueIterationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.discount > 0.0 && self.discount < 1.0) {
            return Err(Error::InvalidConfiguration(format!(
                "discount must lie in (0, 1), got {}",
                self.discount
            )));
        }
        validate_stopping_rule(self.theta, self.max_iterations)?;
        if !self.initial_value.is_finite() {
            return Err(Error::InvalidConfiguration(format!(
                "initial value must be finite, got {}",
                self.initial_value
            )));
        }
        Ok(())
    }
}

fn validate_stopping_rule(theta: f64, max_iterations: usize) -> Result<()> {
    if !(theta > 0.0 && theta.is_finite()) {
        return Err(Error::InvalidConfiguration(format!(
            "theta must be positive and finite, got {theta}"
        )));
    }
    if max_iterations == 0 {
        return Err(Error::InvalidConfiguration(
            "max_iterations must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// When the writes of a sweep become visible to the backups of that sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Discipline {
    /// Synchronous, double-buffered
    Standard,
    /// Asynchronous, single-buffer
    InPlace,
}

impl Discipline {
    /// Number of full value tables alive during a sweep.
    pub fn value_tables_live(self) -> usize {
        match self {
            Discipline::Standard => 2,
            Discipline::InPlace => 1,
        }
    }
}

/// Stopping state of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    Running,
    Converged,
    /// The cap was hit first. The table holds the last sweep's values, which
    /// may not be a fixed point.
    MaxIterationsExceeded,
}

/// Outcome of a solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Convergence {
    pub discipline: Discipline,
    pub status: SolveStatus,
    /// Number of sweeps performed; the sweep at which the stop condition fired
    pub iterations: usize,
    /// Delta of the last sweep
    pub final_delta: f64,
    /// Delta of every sweep, in order
    pub delta_history: Vec<f64>,
}

impl Convergence {
    pub fn converged(&self) -> bool {
        self.status == SolveStatus::Converged
    }
}

/// Value iteration over an [`Environment`].
///
/// The solver owns its value table; the environment is only borrowed and
/// read, so one environment can back several independent solvers.
///
/// # Examples
///
/// ```
/// use bellman_grid::mdp::{Action, GridWorld, GridWorldConfig, ValueIteration, ValueIterationConfig};
///
/// let world = GridWorld::new(GridWorldConfig::default()).unwrap();
/// let mut solver = ValueIteration::new(&world, ValueIterationConfig::default()).unwrap();
///
/// let convergence = solver.run_standard(1e-6, 1000).unwrap();
/// assert!(convergence.converged());
///
/// let policy = solver.greedy_policy();
/// assert_eq!(policy.action_at(3, 4), Some(Action::Down));
/// assert_eq!(policy.action_at(4, 4), None);
/// ```
#[derive(Debug, Clone)]
pub struct ValueIteration<'a, E: Environment + ?Sized> {
    env: &'a E,
    config: ValueIterationConfig,
    values: Array2<f64>,
}

impl<'a, E> ValueIteration<'a, E>
where
    E: Environment + ?Sized,
{
    /// Creates a solver with a fresh value table.
    ///
    /// Fails on an invalid `config`, an empty grid, or an environment that
    /// sends any state outside the grid or pays a non-finite reward.
    pub fn new(env: &'a E, config: ValueIterationConfig) -> Result<Self> {
        config.validate()?;
        check_environment(env)?;
        Ok(Self {
            env,
            config,
            values: initial_values(env, config.initial_value),
        })
    }

    pub fn config(&self) -> &ValueIterationConfig {
        &self.config
    }

    /// # Panics
    /// Panics if `(row, col)` is outside the grid.
    pub fn value_at(&self, row: usize, col: usize) -> f64 {
        self.values[[row, col]]
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Owned copy of the current value table.
    pub fn snapshot(&self) -> Array2<f64> {
        self.values.clone()
    }

    /// Restores the table the solver started with.
    pub fn reset(&mut self) {
        self.values = initial_values(self.env, self.config.initial_value);
    }

    /// Performs one sweep over every non-terminal state and returns the
    /// largest absolute change it made. A NaN change makes the delta NaN, which
    /// never passes the convergence test.
    pub fn sweep(&mut self, discipline: Discipline) -> f64 {
        match discipline {
            Discipline::Standard => self.sweep_standard(),
            Discipline::InPlace => self.sweep_inplace(),
        }
    }

    fn sweep_standard(&mut self) -> f64 {
        let env = self.env;
        let discount = self.config.discount;
        let mut candidate = self.values.clone();
        for s in env.states() {
            if env.is_terminal(s.row, s.col) {
                continue;
            }
            candidate[[s.row, s.col]] = backup(env, &self.values, s.row, s.col, discount).value;
        }
        let delta = max_abs_difference(&candidate, &self.values);
        self.values = candidate;
        delta
    }

    fn sweep_inplace(&mut self) -> f64 {
        let env = self.env;
        let discount = self.config.discount;
        let mut delta = 0.0_f64;
        for s in env.states() {
            if env.is_terminal(s.row, s.col) {
                continue;
            }
            let old = self.values[[s.row, s.col]];
            let new = backup(env, &self.values, s.row, s.col, discount).value;
            self.values[[s.row, s.col]] = new;
            delta = widen_delta(delta, (new - old).abs());
        }
        delta
    }

    /// Runs synchronous sweeps until a sweep changes no state by `theta` or
    /// more, or `max_iterations` sweeps have been made.
    pub fn run_standard(&mut self, theta: f64, max_iterations: usize) -> Result<Convergence> {
        validate_stopping_rule(theta, max_iterations)?;
        Ok(self.solve(Discipline::Standard, theta, max_iterations))
    }

    /// Runs in-place sweeps until a sweep changes no state by `theta` or
    /// more, or `max_iterations` sweeps have been made.
    pub fn run_inplace(&mut self, theta: f64, max_iterations: usize) -> Result<Convergence> {
        validate_stopping_rule(theta, max_iterations)?;
        Ok(self.solve(Discipline::InPlace, theta, max_iterations))
    }

    /// Runs `discipline` with the threshold and cap given at construction.
    pub fn run(&mut self, discipline: Discipline) -> Convergence {
        self.solve(discipline, self.config.theta, self.config.max_iterations)
    }

    fn solve(&mut self, discipline: Discipline, theta: f64, max_iterations: usize) -> Convergence {
        debug!(
            "value iteration ({:?}): grid {}x{}, discount {}, theta {}, cap {}",
            discipline,
            self.env.grid_size(),
            self.env.grid_size(),
            self.config.discount,
            theta,
            max_iterations
        );

        let mut status = SolveStatus::Running;
        let mut delta_history = Vec::new();
        while status == SolveStatus::Running {
            let delta = self.sweep(discipline);
            delta_history.push(delta);
            trace!("sweep {}: delta {:e}", delta_history.len(), delta);

            if delta < theta {
                status = SolveStatus::Converged;
            } else if delta_history.len() >= max_iterations {
                status = SolveStatus::MaxIterationsExceeded;
            }
        }

        let iterations = delta_history.len();
        let final_delta = delta_history.last().copied().unwrap_or(0.0);
        match status {
            SolveStatus::Converged => info!(
                "value iteration ({:?}) converged after {} sweeps (delta {:e})",
                discipline, iterations, final_delta
            ),
            _ => warn!(
                "value iteration ({:?}) stopped at the cap of {} sweeps (delta {:e} >= theta {:e})",
                discipline, iterations, final_delta, theta
            ),
        }

        Convergence {
            discipline,
            status,
            iterations,
            final_delta,
            delta_history,
        }
    }

    /// Greedy policy with respect to the current table.
    ///
    /// Pure function of the table: calling it twice without an intervening
    /// sweep gives the same policy.
    pub fn greedy_policy(&self) -> Policy {
        let n = self.env.grid_size();
        let mut actions = Array2::from_elem((n, n), None);
        for s in self.env.states() {
            if self.env.is_terminal(s.row, s.col) {
                continue;
            }
            let b = backup(self.env, &self.values, s.row, s.col, self.config.discount);
            actions[[s.row, s.col]] = Some(b.action);
        }
        Policy::new(actions)
    }
}

fn initial_values<E>(env: &E, initial_value: f64) -> Array2<f64>
where
    E: Environment + ?Sized,
{
    let n = env.grid_size();
    let mut values = Array2::from_elem((n, n), initial_value);
    for s in env.states() {
        if env.is_terminal(s.row, s.col) {
            values[[s.row, s.col]] = env.terminal_value(s.row, s.col);
        }
    }
    values
}

/// Checks the environment contract once so sweeps can index without checks.
fn check_environment<E>(env: &E) -> Result<()>
where
    E: Environment + ?Sized,
{
    let n = env.grid_size();
    if n == 0 {
        return Err(Error::InvalidConfiguration(
            "grid size must be at least 1".to_string(),
        ));
    }
    for s in env.states() {
        if env.is_terminal(s.row, s.col) {
            let v = env.terminal_value(s.row, s.col);
            if !v.is_finite() {
                return Err(Error::InvalidConfiguration(format!(
                    "terminal state {s} has non-finite value {v}"
                )));
            }
            continue;
        }
        for action in Action::ALL {
            let (successor_row, successor_col, reward) =
                env.successor_and_reward(s.row, s.col, action);
            if !reward.is_finite() {
                return Err(Error::InvalidConfiguration(format!(
                    "moving {action} from {s} pays non-finite reward {reward}"
                )));
            }
            if successor_row >= n || successor_col >= n {
                return Err(Error::SuccessorOutOfBounds {
                    row: s.row,
                    col: s.col,
                    action,
                    successor_row,
                    successor_col,
                });
            }
        }
    }
    Ok(())
}

/// Running maximum that keeps a NaN instead of dropping it like `f64::max`.
fn widen_delta(acc: f64, change: f64) -> f64 {
    if acc.is_nan() || change.is_nan() {
        f64::NAN
    } else {
        acc.max(change)
    }
}

fn max_abs_difference(a: &Array2<f64>, b: &Array2<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .fold(0.0_f64, |acc, (x, y)| widen_delta(acc, (x - y).abs()))
}
