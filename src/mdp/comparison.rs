//! Side-by-side solve of the two sweep disciplines.

use std::time::Duration;

use ndarray::Array2;

use crate::error::Result;
use crate::mdp::{Action, Convergence, Discipline, Environment, Policy, ValueIteration, ValueIterationConfig};

/// Everything one solve produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    pub convergence: Convergence,
    pub values: Array2<f64>,
    pub policy: Policy,
}

impl SolveOutcome {
    /// Solves `env` from a freshly allocated table and extracts the greedy
    /// policy.
    pub fn solve<E>(env: &E, config: ValueIterationConfig, discipline: Discipline) -> Result<Self>
    where
        E: Environment + ?Sized,
    {
        let mut solver = ValueIteration::new(env, config)?;
        let convergence = solver.run(discipline);
        let policy = solver.greedy_policy();
        Ok(Self {
            convergence,
            values: solver.snapshot(),
            policy,
        })
    }

    pub fn value_tables_live(&self) -> usize {
        self.convergence.discipline.value_tables_live()
    }

    /// `f64` entries held while sweeping: one grid per live table.
    pub fn values_live(&self) -> usize {
        self.value_tables_live() * self.values.len()
    }

    /// Cost of one sweep under a dense transition model: every state against
    /// every successor for each of the four actions.
    pub fn operations_per_sweep(&self) -> usize {
        let cells = self.values.len();
        cells * cells * Action::ALL.len()
    }

    pub fn total_operations(&self) -> usize {
        self.convergence.iterations * self.operations_per_sweep()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisciplineComparison {
    pub standard: SolveOutcome,
    pub in_place: SolveOutcome,
    /// Largest absolute per-state difference between the two value tables
    pub max_value_difference: f64,
    /// Fraction of cells with the same greedy action
    pub policy_agreement: f64,
}

impl DisciplineComparison {
    /// Diffs two finished solves.
    pub fn from_outcomes(standard: SolveOutcome, in_place: SolveOutcome) -> Self {
        let max_value_difference = standard
            .values
            .iter()
            .zip(in_place.values.iter())
            .fold(0.0_f64, |acc, (a, b)| acc.max((a - b).abs()));
        let policy_agreement = standard.policy.agreement(&in_place.policy);
        Self {
            standard,
            in_place,
            max_value_difference,
            policy_agreement,
        }
    }

    pub fn policies_match(&self) -> bool {
        self.standard.policy == self.in_place.policy
    }

    /// Sweeps saved by the in-place discipline; negative if it needed more.
    pub fn iterations_saved(&self) -> isize {
        self.standard.convergence.iterations as isize - self.in_place.convergence.iterations as isize
    }
}

/// Which discipline finished first on the wall clock and by what percentage,
/// measured as `slower / faster - 1`. Ties go to the standard discipline.
/// `None` when the faster run took no measurable time.
pub fn wall_time_speedup(standard: Duration, in_place: Duration) -> Option<(Discipline, f64)> {
    let (winner, faster, slower) = if in_place < standard {
        (Discipline::InPlace, in_place, standard)
    } else {
        (Discipline::Standard, standard, in_place)
    };
    if faster.is_zero() {
        return None;
    }
    Some((winner, (slower.as_secs_f64() / faster.as_secs_f64() - 1.0) * 100.0))
}

/// Runs a standard and an in-place solve over the same read-only environment,
/// each on its own value table, and diffs the results.
///
/// # Examples
///
/// ```
/// use bellman_grid::mdp::{compare_disciplines, GridWorld, GridWorldConfig, ValueIterationConfig};
///
/// let world = GridWorld::new(GridWorldConfig::default()).unwrap();
/// let cmp = compare_disciplines(&world, ValueIterationConfig::default()).unwrap();
///
/// assert!(cmp.policies_match());
/// assert!(cmp.max_value_difference <= 1e-4);
/// ```
pub fn compare_disciplines<E>(env: &E, config: ValueIterationConfig) -> Result<DisciplineComparison>
where
    E: Environment + ?Sized,
{
    let standard = SolveOutcome::solve(env, config, Discipline::Standard)?;
    let in_place = SolveOutcome::solve(env, config, Discipline::InPlace)?;
    Ok(DisciplineComparison::from_outcomes(standard, in_place))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdp::{GridWorld, GridWorldConfig};

    #[test]
    fn test_default_scenario_agrees() {
        let world = GridWorld::new(GridWorldConfig::default()).unwrap();
        let cmp = compare_disciplines(&world, ValueIterationConfig::default()).unwrap();

        assert!(cmp.standard.convergence.converged());
        assert!(cmp.in_place.convergence.converged());
        assert!(cmp.standard.convergence.iterations < 1000);
        assert!(cmp.in_place.convergence.iterations < 1000);
        assert_eq!(cmp.policy_agreement, 1.0);
        assert!(cmp.policies_match());
        assert!(cmp.max_value_difference <= 1e-4);
        assert_eq!(cmp.standard.value_tables_live(), 2);
        assert_eq!(cmp.in_place.value_tables_live(), 1);
        assert_eq!(
            cmp.iterations_saved(),
            cmp.standard.convergence.iterations as isize
                - cmp.in_place.convergence.iterations as isize
        );
    }

    #[test]
    fn test_cost_figures() {
        let world = GridWorld::new(GridWorldConfig::default()).unwrap();
        let cmp = compare_disciplines(&world, ValueIterationConfig::default()).unwrap();

        assert_eq!(cmp.standard.operations_per_sweep(), 2_500);
        assert_eq!(cmp.in_place.operations_per_sweep(), 2_500);
        assert_eq!(
            cmp.standard.total_operations(),
            cmp.standard.convergence.iterations * 2_500
        );
        assert_eq!(cmp.standard.values_live(), 50);
        assert_eq!(cmp.in_place.values_live(), 25);
    }

    #[test]
    fn test_wall_time_speedup() {
        let ms = Duration::from_millis;
        let (winner, pct) = wall_time_speedup(ms(30), ms(20)).unwrap();
        assert_eq!(winner, Discipline::InPlace);
        assert!((pct - 50.0).abs() < 1e-9);

        let (winner, pct) = wall_time_speedup(ms(10), ms(40)).unwrap();
        assert_eq!(winner, Discipline::Standard);
        assert!((pct - 300.0).abs() < 1e-9);

        let (winner, pct) = wall_time_speedup(ms(10), ms(10)).unwrap();
        assert_eq!(winner, Discipline::Standard);
        assert_eq!(pct, 0.0);

        assert_eq!(wall_time_speedup(Duration::ZERO, ms(5)), None);
        assert_eq!(wall_time_speedup(ms(5), Duration::ZERO), None);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let world = GridWorld::new(GridWorldConfig::default()).unwrap();
        let config = ValueIterationConfig {
            discount: 1.0,
            ..ValueIterationConfig::default()
        };
        assert!(compare_disciplines(&world, config).is_err());
    }
}
