pub mod action;
pub mod bellman_equation;
pub mod comparison;
pub mod environment;
pub mod grid_world;
pub mod policy;
pub mod value_iteration;


// Re-export the solver surface with descriptive names
pub use action::Action;
pub use bellman_equation::{action_value, backup, Backup};
pub use comparison::{compare_disciplines, wall_time_speedup, DisciplineComparison, SolveOutcome};
pub use environment::{Environment, State};
pub use grid_world::{CellClass, GridWorld, GridWorldConfig, Rewards};
pub use policy::Policy;
pub use value_iteration::{
    Convergence, Discipline, SolveStatus, ValueIteration, ValueIterationConfig,
};
