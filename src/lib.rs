//! Value iteration for deterministic grid-shaped Markov Decision Processes.
//!
//! The [`mdp`] module holds the environment contract, a configurable grid
//! world, the Bellman backup and a solver that runs either synchronous
//! (double-buffered) or in-place (single-buffer) sweeps.
//!
//! ```
//! use bellman_grid::mdp::{GridWorld, GridWorldConfig, ValueIteration, ValueIterationConfig};
//!
//! let world = GridWorld::new(GridWorldConfig::default()).unwrap();
//! let mut solver = ValueIteration::new(&world, ValueIterationConfig::default()).unwrap();
//! let convergence = solver.run_inplace(1e-6, 1000).unwrap();
//!
//! assert!(convergence.converged());
//! assert_eq!(solver.value_at(4, 4), 10.0);
//! ```

pub mod error;
pub mod mdp;

pub use error::{Error, Result};
