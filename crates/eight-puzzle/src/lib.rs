//! A* solver for the 8-puzzle.
//!
//! Given a start and a goal arrangement of the 3x3 sliding-tile puzzle, the
//! solver finds a shortest sequence of blank slides between them, guided by
//! either the misplaced-tiles or the Manhattan-distance heuristic.
//!
//! ```
//! use eight_puzzle::solve;
//!
//! let start = [vec![1i64, 2, 3], vec![4, 0, 6], vec![7, 5, 8]];
//! let goal = [vec![1i64, 2, 3], vec![4, 5, 6], vec![7, 8, 0]];
//! let path = solve(&start, &goal, 2).unwrap();
//! assert_eq!(path.len() - 1, 2);
//! ```

pub mod error;
pub mod frontier;
pub mod heuristics;
pub mod moves;
pub mod puzzle;
pub mod render;
pub mod solver;

#[cfg(test)]
mod test_support;

// Re-export main types
pub use error::{GridError, GridRole, SearchError};
pub use heuristics::{Heuristic, HeuristicEvaluator};
pub use moves::successors;
pub use puzzle::{Move, PuzzleConfig, State, StateKey};
pub use solver::{
    search, solve, solve_states, ParentPolicy, SearchOutcome, SearchReport, SearchStats,
    Solution, SolverConfig,
};
