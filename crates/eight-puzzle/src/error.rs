//! Error types for grid validation and search.

use std::fmt;

use thiserror::Error;

/// Reasons a tile grid is rejected before any search begins.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GridError {
    #[error("expected 3 rows, got {got}")]
    WrongRowCount { got: usize },

    #[error("row {row} has {got} cells (expected 3)")]
    WrongRowLength { row: usize, got: usize },

    #[error("expected 9 labels, got {got}")]
    WrongCellCount { got: usize },

    #[error("label {value} at ({row}, {col}) is outside 0..=8")]
    LabelOutOfRange { row: usize, col: usize, value: i64 },

    #[error("label {label} appears more than once")]
    DuplicateLabel { label: u8 },

    /// Unreachable from nine in-range cells, where a gap always shows up
    /// first as a duplicate. Kept so the label check is total.
    #[error("label {label} is missing")]
    MissingLabel { label: u8 },

    #[error("cannot parse '{token}' as a tile label")]
    Parse { token: String },
}

/// Which of the two input grids failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridRole {
    Start,
    Goal,
}

impl fmt::Display for GridRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridRole::Start => write!(f, "start"),
            GridRole::Goal => write!(f, "goal"),
        }
    }
}

/// Errors surfaced by [`crate::solver::solve`] and friends.
///
/// `NoSolution` is a normal outcome for an unsolvable instance rather than a
/// fault; use [`SearchError::is_no_solution`] to tell it apart from bad input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("invalid {which} grid: {source}")]
    InvalidGrid {
        which: GridRole,
        #[source]
        source: GridError,
    },

    #[error("unknown heuristic selector {selector} (expected 1 or 2)")]
    UnknownHeuristic { selector: String },

    #[error("no solution found after expanding {expanded} states")]
    NoSolution { expanded: usize },

    #[error("search stopped after reaching the expansion limit of {limit}")]
    ExpansionLimit { limit: usize },

    #[error("parent chain does not lead back to the start state")]
    BrokenParentChain,
}

impl SearchError {
    pub fn invalid_start(source: GridError) -> Self {
        SearchError::InvalidGrid {
            which: GridRole::Start,
            source,
        }
    }

    pub fn invalid_goal(source: GridError) -> Self {
        SearchError::InvalidGrid {
            which: GridRole::Goal,
            source,
        }
    }

    /// True when the search ran to exhaustion without reaching the goal.
    pub fn is_no_solution(&self) -> bool {
        matches!(self, SearchError::NoSolution { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_grid_message_names_role() {
        let err = SearchError::invalid_goal(GridError::DuplicateLabel { label: 4 });
        assert_eq!(
            err.to_string(),
            "invalid goal grid: label 4 appears more than once"
        );
    }

    #[test]
    fn test_no_solution_is_distinguishable() {
        assert!(SearchError::NoSolution { expanded: 10 }.is_no_solution());
        assert!(!SearchError::invalid_start(GridError::WrongRowCount { got: 2 }).is_no_solution());
        assert!(!SearchError::UnknownHeuristic {
            selector: "3".to_string()
        }
        .is_no_solution());
    }
}
