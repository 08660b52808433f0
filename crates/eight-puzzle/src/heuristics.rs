//! Admissible cost estimates for the A* search.
//!
//! Both estimators ignore the blank, are zero exactly at the goal, and never
//! overestimate the number of moves still needed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::puzzle::{State, BLANK, CELLS, SIZE};

/// Which estimator drives the search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Heuristic {
    /// h1: number of non-blank tiles not on their goal cell.
    MisplacedTiles,
    /// h2: sum of grid distances from each tile to its goal cell.
    #[default]
    Manhattan,
}

impl Heuristic {
    /// Map the console selector (1 or 2) to a heuristic.
    pub fn from_selector(selector: u8) -> Result<Self, SearchError> {
        match selector {
            1 => Ok(Heuristic::MisplacedTiles),
            2 => Ok(Heuristic::Manhattan),
            other => Err(SearchError::UnknownHeuristic {
                selector: other.to_string(),
            }),
        }
    }

    pub fn selector(self) -> u8 {
        match self {
            Heuristic::MisplacedTiles => 1,
            Heuristic::Manhattan => 2,
        }
    }
}

impl TryFrom<u8> for Heuristic {
    type Error = SearchError;

    fn try_from(selector: u8) -> Result<Self, Self::Error> {
        Heuristic::from_selector(selector)
    }
}

impl From<Heuristic> for u8 {
    fn from(h: Heuristic) -> u8 {
        h.selector()
    }
}

/// Accepts the numeric selector or a name: `misplaced`, `manhattan`.
impl FromStr for Heuristic {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "misplaced" | "misplaced-tiles" | "h1" => Ok(Heuristic::MisplacedTiles),
            "2" | "manhattan" | "h2" => Ok(Heuristic::Manhattan),
            other => Err(SearchError::UnknownHeuristic {
                selector: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Heuristic::MisplacedTiles => write!(f, "misplaced tiles"),
            Heuristic::Manhattan => write!(f, "Manhattan distance"),
        }
    }
}

/// Goal cell of every label, built once per search.
#[derive(Debug, Clone)]
pub struct GoalIndex {
    goal: State,
    /// `cell_of[label]` is the row-major index of `label` in the goal.
    cell_of: [u8; CELLS],
}

impl GoalIndex {
    pub fn new(goal: &State) -> Self {
        let mut cell_of = [0u8; CELLS];
        for (i, &label) in goal.cells().iter().enumerate() {
            cell_of[label as usize] = i as u8;
        }
        Self {
            goal: *goal,
            cell_of,
        }
    }

    pub fn goal(&self) -> &State {
        &self.goal
    }

    /// (row, col) of `label` in the goal.
    pub fn position(&self, label: u8) -> (usize, usize) {
        let i = self.cell_of[label as usize] as usize;
        (i / SIZE, i % SIZE)
    }
}

/// Count of non-blank cells whose label differs from the goal's.
pub fn misplaced_tiles(state: &State, goal: &State) -> u32 {
    state
        .cells()
        .iter()
        .zip(goal.cells())
        .filter(|&(&have, &want)| have != BLANK && have != want)
        .count() as u32
}

/// Sum of |drow| + |dcol| between each tile and its goal cell.
pub fn manhattan_distance(state: &State, index: &GoalIndex) -> u32 {
    state
        .cells()
        .iter()
        .enumerate()
        .filter(|&(_, &label)| label != BLANK)
        .map(|(i, &label)| {
            let (goal_row, goal_col) = index.position(label);
            ((i / SIZE).abs_diff(goal_row) + (i % SIZE).abs_diff(goal_col)) as u32
        })
        .sum()
}

/// A heuristic bound to one goal.
#[derive(Debug, Clone)]
pub struct HeuristicEvaluator {
    kind: Heuristic,
    index: GoalIndex,
}

impl HeuristicEvaluator {
    pub fn new(kind: Heuristic, goal: &State) -> Self {
        Self {
            kind,
            index: GoalIndex::new(goal),
        }
    }

    /// Lower bound on the moves from `state` to the goal.
    pub fn estimate(&self, state: &State) -> u32 {
        match self.kind {
            Heuristic::MisplacedTiles => misplaced_tiles(state, self.index.goal()),
            Heuristic::Manhattan => manhattan_distance(state, &self.index),
        }
    }
}
