//! Puzzle representation types.
//!
//! A [`State`] is an immutable 3x3 arrangement of the labels 0..=8, with 0
//! standing for the blank. States can only be built through validating
//! constructors, so every `State` value is a permutation of the nine labels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, SearchError};
use crate::heuristics::Heuristic;

/// Side length of the board.
pub const SIZE: usize = 3;
/// Number of cells on the board.
pub const CELLS: usize = SIZE * SIZE;
/// Label used for the blank cell.
pub const BLANK: u8 = 0;

const KEY_BITS: u32 = 4;
const KEY_MASK: u64 = 0xf;

/// Direction the blank slides. Applying a move swaps the blank with the
/// neighbouring tile on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// All moves in generation order.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// (row, column) offset of the cell the blank moves into.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
        }
    }

    pub fn opposite(self) -> Move {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }

    /// The move that turns `from` into `to`, if they are one slide apart.
    pub fn between(from: &State, to: &State) -> Option<Move> {
        Move::ALL
            .into_iter()
            .find(|&m| from.apply(m).as_ref() == Some(to))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        };
        write!(f, "{}", s)
    }
}

/// Canonical packed encoding of a [`State`]: four bits per cell, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey(u64);

/// A 3x3 tile arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<i64>>", into = "[[u8; 3]; 3]")]
pub struct State {
    cells: [u8; CELLS],
    /// Index of the blank in `cells`, kept in sync by every constructor.
    blank: u8,
}

impl State {
    /// Build a state from a fixed-shape grid.
    pub fn new(rows: [[u8; SIZE]; SIZE]) -> Result<Self, GridError> {
        let mut cells = [0u8; CELLS];
        for (r, row) in rows.iter().enumerate() {
            cells[r * SIZE..(r + 1) * SIZE].copy_from_slice(row);
        }
        Self::from_cells(cells)
    }

    /// Build a state from row-major cells.
    pub fn from_cells(cells: [u8; CELLS]) -> Result<Self, GridError> {
        let labelled = cells
            .iter()
            .enumerate()
            .map(|(i, &v)| (i / SIZE, i % SIZE, v as i64));
        let cells = validate_labels(labelled)?;
        Ok(Self::from_valid_cells(cells))
    }

    /// Build a state from untrusted rows, checking the shape first.
    pub fn from_rows<R: AsRef<[i64]>>(rows: &[R]) -> Result<Self, GridError> {
        if rows.len() != SIZE {
            return Err(GridError::WrongRowCount { got: rows.len() });
        }
        for (r, row) in rows.iter().enumerate() {
            let len = row.as_ref().len();
            if len != SIZE {
                return Err(GridError::WrongRowLength { row: r, got: len });
            }
        }

        let labelled = rows.iter().enumerate().flat_map(|(r, row)| {
            row.as_ref()
                .iter()
                .enumerate()
                .map(move |(c, &v)| (r, c, v))
        });
        let cells = validate_labels(labelled)?;
        Ok(Self::from_valid_cells(cells))
    }

    /// Decode a packed key. Keys not produced by [`State::key`] are validated
    /// like any other input.
    pub fn from_key(key: StateKey) -> Result<Self, GridError> {
        let mut cells = [0u8; CELLS];
        for (i, cell) in cells.iter_mut().enumerate() {
            *cell = ((key.0 >> (i as u32 * KEY_BITS)) & KEY_MASK) as u8;
        }
        Self::from_cells(cells)
    }

    /// The conventional solved arrangement: 1..=8 in order, blank last.
    pub fn solved() -> Self {
        Self::from_valid_cells([1, 2, 3, 4, 5, 6, 7, 8, BLANK])
    }

    fn from_valid_cells(cells: [u8; CELLS]) -> Self {
        let blank = cells.iter().position(|&v| v == BLANK).unwrap_or(0) as u8;
        Self { cells, blank }
    }

    pub fn cells(&self) -> &[u8; CELLS] {
        &self.cells
    }

    pub fn rows(&self) -> [[u8; SIZE]; SIZE] {
        let mut rows = [[0u8; SIZE]; SIZE];
        for (i, &v) in self.cells.iter().enumerate() {
            rows[i / SIZE][i % SIZE] = v;
        }
        rows
    }

    /// Label at (row, col). Panics if either coordinate is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row * SIZE + col]
    }

    pub fn blank_index(&self) -> usize {
        self.blank as usize
    }

    /// (row, col) of the blank.
    pub fn blank(&self) -> (usize, usize) {
        let i = self.blank_index();
        (i / SIZE, i % SIZE)
    }

    pub fn key(&self) -> StateKey {
        let packed = self
            .cells
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, &v)| acc | ((v as u64) << (i as u32 * KEY_BITS)));
        StateKey(packed)
    }

    /// Slide the blank in direction `m`. Returns `None` when the blank would
    /// leave the board.
    pub fn apply(&self, m: Move) -> Option<State> {
        let (row, col) = self.blank();
        let (dr, dc) = m.delta();
        let new_row = row as isize + dr;
        let new_col = col as isize + dc;

        if new_row < 0 || new_row >= SIZE as isize || new_col < 0 || new_col >= SIZE as isize {
            return None;
        }

        let target = new_row as usize * SIZE + new_col as usize;
        let mut cells = self.cells;
        cells.swap(self.blank_index(), target);
        Some(State {
            cells,
            blank: target as u8,
        })
    }

    /// Number of out-of-order pairs among the non-blank tiles in row-major order.
    pub fn inversions(&self) -> usize {
        let tiles: Vec<u8> = self.cells.iter().copied().filter(|&v| v != BLANK).collect();
        tiles
            .iter()
            .enumerate()
            .map(|(i, &a)| tiles[i + 1..].iter().filter(|&&b| b < a).count())
            .sum()
    }

    /// On an odd-width board, two states are mutually reachable iff their
    /// inversion counts have the same parity.
    pub fn same_parity(&self, other: &State) -> bool {
        self.inversions() % 2 == other.inversions() % 2
    }
}

/// Check that the labels form a permutation of 0..=8, reporting the first
/// offending cell or label.
fn validate_labels(
    labelled: impl Iterator<Item = (usize, usize, i64)>,
) -> Result<[u8; CELLS], GridError> {
    let mut cells = [0u8; CELLS];
    let mut seen = [false; CELLS];

    for (row, col, value) in labelled {
        if !(0..CELLS as i64).contains(&value) {
            return Err(GridError::LabelOutOfRange { row, col, value });
        }
        let label = value as u8;
        if seen[label as usize] {
            return Err(GridError::DuplicateLabel { label });
        }
        seen[label as usize] = true;
        cells[row * SIZE + col] = label;
    }

    if let Some(missing) = seen.iter().position(|&s| !s) {
        return Err(GridError::MissingLabel {
            label: missing as u8,
        });
    }

    Ok(cells)
}

impl TryFrom<Vec<Vec<i64>>> for State {
    type Error = GridError;

    fn try_from(rows: Vec<Vec<i64>>) -> Result<Self, Self::Error> {
        State::from_rows(&rows)
    }
}

impl From<State> for [[u8; SIZE]; SIZE] {
    fn from(state: State) -> Self {
        state.rows()
    }
}

/// Parses nine labels separated by whitespace and/or commas, row-major,
/// e.g. `"1 2 3 4 0 6 7 5 8"` or `"1,2,3,4,0,6,7,5,8"`.
impl FromStr for State {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .map(|t| {
                t.parse::<i64>().map_err(|_| GridError::Parse {
                    token: t.to_string(),
                })
            })
            .collect::<Result<Vec<i64>, GridError>>()?;

        if values.len() != CELLS {
            return Err(GridError::WrongCellCount { got: values.len() });
        }

        let rows: Vec<&[i64]> = values.chunks(SIZE).collect();
        State::from_rows(&rows)
    }
}

/// Blank rendered as a space, each label followed by a single space.
impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(SIZE) {
            for &v in row {
                if v == BLANK {
                    write!(f, "  ")?;
                } else {
                    write!(f, "{} ", v)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A puzzle document as read from JSON.
///
/// Grids stay as raw integers here so that validation errors surface as
/// [`GridError`]s rather than JSON parse failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleConfig {
    pub start: Vec<Vec<i64>>,
    pub goal: Vec<Vec<i64>>,
    /// 1 = misplaced tiles, 2 = Manhattan distance.
    #[serde(default)]
    pub heuristic: Option<i64>,
}

impl PuzzleConfig {
    pub fn start_state(&self) -> Result<State, SearchError> {
        State::from_rows(&self.start).map_err(SearchError::invalid_start)
    }

    pub fn goal_state(&self) -> Result<State, SearchError> {
        State::from_rows(&self.goal).map_err(SearchError::invalid_goal)
    }

    /// The selected heuristic, Manhattan distance when the document names none.
    pub fn heuristic(&self) -> Result<Heuristic, SearchError> {
        match self.heuristic {
            Some(selector) => u8::try_from(selector)
                .map_err(|_| SearchError::UnknownHeuristic {
                    selector: selector.to_string(),
                })
                .and_then(Heuristic::from_selector),
            None => Ok(Heuristic::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(rows: [[u8; 3]; 3]) -> State {
        State::new(rows).unwrap()
    }

    #[test]
    fn test_move_opposites() {
        for m in Move::ALL {
            assert_eq!(m.opposite().opposite(), m);
            assert_ne!(m.opposite(), m);
        }
        assert_eq!(Move::Up.opposite(), Move::Down);
        assert_eq!(Move::Left.opposite(), Move::Right);
    }

    #[test]
    fn test_blank_position_is_tracked() {
        let s = state([[1, 2, 3], [4, 0, 6], [7, 5, 8]]);
        assert_eq!(s.blank(), (1, 1));

        let down = s.apply(Move::Down).unwrap();
        assert_eq!(down.blank(), (2, 1));
        assert_eq!(down.get(1, 1), 5);
        assert_eq!(down.rows(), [[1, 2, 3], [4, 5, 6], [7, 0, 8]]);
    }

    #[test]
    fn test_apply_out_of_bounds() {
        let corner = State::solved();
        assert_eq!(corner.blank(), (2, 2));
        assert!(corner.apply(Move::Down).is_none());
        assert!(corner.apply(Move::Right).is_none());
        assert!(corner.apply(Move::Up).is_some());
        assert!(corner.apply(Move::Left).is_some());
    }

    #[test]
    fn test_move_between() {
        let s = state([[1, 2, 3], [4, 0, 6], [7, 5, 8]]);
        let t = s.apply(Move::Left).unwrap();
        assert_eq!(Move::between(&s, &t), Some(Move::Left));
        assert_eq!(Move::between(&t, &s), Some(Move::Right));
        assert_eq!(Move::between(&s, &s), None);
    }

    #[test]
    fn test_from_rows_rejects_bad_shape() {
        let two_rows = vec![vec![1i64, 2, 3], vec![4, 5, 6]];
        assert_eq!(
            State::from_rows(&two_rows),
            Err(GridError::WrongRowCount { got: 2 })
        );

        let short_row = vec![vec![1i64, 2, 3], vec![4, 5], vec![6, 7, 8]];
        assert_eq!(
            State::from_rows(&short_row),
            Err(GridError::WrongRowLength { row: 1, got: 2 })
        );
    }

    #[test]
    fn test_from_rows_rejects_bad_labels() {
        let out_of_range = vec![vec![1i64, 2, 3], vec![4, 9, 6], vec![7, 8, 0]];
        assert_eq!(
            State::from_rows(&out_of_range),
            Err(GridError::LabelOutOfRange {
                row: 1,
                col: 1,
                value: 9
            })
        );

        let negative = vec![vec![-1i64, 2, 3], vec![4, 5, 6], vec![7, 8, 0]];
        assert!(matches!(
            State::from_rows(&negative),
            Err(GridError::LabelOutOfRange { value: -1, .. })
        ));

        let duplicate = vec![vec![1i64, 2, 3], vec![4, 5, 6], vec![7, 8, 8]];
        assert_eq!(
            State::from_rows(&duplicate),
            Err(GridError::DuplicateLabel { label: 8 })
        );
    }

    #[test]
    fn test_from_cells() {
        assert_eq!(
            State::from_cells([1, 2, 3, 4, 5, 6, 7, 8, 1]),
            Err(GridError::DuplicateLabel { label: 1 })
        );
        assert_eq!(
            State::from_cells([1, 2, 3, 4, 5, 6, 7, 8, 0]).unwrap(),
            State::solved()
        );
    }

    #[test]
    fn test_parse_state() {
        let s: State = "1 2 3 4 0 6 7 5 8".parse().unwrap();
        assert_eq!(s.rows(), [[1, 2, 3], [4, 0, 6], [7, 5, 8]]);

        let c: State = "1,2,3, 4,0,6, 7,5,8".parse().unwrap();
        assert_eq!(s, c);

        assert_eq!(
            "1 2 3".parse::<State>(),
            Err(GridError::WrongCellCount { got: 3 })
        );
        assert!(matches!(
            "1 2 x 4 0 6 7 5 8".parse::<State>(),
            Err(GridError::Parse { .. })
        ));
    }

    #[test]
    fn test_key_is_canonical() {
        let a = state([[1, 2, 3], [4, 0, 6], [7, 5, 8]]);
        let b = state([[1, 2, 3], [4, 5, 6], [7, 8, 0]]);
        assert_ne!(a.key(), b.key());
        assert_eq!(State::from_key(a.key()).unwrap(), a);
        assert_eq!(State::from_key(b.key()).unwrap(), b);
    }

    #[test]
    fn test_parity() {
        let goal = State::solved();
        let one_slide = goal.apply(Move::Left).unwrap();
        assert!(goal.same_parity(&one_slide));

        let swapped = state([[2, 1, 3], [4, 5, 6], [7, 8, 0]]);
        assert_eq!(swapped.inversions(), 1);
        assert!(!goal.same_parity(&swapped));
    }

    #[test]
    fn test_display_shows_blank_as_space() {
        let s = state([[1, 2, 3], [4, 0, 6], [7, 5, 8]]);
        assert_eq!(s.to_string(), "1 2 3 \n4   6 \n7 5 8 \n");
    }

    #[test]
    fn test_state_serde() {
        let s: State = serde_json::from_str("[[1,2,3],[4,0,6],[7,5,8]]").unwrap();
        assert_eq!(s.blank(), (1, 1));
        assert_eq!(serde_json::to_string(&s).unwrap(), "[[1,2,3],[4,0,6],[7,5,8]]");

        let bad: Result<State, _> = serde_json::from_str("[[1,2,3],[4,4,6],[7,5,8]]");
        assert!(bad.is_err());
    }

    #[test]
    fn test_puzzle_config_parsing() {
        let json = r#"{
            "start": [[1, 2, 3], [4, 0, 6], [7, 5, 8]],
            "goal": [[1, 2, 3], [4, 5, 6], [7, 8, 0]],
            "heuristic": 1
        }"#;
        let config: PuzzleConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.start_state().unwrap().blank(), (1, 1));
        assert_eq!(config.goal_state().unwrap(), State::solved());
        assert_eq!(config.heuristic().unwrap(), Heuristic::MisplacedTiles);
    }

    #[test]
    fn test_puzzle_config_defaults_and_errors() {
        let json = r#"{
            "start": [[1, 2, 3], [4, 0, 6]],
            "goal": [[1, 2, 3], [4, 5, 6], [7, 8, 0]]
        }"#;
        let config: PuzzleConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.heuristic().unwrap(), Heuristic::Manhattan);
        assert_eq!(
            config.start_state(),
            Err(SearchError::invalid_start(GridError::WrongRowCount { got: 2 }))
        );

        let config = PuzzleConfig {
            heuristic: Some(3),
            ..config
        };
        assert!(matches!(
            config.heuristic(),
            Err(SearchError::UnknownHeuristic { .. })
        ));
    }

    #[test]
    fn test_puzzle_config_wide_selectors() {
        for (selector, shown) in [("300", "300"), ("-1", "-1")] {
            let json = format!(
                r#"{{"start": [[1, 2, 3], [4, 0, 6], [7, 5, 8]],
                    "goal": [[1, 2, 3], [4, 5, 6], [7, 8, 0]],
                    "heuristic": {}}}"#,
                selector
            );
            let config: PuzzleConfig = serde_json::from_str(&json).unwrap();
            assert_eq!(
                config.heuristic(),
                Err(SearchError::UnknownHeuristic {
                    selector: shown.to_string()
                })
            );
        }
    }
}
