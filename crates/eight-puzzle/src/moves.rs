//! Successor generation.
//!
//! Every valid state has between two (blank in a corner) and four (blank in
//! the centre) legal moves, so successors fit in an inline buffer.

use smallvec::SmallVec;

use crate::puzzle::{Move, State};

/// Successors of one state, tagged with the move that produced them.
pub type Successors = SmallVec<[(Move, State); 4]>;

/// All legal successors of `state` in [`Move::ALL`] order. `state` is left
/// untouched.
pub fn successors(state: &State) -> Successors {
    Move::ALL
        .into_iter()
        .filter_map(|m| state.apply(m).map(|next| (m, next)))
        .collect()
}

/// Number of legal moves from `state`, without building the successors.
pub fn branching_factor(state: &State) -> usize {
    let (row, col) = state.blank();
    let edge = |i: usize| if i == 1 { 2 } else { 1 };
    edge(row) + edge(col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::{CELLS, SIZE};
    use crate::test_support::any_state;
    use proptest::prelude::*;

    fn state(rows: [[u8; 3]; 3]) -> State {
        State::new(rows).unwrap()
    }

    /// Cells where the two states differ.
    fn differing_cells(a: &State, b: &State) -> Vec<usize> {
        (0..CELLS).filter(|&i| a.cells()[i] != b.cells()[i]).collect()
    }

    #[test]
    fn test_corner_edge_center_counts() {
        let corner = State::solved();
        let edge = state([[1, 2, 3], [4, 5, 6], [7, 0, 8]]);
        let center = state([[1, 2, 3], [4, 0, 6], [7, 5, 8]]);

        assert_eq!(successors(&corner).len(), 2);
        assert_eq!(successors(&edge).len(), 3);
        assert_eq!(successors(&center).len(), 4);

        assert_eq!(branching_factor(&corner), 2);
        assert_eq!(branching_factor(&edge), 3);
        assert_eq!(branching_factor(&center), 4);
    }

    #[test]
    fn test_successor_order_and_content() {
        let center = state([[1, 2, 3], [4, 0, 6], [7, 5, 8]]);
        let succ = successors(&center);
        let moves: Vec<Move> = succ.iter().map(|(m, _)| *m).collect();
        assert_eq!(moves, vec![Move::Up, Move::Down, Move::Left, Move::Right]);

        assert_eq!(succ[0].1.rows(), [[1, 0, 3], [4, 2, 6], [7, 5, 8]]);
        assert_eq!(succ[1].1.rows(), [[1, 2, 3], [4, 5, 6], [7, 0, 8]]);
        assert_eq!(succ[2].1.rows(), [[1, 2, 3], [0, 4, 6], [7, 5, 8]]);
        assert_eq!(succ[3].1.rows(), [[1, 2, 3], [4, 6, 0], [7, 5, 8]]);
    }

    #[test]
    fn test_input_not_mutated() {
        let s = state([[8, 1, 3], [4, 0, 2], [7, 6, 5]]);
        let copy = s;
        let _ = successors(&s);
        assert_eq!(s, copy);
    }

    proptest! {
        #[test]
        fn prop_successors_are_adjacent_transpositions(s in any_state()) {
            let succ = successors(&s);
            prop_assert_eq!(succ.len(), branching_factor(&s));

            for (m, next) in &succ {
                let diff = differing_cells(&s, next);
                prop_assert_eq!(diff.len(), 2);

                let (a, b) = (diff[0], diff[1]);
                let (ra, ca) = (a / SIZE, a % SIZE);
                let (rb, cb) = (b / SIZE, b % SIZE);
                prop_assert_eq!(ra.abs_diff(rb) + ca.abs_diff(cb), 1);

                // The two swapped cells are the old and new blank positions.
                prop_assert!(diff.contains(&s.blank_index()));
                prop_assert!(diff.contains(&next.blank_index()));
                prop_assert_eq!(next.apply(m.opposite()), Some(s));
            }
        }
    }
}
