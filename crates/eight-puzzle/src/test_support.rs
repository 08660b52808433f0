//! Shared proptest strategies.

use proptest::prelude::*;

use crate::moves::successors;
use crate::puzzle::{State, CELLS};

/// Any permutation of the nine labels, either parity.
pub fn any_state() -> impl Strategy<Value = State> {
    Just((0..CELLS as u8).collect::<Vec<u8>>())
        .prop_shuffle()
        .prop_map(|labels| {
            let mut cells = [0u8; CELLS];
            cells.copy_from_slice(&labels);
            State::from_cells(cells).unwrap()
        })
}

/// Up to `max_len` successor choices for [`random_walk`].
pub fn walk_choices(max_len: usize) -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..4, 0..=max_len)
}

/// Follow `choices` from `from`, picking successors modulo the branching factor.
pub fn random_walk(from: &State, choices: &[usize]) -> State {
    choices.iter().fold(*from, |current, &choice| {
        let next = successors(&current);
        next[choice % next.len()].1
    })
}
