//! Open list for the A* search.
//!
//! Entries are popped in order of smallest `f`, then smallest `g`, then
//! insertion order. A state may appear more than once; the solver discards
//! stale copies when they are popped.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::puzzle::State;

/// One pending search node.
#[derive(Debug, Clone, Copy)]
pub struct FrontierEntry {
    pub f: u32,
    pub g: u32,
    pub state: State,
    seq: u64,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl Ord for FrontierEntry {
    // Reversed so the max-heap yields the smallest (f, g, seq).
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.g.cmp(&self.g))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority queue of candidate states keyed on `f = g + h`.
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<FrontierEntry>,
    next_seq: u64,
    peak: usize,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, f: u32, g: u32, state: State) {
        self.heap.push(FrontierEntry {
            f,
            g,
            state,
            seq: self.next_seq,
        });
        self.next_seq += 1;
        self.peak = self.peak.max(self.heap.len());
    }

    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.heap.pop()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Total number of pushes so far, stale duplicates included.
    pub fn pushed(&self) -> u64 {
        self.next_seq
    }

    /// Largest size the queue has reached.
    pub fn peak(&self) -> usize {
        self.peak
    }
}
