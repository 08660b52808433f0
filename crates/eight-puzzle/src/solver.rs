//! A* search over puzzle states.
//!
//! The search keeps three structures for the lifetime of one call:
//! a [`Frontier`] of pending states, a [`VisitedSet`] of expanded states and
//! a [`ParentMap`] arena keyed on [`StateKey`] that records how each state was
//! reached. Stale frontier entries are skipped when popped rather than removed
//! eagerly.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use log::{debug, trace, warn};
use serde::Serialize;

use crate::error::SearchError;
use crate::frontier::Frontier;
use crate::heuristics::{Heuristic, HeuristicEvaluator};
use crate::moves::successors;
use crate::puzzle::{Move, State, StateKey};

/// How a rediscovered, not yet expanded state updates its parent record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParentPolicy {
    /// Record the latest discoverer every time and always push. Pending
    /// duplicates inflate the frontier but are skipped on pop.
    #[default]
    Overwrite,
    /// Record and push only when the new path is strictly shorter.
    ImproveOnly,
}

/// Configuration for the solver
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Cost estimate guiding the search
    pub heuristic: Heuristic,
    /// Parent update rule on rediscovery
    pub parent_policy: ParentPolicy,
    /// Stop after this many expansions. `None` runs to completion.
    pub max_expansions: Option<usize>,
    /// Reject start/goal pairs of different permutation parity up front
    /// instead of exhausting the reachable space.
    pub parity_precheck: bool,
}

impl SolverConfig {
    pub fn with_heuristic(heuristic: Heuristic) -> Self {
        Self {
            heuristic,
            ..Self::default()
        }
    }
}

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchOutcome {
    Solved,
    NoSolution,
    ExpansionLimit,
}

/// Counters collected during one search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    /// States popped and expanded
    pub expanded: usize,
    /// Frontier pushes, duplicates included
    pub pushed: u64,
    /// Popped entries discarded because their state was already expanded
    pub stale_skipped: usize,
    /// Distinct states recorded in the parent map
    pub discovered: usize,
    /// Largest frontier size observed
    pub peak_frontier: usize,
    pub time_elapsed_ms: u64,
}

/// A start-to-goal walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// States from start to goal inclusive
    pub states: Vec<State>,
    /// `moves[i]` turns `states[i]` into `states[i + 1]`
    pub moves: Vec<Move>,
}

impl Solution {
    fn from_states(states: Vec<State>) -> Result<Self, SearchError> {
        let moves = states
            .windows(2)
            .map(|pair| Move::between(&pair[0], &pair[1]).ok_or(SearchError::BrokenParentChain))
            .collect::<Result<Vec<Move>, SearchError>>()?;
        Ok(Self { states, moves })
    }

    pub fn move_count(&self) -> usize {
        self.moves.len()
    }
}

/// Result of one search call.
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    pub heuristic: Heuristic,
    /// Present iff `outcome` is `Solved`
    pub solution: Option<Solution>,
    pub stats: SearchStats,
}

impl SearchReport {
    /// Collapse the report into the solution or the reason there is none.
    pub fn into_result(self, config: &SolverConfig) -> Result<Solution, SearchError> {
        match (self.outcome, self.solution) {
            (SearchOutcome::Solved, Some(solution)) => Ok(solution),
            (SearchOutcome::Solved, None) => Err(SearchError::BrokenParentChain),
            (SearchOutcome::NoSolution, _) => Err(SearchError::NoSolution {
                expanded: self.stats.expanded,
            }),
            (SearchOutcome::ExpansionLimit, _) => Err(SearchError::ExpansionLimit {
                limit: config.max_expansions.unwrap_or(self.stats.expanded),
            }),
        }
    }
}

/// Arena entry for one discovered state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRecord {
    /// `None` only for the start state
    pub parent: Option<StateKey>,
    /// Cost of the path through `parent`
    pub g: u32,
}

/// Backward pointers from each discovered state to the state it was reached
/// from.
#[derive(Debug, Default)]
pub struct ParentMap {
    nodes: HashMap<StateKey, NodeRecord>,
}

impl ParentMap {
    pub fn insert_start(&mut self, start: StateKey) {
        self.nodes.insert(start, NodeRecord { parent: None, g: 0 });
    }

    /// Record `parent` as the way into `child`, subject to `policy`.
    /// Returns whether the record changed.
    pub fn record(
        &mut self,
        child: StateKey,
        parent: StateKey,
        g: u32,
        policy: ParentPolicy,
    ) -> bool {
        if policy == ParentPolicy::ImproveOnly {
            if let Some(existing) = self.nodes.get(&child) {
                if existing.g <= g {
                    return false;
                }
            }
        }
        self.nodes.insert(
            child,
            NodeRecord {
                parent: Some(parent),
                g,
            },
        );
        true
    }

    pub fn get(&self, key: StateKey) -> Option<&NodeRecord> {
        self.nodes.get(&key)
    }

    pub fn parent_of(&self, key: StateKey) -> Option<StateKey> {
        self.nodes.get(&key).and_then(|record| record.parent)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// States that have been expanded. Membership is permanent.
#[derive(Debug, Default)]
pub struct VisitedSet {
    keys: HashSet<StateKey>,
}

impl VisitedSet {
    /// Returns `false` if `key` was already present.
    pub fn insert(&mut self, key: StateKey) -> bool {
        self.keys.insert(key)
    }

    pub fn contains(&self, key: StateKey) -> bool {
        self.keys.contains(&key)
    }
}

/// Walk `parents` back from `goal` to `start` and return the forward path.
///
/// The walk is bounded by the number of recorded nodes, so an inconsistent
/// map yields [`SearchError::BrokenParentChain`] instead of looping.
pub fn reconstruct_path(
    parents: &ParentMap,
    start: &State,
    goal: &State,
) -> Result<Vec<State>, SearchError> {
    let limit = parents.len() + 1;
    let mut path = vec![*goal];
    let mut key = goal.key();

    while let Some(parent) = parents.parent_of(key) {
        if path.len() >= limit {
            warn!("parent chain longer than {} recorded nodes", parents.len());
            return Err(SearchError::BrokenParentChain);
        }
        let state = State::from_key(parent).map_err(|_| SearchError::BrokenParentChain)?;
        path.push(state);
        key = parent;
    }

    if key != start.key() {
        warn!("parent chain ended at a state other than the start");
        return Err(SearchError::BrokenParentChain);
    }

    path.reverse();
    Ok(path)
}

/// Run A* from `start` to `goal`.
///
/// The only error is [`SearchError::BrokenParentChain`]; exhaustion and the
/// expansion cap are reported through [`SearchReport::outcome`].
pub fn search(
    start: &State,
    goal: &State,
    config: &SolverConfig,
) -> Result<SearchReport, SearchError> {
    let start_time = Instant::now();
    let evaluator = HeuristicEvaluator::new(config.heuristic, goal);

    let mut frontier = Frontier::new();
    let mut visited = VisitedSet::default();
    let mut parents = ParentMap::default();
    let mut stats = SearchStats::default();

    debug!(
        "searching with {} (h = {}), policy {:?}",
        config.heuristic,
        evaluator.estimate(start),
        config.parent_policy
    );

    let finish = |outcome: SearchOutcome,
                  solution: Option<Solution>,
                  mut stats: SearchStats,
                  frontier: &Frontier,
                  parents: &ParentMap| {
        stats.pushed = frontier.pushed();
        stats.peak_frontier = frontier.peak();
        stats.discovered = parents.len();
        stats.time_elapsed_ms = start_time.elapsed().as_millis() as u64;
        debug!(
            "search finished: {:?} after {} expansions ({} stale skipped)",
            outcome, stats.expanded, stats.stale_skipped
        );
        SearchReport {
            outcome,
            heuristic: config.heuristic,
            solution,
            stats,
        }
    };

    if config.parity_precheck && !start.same_parity(goal) {
        debug!("start and goal differ in permutation parity");
        return Ok(finish(
            SearchOutcome::NoSolution,
            None,
            stats,
            &frontier,
            &parents,
        ));
    }

    parents.insert_start(start.key());
    frontier.push(evaluator.estimate(start), 0, *start);

    while let Some(current) = frontier.pop() {
        let key = current.state.key();

        if visited.contains(key) {
            stats.stale_skipped += 1;
            continue;
        }

        if current.state == *goal {
            let path = reconstruct_path(&parents, start, goal)?;
            let solution = Solution::from_states(path)?;
            return Ok(finish(
                SearchOutcome::Solved,
                Some(solution),
                stats,
                &frontier,
                &parents,
            ));
        }

        if let Some(limit) = config.max_expansions {
            if stats.expanded >= limit {
                warn!("expansion limit of {} reached", limit);
                return Ok(finish(
                    SearchOutcome::ExpansionLimit,
                    None,
                    stats,
                    &frontier,
                    &parents,
                ));
            }
        }

        visited.insert(key);
        stats.expanded += 1;
        trace!("expand g={} f={}\n{}", current.g, current.f, current.state);

        let g = current.g + 1;
        for (_, next) in successors(&current.state) {
            let next_key = next.key();
            if visited.contains(next_key) {
                continue;
            }
            if parents.record(next_key, key, g, config.parent_policy) {
                frontier.push(g + evaluator.estimate(&next), g, next);
            }
        }
    }

    Ok(finish(
        SearchOutcome::NoSolution,
        None,
        stats,
        &frontier,
        &parents,
    ))
}

/// Search with validated states and collapse the outcome into a `Result`.
pub fn solve_states(
    start: &State,
    goal: &State,
    config: &SolverConfig,
) -> Result<Solution, SearchError> {
    search(start, goal, config)?.into_result(config)
}

/// Validate raw grids and a heuristic selector (1 = misplaced tiles,
/// 2 = Manhattan distance), then return the optimal start-to-goal sequence.
pub fn solve<R: AsRef<[i64]>>(
    start: &[R],
    goal: &[R],
    heuristic: u8,
) -> Result<Vec<State>, SearchError> {
    let start = State::from_rows(start).map_err(SearchError::invalid_start)?;
    let goal = State::from_rows(goal).map_err(SearchError::invalid_goal)?;
    let heuristic = Heuristic::from_selector(heuristic)?;

    let config = SolverConfig::with_heuristic(heuristic);
    solve_states(&start, &goal, &config).map(|solution| solution.states)
}
