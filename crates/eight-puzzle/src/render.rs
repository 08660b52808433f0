//! Plain-text rendering of states and search results.

use std::fmt::Write;

use crate::puzzle::State;
use crate::solver::Solution;

const SEPARATOR: &str = "-------";

/// One grid, blank shown as a space, followed by a separator line.
pub fn render_grid(state: &State) -> String {
    format!("{}{}\n", state, SEPARATOR)
}

/// Summary line for a finished search.
pub fn summary(solution: Option<&Solution>) -> String {
    match solution {
        Some(s) => format!("Solution found in {} moves:", s.move_count()),
        None => "No solution found.".to_string(),
    }
}

/// Summary line for a search cut off by its expansion cap. A solution may
/// still exist.
pub fn expansion_limit_summary(expanded: usize) -> String {
    format!(
        "Search stopped after {} expansions; no solution found yet.",
        expanded
    )
}

/// Summary line followed by every step of the solution.
pub fn render_solution(solution: &Solution) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", summary(Some(solution)));
    for (i, state) in solution.states.iter().enumerate() {
        match i.checked_sub(1).and_then(|m| solution.moves.get(m)) {
            Some(m) => {
                let _ = writeln!(out, "Step {} ({}):", i, m);
            }
            None => {
                let _ = writeln!(out, "Step {}:", i);
            }
        }
        out.push_str(&render_grid(state));
    }
    out
}
