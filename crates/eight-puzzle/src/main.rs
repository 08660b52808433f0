//! CLI entry point for the 8-puzzle solver.
//!
//! Usage:
//!   eight-puzzle solve <puzzle.json> [options]
//!   eight-puzzle solve --stdin [options]
//!   eight-puzzle solve --start "1 2 3 4 0 6 7 5 8" --goal "1 2 3 4 5 6 7 8 0"
//!   eight-puzzle heuristics <puzzle.json>
//!   eight-puzzle interactive
//!
//! Options (solve):
//!   --heuristic <h>         1 | 2 | misplaced | manhattan (default: 2)
//!   --strict-parents        Update parents only on a strictly shorter path
//!   --max-expansions <n>    Stop after n expansions
//!   --parity-check          Reject unsolvable pairs before searching
//!   --json                  Print a JSON report instead of the grids
//!
//! The exit code is 0 whether or not a solution exists, and 1 for unreadable
//! or invalid input.

use std::collections::VecDeque;
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use log::info;
use serde::Serialize;
use thiserror::Error;

use eight_puzzle::heuristics::{manhattan_distance, misplaced_tiles, GoalIndex};
use eight_puzzle::puzzle::SIZE;
use eight_puzzle::render::{expansion_limit_summary, render_grid, render_solution, summary};
use eight_puzzle::{
    search, Heuristic, Move, ParentPolicy, PuzzleConfig, SearchError, SearchOutcome, SearchReport,
    SearchStats, SolverConfig, State,
};

#[derive(Parser)]
#[command(name = "eight-puzzle")]
#[command(about = "A* solver for the 3x3 sliding-tile puzzle")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find a shortest move sequence from start to goal
    Solve {
        #[command(flatten)]
        input: InputArgs,

        /// Update a state's parent only when a strictly shorter path is found
        #[arg(long)]
        strict_parents: bool,

        /// Stop after expanding this many states
        #[arg(long)]
        max_expansions: Option<usize>,

        /// Report unsolvable pairs from their parity without searching
        #[arg(long)]
        parity_check: bool,

        /// Print a JSON report
        #[arg(long)]
        json: bool,
    },

    /// Print both heuristic values for the start state
    Heuristics {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Enter start, goal and heuristic tile by tile
    Interactive,
}

#[derive(Args)]
struct InputArgs {
    /// Path to puzzle JSON file (use --stdin to read from stdin)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Read puzzle from stdin instead of file
    #[arg(long)]
    stdin: bool,

    /// Start state as nine labels, row-major, 0 for the blank
    #[arg(long, requires = "goal")]
    start: Option<String>,

    /// Goal state as nine labels, row-major, 0 for the blank
    #[arg(long, requires = "start")]
    goal: Option<String>,

    /// Heuristic: 1 | misplaced, 2 | manhattan. Overrides the puzzle file.
    #[arg(long)]
    heuristic: Option<Heuristic>,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("console I/O failed: {0}")]
    Console(#[from] io::Error),

    #[error("error parsing puzzle JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Search(#[from] SearchError),

    #[error("must provide a file path, --stdin, or --start and --goal")]
    MissingInput,

    #[error("input ended before the puzzle was complete")]
    UnexpectedEof,
}

/// Output format for a solve run
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    solved: bool,
    outcome: SearchOutcome,
    heuristic: Heuristic,
    #[serde(skip_serializing_if = "Option::is_none")]
    move_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    moves: Option<Vec<Move>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<Vec<State>>,
    stats: SearchStats,
}

/// Output format for the heuristics command
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HeuristicsOutput {
    misplaced_tiles: u32,
    manhattan_distance: u32,
    same_parity: bool,
}

struct LoadedPuzzle {
    start: State,
    goal: State,
    heuristic: Heuristic,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Solve {
            input,
            strict_parents,
            max_expansions,
            parity_check,
            json,
        } => {
            let puzzle = load_puzzle(&input)?;
            let config = SolverConfig {
                heuristic: puzzle.heuristic,
                parent_policy: if strict_parents {
                    ParentPolicy::ImproveOnly
                } else {
                    ParentPolicy::Overwrite
                },
                max_expansions,
                parity_precheck: parity_check,
            };
            solve_and_print(&puzzle.start, &puzzle.goal, &config, json)
        }
        Commands::Heuristics { input } => {
            let puzzle = load_puzzle(&input)?;
            let output = heuristics_output(&puzzle);
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Commands::Interactive => {
            let stdin = io::stdin();
            let mut tokens = TokenReader::new(stdin.lock());
            let mut out = io::stdout();
            let puzzle = prompt_puzzle(&mut tokens, &mut out)?;
            solve_and_print(
                &puzzle.start,
                &puzzle.goal,
                &SolverConfig::with_heuristic(puzzle.heuristic),
                false,
            )
        }
    }
}

fn load_puzzle(input: &InputArgs) -> Result<LoadedPuzzle, CliError> {
    if let (Some(start), Some(goal)) = (&input.start, &input.goal) {
        let start: State = start.parse().map_err(SearchError::invalid_start)?;
        let goal: State = goal.parse().map_err(SearchError::invalid_goal)?;
        return Ok(LoadedPuzzle {
            start,
            goal,
            heuristic: input.heuristic.unwrap_or_default(),
        });
    }

    let json_content = if input.stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else if let Some(path) = &input.file {
        fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.clone(),
            source,
        })?
    } else {
        return Err(CliError::MissingInput);
    };

    puzzle_from_json(&json_content, input.heuristic)
}

/// Parse a puzzle document. A heuristic given on the command line wins over
/// the document's own selector.
fn puzzle_from_json(content: &str, flag: Option<Heuristic>) -> Result<LoadedPuzzle, CliError> {
    let config: PuzzleConfig = serde_json::from_str(content)?;
    let heuristic = match flag {
        Some(h) => h,
        None => config.heuristic()?,
    };

    Ok(LoadedPuzzle {
        start: config.start_state()?,
        goal: config.goal_state()?,
        heuristic,
    })
}

fn solve_output(report: SearchReport) -> SolveOutput {
    let solution = report.solution;
    SolveOutput {
        solved: report.outcome == SearchOutcome::Solved,
        outcome: report.outcome,
        heuristic: report.heuristic,
        move_count: solution.as_ref().map(|s| s.move_count()),
        moves: solution.as_ref().map(|s| s.moves.clone()),
        path: solution.map(|s| s.states),
        stats: report.stats,
    }
}

fn heuristics_output(puzzle: &LoadedPuzzle) -> HeuristicsOutput {
    let index = GoalIndex::new(&puzzle.goal);
    HeuristicsOutput {
        misplaced_tiles: misplaced_tiles(&puzzle.start, &puzzle.goal),
        manhattan_distance: manhattan_distance(&puzzle.start, &index),
        same_parity: puzzle.start.same_parity(&puzzle.goal),
    }
}

fn solve_and_print(
    start: &State,
    goal: &State,
    config: &SolverConfig,
    json: bool,
) -> Result<(), CliError> {
    if !json {
        println!("Start State:");
        print!("{}", render_grid(start));
        println!("Goal State:");
        print!("{}", render_grid(goal));
        println!("Running A* search ({})...", config.heuristic);
    }

    let report = search(start, goal, config)?;
    info!(
        "expanded {} states, {} pushes, {} ms",
        report.stats.expanded, report.stats.pushed, report.stats.time_elapsed_ms
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&solve_output(report))?);
        return Ok(());
    }

    match (&report.outcome, &report.solution) {
        (SearchOutcome::Solved, Some(solution)) => print!("{}", render_solution(solution)),
        (SearchOutcome::ExpansionLimit, _) => {
            println!("{}", expansion_limit_summary(report.stats.expanded))
        }
        _ => println!("{}", summary(None)),
    }
    Ok(())
}

/// Whitespace-separated tokens from a line-oriented reader.
struct TokenReader<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> TokenReader<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }

    fn next_token(&mut self) -> Result<String, CliError> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(token);
            }
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Err(CliError::UnexpectedEof);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
    }
}

fn prompt_value<R: BufRead, W: Write>(
    tokens: &mut TokenReader<R>,
    out: &mut W,
    prompt: &str,
) -> Result<i64, CliError> {
    loop {
        write!(out, "{}", prompt)?;
        out.flush()?;
        let token = tokens.next_token()?;
        match token.parse::<i64>() {
            Ok(value) => return Ok(value),
            Err(_) => writeln!(out, "'{}' is not a number, try again.", token)?,
        }
    }
}

fn prompt_grid<R: BufRead, W: Write>(
    tokens: &mut TokenReader<R>,
    out: &mut W,
    name: &str,
) -> Result<State, CliError> {
    loop {
        writeln!(out, "Enter the {} state (tile by tile, use 0 for blank):", name)?;
        let mut rows = vec![vec![0i64; SIZE]; SIZE];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                let prompt = format!("Enter tile at position ({}, {}): ", i, j);
                *cell = prompt_value(tokens, out, &prompt)?;
            }
        }
        match State::from_rows(&rows) {
            Ok(state) => return Ok(state),
            Err(e) => writeln!(out, "Invalid {} state: {}", name, e)?,
        }
    }
}

fn prompt_puzzle<R: BufRead, W: Write>(
    tokens: &mut TokenReader<R>,
    out: &mut W,
) -> Result<LoadedPuzzle, CliError> {
    let start = prompt_grid(tokens, out, "start")?;
    let goal = prompt_grid(tokens, out, "goal")?;
    let heuristic = loop {
        write!(
            out,
            "Choose the heuristic to use (1 for Misplaced Tiles, 2 for Manhattan Distance): "
        )?;
        out.flush()?;
        match tokens.next_token()?.parse::<Heuristic>() {
            Ok(h) => break h,
            Err(e) => writeln!(out, "{}", e)?,
        }
    };
    Ok(LoadedPuzzle {
        start,
        goal,
        heuristic,
    })
}
