use std::path::PathBuf;

use clap::Parser;

/// Parallel branch-and-bound sudoku search.
///
/// Splits the start board into independent sub-boards, then searches them
/// depth-first on a worker pool, most-filled boards first, until a solution
/// is found.
#[derive(Parser, Debug)]
#[command(name = "gridsearch", version, about = "Parallel branch-and-bound sudoku search")]
pub struct CliArgs {
    /// Path to a TOML run config. Flags and env vars override its values.
    #[arg(long, env = "GRIDSEARCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Board file: one board, or one board per line with --batch.
    #[arg(long, env = "GRIDSEARCH_BOARD")]
    pub board: Option<PathBuf>,

    /// Board width (a square number, 9 for classic sudoku).
    #[arg(long, env = "GRIDSEARCH_BOARDSIZE")]
    pub boardsize: Option<u32>,

    /// Boards to produce at the first fan-out level.
    #[arg(long, env = "GRIDSEARCH_SPLIT1")]
    pub split1: Option<u64>,

    /// Boards to produce per board at the second fan-out level.
    #[arg(long, env = "GRIDSEARCH_SPLIT2")]
    pub split2: Option<u64>,

    /// Depth-first steps per solve task.
    #[arg(long, env = "GRIDSEARCH_DFSQUOTA")]
    pub dfsquota: Option<u64>,

    /// Compute worker threads (0 = available parallelism).
    #[arg(long, env = "GRIDSEARCH_WORKERS")]
    pub workers: Option<usize>,

    /// Control worker threads.
    #[arg(long, env = "GRIDSEARCH_CONTROL_WORKERS")]
    pub control_workers: Option<usize>,

    /// Seed for random tie-breaking between equally constrained cells.
    #[arg(long, env = "GRIDSEARCH_SEED")]
    pub seed: Option<u64>,

    /// Treat every non-empty line of the board file as a separate puzzle.
    #[arg(long, env = "GRIDSEARCH_BATCH")]
    pub batch: bool,
}
