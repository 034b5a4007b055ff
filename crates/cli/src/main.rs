mod cli;
mod config;
mod report;

use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};

use gridsearch_board::SudokuService;
use gridsearch_compute::{SearchEngine, SearchOutcome};
use gridsearch_core::ExpansionService;

use crate::cli::CliArgs;
use crate::config::RunSettings;
use crate::report::{print_board, StdoutSink};

fn main() -> Result<()> {
    gridsearch_core::config::load_dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args = CliArgs::parse();
    let settings = config::resolve(&args)?;
    settings.config.log_summary();

    let RunSettings {
        config,
        seed,
        batch,
    } = settings;

    let mut service = SudokuService::new(config.search.board_size)
        .context("unsupported board size")?;
    if let Some(seed) = seed {
        info!(seed, "Random tie-breaking enabled");
        service = service.with_seed(seed);
    }
    let service = Arc::new(service);

    let engine = SearchEngine::new(
        service.clone(),
        Arc::new(StdoutSink),
        config.search.clone(),
        config.scheduler.clone(),
    );

    let board = config.board.as_deref().context("no board source given")?;
    if batch {
        run_batch(&engine, service.as_ref(), board)
    } else {
        run_single(&engine, service.as_ref(), board)
    }
}

fn run_single(engine: &SearchEngine, service: &SudokuService, path: &Path) -> Result<()> {
    let start = engine.load_board(path)?;
    print_board(&mut io::stdout().lock(), "Start board:", &service.render(&start)?)?;

    let outcome = engine.solve(start).context("search failed")?;
    log_outcome(&outcome);
    if !outcome.is_solved() {
        info!("No solution exists for {}", path.display());
    }
    Ok(())
}

/// One puzzle per line. Unparsable lines are skipped; unsolvable ones are
/// listed as `unsolved:<line>`.
fn run_batch(engine: &SearchEngine, service: &SudokuService, path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read board file: {}", path.display()))?;

    let (mut solved, mut unsolved, mut skipped) = (0usize, 0usize, 0usize);
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let start = match service.parse(line) {
            Ok(start) => start,
            Err(e) => {
                warn!(line = index + 1, error = %e, "Skipping unparsable board");
                skipped += 1;
                continue;
            }
        };

        print_board(&mut io::stdout().lock(), "Start board:", &service.render(&start)?)?;
        let outcome = engine
            .solve(start)
            .with_context(|| format!("search failed on line {}", index + 1))?;
        log_outcome(&outcome);

        if outcome.is_solved() {
            solved += 1;
        } else {
            unsolved += 1;
            println!("unsolved:{}", line);
        }
    }

    info!(
        "Batch complete: {} solved, {} unsolved, {} skipped",
        solved, unsolved, skipped
    );
    Ok(())
}

fn log_outcome(outcome: &SearchOutcome) {
    info!(
        run_id = %outcome.run_id,
        solutions = outcome.solutions,
        elapsed_ms = outcome.elapsed.as_millis() as u64,
        "Run complete"
    );
    match toml::to_string(&outcome.metrics) {
        Ok(text) => debug!("Scheduler metrics:\n{}", text),
        Err(e) => debug!(error = %e, "Could not serialize scheduler metrics"),
    }
}
