use std::io::{self, Write};

use gridsearch_core::{Solution, SolutionSink};
use tracing::warn;

/// Prints every solution to stdout followed by a `SOLVED!` line.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl SolutionSink for StdoutSink {
    fn report(&self, solution: &Solution) {
        let mut out = io::stdout().lock();
        if let Err(e) = write_solution(&mut out, solution) {
            warn!(error = %e, "Failed to print solution");
        }
    }
}

fn write_solution(out: &mut impl Write, solution: &Solution) -> io::Result<()> {
    out.write_all(solution.rendered.as_bytes())?;
    writeln!(out, "SOLVED!")?;
    out.flush()
}

/// Print a board under a heading.
pub fn print_board(out: &mut impl Write, heading: &str, rendered: &str) -> io::Result<()> {
    writeln!(out, "{}", heading)?;
    out.write_all(rendered.as_bytes())?;
    out.flush()
}
