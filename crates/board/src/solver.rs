//! Constraint propagation plus branching, and the two exploration loops the
//! service exposes: breadth-first splitting and quota-bounded depth-first
//! stepping.

use std::collections::VecDeque;

use tracing::trace;

use crate::grid::Board;

/// How to choose between equally constrained branch cells.
#[derive(Debug, Clone)]
pub enum Tiebreak {
    /// First cell in row-major order.
    First,
    /// Uniformly among the tied cells.
    Random(fastrand::Rng),
}

/// Outcome of one solver step on one board.
#[derive(Debug)]
pub enum Step {
    Solved(Board),
    Branches(Vec<Board>),
    DeadEnd,
}

/// Propagate forced values, then either report a full board or branch on the
/// most constrained empty cell.
pub fn step(mut board: Board, tiebreak: &mut Tiebreak) -> Step {
    if board.is_conflicted() || !propagate(&mut board) {
        return Step::DeadEnd;
    }
    if board.is_full() {
        return Step::Solved(board);
    }
    match branch_point(&board, tiebreak) {
        Some((idx, mask)) => Step::Branches(branch(board, idx, mask)),
        None => Step::DeadEnd,
    }
}

/// Fill every cell that has exactly one candidate until nothing changes.
/// Returns false if some empty cell has no candidate left.
fn propagate(board: &mut Board) -> bool {
    loop {
        let mut changed = false;
        for idx in 0..board.cell_count() {
            if board.cells()[idx] != 0 {
                continue;
            }
            let mask = board.candidates(idx);
            match mask.count_ones() {
                0 => {
                    trace!(cell = idx, "no candidates left");
                    return false;
                }
                1 => {
                    board.place(idx, mask.trailing_zeros() as u8 + 1);
                    changed = true;
                }
                _ => {}
            }
        }
        if !changed {
            return true;
        }
    }
}

/// Empty cell with the fewest candidates, with its candidate mask.
fn branch_point(board: &Board, tiebreak: &mut Tiebreak) -> Option<(usize, u64)> {
    let mut best: Option<(usize, u64)> = None;
    let mut min_choices = u32::MAX;
    let mut ties = 0usize;

    for idx in 0..board.cell_count() {
        if board.cells()[idx] != 0 {
            continue;
        }
        let mask = board.candidates(idx);
        let choices = mask.count_ones();
        if choices < min_choices {
            best = Some((idx, mask));
            min_choices = choices;
            ties = 1;
        } else if choices == min_choices {
            ties += 1;
            // Reservoir sampling: keep the k-th tie with probability 1/k.
            if let Tiebreak::Random(rng) = tiebreak {
                if rng.usize(..ties) == 0 {
                    best = Some((idx, mask));
                }
            }
        }
    }
    best
}

/// One child per candidate value, in ascending value order.
fn branch(board: Board, idx: usize, mask: u64) -> Vec<Board> {
    let values: Vec<u8> = (0..64u8).filter(|v| mask & (1u64 << v) != 0).map(|v| v + 1).collect();
    let Some((&last, rest)) = values.split_last() else {
        return Vec::new();
    };
    let mut children = Vec::with_capacity(values.len());
    for &value in rest {
        let mut child = board.clone();
        child.place(idx, value);
        children.push(child);
    }
    let mut child = board;
    child.place(idx, last);
    children.push(child);
    children
}

/// Expand from the front of a FIFO frontier until it holds at least `quota`
/// boards. A solution found on the way is returned alone.
pub fn breadth_first(start: Board, quota: u64, tiebreak: &mut Tiebreak) -> Vec<Board> {
    let mut frontier = VecDeque::from([start]);
    while !frontier.is_empty() && (frontier.len() as u64) < quota {
        let Some(board) = frontier.pop_front() else { break };
        match step(board, tiebreak) {
            Step::Solved(solution) => return vec![solution],
            Step::Branches(children) => frontier.extend(children),
            Step::DeadEnd => {}
        }
    }
    frontier.into()
}

/// Depth-first search bounded by `quota` steps. Keeps going while at most one
/// board is left, since returning a single open board gains nothing. A
/// solution short-circuits; otherwise the open stack is returned.
pub fn depth_first(start: Board, quota: u64, tiebreak: &mut Tiebreak) -> Vec<Board> {
    let mut stack = vec![start];
    let mut steps = 0u64;
    while !stack.is_empty() && (stack.len() <= 1 || steps < quota) {
        let Some(board) = stack.pop() else { break };
        steps += 1;
        match step(board, tiebreak) {
            Step::Solved(solution) => return vec![solution],
            Step::Branches(children) => stack.extend(children),
            Step::DeadEnd => {}
        }
    }
    stack
}
