//! Depth-limited recursive move search with mutate-then-undo backtracking.
//! Each call borrows the board, explores placements in place and restores it
//! before returning, so the caller's board is never observably changed.
use rand::RngCore;
use tracing::debug;

use crate::board::{Board, Cell};
use crate::win::winner_from;
use crate::{GameError, COLS, ERROR_FACTOR};

/// Near-term outcomes dominate: a win found `step` plies out contributes
/// `step^-DECAY_EXP`, so an immediate win or block outweighs anything deeper.
const DECAY_EXP: i32 = 8;

/// Any non-self win is penalised at twice the reward magnitude, preferring
/// not-losing over winning when both are reachable at comparable depth.
const LOSS_RATIO: f64 = 2.0;

/// Low-quality randomness feeding the demo-mistake draw. Deliberately not a
/// cryptographic source; tests plug in deterministic streams.
pub trait Entropy {
    fn next_u64(&mut self) -> u64;
}

/// Adapter letting any `rand` generator (seeded or not) act as the entropy
/// source.
pub struct RngEntropy<R: RngCore>(pub R);

impl<R: RngCore> Entropy for RngEntropy<R> {
    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }
}

/// Coarse wall-clock source; a deliberately weak stand-in for a hardware
/// timer.
pub struct ClockEntropy;

impl Entropy for ClockEntropy {
    fn next_u64(&mut self) -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or(0)
    }
}

/// Pick a column for the computer-controlled player whose move is next.
///
/// `roster` holds the two active archetypes and `turn` indexes the one to
/// move. The board must have at least one empty cell and `max_depth` must be
/// at least 1; both are checked and reported as errors. In `demo_mode`, one
/// call in [`ERROR_FACTOR`] skips the search and plays a uniformly random
/// legal column; without an entropy source that behavior is disabled.
///
/// The board is returned exactly as it was: every exploratory placement is
/// undone before the call completes.
pub fn decide(
    board: &mut Board,
    roster: [Cell; 2],
    turn: usize,
    max_depth: usize,
    demo_mode: bool,
    mut entropy: Option<&mut dyn Entropy>,
) -> Result<usize, GameError> {
    if board.empty_cells() == 0 {
        return Err(GameError::BoardFull);
    }
    if max_depth == 0 {
        return Err(GameError::DepthOutOfRange(max_depth));
    }

    if demo_mode {
        if let Some(source) = entropy.as_deref_mut() {
            if source.next_u64() % ERROR_FACTOR == 0 {
                debug!(cpu = roster[turn].name(), "deliberate demo mistake");
                loop {
                    let candidate = (source.next_u64() % COLS as u64) as usize;
                    if board.can_insert(candidate) {
                        return Ok(candidate);
                    }
                }
            }
        }
    }

    let mut fitness = [0f64; COLS];
    traverse(board, roster, turn, roster[turn], 1, max_depth, &mut fitness, 0);

    // The best slot can belong to a column that was already full at the
    // root; poison it and rescan. At least one column is playable, so this
    // settles within COLS rounds.
    for _ in 0..COLS {
        let choice = fittest_index(&fitness);
        if board.can_insert(choice) {
            return Ok(choice);
        }
        fitness[choice] = f64::NEG_INFINITY;
    }
    Err(GameError::BoardFull)
}

/// One level of the game tree. Every placement that succeeds is scored (or
/// recursed into) and then removed again, on all paths, so the board leaves
/// each loop iteration unchanged. Scores always land in the accumulator of
/// the root column the branch started from.
#[allow(clippy::too_many_arguments)]
fn traverse(
    board: &mut Board,
    roster: [Cell; 2],
    turn: usize,
    cpu_tag: Cell,
    step: usize,
    max_depth: usize,
    fitness: &mut [f64; COLS],
    mut root_column: usize,
) {
    for column in 0..COLS {
        if step == 1 {
            root_column = column;
        }

        let Ok(row) = board.insert(column, roster[turn]) else {
            // Full column: this branch is not viable, nothing to score.
            continue;
        };

        let weight = (step as f64).powi(-DECAY_EXP);
        match winner_from(board, column, row) {
            Cell::Empty => {
                if step + 1 <= max_depth {
                    traverse(
                        board,
                        roster,
                        (turn + 1) % 2,
                        cpu_tag,
                        step + 1,
                        max_depth,
                        fitness,
                        root_column,
                    );
                }
            }
            winner @ (Cell::CpuHard | Cell::CpuEasy) => {
                if winner == cpu_tag {
                    fitness[root_column] += weight;
                } else {
                    fitness[root_column] -= weight * LOSS_RATIO;
                }
            }
            Cell::PlayerOne | Cell::PlayerTwo => {
                fitness[root_column] -= weight * LOSS_RATIO;
            }
        }

        board
            .remove(column)
            .expect("backtracking a piece that was just placed");
    }
}

/// Index of the strictly greatest accumulator; leftmost wins ties.
fn fittest_index(fitness: &[f64; COLS]) -> usize {
    let mut best = 0;
    for (column, score) in fitness.iter().enumerate() {
        if *score > fitness[best] {
            best = column;
        }
    }
    best
}
