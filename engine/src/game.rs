//! Match orchestration: roster setup, turn alternation, CPU timing and the
//! authoritative end-of-turn win check. Rendering and human input stay
//! behind the [`Renderer`] and [`InputController`] traits.
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::board::{Board, Cell, WinLine};
use crate::search::{decide, Entropy};
use crate::win::winner_any;
use crate::{CPU_EASY_MAX_DEPTH, CPU_HARD_MAX_DEPTH};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    PlayerVsCpuHard,
    PlayerVsCpuEasy,
    PlayerVsPlayer,
    Demo,
}

impl GameMode {
    /// The two archetypes playing turn 0 and turn 1 in this mode.
    pub fn roster(self) -> [Cell; 2] {
        match self {
            GameMode::PlayerVsCpuHard => [Cell::PlayerOne, Cell::CpuHard],
            GameMode::PlayerVsCpuEasy => [Cell::PlayerOne, Cell::CpuEasy],
            GameMode::PlayerVsPlayer => [Cell::PlayerOne, Cell::PlayerTwo],
            GameMode::Demo => [Cell::CpuHard, Cell::CpuEasy],
        }
    }

    pub fn is_demo(self) -> bool {
        self == GameMode::Demo
    }
}

/// What a human turn produced: a column to drop into, or a request to end
/// the match early.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TurnCommand {
    Drop(usize),
    Quit,
}

/// Supplies the column a human player chose. Never consulted for CPU turns.
/// The match loop re-validates the column and asks again if it cannot
/// accept a piece.
pub trait InputController {
    fn choose_column(&mut self, board: &Board, tag: Cell) -> anyhow::Result<TurnCommand>;
}

/// Consumes board state for display. Implementations draw however they like;
/// the engine only reports what happened.
pub trait Renderer {
    fn turn_started(&mut self, board: &Board, tag: Cell) -> anyhow::Result<()>;
    fn piece_landed(
        &mut self,
        board: &Board,
        column: usize,
        row: usize,
        tag: Cell,
    ) -> anyhow::Result<()>;
    fn match_over(&mut self, board: &Board, result: &MatchResult) -> anyhow::Result<()>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchResult {
    Win { tag: Cell, line: WinLine },
    Tie,
    Aborted,
}

/// Demo-session bookkeeping: per-CPU think time and win tallies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub cpu_hard_think_ms: u64,
    pub cpu_easy_think_ms: u64,
    pub cpu_hard_wins: u32,
    pub cpu_easy_wins: u32,
    pub ties: u32,
}

impl Statistics {
    pub fn matches(&self) -> u32 {
        self.cpu_hard_wins + self.cpu_easy_wins + self.ties
    }

    pub fn record(&mut self, result: &MatchResult) {
        match result {
            MatchResult::Win { tag: Cell::CpuHard, .. } => self.cpu_hard_wins += 1,
            MatchResult::Win { tag: Cell::CpuEasy, .. } => self.cpu_easy_wins += 1,
            MatchResult::Win { .. } | MatchResult::Tie => self.ties += 1,
            MatchResult::Aborted => {}
        }
    }
}

fn depth_for(tag: Cell) -> usize {
    match tag {
        Cell::CpuHard => CPU_HARD_MAX_DEPTH,
        _ => CPU_EASY_MAX_DEPTH,
    }
}

/// Run one match on `board` until a win, a tie or an abort. The first turn
/// is drawn from `entropy`; afterwards turns strictly alternate. CPU think
/// time accrues into `stats`; win/tie tallies are the caller's to record.
pub fn play_match(
    board: &mut Board,
    mode: GameMode,
    renderer: &mut dyn Renderer,
    input: &mut dyn InputController,
    entropy: &mut dyn Entropy,
    stats: &mut Statistics,
) -> anyhow::Result<MatchResult> {
    let roster = mode.roster();
    let mut turn = (entropy.next_u64() % 2) as usize;
    debug!(first = roster[turn].name(), "match started");

    loop {
        if board.is_full() {
            let result = MatchResult::Tie;
            renderer.match_over(board, &result)?;
            return Ok(result);
        }

        let tag = roster[turn];
        renderer.turn_started(board, tag)?;

        let column = if tag.is_cpu() {
            let started = Instant::now();
            let choice = decide(
                board,
                roster,
                turn,
                depth_for(tag),
                mode.is_demo(),
                Some(&mut *entropy),
            )?;
            let think_ms = started.elapsed().as_millis() as u64;
            match tag {
                Cell::CpuHard => stats.cpu_hard_think_ms += think_ms,
                _ => stats.cpu_easy_think_ms += think_ms,
            }
            debug!(cpu = tag.name(), column = choice, think_ms, "cpu moved");
            choice
        } else {
            loop {
                match input.choose_column(board, tag)? {
                    TurnCommand::Quit => {
                        info!("match aborted");
                        return Ok(MatchResult::Aborted);
                    }
                    TurnCommand::Drop(column) if board.can_insert(column) => break column,
                    TurnCommand::Drop(column) => {
                        debug!(column, "column cannot accept a piece, asking again");
                    }
                }
            }
        };

        let row = board.insert(column, tag)?;
        renderer.piece_landed(board, column, row, tag)?;

        let winner = winner_any(board);
        if winner == Cell::Empty {
            turn = (turn + 1) % 2;
            continue;
        }
        if let Some(line) = board.winning_line() {
            let result = MatchResult::Win { tag: winner, line };
            renderer.match_over(board, &result)?;
            return Ok(result);
        }
    }
}
