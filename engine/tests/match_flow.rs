use std::collections::VecDeque;

use connect4_engine::{
    play_match, Board, Cell, Entropy, GameMode, InputController, MatchResult, Renderer,
    RngEntropy, Statistics, TurnCommand, COLS, ROWS,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Replays a fixed stream of draws, then repeats the last one.
struct Scripted(Vec<u64>, usize);

impl Scripted {
    fn new(draws: &[u64]) -> Self {
        Self(draws.to_vec(), 0)
    }
}

impl Entropy for Scripted {
    fn next_u64(&mut self) -> u64 {
        let draw = self.0[self.1.min(self.0.len() - 1)];
        self.1 += 1;
        draw
    }
}

/// Records what the match loop reported, draws nothing.
#[derive(Default)]
struct RecordingRenderer {
    pieces: usize,
    result: Option<MatchResult>,
}

impl Renderer for RecordingRenderer {
    fn turn_started(&mut self, _board: &Board, _tag: Cell) -> anyhow::Result<()> {
        Ok(())
    }

    fn piece_landed(
        &mut self,
        board: &Board,
        column: usize,
        row: usize,
        tag: Cell,
    ) -> anyhow::Result<()> {
        assert_eq!(board.cell(column, row), tag);
        self.pieces += 1;
        Ok(())
    }

    fn match_over(&mut self, _board: &Board, result: &MatchResult) -> anyhow::Result<()> {
        self.result = Some(result.clone());
        Ok(())
    }
}

struct ScriptedInput(VecDeque<TurnCommand>);

impl InputController for ScriptedInput {
    fn choose_column(&mut self, _board: &Board, _tag: Cell) -> anyhow::Result<TurnCommand> {
        Ok(self.0.pop_front().expect("input script exhausted"))
    }
}

/// Input that must never be consulted (CPU-only matches).
struct NoInput;

impl InputController for NoInput {
    fn choose_column(&mut self, _board: &Board, _tag: Cell) -> anyhow::Result<TurnCommand> {
        panic!("input controller consulted during a CPU turn");
    }
}

#[test]
fn scripted_player_vs_player_match() {
    let mut board = Board::new();
    let mut renderer = RecordingRenderer::default();
    // Draw 0 puts Player 1 on the first turn.
    let mut entropy = Scripted::new(&[0]);
    let mut stats = Statistics::default();
    // Player 1 builds the bottom row left to right, Player 2 stacks behind.
    let script = [0, 0, 1, 1, 2, 2, 3]
        .into_iter()
        .map(TurnCommand::Drop)
        .collect();
    let mut input = ScriptedInput(script);

    let result = play_match(
        &mut board,
        GameMode::PlayerVsPlayer,
        &mut renderer,
        &mut input,
        &mut entropy,
        &mut stats,
    )
    .unwrap();

    let line = [(0, ROWS - 1), (1, ROWS - 1), (2, ROWS - 1), (3, ROWS - 1)];
    assert_eq!(result, MatchResult::Win { tag: Cell::PlayerOne, line });
    assert_eq!(renderer.pieces, 7);
    assert_eq!(renderer.result, Some(result));
    assert_eq!(board.winning_line(), Some(line));
    // No CPU played, so no think time accrued.
    assert_eq!(stats.cpu_hard_think_ms, 0);
    assert_eq!(stats.cpu_easy_think_ms, 0);
}

#[test]
fn unplayable_columns_are_asked_again() {
    let mut board = Board::new();
    let mut renderer = RecordingRenderer::default();
    let mut entropy = Scripted::new(&[0]);
    let mut stats = Statistics::default();
    let script = [9, 0, 0, 1, 1, 2, 2, 3]
        .into_iter()
        .map(TurnCommand::Drop)
        .collect();
    let mut input = ScriptedInput(script);

    let result = play_match(
        &mut board,
        GameMode::PlayerVsPlayer,
        &mut renderer,
        &mut input,
        &mut entropy,
        &mut stats,
    )
    .unwrap();

    assert!(matches!(result, MatchResult::Win { tag: Cell::PlayerOne, .. }));
}

#[test]
fn quit_aborts_the_match() {
    let mut board = Board::new();
    let mut renderer = RecordingRenderer::default();
    let mut entropy = Scripted::new(&[0]);
    let mut stats = Statistics::default();
    let mut input = ScriptedInput(VecDeque::from([TurnCommand::Quit]));

    let result = play_match(
        &mut board,
        GameMode::PlayerVsPlayer,
        &mut renderer,
        &mut input,
        &mut entropy,
        &mut stats,
    )
    .unwrap();

    assert_eq!(result, MatchResult::Aborted);
    // No match_over notification for an abort; the caller decides what to show.
    assert!(renderer.result.is_none());
    assert_eq!(renderer.pieces, 0);
}

#[test]
fn demo_match_runs_to_completion_without_input() {
    let mut board = Board::new();
    let mut renderer = RecordingRenderer::default();
    let mut entropy = RngEntropy(StdRng::seed_from_u64(42));
    let mut stats = Statistics::default();

    let result = play_match(
        &mut board,
        GameMode::Demo,
        &mut renderer,
        &mut NoInput,
        &mut entropy,
        &mut stats,
    )
    .unwrap();

    match &result {
        MatchResult::Win { tag, line } => {
            assert!(tag.is_cpu());
            for &(column, row) in line {
                assert_eq!(board.cell(column, row), *tag);
            }
        }
        MatchResult::Tie => assert!(board.is_full()),
        MatchResult::Aborted => panic!("demo matches cannot abort"),
    }

    assert!(renderer.pieces <= COLS * ROWS);
    stats.record(&result);
    assert_eq!(stats.matches(), 1);
}

#[test]
fn demo_session_keeps_statistics_over_matches() {
    let mut entropy = RngEntropy(StdRng::seed_from_u64(7));
    let mut stats = Statistics::default();

    for _ in 0..3 {
        let mut board = Board::new();
        let mut renderer = RecordingRenderer::default();
        let result = play_match(
            &mut board,
            GameMode::Demo,
            &mut renderer,
            &mut NoInput,
            &mut entropy,
            &mut stats,
        )
        .unwrap();
        stats.record(&result);
    }

    assert_eq!(stats.matches(), 3);
    assert_eq!(
        stats.cpu_hard_wins + stats.cpu_easy_wins + stats.ties,
        stats.matches()
    );
}
