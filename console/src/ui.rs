//! Terminal renderer and input controller for the engine's match loop.
use std::io::{stdin, stdout, Write};

use anyhow::Result;
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};

use connect4_engine::{
    Board, Cell, InputController, MatchResult, Renderer, TurnCommand, WinLine, COLS, ROWS,
};

fn color_for(tag: Cell) -> Color {
    match tag {
        Cell::Empty => Color::DarkGrey,
        Cell::PlayerOne => Color::Cyan,
        Cell::PlayerTwo => Color::Yellow,
        Cell::CpuHard => Color::Red,
        Cell::CpuEasy => Color::Green,
    }
}

fn draw_board(board: &Board, highlight: Option<WinLine>) -> Result<()> {
    let mut out = stdout();
    execute!(out, Print("\n  0 1 2 3 4 5 6\n"))?;
    for row in 0..ROWS {
        execute!(out, Print(" "))?;
        for column in 0..COLS {
            let tag = board.cell(column, row);
            let highlighted = highlight
                .map(|line| line.contains(&(column, row)))
                .unwrap_or(false);
            let glyph = match tag {
                Cell::Empty => " .",
                _ if highlighted => " O",
                _ => " o",
            };
            execute!(out, SetForegroundColor(color_for(tag)), Print(glyph), ResetColor)?;
        }
        execute!(out, Print("\n"))?;
    }
    execute!(out, Print("\n"))?;
    out.flush()?;
    Ok(())
}

pub struct ConsoleRenderer;

impl Renderer for ConsoleRenderer {
    fn turn_started(&mut self, _board: &Board, tag: Cell) -> Result<()> {
        let mut out = stdout();
        execute!(
            out,
            SetForegroundColor(color_for(tag)),
            Print(format!("{} speaks\n", tag.name())),
            ResetColor
        )?;
        Ok(())
    }

    fn piece_landed(&mut self, board: &Board, _column: usize, _row: usize, _tag: Cell) -> Result<()> {
        draw_board(board, None)
    }

    fn match_over(&mut self, board: &Board, result: &MatchResult) -> Result<()> {
        match result {
            MatchResult::Win { tag, line } => {
                draw_board(board, Some(*line))?;
                let mut out = stdout();
                execute!(
                    out,
                    SetForegroundColor(color_for(*tag)),
                    Print(format!("{} wins\n", tag.name())),
                    ResetColor
                )?;
            }
            MatchResult::Tie => {
                draw_board(board, None)?;
                println!("It is a tie");
            }
            MatchResult::Aborted => {}
        }
        Ok(())
    }
}

pub struct ConsoleInput;

impl InputController for ConsoleInput {
    fn choose_column(&mut self, board: &Board, tag: Cell) -> Result<TurnCommand> {
        loop {
            print!("{} > column (0-{}, q to quit): ", tag.name(), COLS - 1);
            stdout().flush()?;

            let mut line = String::new();
            if stdin().read_line(&mut line)? == 0 {
                // stdin closed; treat it like a quit request
                return Ok(TurnCommand::Quit);
            }
            let trimmed = line.trim();
            if trimmed.eq_ignore_ascii_case("q") {
                return Ok(TurnCommand::Quit);
            }
            match trimmed.parse::<usize>() {
                Ok(column) if board.can_insert(column) => return Ok(TurnCommand::Drop(column)),
                Ok(column) => println!("column {column} cannot accept a piece"),
                Err(_) => println!("not a column: {trimmed}"),
            }
        }
    }
}
