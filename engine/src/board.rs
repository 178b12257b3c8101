//! Grid storage and gravity-respecting piece insertion/removal.
use serde::{Deserialize, Serialize};

use crate::{GameError, COLS, ROWS, WIN_LENGTH};

/// Occupant of a single board cell. The four non-empty tags are the fixed
/// player archetypes: two human-controlled slots and two CPU skill levels.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    Empty,
    PlayerOne,
    PlayerTwo,
    CpuHard,
    CpuEasy,
}

impl Cell {
    pub fn is_cpu(self) -> bool {
        matches!(self, Cell::CpuHard | Cell::CpuEasy)
    }

    pub fn name(self) -> &'static str {
        match self {
            Cell::Empty => "empty",
            Cell::PlayerOne => "Player 1",
            Cell::PlayerTwo => "Player 2",
            Cell::CpuHard => "CPU HARD",
            Cell::CpuEasy => "CPU EASY",
        }
    }
}

/// The four cells of a winning run, as `(column, row)` pairs in ray order.
pub type WinLine = [(usize, usize); WIN_LENGTH];

/// 6x7 grid with row 0 at the top; columns fill from the bottom row up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
    empty_cells: usize,
    winning_line: Option<WinLine>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; COLS]; ROWS],
            empty_cells: COLS * ROWS,
            winning_line: None,
        }
    }

    pub fn cell(&self, column: usize, row: usize) -> Cell {
        self.cells[row][column]
    }

    /// Count of empty cells, kept in lockstep with insert/remove.
    pub fn empty_cells(&self) -> usize {
        self.empty_cells
    }

    pub fn is_full(&self) -> bool {
        self.empty_cells == 0
    }

    /// The winning run found by the last full-board scan, for the renderer.
    pub fn winning_line(&self) -> Option<WinLine> {
        self.winning_line
    }

    pub(crate) fn set_winning_line(&mut self, line: WinLine) {
        self.winning_line = Some(line);
    }

    /// Whether a piece dropped in `column` would land. Pure query.
    pub fn can_insert(&self, column: usize) -> bool {
        column < COLS && self.cells[0][column] == Cell::Empty
    }

    /// Drop `tag` into `column`; it lands in the lowest empty row, whose
    /// index is returned.
    pub fn insert(&mut self, column: usize, tag: Cell) -> Result<usize, GameError> {
        debug_assert!(tag != Cell::Empty, "cannot insert an empty tag");
        if column >= COLS {
            return Err(GameError::ColumnOutOfBounds { column });
        }
        for row in (0..ROWS).rev() {
            if self.cells[row][column] == Cell::Empty {
                self.cells[row][column] = tag;
                self.empty_cells -= 1;
                return Ok(row);
            }
        }
        Err(GameError::ColumnFull { column })
    }

    /// Clear the topmost occupied cell of `column` (the piece placed most
    /// recently, by gravity). Exists to support search backtracking.
    pub fn remove(&mut self, column: usize) -> Result<(), GameError> {
        if column >= COLS {
            return Err(GameError::ColumnOutOfBounds { column });
        }
        for row in 0..ROWS {
            if self.cells[row][column] != Cell::Empty {
                self.cells[row][column] = Cell::Empty;
                self.empty_cells += 1;
                return Ok(());
            }
        }
        Err(GameError::ColumnEmpty { column })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_board_is_empty() {
        let board = Board::new();
        assert_eq!(board.empty_cells(), COLS * ROWS);
        assert!(!board.is_full());
        assert!(board.winning_line().is_none());
        for column in 0..COLS {
            assert!(board.can_insert(column));
        }
    }

    #[test]
    fn pieces_stack_from_the_bottom() {
        let mut board = Board::new();
        assert_eq!(board.insert(3, Cell::PlayerOne).unwrap(), ROWS - 1);
        assert_eq!(board.insert(3, Cell::PlayerTwo).unwrap(), ROWS - 2);
        assert_eq!(board.cell(3, ROWS - 1), Cell::PlayerOne);
        assert_eq!(board.cell(3, ROWS - 2), Cell::PlayerTwo);
        assert_eq!(board.empty_cells(), COLS * ROWS - 2);
    }

    #[test]
    fn full_column_rejects_insert() {
        let mut board = Board::new();
        for _ in 0..ROWS {
            board.insert(0, Cell::CpuHard).unwrap();
        }
        assert!(!board.can_insert(0));
        assert!(matches!(
            board.insert(0, Cell::CpuHard),
            Err(GameError::ColumnFull { column: 0 })
        ));
    }

    #[test]
    fn out_of_range_column_is_rejected_everywhere() {
        let mut board = Board::new();
        assert!(!board.can_insert(COLS));
        assert!(matches!(
            board.insert(COLS, Cell::PlayerOne),
            Err(GameError::ColumnOutOfBounds { .. })
        ));
        assert!(matches!(
            board.remove(99),
            Err(GameError::ColumnOutOfBounds { .. })
        ));
    }

    #[test]
    fn remove_clears_the_most_recent_piece() {
        let mut board = Board::new();
        board.insert(2, Cell::PlayerOne).unwrap();
        board.insert(2, Cell::CpuEasy).unwrap();
        board.remove(2).unwrap();
        assert_eq!(board.cell(2, ROWS - 2), Cell::Empty);
        assert_eq!(board.cell(2, ROWS - 1), Cell::PlayerOne);
        assert_eq!(board.empty_cells(), COLS * ROWS - 1);
    }

    #[test]
    fn remove_on_empty_column_fails() {
        let mut board = Board::new();
        assert!(matches!(
            board.remove(5),
            Err(GameError::ColumnEmpty { column: 5 })
        ));
        assert_eq!(board.empty_cells(), COLS * ROWS);
    }

    #[test]
    fn insert_then_remove_restores_the_board() {
        let mut board = Board::new();
        board.insert(1, Cell::PlayerTwo).unwrap();
        board.insert(4, Cell::CpuHard).unwrap();
        let snapshot = board.clone();
        board.insert(4, Cell::PlayerTwo).unwrap();
        board.remove(4).unwrap();
        assert_eq!(board, snapshot);
    }

    #[test]
    fn cell_tags_serialize_as_snake_case() {
        assert_eq!(serde_json::to_string(&Cell::CpuHard).unwrap(), "\"cpu_hard\"");
        assert_eq!(
            serde_json::from_str::<Cell>("\"player_one\"").unwrap(),
            Cell::PlayerOne
        );
    }
}
