//! Four-in-a-row detection: an anchored check for the search hot path and a
//! full-board scan for the authoritative end-of-turn check.
use crate::board::{Board, Cell, WinLine};
use crate::{COLS, ROWS, WIN_LENGTH};

/// The four axes through a cell, as `(row, column)` deltas. Walking each
/// axis in both signs covers all eight directions.
const AXES: [(isize, isize); 4] = [(1, -1), (1, 1), (1, 0), (0, 1)];

/// All eight rays from a cell, in the fixed order the full scan probes them.
const RAYS: [(isize, isize); 8] = [
    (0, 1),
    (0, -1),
    (1, 1),
    (1, 0),
    (1, -1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

fn in_bounds(row: isize, column: isize) -> bool {
    row >= 0 && column >= 0 && (row as usize) < ROWS && (column as usize) < COLS
}

/// Winner check anchored at `(column, row)`, typically the cell a piece just
/// landed in. Counts the run through the anchor along each axis; a run of
/// [`WIN_LENGTH`] or more returns the anchor's tag, else `Empty`.
pub fn winner_from(board: &Board, column: usize, row: usize) -> Cell {
    let tag = board.cell(column, row);
    if tag == Cell::Empty {
        return Cell::Empty;
    }

    for (row_step, col_step) in AXES {
        // The anchor itself, plus the extension in both directions.
        let mut span = 1;

        for sign in [1isize, -1] {
            let mut r = row as isize + sign * row_step;
            let mut c = column as isize + sign * col_step;
            while in_bounds(r, c) && board.cell(c as usize, r as usize) == tag {
                span += 1;
                r += sign * row_step;
                c += sign * col_step;
            }
        }

        if span >= WIN_LENGTH {
            return tag;
        }
    }

    Cell::Empty
}

/// Scan the whole board row-major for a winning run. On the first hit the
/// run's coordinates are recorded on the board for the renderer and the
/// winning tag is returned; otherwise `Empty`. The fixed scan and ray order
/// makes the result deterministic even when several runs exist.
pub fn winner_any(board: &mut Board) -> Cell {
    for row in 0..ROWS {
        for column in 0..COLS {
            let tag = board.cell(column, row);
            if tag == Cell::Empty {
                continue;
            }

            for (row_step, col_step) in RAYS {
                let mut line: WinLine = [(column, row); WIN_LENGTH];
                let mut complete = true;

                for step in 1..WIN_LENGTH {
                    let r = row as isize + row_step * step as isize;
                    let c = column as isize + col_step * step as isize;
                    if !in_bounds(r, c) || board.cell(c as usize, r as usize) != tag {
                        complete = false;
                        break;
                    }
                    line[step] = (c as usize, r as usize);
                }

                if complete {
                    board.set_winning_line(line);
                    return tag;
                }
            }
        }
    }

    Cell::Empty
}
