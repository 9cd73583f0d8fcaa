//! Outcome evaluation: win and draw detection.

use crate::board::{Board, Cell, Marker};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// The 8 winning lines: rows, columns, then diagonals.
///
/// Evaluation order is fixed; when more than one line is complete on an
/// artificially constructed board, the first line in this order wins.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // Rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // Columns
    [0, 4, 8],
    [2, 4, 6], // Diagonals
];

/// Terminal status of a board position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Game is ongoing.
    InProgress,
    /// A side completed a line.
    Won {
        /// Winning marker.
        marker: Marker,
        /// Indices of the completed line.
        line: [usize; 3],
    },
    /// Board is full with no winner.
    Draw,
}

impl Outcome {
    /// Returns true for `Won` or `Draw`.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::InProgress)
    }

    /// Returns the winning marker, if any.
    pub fn winner(self) -> Option<Marker> {
        match self {
            Outcome::Won { marker, .. } => Some(marker),
            _ => None,
        }
    }
}

/// Evaluates a board snapshot.
///
/// Checks all 8 lines in the order of [`LINES`]; a line is complete when
/// all three cells hold the same marker. With no complete line, a full
/// board is a draw and anything else is in progress.
#[instrument(skip(board))]
pub fn evaluate(board: &Board) -> Outcome {
    for line in LINES {
        let [a, b, c] = line;
        if let Some(Cell::Occupied(marker)) = board.get(a)
            && board.get(b) == Some(Cell::Occupied(marker))
            && board.get(c) == Some(Cell::Occupied(marker))
        {
            return Outcome::Won { marker, line };
        }
    }

    if board.is_full() {
        Outcome::Draw
    } else {
        Outcome::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from(marks: &[(usize, Marker)]) -> Board {
        let mut board = Board::new();
        for &(pos, marker) in marks {
            board.place(pos, marker).unwrap();
        }
        board
    }

    #[test]
    fn test_empty_board_in_progress() {
        assert_eq!(evaluate(&Board::new()), Outcome::InProgress);
    }

    #[test]
    fn test_each_line_wins() {
        for line in LINES {
            let board = board_from(&line.map(|i| (i, Marker::Computer)));
            assert_eq!(
                evaluate(&board),
                Outcome::Won {
                    marker: Marker::Computer,
                    line
                }
            );
        }
    }

    #[test]
    fn test_winner_top_row() {
        let board = board_from(&[
            (0, Marker::Human),
            (1, Marker::Human),
            (2, Marker::Human),
            (4, Marker::Computer),
            (5, Marker::Computer),
        ]);
        assert_eq!(evaluate(&board).winner(), Some(Marker::Human));
    }

    #[test]
    fn test_incomplete_line_in_progress() {
        let board = board_from(&[(0, Marker::Human), (1, Marker::Human)]);
        assert_eq!(evaluate(&board), Outcome::InProgress);
    }

    #[test]
    fn test_full_board_no_winner_is_draw() {
        // X O X / X O O / O X X
        let board = board_from(&[
            (0, Marker::Human),
            (1, Marker::Computer),
            (2, Marker::Human),
            (3, Marker::Human),
            (4, Marker::Computer),
            (5, Marker::Computer),
            (6, Marker::Computer),
            (7, Marker::Human),
            (8, Marker::Human),
        ]);
        assert_eq!(evaluate(&board), Outcome::Draw);
    }

    #[test]
    fn test_double_win_reports_first_line_in_order() {
        // Illegal position with both the top row and left column
        // complete for the same side; enumeration order decides.
        let mut board = Board::new();
        for pos in [0, 1, 2, 3, 6] {
            board.place(pos, Marker::Human).unwrap();
        }
        assert_eq!(
            evaluate(&board),
            Outcome::Won {
                marker: Marker::Human,
                line: [0, 1, 2]
            }
        );
    }
}
