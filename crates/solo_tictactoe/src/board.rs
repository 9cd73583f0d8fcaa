//! Core domain types: markers, cells, and the 3x3 board.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// The mark a side plays with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    /// The human player (always moves first).
    Human,
    /// The computer opponent.
    Computer,
}

impl Marker {
    /// Returns the opposing marker.
    pub fn opponent(self) -> Self {
        match self {
            Marker::Human => Marker::Computer,
            Marker::Computer => Marker::Human,
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Empty cell.
    Empty,
    /// Cell occupied by a marker.
    Occupied(Marker),
}

/// Error applying a move to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum MoveError {
    /// Index outside 0-8.
    #[display("position {_0} out of bounds (must be 0-8)")]
    OutOfBounds(#[error(not(source))] usize),
    /// Target cell already holds a marker.
    #[display("cell {_0} is already occupied")]
    CellOccupied(#[error(not(source))] usize),
}

/// 3x3 tic-tac-toe board.
///
/// Cells are indexed 0-8 in row-major order. Under legal play the board
/// holds exactly as many computer marks as human marks, or one fewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Cells in row-major order (0-8).
    cells: [Cell; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; 9],
        }
    }

    /// Gets the cell at the given position (0-8).
    pub fn get(&self, pos: usize) -> Option<Cell> {
        self.cells.get(pos).copied()
    }

    /// Places a marker at the given position.
    pub fn place(&mut self, pos: usize, marker: Marker) -> Result<(), MoveError> {
        if pos >= 9 {
            return Err(MoveError::OutOfBounds(pos));
        }
        if self.cells[pos] != Cell::Empty {
            return Err(MoveError::CellOccupied(pos));
        }
        self.cells[pos] = Cell::Occupied(marker);
        Ok(())
    }

    /// Clears the cell at the given position.
    ///
    /// Used by search code to undo a hypothetical placement.
    pub(crate) fn clear(&mut self, pos: usize) {
        self.cells[pos] = Cell::Empty;
    }

    /// Checks if a cell is empty.
    pub fn is_empty(&self, pos: usize) -> bool {
        matches!(self.get(pos), Some(Cell::Empty))
    }

    /// Checks if every cell is occupied.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&c| c != Cell::Empty)
    }

    /// Returns all cells as a slice.
    pub fn cells(&self) -> &[Cell; 9] {
        &self.cells
    }

    /// Returns the indices of all empty cells in ascending order.
    pub fn empty_cells(&self) -> Vec<usize> {
        (0..9).filter(|&i| self.is_empty(i)).collect()
    }

    /// Counts the cells holding the given marker.
    pub fn mark_count(&self, marker: Marker) -> usize {
        self.cells
            .iter()
            .filter(|&&c| c == Cell::Occupied(marker))
            .count()
    }

    /// Formats the board as a human-readable string.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                let symbol = match self.cells[pos] {
                    Cell::Empty => (pos + 1).to_string(),
                    Cell::Occupied(Marker::Human) => "X".to_string(),
                    Cell::Occupied(Marker::Computer) => "O".to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
