//! Board module - manages the game grid
//!
//! The board is a `(hidden + visible) x width` grid of integer tiles. A tile of
//! `0` is empty; any other value is occupied (pieces stamp their colour id).
//! Uses a flat row-major vector for cache locality.
//!
//! Coordinates are `(row, col)`: row 0 is the top of the hidden portion and
//! rows grow downwards. Rows `0..hidden_height` form the spawn buffer above the
//! visible field.

use crate::types::{EngineError, BOUNDARY_TILE};

/// Tile value used for garbage and for `#` cells in [`Board::from_ascii`]
pub const GARBAGE_TILE: i32 = 8;

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    visible_height: usize,
    hidden_height: usize,
    /// Flat array of tiles, row-major order (row * width + col)
    tiles: Vec<i32>,
}

impl Board {
    /// Create a new empty board
    pub fn new(width: usize, visible_height: usize, hidden_height: usize) -> Self {
        Self {
            width,
            visible_height,
            hidden_height,
            tiles: vec![0; width * (visible_height + hidden_height)],
        }
    }

    /// Build a board from ASCII rows, top row first.
    ///
    /// `.` is empty, a digit is that tile value and anything else is
    /// [`GARBAGE_TILE`]. The rows passed in become the bottom of the board;
    /// the rest (up to `visible_height + hidden_height`) is empty.
    ///
    /// ```
    /// use blockfall_core::Board;
    ///
    /// let board = Board::from_ascii(&["..#", "###"], 2, 2);
    /// assert_eq!(board.width(), 3);
    /// assert_eq!(board.get(3, 0), Ok(8));
    /// assert_eq!(board.get(2, 0), Ok(0));
    /// ```
    pub fn from_ascii(rows: &[&str], visible_height: usize, hidden_height: usize) -> Self {
        let width = rows.first().map_or(0, |row| row.chars().count());
        let mut board = Self::new(width, visible_height, hidden_height);
        let top = board.height().saturating_sub(rows.len());
        for (i, line) in rows.iter().enumerate() {
            for (col, ch) in line.chars().take(width).enumerate() {
                let value = match ch {
                    '.' => 0,
                    '0'..='9' => ch as i32 - '0' as i32,
                    _ => GARBAGE_TILE,
                };
                board.tiles[(top + i) * width + col] = value;
            }
        }
        board
    }

    #[inline(always)]
    fn index(&self, row: i32, col: i32) -> Option<usize> {
        if self.in_bounds(row, col) {
            Some(row as usize * self.width + col as usize)
        } else {
            None
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Total number of rows, hidden portion included
    pub fn height(&self) -> usize {
        self.visible_height + self.hidden_height
    }

    pub fn visible_height(&self) -> usize {
        self.visible_height
    }

    pub fn hidden_height(&self) -> usize {
        self.hidden_height
    }

    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.height() && (col as usize) < self.width
    }

    /// Get tile at `(row, col)`
    pub fn get(&self, row: i32, col: i32) -> Result<i32, EngineError> {
        self.index(row, col)
            .map(|idx| self.tiles[idx])
            .ok_or(EngineError::TileOutOfRange { row, col })
    }

    /// Set tile at `(row, col)`
    pub fn set(&mut self, row: i32, col: i32, value: i32) -> Result<(), EngineError> {
        let idx = self
            .index(row, col)
            .ok_or(EngineError::TileOutOfRange { row, col })?;
        self.tiles[idx] = value;
        Ok(())
    }

    /// Collision probe: the tile value, or [`BOUNDARY_TILE`] outside the grid
    #[inline]
    pub fn tile_or_boundary(&self, row: i32, col: i32) -> i32 {
        self.index(row, col)
            .map_or(BOUNDARY_TILE, |idx| self.tiles[idx])
    }

    pub fn is_occupied(&self, row: i32, col: i32) -> bool {
        self.tile_or_boundary(row, col) != 0
    }

    fn row_index(&self, row: i32) -> Result<usize, EngineError> {
        if row >= 0 && (row as usize) < self.height() {
            Ok(row as usize)
        } else {
            Err(EngineError::RowOutOfRange(row))
        }
    }

    /// Tiles of one row
    pub fn row(&self, row: i32) -> Result<&[i32], EngineError> {
        let start = self.row_index(row)? * self.width;
        Ok(&self.tiles[start..start + self.width])
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, row: i32) -> Result<bool, EngineError> {
        Ok(self.row(row)?.iter().all(|&tile| tile != 0))
    }

    /// Remove a row, shift every row above it down by one and insert an
    /// empty row at the top
    pub fn remove_row(&mut self, row: i32) -> Result<(), EngineError> {
        let row = self.row_index(row)?;
        let width = self.width;
        // copy_within handles the overlapping ranges
        self.tiles.copy_within(0..row * width, width);
        self.tiles[..width].fill(0);
        Ok(())
    }

    /// Remove every full row, scanning top to bottom; returns how many were removed
    ///
    /// A removal only moves rows above the current index, which have already
    /// been scanned and found not full, so one pass finds every full row.
    pub fn clear_full_rows(&mut self) -> u32 {
        let width = self.width;
        let mut cleared = 0;
        for row in 0..self.height() {
            let start = row * width;
            if self.tiles[start..start + width].iter().all(|&tile| tile != 0) {
                self.tiles.copy_within(0..start, width);
                self.tiles[..width].fill(0);
                cleared += 1;
            }
        }
        cleared
    }

    /// Number of non-empty tiles on the board
    pub fn occupied_count(&self) -> usize {
        self.tiles.iter().filter(|&&tile| tile != 0).count()
    }

    /// Highest (smallest index) row holding any tile
    pub fn top_occupied_row(&self) -> Option<usize> {
        self.tiles
            .chunks(self.width.max(1))
            .position(|row| row.iter().any(|&tile| tile != 0))
    }

    /// Raw tiles, row-major
    pub fn tiles(&self) -> &[i32] {
        &self.tiles
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.tiles.fill(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_row(board: &mut Board, row: i32, value: i32) {
        for col in 0..board.width() as i32 {
            board.set(row, col, value).unwrap();
        }
    }

    #[test]
    fn test_board_dimensions() {
        let board = Board::new(10, 20, 20);
        assert_eq!(board.width(), 10);
        assert_eq!(board.height(), 40);
        assert_eq!(board.tiles().len(), 400);
        assert_eq!(board.occupied_count(), 0);
    }

    #[test]
    fn test_get_set_bounds() {
        let mut board = Board::new(10, 20, 2);
        assert!(board.set(21, 9, 5).is_ok());
        assert_eq!(board.get(21, 9), Ok(5));
        assert_eq!(
            board.get(22, 0),
            Err(EngineError::TileOutOfRange { row: 22, col: 0 })
        );
        assert_eq!(
            board.set(0, -1, 1),
            Err(EngineError::TileOutOfRange { row: 0, col: -1 })
        );
        assert_eq!(
            board.get(-1, 10),
            Err(EngineError::TileOutOfRange { row: -1, col: 10 })
        );
    }

    #[test]
    fn test_boundary_probe() {
        let mut board = Board::new(4, 4, 0);
        board.set(3, 3, 2).unwrap();
        assert_eq!(board.tile_or_boundary(3, 3), 2);
        assert_eq!(board.tile_or_boundary(0, 0), 0);
        assert_eq!(board.tile_or_boundary(4, 0), BOUNDARY_TILE);
        assert_eq!(board.tile_or_boundary(0, -1), BOUNDARY_TILE);
        assert!(board.is_occupied(-1, 0));
    }

    #[test]
    fn test_is_row_full() {
        let mut board = Board::new(10, 20, 0);
        assert_eq!(board.is_row_full(19), Ok(false));
        fill_row(&mut board, 19, 1);
        assert_eq!(board.is_row_full(19), Ok(true));
        board.set(19, 4, 0).unwrap();
        assert_eq!(board.is_row_full(19), Ok(false));
        assert_eq!(board.is_row_full(20), Err(EngineError::RowOutOfRange(20)));
        assert_eq!(board.is_row_full(-1), Err(EngineError::RowOutOfRange(-1)));
    }

    #[test]
    fn test_remove_row_shifts_rows_above() {
        let mut board = Board::new(3, 4, 0);
        board.set(0, 0, 1).unwrap();
        board.set(1, 1, 2).unwrap();
        board.set(3, 2, 3).unwrap();

        board.remove_row(2).unwrap();

        assert_eq!(board.row(0).unwrap(), &[0, 0, 0]);
        assert_eq!(board.row(1).unwrap(), &[1, 0, 0]);
        assert_eq!(board.row(2).unwrap(), &[0, 2, 0]);
        assert_eq!(board.row(3).unwrap(), &[0, 0, 3]);
        assert_eq!(board.remove_row(4), Err(EngineError::RowOutOfRange(4)));
    }

    #[test]
    fn test_clear_full_rows_non_adjacent() {
        let mut board = Board::from_ascii(
            &[
                "###", //
                "#..", //
                "###", //
                ".#.", //
            ],
            4,
            0,
        );
        let cleared = board.clear_full_rows();
        assert_eq!(cleared, 2);
        assert_eq!(board.row(0).unwrap(), &[0, 0, 0]);
        assert_eq!(board.row(1).unwrap(), &[0, 0, 0]);
        assert_eq!(board.row(2).unwrap(), &[8, 0, 0]);
        assert_eq!(board.row(3).unwrap(), &[0, 8, 0]);
    }

    #[test]
    fn test_clear_full_rows_stacked() {
        let mut board = Board::from_ascii(&["#.##", "####", "####", "####", "####"], 5, 1);
        assert_eq!(board.clear_full_rows(), 4);
        assert_eq!(board.occupied_count(), 3);
        assert_eq!(board.row(5).unwrap(), &[8, 0, 8, 8]);
        assert_eq!(board.clear_full_rows(), 0);
    }

    #[test]
    fn test_top_occupied_row() {
        let mut board = Board::new(5, 5, 5);
        assert_eq!(board.top_occupied_row(), None);
        board.set(7, 2, 1).unwrap();
        board.set(9, 0, 1).unwrap();
        assert_eq!(board.top_occupied_row(), Some(7));
        board.clear();
        assert_eq!(board.top_occupied_row(), None);
    }
}
