use crate::active_piece::ActivePiece;
use crate::game_state::GameStats;
use crate::types::{CellPosition, PieceId, Rotation, SpinKind};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ActiveSnapshot {
    pub piece: PieceId,
    pub rotation: Rotation,
    pub position: CellPosition,
    pub spin: SpinKind,
    /// Board cells covered by the piece
    pub cells: Vec<CellPosition>,
}

impl From<&ActivePiece> for ActiveSnapshot {
    fn from(value: &ActivePiece) -> Self {
        Self {
            piece: value.id(),
            rotation: value.rotation(),
            position: value.position(),
            spin: value.spin(),
            cells: value.cells().map(|(cell, _)| cell).collect(),
        }
    }
}

/// Owned copy of everything a display needs for one frame
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GameSnapshot {
    pub width: usize,
    pub visible_height: usize,
    pub hidden_height: usize,
    /// Row-major tiles, hidden rows first
    pub tiles: Vec<i32>,
    pub active: Option<ActiveSnapshot>,
    /// Landing position of the active piece
    pub ghost: Option<CellPosition>,
    pub hold: Option<PieceId>,
    pub can_hold: bool,
    pub preview: Vec<PieceId>,
    pub stats: GameStats,
    pub gravity: f64,
    pub seed: u64,
    pub paused: bool,
    pub game_over: bool,
    pub goal_reached: bool,
}

impl GameSnapshot {
    pub fn tile(&self, row: usize, col: usize) -> Option<i32> {
        if col >= self.width {
            return None;
        }
        self.tiles.get(row * self.width + col).copied()
    }

    /// Only the visible rows
    pub fn visible_rows(&self) -> impl Iterator<Item = &[i32]> + '_ {
        self.tiles
            .chunks(self.width.max(1))
            .skip(self.hidden_height)
    }

    pub fn playable(&self) -> bool {
        !self.game_over && !self.goal_reached && !self.paused
    }
}
