//! Notifications emitted by the engine
//!
//! Display, scoring overlays and audio subscribe to these; the engine never
//! depends on who is listening.

use crate::{CellPosition, PieceId, Rotation, SpinKind, TopOutKind};

/// Where and how a piece came to rest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Placement {
    pub position: CellPosition,
    pub rotation: Rotation,
    pub spin: SpinKind,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "camelCase"))]
pub enum Notification {
    /// A new piece was taken from the queue
    NextPieceSpawned { piece: PieceId },
    /// The active piece went into the hold slot
    PieceHeld { piece: PieceId },
    /// A piece was stamped into the board
    PiecePlaced {
        piece: PieceId,
        position: CellPosition,
        rotation: Rotation,
        spin: SpinKind,
        cleared_lines: bool,
    },
    /// One or more rows were removed
    ///
    /// `piece` and `placement` are absent when the rows were cleared by the
    /// per-tick sweep rather than by a lock.
    LineCleared {
        count: u32,
        piece: Option<PieceId>,
        placement: Option<Placement>,
    },
    /// A rotation ended in a spin position
    PieceSpun {
        piece: PieceId,
        position: CellPosition,
        rotation: Rotation,
        spin: SpinKind,
    },
    /// A fatal top-out ended the session
    ToppedOut { kind: TopOutKind },
    /// The configured line goal was reached
    GoalReached { lines: u32, elapsed_secs: f64 },
}

impl Notification {
    pub fn name(&self) -> &'static str {
        match self {
            Notification::NextPieceSpawned { .. } => "nextPieceSpawned",
            Notification::PieceHeld { .. } => "pieceHeld",
            Notification::PiecePlaced { .. } => "piecePlaced",
            Notification::LineCleared { .. } => "lineCleared",
            Notification::PieceSpun { .. } => "pieceSpun",
            Notification::ToppedOut { .. } => "toppedOut",
            Notification::GoalReached { .. } => "goalReached",
        }
    }
}
