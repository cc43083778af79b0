//! Active piece - the falling piece's state machine
//!
//! Owns the piece's position, rotation state, lock-delay timer and spin
//! tracking. It only reads the board; stamping on lock is done by
//! [`GameState`](crate::game_state::GameState).

use crate::board::Board;
use crate::kicks;
use crate::pieces::{PieceDefinition, SpinRule};
use crate::types::{
    CellPosition, PieceId, Rotation, RotationDirection, SpinKind, LOCK_RESET_LIMIT,
    PRIMARY_SPIN_MARKER, SECONDARY_SPIN_MARKER, THREE_CORNER_THRESHOLD,
};

/// Result of a collision probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    None,
    /// Overlaps occupied tiles inside the grid
    Tiles,
    /// At least one cell is outside the grid
    Boundary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivePiece {
    definition: &'static PieceDefinition,
    rotation: Rotation,
    position: CellPosition,
    lock_delay_secs: f64,
    lock_elapsed_secs: f64,
    lock_resets: u8,
    last_move_rotation: bool,
    spin: SpinKind,
}

impl ActivePiece {
    /// Place a piece at its spawn position: `hidden - spawn_offset` rows down,
    /// centred horizontally (floor division)
    pub fn spawn(definition: &'static PieceDefinition, board: &Board, lock_delay_secs: f64) -> Self {
        Self {
            definition,
            rotation: Rotation::North,
            position: Self::spawn_position(definition, board),
            lock_delay_secs,
            lock_elapsed_secs: 0.0,
            lock_resets: 0,
            last_move_rotation: false,
            spin: SpinKind::None,
        }
    }

    pub fn spawn_position(definition: &PieceDefinition, board: &Board) -> CellPosition {
        let row = board.hidden_height() as i32 - definition.spawn_offset();
        let col = (board.width() as i32 - definition.size() as i32).div_euclid(2);
        CellPosition::new(row, col)
    }

    pub fn definition(&self) -> &'static PieceDefinition {
        self.definition
    }

    pub fn id(&self) -> PieceId {
        self.definition.id()
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Board coordinate of the matrix's top-left cell
    pub fn position(&self) -> CellPosition {
        self.position
    }

    /// Resolved spin of the latest successful rotation
    pub fn spin(&self) -> SpinKind {
        self.spin
    }

    pub fn last_move_rotation(&self) -> bool {
        self.last_move_rotation
    }

    pub fn lock_elapsed_secs(&self) -> f64 {
        self.lock_elapsed_secs
    }

    pub fn lock_resets(&self) -> u8 {
        self.lock_resets
    }

    /// Board cells covered by the piece with their tile values
    pub fn cells(&self) -> impl Iterator<Item = (CellPosition, i8)> + '_ {
        let origin = self.position;
        self.definition
            .minos(self.rotation)
            .map(move |(offset, value)| (origin + offset, value))
    }

    /// Collision probe at the current position and rotation
    pub fn collision(&self, board: &Board) -> Collision {
        let mut result = Collision::None;
        for (cell, _) in self.cells() {
            if !board.in_bounds(cell.row, cell.col) {
                return Collision::Boundary;
            }
            if board.is_occupied(cell.row, cell.col) {
                result = Collision::Tiles;
            }
        }
        result
    }

    pub fn collides(&self, board: &Board) -> bool {
        self.collision(board) != Collision::None
    }

    /// Would the piece collide after moving by `offset`?
    fn blocked(&mut self, board: &Board, offset: CellPosition) -> bool {
        self.position += offset;
        let blocked = self.collides(board);
        self.position += -offset;
        blocked
    }

    /// True if moving one row down would collide
    pub fn is_on_floor(&self, board: &Board) -> bool {
        self.cells().any(|(cell, _)| board.is_occupied(cell.row + 1, cell.col))
    }

    /// True if the piece cannot move one cell in any direction
    pub fn is_immobile(&mut self, board: &Board) -> bool {
        [
            CellPosition::DOWN,
            CellPosition::LEFT,
            CellPosition::UP,
            CellPosition::RIGHT,
        ]
        .into_iter()
        .all(|offset| self.blocked(board, offset))
    }

    /// Translate the piece; reverts and returns false on collision
    ///
    /// On success the lock timer is reset (capped) when the piece was resting on
    /// the floor before a non-downward move and `reset_lock` is set. Unless
    /// `keep_rotation_flag` is set, the move cancels the previous rotation and
    /// any spin it resolved.
    pub fn try_move(
        &mut self,
        board: &Board,
        offset: CellPosition,
        keep_rotation_flag: bool,
        reset_lock: bool,
    ) -> bool {
        let was_on_floor = offset.row <= 0 && self.is_on_floor(board);
        if self.blocked(board, offset) {
            return false;
        }
        self.position += offset;
        if was_on_floor && reset_lock {
            self.reset_lock_delay();
        }
        if !keep_rotation_flag {
            self.last_move_rotation = false;
            self.spin = SpinKind::None;
        }
        true
    }

    /// Move one row down as many times as possible; returns rows travelled
    pub fn drop_to_floor(&mut self, board: &Board) -> u32 {
        let mut rows = 0;
        while self.try_move(board, CellPosition::DOWN, true, true) {
            rows += 1;
        }
        rows
    }

    /// Row offset the piece would land at with a hard drop
    pub fn ghost_position(&self, board: &Board) -> CellPosition {
        let mut ghost = self.clone();
        ghost.drop_to_floor(board);
        ghost.position
    }

    /// Rotate, trying the kick list when the naive rotation collides
    ///
    /// Returns the spin classification on success, `None` if every candidate
    /// collided (the piece is left untouched).
    pub fn rotate(&mut self, board: &Board, direction: RotationDirection) -> Option<SpinKind> {
        if self.is_on_floor(board) {
            self.reset_lock_delay();
        }
        let from = self.rotation;
        let origin = self.position;
        self.rotation = from.turned(direction);

        if self.collides(board) {
            let candidates = kicks::offsets(self.definition.kick_family(), from, direction);
            let mut kicked = false;
            for &offset in candidates {
                self.position = origin + offset;
                if !self.collides(board) {
                    kicked = true;
                    break;
                }
            }
            if !kicked {
                self.position = origin;
                self.rotation = from;
                return None;
            }
        }

        self.last_move_rotation = true;
        self.spin = self.classify_spin(board);
        Some(self.spin)
    }

    /// Spin classification of the current position
    pub fn classify_spin(&mut self, board: &Board) -> SpinKind {
        if !self.last_move_rotation {
            return SpinKind::None;
        }
        match self.definition.spin_rule() {
            SpinRule::Default => {
                if !self.is_immobile(board) {
                    return SpinKind::None;
                }
                let (total, covered) = self.covered_markers(board, PRIMARY_SPIN_MARKER);
                if covered == total {
                    SpinKind::Full
                } else {
                    SpinKind::Mini
                }
            }
            SpinRule::ThreeCorner => {
                let (_, primary) = self.covered_markers(board, PRIMARY_SPIN_MARKER);
                let (_, secondary) = self.covered_markers(board, SECONDARY_SPIN_MARKER);
                if primary + secondary < THREE_CORNER_THRESHOLD {
                    SpinKind::None
                } else if primary >= secondary {
                    SpinKind::Full
                } else {
                    SpinKind::Mini
                }
            }
        }
    }

    /// `(total, covered)` marker cells; the boundary counts as covering
    fn covered_markers(&self, board: &Board, marker: i8) -> (usize, usize) {
        let origin = self.position;
        self.definition
            .markers(self.rotation, marker)
            .fold((0, 0), |(total, covered), offset| {
                let cell = origin + offset;
                let hit = board.is_occupied(cell.row, cell.col) as usize;
                (total + 1, covered + hit)
            })
    }

    fn reset_lock_delay(&mut self) {
        if self.lock_resets < LOCK_RESET_LIMIT {
            self.lock_elapsed_secs = 0.0;
            self.lock_resets += 1;
        }
    }

    /// Advance the lock timer by `delta_secs`; true when the piece must lock
    pub fn advance_lock_delay(&mut self, board: &Board, delta_secs: f64) -> bool {
        if self.is_on_floor(board) {
            self.lock_elapsed_secs += delta_secs;
            self.lock_elapsed_secs > self.lock_delay_secs
        } else {
            if self.lock_elapsed_secs > 0.0 {
                self.reset_lock_delay();
            }
            false
        }
    }
}
