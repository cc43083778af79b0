//! Placement helper - drive the active piece to a target and hard drop it
//!
//! Bots and scripted replays think in final placements (column and rotation)
//! rather than frame inputs. [`apply_place`] turns one placement into the
//! rotate/shift/hard-drop sequence on a live [`GameState`].

use std::ops::RangeInclusive;

use thiserror::Error;

use crate::core::{ActivePiece, Board, GameState, PieceDefinition};
use crate::types::{CellPosition, Rotation, RotationDirection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlaceError {
    #[error("hold requested when unavailable")]
    HoldUnavailable,
    #[error("could not rotate to target rotation")]
    RotationBlocked,
    #[error("target column {0} would place piece out of bounds")]
    ColumnOutOfBounds(i32),
    #[error("could not move to target column due to collision")]
    ColumnBlocked,
    #[error("game is not playable")]
    NotPlayable,
    #[error("no active piece")]
    NoActive,
}

impl PlaceError {
    pub fn code(self) -> &'static str {
        match self {
            PlaceError::HoldUnavailable => "hold_unavailable",
            PlaceError::RotationBlocked
            | PlaceError::ColumnOutOfBounds(_)
            | PlaceError::ColumnBlocked
            | PlaceError::NotPlayable
            | PlaceError::NoActive => "invalid_place",
        }
    }
}

/// Origin columns at which every mino of `definition` in `rotation` fits
/// inside a `width`-wide board
pub fn legal_columns(
    definition: &PieceDefinition,
    rotation: Rotation,
    width: usize,
) -> Option<RangeInclusive<i32>> {
    let (min, max) = definition
        .minos(rotation)
        .fold(None, |range: Option<(i32, i32)>, (offset, _)| match range {
            Some((min, max)) => Some((min.min(offset.col), max.max(offset.col))),
            None => Some((offset.col, offset.col)),
        })?;
    let first = -min;
    let last = width as i32 - 1 - max;
    (first <= last).then_some(first..=last)
}

/// Shortest rotation sequence from the piece's current rotation to `target`
/// that succeeds on `board`, kicks included
pub fn rotation_plan(
    piece: &ActivePiece,
    board: &Board,
    target: Rotation,
) -> Option<Vec<RotationDirection>> {
    use RotationDirection::{Half, Left, Right};

    let turns = (target.index() as i32 - piece.rotation().index() as i32).rem_euclid(4);
    let candidates: Vec<Vec<RotationDirection>> = match turns {
        0 => vec![vec![]],
        1 => vec![vec![Right], vec![Left; 3]],
        2 => vec![vec![Half], vec![Right; 2], vec![Left; 2]],
        _ => vec![vec![Left], vec![Right; 3]],
    };
    candidates.into_iter().find(|plan| {
        let mut trial = piece.clone();
        plan.iter().all(|&direction| trial.rotate(board, direction).is_some())
            && trial.rotation() == target
    })
}

/// Rotate to `target_rotation`, shift to `target_col`, hard drop
///
/// `target_col` is the column of the piece matrix's left edge. With
/// `use_hold` the hold is performed first and the placement applies to the
/// piece that comes out of it. Returns the landing position.
pub fn apply_place(
    state: &mut GameState,
    target_col: i32,
    target_rotation: Rotation,
    use_hold: bool,
) -> Result<CellPosition, PlaceError> {
    if !state.is_running() {
        return Err(PlaceError::NotPlayable);
    }

    if use_hold && !state.hold() {
        return Err(PlaceError::HoldUnavailable);
    }

    let active = state.active().ok_or(PlaceError::NoActive)?.clone();
    let plan = rotation_plan(&active, state.board(), target_rotation)
        .ok_or(PlaceError::RotationBlocked)?;
    for direction in plan {
        if state.rotate(direction).is_none() {
            return Err(PlaceError::RotationBlocked);
        }
    }

    let active = state.active().ok_or(PlaceError::NoActive)?;
    if active.rotation() != target_rotation {
        return Err(PlaceError::RotationBlocked);
    }
    let columns = legal_columns(active.definition(), target_rotation, state.board().width())
        .ok_or(PlaceError::ColumnOutOfBounds(target_col))?;
    if !columns.contains(&target_col) {
        return Err(PlaceError::ColumnOutOfBounds(target_col));
    }

    let dx = target_col - active.position().col;
    let step = if dx > 0 {
        CellPosition::RIGHT
    } else {
        CellPosition::LEFT
    };
    for _ in 0..dx.abs() {
        if !state.move_piece(step) {
            return Err(PlaceError::ColumnBlocked);
        }
    }

    let landing = state
        .active()
        .map(|piece| piece.ghost_position(state.board()))
        .ok_or(PlaceError::NoActive)?;
    state.hard_drop().ok_or(PlaceError::NoActive)?;
    Ok(landing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pieces::{definition, ids};
    use crate::core::{GeneratorKind, Rules};
    use crate::types::PieceId;

    fn only(id: PieceId) -> GameState {
        let rules = Rules {
            seed: Some(1),
            generator: GeneratorKind::Bag {
                available: vec![id],
            },
            ..Rules::default()
        };
        let mut state = GameState::new(rules).unwrap();
        state.start();
        state
    }

    #[test]
    fn place_rejected_when_paused() {
        let mut state = GameState::new(Rules::seeded(1)).unwrap();
        state.start();
        state.pause();
        let err = apply_place(&mut state, 3, Rotation::North, false).unwrap_err();
        assert_eq!(err, PlaceError::NotPlayable);
    }

    #[test]
    fn place_rejected_when_column_out_of_bounds() {
        let mut state = GameState::new(Rules::seeded(1)).unwrap();
        state.start();
        let err = apply_place(&mut state, -50, Rotation::North, false).unwrap_err();
        assert_eq!(err, PlaceError::ColumnOutOfBounds(-50));
        assert_eq!(err.code(), "invalid_place");
    }

    #[test]
    fn place_rejected_when_column_blocked() {
        let mut state = only(ids::T);
        state.board_mut().set(19, 0, 8).unwrap();
        let err = apply_place(&mut state, 0, Rotation::North, false).unwrap_err();
        assert_eq!(err, PlaceError::ColumnBlocked);
        assert_eq!(state.active().unwrap().position().col, 1);
    }

    #[test]
    fn place_rotates_shifts_and_drops() {
        let mut state = only(ids::T);
        let landing = apply_place(&mut state, 0, Rotation::East, false).unwrap();
        assert_eq!(landing, CellPosition::new(37, 0));
        for (row, col) in [(37, 1), (38, 1), (38, 2), (39, 1)] {
            assert_eq!(state.board().get(row, col), Ok(7));
        }
        assert_eq!(state.board().occupied_count(), 4);
        assert_eq!(state.stats().pieces_placed, 1);
    }

    #[test]
    fn place_half_turn_uses_single_rotation() {
        let state = only(ids::T);
        let piece = state.active().unwrap();
        let plan = rotation_plan(piece, state.board(), Rotation::South).unwrap();
        assert_eq!(plan, vec![RotationDirection::Half]);
        let plan = rotation_plan(piece, state.board(), Rotation::West).unwrap();
        assert_eq!(plan, vec![RotationDirection::Left]);
    }

    #[test]
    fn place_with_hold_places_the_next_piece() {
        let mut state = GameState::new(Rules::seeded(21)).unwrap();
        state.start();
        let first = state.active().unwrap().id();

        apply_place(&mut state, 0, Rotation::North, true).unwrap();
        assert_eq!(state.held_piece(), Some(first));
        assert_eq!(state.stats().pieces_placed, 1);
        assert!(state.active().is_some());
        assert!(state.can_hold());

        apply_place(&mut state, 3, Rotation::North, true).unwrap();
        assert_eq!(state.stats().pieces_placed, 2);
    }

    #[test]
    fn legal_columns_follow_the_shape() {
        let i = definition(ids::I).unwrap();
        assert_eq!(legal_columns(i, Rotation::North, 10), Some(0..=6));
        assert_eq!(legal_columns(i, Rotation::East, 10), Some(-2..=7));
        assert_eq!(legal_columns(i, Rotation::North, 3), None);

        let t = definition(ids::T).unwrap();
        assert_eq!(legal_columns(t, Rotation::East, 10), Some(-1..=7));
    }
}
