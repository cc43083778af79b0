//! Wall kick tables
//!
//! When a rotation collides in place, the offsets listed for
//! `(pre-rotation state, direction)` are tried in order and the first one that
//! fits is applied. Offsets are `(row, col)` with rows growing downwards.
//!
//! No family defines 180° kicks, and the square and every pentomino use the
//! empty family: those rotations succeed only when the naive rotation fits.

use crate::types::{CellPosition, Rotation, RotationDirection};

/// Kick table a piece uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KickFamily {
    /// J, L, S, T, Z
    Standard,
    /// The 4-long bar
    I,
    /// No kicks at all
    None,
}

const fn p(row: i32, col: i32) -> CellPosition {
    CellPosition::new(row, col)
}

const STANDARD_N_RIGHT: [CellPosition; 4] = [p(0, -1), p(-1, -1), p(2, 0), p(2, -1)];
const STANDARD_N_LEFT: [CellPosition; 4] = [p(0, 1), p(-1, 1), p(2, 0), p(2, 1)];
const STANDARD_E: [CellPosition; 4] = [p(0, 1), p(1, 1), p(-2, 0), p(-2, 1)];
const STANDARD_S_RIGHT: [CellPosition; 4] = [p(0, 1), p(-1, 1), p(2, 0), p(2, 1)];
const STANDARD_S_LEFT: [CellPosition; 4] = [p(0, -1), p(-1, -1), p(2, 0), p(2, -1)];
const STANDARD_W: [CellPosition; 4] = [p(0, -1), p(1, -1), p(-2, 0), p(-2, -1)];

const I_N_RIGHT: [CellPosition; 4] = [p(0, -2), p(0, 1), p(1, -2), p(-2, 1)];
const I_N_LEFT: [CellPosition; 4] = [p(0, -1), p(0, 2), p(-2, -1), p(1, 2)];
const I_E_RIGHT: [CellPosition; 4] = [p(0, -1), p(0, 2), p(-2, -1), p(1, 2)];
const I_E_LEFT: [CellPosition; 4] = [p(0, 2), p(0, -1), p(-1, 2), p(2, -1)];
const I_S_RIGHT: [CellPosition; 4] = [p(0, 2), p(0, -1), p(-1, 2), p(2, -1)];
const I_S_LEFT: [CellPosition; 4] = [p(0, 1), p(0, -2), p(2, 1), p(-1, -2)];
const I_W_RIGHT: [CellPosition; 4] = [p(0, 1), p(0, -2), p(2, 1), p(-1, -2)];
const I_W_LEFT: [CellPosition; 4] = [p(0, -2), p(0, 1), p(1, -2), p(-2, 1)];

/// Candidate offsets for rotating out of `from` in `direction`
///
/// Missing keys resolve to an empty list.
///
/// ```
/// use blockfall_core::kicks::{offsets, KickFamily};
/// use blockfall_types::{CellPosition, Rotation, RotationDirection};
///
/// let kicks = offsets(KickFamily::Standard, Rotation::North, RotationDirection::Right);
/// assert_eq!(kicks[0], CellPosition::new(0, -1));
/// assert!(offsets(KickFamily::I, Rotation::East, RotationDirection::Half).is_empty());
/// assert!(offsets(KickFamily::None, Rotation::North, RotationDirection::Left).is_empty());
/// ```
pub fn offsets(
    family: KickFamily,
    from: Rotation,
    direction: RotationDirection,
) -> &'static [CellPosition] {
    use Rotation::{East, North, South, West};
    use RotationDirection::{Left, Right};

    match (family, from, direction) {
        (KickFamily::Standard, North, Right) => &STANDARD_N_RIGHT,
        (KickFamily::Standard, North, Left) => &STANDARD_N_LEFT,
        (KickFamily::Standard, East, Right | Left) => &STANDARD_E,
        (KickFamily::Standard, South, Right) => &STANDARD_S_RIGHT,
        (KickFamily::Standard, South, Left) => &STANDARD_S_LEFT,
        (KickFamily::Standard, West, Right | Left) => &STANDARD_W,

        (KickFamily::I, North, Right) => &I_N_RIGHT,
        (KickFamily::I, North, Left) => &I_N_LEFT,
        (KickFamily::I, East, Right) => &I_E_RIGHT,
        (KickFamily::I, East, Left) => &I_E_LEFT,
        (KickFamily::I, South, Right) => &I_S_RIGHT,
        (KickFamily::I, South, Left) => &I_S_LEFT,
        (KickFamily::I, West, Right) => &I_W_RIGHT,
        (KickFamily::I, West, Left) => &I_W_LEFT,

        _ => &[],
    }
}
