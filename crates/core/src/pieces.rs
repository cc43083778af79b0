//! Pieces module - shape definitions and rotation states
//!
//! Every piece is a square matrix of small integers:
//!
//! - `0`: empty
//! - positive: occupied, the value is the tile (colour) id stamped on lock
//! - negative: spin marker cell (`-1` primary, `-2` secondary),
//!   treated as empty for collision
//!
//! The four rotation states are computed once when the catalog is built and
//! never mutated. Rotating a piece selects another state; it never rewrites a
//! matrix.

use std::sync::OnceLock;

use crate::kicks::KickFamily;
use crate::types::{
    CellPosition, EngineError, PieceId, Rotation, RotationDirection, DEFAULT_SPAWN_OFFSET,
};

/// How a piece decides whether a rotation was a spin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinRule {
    /// Rotation + immobile; all primary markers covered is a full spin,
    /// otherwise mini
    Default,
    /// Covered primary + secondary markers must reach 3; no immobility check
    ThreeCorner,
}

/// Immutable definition of one piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceDefinition {
    id: PieceId,
    size: usize,
    spawn_offset: i32,
    spin_rule: SpinRule,
    kick_family: KickFamily,
    /// Row-major matrices indexed by `Rotation::index()`
    states: [Vec<i8>; 4],
}

impl PieceDefinition {
    /// Build a definition from its spawn (north) matrix
    pub fn from_matrix<const N: usize>(id: PieceId, matrix: [[i8; N]; N]) -> Self {
        let north: Vec<i8> = matrix.iter().flatten().copied().collect();
        let east = rotate_matrix(&north, N, RotationDirection::Right);
        let south = rotate_matrix(&east, N, RotationDirection::Right);
        let west = rotate_matrix(&south, N, RotationDirection::Right);
        Self {
            id,
            size: N,
            spawn_offset: DEFAULT_SPAWN_OFFSET,
            spin_rule: SpinRule::Default,
            kick_family: KickFamily::None,
            states: [north, east, south, west],
        }
    }

    pub fn with_spawn_offset(mut self, rows: i32) -> Self {
        self.spawn_offset = rows;
        self
    }

    pub fn with_spin_rule(mut self, rule: SpinRule) -> Self {
        self.spin_rule = rule;
        self
    }

    pub fn with_kicks(mut self, family: KickFamily) -> Self {
        self.kick_family = family;
        self
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    /// Order of the square matrix
    pub fn size(&self) -> usize {
        self.size
    }

    /// Rows above the visible top the piece spawns at
    pub fn spawn_offset(&self) -> i32 {
        self.spawn_offset
    }

    pub fn spin_rule(&self) -> SpinRule {
        self.spin_rule
    }

    pub fn kick_family(&self) -> KickFamily {
        self.kick_family
    }

    /// Raw matrix of a rotation state, row-major
    pub fn state(&self, rotation: Rotation) -> &[i8] {
        &self.states[rotation.index()]
    }

    /// Occupied cells of a rotation state as `(offset, tile value)`
    pub fn minos(&self, rotation: Rotation) -> impl Iterator<Item = (CellPosition, i8)> + '_ {
        self.cells_where(rotation, |value| value > 0)
    }

    /// Cells of a rotation state holding the given spin marker
    pub fn markers(&self, rotation: Rotation, marker: i8) -> impl Iterator<Item = CellPosition> + '_ {
        self.cells_where(rotation, move |value| value == marker)
            .map(|(pos, _)| pos)
    }

    /// Number of occupied cells (same for every state)
    pub fn mino_count(&self) -> usize {
        self.states[0].iter().filter(|&&value| value > 0).count()
    }

    fn cells_where<F>(&self, rotation: Rotation, keep: F) -> impl Iterator<Item = (CellPosition, i8)> + '_
    where
        F: Fn(i8) -> bool + 'static,
    {
        let size = self.size;
        self.state(rotation)
            .iter()
            .enumerate()
            .filter(move |&(_, &value)| keep(value))
            .map(move |(idx, &value)| {
                (
                    CellPosition::new((idx / size) as i32, (idx % size) as i32),
                    value,
                )
            })
    }
}

/// Rotate a square row-major matrix of order `size`
///
/// - right: transpose, then flip horizontally
/// - left: transpose, then flip vertically
/// - half: flip horizontally, then vertically
///
/// ```
/// use blockfall_core::pieces::rotate_matrix;
/// use blockfall_types::RotationDirection;
///
/// let m = [1, 2, 3, 4];
/// assert_eq!(rotate_matrix(&m, 2, RotationDirection::Right), vec![3, 1, 4, 2]);
/// assert_eq!(rotate_matrix(&m, 2, RotationDirection::Left), vec![2, 4, 1, 3]);
/// assert_eq!(rotate_matrix(&m, 2, RotationDirection::Half), vec![4, 3, 2, 1]);
/// ```
pub fn rotate_matrix(cells: &[i8], size: usize, direction: RotationDirection) -> Vec<i8> {
    let at = |row: usize, col: usize| cells[row * size + col];
    let mut out = Vec::with_capacity(size * size);
    for row in 0..size {
        for col in 0..size {
            let value = match direction {
                RotationDirection::Right => at(size - 1 - col, row),
                RotationDirection::Left => at(col, size - 1 - row),
                RotationDirection::Half => at(size - 1 - row, size - 1 - col),
            };
            out.push(value);
        }
    }
    out
}

/// Piece ids of the built-in catalog
pub mod ids {
    use crate::types::PieceId;

    pub const T: PieceId = PieceId::new("T");
    pub const I: PieceId = PieceId::new("I");
    pub const O: PieceId = PieceId::new("O");
    pub const S: PieceId = PieceId::new("S");
    pub const Z: PieceId = PieceId::new("Z");
    pub const L: PieceId = PieceId::new("L");
    pub const J: PieceId = PieceId::new("J");

    pub const T5: PieceId = PieceId::new("T5");
    pub const I5: PieceId = PieceId::new("I5");
    pub const X: PieceId = PieceId::new("X");
    pub const S5: PieceId = PieceId::new("S5");
    pub const Z5: PieceId = PieceId::new("Z5");
    pub const P: PieceId = PieceId::new("P");
    pub const Q: PieceId = PieceId::new("Q");
    pub const L5: PieceId = PieceId::new("L5");
    pub const J5: PieceId = PieceId::new("J5");
    pub const U: PieceId = PieceId::new("U");
    pub const N: PieceId = PieceId::new("N");
    pub const H: PieceId = PieceId::new("H");
    pub const F: PieceId = PieceId::new("F");
    pub const E: PieceId = PieceId::new("E");
    pub const Y: PieceId = PieceId::new("Y");
    pub const R: PieceId = PieceId::new("R");
    pub const V: PieceId = PieceId::new("V");
    pub const W: PieceId = PieceId::new("W");
}

/// The seven tetrominoes
pub const TETROMINOES: [PieceId; 7] = [
    ids::T,
    ids::I,
    ids::O,
    ids::S,
    ids::Z,
    ids::L,
    ids::J,
];

/// The eighteen pentominoes
pub const PENTOMINOES: [PieceId; 18] = [
    ids::T5,
    ids::I5,
    ids::X,
    ids::S5,
    ids::Z5,
    ids::P,
    ids::Q,
    ids::L5,
    ids::J5,
    ids::U,
    ids::N,
    ids::H,
    ids::F,
    ids::E,
    ids::Y,
    ids::R,
    ids::V,
    ids::W,
];

/// Tetrominoes followed by pentominoes
pub const COMBINED: [PieceId; 25] = [
    ids::T,
    ids::I,
    ids::O,
    ids::S,
    ids::Z,
    ids::L,
    ids::J,
    ids::T5,
    ids::I5,
    ids::X,
    ids::S5,
    ids::Z5,
    ids::P,
    ids::Q,
    ids::L5,
    ids::J5,
    ids::U,
    ids::N,
    ids::H,
    ids::F,
    ids::E,
    ids::Y,
    ids::R,
    ids::V,
    ids::W,
];

const PENTOMINO_SPAWN_OFFSET: i32 = 3;

fn build_catalog() -> Vec<PieceDefinition> {
    let srs = |definition: PieceDefinition| definition.with_kicks(KickFamily::Standard);
    let pentomino = |definition: PieceDefinition| definition.with_spawn_offset(PENTOMINO_SPAWN_OFFSET);

    vec![
        srs(PieceDefinition::from_matrix(
            ids::T,
            [[-1, 7, -1], [7, 7, 7], [-2, 0, -2]],
        ))
        .with_spin_rule(SpinRule::ThreeCorner),
        PieceDefinition::from_matrix(
            ids::I,
            [[0, 0, 0, 0], [5, 5, 5, 5], [0, 0, 0, 0], [0, 0, 0, 0]],
        )
        .with_kicks(KickFamily::I),
        PieceDefinition::from_matrix(ids::O, [[3, 3], [3, 3]]),
        srs(PieceDefinition::from_matrix(
            ids::S,
            [[-1, 4, 4], [4, 4, -1], [0, 0, 0]],
        )),
        srs(PieceDefinition::from_matrix(
            ids::Z,
            [[1, 1, -1], [-1, 1, 1], [0, 0, 0]],
        )),
        srs(PieceDefinition::from_matrix(
            ids::L,
            [[-1, -1, 2], [2, 2, 2], [0, 0, 0]],
        )),
        srs(PieceDefinition::from_matrix(
            ids::J,
            [[6, -1, -1], [6, 6, 6], [0, 0, 0]],
        )),
        pentomino(PieceDefinition::from_matrix(
            ids::T5,
            [[0, 7, 0], [0, 7, 0], [7, 7, 7]],
        )),
        pentomino(PieceDefinition::from_matrix(
            ids::I5,
            [
                [0, 0, 0, 0, 0],
                [0, 0, 0, 0, 0],
                [5, 5, 5, 5, 5],
                [0, 0, 0, 0, 0],
                [0, 0, 0, 0, 0],
            ],
        )),
        pentomino(PieceDefinition::from_matrix(
            ids::X,
            [[0, 3, 0], [3, 3, 3], [0, 3, 0]],
        )),
        pentomino(PieceDefinition::from_matrix(
            ids::S5,
            [[0, 4, 4], [0, 4, 0], [4, 4, 0]],
        )),
        pentomino(PieceDefinition::from_matrix(
            ids::Z5,
            [[1, 1, 0], [0, 1, 0], [0, 1, 1]],
        )),
        PieceDefinition::from_matrix(ids::P, [[3, 3, 0], [3, 3, 3], [0, 0, 0]]),
        PieceDefinition::from_matrix(ids::Q, [[0, 4, 4], [4, 4, 4], [0, 0, 0]]),
        pentomino(PieceDefinition::from_matrix(
            ids::L5,
            [[0, 0, 0, 0], [0, 0, 0, 2], [2, 2, 2, 2], [0, 0, 0, 0]],
        )),
        pentomino(PieceDefinition::from_matrix(
            ids::J5,
            [[0, 0, 0, 0], [6, 0, 0, 0], [6, 6, 6, 6], [0, 0, 0, 0]],
        )),
        PieceDefinition::from_matrix(ids::U, [[1, 0, 1], [1, 1, 1], [0, 0, 0]]),
        pentomino(PieceDefinition::from_matrix(
            ids::N,
            [[0, 0, 0, 0], [6, 6, 0, 0], [0, 6, 6, 6], [0, 0, 0, 0]],
        )),
        pentomino(PieceDefinition::from_matrix(
            ids::H,
            [[0, 0, 0, 0], [0, 0, 7, 7], [7, 7, 7, 0], [0, 0, 0, 0]],
        )),
        pentomino(PieceDefinition::from_matrix(
            ids::F,
            [[0, 2, 0], [0, 2, 2], [2, 2, 0]],
        )),
        pentomino(PieceDefinition::from_matrix(
            ids::E,
            [[0, 5, 0], [5, 5, 0], [0, 5, 5]],
        )),
        pentomino(PieceDefinition::from_matrix(
            ids::Y,
            [[0, 0, 0, 0], [0, 0, 7, 0], [7, 7, 7, 7], [0, 0, 0, 0]],
        )),
        pentomino(PieceDefinition::from_matrix(
            ids::R,
            [[0, 0, 0, 0], [0, 1, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0]],
        )),
        pentomino(PieceDefinition::from_matrix(
            ids::V,
            [[6, 0, 0], [6, 0, 0], [6, 6, 6]],
        )),
        pentomino(PieceDefinition::from_matrix(
            ids::W,
            [[7, 0, 0], [7, 7, 0], [0, 7, 7]],
        )),
    ]
}

/// Every built-in piece definition
pub fn catalog() -> &'static [PieceDefinition] {
    static CATALOG: OnceLock<Vec<PieceDefinition>> = OnceLock::new();
    CATALOG.get_or_init(build_catalog)
}

/// Definition of a built-in piece
pub fn definition(id: PieceId) -> Option<&'static PieceDefinition> {
    catalog().iter().find(|def| def.id == id)
}

/// Resolve a piece name ("T", "I5", ...) to its definition
pub fn lookup(name: &str) -> Result<&'static PieceDefinition, EngineError> {
    catalog()
        .iter()
        .find(|def| def.id.as_str() == name)
        .ok_or_else(|| EngineError::UnknownPiece(name.to_string()))
}

/// Resolve a list of ids, failing on the first one missing from the catalog
pub fn resolve_all(ids: &[PieceId]) -> Result<Vec<&'static PieceDefinition>, EngineError> {
    ids.iter()
        .map(|&id| definition(id).ok_or_else(|| EngineError::UnknownPiece(id.to_string())))
        .collect()
}
