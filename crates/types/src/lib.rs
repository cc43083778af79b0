//! Core types module - shared data structures and constants
//!
//! This crate defines the vocabulary shared by the rules engine, the input
//! tracker and the placement helper. Everything here is plain data with no
//! simulation logic, so it can be used by any consumer of the engine's
//! notifications (display, scoring overlays, audio, bots).
//!
//! # Coordinates
//!
//! Board cells are addressed as `(row, col)` with row 0 at the very top of the
//! hidden portion. Rows grow downwards, so "down" is `+1` row.
//!
//! ```text
//! row 0                 ┐
//! ...                   │ hidden portion (spawn buffer)
//! row hidden - 1        ┘
//! row hidden            ┐
//! ...                   │ visible play field
//! row hidden+visible-1  ┘
//! ```
//!
//! # Timing defaults
//!
//! All timing values are in seconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_DAS_SECS` | 8/60 | Delay before auto-repeat starts |
//! | `DEFAULT_ARR_SECS` | 1e-8 | Interval between auto-repeat steps (effectively instant) |
//! | `DEFAULT_LOCK_DELAY_SECS` | 0.5 | Grace period on the floor before locking |
//! | `LOCK_RESET_LIMIT` | 15 | Max lock timer resets per piece |
//! | `FRAME_TIME_SECS` | 1/60 | Reference frame for gravity units |
//!
//! # Gravity
//!
//! Gravity is expressed in G: 1G moves a piece one tile per reference frame,
//! i.e. 60 tiles per second. The allowed range is `0.0..=MAX_GRAVITY` (20G).
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{Command, Rotation, RotationDirection, TopOutKind, TopOutMask};
//!
//! let rotation = Rotation::North.turned(RotationDirection::Left);
//! assert_eq!(rotation, Rotation::West);
//!
//! assert_eq!("hardDrop".parse::<Command>(), Ok(Command::HardDrop));
//!
//! assert!(TopOutMask::GUIDELINE.contains(TopOutKind::LockOut));
//! assert!(!TopOutMask::GUIDELINE.contains(TopOutKind::StrictGarbageOut));
//! ```

pub mod error;
pub mod notification;

use std::fmt;
use std::str::FromStr;
use std::ops::{Add, AddAssign, Neg, Sub};

pub use error::{ConfigError, EngineError};
pub use notification::{Notification, Placement};

/// Default board width in cells (10 columns)
pub const DEFAULT_BOARD_WIDTH: usize = 10;

/// Default visible play field height (20 rows)
pub const DEFAULT_VISIBLE_HEIGHT: usize = 20;

/// Default hidden rows above the visible field (20 rows)
pub const DEFAULT_HIDDEN_HEIGHT: usize = 20;

/// Maximum gravity in G units
pub const MAX_GRAVITY: f64 = 20.0;

/// Reference frame time gravity units are defined against (60 FPS)
pub const FRAME_TIME_SECS: f64 = 1.0 / 60.0;

/// Tiles per millisecond covered by 1G
pub const G_TILES_PER_MS: f64 = 0.06;

/// Base gravity used for soft drop when the configured gravity is zero
pub const MIN_SOFT_DROP_BASE_GRAVITY: f64 = 0.1;

/// Default starting gravity (one tile per second)
pub const DEFAULT_GRAVITY: f64 = 1.0 / 60.0;

/// Default DAS: 8 frames
pub const DEFAULT_DAS_SECS: f64 = 8.0 / 60.0;

/// Default ARR: effectively instant
pub const DEFAULT_ARR_SECS: f64 = 0.000_000_01;

/// Default soft drop gravity multiplier
pub const DEFAULT_SOFT_DROP_FACTOR: u32 = 40;

/// Default lock delay
pub const DEFAULT_LOCK_DELAY_SECS: f64 = 0.5;

/// Maximum number of lock timer resets per piece (15)
pub const LOCK_RESET_LIMIT: u8 = 15;

/// Number of upcoming pieces the queue guarantees without blocking
pub const MAX_LOOKAHEAD: usize = 7;

/// Rows above the visible top a piece spawns at unless its definition says otherwise
pub const DEFAULT_SPAWN_OFFSET: i32 = 2;

/// Shape cell value marking a primary spin corner
pub const PRIMARY_SPIN_MARKER: i8 = -1;

/// Shape cell value marking a secondary spin corner
pub const SECONDARY_SPIN_MARKER: i8 = -2;

/// Covered corners required by the three-corner spin rule
pub const THREE_CORNER_THRESHOLD: usize = 3;

/// Tile value reported for coordinates outside the grid
pub const BOUNDARY_TILE: i32 = i32::MAX;

/// Lines needed per level step
pub const LINES_PER_LEVEL: u32 = 10;

/// Line clear scoring table (guideline)
///
/// Base points for clearing N lines at level 0, multiplied by (level + 1).
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Combo scoring base value (50 points per combo step)
pub const COMBO_BASE: u32 = 50;

/// Back-to-back bonus numerator (3/2 = 1.5x multiplier)
pub const B2B_NUMERATOR: u32 = 3;

/// Back-to-back bonus denominator
pub const B2B_DENOMINATOR: u32 = 2;

/// Identifier of a piece definition ("T", "I5", ...)
///
/// Ids are interned static strings; the catalog in `blockfall-core` resolves
/// arbitrary strings to the matching id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PieceId(&'static str);

impl PieceId {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A `(row, col)` board coordinate or offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CellPosition {
    pub row: i32,
    pub col: i32,
}

impl CellPosition {
    pub const ZERO: Self = Self::new(0, 0);
    pub const DOWN: Self = Self::new(1, 0);
    pub const UP: Self = Self::new(-1, 0);
    pub const LEFT: Self = Self::new(0, -1);
    pub const RIGHT: Self = Self::new(0, 1);

    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

impl Add for CellPosition {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.row + rhs.row, self.col + rhs.col)
    }
}

impl AddAssign for CellPosition {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for CellPosition {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.row - rhs.row, self.col - rhs.col)
    }
}

impl Neg for CellPosition {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.row, -self.col)
    }
}

/// Rotation states
///
/// - **North**: Spawn orientation (0° rotation)
/// - **East**: Rotated 90° clockwise
/// - **South**: Rotated 180°
/// - **West**: Rotated 90° counter-clockwise
///
/// The rotation cycle goes: North → East → South → West → North
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::North,
        Rotation::East,
        Rotation::South,
        Rotation::West,
    ];

    pub fn index(self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    pub fn turned(self, direction: RotationDirection) -> Self {
        self + direction.quarter_turns()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::North => "north",
            Rotation::East => "east",
            Rotation::South => "south",
            Rotation::West => "west",
        }
    }
}

/// Rotation state after `quarter_turns` clockwise turns (negative turns go counter-clockwise)
///
/// ```
/// use blockfall_types::Rotation;
///
/// assert_eq!(Rotation::North + 1, Rotation::East);
/// assert_eq!(Rotation::North + -1, Rotation::West);
/// assert_eq!(Rotation::East + 6, Rotation::West);
/// ```
impl Add<i32> for Rotation {
    type Output = Self;

    fn add(self, quarter_turns: i32) -> Self {
        let idx = (self.index() as i32 + quarter_turns).rem_euclid(4);
        Self::ALL[idx as usize]
    }
}

/// Direction of a rotation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum RotationDirection {
    /// 90° counter-clockwise
    Left,
    /// 90° clockwise
    Right,
    /// 180°
    Half,
}

impl RotationDirection {
    pub const ALL: [RotationDirection; 3] = [
        RotationDirection::Left,
        RotationDirection::Right,
        RotationDirection::Half,
    ];

    pub fn quarter_turns(self) -> i32 {
        match self {
            RotationDirection::Left => -1,
            RotationDirection::Right => 1,
            RotationDirection::Half => 2,
        }
    }

    /// Decode a raw direction index (0 = left, 1 = right, 2 = 180°)
    ///
    /// ```
    /// use blockfall_types::{EngineError, RotationDirection};
    ///
    /// assert_eq!(RotationDirection::from_index(1), Ok(RotationDirection::Right));
    /// assert_eq!(
    ///     RotationDirection::from_index(7),
    ///     Err(EngineError::InvalidRotationDirection(7))
    /// );
    /// ```
    pub fn from_index(index: i32) -> Result<Self, EngineError> {
        match index {
            0 => Ok(RotationDirection::Left),
            1 => Ok(RotationDirection::Right),
            2 => Ok(RotationDirection::Half),
            other => Err(EngineError::InvalidRotationDirection(other)),
        }
    }
}

/// Spin classification of a rotation (and of the lock that follows it)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SpinKind {
    #[default]
    None,
    Mini,
    Full,
}

impl SpinKind {
    /// Returns `None` for `SpinKind::None`, `Some("mini")` / `Some("full")` otherwise.
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            SpinKind::None => None,
            SpinKind::Mini => Some("mini"),
            SpinKind::Full => Some("full"),
        }
    }

    pub fn is_spin(&self) -> bool {
        !matches!(self, SpinKind::None)
    }
}

/// Ways a game can overflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TopOutKind {
    /// A freshly spawned piece overlaps the stack
    BlockOut,
    /// Incoming garbage pushes blocks above the board
    GarbageOut,
    /// A piece locks entirely above the visible field
    LockOut,
    /// Incoming garbage pushes any block into the hidden portion
    StrictGarbageOut,
}

impl TopOutKind {
    pub const ALL: [TopOutKind; 4] = [
        TopOutKind::BlockOut,
        TopOutKind::GarbageOut,
        TopOutKind::LockOut,
        TopOutKind::StrictGarbageOut,
    ];

    pub fn bits(self) -> u8 {
        match self {
            TopOutKind::BlockOut => 1 << 0,
            TopOutKind::GarbageOut => 1 << 1,
            TopOutKind::LockOut => 1 << 2,
            TopOutKind::StrictGarbageOut => 1 << 3,
        }
    }

    /// Decode a raw flag value; it must be exactly one known bit.
    ///
    /// ```
    /// use blockfall_types::{EngineError, TopOutKind};
    ///
    /// assert_eq!(TopOutKind::from_bits(0b100), Ok(TopOutKind::LockOut));
    /// assert_eq!(TopOutKind::from_bits(0b011), Err(EngineError::InvalidTopOutKind(0b011)));
    /// assert_eq!(TopOutKind::from_bits(0b10000), Err(EngineError::InvalidTopOutKind(0b10000)));
    /// ```
    pub fn from_bits(bits: u8) -> Result<Self, EngineError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.bits() == bits)
            .ok_or(EngineError::InvalidTopOutKind(bits))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TopOutKind::BlockOut => "block out",
            TopOutKind::GarbageOut => "garbage out",
            TopOutKind::LockOut => "lock out",
            TopOutKind::StrictGarbageOut => "garbage out (strict)",
        }
    }
}

/// Set of top-out kinds treated as fatal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TopOutMask(u8);

impl TopOutMask {
    pub const NONE: Self = Self(0);
    /// Block out, garbage out and lock out
    pub const GUIDELINE: Self = Self(0b0111);
    pub const ALL: Self = Self(0b1111);

    pub fn from_bits(bits: u8) -> Result<Self, ConfigError> {
        if bits & !Self::ALL.0 != 0 {
            return Err(ConfigError::TopOutMask(bits));
        }
        Ok(Self(bits))
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn with(self, kind: TopOutKind) -> Self {
        Self(self.0 | kind.bits())
    }

    /// Whether `kind` overlaps this mask
    pub fn contains(self, kind: TopOutKind) -> bool {
        self.0 & kind.bits() != 0
    }
}

impl Default for TopOutMask {
    fn default() -> Self {
        Self::GUIDELINE
    }
}

/// Discrete commands pushed into the engine for one tick
///
/// Horizontal movement is not a command: it is derived from [`HoldInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Command {
    /// Rotate piece 90° counter-clockwise
    RotateLeft,
    /// Rotate piece 90° clockwise
    RotateRight,
    /// Rotate piece 180°
    Rotate180,
    /// Drop to the lowest reachable row and lock immediately
    HardDrop,
    /// Swap the active piece with the hold slot (once per spawn)
    Hold,
    /// Start soft dropping
    SoftDropOn,
    /// Stop soft dropping
    SoftDropOff,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::RotateLeft => "rotateLeft",
            Command::RotateRight => "rotateRight",
            Command::Rotate180 => "rotate180",
            Command::HardDrop => "hardDrop",
            Command::Hold => "hold",
            Command::SoftDropOn => "softDropOn",
            Command::SoftDropOff => "softDropOff",
        }
    }

    /// Rotation direction requested by this command, if any
    pub fn rotation(&self) -> Option<RotationDirection> {
        match self {
            Command::RotateLeft => Some(RotationDirection::Left),
            Command::RotateRight => Some(RotationDirection::Right),
            Command::Rotate180 => Some(RotationDirection::Half),
            _ => None,
        }
    }
}

/// Direction currently held for horizontal movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum HoldDirection {
    Left,
    Right,
    #[default]
    None,
}

impl HoldDirection {
    pub fn offset(self) -> Option<CellPosition> {
        match self {
            HoldDirection::Left => Some(CellPosition::LEFT),
            HoldDirection::Right => Some(CellPosition::RIGHT),
            HoldDirection::None => None,
        }
    }
}

/// Parse command from string (case-insensitive)
///
/// ```
/// use blockfall_types::{Command, EngineError};
///
/// assert_eq!("rotateLeft".parse::<Command>(), Ok(Command::RotateLeft));
/// assert_eq!("HOLD".parse::<Command>(), Ok(Command::Hold));
/// assert_eq!(
///     "unknown".parse::<Command>(),
///     Err(EngineError::UnknownCommand("unknown".to_string()))
/// );
/// ```
impl FromStr for Command {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rotateleft" => Ok(Command::RotateLeft),
            "rotateright" => Ok(Command::RotateRight),
            "rotate180" => Ok(Command::Rotate180),
            "harddrop" => Ok(Command::HardDrop),
            "hold" => Ok(Command::Hold),
            "softdropon" => Ok(Command::SoftDropOn),
            "softdropoff" => Ok(Command::SoftDropOff),
            _ => Err(EngineError::UnknownCommand(s.to_string())),
        }
    }
}

/// Continuous horizontal hold state for one tick
///
/// `prev_held_secs` is NaN on the first tick of a press.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HoldInput {
    pub direction: HoldDirection,
    pub held_secs: f64,
    pub prev_held_secs: f64,
}

impl HoldInput {
    /// No direction held
    pub const IDLE: Self = Self {
        direction: HoldDirection::None,
        held_secs: f64::NAN,
        prev_held_secs: f64::NAN,
    };

    pub fn new(direction: HoldDirection, held_secs: f64, prev_held_secs: f64) -> Self {
        Self {
            direction,
            held_secs,
            prev_held_secs,
        }
    }

    /// First tick of a press in `direction`
    pub fn pressed(direction: HoldDirection) -> Self {
        Self::new(direction, 0.0, f64::NAN)
    }

    pub fn just_pressed(&self) -> bool {
        self.direction != HoldDirection::None && self.prev_held_secs.is_nan()
    }
}

impl Default for HoldInput {
    fn default() -> Self {
        Self::IDLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timing_constants() {
        assert_eq!(DEFAULT_BOARD_WIDTH, 10);
        assert_eq!(DEFAULT_VISIBLE_HEIGHT, 20);
        assert_eq!(DEFAULT_HIDDEN_HEIGHT, 20);
        assert_eq!(LOCK_RESET_LIMIT, 15);
        assert_eq!(MAX_LOOKAHEAD, 7);
        assert!((G_TILES_PER_MS * 1000.0 * FRAME_TIME_SECS - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_wraps_in_both_directions() {
        for rotation in Rotation::ALL {
            assert_eq!(rotation + 4, rotation);
            assert_eq!(rotation + -4, rotation);
            assert_eq!(rotation.turned(RotationDirection::Half), rotation + 1 + 1);
            assert_eq!(
                rotation
                    .turned(RotationDirection::Left)
                    .turned(RotationDirection::Right),
                rotation
            );
        }
    }

    #[test]
    fn test_top_out_kinds_are_single_bits() {
        for kind in TopOutKind::ALL {
            assert_eq!(kind.bits().count_ones(), 1);
            assert_eq!(TopOutKind::from_bits(kind.bits()), Ok(kind));
        }
        assert_eq!(
            TopOutKind::from_bits(0),
            Err(EngineError::InvalidTopOutKind(0))
        );
    }

    #[test]
    fn test_top_out_mask_overlap_uses_and() {
        let mask = TopOutMask::NONE.with(TopOutKind::BlockOut);
        assert!(mask.contains(TopOutKind::BlockOut));
        assert!(!mask.contains(TopOutKind::LockOut));
        assert!(!TopOutMask::NONE.contains(TopOutKind::BlockOut));
        assert_eq!(
            TopOutMask::from_bits(0b1_0000),
            Err(ConfigError::TopOutMask(0b1_0000))
        );
    }

    #[test]
    fn test_command_string_roundtrip() {
        for cmd in [
            Command::RotateLeft,
            Command::RotateRight,
            Command::Rotate180,
            Command::HardDrop,
            Command::Hold,
            Command::SoftDropOn,
            Command::SoftDropOff,
        ] {
            assert_eq!(cmd.as_str().parse::<Command>(), Ok(cmd));
        }
        assert!("dash".parse::<Command>().is_err());
    }

    #[test]
    fn test_hold_input_press_detection() {
        assert!(HoldInput::pressed(HoldDirection::Left).just_pressed());
        assert!(!HoldInput::IDLE.just_pressed());
        assert!(!HoldInput::new(HoldDirection::Right, 0.2, 0.1).just_pressed());
    }
}
