//! Error types
//!
//! [`ConfigError`] is produced while validating rules before a session starts.
//! [`EngineError`] covers caller contract violations during a session: bounds
//! violations and invalid arguments. None of them are transient.

use thiserror::Error;

/// A rule value outside its documented domain
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("DAS must be at least 0 seconds (got {0})")]
    NegativeDas(f64),

    #[error("ARR must be greater than 0 seconds (got {0})")]
    NonPositiveArr(f64),

    #[error("soft drop factor must be at least 1 (got {0})")]
    SoftDropFactor(u32),

    #[error("board width must be at least 1 (got {0})")]
    BoardWidth(usize),

    #[error("visible board height must be at least 1 (got {0})")]
    BoardHeight(usize),

    #[error("gravity must be between 0 and {max} G (got {value})")]
    Gravity { value: f64, max: f64 },

    #[error("lock delay must be at least 0 seconds (got {0})")]
    NegativeLockDelay(f64),

    #[error("top-out mask {0:#06b} contains unknown kinds")]
    TopOutMask(u8),

    #[error("generator needs at least one available piece")]
    EmptyBag,

    #[error("generator with extra picks needs a non-empty extra pool")]
    EmptyExtraPool,

    #[error("remaining bag repetitions must be positive or infinite")]
    ZeroRepetitions,

    #[error("unknown piece id {0:?}")]
    UnknownPiece(String),

    #[error("line goal must be greater than 0")]
    ZeroLineGoal,
}

/// Errors raised by engine operations at runtime
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("tile ({row}, {col}) is outside the board")]
    TileOutOfRange { row: i32, col: i32 },

    #[error("row {0} is outside the board")]
    RowOutOfRange(i32),

    #[error("lookahead index {index} is out of range (max {max})")]
    LookaheadOutOfRange { index: usize, max: usize },

    #[error("invalid rotation direction {0}")]
    InvalidRotationDirection(i32),

    #[error("invalid top-out kind {0:#06b}")]
    InvalidTopOutKind(u8),

    #[error("unknown piece id {0:?}")]
    UnknownPiece(String),

    #[error("unknown command {0:?}")]
    UnknownCommand(String),
}
