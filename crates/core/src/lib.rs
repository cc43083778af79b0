//! Core rules engine - pure, deterministic and testable
//!
//! This crate contains the whole simulation: grid, pieces, rotation and kicks,
//! spin classification, lock delay, gravity, hold, piece sequencing and top-out
//! arbitration. It has no dependencies on rendering, input devices or I/O:
//!
//! - **Deterministic**: the same seed and the same inputs produce the same game
//! - **Headless**: display, audio and UI consume [`Notification`](types::Notification)s
//! - **Configurable**: board size, timing, gravity and generators come from [`Rules`]
//!
//! # Module Structure
//!
//! - [`board`]: tile grid with bounds-checked access and row clearing
//! - [`pieces`]: piece catalog with precomputed rotation states
//! - [`kicks`]: wall kick tables per piece family
//! - [`active_piece`]: the falling piece (movement, rotation, spins, lock delay)
//! - [`rng`], [`generators`], [`queue`]: seeded piece sequencing
//! - [`rules`]: validated session configuration
//! - [`scoring`]: line clears, spins, combos and back-to-back
//! - [`events`]: notification bus
//! - [`game_state`]: the per-tick orchestrator
//! - [`snapshot`]: owned view for displays
//!
//! # Example
//!
//! ```
//! use blockfall_core::{GameState, Rules};
//! use blockfall_core::types::{Command, HoldInput, Notification};
//!
//! let mut game = GameState::new(Rules::seeded(12345)).unwrap();
//! game.start();
//!
//! game.tick(1.0 / 60.0, HoldInput::IDLE, &[Command::RotateRight, Command::HardDrop]);
//!
//! let events = game.take_events();
//! assert!(events.iter().any(|n| matches!(n, Notification::PiecePlaced { .. })));
//! assert_eq!(game.stats().pieces_placed, 1);
//! ```

pub mod active_piece;
pub mod board;
pub mod events;
pub mod game_state;
pub mod generators;
pub mod kicks;
pub mod pieces;
pub mod queue;
pub mod rng;
pub mod rules;
pub mod scoring;
pub mod snapshot;

pub use blockfall_types as types;

pub use active_piece::{ActivePiece, Collision};
pub use board::Board;
pub use events::{EventBus, SubscriptionId};
pub use game_state::{GameState, GameStats};
pub use generators::{GeneratorKind, PieceGenerator, Repetitions};
pub use kicks::KickFamily;
pub use pieces::{PieceDefinition, SpinRule};
pub use queue::PieceQueue;
pub use rng::PieceRng;
pub use rules::{Rules, SoftDropFactor};
pub use scoring::{calculate_score, ScoreResult};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
