//! Input module (engine-facing).
//!
//! Independent of any device or UI framework. Callers report the buttons held
//! each frame and get back the engine's hold state plus the command batch.

pub mod tracker;

pub use blockfall_types as types;

pub use tracker::{Buttons, FrameInput, HoldTracker, MAX_FRAME_COMMANDS};
