//! Engine helpers layered over the core rules.
//!
//! The core crate only understands frame inputs. This crate adds
//! placement-level control for bots, scripted replays and the simulator.

pub mod place;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use place::{apply_place, legal_columns, rotation_plan, PlaceError};
