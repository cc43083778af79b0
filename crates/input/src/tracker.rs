//! Hold tracker - per-frame button state to engine input
//!
//! Device-agnostic: the caller polls whatever device it has and reports which
//! buttons are down this frame. The tracker turns that into the engine's
//! [`HoldInput`] (continuous horizontal hold timing) plus the discrete
//! [`Command`]s for buttons that changed state.

use arrayvec::ArrayVec;

use crate::types::{Command, HoldDirection, HoldInput};

/// Most commands a single frame can produce
pub const MAX_FRAME_COMMANDS: usize = 8;

/// Buttons held down during one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Buttons {
    pub left: bool,
    pub right: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub rotate_180: bool,
    pub hard_drop: bool,
    pub hold: bool,
    pub soft_drop: bool,
}

/// Input for one engine tick
#[derive(Debug, Clone, PartialEq)]
pub struct FrameInput {
    pub hold: HoldInput,
    pub commands: ArrayVec<Command, MAX_FRAME_COMMANDS>,
}

/// Tracks held-direction timing across frames
#[derive(Debug, Clone)]
pub struct HoldTracker {
    direction: HoldDirection,
    held_secs: f64,
    /// Direction pressed most recently, wins when both are down
    latest: HoldDirection,
    previous: Buttons,
}

impl HoldTracker {
    pub fn new() -> Self {
        Self {
            direction: HoldDirection::None,
            held_secs: f64::NAN,
            latest: HoldDirection::None,
            previous: Buttons::default(),
        }
    }

    pub fn direction(&self) -> HoldDirection {
        self.direction
    }

    /// Seconds the current direction has been held (NaN when none)
    pub fn held_secs(&self) -> f64 {
        self.held_secs
    }

    /// Advance by one frame of `delta_secs` with `buttons` down
    pub fn update(&mut self, delta_secs: f64, buttons: Buttons) -> FrameInput {
        let hold = self.advance_hold(delta_secs, &buttons);

        let mut commands = ArrayVec::new();
        let previous = self.previous;
        let edges = [
            (buttons.soft_drop && !previous.soft_drop, Command::SoftDropOn),
            (!buttons.soft_drop && previous.soft_drop, Command::SoftDropOff),
            (buttons.rotate_left && !previous.rotate_left, Command::RotateLeft),
            (buttons.rotate_right && !previous.rotate_right, Command::RotateRight),
            (buttons.rotate_180 && !previous.rotate_180, Command::Rotate180),
            (buttons.hard_drop && !previous.hard_drop, Command::HardDrop),
            (buttons.hold && !previous.hold, Command::Hold),
        ];
        for (fired, command) in edges {
            if fired {
                commands.push(command);
            }
        }

        self.previous = buttons;
        FrameInput { hold, commands }
    }

    fn advance_hold(&mut self, delta_secs: f64, buttons: &Buttons) -> HoldInput {
        if buttons.left && !self.previous.left {
            self.latest = HoldDirection::Left;
        }
        if buttons.right && !self.previous.right {
            self.latest = HoldDirection::Right;
        }
        let direction = match (buttons.left, buttons.right) {
            (true, true) => self.latest,
            (true, false) => HoldDirection::Left,
            (false, true) => HoldDirection::Right,
            (false, false) => HoldDirection::None,
        };

        if direction == HoldDirection::None {
            self.direction = direction;
            self.held_secs = f64::NAN;
            return HoldInput::IDLE;
        }
        if direction != self.direction {
            self.direction = direction;
            self.held_secs = 0.0;
            return HoldInput::pressed(direction);
        }
        let prev = self.held_secs;
        self.held_secs += delta_secs;
        HoldInput::new(direction, self.held_secs, prev)
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for HoldTracker {
    fn default() -> Self {
        Self::new()
    }
}
