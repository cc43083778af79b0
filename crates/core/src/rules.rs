//! Rules - validated session configuration
//!
//! Every field has a documented domain. [`Rules::validate`] checks all of them
//! and [`GameState::new`](crate::game_state::GameState::new) refuses to start
//! with invalid rules.

use crate::generators::GeneratorKind;
use crate::types::{
    ConfigError, TopOutMask, DEFAULT_ARR_SECS, DEFAULT_BOARD_WIDTH, DEFAULT_DAS_SECS,
    DEFAULT_GRAVITY, DEFAULT_HIDDEN_HEIGHT, DEFAULT_LOCK_DELAY_SECS, DEFAULT_SOFT_DROP_FACTOR,
    DEFAULT_VISIBLE_HEIGHT, MAX_GRAVITY, MIN_SOFT_DROP_BASE_GRAVITY,
};

/// Gravity multiplier while soft dropping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoftDropFactor {
    Multiplier(u32),
    /// Soft drop at maximum gravity
    Infinite,
}

impl SoftDropFactor {
    /// Effective gravity while soft dropping from `base` gravity
    ///
    /// A zero base is raised to 0.1G so the multiplier still applies; the
    /// result is capped at the maximum gravity.
    ///
    /// ```
    /// use blockfall_core::SoftDropFactor;
    ///
    /// assert_eq!(SoftDropFactor::Multiplier(40).apply(0.0), 4.0);
    /// assert_eq!(SoftDropFactor::Multiplier(40).apply(1.0), 20.0);
    /// assert_eq!(SoftDropFactor::Infinite.apply(0.0), 20.0);
    /// ```
    pub fn apply(self, base: f64) -> f64 {
        match self {
            SoftDropFactor::Infinite => MAX_GRAVITY,
            SoftDropFactor::Multiplier(factor) => {
                let base = if base == 0.0 {
                    MIN_SOFT_DROP_BASE_GRAVITY
                } else {
                    base
                };
                (f64::from(factor) * base).min(MAX_GRAVITY)
            }
        }
    }
}

impl Default for SoftDropFactor {
    fn default() -> Self {
        SoftDropFactor::Multiplier(DEFAULT_SOFT_DROP_FACTOR)
    }
}

/// Session configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Rules {
    /// Delay before auto-repeat starts (>= 0)
    pub das_secs: f64,
    /// Interval between auto-repeat steps (> 0)
    pub arr_secs: f64,
    pub soft_drop_factor: SoftDropFactor,
    /// Columns (>= 1)
    pub board_width: usize,
    /// Visible rows (>= 1)
    pub visible_height: usize,
    /// Spawn buffer rows above the visible field
    pub hidden_height: usize,
    /// Starting gravity in G (0..=20)
    pub beginning_gravity: f64,
    /// Grace period on the floor before auto-lock (>= 0)
    pub lock_delay_secs: f64,
    /// RNG seed; drawn from entropy (and recorded) when absent
    pub seed: Option<u64>,
    /// Top-out kinds that end the game
    pub top_out_considered: TopOutMask,
    pub generator: GeneratorKind,
    /// Lines to clear before the session ends with `GoalReached`
    pub line_goal: Option<u32>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            das_secs: DEFAULT_DAS_SECS,
            arr_secs: DEFAULT_ARR_SECS,
            soft_drop_factor: SoftDropFactor::default(),
            board_width: DEFAULT_BOARD_WIDTH,
            visible_height: DEFAULT_VISIBLE_HEIGHT,
            hidden_height: DEFAULT_HIDDEN_HEIGHT,
            beginning_gravity: DEFAULT_GRAVITY,
            lock_delay_secs: DEFAULT_LOCK_DELAY_SECS,
            seed: None,
            top_out_considered: TopOutMask::GUIDELINE,
            generator: GeneratorKind::default(),
            line_goal: None,
        }
    }
}

/// Gravity must be a number in `0..=MAX_GRAVITY`
pub fn validate_gravity(value: f64) -> Result<(), ConfigError> {
    if (0.0..=MAX_GRAVITY).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Gravity {
            value,
            max: MAX_GRAVITY,
        })
    }
}

impl Rules {
    /// Default rules with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Check every field against its domain
    pub fn validate(&self) -> Result<(), ConfigError> {
        // negated comparisons also reject NaN
        if !(self.das_secs >= 0.0) {
            return Err(ConfigError::NegativeDas(self.das_secs));
        }
        if !(self.arr_secs > 0.0) {
            return Err(ConfigError::NonPositiveArr(self.arr_secs));
        }
        if let SoftDropFactor::Multiplier(factor) = self.soft_drop_factor {
            if factor < 1 {
                return Err(ConfigError::SoftDropFactor(factor));
            }
        }
        if self.board_width < 1 {
            return Err(ConfigError::BoardWidth(self.board_width));
        }
        if self.visible_height < 1 {
            return Err(ConfigError::BoardHeight(self.visible_height));
        }
        validate_gravity(self.beginning_gravity)?;
        if !(self.lock_delay_secs >= 0.0) {
            return Err(ConfigError::NegativeLockDelay(self.lock_delay_secs));
        }
        TopOutMask::from_bits(self.top_out_considered.bits())?;
        self.generator.validate()?;
        if self.line_goal == Some(0) {
            return Err(ConfigError::ZeroLineGoal);
        }
        Ok(())
    }
}
