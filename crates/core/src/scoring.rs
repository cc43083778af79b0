//! Scoring module - line clears, spins, combos and back-to-back
//!
//! - Spin clears use the spin tables instead of the line-clear table.
//! - B2B applies a 3/2 multiplier to the base clear points (before combo bonus).
//! - Combo bonus is `COMBO_BASE * combo_index` with no level multiplier.

use crate::types::{
    SpinKind, B2B_DENOMINATOR, B2B_NUMERATOR, COMBO_BASE, LINES_PER_LEVEL, LINE_SCORES,
};

const FULL_SPIN_SCORES: [u32; 4] = [400, 800, 1200, 1600];
const MINI_SPIN_SCORES: [u32; 3] = [100, 200, 400];

/// Score breakdown for one lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// Base points (B2B applied, combo excluded)
    pub line_clear_score: u32,
    pub combo_bonus: u32,
    pub total: u32,
    pub qualifies_for_b2b: bool,
    pub b2b_applied: bool,
}

/// Plain line clear points at `level`
///
/// Clears beyond four lines (pentominoes can clear five) score as four.
pub fn line_score(lines: u32, level: u32) -> u32 {
    if lines == 0 {
        return 0;
    }
    let index = (lines as usize).min(LINE_SCORES.len() - 1);
    LINE_SCORES[index].saturating_mul(level + 1)
}

/// Spin points at `level`, including spins that clear nothing
pub fn spin_score(spin: SpinKind, lines: u32, level: u32) -> u32 {
    let table: &[u32] = match spin {
        SpinKind::Full => &FULL_SPIN_SCORES,
        SpinKind::Mini => &MINI_SPIN_SCORES,
        SpinKind::None => return 0,
    };
    let index = (lines as usize).min(table.len() - 1);
    table[index].saturating_mul(level + 1)
}

/// Combo bonus; `-1` means no chain and `0` is the first clear of a chain
pub fn combo_bonus(combo_index: i32) -> u32 {
    if combo_index <= 0 {
        return 0;
    }
    COMBO_BASE.saturating_mul(combo_index as u32)
}

/// Full spins with lines and clears of four or more lines chain B2B
pub fn qualifies_for_b2b(spin: SpinKind, lines: u32) -> bool {
    lines > 0 && (spin == SpinKind::Full || lines >= 4)
}

pub fn apply_b2b_multiplier(points: u32) -> u32 {
    points.saturating_mul(B2B_NUMERATOR) / B2B_DENOMINATOR
}

/// Score a lock
pub fn calculate_score(
    lines: u32,
    level: u32,
    spin: SpinKind,
    combo_index: i32,
    previous_b2b: bool,
) -> ScoreResult {
    let qualifies = qualifies_for_b2b(spin, lines);
    let base = if spin.is_spin() {
        spin_score(spin, lines, level)
    } else {
        line_score(lines, level)
    };

    let b2b_applied = qualifies && previous_b2b;
    let line_clear_score = if b2b_applied {
        apply_b2b_multiplier(base)
    } else {
        base
    };
    let combo_bonus = combo_bonus(combo_index);

    ScoreResult {
        line_clear_score,
        combo_bonus,
        total: line_clear_score.saturating_add(combo_bonus),
        qualifies_for_b2b: qualifies,
        b2b_applied,
    }
}

/// Soft drop: 1 per cell, hard drop: 2 per cell
pub fn drop_score(cells: u32, hard_drop: bool) -> u32 {
    if hard_drop {
        cells.saturating_mul(2)
    } else {
        cells
    }
}

pub fn level_for_lines(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL
}
