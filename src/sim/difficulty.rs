//! Level scaling
//!
//! Pure functions of the level number. Levels start at 1.

/// Formation speed grows 20% per level
pub const SPEED_GROWTH_PER_LEVEL: f32 = 0.2;

/// Score for destroying an enemy of rank `kind` on `level`
#[inline]
pub fn enemy_points(kind: u32, level: u32) -> u32 {
    (kind + 1) * 10 * level
}

/// Level component of the formation speed
#[inline]
pub fn speed_multiplier(level: u32) -> f32 {
    1.0 + level.saturating_sub(1) as f32 * SPEED_GROWTH_PER_LEVEL
}

/// Share of the formation still standing; 1.0 for an empty grid
#[inline]
pub fn remaining_ratio(active: usize, total: usize) -> f32 {
    if total == 0 {
        return 1.0;
    }
    active as f32 / total as f32
}

/// Share of the formation destroyed, for the progress bar; 0.0 for an empty grid
#[inline]
pub fn progress_ratio(defeated: usize, total: usize) -> f32 {
    if total == 0 {
        return 0.0;
    }
    (defeated as f32 / total as f32).min(1.0)
}

/// Formation speed in units per frame
///
/// Thinner formations move faster: a lone straggler runs at twice the speed
/// of a full grid.
pub fn formation_speed(base: f32, level: u32, active: usize, total: usize) -> f32 {
    base * speed_multiplier(level) * (2.0 - remaining_ratio(active, total))
}

/// Per-frame shot probability for one enemy
pub fn shoot_chance(base: f32, kind: u32, level: u32) -> f32 {
    base * level as f32 * (1.0 + kind as f32 / 3.0)
}
