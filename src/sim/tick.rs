//! Per-frame simulation step
//!
//! One call advances the world by exactly one frame. Stages run in a fixed
//! order: player movement and fire, formation, projectiles, hits, outcome.

use super::collision::resolve_hits;
use super::formation::{enemy_fire, update_formation};
use super::projectile::{player_fire, update_arrows};
use super::rng::RandomSource;
use super::state::GameState;
use crate::input::InputState;
use crate::tuning::MOVE_AXIS;

/// Result of a single frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    /// No active enemies remain
    LevelCleared,
    /// The player is down
    GameOver,
}

/// Advance the game state by one frame
///
/// A frame that both clears the grid and loses the player reports
/// [`FrameOutcome::LevelCleared`].
pub fn advance<R: RandomSource + ?Sized>(
    state: &mut GameState,
    input: &InputState,
    rng: &mut R,
) -> FrameOutcome {
    if !state.player.body.active {
        return FrameOutcome::GameOver;
    }

    move_player(state, input);
    player_fire(state, input.fire, rng);

    update_formation(state);
    enemy_fire(state, rng);

    update_arrows(state);
    resolve_hits(state);
    state.compact();

    state.frame += 1;

    if state.active_enemy_count() == 0 {
        FrameOutcome::LevelCleared
    } else if !state.player.body.active {
        FrameOutcome::GameOver
    } else {
        FrameOutcome::Continue
    }
}

/// Slide the archer along the move axis, kept fully inside the field
fn move_player(state: &mut GameState, input: &InputState) {
    let field = state.tuning.playfield;
    let player = &mut state.player;

    let mut dir = 0.0;
    if input.left {
        dir -= 1.0;
    }
    if input.right {
        dir += 1.0;
    }
    if dir == 0.0 {
        return;
    }

    let half = player.body.half_extents()[MOVE_AXIS];
    let x = player.body.pos[MOVE_AXIS] + dir * player.speed;
    player.body.pos[MOVE_AXIS] = x.clamp(field.move_min + half, field.move_max - half);
}
