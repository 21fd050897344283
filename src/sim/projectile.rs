//! Arrow spawning, travel and expiry

use super::entity::Arrow;
use super::rng::RandomSource;
use super::state::{GameEvent, GameState};
use crate::tuning::ARROW_PALETTE;

/// True when the fire cooldown has elapsed
pub fn can_fire(state: &GameState) -> bool {
    match state.last_shot_frame {
        None => true,
        Some(last) => state.frame.saturating_sub(last) >= state.tuning.fire_cooldown_frames,
    }
}

/// Loose a player arrow if `fire` is held and the cooldown allows it
///
/// The arrow leaves from the archer's forward edge with a random palette
/// color. Returns true if an arrow was spawned.
pub fn player_fire<R: RandomSource + ?Sized>(
    state: &mut GameState,
    fire: bool,
    rng: &mut R,
) -> bool {
    if !fire || !state.player.body.active || !can_fire(state) {
        return false;
    }

    let advance = state.tuning.playfield.advance_axis();
    let mut pos = state.player.body.pos;
    pos[advance] = state.player.body.min_edge(advance);
    let color = ARROW_PALETTE[rng.next_index(ARROW_PALETTE.len())];

    state
        .arrows
        .insert(Arrow::player(pos, state.tuning.arrow_size, color));
    state.last_shot_frame = Some(state.frame);
    state.emit(GameEvent::PlayerFired);
    true
}

/// Move every active arrow and expire those that left the field
///
/// Player arrows fly toward the enemy side; enemy arrows fly toward the
/// player at a fraction of that speed. An arrow expires once it is entirely
/// past the boundary opposite its origin.
pub fn update_arrows(state: &mut GameState) {
    let field = state.tuning.playfield;
    let advance = field.advance_axis();
    let player_speed = state.tuning.arrow_speed;
    let enemy_speed = player_speed * state.tuning.enemy_arrow_factor;

    for arrow in state.arrows.values_mut().filter(|a| a.body.active) {
        if arrow.is_player_arrow() {
            arrow.body.pos[advance] -= player_speed;
            if arrow.body.max_edge(advance) < field.advance_min {
                arrow.body.active = false;
            }
        } else {
            arrow.body.pos[advance] += enemy_speed;
            if arrow.body.min_edge(advance) > field.advance_max {
                arrow.body.active = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::ScriptedRng;
    use crate::tuning::Tuning;
    use glam::Vec3;

    fn planar() -> GameState {
        GameState::new(Tuning::planar_sized(800.0, 600.0))
    }

    #[test]
    fn test_fire_spawns_at_forward_edge() {
        let mut state = planar();
        let mut rng = ScriptedRng::new(vec![0.5]);
        assert!(player_fire(&mut state, true, &mut rng));

        let arrow = state.arrows.values().next().unwrap();
        assert!(arrow.is_player_arrow());
        assert_eq!(arrow.body.pos.x, state.player.body.pos.x);
        assert_eq!(arrow.body.pos.y, state.player.body.min_edge(1));
        // 0.5 * 6 -> palette index 3
        assert_eq!(arrow.color, Some(ARROW_PALETTE[3]));
        assert_eq!(state.drain_events(), vec![GameEvent::PlayerFired]);
    }

    #[test]
    fn test_cooldown() {
        let mut state = planar();
        let mut rng = ScriptedRng::quiet();
        assert!(player_fire(&mut state, true, &mut rng));
        for frame in 1..15 {
            state.frame = frame;
            assert!(!player_fire(&mut state, true, &mut rng), "frame {frame}");
        }
        state.frame = 15;
        assert!(player_fire(&mut state, true, &mut rng));
    }

    #[test]
    fn test_no_fire_without_input_or_when_dead() {
        let mut state = planar();
        let mut rng = ScriptedRng::quiet();
        assert!(!player_fire(&mut state, false, &mut rng));
        state.player.body.active = false;
        assert!(!player_fire(&mut state, true, &mut rng));
        assert_eq!(state.active_arrow_count(), 0);
    }

    #[test]
    fn test_player_arrow_expires_after_crossing_field() {
        let mut state = planar();
        let size = state.tuning.arrow_size;
        state
            .arrows
            .insert(Arrow::player(Vec3::new(10.0, 600.0, 0.0), size, ARROW_PALETTE[0]));

        let mut frames = 0;
        while state.active_arrow_count() > 0 {
            update_arrows(&mut state);
            frames += 1;
            assert!(frames <= 100, "arrow never expired");
        }
        // Trailing edge starts 610 units from the top
        assert_eq!(frames, 88);
        assert!(frames as f32 >= (600.0f32 / 7.0).ceil());
    }

    #[test]
    fn test_enemy_arrow_is_slower_and_expires_at_far_side() {
        let mut state = planar();
        let size = state.tuning.arrow_size;
        state.arrows.insert(Arrow::enemy(Vec3::new(10.0, 0.0, 0.0), size));
        update_arrows(&mut state);
        let arrow = state.arrows.values().next().unwrap();
        assert!((arrow.body.pos.y - 2.8).abs() < 1e-5);

        let mut frames = 1;
        while state.active_arrow_count() > 0 {
            update_arrows(&mut state);
            frames += 1;
            assert!(frames < 1000);
        }
        assert!(frames > 200);
    }

    #[test]
    fn test_volumetric_arrows_travel_along_depth() {
        let mut state = GameState::new(Tuning::volumetric());
        let mut rng = ScriptedRng::quiet();
        player_fire(&mut state, true, &mut rng);
        let start = state.arrows.values().next().unwrap().body.pos;
        update_arrows(&mut state);
        let now = state.arrows.values().next().unwrap().body.pos;
        assert!((start.z - now.z - 0.15).abs() < 1e-5);
        assert_eq!(start.x, now.x);
        assert_eq!(start.y, now.y);
    }
}
