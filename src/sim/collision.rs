//! Axis-aligned bounding volume overlap
//!
//! Entity counts are tiny (15 enemies, a handful of arrows), so every frame
//! does a plain pairwise sweep without spatial indexing.

use super::entity::Body;
use super::state::{GameEvent, GameState};
use crate::tuning::Dimensions;

/// Hits applied during one resolution pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HitSummary {
    pub enemies_destroyed: u32,
    pub points: u32,
    pub player_hits: u32,
}

/// True iff the boxes intersect on every axis of `dims`
///
/// Touching faces do not count: the center distance must be strictly less
/// than the sum of half-extents.
#[inline]
pub fn overlaps(a: &Body, b: &Body, dims: Dimensions) -> bool {
    let delta = (a.pos - b.pos).abs();
    let reach = a.half_extents() + b.half_extents();
    (0..dims.axis_count()).all(|axis| delta[axis] < reach[axis])
}

/// Apply arrow hits for this frame
///
/// Each player arrow destroys at most the first overlapping enemy in slot
/// order and is spent on that hit. Each enemy arrow touching the player costs
/// one life.
pub fn resolve_hits(state: &mut GameState) -> HitSummary {
    let dims = state.tuning.playfield.dims;
    let mut summary = HitSummary::default();
    let mut events = Vec::new();

    for arrow in state.arrows.values_mut() {
        if !arrow.body.active {
            continue;
        }

        if arrow.is_player_arrow() {
            let target = state
                .enemies
                .iter_mut()
                .find(|(_, enemy)| enemy.body.active && overlaps(&arrow.body, &enemy.body, dims));
            if let Some((id, enemy)) = target {
                arrow.body.active = false;
                enemy.body.active = false;
                state.enemies_defeated += 1;
                summary.enemies_destroyed += 1;
                summary.points += enemy.points;
                events.push(GameEvent::EnemyDefeated {
                    enemy: id,
                    points: enemy.points,
                });
            }
        } else if state.player.body.active && overlaps(&arrow.body, &state.player.body, dims) {
            arrow.body.active = false;
            state.player.take_hit();
            summary.player_hits += 1;
            events.push(GameEvent::PlayerHit {
                lives_left: state.player.lives,
            });
        }
    }

    for event in events {
        state.emit(event);
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Arrow;
    use crate::tuning::{ARROW_PALETTE, Tuning};
    use glam::Vec3;
    use proptest::prelude::*;

    fn body(x: f32, y: f32, z: f32, w: f32, h: f32, d: f32) -> Body {
        Body::new(Vec3::new(x, y, z), Vec3::new(w, h, d))
    }

    #[test]
    fn test_planar_overlap() {
        let arrow = body(100.0, 100.0, 0.0, 5.0, 20.0, 0.0);
        let enemy = body(102.0, 110.0, 0.0, 40.0, 40.0, 0.0);
        assert!(overlaps(&arrow, &enemy, Dimensions::Planar));

        let far = body(200.0, 100.0, 0.0, 40.0, 40.0, 0.0);
        assert!(!overlaps(&arrow, &far, Dimensions::Planar));
    }

    #[test]
    fn test_planar_ignores_depth() {
        // Zero depth would never overlap if z were checked
        let a = body(0.0, 0.0, 0.0, 10.0, 10.0, 0.0);
        let b = body(1.0, 1.0, 0.0, 10.0, 10.0, 0.0);
        assert!(overlaps(&a, &b, Dimensions::Planar));
        assert!(!overlaps(&a, &b, Dimensions::Volumetric));
    }

    #[test]
    fn test_volumetric_needs_all_three_axes() {
        let a = body(0.0, 0.4, 0.0, 0.8, 0.8, 0.8);
        let same_lane = body(0.2, 0.4, 0.3, 0.1, 0.4, 0.1);
        let other_depth = body(0.2, 0.4, 3.0, 0.1, 0.4, 0.1);
        assert!(overlaps(&a, &same_lane, Dimensions::Volumetric));
        assert!(!overlaps(&a, &other_depth, Dimensions::Volumetric));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = body(0.0, 0.0, 0.0, 10.0, 10.0, 0.0);
        let b = body(10.0, 0.0, 0.0, 10.0, 10.0, 0.0);
        assert!(!overlaps(&a, &b, Dimensions::Planar));
    }

    fn planar_state() -> GameState {
        GameState::new(Tuning::planar_sized(800.0, 600.0))
    }

    #[test]
    fn test_player_arrow_destroys_one_enemy() {
        let mut state = planar_state();
        let (first_id, first) = state
            .enemies
            .iter()
            .next()
            .map(|(id, e)| (id, e.body))
            .unwrap();
        // Wide arrow spanning two neighbours: only the first in slot order dies
        let wide = Vec3::new(200.0, 20.0, 0.0);
        let pos = Vec3::new(first.pos.x + 40.0, first.pos.y, 0.0);
        state.arrows.insert(Arrow::player(pos, wide, ARROW_PALETTE[0]));

        let summary = resolve_hits(&mut state);
        assert_eq!(summary.enemies_destroyed, 1);
        assert_eq!(summary.points, 30);
        assert_eq!(state.enemies_defeated, 1);
        assert_eq!(state.active_enemy_count(), 14);
        assert!(!state.enemies.get(first_id).unwrap().body.active);
        assert_eq!(state.active_arrow_count(), 0);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::EnemyDefeated {
                enemy: first_id,
                points: 30
            }]
        );
    }

    #[test]
    fn test_enemy_arrow_ignores_enemies() {
        let mut state = planar_state();
        let pos = state.enemies.values().next().unwrap().body.pos;
        state.arrows.insert(Arrow::enemy(pos, state.tuning.arrow_size));
        let summary = resolve_hits(&mut state);
        assert_eq!(summary, HitSummary::default());
        assert_eq!(state.active_enemy_count(), 15);
        assert_eq!(state.active_arrow_count(), 1);
    }

    #[test]
    fn test_enemy_arrow_costs_a_life() {
        let mut state = planar_state();
        let pos = state.player.body.pos;
        let size = state.tuning.arrow_size;
        state.arrows.insert(Arrow::enemy(pos, size));
        let summary = resolve_hits(&mut state);
        assert_eq!(summary.player_hits, 1);
        assert_eq!(state.player.lives, 2);
        assert!(state.player.body.active);
        assert_eq!(state.active_arrow_count(), 0);
    }

    #[test]
    fn test_last_life_deactivates_player_same_frame() {
        let mut state = planar_state();
        state.player.lives = 1;
        let pos = state.player.body.pos;
        let size = state.tuning.arrow_size;
        state.arrows.insert(Arrow::enemy(pos, size));
        state.arrows.insert(Arrow::enemy(pos, size));

        let summary = resolve_hits(&mut state);
        // Second arrow finds the player already down
        assert_eq!(summary.player_hits, 1);
        assert_eq!(state.player.lives, 0);
        assert!(!state.player.body.active);
        assert_eq!(state.active_arrow_count(), 1);
    }

    #[test]
    fn test_player_arrow_passes_player() {
        let mut state = planar_state();
        let pos = state.player.body.pos;
        state
            .arrows
            .insert(Arrow::player(pos, state.tuning.arrow_size, ARROW_PALETTE[1]));
        resolve_hits(&mut state);
        assert_eq!(state.player.lives, 3);
        assert_eq!(state.active_arrow_count(), 1);
    }

    fn arb_body() -> impl Strategy<Value = Body> {
        (
            -50.0f32..50.0,
            -50.0f32..50.0,
            -50.0f32..50.0,
            0.0f32..30.0,
            0.0f32..30.0,
            0.0f32..30.0,
        )
            .prop_map(|(x, y, z, w, h, d)| body(x, y, z, w, h, d))
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(a in arb_body(), b in arb_body()) {
            for dims in [Dimensions::Planar, Dimensions::Volumetric] {
                prop_assert_eq!(overlaps(&a, &b, dims), overlaps(&b, &a, dims));
            }
        }

        #[test]
        fn prop_volumetric_implies_planar(a in arb_body(), b in arb_body()) {
            if overlaps(&a, &b, Dimensions::Volumetric) {
                prop_assert!(overlaps(&a, &b, Dimensions::Planar));
            }
        }

        #[test]
        fn prop_lives_never_negative(hits in 0usize..10) {
            let mut state = planar_state();
            let pos = state.player.body.pos;
            let size = state.tuning.arrow_size;
            for _ in 0..hits {
                state.arrows.insert(Arrow::enemy(pos, size));
                resolve_hits(&mut state);
                state.compact();
            }
            prop_assert!(state.player.lives <= 3);
            prop_assert_eq!(state.player.lives as usize, 3usize.saturating_sub(hits));
            prop_assert_eq!(state.player.body.active, state.player.lives > 0);
        }
    }
}
