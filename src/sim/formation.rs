//! Formation movement and enemy fire

use super::difficulty;
use super::entity::Arrow;
use super::rng::RandomSource;
use super::state::{GameEvent, GameState};
use crate::tuning::MOVE_AXIS;

/// What the formation did this frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FormationStep {
    /// Direction flipped and the grid stepped toward the player
    pub stepped: bool,
    /// Move-axis displacement applied to every active enemy
    pub speed: f32,
    /// An enemy reached the player's row
    pub overrun: bool,
}

/// Move every active enemy as one rigid body
///
/// The edge test looks only at the leading edge for the current direction, so
/// a formation already heading away from a wall never steps twice.
pub fn update_formation(state: &mut GameState) -> FormationStep {
    let field = state.tuning.playfield;
    let advance = field.advance_axis();

    let (mut min_edge, mut max_edge) = (f32::INFINITY, f32::NEG_INFINITY);
    let mut active = 0usize;
    for enemy in state.enemies.values().filter(|e| e.body.active) {
        min_edge = min_edge.min(enemy.body.min_edge(MOVE_AXIS));
        max_edge = max_edge.max(enemy.body.max_edge(MOVE_AXIS));
        active += 1;
    }
    if active == 0 {
        return FormationStep::default();
    }

    let mut stepped = false;
    if state.direction > 0.0 && max_edge >= field.move_max {
        state.direction = -1.0;
        stepped = true;
    } else if state.direction < 0.0 && min_edge <= field.move_min {
        state.direction = 1.0;
        stepped = true;
    }

    let speed = difficulty::formation_speed(
        state.tuning.enemy_base_speed,
        state.level,
        active,
        state.total_enemies,
    );
    let dx = state.direction * speed;
    let step = if stepped { state.tuning.enemy_step } else { 0.0 };

    let overrun_line = state.player.body.min_edge(advance) + state.tuning.overrun_depth;
    let mut overrun = false;
    for enemy in state.enemies.values_mut().filter(|e| e.body.active) {
        enemy.body.pos[MOVE_AXIS] += dx;
        enemy.body.pos[advance] += step;
        if enemy.body.max_edge(advance) >= overrun_line {
            overrun = true;
        }
    }

    if overrun && state.player.body.active {
        log::debug!("Formation reached the player's row");
        state.player.body.active = false;
        state.emit(GameEvent::Overrun);
    }

    if stepped {
        log::debug!("Formation flipped to {}", state.direction);
    }

    FormationStep {
        stepped,
        speed,
        overrun,
    }
}

/// Roll each active enemy's shot independently
///
/// Returns the number of arrows spawned. Arrows leave from the enemy's
/// forward edge.
pub fn enemy_fire<R: RandomSource + ?Sized>(state: &mut GameState, rng: &mut R) -> usize {
    let advance = state.tuning.playfield.advance_axis();
    let base = state.tuning.enemy_base_shoot_chance;
    let arrow_size = state.tuning.arrow_size;

    let mut shooters = Vec::new();
    for (id, enemy) in state.enemies.iter().filter(|(_, e)| e.body.active) {
        let chance = difficulty::shoot_chance(base, enemy.kind, state.level);
        if rng.next_unit() < chance {
            let mut pos = enemy.body.pos;
            pos[advance] = enemy.body.max_edge(advance);
            shooters.push((id, pos));
        }
    }

    for &(id, pos) in &shooters {
        state.arrows.insert(Arrow::enemy(pos, arrow_size));
        state.emit(GameEvent::EnemyFired { enemy: id });
    }
    shooters.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::ScriptedRng;
    use crate::tuning::Tuning;

    fn planar() -> GameState {
        GameState::new(Tuning::planar_sized(800.0, 600.0))
    }

    fn advance_positions(state: &GameState) -> Vec<f32> {
        state.enemies.values().map(|e| e.body.pos.y).collect()
    }

    #[test]
    fn test_moves_right_at_base_speed() {
        let mut state = planar();
        let before: Vec<f32> = state.enemies.values().map(|e| e.body.pos.x).collect();
        let step = update_formation(&mut state);
        assert!(!step.stepped);
        assert!((step.speed - 0.5).abs() < 1e-6);
        for (enemy, x) in state.enemies.values().zip(before) {
            assert!((enemy.body.pos.x - (x + 0.5)).abs() < 1e-4);
        }
    }

    #[test]
    fn test_right_edge_flips_and_steps_once() {
        let mut state = planar();
        // Push the whole grid against the right wall
        let shift = 800.0 - 580.0;
        for enemy in state.enemies.values_mut() {
            enemy.body.pos.x += shift;
        }
        let before = advance_positions(&state);

        let step = update_formation(&mut state);
        assert!(step.stepped);
        assert_eq!(state.direction, -1.0);
        for (y, old) in advance_positions(&state).into_iter().zip(before) {
            assert!((y - (old + 20.0)).abs() < 1e-4, "exactly one step per flip");
        }

        // Still touching the wall but now moving away: no second step
        let before = advance_positions(&state);
        let step = update_formation(&mut state);
        assert!(!step.stepped);
        assert_eq!(advance_positions(&state), before);
    }

    #[test]
    fn test_left_edge_flips_back() {
        let mut state = planar();
        state.direction = -1.0;
        for enemy in state.enemies.values_mut() {
            enemy.body.pos.x -= 220.0;
        }
        let step = update_formation(&mut state);
        assert!(step.stepped);
        assert_eq!(state.direction, 1.0);
    }

    #[test]
    fn test_inactive_enemies_are_ignored() {
        let mut state = planar();
        // Only the leftmost column survives; the grid's right edge no longer counts
        let mut kept = Vec::new();
        for (id, enemy) in state.enemies.iter_mut() {
            if id.index % 5 != 0 {
                enemy.body.active = false;
            } else {
                kept.push(id);
            }
        }
        let frozen: Vec<f32> = state
            .enemies
            .values()
            .filter(|e| !e.body.active)
            .map(|e| e.body.pos.x)
            .collect();
        let step = update_formation(&mut state);
        assert!(!step.stepped);
        // 3 of 15 left: 0.5 * (2 - 0.2)
        assert!((step.speed - 0.9).abs() < 1e-5);
        let after: Vec<f32> = state
            .enemies
            .values()
            .filter(|e| !e.body.active)
            .map(|e| e.body.pos.x)
            .collect();
        assert_eq!(frozen, after);
    }

    #[test]
    fn test_overrun_deactivates_player_regardless_of_lives() {
        let mut state = planar();
        let player_top = state.player.body.min_edge(1);
        for enemy in state.enemies.values_mut().take(1) {
            enemy.body.pos.y = player_top - 20.0;
        }
        let step = update_formation(&mut state);
        assert!(step.overrun);
        assert!(!state.player.body.active);
        assert_eq!(state.player.lives, 3);
        assert!(state.drain_events().contains(&GameEvent::Overrun));
    }

    #[test]
    fn test_volumetric_overrun_at_player_center() {
        let mut state = GameState::new(Tuning::volumetric());
        let center = state.player.body.pos.z;
        // Front edge past the archer's front face but short of its center
        for enemy in state.enemies.values_mut().take(1) {
            enemy.body.pos.z = center - 0.4 - 0.4;
        }
        assert!(!update_formation(&mut state).overrun);
        assert!(state.player.body.active);

        for enemy in state.enemies.values_mut().take(1) {
            enemy.body.pos.z = center - 0.2;
        }
        assert!(update_formation(&mut state).overrun);
        assert!(!state.player.body.active);
    }

    #[test]
    fn test_volumetric_steps_along_depth() {
        let mut state = GameState::new(Tuning::volumetric());
        for enemy in state.enemies.values_mut() {
            enemy.body.pos.x += 10.0;
        }
        let before: Vec<f32> = state.enemies.values().map(|e| e.body.pos.z).collect();
        let step = update_formation(&mut state);
        assert!(step.stepped);
        for (enemy, z) in state.enemies.values().zip(before) {
            assert!((enemy.body.pos.z - (z + 0.4)).abs() < 1e-5);
        }
    }

    #[test]
    fn test_enemy_fire_respects_chance() {
        let mut state = planar();
        let mut never = ScriptedRng::quiet();
        assert_eq!(enemy_fire(&mut state, &mut never), 0);

        let mut always = ScriptedRng::new(vec![0.0]);
        assert_eq!(enemy_fire(&mut state, &mut always), 15);
        assert_eq!(state.active_arrow_count(), 15);
        assert!(state.arrows.values().all(|a| !a.is_player_arrow()));
    }

    #[test]
    fn test_stronger_enemies_fire_more_often() {
        let mut state = planar();
        // 0.0025 sits between type 0 (0.002) and type 1 (0.00267)
        let mut rng = ScriptedRng::new(vec![0.0025]);
        let fired = enemy_fire(&mut state, &mut rng);
        // Rows of type 2 and type 1 fire, type 0 does not
        assert_eq!(fired, 10);
    }

    #[test]
    fn test_enemy_arrow_spawns_at_forward_edge() {
        let mut state = planar();
        for (i, enemy) in state.enemies.values_mut().enumerate() {
            enemy.body.active = i == 0;
        }
        let mut rng = ScriptedRng::new(vec![0.0]);
        enemy_fire(&mut state, &mut rng);
        let enemy = state.enemies.values().next().map(|e| e.body).unwrap();
        let arrow = state.arrows.values().next().unwrap();
        assert_eq!(arrow.body.pos.x, enemy.pos.x);
        assert_eq!(arrow.body.pos.y, enemy.max_edge(1));
    }
}
