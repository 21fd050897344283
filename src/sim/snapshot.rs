//! Read-only per-frame views for renderers

use glam::Vec3;
use serde::Serialize;

use super::state::GameState;
use crate::tuning::Playfield;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerView {
    pub pos: Vec3,
    pub size: Vec3,
    pub active: bool,
    pub lives: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnemyView {
    pub pos: Vec3,
    pub size: Vec3,
    pub kind: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArrowView {
    pub pos: Vec3,
    pub size: Vec3,
    pub from_player: bool,
    pub color: Option<u32>,
}

/// Everything a frontend needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub playfield: Playfield,
    pub level: u32,
    /// Destroyed share of this level's grid, 0..=1
    pub progress: f32,
    pub player: PlayerView,
    /// Active enemies only
    pub enemies: Vec<EnemyView>,
    /// Active arrows only
    pub arrows: Vec<ArrowView>,
}

impl FrameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let player = &state.player;
        Self {
            playfield: state.tuning.playfield,
            level: state.level,
            progress: state.progress(),
            player: PlayerView {
                pos: player.body.pos,
                size: player.body.size,
                active: player.body.active,
                lives: player.lives,
            },
            enemies: state
                .enemies
                .values()
                .filter(|e| e.body.active)
                .map(|e| EnemyView {
                    pos: e.body.pos,
                    size: e.body.size,
                    kind: e.kind,
                })
                .collect(),
            arrows: state
                .arrows
                .values()
                .filter(|a| a.body.active)
                .map(|a| ArrowView {
                    pos: a.body.pos,
                    size: a.body.size,
                    from_player: a.is_player_arrow(),
                    color: a.color,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Arrow;
    use crate::tuning::Tuning;

    #[test]
    fn test_snapshot_skips_inactive() {
        let mut state = GameState::new(Tuning::planar_sized(800.0, 600.0));
        for enemy in state.enemies.values_mut().take(4) {
            enemy.body.active = false;
        }
        let mut dead = Arrow::enemy(Vec3::ZERO, Vec3::ONE);
        dead.body.active = false;
        state.arrows.insert(dead);
        state.arrows.insert(Arrow::player(Vec3::ONE, Vec3::ONE, 0xef4444));

        let snap = FrameSnapshot::capture(&state);
        assert_eq!(snap.enemies.len(), 11);
        assert_eq!(snap.arrows.len(), 1);
        assert!(snap.arrows[0].from_player);
        assert_eq!(snap.arrows[0].color, Some(0xef4444));
        assert_eq!(snap.player.lives, 3);
        assert_eq!(snap.level, 1);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(Tuning::volumetric());
        let json = serde_json::to_string(&FrameSnapshot::capture(&state)).unwrap();
        assert!(json.contains("\"enemies\""));
        assert!(json.contains("Volumetric"));
    }
}
