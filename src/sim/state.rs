//! Game state and core simulation types

use glam::Vec3;

use super::arena::{Arena, EntityId};
use super::difficulty;
use super::entity::{Arrow, Enemy, Player};
use crate::tuning::{MOVE_AXIS, Tuning};

/// Fire-and-forget notifications produced during a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Player loosed an arrow
    PlayerFired,
    /// An enemy loosed an arrow
    EnemyFired { enemy: EntityId },
    /// Player arrow destroyed an enemy
    EnemyDefeated { enemy: EntityId, points: u32 },
    /// Enemy arrow hit the player
    PlayerHit { lives_left: u8 },
    /// Formation reached the player's row
    Overrun,
}

/// Complete per-session simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    /// Current level (1-based)
    pub level: u32,
    /// Frames simulated since the session started
    pub frame: u64,
    /// Frame of the last player shot
    pub last_shot_frame: Option<u64>,
    pub player: Player,
    pub enemies: Arena<Enemy>,
    pub arrows: Arena<Arrow>,
    /// Shared formation direction along the move axis, +1 or -1
    pub direction: f32,
    pub enemies_defeated: usize,
    pub total_enemies: usize,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh session at level 1
    pub fn new(tuning: Tuning) -> Self {
        let player = Player::new(
            tuning.player_start,
            tuning.player_size,
            tuning.player_speed,
            tuning.starting_lives,
        );
        let mut state = Self {
            enemies: Arena::with_capacity(tuning.enemy_count()),
            arrows: Arena::new(),
            tuning,
            level: 1,
            frame: 0,
            last_shot_frame: None,
            player,
            direction: 1.0,
            enemies_defeated: 0,
            total_enemies: 0,
            events: Vec::new(),
        };
        state.reset_level();
        state
    }

    /// Move to the next level with a fresh grid
    pub fn advance_level(&mut self) {
        self.level += 1;
        log::info!("Level {} - enemies are getting stronger", self.level);
        self.reset_level();
    }

    /// Regenerate the grid, clear arrows, restore lives
    ///
    /// The player keeps their lane but is revived; frame counters carry over so
    /// the fire cooldown stays continuous across levels.
    pub fn reset_level(&mut self) {
        self.player.lives = self.tuning.starting_lives;
        self.player.body.active = true;
        self.player.body.pos[self.tuning.playfield.advance_axis()] =
            self.tuning.player_start[self.tuning.playfield.advance_axis()];

        self.arrows.clear();
        self.enemies.clear();
        self.spawn_formation();

        self.total_enemies = self.enemies.len();
        self.enemies_defeated = 0;
        self.direction = 1.0;
    }

    fn spawn_formation(&mut self) {
        let tuning = &self.tuning;
        let field = &tuning.playfield;
        let advance = field.advance_axis();
        let spacing = tuning.enemy_size.x + tuning.enemy_padding;
        let left = field.move_center() - tuning.row_width() / 2.0 + tuning.enemy_size.x / 2.0;

        for row in 0..tuning.enemy_rows {
            // Row 0 holds the strongest rank
            let kind = tuning.enemy_rows - row - 1;
            let points = difficulty::enemy_points(kind, self.level);
            for col in 0..tuning.enemies_per_row {
                let mut pos = Vec3::ZERO;
                pos[MOVE_AXIS] = left + col as f32 * spacing;
                pos[advance] = tuning.first_row + row as f32 * tuning.row_step;
                if advance == 2 {
                    // Standing on the ground plane
                    pos.y = tuning.enemy_size.y / 2.0;
                }
                self.enemies.insert(Enemy {
                    body: super::entity::Body::new(pos, tuning.enemy_size),
                    kind,
                    points,
                });
            }
        }
    }

    pub fn active_enemy_count(&self) -> usize {
        self.enemies.values().filter(|e| e.body.active).count()
    }

    pub fn active_arrow_count(&self) -> usize {
        self.arrows.values().filter(|a| a.body.active).count()
    }

    /// Destroyed share of this level's grid, 0..=1
    pub fn progress(&self) -> f32 {
        difficulty::progress_ratio(self.enemies_defeated, self.total_enemies)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Free slots of arrows and enemies deactivated this frame
    pub fn compact(&mut self) {
        self.arrows.retain(|a| a.body.active);
        self.enemies.retain(|e| e.body.active);
    }
}
