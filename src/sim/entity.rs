//! Entity types owned by the simulation

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Position (center) and extents shared by every entity
///
/// Planar playfields leave `z` and `size.z` at zero; overlap tests skip that
/// axis entirely.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec3,
    pub size: Vec3,
    pub active: bool,
}

impl Body {
    pub fn new(pos: Vec3, size: Vec3) -> Self {
        Self {
            pos,
            size,
            active: true,
        }
    }

    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        self.size * 0.5
    }

    /// Lowest coordinate covered along `axis`
    #[inline]
    pub fn min_edge(&self, axis: usize) -> f32 {
        self.pos[axis] - self.size[axis] * 0.5
    }

    /// Highest coordinate covered along `axis`
    #[inline]
    pub fn max_edge(&self, axis: usize) -> f32 {
        self.pos[axis] + self.size[axis] * 0.5
    }
}

/// The archer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    /// World units per frame
    pub speed: f32,
    pub lives: u8,
}

impl Player {
    pub fn new(pos: Vec3, size: Vec3, speed: f32, lives: u8) -> Self {
        Self {
            body: Body::new(pos, size),
            speed,
            lives,
        }
    }

    /// Take one hit. Returns true if that was the last life.
    pub fn take_hit(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.body.active = false;
        }
        self.lives == 0
    }
}

/// A formation member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub body: Body,
    /// Rank 0..rows, higher is stronger
    pub kind: u32,
    pub points: u32,
}

/// Who fired an arrow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// A projectile
///
/// `owner` is private: it is fixed at spawn and decides both the travel
/// direction and which collision check applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arrow {
    pub body: Body,
    owner: Owner,
    /// Palette color, player arrows only
    pub color: Option<u32>,
}

impl Arrow {
    pub fn player(pos: Vec3, size: Vec3, color: u32) -> Self {
        Self {
            body: Body::new(pos, size),
            owner: Owner::Player,
            color: Some(color),
        }
    }

    pub fn enemy(pos: Vec3, size: Vec3) -> Self {
        Self {
            body: Body::new(pos, size),
            owner: Owner::Enemy,
            color: None,
        }
    }

    #[inline]
    pub fn owner(&self) -> Owner {
        self.owner
    }

    #[inline]
    pub fn is_player_arrow(&self) -> bool {
        self.owner == Owner::Player
    }
}
