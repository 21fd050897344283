//! Data-driven game balance
//!
//! One [`Tuning`] per coordinate convention. The engine only ever reads these
//! values, so the same simulation code serves the flat canvas (pixels, y grows
//! toward the player) and the 3D scene (world units, z grows toward the player).

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis along which the formation and the player slide
pub const MOVE_AXIS: usize = 0;

/// Largest canvas the 2D view will use
pub const MAX_CANVAS_WIDTH: f32 = 800.0;
pub const MAX_CANVAS_HEIGHT: f32 = 600.0;
/// Horizontal margin kept free around the canvas
pub const CANVAS_MARGIN: f32 = 40.0;

/// Half-width of the symmetric 3D field along x
pub const VOLUME_HALF_WIDTH: f32 = 8.0;
/// Half-depth of the symmetric 3D field along z
pub const VOLUME_HALF_DEPTH: f32 = 10.0;

/// Player arrow colors (sRGB, 0xRRGGBB)
pub const ARROW_PALETTE: [u32; 6] = [0xfbbf24, 0xef4444, 0x3b82f6, 0x10b981, 0x8b5cf6, 0xec4899];

/// Coordinate convention of a playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dimensions {
    /// x/y plane, depth ignored
    Planar,
    /// x/y/z volume, y is height above the ground
    Volumetric,
}

impl Dimensions {
    /// Number of axes that take part in overlap tests
    pub fn axis_count(self) -> usize {
        match self {
            Dimensions::Planar => 2,
            Dimensions::Volumetric => 3,
        }
    }

    /// Axis along which the formation advances toward the player
    pub fn advance_axis(self) -> usize {
        match self {
            Dimensions::Planar => 1,
            Dimensions::Volumetric => 2,
        }
    }
}

/// World bounds the simulation runs inside
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub dims: Dimensions,
    pub move_min: f32,
    pub move_max: f32,
    /// Enemy side of the field
    pub advance_min: f32,
    /// Player side of the field
    pub advance_max: f32,
}

impl Playfield {
    pub fn advance_axis(&self) -> usize {
        self.dims.advance_axis()
    }

    pub fn move_center(&self) -> f32 {
        (self.move_min + self.move_max) / 2.0
    }

    pub fn move_extent(&self) -> f32 {
        self.move_max - self.move_min
    }

    pub fn advance_extent(&self) -> f32 {
        self.advance_max - self.advance_min
    }
}

/// All gameplay constants for one coordinate convention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    pub playfield: Playfield,

    // Player
    pub player_size: Vec3,
    pub player_start: Vec3,
    /// World units per frame
    pub player_speed: f32,
    pub starting_lives: u8,
    /// Minimum frames between two player shots
    pub fire_cooldown_frames: u64,

    // Formation
    pub enemy_size: Vec3,
    pub enemy_rows: u32,
    pub enemies_per_row: u32,
    pub enemy_padding: f32,
    /// Advance-axis center of grid row 0
    pub first_row: f32,
    /// Signed advance-axis distance between consecutive rows
    pub row_step: f32,
    /// Formation speed at level 1 with a full grid, units per frame
    pub enemy_base_speed: f32,
    /// Advance-axis displacement applied on each direction flip
    pub enemy_step: f32,
    /// Per-enemy per-frame shot probability at level 1 for type 0
    pub enemy_base_shoot_chance: f32,
    /// How far past the player's front face an enemy may reach before
    /// the formation counts as having overrun the player
    pub overrun_depth: f32,

    // Projectiles
    pub arrow_size: Vec3,
    pub arrow_speed: f32,
    /// Enemy arrows travel at this fraction of `arrow_speed`
    pub enemy_arrow_factor: f32,
}

impl Tuning {
    /// 2D canvas convention sized from the browser viewport width
    pub fn planar(viewport_width: f32) -> Self {
        let width = (viewport_width - CANVAS_MARGIN).clamp(1.0, MAX_CANVAS_WIDTH);
        let height = (width * 3.0 / 4.0).min(MAX_CANVAS_HEIGHT);
        Self::planar_sized(width, height)
    }

    /// 2D canvas convention with an explicit canvas size
    pub fn planar_sized(width: f32, height: f32) -> Self {
        let player_size = Vec3::new(50.0, 60.0, 0.0);
        let enemy_size = Vec3::new(40.0, 40.0, 0.0);
        let enemy_padding = 40.0;
        Self {
            playfield: Playfield {
                dims: Dimensions::Planar,
                move_min: 0.0,
                move_max: width,
                advance_min: 0.0,
                advance_max: height,
            },
            player_size,
            // Feet 20px above the canvas floor
            player_start: Vec3::new(width / 2.0, height - 20.0 - player_size.y / 2.0, 0.0),
            player_speed: 5.0,
            starting_lives: 3,
            fire_cooldown_frames: 15,
            enemy_size,
            enemy_rows: 3,
            enemies_per_row: 5,
            enemy_padding,
            first_row: 80.0 + enemy_size.y / 2.0,
            row_step: enemy_size.y + enemy_padding,
            enemy_base_speed: 0.5,
            enemy_step: 20.0,
            enemy_base_shoot_chance: 0.002,
            overrun_depth: 0.0,
            arrow_size: Vec3::new(5.0, 20.0, 0.0),
            arrow_speed: 7.0,
            enemy_arrow_factor: 0.4,
        }
    }

    /// 3D scene convention: x in [-8, 8], z in [-10, 10]
    pub fn volumetric() -> Self {
        let player_size = Vec3::new(1.0, 1.2, 1.0);
        let enemy_size = Vec3::splat(0.8);
        let enemy_padding = 2.0;
        Self {
            playfield: Playfield {
                dims: Dimensions::Volumetric,
                move_min: -VOLUME_HALF_WIDTH,
                move_max: VOLUME_HALF_WIDTH,
                advance_min: -VOLUME_HALF_DEPTH,
                advance_max: VOLUME_HALF_DEPTH,
            },
            player_size,
            player_start: Vec3::new(0.0, player_size.y / 2.0, 8.0),
            player_speed: 0.1,
            starting_lives: 3,
            fire_cooldown_frames: 15,
            enemy_size,
            enemy_rows: 3,
            enemies_per_row: 5,
            enemy_padding,
            first_row: -2.0,
            // Later rows sit farther back in the scene
            row_step: -(enemy_size.z + enemy_padding),
            enemy_base_speed: 0.01,
            enemy_step: 0.4,
            enemy_base_shoot_chance: 0.002,
            // The 3D line is the archer's center
            overrun_depth: player_size.z / 2.0,
            arrow_size: Vec3::new(0.1, 0.4, 0.1),
            arrow_speed: 0.15,
            enemy_arrow_factor: 0.4,
        }
    }

    pub fn enemy_count(&self) -> usize {
        (self.enemy_rows * self.enemies_per_row) as usize
    }

    /// Total move-axis width of one grid row
    pub fn row_width(&self) -> f32 {
        let cols = self.enemies_per_row as f32;
        (self.enemy_size.x + self.enemy_padding) * cols - self.enemy_padding
    }
}
