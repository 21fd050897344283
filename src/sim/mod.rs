//! Simulation engine
//!
//! All gameplay logic lives here. This module knows nothing about rendering
//! or the browser:
//! - One call to [`advance`] is one frame
//! - Randomness comes in through [`RandomSource`]
//! - Iteration follows arena slot order
//! - The coordinate convention comes from [`crate::tuning::Tuning`]

pub mod arena;
pub mod collision;
pub mod difficulty;
pub mod entity;
pub mod formation;
pub mod projectile;
pub mod rng;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use arena::{Arena, EntityId};
pub use collision::{HitSummary, overlaps, resolve_hits};
pub use entity::{Arrow, Body, Enemy, Owner, Player};
pub use formation::{FormationStep, enemy_fire, update_formation};
pub use projectile::{can_fire, player_fire, update_arrows};
pub use rng::{RandomSource, seeded};
pub use snapshot::{ArrowView, EnemyView, FrameSnapshot, PlayerView};
pub use state::{GameEvent, GameState};
pub use tick::{FrameOutcome, advance};
