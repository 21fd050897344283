//! Medieval Invaders - an archer holds the castle against marching ranks
//!
//! Core modules:
//! - `sim`: Simulation engine (formation, arrows, hits, difficulty)
//! - `tuning`: Data-driven game balance for the 2D and 3D conventions
//! - `session`: Start / playing / game-over flow, score and sound cues
//! - `renderer`: Snapshot projection and the WebGPU pipeline
//! - `persistence`: Best-effort key/value storage

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScore;
pub use input::{HeldKeys, InputState};
pub use session::{Phase, Session, SoundCue};
pub use settings::{RenderMode, Settings};
pub use tuning::Tuning;
