//! Session flow: start screen, play, game over
//!
//! Owns the engine plus everything around it that outlives a level: score,
//! best score, preferences and the queue of sounds for the driver to play.

use rand_pcg::Pcg32;

use crate::highscores::HighScore;
use crate::input::InputState;
use crate::persistence::Storage;
use crate::settings::{RenderMode, Settings};
use crate::sim::{FrameOutcome, FrameSnapshot, GameEvent, GameState, advance, seeded};

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Playing,
    GameOver,
}

/// Audio requests, played fire-and-forget by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Shoot,
    EnemyDown,
    PlayerHit,
    LevelUp,
    GameOver,
    MusicStart,
    MusicStop,
}

pub struct Session {
    phase: Phase,
    state: GameState,
    rng: Pcg32,
    storage: Box<dyn Storage>,
    settings: Settings,
    high_score: HighScore,
    score: u64,
    /// Score beat the stored best at some point this run
    new_best: bool,
    viewport_width: f32,
    cues: Vec<SoundCue>,
}

impl Session {
    pub fn new(storage: Box<dyn Storage>, viewport_width: f32, seed: u64) -> Self {
        let settings = Settings::load(storage.as_ref());
        let high_score = HighScore::load(storage.as_ref());
        let state = GameState::new(settings.render_mode.tuning(viewport_width));
        Self {
            phase: Phase::Start,
            state,
            rng: seeded(seed),
            storage,
            settings,
            high_score,
            score: 0,
            new_best: false,
            viewport_width,
            cues: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best()
    }

    pub fn is_new_best(&self) -> bool {
        self.new_best
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn lives(&self) -> u8 {
        self.state.player.lives
    }

    pub fn render_mode(&self) -> RenderMode {
        self.settings.render_mode
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::capture(&self.state)
    }

    /// Begin a fresh run at level 1
    pub fn start(&mut self) {
        if self.phase == Phase::Playing {
            return;
        }
        self.state = GameState::new(self.settings.render_mode.tuning(self.viewport_width));
        self.score = 0;
        self.new_best = false;
        self.phase = Phase::Playing;
        self.cues.push(SoundCue::MusicStart);
        log::info!("Game started ({} mode)", self.settings.render_mode.as_str());
    }

    /// Simulate one frame; does nothing outside [`Phase::Playing`]
    pub fn frame(&mut self, input: &InputState) -> FrameOutcome {
        match self.phase {
            Phase::Playing => {}
            Phase::Start => return FrameOutcome::Continue,
            Phase::GameOver => return FrameOutcome::GameOver,
        }

        let outcome = advance(&mut self.state, input, &mut self.rng);

        for event in self.state.drain_events() {
            match event {
                GameEvent::PlayerFired => self.cues.push(SoundCue::Shoot),
                GameEvent::EnemyDefeated { points, .. } => {
                    self.score += u64::from(points);
                    self.cues.push(SoundCue::EnemyDown);
                }
                GameEvent::PlayerHit { lives_left } => {
                    log::debug!("Player hit, {lives_left} lives left");
                    self.cues.push(SoundCue::PlayerHit);
                }
                GameEvent::EnemyFired { .. } | GameEvent::Overrun => {}
            }
        }

        if self.high_score.record(self.score) {
            self.new_best = true;
            self.high_score.save(self.storage.as_mut());
        }

        match outcome {
            FrameOutcome::Continue => {}
            FrameOutcome::LevelCleared => {
                self.state.advance_level();
                self.cues.push(SoundCue::LevelUp);
            }
            FrameOutcome::GameOver => {
                self.phase = Phase::GameOver;
                self.cues.push(SoundCue::GameOver);
                self.cues.push(SoundCue::MusicStop);
                log::info!(
                    "Game over at level {} with {} points",
                    self.state.level,
                    self.score
                );
            }
        }
        outcome
    }

    /// Switch between the 2D and 3D views; only allowed on the start screen
    pub fn toggle_render_mode(&mut self) -> bool {
        if self.phase != Phase::Start {
            return false;
        }
        self.settings.render_mode = self.settings.render_mode.toggled();
        self.settings.save(self.storage.as_mut());
        self.state = GameState::new(self.settings.render_mode.tuning(self.viewport_width));
        log::info!("Render mode set to {}", self.settings.render_mode.as_str());
        true
    }

    /// Remember the browser width for the next 2D run
    pub fn set_viewport_width(&mut self, width: f32) {
        self.viewport_width = width;
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
        self.settings.save(self.storage.as_mut());
    }

    /// Take all sounds queued since the last drain
    pub fn drain_cues(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.cues)
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}
