//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects and a looping drone; no asset files.
//! Every failure is swallowed so audio never affects the game.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::session::SoundCue;
use crate::settings::Settings;

/// Background drone: root, fifth and octave of a low D
const DRONE_FREQS: [f32; 3] = [73.42, 110.0, 146.83];

/// Running background music nodes
struct Music {
    oscillators: Vec<OscillatorNode>,
    gain: GainNode,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    sfx_gain: f32,
    music_gain: f32,
    music: Option<Music>,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Fails outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            sfx_gain: settings.sfx_gain(),
            music_gain: settings.music_gain(),
            music: None,
        }
    }

    /// Pick up volume or mute changes
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.sfx_gain = settings.sfx_gain();
        self.music_gain = settings.music_gain();
        if let (Some(music), Some(ctx)) = (&self.music, &self.ctx) {
            music
                .gain
                .gain()
                .set_target_at_time(self.music_gain * 0.08, ctx.current_time(), 0.1)
                .ok();
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Play a queued cue
    pub fn play(&mut self, cue: SoundCue) {
        let Some(ctx) = self.ctx.clone() else {
            return;
        };

        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let vol = self.sfx_gain;
        match cue {
            SoundCue::MusicStart => self.start_music(&ctx),
            SoundCue::MusicStop => self.stop_music(&ctx),
            _ if vol <= 0.0 => {}
            SoundCue::Shoot => self.play_shoot(&ctx, vol),
            SoundCue::EnemyDown => self.play_enemy_down(&ctx, vol),
            SoundCue::PlayerHit => self.play_player_hit(&ctx, vol),
            SoundCue::LevelUp => self.play_level_up(&ctx, vol),
            SoundCue::GameOver => self.play_game_over(&ctx, vol),
        }
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Bowstring twang
    fn play_shoot(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 880.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(880.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(220.0, t + 0.12)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Armor crumpling
    fn play_enemy_down(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                .ok();
            osc.frequency().set_value_at_time(300.0, t).ok();
            osc.frequency().set_value_at_time(200.0, t + 0.05).ok();
            osc.frequency().set_value_at_time(120.0, t + 0.1).ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.25).ok();
        }

        if let Some((osc, gain)) = self.create_osc(ctx, 80.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.2).ok();
        }
    }

    /// Dull thud with a falling pitch
    fn play_player_hit(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 200.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.45, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.35)
            .ok();
        osc.frequency().set_value_at_time(200.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(50.0, t + 0.3)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.4).ok();
    }

    /// Rising fanfare
    fn play_level_up(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        let notes = [392.0, 523.25, 659.25, 783.99];

        for (i, &freq) in notes.iter().enumerate() {
            if let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Square) {
                let start = t + i as f64 * 0.12;
                gain.gain().set_value_at_time(0.0, t).ok();
                gain.gain().set_value_at_time(vol * 0.2, start).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, start + 0.2)
                    .ok();
                osc.start_with_when(start).ok();
                osc.stop_with_when(start + 0.25).ok();
            }
        }
    }

    /// Slow descending minor line
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        let notes = [392.0, 311.13, 261.63, 196.0];

        for (i, &freq) in notes.iter().enumerate() {
            if let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Triangle) {
                let start = t + i as f64 * 0.3;
                gain.gain().set_value_at_time(0.0, t).ok();
                gain.gain().set_value_at_time(vol * 0.35, start).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, start + 0.45)
                    .ok();
                osc.start_with_when(start).ok();
                osc.stop_with_when(start + 0.5).ok();
            }
        }
    }

    fn start_music(&mut self, ctx: &AudioContext) {
        if self.music.is_some() {
            return;
        }
        let Ok(gain) = ctx.create_gain() else {
            return;
        };
        if gain.connect_with_audio_node(&ctx.destination()).is_err() {
            return;
        }
        let t = ctx.current_time();
        gain.gain().set_value_at_time(0.0, t).ok();
        gain.gain()
            .linear_ramp_to_value_at_time(self.music_gain * 0.08, t + 1.5)
            .ok();

        let mut oscillators = Vec::with_capacity(DRONE_FREQS.len());
        for freq in DRONE_FREQS {
            let Ok(osc) = ctx.create_oscillator() else {
                continue;
            };
            osc.set_type(OscillatorType::Sine);
            osc.frequency().set_value(freq);
            if osc.connect_with_audio_node(&gain).is_ok() && osc.start().is_ok() {
                oscillators.push(osc);
            }
        }

        log::debug!("Music started ({} voices)", oscillators.len());
        self.music = Some(Music { oscillators, gain });
    }

    fn stop_music(&mut self, ctx: &AudioContext) {
        let Some(music) = self.music.take() else {
            return;
        };
        let t = ctx.current_time();
        music.gain.gain().set_target_at_time(0.0, t, 0.3).ok();
        for osc in &music.oscillators {
            osc.stop_with_when(t + 1.5).ok();
        }
        log::debug!("Music stopped");
    }
}
