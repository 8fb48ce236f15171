//! Audio system using Web Audio API
//!
//! Procedurally generated sound cues and background loop - no external
//! files needed! Any failure (no AudioContext, autoplay blocked) leaves the
//! game silent.

use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{AudioBufferSourceNode, AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::music;
use crate::settings::Settings;
use crate::sim::GameEvent;

/// Music level relative to sound effects
const MUSIC_LEVEL: f32 = 0.4;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Popped the right meaning
    Correct,
    /// Popped a distractor
    Wrong,
    /// Round started
    Start,
    /// Round over
    GameOver,
    /// New best score
    NewBest,
}

impl SoundEffect {
    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Hit { correct: true, .. } => Some(SoundEffect::Correct),
            GameEvent::Hit { correct: false, .. } => Some(SoundEffect::Wrong),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::NewBest { .. } => Some(SoundEffect::NewBest),
            GameEvent::TargetChanged { .. } | GameEvent::Miss { .. } => None,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
    /// Playing background loop and its gain
    music: Option<(AudioBufferSourceNode, GainNode)>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: 0.8,
            music: None,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        let Some(ctx) = &self.ctx else { return };
        match ctx.resume() {
            Ok(promise) => log_rejection(&promise, "AudioContext resume"),
            Err(e) => log::warn!("AudioContext resume failed: {:?}", e),
        }
    }

    /// Pick up volume and mute from settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.volume = settings.effective_volume();
        if let Some((_, gain)) = &self.music {
            gain.gain().set_value(self.volume * MUSIC_LEVEL);
        }
    }

    /// Start the background loop from the beginning
    pub fn start_music(&mut self) {
        self.stop_music();
        let Some(ctx) = &self.ctx else { return };
        match Self::create_music(ctx, self.volume * MUSIC_LEVEL) {
            Ok(nodes) => self.music = Some(nodes),
            Err(e) => log::warn!("Background music failed: {:?}", e),
        }
    }

    /// Stop the background loop; the next start plays from the top
    pub fn stop_music(&mut self) {
        if let Some((source, _)) = self.music.take() {
            source.stop().ok();
        }
    }

    fn create_music(ctx: &AudioContext, level: f32) -> Result<(AudioBufferSourceNode, GainNode), JsValue> {
        let sample_rate = ctx.sample_rate();
        let samples = music::render_loop(sample_rate);
        let buffer = ctx.create_buffer(1, samples.len().max(1) as u32, sample_rate)?;
        buffer.copy_to_channel(&samples, 0)?;

        let source = ctx.create_buffer_source()?;
        source.set_buffer(Some(&buffer));
        source.set_loop(true);

        let gain = ctx.create_gain()?;
        gain.gain().set_value(level);
        source.connect_with_audio_node(&gain)?;
        gain.connect_with_audio_node(&ctx.destination())?;
        source.start()?;
        Ok((source, gain))
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.volume;
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            self.resume();
        }

        match effect {
            SoundEffect::Correct => self.play_correct(ctx, vol),
            SoundEffect::Wrong => self.play_wrong(ctx, vol),
            SoundEffect::Start => self.play_start(ctx, vol),
            SoundEffect::GameOver => self.play_game_over(ctx, vol),
            SoundEffect::NewBest => self.play_new_best(ctx, vol),
        }
    }

    // === Sound generators ===

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

    /// Correct - bright upward chirp
    fn play_correct(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 600.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.1)
            .ok();
        osc.frequency().set_value_at_time(600.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(1200.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.12).ok();
    }

    /// Wrong - low buzzy drop
    fn play_wrong(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.1)
            .ok();
        osc.frequency().set_value_at_time(150.0, t).ok();
        osc.frequency()
            .linear_ramp_to_value_at_time(50.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.12).ok();
    }

    /// Round start - two quick rising notes
    fn play_start(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [440.0, 660.0].iter().enumerate() {
            let delay = i as f64 * 0.1;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.2).ok();
            }
        }
    }

    /// Game over - descending tones
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
            let delay = i as f64 * 0.2;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.4).ok();
            }
        }
    }

    /// New best - celebratory arpeggio
    fn play_new_best(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [500.0, 600.0, 700.0, 800.0, 1000.0].iter().enumerate() {
            let delay = 0.8 + i as f64 * 0.08;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.3).ok();
            }
        }
    }
}

/// Log a rejected promise (autoplay policy blocks audio until a gesture)
fn log_rejection(promise: &js_sys::Promise, what: &'static str) {
    let on_reject = Closure::once(move |err: JsValue| {
        log::warn!("{} rejected: {:?}", what, err);
    });
    let _ = promise.catch(&on_reject);
    on_reject.forget();
}
