//! Game state and core simulation types
//!
//! `GameState` owns everything a round touches: vocabulary, deck, target,
//! live bubbles, score, clock and visual effects. Only `sim` mutates it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bubble::Bubble;
use super::deck::WordScheduler;
use crate::settings::Settings;
use crate::tuning::Tuning;
use crate::vocab::VocabEntry;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first round, or after a refused start
    Idle,
    /// Countdown active, spawning and hits enabled
    Running,
    /// Round ended; only a new start leaves this phase
    Over,
}

/// Events emitted for the presentation layer (drained by the host each frame)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new target word is active
    TargetChanged { word: String },
    /// A bubble was popped
    Hit {
        correct: bool,
        pos: Vec2,
        delta: i32,
        color: u32,
    },
    /// A tap that hit no bubble
    Miss { pos: Vec2 },
    /// Round finished
    GameOver { final_score: i32 },
    /// Final score beat the stored best
    NewBest { score: i32 },
}

/// Explosion fragment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    pub life: f32, // 0-1, decreases over time
    pub size: f32,
}

/// Expanding ring drawn where the player tapped
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactRing {
    pub pos: Vec2,
    pub radius: f32,
    pub alpha: f32,
}

/// "+10" / "-5" text floating up from a popped bubble
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingText {
    pub pos: Vec2,
    pub delta: i32,
    /// Remaining life in ticks
    pub ttl_ticks: u32,
}

/// Lifetime of floating score text (0.8 s)
pub const FLOATING_TEXT_TICKS: u32 = 48;

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,

    // === Inputs ===
    pub vocab: Vec<VocabEntry>,
    /// Gravity multiplier for this session
    pub fall_speed: f32,
    /// Round length in seconds
    pub round_secs: u32,
    /// Play-area size in pixels
    pub play_area: Vec2,

    // === Session ===
    pub phase: GamePhase,
    pub score: i32,
    pub time_remaining: u32,
    /// Ticks elapsed within the current countdown second
    pub second_ticks: u32,
    /// Skipped real time not yet counted down (seconds)
    pub catch_up_secs: f64,
    /// Simulation tick counter (reset on start)
    pub time_ticks: u64,
    /// Best score seen so far (seeded by the host from storage)
    pub best_score: i32,

    // === Word scheduling ===
    pub scheduler: WordScheduler,
    /// Index into `vocab` of the current target
    pub target: Option<usize>,
    /// Tick at which the target last changed (grace period anchor)
    pub target_changed_tick: u64,

    // === Spawning ===
    /// Ticks until the next spawn batch
    pub spawn_cooldown: u32,
    /// Live bubbles, oldest first
    pub bubbles: Vec<Bubble>,

    // === Feedback (not gameplay-affecting) ===
    pub particles: Vec<Particle>,
    pub rings: Vec<ImpactRing>,
    pub floating_texts: Vec<FloatingText>,
    /// Spawn particle bursts on hits
    pub particles_enabled: bool,
    /// Pending events for the host
    pub events: Vec<GameEvent>,

    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create an idle session with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let defaults = Settings::default();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            vocab: Vec::new(),
            fall_speed: defaults.fall_speed,
            round_secs: defaults.round_secs,
            play_area: Vec2::new(800.0, 600.0),
            phase: GamePhase::Idle,
            score: 0,
            time_remaining: defaults.round_secs,
            second_ticks: 0,
            catch_up_secs: 0.0,
            time_ticks: 0,
            best_score: 0,
            scheduler: WordScheduler::default(),
            target: None,
            target_changed_tick: 0,
            spawn_cooldown: 0,
            bubbles: Vec::new(),
            particles: Vec::new(),
            rings: Vec::new(),
            floating_texts: Vec::new(),
            particles_enabled: defaults.particles,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Replace the vocabulary. Ignored while a round is running.
    pub fn set_vocabulary(&mut self, vocab: Vec<VocabEntry>) {
        if self.phase == GamePhase::Running {
            log::warn!("Vocabulary change ignored during a round");
            return;
        }
        self.scheduler = WordScheduler::new(vocab.len());
        self.vocab = vocab;
        self.target = None;
    }

    /// Apply round settings (clamped). Takes effect at the next start.
    pub fn apply_settings(&mut self, settings: &Settings) {
        let settings = settings.clamped();
        self.fall_speed = settings.fall_speed;
        self.round_secs = settings.round_secs;
        self.particles_enabled = settings.particles;
        if self.phase != GamePhase::Running {
            self.time_remaining = self.round_secs;
        }
    }

    /// Resize the play area (canvas resize)
    pub fn set_play_area(&mut self, width: f32, height: f32) {
        self.play_area = Vec2::new(width.max(1.0), height.max(1.0));
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Effective gravity for new bubbles (px/step²)
    pub fn gravity(&self) -> f32 {
        self.tuning.base_gravity * self.fall_speed
    }

    /// Current target entry
    pub fn target_entry(&self) -> Option<&VocabEntry> {
        self.target.and_then(|i| self.vocab.get(i))
    }

    /// Current target word (empty before the first round)
    pub fn target_word(&self) -> &str {
        self.target_entry().map(|e| e.word.as_str()).unwrap_or("")
    }

    /// Whether a bubble carrying the target's meaning is live
    pub fn has_live_correct(&self) -> bool {
        self.bubbles.iter().any(|b| b.is_correct)
    }

    /// Whether the target changed less than the grace period ago
    pub fn in_grace_period(&self) -> bool {
        self.time_ticks.saturating_sub(self.target_changed_tick)
            < self.tuning.grace_ticks() as u64
    }

    /// Remaining round time as a fraction (for the timer bar)
    pub fn time_fraction(&self) -> f32 {
        if self.round_secs == 0 {
            return 0.0;
        }
        self.time_remaining as f32 / self.round_secs as f32
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::demo_vocabulary;

    #[test]
    fn test_new_state_is_idle() {
        let state = GameState::new(1, Tuning::default());
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.target_word(), "");
        assert_eq!(state.time_remaining, 60);
    }

    #[test]
    fn test_apply_settings_clamps() {
        let mut state = GameState::new(1, Tuning::default());
        state.apply_settings(&Settings {
            fall_speed: 3.0,
            round_secs: 10,
            ..Default::default()
        });
        assert_eq!(state.fall_speed, 1.5);
        assert_eq!(state.round_secs, 30);
        assert_eq!(state.time_remaining, 30);
        assert!((state.gravity() - 0.375).abs() < 1e-6);
    }

    #[test]
    fn test_set_vocabulary_resizes_deck() {
        let mut state = GameState::new(1, Tuning::default());
        state.set_vocabulary(demo_vocabulary());
        assert_eq!(state.scheduler.len(), demo_vocabulary().len());
    }
}
