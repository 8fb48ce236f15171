//! Vocab Pop - a vocabulary quiz arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (deck, spawning, bubble physics, scoring)
//! - `renderer`: Canvas 2D drawing and label layout
//! - `vocab`: Word/meaning list loading and validation
//! - `tuning`: Data-driven game balance
//! - `settings`, `highscores`, `audio`: player preferences, best score, sound cues
//! - `music`: background loop synthesis

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod highscores;
pub mod music;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod vocab;

pub use highscores::BestScore;
pub use settings::Settings;
pub use tuning::Tuning;
pub use vocab::{VocabEntry, VocabError};

/// Game configuration constants
pub mod consts {
    /// Simulation steps per second. One step is one reference frame.
    pub const SIM_HZ: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / SIM_HZ as f32;
    /// Longest real frame delta simulated as physics. Time beyond it only
    /// runs the countdown (throttled tabs).
    pub const MAX_FRAME_DT: f32 = 0.25;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 16;

    /// Minimum vocabulary size for a round to start
    pub const MIN_VOCAB_ENTRIES: usize = 4;

    /// Shown on a distractor whose drawn meaning equals the target meaning
    pub const DISTRACTOR_PLACEHOLDER: &str = "???";

    /// Maximum visual particles alive at once
    pub const MAX_PARTICLES: usize = 256;
}

/// Convert seconds to whole simulation steps (at least one)
#[inline]
pub fn secs_to_ticks(secs: f32) -> u32 {
    ((secs * consts::SIM_HZ as f32).round() as u32).max(1)
}

/// Format a 0xRRGGBB color as a CSS hex string
#[inline]
pub fn css_color(rgb: u32) -> String {
    format!("#{:06X}", rgb & 0xFF_FFFF)
}
