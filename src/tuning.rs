//! Data-driven game balance
//!
//! Every gameplay constant lives here so the host can override it from JSON.
//! Distances are in play-area pixels, speeds in pixels per simulation step.

use serde::{Deserialize, Serialize};

use crate::secs_to_ticks;

/// Bubble colors (0xRRGGBB). Picked at random so color never hints correctness.
pub const DEFAULT_PALETTE: [u32; 5] = [0x00B0FF, 0x00E676, 0xFFEA00, 0xFF1744, 0xAA00FF];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Bubble physics ===
    /// Gravity at fall speed 1.0 (px/step²)
    pub base_gravity: f32,
    /// Apex height as a fraction of play-area height, measured from the top
    pub apex_fraction: f32,
    /// Relative jitter applied to launch speed (0.02 = ±2%)
    pub launch_jitter: f32,
    /// Maximum horizontal drift (px/step, either direction)
    pub max_drift: f32,
    pub bubble_radius: f32,
    /// Launch point distance below the bottom edge, beyond the radius
    pub spawn_offset: f32,
    /// Bubbles are removed once this far below the bottom edge
    pub despawn_margin: f32,
    /// Horizontal keep-out from the side edges for launch positions
    pub edge_padding: f32,

    // === Spawn policy ===
    /// Correct answer withheld for this long after the target changes
    pub grace_secs: f32,
    pub spawn_interval_min_secs: f32,
    pub spawn_interval_max_secs: f32,
    /// Interval used while no correct bubble is live
    pub guarantee_interval_secs: f32,
    /// Optional distractors are skipped once this many bubbles are live
    pub max_bubbles: usize,

    // === Scoring ===
    pub correct_points: i32,
    pub wrong_penalty: i32,

    // === Feedback ===
    pub burst_particles: u32,
    pub palette: Vec<u32>,

    // === Demo mode ===
    /// Autoplay taps a correct bubble once its rising speed drops below this
    pub autoplay_tap_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_gravity: 0.25,
            apex_fraction: 0.35,
            launch_jitter: 0.02,
            max_drift: 0.75,
            bubble_radius: 60.0,
            spawn_offset: 10.0,
            despawn_margin: 100.0,
            edge_padding: 80.0,

            grace_secs: 0.8,
            spawn_interval_min_secs: 1.0,
            spawn_interval_max_secs: 1.5,
            guarantee_interval_secs: 0.4,
            max_bubbles: 12,

            correct_points: 10,
            wrong_penalty: 5,

            burst_particles: 15,
            palette: DEFAULT_PALETTE.to_vec(),

            autoplay_tap_speed: 2.0,
        }
    }
}

impl Tuning {
    /// Parse overrides from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn grace_ticks(&self) -> u32 {
        secs_to_ticks(self.grace_secs)
    }

    pub fn guarantee_interval_ticks(&self) -> u32 {
        secs_to_ticks(self.guarantee_interval_secs)
    }

    /// Regular spawn interval bounds in ticks (min, max), min <= max
    pub fn spawn_interval_ticks(&self) -> (u32, u32) {
        let a = secs_to_ticks(self.spawn_interval_min_secs);
        let b = secs_to_ticks(self.spawn_interval_max_secs);
        (a.min(b), a.max(b))
    }
}
