//! Answer bubble kinematics
//!
//! Bubbles launch from below the play area with just enough upward speed to
//! reach the apex line, then fall back under constant gravity. The launch
//! speed comes from `v0 = sqrt(2 * g * d)`, so apex height is independent of
//! the fall speed setting; only the time aloft changes.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// A single answer bubble
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bubble {
    pub id: u32,
    pub pos: Vec2,
    /// Velocity in px/step (y grows downward)
    pub vel: Vec2,
    /// Downward acceleration in px/step²
    pub gravity: f32,
    pub radius: f32,
    pub meaning: String,
    pub is_correct: bool,
    /// 0xRRGGBB
    pub color: u32,
}

/// Upward speed needed to rise `distance` pixels under `gravity`
#[inline]
pub fn launch_speed(gravity: f32, distance: f32) -> f32 {
    (2.0 * gravity * distance.max(0.0)).sqrt()
}

impl Bubble {
    /// Launch a new bubble from below the play area
    pub fn launch<R: Rng + ?Sized>(
        id: u32,
        meaning: String,
        is_correct: bool,
        play_area: Vec2,
        gravity: f32,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Self {
        let radius = tuning.bubble_radius;

        // Horizontal position: keep clear of the side edges
        let lo = tuning.edge_padding;
        let hi = play_area.x - tuning.edge_padding;
        let x = if hi > lo {
            rng.random_range(lo..hi)
        } else {
            play_area.x / 2.0
        };
        let y = play_area.y + radius + tuning.spawn_offset;

        // Screen y points down, so the apex line sits at apex_fraction * height
        let apex_y = play_area.y * tuning.apex_fraction;
        let jitter = if tuning.launch_jitter > 0.0 {
            rng.random_range(-tuning.launch_jitter..=tuning.launch_jitter)
        } else {
            0.0
        };
        let vy = -launch_speed(gravity, y - apex_y) * (1.0 + jitter);

        let vx = if tuning.max_drift > 0.0 {
            rng.random_range(-tuning.max_drift..=tuning.max_drift)
        } else {
            0.0
        };

        let color = if tuning.palette.is_empty() {
            0xFFFFFF
        } else {
            tuning.palette[rng.random_range(0..tuning.palette.len())]
        };

        Self {
            id,
            pos: Vec2::new(x, y),
            vel: Vec2::new(vx, vy),
            gravity,
            radius,
            meaning,
            is_correct,
            color,
        }
    }

    /// Advance one simulation step
    #[inline]
    pub fn update(&mut self) {
        self.pos += self.vel;
        self.vel.y += self.gravity;
    }

    /// Still moving upward
    pub fn is_rising(&self) -> bool {
        self.vel.y < 0.0
    }

    /// Fallen far enough below the bottom edge to be removed
    pub fn is_gone(&self, play_height: f32, margin: f32) -> bool {
        self.pos.y > play_height + margin
    }

    /// Point lies strictly inside the bubble
    pub fn contains(&self, point: Vec2) -> bool {
        self.pos.distance_squared(point) < self.radius * self.radius
    }
}
