//! Visual feedback: particle bursts, tap rings, floating score text
//!
//! Purely cosmetic. Nothing here feeds back into scoring or spawning.

use glam::Vec2;
use rand::Rng;

use super::state::{FLOATING_TEXT_TICKS, FloatingText, GameState, ImpactRing, Particle};
use crate::consts::MAX_PARTICLES;

/// Particle launch speed range (px/step, per axis)
const BURST_SPEED: f32 = 7.5;
const PARTICLE_GRAVITY: f32 = 0.1;
const PARTICLE_FADE: f32 = 0.03;

const RING_START_RADIUS: f32 = 10.0;
const RING_GROWTH: f32 = 4.0;
const RING_FADE: f32 = 0.1;

/// Floating text rise speed (px/step)
const FLOAT_RISE: f32 = 1.0;

/// Burst of fragments where a bubble popped
pub fn spawn_burst(state: &mut GameState, pos: Vec2, color: u32) {
    if !state.particles_enabled {
        return;
    }
    for _ in 0..state.tuning.burst_particles {
        if state.particles.len() >= MAX_PARTICLES {
            break;
        }
        let vel = Vec2::new(
            state.rng.random_range(-BURST_SPEED..BURST_SPEED),
            state.rng.random_range(-BURST_SPEED..BURST_SPEED),
        );
        let size = state.rng.random_range(2.0..8.0);
        state.particles.push(Particle {
            pos,
            vel,
            color,
            life: 1.0,
            size,
        });
    }
}

/// Ring where the player tapped
pub fn spawn_ring(state: &mut GameState, pos: Vec2) {
    state.rings.push(ImpactRing {
        pos,
        radius: RING_START_RADIUS,
        alpha: 1.0,
    });
}

/// Score delta text above a popped bubble
pub fn spawn_floating_text(state: &mut GameState, pos: Vec2, delta: i32) {
    state.floating_texts.push(FloatingText {
        pos,
        delta,
        ttl_ticks: FLOATING_TEXT_TICKS,
    });
}

/// Advance all effects by one step and drop finished ones
pub fn update_effects(state: &mut GameState) {
    for p in state.particles.iter_mut() {
        p.pos += p.vel;
        p.vel.y += PARTICLE_GRAVITY;
        p.life -= PARTICLE_FADE;
    }
    state.particles.retain(|p| p.life > 0.0);

    for ring in state.rings.iter_mut() {
        ring.radius += RING_GROWTH;
        ring.alpha -= RING_FADE;
    }
    state.rings.retain(|r| r.alpha > 0.0);

    for text in state.floating_texts.iter_mut() {
        text.pos.y -= FLOAT_RISE;
        text.ttl_ticks = text.ttl_ticks.saturating_sub(1);
    }
    state.floating_texts.retain(|t| t.ttl_ticks > 0);
}

impl FloatingText {
    /// Opacity (1 fresh, 0 expired)
    pub fn alpha(&self) -> f32 {
        self.ttl_ticks as f32 / FLOATING_TEXT_TICKS as f32
    }

    pub fn label(&self) -> String {
        format!("{:+}", self.delta)
    }
}
