//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (bubbles oldest first)
//! - No rendering or platform dependencies

pub mod bubble;
pub mod clock;
pub mod collision;
pub mod deck;
pub mod effects;
pub mod spawn;
pub mod state;
pub mod tick;

pub use bubble::{Bubble, launch_speed};
pub use clock::FrameClock;
pub use collision::{HitOutcome, find_hit, handle_hit};
pub use deck::{WordScheduler, pick_next};
pub use spawn::{SpawnBatch, SpawnDecision};
pub use state::{FloatingText, GameEvent, GamePhase, GameState, ImpactRing, Particle};
pub use tick::{TickInput, catch_up, start, tick};
