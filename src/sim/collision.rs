//! Tap hit-testing and scoring
//!
//! Bubbles are tested newest first so the one drawn on top wins when they
//! overlap. One tap pops at most one bubble.

use glam::Vec2;

use super::deck::pick_next;
use super::effects::{spawn_burst, spawn_floating_text, spawn_ring};
use super::state::{GameEvent, GamePhase, GameState};

/// Result of a tap
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitOutcome {
    /// Not running; tap discarded
    Ignored,
    /// Tap hit no bubble
    Miss,
    /// Popped the bubble with the target's meaning
    Correct { pos: Vec2, delta: i32 },
    /// Popped a distractor
    Wrong { pos: Vec2, delta: i32 },
}

/// Index of the topmost bubble under `point`
pub fn find_hit(state: &GameState, point: Vec2) -> Option<usize> {
    state.bubbles.iter().rposition(|b| b.contains(point))
}

/// Resolve a tap at `point` (play-area coordinates)
pub fn handle_hit(state: &mut GameState, point: Vec2) -> HitOutcome {
    if state.phase != GamePhase::Running {
        return HitOutcome::Ignored;
    }

    spawn_ring(state, point);

    let Some(index) = find_hit(state, point) else {
        state.events.push(GameEvent::Miss { pos: point });
        return HitOutcome::Miss;
    };

    let bubble = state.bubbles.remove(index);
    let delta = if bubble.is_correct {
        state.tuning.correct_points
    } else {
        -state.tuning.wrong_penalty
    };
    state.score += delta;

    spawn_burst(state, bubble.pos, bubble.color);
    spawn_floating_text(state, bubble.pos, delta);
    state.events.push(GameEvent::Hit {
        correct: bubble.is_correct,
        pos: bubble.pos,
        delta,
        color: bubble.color,
    });

    if bubble.is_correct {
        log::debug!("Correct: {} (score {})", bubble.meaning, state.score);
        pick_next(state);
        HitOutcome::Correct {
            pos: bubble.pos,
            delta,
        }
    } else {
        log::debug!("Wrong: {} (score {})", bubble.meaning, state.score);
        HitOutcome::Wrong {
            pos: bubble.pos,
            delta,
        }
    }
}
