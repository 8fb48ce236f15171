//! Fixed timestep simulation tick
//!
//! Core game loop: round start, per-step update and the countdown that ends
//! the round.

use glam::Vec2;

use super::collision::{find_hit, handle_hit};
use super::deck::pick_next;
use super::effects::update_effects;
use super::spawn::update_spawner;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::SIM_HZ;
use crate::vocab::{VocabError, ensure_playable};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Taps since the last tick, in play-area coordinates
    pub taps: Vec<Vec2>,
    /// Demo mode - the game taps correct answers by itself
    pub autoplay: bool,
}

/// Begin a round: Idle/Over -> Running
///
/// Refuses with `InsufficientVocabulary` (phase unchanged) when fewer than
/// four entries are loaded. Starting while already running does nothing.
pub fn start(state: &mut GameState) -> Result<(), VocabError> {
    if state.phase == GamePhase::Running {
        return Ok(());
    }
    if let Err(e) = ensure_playable(&state.vocab) {
        log::warn!("Start refused: {}", e);
        return Err(e);
    }

    state.score = 0;
    state.time_remaining = state.round_secs;
    state.second_ticks = 0;
    state.catch_up_secs = 0.0;
    state.time_ticks = 0;
    state.spawn_cooldown = 0;
    state.bubbles.clear();
    state.particles.clear();
    state.rings.clear();
    state.floating_texts.clear();
    state.events.clear();

    state.scheduler.reshuffle(&mut state.rng);
    pick_next(state);
    state.phase = GamePhase::Running;

    log::info!(
        "Round started: {} words, {}s, fall speed {:.1}",
        state.vocab.len(),
        state.round_secs,
        state.fall_speed
    );
    Ok(())
}

/// Advance the game state by one fixed step of `SIM_DT`
pub fn tick(state: &mut GameState, input: &TickInput) {
    // Only a running round changes
    if state.phase != GamePhase::Running {
        return;
    }

    for &tap in &input.taps {
        handle_hit(state, tap);
    }
    if input.autoplay {
        autoplay_tap(state);
    }

    state.time_ticks += 1;

    // Bubble physics; anything that fell out unhit is simply gone
    let height = state.play_area.y;
    let margin = state.tuning.despawn_margin;
    for bubble in state.bubbles.iter_mut() {
        bubble.update();
    }
    state.bubbles.retain(|b| {
        let gone = b.is_gone(height, margin);
        if gone {
            log::debug!("Missed bubble: {} (correct={})", b.meaning, b.is_correct);
        }
        !gone
    });

    update_effects(state);
    update_spawner(state);

    run_countdown(state, 1);
}

/// Count down real time the physics clamp skipped (seconds)
///
/// Bubbles stay put; only the round timer moves, so a throttled tab still
/// ends the round on wall-clock time.
pub fn catch_up(state: &mut GameState, secs: f64) {
    if state.phase != GamePhase::Running || secs.is_nan() || secs <= 0.0 {
        return;
    }
    state.catch_up_secs += secs;
    let ticks = (state.catch_up_secs * SIM_HZ as f64).floor();
    state.catch_up_secs -= ticks / SIM_HZ as f64;
    run_countdown(state, ticks.min(u32::MAX as f64) as u32);
}

/// Countdown: one second is exactly SIM_HZ steps
fn run_countdown(state: &mut GameState, ticks: u32) {
    state.second_ticks = state.second_ticks.saturating_add(ticks);
    while state.second_ticks >= SIM_HZ {
        state.second_ticks -= SIM_HZ;
        state.time_remaining = state.time_remaining.saturating_sub(1);
        if state.time_remaining == 0 {
            state.second_ticks = 0;
            finish(state);
            return;
        }
    }
}

/// Running -> Over: freeze the round and report the final score
fn finish(state: &mut GameState) {
    state.phase = GamePhase::Over;
    let final_score = state.score;
    state.events.push(GameEvent::GameOver { final_score });
    log::info!("Round over: final score {}", final_score);

    if final_score > state.best_score {
        state.best_score = final_score;
        state.events.push(GameEvent::NewBest { score: final_score });
        log::info!("New best score: {}", final_score);
    }
}

/// Demo mode: pop the correct bubble once it has slowed near its apex
///
/// Taps a point of the bubble that no newer bubble covers; waits if it is
/// fully hidden.
fn autoplay_tap(state: &mut GameState) {
    let view: &GameState = state;
    let threshold = view.tuning.autoplay_tap_speed;
    let Some(index) = view
        .bubbles
        .iter()
        .rposition(|b| b.is_correct && b.vel.y > -threshold)
    else {
        return;
    };

    let bubble = &view.bubbles[index];
    let reach = bubble.radius * 0.8;
    let probe = [
        Vec2::ZERO,
        Vec2::new(-reach, 0.0),
        Vec2::new(reach, 0.0),
        Vec2::new(0.0, -reach),
        Vec2::new(0.0, reach),
    ]
    .into_iter()
    .map(|offset| bubble.pos + offset)
    .find(|&p| find_hit(view, p) == Some(index));

    if let Some(pos) = probe {
        handle_hit(state, pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::Settings;
    use crate::sim::clock::FrameClock;
    use crate::sim::spawn::{SpawnDecision, decide};
    use crate::tuning::Tuning;
    use crate::vocab::{VocabEntry, demo_vocabulary};

    fn animals() -> Vec<VocabEntry> {
        vec![
            VocabEntry::new("cat", "猫"),
            VocabEntry::new("dog", "狗"),
            VocabEntry::new("bird", "鸟"),
            VocabEntry::new("fish", "鱼"),
        ]
    }

    fn new_state(seed: u64, vocab: Vec<VocabEntry>, speed: f32, secs: u32) -> GameState {
        let mut state = GameState::new(seed, Tuning::default());
        state.set_vocabulary(vocab);
        state.apply_settings(&Settings {
            fall_speed: speed,
            round_secs: secs,
            ..Default::default()
        });
        state
    }

    fn run_secs(state: &mut GameState, secs: u32) {
        let input = TickInput::default();
        for _ in 0..secs * SIM_HZ {
            tick(state, &input);
        }
    }

    #[test]
    fn test_start_requires_four_entries() {
        let mut vocab = animals();
        vocab.pop();
        let mut state = new_state(1, vocab, 1.0, 30);

        let err = start(&mut state).unwrap_err();
        assert!(matches!(err, VocabError::InsufficientVocabulary { found: 3, .. }));
        assert_eq!(state.phase, GamePhase::Idle);
        assert!(state.target.is_none());
    }

    #[test]
    fn test_start_resets_session() {
        let mut state = new_state(2, animals(), 1.0, 30);
        start(&mut state).unwrap();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.time_remaining, 30);
        assert!(state.target.is_some());
        assert_eq!(state.scheduler.remaining(), 3);
    }

    #[test]
    fn test_idle_tick_is_inert() {
        let mut state = new_state(3, animals(), 1.0, 30);
        run_secs(&mut state, 2);
        assert_eq!(state.time_ticks, 0);
        assert!(state.bubbles.is_empty());
    }

    #[test]
    fn test_round_ends_exactly_once() {
        let mut state = new_state(4, demo_vocabulary(), 1.0, 60);
        start(&mut state).unwrap();
        state.drain_events();

        let input = TickInput::default();
        for second in 1..=60u32 {
            for _ in 0..SIM_HZ {
                tick(&mut state, &input);
            }
            assert_eq!(state.time_remaining, 60 - second);
        }
        assert_eq!(state.phase, GamePhase::Over);

        let events = state.drain_events();
        let overs = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);

        // Frozen afterwards
        let bubbles = state.bubbles.len();
        let ticks = state.time_ticks;
        let score = state.score;
        let tap = TickInput {
            taps: vec![Vec2::new(400.0, 300.0)],
            autoplay: true,
        };
        for _ in 0..SIM_HZ * 5 {
            tick(&mut state, &tap);
        }
        assert_eq!(state.bubbles.len(), bubbles);
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.score, score);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_countdown_independent_of_frame_rate() {
        let mut a = new_state(5, demo_vocabulary(), 1.0, 30);
        let mut b = a.clone();
        start(&mut a).unwrap();
        start(&mut b).unwrap();

        // a: steady 60 fps; b: irregular 20-200 ms frames
        let input = TickInput::default();
        let mut clock_a = FrameClock::new();
        let mut clock_b = FrameClock::new();
        let pattern = [0.02f32, 0.2, 0.05, 0.133, 0.09];
        let mut elapsed = 0.0f32;
        let mut i = 0;
        while elapsed < 10.0 {
            let dt = pattern[i % pattern.len()];
            for _ in 0..clock_b.advance(dt) {
                tick(&mut b, &input);
            }
            elapsed += dt;
            i += 1;
        }
        for _ in 0..(elapsed / SIM_DT).round() as u32 {
            for _ in 0..clock_a.advance(SIM_DT) {
                tick(&mut a, &input);
            }
        }
        assert!((a.time_remaining as i32 - b.time_remaining as i32).abs() <= 1);
        assert!((19..=20).contains(&b.time_remaining));
    }

    #[test]
    fn test_countdown_tracks_wall_clock_at_low_fps() {
        let mut state = new_state(10, demo_vocabulary(), 1.0, 60);
        start(&mut state).unwrap();

        // 20 s of real time at 2 fps
        let input = TickInput::default();
        let mut clock = FrameClock::new();
        for _ in 0..40 {
            for _ in 0..clock.advance(0.5) {
                tick(&mut state, &input);
            }
            catch_up(&mut state, clock.take_backlog());
        }
        assert!((40..=41).contains(&state.time_remaining), "remaining {}", state.time_remaining);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_catch_up_ends_round_once() {
        let mut state = new_state(11, animals(), 1.0, 30);
        start(&mut state).unwrap();
        state.drain_events();
        let bubbles_before = state.bubbles.len();

        catch_up(&mut state, 120.0);
        assert_eq!(state.phase, GamePhase::Over);
        assert_eq!(state.time_remaining, 0);
        assert_eq!(state.bubbles.len(), bubbles_before);

        catch_up(&mut state, 10.0);
        let overs = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
    }

    #[test]
    fn test_catch_up_keeps_fractions() {
        let mut state = new_state(12, animals(), 1.0, 30);
        start(&mut state).unwrap();
        for _ in 0..10 {
            catch_up(&mut state, 0.25);
        }
        assert_eq!(state.time_remaining, 28);
        assert_eq!(state.second_ticks, 30);
        catch_up(&mut state, 0.5);
        assert_eq!(state.time_remaining, 27);
        catch_up(&mut state, f64::NAN);
        assert_eq!(state.time_remaining, 27);
    }

    #[test]
    fn test_no_distractor_shows_new_target_after_hit() {
        for seed in 0..200 {
            let mut state = new_state(seed, animals(), 1.0, 30);
            start(&mut state).unwrap();
            let input = TickInput::default();
            run_secs(&mut state, 1);
            while !state.has_live_correct() {
                tick(&mut state, &input);
            }

            let pos = state.bubbles.iter().find(|b| b.is_correct).unwrap().pos;
            tick(&mut state, &TickInput { taps: vec![pos], autoplay: false });
            let meaning = state.target_entry().unwrap().meaning.clone();
            assert!(
                state.bubbles.iter().all(|b| b.is_correct || b.meaning != meaning),
                "seed {}",
                seed
            );
        }
    }

    #[test]
    fn test_correct_bubble_guaranteed_after_grace() {
        for seed in 0..20 {
            let mut state = new_state(seed, demo_vocabulary(), 1.0, 60);
            start(&mut state).unwrap();

            // During grace nothing correct may be live
            let grace = state.tuning.grace_ticks();
            let input = TickInput::default();
            for _ in 0..grace - 1 {
                tick(&mut state, &input);
                assert!(!state.has_live_correct());
            }

            // Within one spawn interval after grace, it appears
            let (_, max_interval) = state.tuning.spawn_interval_ticks();
            let mut appeared = false;
            for _ in 0..max_interval + 1 {
                tick(&mut state, &input);
                if state.has_live_correct() {
                    appeared = true;
                    break;
                }
            }
            assert!(appeared, "seed {}", seed);
        }
    }

    #[test]
    fn test_end_to_end_animals() {
        let mut state = new_state(42, animals(), 1.0, 30);
        start(&mut state).unwrap();

        let first = state.target_word().to_string();
        assert!(["cat", "dog", "bird", "fish"].contains(&first.as_str()));
        assert_eq!(decide(&state), SpawnDecision::Grace);

        // First batch fires immediately and withholds the answer
        let input = TickInput::default();
        tick(&mut state, &input);
        assert!(!state.has_live_correct());

        let mut ticks = 0;
        while !state.has_live_correct() {
            tick(&mut state, &input);
            ticks += 1;
            assert!(ticks < 2 * SIM_HZ, "correct bubble never appeared");
        }

        let pos = state.bubbles.iter().find(|b| b.is_correct).unwrap().pos;
        tick(&mut state, &TickInput { taps: vec![pos], autoplay: false });
        assert_eq!(state.score, 10);
        assert_ne!(state.target_word(), first);
    }

    #[test]
    fn test_replay_from_over() {
        let mut state = new_state(6, animals(), 1.0, 30);
        start(&mut state).unwrap();
        state.score = 55;
        run_secs(&mut state, 30);
        assert_eq!(state.phase, GamePhase::Over);
        assert_eq!(state.best_score, 55);

        start(&mut state).unwrap();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.time_remaining, 30);
        assert!(state.bubbles.is_empty());
        assert_eq!(state.best_score, 55);
    }

    #[test]
    fn test_new_best_only_when_beaten() {
        let mut state = new_state(7, animals(), 1.0, 30);
        state.best_score = 100;
        start(&mut state).unwrap();
        state.score = 40;
        run_secs(&mut state, 30);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::GameOver { final_score: 40 }));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::NewBest { .. })));
        assert_eq!(state.best_score, 100);
    }

    #[test]
    fn test_autoplay_scores() {
        let mut state = new_state(8, demo_vocabulary(), 1.2, 30);
        start(&mut state).unwrap();
        let input = TickInput {
            taps: Vec::new(),
            autoplay: true,
        };
        for _ in 0..30 * SIM_HZ {
            tick(&mut state, &input);
        }
        assert_eq!(state.phase, GamePhase::Over);
        // Never pops a distractor
        assert!(state.score >= 50, "score {}", state.score);
        assert_eq!(state.score % 10, 0);
    }

    #[test]
    fn test_determinism() {
        let mut a = new_state(99999, demo_vocabulary(), 1.0, 30);
        let mut b = new_state(99999, demo_vocabulary(), 1.0, 30);
        start(&mut a).unwrap();
        start(&mut b).unwrap();
        let input = TickInput {
            taps: Vec::new(),
            autoplay: true,
        };
        for _ in 0..10 * SIM_HZ {
            tick(&mut a, &input);
            tick(&mut b, &input);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.target, b.target);
        assert_eq!(a.bubbles.len(), b.bubbles.len());
    }
}
