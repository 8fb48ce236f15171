//! Spawn policy
//!
//! Decides what each spawn batch contains. The correct answer is held back
//! for a short grace period after the target changes, then guaranteed: if no
//! correct bubble is live, the next batch always carries exactly one.

use rand::Rng;

use super::bubble::Bubble;
use super::state::GameState;
use crate::consts::DISTRACTOR_PLACEHOLDER;
use crate::vocab::VocabEntry;

/// Which rule applies to the next batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnDecision {
    /// Target just changed: distractors only
    Grace,
    /// No correct bubble live: one correct plus distractors
    Guarantee,
    /// Correct bubble already live: keep density up with distractors
    Maintain,
}

/// Contents of one spawn batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnBatch {
    pub correct: bool,
    pub distractors: u32,
}

/// Evaluate the policy rules in order
pub fn decide(state: &GameState) -> SpawnDecision {
    if state.in_grace_period() {
        SpawnDecision::Grace
    } else if !state.has_live_correct() {
        SpawnDecision::Guarantee
    } else {
        SpawnDecision::Maintain
    }
}

/// Roll the batch size for a decision
pub fn plan_batch<R: Rng + ?Sized>(decision: SpawnDecision, rng: &mut R) -> SpawnBatch {
    match decision {
        SpawnDecision::Grace => SpawnBatch {
            correct: false,
            distractors: rng.random_range(0..=1),
        },
        SpawnDecision::Guarantee => SpawnBatch {
            correct: true,
            distractors: rng.random_range(1..=2),
        },
        SpawnDecision::Maintain => SpawnBatch {
            correct: false,
            distractors: rng.random_range(0..=2),
        },
    }
}

/// Meaning text for a distractor bubble
///
/// Draws a random entry; if its meaning matches the target's (duplicate
/// meanings exist in real word lists) the placeholder is shown instead.
pub fn pick_distractor<R: Rng + ?Sized>(
    vocab: &[VocabEntry],
    target_meaning: &str,
    rng: &mut R,
) -> String {
    if vocab.is_empty() {
        return DISTRACTOR_PLACEHOLDER.to_string();
    }
    let entry = &vocab[rng.random_range(0..vocab.len())];
    if entry.meaning == target_meaning {
        DISTRACTOR_PLACEHOLDER.to_string()
    } else {
        entry.meaning.clone()
    }
}

/// Decide, plan and launch one batch. Returns what was spawned.
pub fn spawn_batch(state: &mut GameState) -> SpawnBatch {
    let Some(target_meaning) = state.target_entry().map(|e| e.meaning.clone()) else {
        return SpawnBatch {
            correct: false,
            distractors: 0,
        };
    };

    let decision = decide(state);
    let mut batch = plan_batch(decision, &mut state.rng);

    // Optional distractors respect the live cap; the guaranteed answer does not
    let live = state.bubbles.len() + usize::from(batch.correct);
    let room = state.tuning.max_bubbles.saturating_sub(live) as u32;
    batch.distractors = batch.distractors.min(room);

    let gravity = state.gravity();
    let area = state.play_area;

    for _ in 0..batch.distractors {
        let meaning = pick_distractor(&state.vocab, &target_meaning, &mut state.rng);
        let id = state.next_entity_id();
        let bubble = Bubble::launch(id, meaning, false, area, gravity, &state.tuning, &mut state.rng);
        state.bubbles.push(bubble);
    }
    // Correct answer last so it draws on top of its own batch
    if batch.correct {
        let id = state.next_entity_id();
        let bubble = Bubble::launch(
            id,
            target_meaning,
            true,
            area,
            gravity,
            &state.tuning,
            &mut state.rng,
        );
        state.bubbles.push(bubble);
    }

    log::debug!(
        "Spawn {:?}: correct={} distractors={} live={}",
        decision,
        batch.correct,
        batch.distractors,
        state.bubbles.len()
    );
    batch
}

/// Ticks until the next batch. Short while a correct answer is still owed.
pub fn next_interval(state: &mut GameState) -> u32 {
    if !state.has_live_correct() {
        return state.tuning.guarantee_interval_ticks();
    }
    let (lo, hi) = state.tuning.spawn_interval_ticks();
    state.rng.random_range(lo..=hi)
}

/// Count down the spawn timer; fire a batch when it runs out
pub fn update_spawner(state: &mut GameState) {
    if state.spawn_cooldown > 0 {
        state.spawn_cooldown -= 1;
        return;
    }
    spawn_batch(state);
    // The tick that fires counts toward the interval
    state.spawn_cooldown = next_interval(state).saturating_sub(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::deck::pick_next;
    use crate::tuning::Tuning;
    use crate::vocab::demo_vocabulary;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn running_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Tuning::default());
        state.set_vocabulary(demo_vocabulary());
        state.scheduler.reshuffle(&mut state.rng);
        pick_next(&mut state);
        state
    }

    fn past_grace(state: &mut GameState) {
        state.time_ticks = state.target_changed_tick + state.tuning.grace_ticks() as u64;
    }

    #[test]
    fn test_grace_batch_has_no_correct_bubble() {
        for seed in 0..50 {
            let mut state = running_state(seed);
            assert_eq!(decide(&state), SpawnDecision::Grace);
            let batch = spawn_batch(&mut state);
            assert!(!batch.correct);
            assert!(batch.distractors <= 1);
            assert!(!state.has_live_correct());
        }
    }

    #[test]
    fn test_guarantee_batch_has_exactly_one_correct() {
        for seed in 0..50 {
            let mut state = running_state(seed);
            past_grace(&mut state);
            assert_eq!(decide(&state), SpawnDecision::Guarantee);
            let batch = spawn_batch(&mut state);
            assert!(batch.correct);
            assert!((1..=2).contains(&batch.distractors));
            assert_eq!(state.bubbles.iter().filter(|b| b.is_correct).count(), 1);
        }
    }

    #[test]
    fn test_maintain_batch_adds_only_distractors() {
        for seed in 0..50 {
            let mut state = running_state(seed);
            past_grace(&mut state);
            spawn_batch(&mut state);
            assert_eq!(decide(&state), SpawnDecision::Maintain);
            let batch = spawn_batch(&mut state);
            assert!(!batch.correct);
            assert!(batch.distractors <= 2);
            assert_eq!(state.bubbles.iter().filter(|b| b.is_correct).count(), 1);
        }
    }

    #[test]
    fn test_correct_bubble_carries_target_meaning() {
        let mut state = running_state(11);
        past_grace(&mut state);
        spawn_batch(&mut state);
        let target = state.target_entry().unwrap().meaning.clone();
        for b in &state.bubbles {
            if b.is_correct {
                assert_eq!(b.meaning, target);
            } else {
                assert_ne!(b.meaning, target);
            }
        }
    }

    #[test]
    fn test_distractor_placeholder_on_duplicate_meaning() {
        let vocab = vec![VocabEntry::new("big", "大"), VocabEntry::new("large", "大")];
        let mut rng = Pcg32::seed_from_u64(0);
        for _ in 0..20 {
            assert_eq!(pick_distractor(&vocab, "大", &mut rng), DISTRACTOR_PLACEHOLDER);
        }
    }

    #[test]
    fn test_cap_limits_distractors_not_correct() {
        let mut state = running_state(4);
        state.tuning.max_bubbles = 0;
        past_grace(&mut state);
        let batch = spawn_batch(&mut state);
        assert!(batch.correct);
        assert_eq!(batch.distractors, 0);
        assert_eq!(state.bubbles.len(), 1);
    }

    #[test]
    fn test_interval_shortened_while_guarantee_pending() {
        let mut state = running_state(8);
        assert_eq!(next_interval(&mut state), state.tuning.guarantee_interval_ticks());

        past_grace(&mut state);
        spawn_batch(&mut state);
        let (lo, hi) = state.tuning.spawn_interval_ticks();
        for _ in 0..20 {
            let n = next_interval(&mut state);
            assert!((lo..=hi).contains(&n));
        }
    }

    #[test]
    fn test_no_target_spawns_nothing() {
        let mut state = GameState::new(1, Tuning::default());
        let batch = spawn_batch(&mut state);
        assert_eq!(batch.distractors, 0);
        assert!(!batch.correct);
        assert!(state.bubbles.is_empty());
    }
}
