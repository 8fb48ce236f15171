//! Word scheduling
//!
//! Targets are drawn from a shuffled deck of vocabulary indices so every word
//! comes up once per pass. A fresh shuffle may repeat the last word of the
//! previous pass; that boundary repeat is allowed.

use rand::Rng;
use rand::seq::SliceRandom;

use super::state::{GameEvent, GameState};
use crate::consts::DISTRACTOR_PLACEHOLDER;

/// Shuffled, non-repeating draw order over `0..len`
#[derive(Debug, Clone, Default)]
pub struct WordScheduler {
    /// Remaining draws; popped from the back
    order: Vec<usize>,
    len: usize,
}

impl WordScheduler {
    pub fn new(len: usize) -> Self {
        Self {
            order: Vec::with_capacity(len),
            len,
        }
    }

    /// Number of entries covered by one pass
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Draws left before the next reshuffle
    pub fn remaining(&self) -> usize {
        self.order.len()
    }

    /// Discard the current pass and shuffle a full new one
    pub fn reshuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.order.clear();
        self.order.extend(0..self.len);
        self.order.shuffle(rng);
    }

    /// Next index, reshuffling first when the pass is exhausted
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        if self.order.is_empty() {
            self.reshuffle(rng);
        }
        self.order.pop()
    }
}

/// Advance to the next target word and restart the grace period
pub fn pick_next(state: &mut GameState) -> Option<usize> {
    let index = state.scheduler.draw(&mut state.rng)?;
    state.target = Some(index);
    state.target_changed_tick = state.time_ticks;

    // Live distractors must not show the new answer
    let meaning = &state.vocab[index].meaning;
    for bubble in state.bubbles.iter_mut() {
        if !bubble.is_correct && bubble.meaning == *meaning {
            bubble.meaning = DISTRACTOR_PLACEHOLDER.to_string();
        }
    }

    let word = state.vocab[index].word.clone();
    log::debug!("Target: {} ({} left in deck)", word, state.scheduler.remaining());
    state.events.push(GameEvent::TargetChanged { word });
    Some(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::bubble::Bubble;
    use crate::tuning::Tuning;
    use crate::vocab::demo_vocabulary;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_empty_scheduler_draws_nothing() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut deck = WordScheduler::new(0);
        assert_eq!(deck.draw(&mut rng), None);
    }

    #[test]
    fn test_draw_refills_when_exhausted() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut deck = WordScheduler::new(3);
        for _ in 0..3 {
            deck.draw(&mut rng).unwrap();
        }
        assert_eq!(deck.remaining(), 0);
        assert!(deck.draw(&mut rng).is_some());
        assert_eq!(deck.remaining(), 2);
    }

    #[test]
    fn test_pick_next_sets_target_and_grace() {
        let mut state = GameState::new(3, Tuning::default());
        state.set_vocabulary(demo_vocabulary());
        state.time_ticks = 500;

        let index = pick_next(&mut state).unwrap();
        assert_eq!(state.target, Some(index));
        assert_eq!(state.target_changed_tick, 500);
        assert!(state.in_grace_period());
        assert!(matches!(
            state.events.last(),
            Some(GameEvent::TargetChanged { word }) if *word == state.vocab[index].word
        ));
    }

    #[test]
    fn test_pick_next_relabels_stale_distractors() {
        let mut state = GameState::new(4, Tuning::default());
        state.set_vocabulary(demo_vocabulary());
        let mut rng = Pcg32::seed_from_u64(4);
        for entry in demo_vocabulary() {
            let id = state.next_entity_id();
            let mut bubble = Bubble::launch(id, entry.meaning, false, state.play_area, 0.25, &state.tuning, &mut rng);
            bubble.pos.y = 300.0;
            state.bubbles.push(bubble);
        }

        let index = pick_next(&mut state).unwrap();
        let meaning = state.vocab[index].meaning.clone();
        let placeholders = state
            .bubbles
            .iter()
            .filter(|b| b.meaning == DISTRACTOR_PLACEHOLDER)
            .count();
        assert_eq!(placeholders, 1);
        assert!(state.bubbles.iter().all(|b| b.meaning != meaning));
        assert_eq!(state.bubbles.len(), demo_vocabulary().len());
    }

    proptest! {
        #[test]
        fn prop_each_pass_covers_every_entry_once(len in 1usize..64, seed: u64, passes in 1usize..4) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut deck = WordScheduler::new(len);
            deck.reshuffle(&mut rng);
            for _ in 0..passes {
                let mut seen = vec![0u32; len];
                for _ in 0..len {
                    seen[deck.draw(&mut rng).unwrap()] += 1;
                }
                prop_assert!(seen.iter().all(|&n| n == 1));
            }
        }
    }
}
