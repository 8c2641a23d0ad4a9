use crate::client::session::SessionIdentity;
use crate::games::timers::{Millis, TimerSet};
use crate::games::{Round, RoundOutcome};
use crate::models::score::TestType;
use rand::seq::SliceRandom;
use rand::Rng;

pub const WORD_BANK: [&str; 60] = [
    "apple", "banana", "orange", "table", "chair", "window", "river", "mountain", "dog", "cat",
    "house", "car", "book", "phone", "computer", "garden", "flower", "sun", "moon", "star",
    "bread", "butter", "cheese", "milk", "coffee", "tea", "shoe", "sock", "shirt", "pants",
    "key", "door", "lamp", "clock", "glass", "plate", "knife", "spoon", "fork", "tree",
    "road", "bridge", "train", "plane", "boat", "island", "ocean", "cloud", "rain", "snow",
    "music", "song", "dance", "movie", "actor", "artist", "storm", "wind", "fire", "earth",
];

pub const SEQUENCE_LEN: usize = 10;
pub const GRID_SIZE: usize = 25;
pub const WORD_INTERVAL_MS: Millis = 900;
pub const RECALL_DELAY_MS: Millis = 300;

/// Draws the words to memorise, without replacement.
pub fn draw_sequence<R: Rng>(rng: &mut R) -> Vec<&'static str> {
    WORD_BANK
        .choose_multiple(rng, SEQUENCE_LEN)
        .copied()
        .collect()
}

/// The recall grid: every target plus distractors from the rest of the bank, shuffled.
pub fn build_recall_grid<R: Rng>(sequence: &[&'static str], rng: &mut R) -> Vec<&'static str> {
    let remaining: Vec<&'static str> = WORD_BANK
        .iter()
        .copied()
        .filter(|w| !sequence.contains(w))
        .collect();
    let distractors = GRID_SIZE.saturating_sub(sequence.len());

    let mut grid: Vec<&'static str> = sequence.to_vec();
    grid.extend(remaining.choose_multiple(rng, distractors).copied());
    grid.shuffle(rng);
    grid
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerbalState {
    Idle,
    Show,
    Recall,
    Result,
}

#[derive(Debug)]
enum VerbalTimer {
    Reveal(usize),
    Recall,
}

pub struct VerbalEngine {
    state: VerbalState,
    sequence: Vec<&'static str>,
    display_index: Option<usize>,
    grid: Vec<&'static str>,
    selected: Vec<&'static str>,
    correct: Option<usize>,
    timers: TimerSet<VerbalTimer>,
    identity: Option<SessionIdentity>,
}

impl VerbalEngine {
    pub fn new(identity: Option<SessionIdentity>) -> Self {
        VerbalEngine {
            state: VerbalState::Idle,
            sequence: Vec::new(),
            display_index: None,
            grid: Vec::new(),
            selected: Vec::new(),
            correct: None,
            timers: TimerSet::new(),
            identity,
        }
    }

    pub fn state(&self) -> VerbalState {
        self.state
    }

    pub fn sequence(&self) -> &[&'static str] {
        &self.sequence
    }

    /// The word on screen during the show phase.
    pub fn current_word(&self) -> Option<&'static str> {
        match (self.state, self.display_index) {
            (VerbalState::Show, Some(i)) => self.sequence.get(i).copied(),
            _ => None,
        }
    }

    /// Candidate words, available once recall begins.
    pub fn grid(&self) -> &[&'static str] {
        match self.state {
            VerbalState::Recall | VerbalState::Result => &self.grid,
            _ => &[],
        }
    }

    pub fn selected(&self) -> &[&'static str] {
        &self.selected
    }

    pub fn start<R: Rng>(&mut self, now: Millis, rng: &mut R) {
        self.timers.cancel_all();
        self.sequence = draw_sequence(rng);
        self.grid = build_recall_grid(&self.sequence, rng);
        self.selected.clear();
        self.correct = None;
        self.display_index = None;
        self.state = VerbalState::Show;

        for i in 0..self.sequence.len() {
            self.timers
                .schedule(now + i as Millis * WORD_INTERVAL_MS, VerbalTimer::Reveal(i));
        }
        let recall_at = now + self.sequence.len() as Millis * WORD_INTERVAL_MS + RECALL_DELAY_MS;
        self.timers.schedule(recall_at, VerbalTimer::Recall);
    }

    pub fn tick(&mut self, now: Millis) {
        while let Some(timer) = self.timers.pop_due(now) {
            match timer {
                VerbalTimer::Reveal(i) => self.display_index = Some(i),
                VerbalTimer::Recall => {
                    self.display_index = None;
                    self.state = VerbalState::Recall;
                }
            }
        }
    }

    /// Toggles a grid word during recall. Words not on the grid are ignored.
    pub fn toggle(&mut self, word: &str) {
        if self.state != VerbalState::Recall {
            return;
        }
        if let Some(pos) = self.selected.iter().position(|w| *w == word) {
            self.selected.remove(pos);
        } else if let Some(&w) = self.grid.iter().find(|w| **w == word) {
            self.selected.push(w);
        }
    }

    /// Scores the selection: one point per remembered target, distractors cost nothing.
    pub fn submit(&mut self) -> Option<RoundOutcome> {
        if self.state != VerbalState::Recall {
            return None;
        }
        let correct = self
            .selected
            .iter()
            .filter(|w| self.sequence.contains(*w))
            .count();
        self.correct = Some(correct);
        self.state = VerbalState::Result;

        Some(RoundOutcome::submitted(
            self.identity.as_ref(),
            TestType::VerbalMemory,
            correct as i64,
            format!(
                "You selected {} words, {} correct",
                self.selected.len(),
                correct
            ),
        ))
    }

    /// Back to the start screen from any phase.
    pub fn restart(&mut self) {
        self.timers.cancel_all();
        self.state = VerbalState::Idle;
        self.sequence.clear();
        self.grid.clear();
        self.selected.clear();
        self.correct = None;
        self.display_index = None;
    }
}

impl Round for VerbalEngine {
    fn test_type(&self) -> TestType {
        TestType::VerbalMemory
    }

    fn final_score(&self) -> Option<i64> {
        self.correct.map(|c| c as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::test_support::{player, rng};
    use crate::games::Submission;
    use std::collections::BTreeSet;

    fn in_recall(seed: u64) -> VerbalEngine {
        let mut engine = VerbalEngine::new(Some(player()));
        engine.start(0, &mut rng(seed));
        engine.tick(SEQUENCE_LEN as Millis * WORD_INTERVAL_MS + RECALL_DELAY_MS);
        assert_eq!(engine.state(), VerbalState::Recall);
        engine
    }

    #[test]
    fn word_bank_has_no_duplicates() {
        let unique: BTreeSet<_> = WORD_BANK.iter().collect();
        assert_eq!(unique.len(), WORD_BANK.len());
    }

    #[test]
    fn grid_holds_all_targets_without_duplicates() {
        for seed in 0..20 {
            let mut r = rng(seed);
            let sequence = draw_sequence(&mut r);
            let grid = build_recall_grid(&sequence, &mut r);

            assert_eq!(sequence.len(), SEQUENCE_LEN);
            assert!(grid.len() <= GRID_SIZE);
            let unique: BTreeSet<_> = grid.iter().collect();
            assert_eq!(unique.len(), grid.len());
            assert!(sequence.iter().all(|w| grid.contains(w)));
        }
    }

    #[test]
    fn words_are_shown_one_at_a_time() {
        let mut engine = VerbalEngine::new(None);
        engine.start(0, &mut rng(1));
        let sequence = engine.sequence().to_vec();

        engine.tick(0);
        assert_eq!(engine.current_word(), Some(sequence[0]));
        assert!(engine.grid().is_empty());
        engine.tick(WORD_INTERVAL_MS * 3);
        assert_eq!(engine.current_word(), Some(sequence[3]));
    }

    #[test]
    fn score_counts_only_selected_targets() {
        let mut engine = in_recall(2);
        let targets = engine.sequence().to_vec();
        let distractors: Vec<_> = engine
            .grid()
            .iter()
            .copied()
            .filter(|w| !targets.contains(w))
            .collect();

        for w in &targets[..4] {
            engine.toggle(w);
        }
        for w in &distractors[..3] {
            engine.toggle(w);
        }
        engine.toggle(targets[0]); // deselect
        engine.toggle("not-a-word");

        let outcome = engine.submit().expect("submitted");
        assert_eq!(outcome.score, 3);
        assert!(outcome.score <= engine.selected().len() as i64);
        assert!(matches!(outcome.submission, Submission::Ready(ref s) if s.score == 3));
        assert_eq!(engine.final_score(), Some(3));
    }

    #[test]
    fn perfect_recall_caps_at_sequence_length() {
        let mut engine = in_recall(3);
        for w in engine.grid().to_vec() {
            engine.toggle(w);
        }
        let outcome = engine.submit().unwrap();
        assert_eq!(outcome.score, SEQUENCE_LEN as i64);
    }

    #[test]
    fn restart_cancels_pending_reveals() {
        let mut engine = VerbalEngine::new(None);
        engine.start(0, &mut rng(4));
        engine.restart();
        engine.tick(60_000);
        assert_eq!(engine.state(), VerbalState::Idle);
        assert_eq!(engine.submit(), None);
    }
}
