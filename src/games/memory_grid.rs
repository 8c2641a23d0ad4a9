use crate::client::session::SessionIdentity;
use crate::games::timers::{Millis, TimerSet};
use crate::games::{Round, RoundOutcome};
use crate::models::score::TestType;
use rand::seq::index::sample;
use rand::Rng;
use std::collections::BTreeSet;

pub const GRID_CELLS: usize = 16;
pub const REVEAL_INTERVAL_MS: Millis = 800;
pub const HIGHLIGHT_MS: Millis = 600;
pub const PLAY_DELAY_MS: Millis = 300;
pub const NEXT_LEVEL_COOLDOWN_MS: Millis = 1_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridState {
    Watch,
    Play,
    Win { at: Millis },
    Lose,
}

#[derive(Debug)]
enum GridTimer {
    Highlight(usize),
    Clear,
    Play,
}

/// Number of cells to memorise on `level`, capped by the grid size.
pub fn pattern_len(level: u32) -> usize {
    (level as usize + 2).min(GRID_CELLS)
}

/// Distinct cell indices, drawn uniformly without replacement.
pub fn generate_pattern<R: Rng>(level: u32, rng: &mut R) -> Vec<usize> {
    sample(rng, GRID_CELLS, pattern_len(level)).into_vec()
}

pub struct MemoryGridEngine {
    level: u32,
    pattern: Vec<usize>,
    selected: BTreeSet<usize>,
    highlighted: Option<usize>,
    state: GridState,
    timers: TimerSet<GridTimer>,
    identity: Option<SessionIdentity>,
    last_score: Option<i64>,
}

impl MemoryGridEngine {
    /// Creates the engine and begins showing the level 1 pattern at `now`.
    pub fn new<R: Rng>(identity: Option<SessionIdentity>, now: Millis, rng: &mut R) -> Self {
        let mut engine = MemoryGridEngine {
            level: 1,
            pattern: Vec::new(),
            selected: BTreeSet::new(),
            highlighted: None,
            state: GridState::Watch,
            timers: TimerSet::new(),
            identity,
            last_score: None,
        };
        engine.start_level(now, rng);
        engine
    }

    fn start_level<R: Rng>(&mut self, now: Millis, rng: &mut R) {
        self.timers.cancel_all();
        self.pattern = generate_pattern(self.level, rng);
        self.selected.clear();
        self.highlighted = None;
        self.state = GridState::Watch;

        for (i, &cell) in self.pattern.iter().enumerate() {
            let shown_at = now + i as Millis * REVEAL_INTERVAL_MS;
            self.timers.schedule(shown_at, GridTimer::Highlight(cell));
            self.timers.schedule(shown_at + HIGHLIGHT_MS, GridTimer::Clear);
        }
        let play_at = now + self.pattern.len() as Millis * REVEAL_INTERVAL_MS + PLAY_DELAY_MS;
        self.timers.schedule(play_at, GridTimer::Play);
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn state(&self) -> GridState {
        self.state
    }

    pub fn pattern(&self) -> &[usize] {
        &self.pattern
    }

    /// Cell currently lit during the watch phase.
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn selected(&self) -> &BTreeSet<usize> {
        &self.selected
    }

    pub fn tick(&mut self, now: Millis) {
        while let Some(timer) = self.timers.pop_due(now) {
            match timer {
                GridTimer::Highlight(cell) => self.highlighted = Some(cell),
                GridTimer::Clear => self.highlighted = None,
                GridTimer::Play => {
                    self.highlighted = None;
                    self.state = GridState::Play;
                }
            }
        }
    }

    /// Selects a cell. Only membership in the pattern matters, not order.
    pub fn select(&mut self, cell: usize, now: Millis) -> Option<RoundOutcome> {
        if self.state != GridState::Play || cell >= GRID_CELLS || self.selected.contains(&cell) {
            return None;
        }

        if !self.pattern.contains(&cell) {
            self.state = GridState::Lose;
            let score = i64::from(self.level) - 1;
            self.last_score = Some(score);
            return Some(RoundOutcome::submitted(
                self.identity.as_ref(),
                TestType::MemoryTest,
                score,
                format!("Wrong tile! You reached level {}", self.level),
            ));
        }

        self.selected.insert(cell);
        if self.selected.len() == self.pattern.len() {
            self.state = GridState::Win { at: now };
            let score = i64::from(self.level);
            self.last_score = Some(score);
            return Some(RoundOutcome::local(
                TestType::MemoryTest,
                score,
                "Great memory! Next level...".to_string(),
            ));
        }
        None
    }

    /// Moves to the next level after a win, once the cooldown has passed.
    pub fn next_level<R: Rng>(&mut self, now: Millis, rng: &mut R) -> bool {
        match self.state {
            GridState::Win { at } if now >= at + NEXT_LEVEL_COOLDOWN_MS => {
                self.level += 1;
                self.start_level(now, rng);
                true
            }
            _ => false,
        }
    }

    pub fn restart<R: Rng>(&mut self, now: Millis, rng: &mut R) {
        self.level = 1;
        self.last_score = None;
        self.start_level(now, rng);
    }
}

impl Round for MemoryGridEngine {
    fn test_type(&self) -> TestType {
        TestType::MemoryTest
    }

    fn final_score(&self) -> Option<i64> {
        match self.state {
            GridState::Win { .. } | GridState::Lose => self.last_score,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::test_support::{player, rng};
    use crate::games::Submission;

    fn play_phase(engine: &mut MemoryGridEngine) -> Millis {
        let at = engine.pattern().len() as Millis * REVEAL_INTERVAL_MS + PLAY_DELAY_MS;
        engine.tick(at);
        assert_eq!(engine.state(), GridState::Play);
        at
    }

    #[test]
    fn pattern_has_level_plus_two_distinct_cells() {
        let mut r = rng(11);
        for level in 1..=14 {
            let pattern = generate_pattern(level, &mut r);
            assert_eq!(pattern.len(), level as usize + 2);
            let unique: BTreeSet<_> = pattern.iter().copied().collect();
            assert_eq!(unique.len(), pattern.len());
            assert!(pattern.iter().all(|&c| c < GRID_CELLS));
        }
        assert_eq!(generate_pattern(40, &mut r).len(), GRID_CELLS);
    }

    #[test]
    fn watch_phase_reveals_each_cell_then_clears() {
        let mut engine = MemoryGridEngine::new(None, 0, &mut rng(1));
        let pattern = engine.pattern().to_vec();

        engine.tick(0);
        assert_eq!(engine.highlighted(), Some(pattern[0]));
        engine.tick(HIGHLIGHT_MS);
        assert_eq!(engine.highlighted(), None);
        engine.tick(REVEAL_INTERVAL_MS);
        assert_eq!(engine.highlighted(), Some(pattern[1]));
        assert_eq!(engine.state(), GridState::Watch);

        // Clicks are ignored until play starts.
        assert_eq!(engine.select(pattern[0], REVEAL_INTERVAL_MS), None);
        assert!(engine.selected().is_empty());
    }

    #[test]
    fn selecting_pattern_in_any_order_wins() {
        let mut engine = MemoryGridEngine::new(Some(player()), 0, &mut rng(2));
        let now = play_phase(&mut engine);
        let mut pattern = engine.pattern().to_vec();
        pattern.reverse();

        let last = pattern.pop().unwrap();
        for cell in pattern {
            assert_eq!(engine.select(cell, now), None);
        }
        let outcome = engine.select(last, now).expect("round won");
        assert_eq!(outcome.score, 1);
        assert_eq!(outcome.submission, Submission::Skipped);
        assert_eq!(engine.state(), GridState::Win { at: now });
    }

    #[test]
    fn wrong_cell_loses_with_previous_level() {
        let mut r = rng(3);
        let mut engine = MemoryGridEngine::new(Some(player()), 0, &mut r);
        let now = play_phase(&mut engine);
        for cell in engine.pattern().to_vec() {
            engine.select(cell, now);
        }
        assert!(engine.next_level(now + NEXT_LEVEL_COOLDOWN_MS, &mut r));
        assert_eq!(engine.level(), 2);

        let start = now + NEXT_LEVEL_COOLDOWN_MS;
        engine.tick(start + engine.pattern().len() as Millis * REVEAL_INTERVAL_MS + PLAY_DELAY_MS);
        let wrong = (0..GRID_CELLS)
            .find(|c| !engine.pattern().contains(c))
            .unwrap();
        let outcome = engine.select(wrong, start + 5_000).expect("round lost");

        assert_eq!(engine.state(), GridState::Lose);
        assert_eq!(outcome.score, 1);
        assert!(matches!(outcome.submission, Submission::Ready(ref s) if s.score == 1));
        assert_eq!(engine.final_score(), Some(1));
    }

    #[test]
    fn next_level_waits_for_cooldown() {
        let mut r = rng(4);
        let mut engine = MemoryGridEngine::new(None, 0, &mut r);
        let now = play_phase(&mut engine);
        for cell in engine.pattern().to_vec() {
            engine.select(cell, now);
        }

        assert!(!engine.next_level(now + 10, &mut r));
        assert!(engine.next_level(now + NEXT_LEVEL_COOLDOWN_MS, &mut r));
        assert!(!engine.next_level(now + NEXT_LEVEL_COOLDOWN_MS + 1, &mut r));
        assert_eq!(engine.level(), 2);
        assert_eq!(engine.pattern().len(), 4);
    }

    #[test]
    fn restart_discards_pending_reveals() {
        let mut r = rng(5);
        let mut engine = MemoryGridEngine::new(None, 0, &mut r);
        engine.restart(10_000, &mut r);

        // Timers from the first round would have switched to play by now.
        engine.tick(9_999);
        assert_eq!(engine.state(), GridState::Watch);
        assert_eq!(engine.highlighted(), None);
        assert_eq!(engine.level(), 1);
    }
}
