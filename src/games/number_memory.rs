use crate::client::local_store::KeyValueStore;
use crate::client::session::SessionIdentity;
use crate::games::timers::{Millis, TimerSet};
use crate::games::{Round, RoundOutcome};
use crate::models::score::TestType;
use rand::Rng;
use tracing::warn;

pub const BEST_LEVEL_KEY: &str = "bestNumberMemory";

/// How long the numeral stays on screen for `level`.
pub fn show_duration(level: u32) -> Millis {
    2_000 + Millis::from(level) * 500
}

/// A decimal numeral with exactly `digits` digits and no leading zero.
pub fn generate_numeral<R: Rng>(digits: u32, rng: &mut R) -> String {
    let digits = digits.max(1);
    let mut numeral = String::with_capacity(digits as usize);
    numeral.push(char::from(b'0' + rng.gen_range(1..=9u8)));
    for _ in 1..digits {
        numeral.push(char::from(b'0' + rng.gen_range(0..=9u8)));
    }
    numeral
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumberPhase {
    Show { started_at: Millis },
    Recall,
    Result { correct: bool },
}

#[derive(Debug)]
enum NumberTimer {
    Hide,
}

pub struct NumberMemoryEngine<S: KeyValueStore> {
    level: u32,
    // Captured at generation so later phase changes cannot alter the answer.
    numeral: String,
    phase: NumberPhase,
    best: u32,
    timers: TimerSet<NumberTimer>,
    identity: Option<SessionIdentity>,
    store: S,
    last_score: Option<i64>,
}

impl<S: KeyValueStore> NumberMemoryEngine<S> {
    pub fn new<R: Rng>(identity: Option<SessionIdentity>, store: S, now: Millis, rng: &mut R) -> Self {
        let best = store
            .get(BEST_LEVEL_KEY)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        let mut engine = NumberMemoryEngine {
            level: 1,
            numeral: String::new(),
            phase: NumberPhase::Recall,
            best,
            timers: TimerSet::new(),
            identity,
            store,
            last_score: None,
        };
        engine.start_level(now, rng);
        engine
    }

    fn start_level<R: Rng>(&mut self, now: Millis, rng: &mut R) {
        self.timers.cancel_all();
        self.numeral = generate_numeral(self.level, rng);
        self.phase = NumberPhase::Show { started_at: now };
        self.timers
            .schedule(now + show_duration(self.level), NumberTimer::Hide);
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn phase(&self) -> NumberPhase {
        self.phase
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The numeral, only while it is on screen.
    pub fn visible_numeral(&self) -> Option<&str> {
        match self.phase {
            NumberPhase::Show { .. } => Some(&self.numeral),
            _ => None,
        }
    }

    /// Remaining display time as a percentage, 100 at reveal and 0 when hidden.
    pub fn progress(&self, now: Millis) -> f64 {
        match self.phase {
            NumberPhase::Show { started_at } => {
                let elapsed = now.saturating_sub(started_at) as f64;
                let duration = show_duration(self.level) as f64;
                (100.0 - elapsed / duration * 100.0).max(0.0)
            }
            _ => 0.0,
        }
    }

    pub fn tick(&mut self, now: Millis) {
        while let Some(NumberTimer::Hide) = self.timers.pop_due(now) {
            if matches!(self.phase, NumberPhase::Show { .. }) {
                self.phase = NumberPhase::Recall;
            }
        }
    }

    /// Checks the player's answer. Ignored outside the recall phase.
    pub fn submit(&mut self, input: &str) -> Option<RoundOutcome> {
        if self.phase != NumberPhase::Recall {
            return None;
        }

        if input == self.numeral {
            self.phase = NumberPhase::Result { correct: true };
            self.last_score = Some(i64::from(self.level));
            if self.level > self.best {
                self.best = self.level;
                if let Err(err) = self.store.set(BEST_LEVEL_KEY, &self.best.to_string()) {
                    warn!(error = %err, "could not persist best number memory level");
                }
            }
            return Some(RoundOutcome::local(
                TestType::NumberMemory,
                i64::from(self.level),
                "Correct!".to_string(),
            ));
        }

        self.phase = NumberPhase::Result { correct: false };
        let score = i64::from(self.level) - 1;
        self.last_score = Some(score);
        Some(RoundOutcome::submitted(
            self.identity.as_ref(),
            TestType::NumberMemory,
            score,
            format!("Wrong! It was {}", self.numeral),
        ))
    }

    /// "Next level" after a correct answer, "try again" from level 1 otherwise.
    pub fn next<R: Rng>(&mut self, now: Millis, rng: &mut R) {
        match self.phase {
            NumberPhase::Result { correct: true } => self.level += 1,
            NumberPhase::Result { correct: false } => {
                self.level = 1;
                self.last_score = None;
            }
            _ => return,
        }
        self.start_level(now, rng);
    }
}

impl<S: KeyValueStore> Round for NumberMemoryEngine<S> {
    fn test_type(&self) -> TestType {
        TestType::NumberMemory
    }

    fn final_score(&self) -> Option<i64> {
        self.last_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::local_store::MemoryKeyValueStore;
    use crate::games::test_support::{player, rng};
    use crate::games::Submission;

    fn engine(seed: u64) -> NumberMemoryEngine<MemoryKeyValueStore> {
        NumberMemoryEngine::new(Some(player()), MemoryKeyValueStore::new(), 0, &mut rng(seed))
    }

    #[test]
    fn numeral_has_exactly_level_digits() {
        let mut r = rng(9);
        for level in 1..=20 {
            let n = generate_numeral(level, &mut r);
            assert_eq!(n.len(), level as usize);
            assert!(n.chars().all(|c| c.is_ascii_digit()));
            assert_ne!(n.chars().next(), Some('0'));
        }
    }

    #[test]
    fn numeral_hides_after_show_duration() {
        let mut game = engine(1);
        assert!(game.visible_numeral().is_some());
        assert_eq!(game.progress(0), 100.0);

        game.tick(show_duration(1) - 1);
        assert!(game.visible_numeral().is_some());
        game.tick(show_duration(1));
        assert_eq!(game.phase(), NumberPhase::Recall);
        assert_eq!(game.visible_numeral(), None);
    }

    #[test]
    fn captured_numeral_is_always_correct() {
        let mut r = rng(2);
        let mut game = engine(2);
        let mut now = 0;
        for level in 1..=6 {
            let shown = game.visible_numeral().unwrap().to_string();
            now += show_duration(level);
            game.tick(now);

            let outcome = game.submit(&shown).expect("answer accepted");
            assert_eq!(outcome.message, "Correct!");
            assert_eq!(game.best(), level);
            game.next(now, &mut r);
        }
        assert_eq!(game.level(), 7);
        assert_eq!(game.store().get(BEST_LEVEL_KEY).as_deref(), Some("6"));
    }

    #[test]
    fn wrong_answer_submits_previous_level_and_reveals_numeral() {
        let mut r = rng(3);
        let mut game = engine(3);
        game.tick(show_duration(1));
        let shown = game.numeral.clone();
        game.submit(&shown);
        game.next(10_000, &mut r);

        let expected = game.numeral.clone();
        game.tick(10_000 + show_duration(2));
        let outcome = game.submit("not a number").unwrap();

        assert_eq!(outcome.score, 1);
        assert_eq!(outcome.message, format!("Wrong! It was {}", expected));
        assert!(matches!(outcome.submission, Submission::Ready(ref s) if s.test_type == TestType::NumberMemory));

        game.next(20_000, &mut r);
        assert_eq!(game.level(), 1);
        assert_eq!(game.best(), 1);
    }

    #[test]
    fn best_level_is_read_from_store() {
        let mut store = MemoryKeyValueStore::new();
        store.set(BEST_LEVEL_KEY, "9").unwrap();
        let game = NumberMemoryEngine::new(None, store, 0, &mut rng(4));
        assert_eq!(game.best(), 9);
    }
}
