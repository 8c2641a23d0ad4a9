use crate::client::session::SessionIdentity;
use crate::games::timers::{Millis, TimerSet};
use crate::games::{Round, RoundOutcome};
use crate::models::score::TestType;

pub const SAMPLE_TEXT: &str =
    "The quick brown fox jumps over the lazy dog. Pack my box with five dozen liquor jugs.";
pub const TEST_DURATION_MS: Millis = 10_000;
const CHARS_PER_WORD: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypingResult {
    pub wpm: i64,
    /// Percentage of typed characters matching the sample at the same index.
    pub accuracy: i64,
}

/// Scores a finished run.
///
/// Accuracy is positional: after an inserted or dropped character the rest
/// of the input is compared against shifted sample text.
pub fn compute_result(typed: &str, sample: &str, duration_ms: Millis) -> TypingResult {
    let total = typed.chars().count();
    let matching = typed
        .chars()
        .zip(sample.chars())
        .filter(|(a, b)| a == b)
        .count();

    let minutes = duration_ms as f64 / 60_000.0;
    let words = total as f64 / CHARS_PER_WORD;
    let wpm = if minutes > 0.0 {
        (words / minutes).round() as i64
    } else {
        0
    };
    let accuracy = if total == 0 {
        0
    } else {
        (matching as f64 / total as f64 * 100.0).round() as i64
    };

    TypingResult { wpm, accuracy }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypingState {
    Idle,
    Running { ends_at: Millis },
    Result(TypingResult),
}

#[derive(Debug)]
enum TypingTimer {
    Finish,
}

pub struct TypingEngine {
    state: TypingState,
    buffer: String,
    timers: TimerSet<TypingTimer>,
    identity: Option<SessionIdentity>,
}

impl TypingEngine {
    pub fn new(identity: Option<SessionIdentity>) -> Self {
        TypingEngine {
            state: TypingState::Idle,
            buffer: String::new(),
            timers: TimerSet::new(),
            identity,
        }
    }

    pub fn state(&self) -> TypingState {
        self.state
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Starts a run. Ignored while one is already running.
    pub fn start(&mut self, now: Millis) -> bool {
        if matches!(self.state, TypingState::Running { .. }) {
            return false;
        }
        self.timers.cancel_all();
        self.buffer.clear();
        let ends_at = now + TEST_DURATION_MS;
        self.state = TypingState::Running { ends_at };
        self.timers.schedule(ends_at, TypingTimer::Finish);
        true
    }

    /// Replaces the typed text, like a text area change. Input outside a run is dropped.
    pub fn set_text(&mut self, text: &str) {
        if matches!(self.state, TypingState::Running { .. }) {
            self.buffer.clear();
            self.buffer.push_str(text);
        }
    }

    /// Whole seconds left, counted down the way the on-screen timer shows them.
    pub fn time_left(&self, now: Millis) -> u64 {
        match self.state {
            TypingState::Running { ends_at } => ends_at.saturating_sub(now).div_ceil(1_000),
            TypingState::Idle => TEST_DURATION_MS / 1_000,
            TypingState::Result(_) => 0,
        }
    }

    pub fn tick(&mut self, now: Millis) -> Option<RoundOutcome> {
        let mut outcome = None;
        while let Some(TypingTimer::Finish) = self.timers.pop_due(now) {
            if matches!(self.state, TypingState::Running { .. }) {
                outcome = Some(self.finish());
            }
        }
        outcome
    }

    fn finish(&mut self) -> RoundOutcome {
        let result = compute_result(&self.buffer, SAMPLE_TEXT, TEST_DURATION_MS);
        self.state = TypingState::Result(result);
        RoundOutcome::submitted(
            self.identity.as_ref(),
            TestType::TypingTest,
            result.wpm,
            format!("WPM: {}, Accuracy: {}%", result.wpm, result.accuracy),
        )
    }

    pub fn cancel(&mut self) {
        self.timers.cancel_all();
        self.buffer.clear();
        self.state = TypingState::Idle;
    }
}

impl Round for TypingEngine {
    fn test_type(&self) -> TestType {
        TestType::TypingTest
    }

    fn final_score(&self) -> Option<i64> {
        match self.state {
            TypingState::Result(result) => Some(result.wpm),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::test_support::player;
    use crate::games::Submission;

    #[test]
    fn empty_run_scores_zero() {
        let result = compute_result("", SAMPLE_TEXT, TEST_DURATION_MS);
        assert_eq!(result, TypingResult { wpm: 0, accuracy: 0 });
    }

    #[test]
    fn wpm_counts_five_characters_per_word() {
        // 50 chars = 10 words in 10 s = 60 WPM
        let typed = &SAMPLE_TEXT[..50];
        let result = compute_result(typed, SAMPLE_TEXT, TEST_DURATION_MS);
        assert_eq!(result.wpm, 60);
        assert_eq!(result.accuracy, 100);
    }

    #[test]
    fn accuracy_is_positional() {
        // Dropping the first character shifts everything after it.
        let result = compute_result("he quick", SAMPLE_TEXT, TEST_DURATION_MS);
        assert!(result.accuracy < 50);
        let result = compute_result("Thx quick", SAMPLE_TEXT, TEST_DURATION_MS);
        assert_eq!(result.accuracy, 89);
    }

    #[test]
    fn run_ends_after_ten_seconds_and_submits_wpm() {
        let mut engine = TypingEngine::new(Some(player()));
        engine.set_text("ignored before start");
        assert!(engine.text().is_empty());

        assert!(engine.start(1_000));
        assert_eq!(engine.time_left(1_000), 10);
        assert_eq!(engine.time_left(1_500), 10);
        assert_eq!(engine.time_left(2_000), 9);
        engine.set_text(&SAMPLE_TEXT[..25]);

        assert_eq!(engine.tick(10_999), None);
        let outcome = engine.tick(11_000).expect("run finished");
        assert_eq!(outcome.score, 30);
        assert!(matches!(outcome.submission, Submission::Ready(ref s) if s.score == 30));
        assert_eq!(engine.final_score(), Some(30));

        engine.set_text("late input");
        assert_eq!(engine.text(), &SAMPLE_TEXT[..25]);
    }

    #[test]
    fn cancelled_run_never_finishes() {
        let mut engine = TypingEngine::new(None);
        engine.start(0);
        engine.cancel();
        assert_eq!(engine.tick(60_000), None);
        assert_eq!(engine.state(), TypingState::Idle);
    }
}
