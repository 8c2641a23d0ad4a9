use crate::client::session::SessionIdentity;
use crate::games::timers::{Millis, TimerSet};
use crate::games::{Round, RoundOutcome};
use crate::models::score::TestType;
use rand::Rng;

pub const MIN_DELAY_MS: Millis = 1_000;
pub const MAX_DELAY_MS: Millis = 5_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReactionState {
    Waiting,
    Ready,
    Click { started_at: Millis },
}

#[derive(Debug)]
enum ReactionTimer {
    Go,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ReactionEvent {
    Started,
    TooSoon,
    Finished(RoundOutcome),
}

pub struct ReactionEngine {
    state: ReactionState,
    timers: TimerSet<ReactionTimer>,
    message: String,
    last_time: Option<i64>,
    identity: Option<SessionIdentity>,
}

impl ReactionEngine {
    pub fn new(identity: Option<SessionIdentity>) -> Self {
        ReactionEngine {
            state: ReactionState::Waiting,
            timers: TimerSet::new(),
            message: "Click to start!".to_string(),
            last_time: None,
            identity,
        }
    }

    pub fn state(&self) -> ReactionState {
        self.state
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Deadline of the pending "go" signal, if one is armed.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.timers.next_deadline()
    }

    pub fn click<R: Rng>(&mut self, now: Millis, rng: &mut R) -> ReactionEvent {
        match self.state {
            ReactionState::Waiting => {
                let delay = rng.gen_range(MIN_DELAY_MS..MAX_DELAY_MS);
                self.timers.cancel_all();
                self.timers.schedule(now + delay, ReactionTimer::Go);
                self.state = ReactionState::Ready;
                self.message = "Wait for green...".to_string();
                ReactionEvent::Started
            }
            ReactionState::Ready => {
                self.timers.cancel_all();
                self.state = ReactionState::Waiting;
                self.message = "Too soon! Try again.".to_string();
                ReactionEvent::TooSoon
            }
            ReactionState::Click { started_at } => {
                let elapsed = now.saturating_sub(started_at) as i64;
                self.state = ReactionState::Waiting;
                self.last_time = Some(elapsed);
                self.message = format!("Your reaction time: {} ms", elapsed);
                ReactionEvent::Finished(RoundOutcome::submitted(
                    self.identity.as_ref(),
                    TestType::ReactionTime,
                    elapsed,
                    self.message.clone(),
                ))
            }
        }
    }

    pub fn tick(&mut self, now: Millis) {
        while let Some(ReactionTimer::Go) = self.timers.pop_due(now) {
            if self.state == ReactionState::Ready {
                self.state = ReactionState::Click { started_at: now };
                self.message = "Click now!".to_string();
            }
        }
    }

    /// Abandons any round in progress.
    pub fn cancel(&mut self) {
        self.timers.cancel_all();
        self.state = ReactionState::Waiting;
        self.message = "Click to start!".to_string();
    }
}

impl Round for ReactionEngine {
    fn test_type(&self) -> TestType {
        TestType::ReactionTime
    }

    fn final_score(&self) -> Option<i64> {
        self.last_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::test_support::{player, rng};
    use crate::games::Submission;

    fn arm(engine: &mut ReactionEngine, now: Millis) -> Millis {
        assert_eq!(engine.click(now, &mut rng(7)), ReactionEvent::Started);
        engine.next_deadline().expect("go timer armed")
    }

    #[test]
    fn ready_delay_stays_within_bounds() {
        for seed in 0..50 {
            let mut engine = ReactionEngine::new(None);
            engine.click(0, &mut rng(seed));
            let due = engine.next_deadline().unwrap();
            assert!((MIN_DELAY_MS..MAX_DELAY_MS).contains(&due));
        }
    }

    #[test]
    fn full_cycle_submits_elapsed_time() {
        let mut engine = ReactionEngine::new(Some(player()));
        let due = arm(&mut engine, 0);

        engine.tick(due);
        assert_eq!(engine.state(), ReactionState::Click { started_at: due });

        let ReactionEvent::Finished(outcome) = engine.click(due + 245, &mut rng(1)) else {
            panic!("expected a finished round");
        };
        assert_eq!(outcome.score, 245);
        assert_eq!(engine.state(), ReactionState::Waiting);
        assert_eq!(engine.final_score(), Some(245));
        match outcome.submission {
            Submission::Ready(sub) => {
                assert_eq!(sub.test_type, TestType::ReactionTime);
                assert_eq!(sub.score, 245);
            }
            other => panic!("unexpected submission {:?}", other),
        }
    }

    #[test]
    fn clicking_early_fails_and_disarms_timer() {
        let mut engine = ReactionEngine::new(Some(player()));
        let due = arm(&mut engine, 0);

        assert_eq!(engine.click(due - 1, &mut rng(2)), ReactionEvent::TooSoon);
        assert_eq!(engine.message(), "Too soon! Try again.");

        // The old go signal must not flip a fresh round to green.
        engine.tick(due + 10_000);
        assert_eq!(engine.state(), ReactionState::Waiting);
        assert_eq!(engine.final_score(), None);
    }

    #[test]
    fn anonymous_player_gets_score_without_submission() {
        let mut engine = ReactionEngine::new(None);
        let due = arm(&mut engine, 100);
        engine.tick(due);

        let ReactionEvent::Finished(outcome) = engine.click(due + 300, &mut rng(3)) else {
            panic!("expected a finished round");
        };
        assert_eq!(outcome.score, 300);
        assert_eq!(outcome.submission, Submission::NotLoggedIn);
    }
}
