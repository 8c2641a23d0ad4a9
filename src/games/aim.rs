use crate::client::session::SessionIdentity;
use crate::games::timers::{Millis, TimerSet};
use crate::games::{Round, RoundOutcome};
use crate::models::score::TestType;
use rand::Rng;

pub const ROUND_DURATION_MS: Millis = 20_000;
pub const TARGET_SIZE: f64 = 40.0;
pub const HIT_RADIUS: f64 = 25.0;
pub const MAX_MISSES: u32 = 3;
const SPAWN_MARGIN: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Play area in pixels. Targets are positioned by their top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arena {
    pub width: f64,
    pub height: f64,
}

impl Default for Arena {
    fn default() -> Self {
        Arena {
            width: 800.0,
            height: 360.0,
        }
    }
}

impl Arena {
    pub fn spawn_target<R: Rng>(&self, rng: &mut R) -> Point {
        let x = (rng.gen::<f64>() * (self.width - TARGET_SIZE)).max(SPAWN_MARGIN);
        let y = (rng.gen::<f64>() * (self.height - TARGET_SIZE)).max(SPAWN_MARGIN);
        Point::new(x, y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AimState {
    Idle,
    Running,
    StoppedByTimeout,
    StoppedByMisses,
    StoppedByPlayer,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ClickResult {
    Hit,
    Miss,
    /// The click was the final miss.
    Ended(RoundOutcome),
    Ignored,
}

#[derive(Debug)]
enum AimTimer {
    Timeout,
}

pub struct AimEngine {
    arena: Arena,
    state: AimState,
    target: Point,
    hits: u32,
    misses: u32,
    ends_at: Millis,
    timers: TimerSet<AimTimer>,
    identity: Option<SessionIdentity>,
}

impl AimEngine {
    pub fn new(identity: Option<SessionIdentity>, arena: Arena) -> Self {
        AimEngine {
            arena,
            state: AimState::Idle,
            target: Point::new(50.0, 50.0),
            hits: 0,
            misses: 0,
            ends_at: 0,
            timers: TimerSet::new(),
            identity,
        }
    }

    pub fn state(&self) -> AimState {
        self.state
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    /// Top-left corner of the current target.
    pub fn target(&self) -> Point {
        self.target
    }

    pub fn target_center(&self) -> Point {
        Point::new(
            self.target.x + TARGET_SIZE / 2.0,
            self.target.y + TARGET_SIZE / 2.0,
        )
    }

    pub fn start<R: Rng>(&mut self, now: Millis, rng: &mut R) -> bool {
        if self.state == AimState::Running {
            return false;
        }
        self.timers.cancel_all();
        self.hits = 0;
        self.misses = 0;
        self.state = AimState::Running;
        self.target = self.arena.spawn_target(rng);
        self.ends_at = now + ROUND_DURATION_MS;
        self.timers.schedule(self.ends_at, AimTimer::Timeout);
        true
    }

    pub fn time_left(&self, now: Millis) -> u64 {
        match self.state {
            AimState::Running => self.ends_at.saturating_sub(now).div_ceil(1_000),
            AimState::Idle => ROUND_DURATION_MS / 1_000,
            _ => 0,
        }
    }

    pub fn click<R: Rng>(&mut self, at: Point, rng: &mut R) -> ClickResult {
        if self.state != AimState::Running {
            return ClickResult::Ignored;
        }

        if at.distance(self.target_center()) <= HIT_RADIUS {
            self.hits += 1;
            self.target = self.arena.spawn_target(rng);
            return ClickResult::Hit;
        }

        self.misses += 1;
        if self.misses >= MAX_MISSES {
            // The miss-limit ending keeps the hit count local and posts nothing.
            self.timers.cancel_all();
            self.state = AimState::StoppedByMisses;
            return ClickResult::Ended(RoundOutcome::local(
                TestType::AimTrainer,
                i64::from(self.hits),
                format!("Too many misses! Hits: {}", self.hits),
            ));
        }
        ClickResult::Miss
    }

    pub fn tick(&mut self, now: Millis) -> Option<RoundOutcome> {
        let mut outcome = None;
        while let Some(AimTimer::Timeout) = self.timers.pop_due(now) {
            if self.state == AimState::Running {
                outcome = Some(self.finish(AimState::StoppedByTimeout));
            }
        }
        outcome
    }

    /// Ends the round early from the stop button; the score is still posted.
    pub fn stop(&mut self) -> Option<RoundOutcome> {
        if self.state != AimState::Running {
            return None;
        }
        Some(self.finish(AimState::StoppedByPlayer))
    }

    fn finish(&mut self, reason: AimState) -> RoundOutcome {
        self.timers.cancel_all();
        self.state = reason;
        RoundOutcome::submitted(
            self.identity.as_ref(),
            TestType::AimTrainer,
            i64::from(self.hits),
            format!("Time's up! Hits: {}, Misses: {}", self.hits, self.misses),
        )
    }
}

impl Round for AimEngine {
    fn test_type(&self) -> TestType {
        TestType::AimTrainer
    }

    fn final_score(&self) -> Option<i64> {
        match self.state {
            AimState::Idle | AimState::Running => None,
            _ => Some(i64::from(self.hits)),
        }
    }
}
