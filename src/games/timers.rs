//! Owned, cancelable timers for the game engines.
//!
//! Engines never hold ambient callbacks. They schedule events into their own
//! [`TimerSet`] and drain due events from `tick(now)`. Cancelling the set on
//! restart or teardown guarantees nothing from an earlier round fires later.

/// Milliseconds on whatever monotonic clock the caller drives the engine with.
pub type Millis = u64;

#[derive(Debug)]
struct Timer<E> {
    due: Millis,
    seq: u64,
    event: E,
}

#[derive(Debug)]
pub struct TimerSet<E> {
    pending: Vec<Timer<E>>,
    next_seq: u64,
}

impl<E> Default for TimerSet<E> {
    fn default() -> Self {
        TimerSet {
            pending: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<E> TimerSet<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Millis, event: E) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Timer { due, seq, event });
    }

    /// Drops every pending timer.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest pending deadline, for drivers that sleep until the next event.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.pending.iter().map(|t| t.due).min()
    }

    /// Removes and returns the earliest event due at or before `now`.
    /// Timers with the same deadline fire in scheduling order.
    pub fn pop_due(&mut self, now: Millis) -> Option<E> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= now)
            .min_by_key(|(_, t)| (t.due, t.seq))
            .map(|(i, _)| i)?;
        Some(self.pending.swap_remove(index).event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_deadline_then_schedule_order() {
        let mut timers = TimerSet::new();
        timers.schedule(300, "c");
        timers.schedule(100, "a");
        timers.schedule(100, "b");

        assert_eq!(timers.next_deadline(), Some(100));
        assert_eq!(timers.pop_due(50), None);
        assert_eq!(timers.pop_due(500), Some("a"));
        assert_eq!(timers.pop_due(500), Some("b"));
        assert_eq!(timers.pop_due(500), Some("c"));
        assert!(timers.is_empty());
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let mut timers = TimerSet::new();
        timers.schedule(10, 1);
        timers.schedule(20, 2);
        timers.cancel_all();
        timers.schedule(30, 3);

        assert_eq!(timers.pop_due(1_000), Some(3));
        assert_eq!(timers.pop_due(1_000), None);
    }
}
