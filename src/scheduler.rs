use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};
use std::time::Duration;

/// Handle for a scheduled timer. Ids are never reused within one queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Capability for one-shot delayed wakeups.
///
/// Components only ever hold the returned [`TimerId`]; whoever drives the
/// scheduler routes fired ids back to them.
pub trait Scheduler {
    fn now(&self) -> Duration;
    fn schedule(&mut self, delay: Duration) -> TimerId;
    /// Returns false if the timer already fired or was cancelled.
    fn cancel(&mut self, id: TimerId) -> bool;
}

/// Virtual-time timer queue.
///
/// The event loop advances it to wall-clock elapsed time; tests advance it by
/// hand. Timers with equal deadlines fire in the order they were scheduled.
///
/// A pass is a run of [`pop_due`](Self::pop_due) calls closed by
/// [`advance_to`](Self::advance_to). Zero-delay timers scheduled during a
/// pass fire in the next one, so a handler that keeps rescheduling itself
/// with no delay runs once per pass instead of spinning.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_id: u64,
    heap: BinaryHeap<Reverse<(Duration, u64)>>,
    live: HashSet<u64>,
    firing: bool,
    held: HashSet<u64>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pops the earliest live timer due at or before `until`, moving the clock
    /// to its deadline so a handler can reschedule relative to the firing time.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerId> {
        self.firing = true;
        let mut deferred = Vec::new();
        let mut fired = None;
        while let Some(Reverse((deadline, id))) = self.heap.peek().copied() {
            if deadline > until {
                break;
            }
            self.heap.pop();
            if self.held.contains(&id) {
                deferred.push(Reverse((deadline, id)));
                continue;
            }
            if self.live.remove(&id) {
                self.now = self.now.max(deadline);
                fired = Some(TimerId(id));
                break;
            }
        }
        self.heap.extend(deferred);
        fired
    }

    /// Moves the clock forward without firing anything and closes the pass.
    /// Never moves the clock back.
    pub fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
        self.firing = false;
        self.held.clear();
    }

    /// Time until the next live timer, or `None` when nothing is pending.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.heap
            .iter()
            .filter(|Reverse((_, id))| self.live.contains(id))
            .map(|Reverse((deadline, _))| *deadline)
            .min()
    }

    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.live.len()
    }
}

impl Scheduler for TimerQueue {
    fn now(&self) -> Duration {
        self.now
    }

    fn schedule(&mut self, delay: Duration) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;
        self.heap.push(Reverse((self.now + delay, id)));
        self.live.insert(id);
        if self.firing && delay.is_zero() {
            self.held.insert(id);
        }
        TimerId(id)
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        // The heap entry stays behind and is skipped on pop.
        self.held.remove(&id.0);
        self.live.remove(&id.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn fires_in_deadline_order() {
        let mut timers = TimerQueue::new();
        let late = timers.schedule(ms(300));
        let early = timers.schedule(ms(100));

        assert_eq!(timers.pop_due(ms(50)), None);
        assert_eq!(timers.pop_due(ms(1000)), Some(early));
        assert_eq!(timers.now(), ms(100));
        assert_eq!(timers.pop_due(ms(1000)), Some(late));
        assert_eq!(timers.now(), ms(300));
        assert_eq!(timers.pop_due(ms(1000)), None);
    }

    #[test]
    fn equal_deadlines_keep_schedule_order() {
        let mut timers = TimerQueue::new();
        let a = timers.schedule(ms(10));
        let b = timers.schedule(ms(10));
        assert_eq!(timers.pop_due(ms(10)), Some(a));
        assert_eq!(timers.pop_due(ms(10)), Some(b));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule(ms(10));
        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        assert_eq!(timers.pop_due(ms(100)), None);
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn reschedule_is_relative_to_firing_time() {
        let mut timers = TimerQueue::new();
        timers.schedule(ms(100));
        assert!(timers.pop_due(ms(1000)).is_some());
        let next = timers.schedule(ms(100));
        assert_eq!(timers.next_deadline(), Some(ms(200)));
        assert_eq!(timers.pop_due(ms(1000)), Some(next));
    }

    #[test]
    fn advance_never_goes_backwards() {
        let mut timers = TimerQueue::new();
        timers.advance_to(ms(500));
        timers.advance_to(ms(100));
        assert_eq!(timers.now(), ms(500));
        assert_eq!(timers.next_deadline(), None);
    }

    #[test]
    fn zero_delay_reschedule_waits_for_next_pass() {
        let mut timers = TimerQueue::new();
        let first = timers.schedule(Duration::ZERO);
        assert_eq!(timers.pop_due(ms(1)), Some(first));
        let again = timers.schedule(Duration::ZERO);
        assert_eq!(timers.pop_due(ms(1)), None);
        timers.advance_to(ms(1));

        assert_eq!(timers.next_deadline(), Some(ms(0)));
        assert_eq!(timers.pop_due(ms(2)), Some(again));
        timers.schedule(Duration::ZERO);
        assert_eq!(timers.pop_due(ms(2)), None);
        timers.advance_to(ms(2));
        assert_eq!(timers.pending(), 1);
    }

    #[test]
    fn held_timer_does_not_block_later_ones() {
        let mut timers = TimerQueue::new();
        let due = timers.schedule(ms(10));
        let first = timers.schedule(ms(5));
        assert_eq!(timers.pop_due(ms(10)), Some(first));
        let held = timers.schedule(Duration::ZERO);
        assert_eq!(timers.pop_due(ms(10)), Some(due));
        assert_eq!(timers.pop_due(ms(10)), None);
        timers.advance_to(ms(10));
        assert_eq!(timers.pop_due(ms(10)), Some(held));
    }

    #[test]
    fn positive_delays_still_catch_up_in_one_pass() {
        let mut timers = TimerQueue::new();
        timers.schedule(ms(100));
        let mut fired = 0;
        while timers.pop_due(ms(1000)).is_some() {
            fired += 1;
            if fired < 5 {
                timers.schedule(ms(100));
            }
        }
        timers.advance_to(ms(1000));
        assert_eq!(fired, 5);
    }
}
