//! Character-by-character text reveal.
//!
//! `Idle → Revealing → Complete`, one scheduled step per character. Each step
//! is scheduled only after the previous one fired, so an instance never has
//! two chains running.

use std::time::Duration;

use tracing::debug;

use crate::scheduler::{Scheduler, TimerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Revealing { pending: TimerId },
    Complete,
}

/// Point-in-time view of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingState {
    pub revealed: String,
    pub revealed_count: usize,
    pub is_complete: bool,
}

#[derive(Debug)]
pub struct TypingEffect {
    target: String,
    /// Byte offset of every char boundary after the first, plus the end.
    boundaries: Vec<usize>,
    delay: Duration,
    revealed_count: usize,
    phase: Phase,
}

impl Default for TypingEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl TypingEffect {
    pub fn new() -> Self {
        Self {
            target: String::new(),
            boundaries: Vec::new(),
            delay: Duration::ZERO,
            revealed_count: 0,
            phase: Phase::Idle,
        }
    }

    /// Starts a fresh run, cancelling whatever step was pending.
    pub fn start(&mut self, text: &str, delay: Duration, scheduler: &mut impl Scheduler) {
        self.cancel(scheduler);
        self.target = text.to_string();
        self.boundaries = text
            .char_indices()
            .skip(1)
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        if text.is_empty() {
            self.boundaries.clear();
        }
        self.delay = delay;
        self.revealed_count = 0;

        if self.boundaries.is_empty() {
            self.phase = Phase::Complete;
            return;
        }
        debug!(
            chars = self.boundaries.len(),
            delay_ms = delay.as_millis() as u64,
            at_ms = scheduler.now().as_millis() as u64,
            "typing started"
        );
        self.phase = Phase::Revealing {
            pending: scheduler.schedule(delay),
        };
    }

    /// Restarts only if the text or delay differ from the current run.
    pub fn retarget(&mut self, text: &str, delay: Duration, scheduler: &mut impl Scheduler) {
        if self.phase != Phase::Idle && self.target == text && self.delay == delay {
            return;
        }
        self.start(text, delay, scheduler);
    }

    /// Handles a fired timer. Returns false if `id` is not this run's step.
    pub fn on_timer(&mut self, id: TimerId, scheduler: &mut impl Scheduler) -> bool {
        match self.phase {
            Phase::Revealing { pending } if pending == id => {}
            _ => return false,
        }

        self.revealed_count += 1;
        if self.revealed_count < self.boundaries.len() {
            self.phase = Phase::Revealing {
                pending: scheduler.schedule(self.delay),
            };
        } else {
            debug!(text = %self.target, "typing complete");
            self.phase = Phase::Complete;
        }
        true
    }

    /// Stops the run where it is. No step fires afterwards.
    pub fn cancel(&mut self, scheduler: &mut impl Scheduler) {
        if let Phase::Revealing { pending } = self.phase {
            scheduler.cancel(pending);
            self.phase = Phase::Idle;
        }
    }

    pub fn dispose(&mut self, scheduler: &mut impl Scheduler) {
        self.cancel(scheduler);
    }

    pub fn revealed(&self) -> &str {
        match self.revealed_count {
            0 => "",
            n => &self.target[..self.boundaries[n - 1]],
        }
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed_count
    }

    #[cfg(test)]
    pub fn total_chars(&self) -> usize {
        self.boundaries.len()
    }

    #[cfg(test)]
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn is_complete(&self) -> bool {
        self.phase() == Phase::Complete
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn snapshot(&self) -> TypingState {
        TypingState {
            revealed: self.revealed().to_string(),
            revealed_count: self.revealed_count(),
            is_complete: self.is_complete(),
        }
    }
}
