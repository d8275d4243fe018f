use serde::{Deserialize, Serialize};
use tracing::debug;

/// One region's visibility as reported by a [`ViewportObserver`].
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityEntry {
    pub id: String,
    /// Fraction of the region's area inside the root rectangle, 0.0..=1.0.
    pub ratio: f32,
    /// Any part of the region overlaps the root. Says nothing about the
    /// tracker's threshold.
    pub is_intersecting: bool,
}

impl VisibilityEntry {
    pub fn new(id: impl Into<String>, ratio: f32) -> Self {
        Self {
            id: id.into(),
            ratio,
            is_intersecting: ratio > 0.0,
        }
    }
}

/// Source of visibility batches for observed regions.
pub trait ViewportObserver {
    type Element;

    fn observe(&mut self, id: &str, element: &Self::Element);
    fn unobserve(&mut self, id: &str);
    /// Drains the entries queued since the last call, in report order.
    fn take_updates(&mut self) -> Vec<VisibilityEntry>;
}

/// How to pick a winner when several regions cross the threshold in one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// Last qualifying entry in batch order.
    #[default]
    Last,
    First,
    /// Highest ratio; equal ratios go to the later entry.
    MostVisible,
}

/// Scroll-spy: tracks which registered region is active.
pub struct SectionTracker<O: ViewportObserver> {
    observer: O,
    regions: Vec<String>,
    active: String,
    threshold: f32,
    tie_break: TieBreak,
}

impl<O: ViewportObserver> SectionTracker<O> {
    pub fn new(observer: O, default_active: impl Into<String>, threshold: f32, tie_break: TieBreak) -> Self {
        Self {
            observer,
            regions: Vec::new(),
            active: default_active.into(),
            threshold,
            tie_break,
        }
    }

    /// Starts observing `id`. A missing element is skipped; the caller
    /// registers again once the region is mounted.
    pub fn register(&mut self, id: &str, element: Option<&O::Element>) {
        let Some(element) = element else {
            debug!(region = id, "region not mounted yet, skipping registration");
            return;
        };
        if !self.regions.iter().any(|r| r == id) {
            debug!(region = id, "observing region");
            self.regions.push(id.to_string());
        }
        self.observer.observe(id, element);
    }

    pub fn unregister(&mut self, id: &str) {
        if let Some(pos) = self.regions.iter().position(|r| r == id) {
            self.regions.remove(pos);
            self.observer.unobserve(id);
            debug!(region = id, "stopped observing region");
        }
    }

    /// Applies one batch and returns the new active id if it changed.
    pub fn on_visibility_update(&mut self, batch: &[VisibilityEntry]) -> Option<&str> {
        let threshold = self.threshold;
        let mut qualifying = batch
            .iter()
            .filter(|e| e.is_intersecting && e.ratio >= threshold)
            .filter(|e| self.regions.iter().any(|r| *r == e.id));

        let winner = match self.tie_break {
            TieBreak::Last => qualifying.last(),
            TieBreak::First => qualifying.next(),
            TieBreak::MostVisible => qualifying.fold(None, |best: Option<&VisibilityEntry>, e| match best {
                Some(b) if b.ratio > e.ratio => Some(b),
                _ => Some(e),
            }),
        }?;

        if winner.id == self.active {
            return None;
        }
        debug!(from = %self.active, to = %winner.id, "active section changed");
        self.active = winner.id.clone();
        Some(self.active.as_str())
    }

    /// Pulls whatever the observer has queued and applies it.
    pub fn poll(&mut self) -> Option<&str> {
        let batch = self.observer.take_updates();
        if batch.is_empty() {
            return None;
        }
        self.on_visibility_update(&batch)
    }

    /// Makes `id` active directly, as a navigation click does.
    pub fn select(&mut self, id: &str) -> bool {
        if self.active == id || !self.regions.iter().any(|r| r == id) {
            return false;
        }
        debug!(from = %self.active, to = id, "section selected");
        self.active = id.to_string();
        true
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    #[cfg(test)]
    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Unobserves every region. Safe to call more than once.
    pub fn dispose(&mut self) {
        while let Some(id) = self.regions.last().cloned() {
            self.unregister(&id);
        }
    }
}

impl<O: ViewportObserver> Drop for SectionTracker<O> {
    fn drop(&mut self) {
        self.dispose();
    }
}
