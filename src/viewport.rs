use crate::tracker::{ViewportObserver, VisibilityEntry};

/// Vertical extent of a section on the page, in rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub top: u16,
    pub height: u16,
}

impl Bounds {
    pub fn new(top: u16, height: u16) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> u32 {
        self.top as u32 + self.height as u32
    }
}

#[derive(Debug)]
struct Observed {
    id: String,
    bounds: Bounds,
    /// Threshold state from the last report; `None` until first reported.
    reported: Option<bool>,
}

/// Intersection observer over a vertically scrolled page.
///
/// Regions are reported when first observed and whenever they cross the
/// threshold in either direction, in observation order. Bounds, offset and
/// height changes are only recorded; visibility is worked out once per
/// [`take_updates`](ViewportObserver::take_updates) against the final state.
#[derive(Debug)]
pub struct ScrollViewport {
    regions: Vec<Observed>,
    offset: u16,
    height: u16,
    threshold: f32,
    /// Rows added to (or, if negative, removed from) each edge of the root.
    root_margin: i16,
    dirty: bool,
    queued: Vec<VisibilityEntry>,
}

impl ScrollViewport {
    pub fn new(threshold: f32, root_margin: i16) -> Self {
        Self {
            regions: Vec::new(),
            offset: 0,
            height: 0,
            threshold,
            root_margin,
            dirty: false,
            queued: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn offset(&self) -> u16 {
        self.offset
    }

    #[cfg(test)]
    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn set_offset(&mut self, offset: u16) {
        if self.offset != offset {
            self.offset = offset;
            self.dirty = true;
        }
    }

    pub fn resize(&mut self, height: u16) {
        if self.height != height {
            self.height = height;
            self.dirty = true;
        }
    }

    /// Current visible fraction of an observed region.
    #[cfg(test)]
    pub fn ratio(&self, id: &str) -> Option<f32> {
        self.regions.iter().find(|r| r.id == id).map(|r| self.ratio_of(r.bounds))
    }

    fn root(&self) -> (i32, i32) {
        let margin = self.root_margin as i32;
        let top = self.offset as i32 - margin;
        let bottom = self.offset as i32 + self.height as i32 + margin;
        (top, bottom.max(top))
    }

    fn ratio_of(&self, bounds: Bounds) -> f32 {
        if bounds.height == 0 {
            return 0.0;
        }
        let (root_top, root_bottom) = self.root();
        let top = (bounds.top as i32).max(root_top);
        let bottom = (bounds.bottom() as i32).min(root_bottom);
        let visible = (bottom - top).max(0);
        visible as f32 / bounds.height as f32
    }

    fn above_threshold(&self, ratio: f32) -> bool {
        ratio > 0.0 && ratio >= self.threshold
    }

    fn evaluate(&mut self) {
        for i in 0..self.regions.len() {
            let ratio = self.ratio_of(self.regions[i].bounds);
            let above = self.above_threshold(ratio);
            let region = &mut self.regions[i];
            if region.reported != Some(above) {
                region.reported = Some(above);
                self.queued.push(VisibilityEntry::new(region.id.clone(), ratio));
            }
        }
    }
}

impl ViewportObserver for ScrollViewport {
    type Element = Bounds;

    fn observe(&mut self, id: &str, element: &Bounds) {
        match self.regions.iter_mut().find(|r| r.id == id) {
            Some(region) if region.bounds == *element => return,
            Some(region) => region.bounds = *element,
            None => self.regions.push(Observed {
                id: id.to_string(),
                bounds: *element,
                reported: None,
            }),
        }
        self.dirty = true;
    }

    fn unobserve(&mut self, id: &str) {
        self.regions.retain(|r| r.id != id);
        self.queued.retain(|e| e.id != id);
    }

    fn take_updates(&mut self) -> Vec<VisibilityEntry> {
        if std::mem::take(&mut self.dirty) {
            self.evaluate();
        }
        std::mem::take(&mut self.queued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Five stacked 20-row sections in a 20-row viewport.
    fn page() -> ScrollViewport {
        let mut viewport = ScrollViewport::new(0.5, 0);
        viewport.resize(20);
        for (i, id) in ["about", "skills", "experience", "projects", "contact"].iter().enumerate() {
            viewport.observe(id, &Bounds::new(i as u16 * 20, 20));
        }
        viewport
    }

    /// Each entry's id with whether it sits at or over the 0.5 threshold.
    fn ids(entries: &[VisibilityEntry]) -> Vec<(&str, bool)> {
        entries.iter().map(|e| (e.id.as_str(), e.ratio >= 0.5)).collect()
    }

    #[test]
    fn initial_observation_reports_every_region() {
        let mut viewport = page();
        let batch = viewport.take_updates();
        assert_eq!(
            ids(&batch),
            vec![
                ("about", true),
                ("skills", false),
                ("experience", false),
                ("projects", false),
                ("contact", false),
            ]
        );
        assert!(viewport.take_updates().is_empty());
    }

    #[test]
    fn only_threshold_crossings_are_reported() {
        let mut viewport = page();
        viewport.take_updates();

        viewport.set_offset(5);
        assert!(viewport.take_updates().is_empty());
        assert_eq!(viewport.ratio("about"), Some(0.75));

        viewport.set_offset(11);
        let batch = viewport.take_updates();
        assert_eq!(ids(&batch), vec![("about", false), ("skills", true)]);
        // About dropped under the threshold but still overlaps the root.
        assert!(batch[0].is_intersecting);
        assert_eq!(batch[0].ratio, 0.45);
    }

    #[test]
    fn half_visible_counts_as_intersecting() {
        let mut viewport = page();
        viewport.take_updates();
        viewport.set_offset(10);
        assert_eq!(viewport.ratio("about"), Some(0.5));
        assert_eq!(viewport.ratio("skills"), Some(0.5));
        assert_eq!(ids(&viewport.take_updates()), vec![("skills", true)]);
    }

    #[test]
    fn tall_region_never_reaches_threshold() {
        let mut viewport = ScrollViewport::new(0.5, 0);
        viewport.resize(10);
        viewport.observe("projects", &Bounds::new(0, 40));
        let batch = viewport.take_updates();
        assert_eq!(ids(&batch), vec![("projects", false)]);
        viewport.set_offset(15);
        assert!(viewport.take_updates().is_empty());
    }

    #[test]
    fn negative_root_margin_shrinks_root() {
        let mut viewport = ScrollViewport::new(0.5, -5);
        viewport.resize(20);
        viewport.observe("about", &Bounds::new(0, 20));
        // Root is rows 5..15.
        assert_eq!(viewport.ratio("about"), Some(0.5));
    }

    #[test]
    fn zero_height_region_reports_zero() {
        let mut viewport = ScrollViewport::new(0.5, 0);
        viewport.resize(10);
        viewport.observe("empty", &Bounds::new(3, 0));
        assert_eq!(viewport.ratio("empty"), Some(0.0));
    }

    #[test]
    fn unobserve_drops_queued_entries() {
        let mut viewport = page();
        viewport.unobserve("about");
        viewport.unobserve("about");
        let batch = viewport.take_updates();
        assert!(batch.iter().all(|e| e.id != "about"));
        assert_eq!(viewport.ratio("about"), None);
    }

    #[test]
    fn reobserving_with_same_bounds_is_quiet() {
        let mut viewport = page();
        viewport.take_updates();
        viewport.observe("skills", &Bounds::new(20, 20));
        assert!(viewport.take_updates().is_empty());
    }

    #[test]
    fn changes_before_a_drain_are_evaluated_together() {
        let mut viewport = page();
        viewport.take_updates();
        viewport.set_offset(20);
        assert_eq!(ids(&viewport.take_updates()), vec![("about", false), ("skills", true)]);

        // Re-layout into 10-row sections with skills kept at the top.
        for (i, id) in ["about", "skills", "experience", "projects", "contact"].iter().enumerate() {
            viewport.observe(id, &Bounds::new(i as u16 * 10, 10));
        }
        viewport.resize(20);
        viewport.set_offset(10);

        // Projects only overlapped the root before the offset moved and is
        // never reported; skills ends over the threshold, as it started.
        assert_eq!(ids(&viewport.take_updates()), vec![("experience", true)]);
        assert!(viewport.take_updates().is_empty());
    }

    #[test]
    fn shrinking_mid_page_reports_only_real_crossings() {
        let mut viewport = page();
        viewport.set_offset(30);
        viewport.take_updates();
        assert_eq!(viewport.ratio("skills"), Some(0.5));
        assert_eq!(viewport.ratio("experience"), Some(0.5));

        viewport.resize(8);
        viewport.set_offset(34);
        // Root is rows 34..42: skills 6/20, experience 2/20.
        assert_eq!(ids(&viewport.take_updates()), vec![("skills", false), ("experience", false)]);
    }

    #[test]
    fn nothing_is_queued_until_drained() {
        let mut viewport = page();
        assert!(viewport.queued.is_empty());
        assert_eq!(viewport.take_updates().len(), 5);
        viewport.set_offset(40);
        assert!(viewport.queued.is_empty());
        assert_eq!(ids(&viewport.take_updates()), vec![("about", false), ("experience", true)]);
    }
}
