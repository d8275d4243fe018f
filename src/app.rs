use std::time::Duration;

use tracing::{debug, info};

use crate::clipboard::{ClipboardNotifier, ClipboardWrite, SystemClipboard};
use crate::config::Settings;
use crate::content::{Portfolio, Section};
use crate::models::{Alerts, ContactForm, CopyField, CopyTarget, FocusArea};
use crate::page::{self, PageLayout, PageView};
use crate::scheduler::TimerQueue;
use crate::theme::Theme;
use crate::tracker::SectionTracker;
use crate::typing::TypingEffect;
use crate::utils::max_scroll;
use crate::viewport::ScrollViewport;

/// Everything the page needs between frames.
pub struct App<C: ClipboardWrite = SystemClipboard> {
    pub settings: Settings,
    pub portfolio: Portfolio,
    pub theme: Theme,
    pub tracker: SectionTracker<ScrollViewport>,
    pub typing: TypingEffect,
    pub contacts: [CopyField; 2],
    pub timers: TimerQueue,
    pub alerts: Alerts,
    pub form: ContactForm,
    pub focus: FocusArea,
    pub nav_open: bool,
    pub show_help: bool,
    clipboard: C,
    layout: PageLayout,
    offset: u16,
    frame_width: u16,
    view_height: u16,
}

impl App<SystemClipboard> {
    pub fn new(settings: Settings, portfolio: Portfolio) -> Self {
        Self::with_clipboard(settings, portfolio, SystemClipboard::new())
    }
}

impl<C: ClipboardWrite> App<C> {
    pub fn with_clipboard(settings: Settings, portfolio: Portfolio, clipboard: C) -> Self {
        let tracker = SectionTracker::new(
            ScrollViewport::new(settings.tracker.threshold, settings.tracker.root_margin),
            settings.tracker.default_section.clone(),
            settings.tracker.threshold,
            settings.tracker.tie_break,
        );
        let window = settings.copy_window();
        let contacts = [
            CopyField {
                label: "Email",
                value: portfolio.contact.email.clone(),
                notifier: ClipboardNotifier::new(window),
            },
            CopyField {
                label: "Phone",
                value: portfolio.contact.phone.clone(),
                notifier: ClipboardNotifier::new(window),
            },
        ];

        Self {
            settings,
            portfolio,
            theme: Theme::default(),
            tracker,
            typing: TypingEffect::new(),
            contacts,
            timers: TimerQueue::new(),
            alerts: Alerts::default(),
            form: ContactForm::default(),
            focus: FocusArea::Page,
            nav_open: false,
            show_help: false,
            clipboard,
            layout: PageLayout::default(),
            offset: 0,
            frame_width: 0,
            view_height: 0,
        }
    }

    pub fn page_view(&self) -> PageView<'_> {
        PageView {
            portfolio: &self.portfolio,
            greeting: self.typing.snapshot(),
            contacts: &self.contacts,
            form: &self.form,
            form_focused: self.focus == FocusArea::Form,
            theme: &self.theme,
        }
    }

    /// Lays the page out for a `width` x `height` viewport, registers every
    /// section with the tracker and applies whatever visibility changed.
    ///
    /// When the layout changes the active section keeps its place under the
    /// top edge and every section is observed afresh, so the next batch
    /// reports all of them against the new geometry.
    ///
    /// The greeting (re)starts here when it has not run yet or its text or
    /// delay changed.
    pub fn sync_viewport(&mut self, width: u16, height: u16) {
        self.typing
            .retarget(&self.portfolio.owner.name, self.settings.typing_delay(), &mut self.timers);
        if width != self.layout.width || height != self.layout.min_height {
            let anchor = self
                .active_section()
                .and_then(|s| self.layout.bounds(s).map(|b| (s, self.offset.saturating_sub(b.top))));
            self.layout = page::layout(&self.page_view(), width, height);
            if let Some((bounds, into)) = anchor.and_then(|(s, into)| self.layout.bounds(s).map(|b| (b, into))) {
                self.offset = bounds.top.saturating_add(into.min(bounds.height.saturating_sub(1)));
            }
            debug!(
                width,
                height,
                page_rows = self.layout.height(),
                offset = self.offset,
                remounted = self.tracker.regions().len(),
                "page laid out"
            );
            for section in Section::ALL {
                self.tracker.unregister(section.id());
            }
        }
        self.view_height = height;

        for (section, bounds) in &self.layout.sections {
            self.tracker.register(section.id(), Some(bounds));
        }
        self.tracker.observer_mut().resize(height);
        self.offset = self.offset.min(self.max_offset());
        self.tracker.observer_mut().set_offset(self.offset);
        self.tracker.poll();
    }

    /// Records the full terminal width, which decides whether the navbar
    /// collapses.
    pub fn set_frame_width(&mut self, width: u16) {
        self.frame_width = width;
    }

    /// Fires every timer due by `elapsed` and routes it to its owner.
    pub fn advance_clock(&mut self, elapsed: Duration) {
        while let Some(id) = self.timers.pop_due(elapsed) {
            if self.typing.on_timer(id, &mut self.timers) {
                continue;
            }
            for field in &mut self.contacts {
                if field.notifier.on_timer(id) {
                    break;
                }
            }
        }
        self.timers.advance_to(elapsed);
    }

    /// Copies one contact field. Failures end up in `alerts`.
    pub async fn copy(&mut self, target: CopyTarget) -> bool {
        let CopyField { value, notifier, .. } = &mut self.contacts[target.index()];
        notifier
            .copy(value.as_str(), &self.clipboard, &mut self.timers, &mut self.alerts)
            .await
            .is_ok()
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn offset(&self) -> u16 {
        self.offset
    }

    pub fn active_section(&self) -> Option<Section> {
        Section::from_id(self.tracker.active())
    }

    pub fn is_narrow(&self) -> bool {
        self.frame_width < self.settings.ui.narrow_width
    }

    fn max_offset(&self) -> u16 {
        max_scroll(self.layout.height(), self.view_height)
    }

    pub fn scroll_to(&mut self, offset: u16) {
        self.offset = offset.min(self.max_offset());
        self.tracker.observer_mut().set_offset(self.offset);
        self.tracker.poll();
    }

    pub fn scroll_by(&mut self, rows: i32) {
        let target = (self.offset as i32 + rows).clamp(0, u16::MAX as i32);
        self.scroll_to(target as u16);
    }

    pub fn page_down(&mut self) {
        self.scroll_by(self.view_height.saturating_sub(1).max(1) as i32);
    }

    pub fn page_up(&mut self) {
        self.scroll_by(-(self.view_height.saturating_sub(1).max(1) as i32));
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_to(u16::MAX);
    }

    /// Brings `section` to the top of the viewport and makes it active
    /// right away, whatever the scroll position reports.
    pub fn navigate(&mut self, section: Section) {
        if let Some(bounds) = self.layout.bounds(section) {
            self.scroll_to(bounds.top);
        }
        self.tracker.select(section.id());
        self.nav_open = false;
    }

    pub fn next_section(&mut self) {
        let current = self.active_section().unwrap_or(Section::About);
        self.navigate(current.next());
    }

    pub fn previous_section(&mut self) {
        let current = self.active_section().unwrap_or(Section::About);
        self.navigate(current.previous());
    }

    pub fn focus_form(&mut self) {
        self.navigate(Section::Contact);
        self.focus = FocusArea::Form;
    }

    pub fn leave_form(&mut self) {
        self.focus = FocusArea::Page;
    }

    pub fn submit_form(&mut self) {
        let Some(submission) = self.form.submit() else {
            return;
        };
        info!(
            email = %submission.email,
            subject_chars = submission.subject.chars().count(),
            message_chars = submission.message.chars().count(),
            "contact form submitted"
        );
        self.alerts.info(
            "Message received",
            format!(
                "Thanks, {}! Your message has been noted. I'll get back to you at {}.",
                submission.name, submission.email
            ),
        );
        self.focus = FocusArea::Page;
    }

    /// Cancels every pending timer and stops observing sections.
    pub fn dispose(&mut self) {
        self.typing.dispose(&mut self.timers);
        for field in &mut self.contacts {
            field.notifier.dispose(&mut self.timers);
        }
        self.tracker.dispose();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::{ClipboardSettings, LogSettings, TrackerSettings, TypingSettings, UiSettings};
    use crate::error::ClipboardError;
    use crate::models::AlertKind;
    use crate::tracker::TieBreak;
    use std::cell::RefCell;

    #[derive(Default)]
    pub(crate) struct FakeClipboard {
        pub fail: bool,
        pub written: RefCell<Vec<String>>,
    }

    impl ClipboardWrite for FakeClipboard {
        async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
            if self.fail {
                return Err(ClipboardError::Unavailable("no display".into()));
            }
            self.written.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    pub(crate) fn settings() -> Settings {
        Settings {
            typing: TypingSettings { delay_ms: 100 },
            clipboard: ClipboardSettings { window_ms: 2000 },
            tracker: TrackerSettings {
                threshold: 0.5,
                root_margin: 0,
                tie_break: TieBreak::Last,
                default_section: "about".into(),
            },
            ui: UiSettings {
                tick_rate_ms: 100,
                narrow_width: 60,
            },
            log: LogSettings {
                file: None,
                filter: "folio=info".into(),
            },
        }
    }

    pub(crate) fn app(fail: bool) -> App<FakeClipboard> {
        let clipboard = FakeClipboard {
            fail,
            ..Default::default()
        };
        let mut app = App::with_clipboard(settings(), Portfolio::default(), clipboard);
        app.set_frame_width(81);
        app.sync_viewport(80, 30);
        app
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn every_section_is_registered_on_first_layout() {
        let app = app(false);
        let ids: Vec<&str> = Section::ALL.iter().map(|s| s.id()).collect();
        assert_eq!(app.tracker.regions(), ids.as_slice());
        assert_eq!(app.tracker.active(), "about");
    }

    #[test]
    fn greeting_types_out_the_owner_name() {
        let mut app = app(false);
        let name = app.portfolio.owner.name.clone();
        assert_eq!(app.typing.revealed(), "");
        app.advance_clock(ms(100));
        assert_eq!(app.typing.revealed(), &name[..1]);
        app.advance_clock(ms(100 * name.chars().count() as u64));
        assert_eq!(app.typing.revealed(), name);
        assert!(app.typing.is_complete());
    }

    #[test]
    fn zero_delay_reveals_one_char_per_clock_advance() {
        let mut settings = settings();
        settings.typing.delay_ms = 0;
        let mut app = App::with_clipboard(settings, Portfolio::default(), FakeClipboard::default());
        app.sync_viewport(80, 30);

        app.advance_clock(ms(1));
        assert_eq!(app.typing.revealed_count(), 1);
        app.advance_clock(ms(2));
        assert_eq!(app.typing.revealed_count(), 2);
        app.advance_clock(ms(2));
        assert_eq!(app.typing.revealed_count(), 3);
    }

    #[test]
    fn scrolling_moves_the_active_section() {
        let mut app = app(false);
        let skills = app.layout().bounds(Section::Skills).unwrap();
        app.scroll_to(skills.top);
        assert_eq!(app.tracker.active(), "skills");
        app.scroll_to(0);
        assert_eq!(app.tracker.active(), "about");
    }

    #[test]
    fn navigation_targets_each_section() {
        let mut app = app(false);
        for section in Section::ALL {
            app.navigate(section);
            assert_eq!(app.active_section(), Some(section));
        }
    }

    #[test]
    fn navigate_to_projects_lands_on_projects() {
        let mut app = app(false);
        app.navigate(Section::Projects);
        let projects = app.layout().bounds(Section::Projects).unwrap();
        assert_eq!(app.offset(), projects.top.min(app.max_offset()));
        assert_eq!(app.tracker.active(), "projects");
    }

    #[test]
    fn resize_keeps_the_active_section_at_the_top() {
        let mut app = app(false);
        app.navigate(Section::Skills);

        for (width, height) in [(80, 12), (100, 12), (60, 30)] {
            app.sync_viewport(width, height);
            let skills = app.layout().bounds(Section::Skills).unwrap();
            assert_eq!(app.offset(), skills.top, "{width}x{height}");
            assert_eq!(app.active_section(), Some(Section::Skills), "{width}x{height}");
        }
    }

    #[test]
    fn resize_mid_page_leaves_a_visible_section_active() {
        let rows = app(false).layout().height();
        for offset in (0..rows).step_by(3) {
            for (width, height) in [(80, 12), (60, 30), (100, 18)] {
                let mut app = app(false);
                app.scroll_to(offset);
                app.sync_viewport(width, height);

                let viewport = app.tracker.observer();
                let best = Section::ALL
                    .iter()
                    .filter_map(|s| viewport.ratio(s.id()))
                    .fold(0.0f32, f32::max);
                if best >= 0.5 {
                    let active = app.active_section().unwrap();
                    let ratio = viewport.ratio(active.id()).unwrap();
                    assert!(
                        ratio >= 0.5,
                        "offset {offset}, {width}x{height}: {} at {ratio}, best {best}",
                        active.id()
                    );
                }
            }
        }
    }

    #[test]
    fn narrow_follows_the_terminal_width() {
        let mut app = app(false);
        assert!(!app.is_narrow());
        app.sync_viewport(59, 30);
        app.set_frame_width(60);
        assert!(!app.is_narrow());
        app.set_frame_width(59);
        assert!(app.is_narrow());
    }

    #[test]
    fn scroll_is_clamped_to_page() {
        let mut app = app(false);
        app.scroll_to_bottom();
        assert_eq!(app.offset(), app.layout().height() - 30);
        app.scroll_by(-10_000);
        assert_eq!(app.offset(), 0);
    }

    #[tokio::test]
    async fn copies_keep_independent_windows() {
        let mut app = app(false);
        assert!(app.copy(CopyTarget::Email).await);
        app.advance_clock(ms(1000));
        assert!(app.copy(CopyTarget::Phone).await);

        app.advance_clock(ms(2000));
        assert!(!app.contacts[0].notifier.is_copied());
        assert!(app.contacts[1].notifier.is_copied());
        app.advance_clock(ms(3000));
        assert!(!app.contacts[1].notifier.is_copied());
        assert_eq!(app.clipboard.written.borrow().len(), 2);
    }

    #[tokio::test]
    async fn failed_copy_raises_one_alert() {
        let mut app = app(true);
        assert!(!app.copy(CopyTarget::Email).await);
        assert!(!app.contacts[0].notifier.is_copied());
        assert_eq!(app.alerts.len(), 1);
        assert_eq!(app.alerts.current().map(|a| &a.kind), Some(&AlertKind::Error));
    }

    #[test]
    fn valid_form_submission_shows_info_alert() {
        let mut app = app(false);
        app.focus_form();
        for c in "Sam".chars() {
            app.form.insert(c);
        }
        app.form.focus_next();
        for c in "sam@example.com".chars() {
            app.form.insert(c);
        }
        app.form.focus_previous();
        app.form.focus_previous();
        app.form.insert('!');
        app.submit_form();

        assert_eq!(app.focus, FocusArea::Page);
        assert_eq!(app.alerts.current().map(|a| &a.kind), Some(&AlertKind::Info));
    }

    #[test]
    fn dispose_cancels_pending_timers() {
        let mut app = app(false);
        assert!(app.timers.pending() > 0);
        app.dispose();
        assert_eq!(app.timers.pending(), 0);
        assert!(app.tracker.regions().is_empty());
    }
}
