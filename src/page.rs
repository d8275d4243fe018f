//! Builds the page as plain lines, one block per section.
//!
//! Line counts never depend on transient state (typing progress, copy flags,
//! form contents), so section bounds only change with width or content.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::content::{Portfolio, Section};
use crate::models::{ContactForm, CopyField, FormField};
use crate::theme::Theme;
use crate::typing::TypingState;
use crate::utils::wrap_text;
use crate::viewport::Bounds;

const CELL_WIDTH: usize = 26;

pub struct PageView<'a> {
    pub portfolio: &'a Portfolio,
    pub greeting: TypingState,
    pub contacts: &'a [CopyField],
    pub form: &'a ContactForm,
    pub form_focused: bool,
    pub theme: &'a Theme,
}

/// Where each section sits on the page for a given width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLayout {
    pub width: u16,
    pub min_height: u16,
    pub sections: Vec<(Section, Bounds)>,
}

impl PageLayout {
    pub fn height(&self) -> u16 {
        self.sections.last().map(|(_, b)| b.top + b.height).unwrap_or(0)
    }

    pub fn bounds(&self, section: Section) -> Option<Bounds> {
        self.sections.iter().find(|(s, _)| *s == section).map(|(_, b)| *b)
    }
}

/// Stacks the sections; each is at least `min_height` rows, like a
/// full-screen section on the web.
pub fn layout(view: &PageView, width: u16, min_height: u16) -> PageLayout {
    let mut top: u16 = 0;
    let sections = Section::ALL
        .into_iter()
        .map(|section| {
            let lines = section_lines(view, section, width).len() as u16;
            let bounds = Bounds::new(top, lines.max(min_height));
            top = top.saturating_add(bounds.height);
            (section, bounds)
        })
        .collect();
    PageLayout {
        width,
        min_height,
        sections,
    }
}

pub fn section_lines(view: &PageView, section: Section, width: u16) -> Vec<Line<'static>> {
    let width = (width as usize).saturating_sub(4).max(10);
    let mut lines = vec![Line::default()];
    match section {
        Section::About => about(view, width, &mut lines),
        Section::Skills => skills(view, width, &mut lines),
        Section::Experience => experience(view, width, &mut lines),
        Section::Projects => projects(view, width, &mut lines),
        Section::Contact => contact(view, width, &mut lines),
    }
    lines.push(Line::default());
    lines
}

fn heading(lines: &mut Vec<Line<'static>>, text: &str, theme: &Theme) {
    lines.push(Line::styled(text.to_string(), theme.heading));
    lines.push(Line::default());
}

fn paragraph(lines: &mut Vec<Line<'static>>, text: &str, width: usize, indent: usize, style: Style) {
    let pad = " ".repeat(indent);
    for row in wrap_text(text, width.saturating_sub(indent)) {
        lines.push(Line::styled(format!("{pad}{row}"), style));
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn about(view: &PageView, width: usize, lines: &mut Vec<Line<'static>>) {
    let theme = view.theme;
    let owner = &view.portfolio.owner;
    let mut greeting = vec![
        Span::styled("Hello, I'm ", Style::default().fg(theme.text).add_modifier(Modifier::BOLD)),
        Span::styled(view.greeting.revealed.clone(), theme.greeting),
    ];
    if !view.greeting.is_complete {
        greeting.push(Span::styled("▌", theme.greeting));
    }
    lines.push(Line::from(greeting));
    lines.push(Line::default());
    paragraph(
        lines,
        &owner.bio,
        width,
        0,
        Style::default().fg(theme.text_secondary).add_modifier(Modifier::ITALIC),
    );
    lines.push(Line::default());

    let mut actions = vec![Span::styled(" Get In Touch [5] ", theme.tag)];
    if let Some(resume) = &owner.resume {
        actions.push(Span::raw("  CV: "));
        actions.push(Span::styled(resume.clone(), theme.link));
    }
    lines.push(Line::from(actions));
}

fn skills(view: &PageView, width: usize, lines: &mut Vec<Line<'static>>) {
    let theme = view.theme;
    heading(lines, "Technical Skills", theme);

    let columns = (width / CELL_WIDTH).clamp(1, 4);
    let cell = width / columns;
    for row in view.portfolio.skills.chunks(columns) {
        let names = row
            .iter()
            .map(|s| Span::styled(format!("{:<cell$}", truncate(&format!("▸ {}", s.name), cell - 1)), theme.card_title))
            .collect::<Vec<_>>();
        let descriptions = row
            .iter()
            .map(|s| {
                Span::styled(
                    format!("{:<cell$}", truncate(&format!("  {}", s.description), cell - 1)),
                    Style::default().fg(theme.text_secondary),
                )
            })
            .collect::<Vec<_>>();
        lines.push(Line::from(names));
        lines.push(Line::from(descriptions));
        lines.push(Line::default());
    }
}

fn experience(view: &PageView, width: usize, lines: &mut Vec<Line<'static>>) {
    let theme = view.theme;
    heading(lines, "Experience", theme);

    for exp in &view.portfolio.experience {
        lines.push(Line::from(vec![
            Span::styled("● ", Style::default().fg(theme.accent)),
            Span::styled(exp.title.clone(), theme.card_title),
        ]));
        lines.push(Line::styled(
            format!("│ {} | {}", exp.company, exp.duration),
            Style::default().fg(theme.text_secondary),
        ));
        for row in wrap_text(&exp.description, width.saturating_sub(2)) {
            lines.push(Line::from(vec![
                Span::styled("│ ", Style::default().fg(theme.accent)),
                Span::styled(row, Style::default().fg(theme.text)),
            ]));
        }
        lines.push(Line::default());
    }
}

fn projects(view: &PageView, width: usize, lines: &mut Vec<Line<'static>>) {
    let theme = view.theme;
    heading(lines, "My Projects", theme);

    for project in &view.portfolio.projects {
        lines.push(Line::styled(project.title.trim().to_string(), theme.card_title));
        paragraph(lines, &project.description, width, 2, Style::default().fg(theme.text));

        if !project.technologies.is_empty() {
            let mut tags = vec![Span::raw("  ")];
            for tech in &project.technologies {
                tags.push(Span::styled(format!(" {tech} "), theme.tag));
                tags.push(Span::raw(" "));
            }
            lines.push(Line::from(tags));
        }
        for (label, link) in [("GitHub", &project.github), ("Live Demo", &project.live)] {
            if let Some(url) = link {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {label}: "), Style::default().fg(theme.text_secondary)),
                    Span::styled(url.clone(), theme.link),
                ]));
            }
        }
        lines.push(Line::default());
    }
}

fn contact(view: &PageView, width: usize, lines: &mut Vec<Line<'static>>) {
    let theme = view.theme;
    let contact = &view.portfolio.contact;
    heading(lines, "Connect With Me", theme);
    paragraph(lines, &contact.pitch, width, 0, Style::default().fg(theme.text));
    lines.push(Line::default());

    for (field, key) in view.contacts.iter().zip(['e', 'p']) {
        let indicator = if field.notifier.is_copied() {
            Span::styled("Copied!", theme.copied)
        } else {
            Span::styled(format!("⧉ [{key}] copy"), Style::default().fg(theme.text_secondary))
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<7}", field.label), Style::default().fg(theme.accent)),
            Span::styled(format!("{}  ", field.value), Style::default().fg(theme.text)),
            indicator,
        ]));
    }
    lines.push(Line::from(vec![
        Span::styled(format!("{:<7}", "Where"), Style::default().fg(theme.accent)),
        Span::styled(contact.location.clone(), Style::default().fg(theme.text)),
    ]));
    lines.push(Line::default());

    let hint = if view.form_focused {
        "Send a message  (Tab next field, Enter send, Esc leave)"
    } else {
        "Send a message  (press f to write)"
    };
    lines.push(Line::styled(hint, theme.card_title));
    lines.push(Line::default());

    let input_width = width.saturating_sub(16).max(8);
    for field in FormField::ALL {
        let focused = view.form_focused && view.form.focused() == field;
        let value = view.form.value(field);
        let shown = if value.is_empty() && !focused {
            Span::styled(
                format!("{:<input_width$}", field.placeholder()),
                theme.input.add_modifier(Modifier::DIM),
            )
        } else {
            // Keep the end of long input (and the cursor) in view.
            let tail: String = {
                let skip = (value.chars().count() + 1).saturating_sub(input_width);
                value.chars().skip(skip).collect()
            };
            let cursor = if focused { "▏" } else { "" };
            Span::styled(
                format!("{:<input_width$}", format!("{tail}{cursor}")),
                if focused { theme.input_focused } else { theme.input },
            )
        };
        let marker = if focused { "› " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(theme.accent)),
            Span::styled(format!("{:<13}", field.placeholder()), Style::default().fg(theme.text_secondary)),
            shown,
        ]));
        let error = view
            .form
            .error(field)
            .map(|e| format!("{:15}{e}", ""))
            .unwrap_or_default();
        lines.push(Line::styled(error, theme.error));
    }
    lines.push(Line::styled("  [Enter] Send Message", theme.tag));
}
