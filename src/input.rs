use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::runtime::Runtime;

use crate::app::App;
use crate::clipboard::ClipboardWrite;
use crate::content::Section;
use crate::models::{CopyTarget, FocusArea};

/// Applies one key press. Returns false when the app should quit.
pub fn handle_key<C: ClipboardWrite>(key: KeyEvent, app: &mut App<C>, rt: &Runtime) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return false;
    }

    // An open alert swallows everything but its dismissal
    if app.alerts.is_blocking() {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
            app.alerts.dismiss();
        }
        return true;
    }

    if app.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return true;
    }

    if app.focus == FocusArea::Form {
        handle_form_key(key.code, app);
        return true;
    }

    if app.nav_open {
        match key.code {
            KeyCode::Esc | KeyCode::Char('m') => app.nav_open = false,
            KeyCode::Char(c @ '1'..='5') => select_numbered(c, app),
            KeyCode::Char('q') => return false,
            _ => {}
        }
        return true;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return false,
        KeyCode::Down | KeyCode::Char('j') => app.scroll_by(1),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_by(-1),
        KeyCode::PageDown | KeyCode::Char(' ') => app.page_down(),
        KeyCode::PageUp => app.page_up(),
        KeyCode::Home | KeyCode::Char('g') => app.scroll_to(0),
        KeyCode::End | KeyCode::Char('G') => app.scroll_to_bottom(),
        KeyCode::Tab => app.next_section(),
        KeyCode::BackTab => app.previous_section(),
        KeyCode::Char(c @ '1'..='5') => select_numbered(c, app),
        KeyCode::Char('e') => {
            rt.block_on(app.copy(CopyTarget::Email));
        }
        KeyCode::Char('p') => {
            rt.block_on(app.copy(CopyTarget::Phone));
        }
        KeyCode::Char('f') => app.focus_form(),
        KeyCode::Char('m') => {
            if app.is_narrow() {
                app.nav_open = true;
            }
        }
        KeyCode::Char('?') => app.show_help = true,
        _ => {}
    }
    true
}

fn select_numbered<C: ClipboardWrite>(c: char, app: &mut App<C>) {
    let index = c as usize - '1' as usize;
    if let Some(section) = Section::ALL.get(index) {
        app.navigate(*section);
    }
}

fn handle_form_key<C: ClipboardWrite>(code: KeyCode, app: &mut App<C>) {
    match code {
        KeyCode::Esc => app.leave_form(),
        KeyCode::Tab | KeyCode::Down => app.form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.form.focus_previous(),
        KeyCode::Enter => app.submit_form(),
        KeyCode::Backspace => app.form.backspace(),
        KeyCode::Char(c) => app.form.insert(c),
        _ => {}
    }
}
