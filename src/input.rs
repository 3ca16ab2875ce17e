//! Crossterm event conversion
//!
//! Maps key presses and mouse clicks to controller [`Message`]s. Which
//! message a key produces depends on the current focus and on whether a
//! blocking alert is showing.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

use crate::app::{App, Focus, Message};
use crate::grid::Direction;
use crate::ui::{DashboardLayout, Hit};

/// Convert a key press to a message
pub fn key_message(app: &App, key: KeyEvent) -> Option<Message> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Message::Quit);
    }

    if app.alert().is_some() {
        return match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Some(Message::DismissAlert),
            _ => None,
        };
    }

    match app.focus() {
        Focus::NoteInput => match key.code {
            KeyCode::Enter => Some(Message::SubmitNote),
            KeyCode::Esc => Some(Message::FocusGrid),
            KeyCode::Tab => Some(Message::ToggleTab),
            KeyCode::Backspace => Some(Message::NoteBackspace),
            KeyCode::Up => Some(Message::ScrollPanel(-1)),
            KeyCode::Down => Some(Message::ScrollPanel(1)),
            KeyCode::PageUp => Some(Message::PagePanel(-1)),
            KeyCode::PageDown => Some(Message::PagePanel(1)),
            // Ctrl/Alt chords are not text
            KeyCode::Char(_)
                if key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                None
            }
            KeyCode::Char(c) => Some(Message::NoteChar(c)),
            _ => None,
        },
        Focus::Grid => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Message::Quit),
            KeyCode::Left | KeyCode::Char('h') => Some(Message::MoveCursor(Direction::Left)),
            KeyCode::Right | KeyCode::Char('l') => Some(Message::MoveCursor(Direction::Right)),
            KeyCode::Up | KeyCode::Char('k') => Some(Message::MoveCursor(Direction::Up)),
            KeyCode::Down | KeyCode::Char('j') => Some(Message::MoveCursor(Direction::Down)),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Message::SelectCursor),
            KeyCode::Char('[') | KeyCode::PageUp => Some(Message::PreviousMonth),
            KeyCode::Char(']') | KeyCode::PageDown => Some(Message::NextMonth),
            KeyCode::Tab | KeyCode::BackTab => Some(Message::ToggleTab),
            KeyCode::Char('n') | KeyCode::Char('i') => Some(Message::FocusNoteInput),
            KeyCode::Char('t') => Some(Message::ToggleTheme),
            KeyCode::Char('K') => Some(Message::ScrollPanel(-1)),
            KeyCode::Char('J') => Some(Message::ScrollPanel(1)),
            _ => None,
        },
    }
}

/// Lines moved per mouse wheel notch
const WHEEL_STEP: isize = 3;

/// Convert a left click or a wheel scroll over the day panel to a message,
/// using the current screen layout
pub fn mouse_message(app: &App, area: Rect, mouse: MouseEvent) -> Option<Message> {
    let layout = DashboardLayout::compute(area);
    let over_panel = layout
        .panel_body
        .contains(Position::new(mouse.column, mouse.row));

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {}
        MouseEventKind::ScrollUp if over_panel && app.alert().is_none() => {
            return Some(Message::ScrollPanel(-WHEEL_STEP));
        }
        MouseEventKind::ScrollDown if over_panel && app.alert().is_none() => {
            return Some(Message::ScrollPanel(WHEEL_STEP));
        }
        _ => return None,
    }

    // Any click acknowledges the alert
    if app.alert().is_some() {
        return Some(Message::DismissAlert);
    }

    let hit = layout.hit_test(mouse.column, mouse.row, app.state().active_tab)?;

    Some(match hit {
        Hit::PreviousMonth => Message::PreviousMonth,
        Hit::NextMonth => Message::NextMonth,
        Hit::ThemeToggle => Message::ToggleTheme,
        Hit::Cell(index) => Message::SelectCell(index),
        Hit::Tab(tab) => Message::SelectTab(tab),
        Hit::NoteInput => Message::FocusNoteInput,
    })
}
