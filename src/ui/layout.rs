//! Screen layout for the dashboard
//!
//! The same `DashboardLayout` is used to draw a frame and to map mouse
//! clicks back to what was drawn there.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ ◀       MARCH 2024                          ▶   ☾   │
//! └──────────────────────────────────────────────────────┘
//! ┌ calendar ──────────────────┐┌ day ───────────────────┐
//! │ Mo  Tu  We  Th  Fr  Sa  Su ││ Schedule   Notes       │
//! │ 26  27  28  29   1   2   3 ││ Date: 15.03.2024       │
//! │ ...                        ││ 09:00 — Standup        │
//! │                            ││ [note input]           │
//! └────────────────────────────┘└────────────────────────┘
//!  status bar
//! ```

use ratatui::layout::{Constraint, Direction, Layout, Margin, Position, Rect};

use crate::grid::{position_of, CELL_COUNT, COLUMNS, ROWS};
use crate::tabs::Tab;

/// Width of one day cell in characters
pub const CELL_WIDTH: u16 = 5;
/// Grid width plus borders
const CALENDAR_WIDTH: u16 = CELL_WIDTH * COLUMNS as u16 + 2;
const BUTTON_WIDTH: u16 = 3;

/// Something clickable on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    PreviousMonth,
    NextMonth,
    ThemeToggle,
    Cell(usize),
    Tab(Tab),
    NoteInput,
}

#[derive(Debug, Clone, Copy)]
pub struct DashboardLayout {
    pub header: Rect,
    pub prev_button: Rect,
    pub month_label: Rect,
    pub next_button: Rect,
    pub theme_toggle: Rect,
    pub calendar: Rect,
    /// Weekday names row inside the calendar block
    pub weekdays: Rect,
    /// Area holding the 6×7 day cells
    pub cells: Rect,
    pub day_panel: Rect,
    pub tabs: Rect,
    pub date_line: Rect,
    pub panel_body: Rect,
    pub note_input: Rect,
    pub status: Rect,
}

impl DashboardLayout {
    pub fn compute(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(1),    // Calendar + day panel
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        let header = chunks[0];
        let header_row = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(BUTTON_WIDTH), // Prev
                Constraint::Min(1),               // Month label
                Constraint::Length(BUTTON_WIDTH), // Next
                Constraint::Length(1),            // Gap
                Constraint::Length(BUTTON_WIDTH), // Theme toggle
            ])
            .split(inner(header));

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(CALENDAR_WIDTH), Constraint::Min(20)])
            .split(chunks[1]);

        let calendar = body[0];
        let calendar_inner = inner(calendar);
        let calendar_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(calendar_inner);

        let day_panel = body[1];
        let day_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Tabs
                Constraint::Length(1), // Date line
                Constraint::Min(1),    // Panel rows
                Constraint::Length(3), // Note input
            ])
            .split(inner(day_panel));

        Self {
            header,
            prev_button: header_row[0],
            month_label: header_row[1],
            next_button: header_row[2],
            theme_toggle: header_row[4],
            calendar,
            weekdays: calendar_rows[0],
            cells: calendar_rows[1],
            day_panel,
            tabs: day_rows[0],
            date_line: day_rows[1],
            panel_body: day_rows[2],
            note_input: day_rows[3],
            status: chunks[2],
        }
    }

    /// Screen area of grid cell `index`
    pub fn cell_rect(&self, index: usize) -> Rect {
        cell_rect_in(self.cells, index)
    }

    /// Screen area of a tab title in the tab bar
    pub fn tab_rect(&self, tab: Tab) -> Rect {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(self.tabs);
        match tab {
            Tab::Schedule => halves[0],
            Tab::Notes => halves[1],
        }
    }

    /// Map a mouse position to what is drawn there
    pub fn hit_test(&self, column: u16, row: u16, active_tab: Tab) -> Option<Hit> {
        let pos = Position::new(column, row);

        if self.prev_button.contains(pos) {
            return Some(Hit::PreviousMonth);
        }
        if self.next_button.contains(pos) {
            return Some(Hit::NextMonth);
        }
        if self.theme_toggle.contains(pos) {
            return Some(Hit::ThemeToggle);
        }
        if self.cells.contains(pos) {
            return (0..CELL_COUNT)
                .find(|&i| self.cell_rect(i).contains(pos))
                .map(Hit::Cell);
        }
        if let Some(tab) = Tab::ALL.into_iter().find(|&t| self.tab_rect(t).contains(pos)) {
            return Some(Hit::Tab(tab));
        }
        if active_tab == Tab::Notes && self.note_input.contains(pos) {
            return Some(Hit::NoteInput);
        }
        None
    }
}

/// Area of cell `index` within the cells area; empty if it does not fit
pub fn cell_rect_in(cells: Rect, index: usize) -> Rect {
    if index >= CELL_COUNT {
        return Rect::default();
    }
    let (row, col) = position_of(index);
    // at least one line per week
    let height = (cells.height / ROWS as u16).max(1);
    let x = cells.x + col as u16 * CELL_WIDTH;
    let y = cells.y + row as u16 * height;

    if x + CELL_WIDTH > cells.right() || y + height > cells.bottom() {
        return Rect::default();
    }
    Rect::new(x, y, CELL_WIDTH, height)
}

/// Area inside a one-cell border
pub fn inner(area: Rect) -> Rect {
    area.inner(Margin {
        horizontal: 1,
        vertical: 1,
    })
}

/// Centered popup area, clamped to `area`
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
