//! Month grid widget
//!
//! Renders the 42 day cells of a [`MonthGrid`]:
//! - selected day: filled with the selection colors
//! - keyboard cursor: filled with the cursor color
//! - today: bold, today color
//! - other-month days: dimmed

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use super::layout::cell_rect_in;
use super::theme::Theme;
use crate::grid::{index_at, GridCell, MonthGrid};
use chrono::Datelike;

pub struct MonthView<'a> {
    grid: &'a MonthGrid,
    theme: &'a Theme,
    cursor: Option<usize>,
}

impl<'a> MonthView<'a> {
    pub fn new(grid: &'a MonthGrid, theme: &'a Theme) -> Self {
        Self {
            grid,
            theme,
            cursor: None,
        }
    }

    /// Highlight the keyboard cursor cell
    pub fn cursor(mut self, cursor: Option<usize>) -> Self {
        self.cursor = cursor;
        self
    }

    fn cell_style(&self, cell: &GridCell, is_cursor: bool) -> Style {
        let theme = self.theme;
        if cell.selected {
            return Style::default()
                .fg(theme.selection_fg)
                .bg(theme.selection_bg)
                .add_modifier(Modifier::BOLD);
        }

        let bg = if is_cursor { theme.cursor } else { theme.background };
        let style = Style::default().bg(bg);
        if cell.today {
            style.fg(theme.today).add_modifier(Modifier::BOLD)
        } else if cell.other_month {
            style.fg(theme.other_month)
        } else {
            style.fg(theme.foreground)
        }
    }
}

impl<'a> Widget for MonthView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        for (row, week) in self.grid.rows().enumerate() {
            for (col, cell) in week.iter().enumerate() {
                let index = index_at(row, col);
                let rect = cell_rect_in(area, index);
                if rect.is_empty() {
                    continue;
                }

                let style = self.cell_style(cell, self.cursor == Some(index));

                // Fill background
                for y in rect.y..rect.bottom() {
                    for x in rect.x..rect.right() {
                        if let Some(c) = buf.cell_mut((x, y)) {
                            c.set_style(style);
                        }
                    }
                }

                // Day number, right-aligned in the middle of the cell
                let label = format!("{:>3}", cell.date.day());
                let y = rect.y + rect.height.saturating_sub(1) / 2;
                buf.set_string(rect.x, y, label, style);
            }
        }
    }
}
