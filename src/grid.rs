//! Month grid model.
//!
//! A fixed 6×7 grid, weeks starting Monday, row-major:
//! ```text
//! Index:  0  1  2  3  4  5  6
//!         7  8  9 10 11 12 13
//!         ...
//!        35 36 37 38 39 40 41
//! ```
//! The first cell is the Monday on or before the 1st of the reference month,
//! so leading and trailing cells may belong to neighbouring months.

use crate::date::{month_start, weekday_index, CalendarDate, DayKey};
use chrono::{Datelike, Days};

pub const COLUMNS: usize = 7;
pub const ROWS: usize = 6;
pub const CELL_COUNT: usize = COLUMNS * ROWS;

/// One day in the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    pub date: CalendarDate,
    pub key: DayKey,
    /// Date lies outside the reference month
    pub other_month: bool,
    pub selected: bool,
    pub today: bool,
}

/// 42 cells for one reference month
#[derive(Debug, Clone)]
pub struct MonthGrid {
    reference_month: CalendarDate,
    cells: Vec<GridCell>,
}

impl MonthGrid {
    /// Build the grid for `reference_month`, tagging `selected_day` if visible
    pub fn render(
        reference_month: CalendarDate,
        selected_day: CalendarDate,
        today: CalendarDate,
    ) -> Self {
        let first = month_start(reference_month);
        let lead = u64::from(weekday_index(first));
        let start = first.checked_sub_days(Days::new(lead)).unwrap_or(first);
        let selected_key = DayKey::from_date(selected_day);

        let cells = start
            .iter_days()
            .take(CELL_COUNT)
            .map(|date| {
                let key = DayKey::from_date(date);
                GridCell {
                    other_month: date.month() != first.month() || date.year() != first.year(),
                    selected: key == selected_key,
                    today: date == today,
                    date,
                    key,
                }
            })
            .collect();

        Self {
            reference_month: first,
            cells,
        }
    }

    /// First day of the month this grid shows
    pub fn reference_month(&self) -> CalendarDate {
        self.reference_month
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&GridCell> {
        self.cells.get(index)
    }

    /// Cells grouped by week
    pub fn rows(&self) -> impl Iterator<Item = &[GridCell]> {
        self.cells.chunks(COLUMNS)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.cells.iter().position(|c| c.selected)
    }

    pub fn index_of(&self, key: &DayKey) -> Option<usize> {
        self.cells.iter().position(|c| &c.key == key)
    }

    /// Move the selected tag to the clicked cell.
    ///
    /// Returns the cell's date so the caller can update the selected day and
    /// fetch its data. Out-of-range indices leave the grid untouched.
    pub fn select(&mut self, index: usize) -> Option<CalendarDate> {
        if index >= self.cells.len() {
            return None;
        }
        for cell in &mut self.cells {
            cell.selected = false;
        }
        let cell = &mut self.cells[index];
        cell.selected = true;
        Some(cell.date)
    }
}

/// Convert flat index to (row, col)
pub fn position_of(index: usize) -> (usize, usize) {
    (index / COLUMNS, index % COLUMNS)
}

/// Convert (row, col) to flat index
pub fn index_at(row: usize, col: usize) -> usize {
    row * COLUMNS + col
}

/// Keyboard cursor direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Move a cursor one step, clamped to the grid
pub fn step(index: usize, direction: Direction) -> usize {
    let (row, col) = position_of(index.min(CELL_COUNT - 1));
    match direction {
        Direction::Left if col > 0 => index_at(row, col - 1),
        Direction::Left if row > 0 => index_at(row - 1, COLUMNS - 1),
        Direction::Right if col + 1 < COLUMNS => index_at(row, col + 1),
        Direction::Right if row + 1 < ROWS => index_at(row + 1, 0),
        Direction::Up => index_at(row.saturating_sub(1), col),
        Direction::Down => index_at((row + 1).min(ROWS - 1), col),
        _ => index_at(row, col),
    }
}
