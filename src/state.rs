//! Dashboard view state.
//!
//! `ViewState` is a small `Copy` value; every transition returns a new state
//! instead of mutating in place, so the controller can be driven and checked
//! without a terminal.

use crate::date::{month_start, shift_month, CalendarDate, DayKey};
use crate::preference::ThemeMode;
use crate::tabs::Tab;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    /// First day of the month shown in the grid
    pub reference_month: CalendarDate,
    /// Day whose schedule and notes are shown
    pub selected_day: CalendarDate,
    pub active_tab: Tab,
    pub theme: ThemeMode,
}

impl ViewState {
    /// Start on `today` with the schedule tab active
    pub fn new(today: CalendarDate, theme: ThemeMode) -> Self {
        Self {
            reference_month: month_start(today),
            selected_day: today,
            active_tab: Tab::default(),
            theme,
        }
    }

    /// Browse one month back; the selection stays put
    pub fn previous_month(self) -> Self {
        Self {
            reference_month: shift_month(self.reference_month, -1),
            ..self
        }
    }

    /// Browse one month forward; the selection stays put
    pub fn next_month(self) -> Self {
        Self {
            reference_month: shift_month(self.reference_month, 1),
            ..self
        }
    }

    pub fn with_selected_day(self, selected_day: CalendarDate) -> Self {
        Self {
            selected_day,
            ..self
        }
    }

    pub fn with_tab(self, active_tab: Tab) -> Self {
        Self { active_tab, ..self }
    }

    pub fn with_theme(self, theme: ThemeMode) -> Self {
        Self { theme, ..self }
    }

    pub fn selected_key(&self) -> DayKey {
        DayKey::from_date(self.selected_day)
    }
}
